// Copyright (c) 2025 TaskNest.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tasknest::ledger::{self, NewTransaction};
use tasknest::models::{ExpenseSubType, TransactionKind};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    tasknest::db::init_schema(&mut conn).unwrap();
    conn
}

fn dec(v: i64) -> Decimal {
    Decimal::from_i64(v).unwrap()
}

fn balance(conn: &Connection, name: &str) -> Decimal {
    let s: String = conn
        .query_row(
            "SELECT balance FROM accounts WHERE name=?1",
            [name],
            |r| r.get(0),
        )
        .unwrap();
    s.parse().unwrap()
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn expense(amount: i64, account_id: i64) -> NewTransaction {
    NewTransaction {
        description: "Groceries".into(),
        amount: dec(amount),
        date: day(),
        kind: TransactionKind::Expense,
        account_id,
        to_account_id: None,
        category: Some("Food".into()),
        sub_type: Some(ExpenseSubType::Need),
    }
}

fn transfer(amount: i64, from: i64, to: i64) -> NewTransaction {
    NewTransaction {
        description: "Move to savings".into(),
        amount: dec(amount),
        date: day(),
        kind: TransactionKind::Transfer,
        account_id: from,
        to_account_id: Some(to),
        category: None,
        sub_type: None,
    }
}

#[test]
fn record_expense_and_transfer_moves_balances() {
    let conn = setup();
    let cash = ledger::add_account(&conn, "Cash", dec(1000)).unwrap();
    let savings = ledger::add_account(&conn, "Savings", dec(0)).unwrap();

    ledger::record_transaction(&conn, &expense(200, cash)).unwrap();
    ledger::record_transaction(&conn, &transfer(300, cash, savings)).unwrap();

    assert_eq!(balance(&conn, "Cash"), dec(500));
    assert_eq!(balance(&conn, "Savings"), dec(300));
}

#[test]
fn edit_reverses_old_effect_before_applying_new() {
    let conn = setup();
    let cash = ledger::add_account(&conn, "Cash", dec(1000)).unwrap();
    let savings = ledger::add_account(&conn, "Savings", dec(0)).unwrap();

    let exp_id = ledger::record_transaction(&conn, &expense(200, cash)).unwrap();
    ledger::record_transaction(&conn, &transfer(300, cash, savings)).unwrap();

    // 200 -> 150: reverse the old 200, apply the new 150
    ledger::update_transaction(&conn, exp_id, &expense(150, cash)).unwrap();
    assert_eq!(balance(&conn, "Cash"), dec(550));
    assert_eq!(balance(&conn, "Savings"), dec(300));
}

#[test]
fn delete_reverses_balance_effect() {
    let conn = setup();
    let cash = ledger::add_account(&conn, "Cash", dec(1000)).unwrap();
    let savings = ledger::add_account(&conn, "Savings", dec(0)).unwrap();

    let exp_id = ledger::record_transaction(&conn, &expense(200, cash)).unwrap();
    let tr_id = ledger::record_transaction(&conn, &transfer(300, cash, savings)).unwrap();
    ledger::update_transaction(&conn, exp_id, &expense(150, cash)).unwrap();

    ledger::delete_transaction(&conn, tr_id).unwrap();
    assert_eq!(balance(&conn, "Cash"), dec(850));
    assert_eq!(balance(&conn, "Savings"), dec(0));
}

#[test]
fn update_with_identical_data_is_a_balance_noop() {
    let conn = setup();
    let cash = ledger::add_account(&conn, "Cash", dec(1000)).unwrap();
    let id = ledger::record_transaction(&conn, &expense(200, cash)).unwrap();

    ledger::update_transaction(&conn, id, &expense(200, cash)).unwrap();
    assert_eq!(balance(&conn, "Cash"), dec(800));
}

#[test]
fn delete_then_identical_rerecord_restores_balances() {
    let conn = setup();
    let cash = ledger::add_account(&conn, "Cash", dec(1000)).unwrap();
    let savings = ledger::add_account(&conn, "Savings", dec(0)).unwrap();

    let id = ledger::record_transaction(&conn, &transfer(300, cash, savings)).unwrap();
    assert_eq!(balance(&conn, "Cash"), dec(700));

    ledger::delete_transaction(&conn, id).unwrap();
    ledger::record_transaction(&conn, &transfer(300, cash, savings)).unwrap();
    assert_eq!(balance(&conn, "Cash"), dec(700));
    assert_eq!(balance(&conn, "Savings"), dec(300));
}

#[test]
fn balances_equal_opening_plus_sum_of_deltas() {
    let conn = setup();
    let cash = ledger::add_account(&conn, "Cash", dec(100)).unwrap();
    let savings = ledger::add_account(&conn, "Savings", dec(50)).unwrap();

    let mut income = expense(40, cash);
    income.kind = TransactionKind::Income;
    income.category = Some("Salary".into());
    income.sub_type = None;
    ledger::record_transaction(&conn, &income).unwrap();
    ledger::record_transaction(&conn, &expense(25, cash)).unwrap();
    ledger::record_transaction(&conn, &transfer(60, cash, savings)).unwrap();
    ledger::record_transaction(&conn, &transfer(10, savings, cash)).unwrap();

    // Cash: 100 + 40 - 25 - 60 + 10, Savings: 50 + 60 - 10
    assert_eq!(balance(&conn, "Cash"), dec(65));
    assert_eq!(balance(&conn, "Savings"), dec(100));
}

#[test]
fn transfer_to_same_account_is_rejected_before_any_write() {
    let conn = setup();
    let cash = ledger::add_account(&conn, "Cash", dec(1000)).unwrap();

    let err = ledger::record_transaction(&conn, &transfer(300, cash, cash)).unwrap_err();
    assert!(err.to_string().contains("different"));
    assert_eq!(balance(&conn, "Cash"), dec(1000));
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn expense_without_category_is_rejected() {
    let conn = setup();
    let cash = ledger::add_account(&conn, "Cash", dec(1000)).unwrap();

    let mut bad = expense(10, cash);
    bad.category = None;
    let err = ledger::record_transaction(&conn, &bad).unwrap_err();
    assert!(err.to_string().contains("Category is required"));
}

#[test]
fn non_positive_amount_is_rejected() {
    let conn = setup();
    let cash = ledger::add_account(&conn, "Cash", dec(1000)).unwrap();

    let mut bad = expense(10, cash);
    bad.amount = Decimal::ZERO;
    assert!(ledger::record_transaction(&conn, &bad).is_err());
}

#[test]
fn default_accounts_seed_once() {
    let conn = setup();
    ledger::ensure_default_accounts(&conn).unwrap();
    ledger::ensure_default_accounts(&conn).unwrap();

    let names: Vec<String> = {
        let mut stmt = conn.prepare("SELECT name FROM accounts ORDER BY id").unwrap();
        let rows = stmt.query_map([], |r| r.get(0)).unwrap();
        rows.map(|r| r.unwrap()).collect()
    };
    assert_eq!(names, vec!["Cash in Hand", "Savings Account"]);

    // An existing account suppresses seeding entirely.
    let conn2 = setup();
    ledger::add_account(&conn2, "Wallet", dec(5)).unwrap();
    ledger::ensure_default_accounts(&conn2).unwrap();
    let count: i64 = conn2
        .query_row("SELECT COUNT(*) FROM accounts", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn default_categories_seed_one_other_per_kind() {
    let conn = setup();
    ledger::ensure_default_categories(&conn).unwrap();
    ledger::ensure_default_categories(&conn).unwrap();

    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM transaction_categories WHERE name='Other'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn add_category_is_idempotent_per_kind() {
    let conn = setup();
    let a = ledger::add_category(&conn, "Food", TransactionKind::Expense).unwrap();
    let b = ledger::add_category(&conn, "Food", TransactionKind::Expense).unwrap();
    assert_eq!(a, b);
    let c = ledger::add_category(&conn, "Food", TransactionKind::Income).unwrap();
    assert_ne!(a, c);
}

#[test]
fn migrate_backfills_created_at_from_date() {
    let conn = setup();
    ledger::add_account(&conn, "Cash", dec(0)).unwrap();
    conn.execute(
        "INSERT INTO transactions(description, amount, date, created_at, kind, account_id, category)
         VALUES ('legacy', '5', '2024-01-15', NULL, 'expense', 1, 'Other')",
        [],
    )
    .unwrap();

    ledger::migrate_created_at(&conn).unwrap();

    let ts: Option<i64> = conn
        .query_row("SELECT created_at FROM transactions", [], |r| r.get(0))
        .unwrap();
    let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_time(chrono::NaiveTime::MIN)
        .and_utc()
        .timestamp_millis();
    assert_eq!(ts, Some(expected));
}
