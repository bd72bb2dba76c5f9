// Copyright (c) 2025 TaskNest.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Ledger engine: records income/expense/transfer entries and keeps account
//! balances in step by applying the implied deltas.
//!
//! Balance adjustments are issued as independent per-account updates, not one
//! SQL transaction. The original system had no multi-document atomicity and
//! callers must treat the ledger and the balances as eventually consistent;
//! `doctor` reports any drift. `apply_effect`/`reverse_effect` is the single
//! seam where an atomic implementation could later be swapped in.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveTime;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::models::{ExpenseSubType, Transaction, TransactionKind};
use crate::utils::{now_millis, parse_decimal};

/// Fields of a transaction before it has a row id.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub description: String,
    pub amount: Decimal,
    pub date: chrono::NaiveDate,
    pub kind: TransactionKind,
    pub account_id: i64,
    pub to_account_id: Option<i64>,
    pub category: Option<String>,
    pub sub_type: Option<ExpenseSubType>,
}

impl NewTransaction {
    /// Synchronous validation, rejected before any write is attempted.
    pub fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(anyhow!("Description is required"));
        }
        if self.amount <= Decimal::ZERO {
            return Err(anyhow!("Amount must be positive"));
        }
        match self.kind {
            TransactionKind::Transfer => {
                let to = self
                    .to_account_id
                    .ok_or_else(|| anyhow!("Destination account is required for transfers"))?;
                if to == self.account_id {
                    return Err(anyhow!("Source and destination accounts must be different"));
                }
                if self.category.is_some() {
                    return Err(anyhow!("Transfers do not carry a category"));
                }
            }
            TransactionKind::Income | TransactionKind::Expense => {
                if self.category.as_deref().map(str::trim).unwrap_or("").is_empty() {
                    return Err(anyhow!("Category is required for income and expenses"));
                }
                if self.to_account_id.is_some() {
                    return Err(anyhow!("Destination account is only valid for transfers"));
                }
            }
        }
        Ok(())
    }
}

/// Single-account balance increment, the unit every ledger effect decomposes
/// into. Balances are decimal TEXT, so the arithmetic happens here rather
/// than in SQL.
fn adjust_balance(conn: &Connection, account_id: i64, delta: Decimal) -> Result<()> {
    let current_s: String = conn
        .query_row(
            "SELECT balance FROM accounts WHERE id=?1",
            params![account_id],
            |r| r.get(0),
        )
        .with_context(|| format!("Account id {} not found", account_id))?;
    let current = parse_decimal(&current_s)?;
    conn.execute(
        "UPDATE accounts SET balance=?1 WHERE id=?2",
        params![(current + delta).to_string(), account_id],
    )?;
    Ok(())
}

/// Apply the balance deltas a transaction implies: income credits its account,
/// expense debits it, transfer debits the source and credits the destination.
pub fn apply_effect(
    conn: &Connection,
    kind: TransactionKind,
    amount: Decimal,
    account_id: i64,
    to_account_id: Option<i64>,
) -> Result<()> {
    match kind {
        TransactionKind::Income => adjust_balance(conn, account_id, amount)?,
        TransactionKind::Expense => adjust_balance(conn, account_id, -amount)?,
        TransactionKind::Transfer => {
            adjust_balance(conn, account_id, -amount)?;
            if let Some(to) = to_account_id {
                adjust_balance(conn, to, amount)?;
            }
        }
    }
    Ok(())
}

/// Exact inverse of [`apply_effect`].
pub fn reverse_effect(
    conn: &Connection,
    kind: TransactionKind,
    amount: Decimal,
    account_id: i64,
    to_account_id: Option<i64>,
) -> Result<()> {
    match kind {
        TransactionKind::Income => adjust_balance(conn, account_id, -amount)?,
        TransactionKind::Expense => adjust_balance(conn, account_id, amount)?,
        TransactionKind::Transfer => {
            adjust_balance(conn, account_id, amount)?;
            if let Some(to) = to_account_id {
                adjust_balance(conn, to, -amount)?;
            }
        }
    }
    Ok(())
}

pub fn record_transaction(conn: &Connection, new: &NewTransaction) -> Result<i64> {
    new.validate()?;
    conn.execute(
        "INSERT INTO transactions(description, amount, date, created_at, kind, account_id,
                                  to_account_id, category, sub_type)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            new.description,
            new.amount.to_string(),
            new.date.to_string(),
            now_millis(),
            new.kind.as_str(),
            new.account_id,
            new.to_account_id,
            new.category,
            new.sub_type.map(|s| s.as_str()),
        ],
    )?;
    let id = conn.last_insert_rowid();
    apply_effect(conn, new.kind, new.amount, new.account_id, new.to_account_id)?;
    Ok(id)
}

pub fn get_transaction(conn: &Connection, id: i64) -> Result<Transaction> {
    let mut stmt = conn.prepare(
        "SELECT id, description, amount, date, created_at, kind, account_id, to_account_id,
                category, sub_type
         FROM transactions WHERE id=?1",
    )?;
    let tx = stmt
        .query_row(params![id], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, String>(3)?,
                r.get::<_, Option<i64>>(4)?,
                r.get::<_, String>(5)?,
                r.get::<_, i64>(6)?,
                r.get::<_, Option<i64>>(7)?,
                r.get::<_, Option<String>>(8)?,
                r.get::<_, Option<String>>(9)?,
            ))
        })
        .optional()?
        .with_context(|| format!("Transaction {} not found", id))?;
    let (id, description, amount_s, date_s, created_at, kind_s, account_id, to_account_id, category, sub_type_s) =
        tx;
    Ok(Transaction {
        id,
        description,
        amount: parse_decimal(&amount_s)?,
        date: crate::utils::parse_date(&date_s)?,
        created_at,
        kind: TransactionKind::parse(&kind_s)?,
        account_id,
        to_account_id,
        category,
        sub_type: sub_type_s.as_deref().map(ExpenseSubType::parse).transpose()?,
    })
}

/// Rewrite a transaction: reverse the old record's balance effect in full,
/// then apply the new one. Two sequential phases, not an atomic swap.
pub fn update_transaction(conn: &Connection, id: i64, new: &NewTransaction) -> Result<()> {
    new.validate()?;
    let old = get_transaction(conn, id)?;
    conn.execute(
        "UPDATE transactions SET description=?1, amount=?2, date=?3, created_at=?4, kind=?5,
                account_id=?6, to_account_id=?7, category=?8, sub_type=?9
         WHERE id=?10",
        params![
            new.description,
            new.amount.to_string(),
            new.date.to_string(),
            // Preserve the original tie-break timestamp when present.
            old.created_at.unwrap_or_else(now_millis),
            new.kind.as_str(),
            new.account_id,
            new.to_account_id,
            new.category,
            new.sub_type.map(|s| s.as_str()),
            id,
        ],
    )?;
    reverse_effect(conn, old.kind, old.amount, old.account_id, old.to_account_id)?;
    apply_effect(conn, new.kind, new.amount, new.account_id, new.to_account_id)?;
    Ok(())
}

/// Delete a transaction and reverse its balance effect. Permanent; no audit
/// trail of the deletion remains.
pub fn delete_transaction(conn: &Connection, id: i64) -> Result<()> {
    let old = get_transaction(conn, id)?;
    conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    reverse_effect(conn, old.kind, old.amount, old.account_id, old.to_account_id)?;
    Ok(())
}

pub fn add_account(conn: &Connection, name: &str, opening_balance: Decimal) -> Result<i64> {
    conn.execute(
        "INSERT INTO accounts(name, balance, opening_balance) VALUES (?1, ?2, ?2)",
        params![name, opening_balance.to_string()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn add_category(conn: &Connection, name: &str, kind: TransactionKind) -> Result<i64> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM transaction_categories WHERE name=?1 AND kind=?2",
            params![name, kind.as_str()],
            |r| r.get(0),
        )
        .optional()?;
    if let Some(id) = existing {
        return Ok(id);
    }
    conn.execute(
        "INSERT INTO transaction_categories(name, kind) VALUES (?1, ?2)",
        params![name, kind.as_str()],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Seed "Cash in Hand" and "Savings Account" at zero the first time a user
/// has no accounts at all. Idempotent.
pub fn ensure_default_accounts(conn: &Connection) -> Result<()> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM accounts", [], |r| r.get(0))?;
    if count == 0 {
        add_account(conn, "Cash in Hand", Decimal::ZERO)?;
        add_account(conn, "Savings Account", Decimal::ZERO)?;
    }
    Ok(())
}

/// Seed one "Other" category per kind when that kind has none. Idempotent.
pub fn ensure_default_categories(conn: &Connection) -> Result<()> {
    for kind in [TransactionKind::Expense, TransactionKind::Income] {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM transaction_categories WHERE kind=?1",
            params![kind.as_str()],
            |r| r.get(0),
        )?;
        if count == 0 {
            add_category(conn, "Other", kind)?;
        }
    }
    Ok(())
}

/// One-shot backfill for legacy transactions lacking `created_at`: derive a
/// timestamp from midnight of their calendar date so descending sort stays
/// stable across old and new records.
pub fn migrate_created_at(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare("SELECT id, date FROM transactions WHERE created_at IS NULL")?;
    let mut cur = stmt.query([])?;
    let mut pending = Vec::new();
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let date_s: String = r.get(1)?;
        pending.push((id, date_s));
    }
    for (id, date_s) in pending {
        let Ok(date) = crate::utils::parse_date(&date_s) else {
            eprintln!("warning: cannot backfill created_at for transaction {}", id);
            continue;
        };
        let ts = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
        conn.execute(
            "UPDATE transactions SET created_at=?1 WHERE id=?2",
            params![ts, id],
        )?;
    }
    Ok(())
}
