// Copyright (c) 2025 TaskNest.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use tasknest::{cli, commands::exporter};
use tempfile::tempdir;

fn base_conn() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    tasknest::db::init_schema(&mut conn).unwrap();
    conn
}

fn seeded_conn() -> Connection {
    let conn = base_conn();
    conn.execute_batch(
        r#"
        INSERT INTO accounts(name, balance, opening_balance) VALUES ('Cash', '550', '1000');
        INSERT INTO accounts(name, balance, opening_balance) VALUES ('Savings', '300', '0');
        INSERT INTO transactions(description, amount, date, created_at, kind, account_id, category, sub_type)
            VALUES ('Groceries', '200', '2025-03-05', 1000, 'expense', 1, 'Food', 'Need');
        INSERT INTO transactions(description, amount, date, created_at, kind, account_id, to_account_id)
            VALUES ('To savings', '300', '2025-03-09', 2000, 'transfer', 1, 2);
        INSERT INTO transactions(description, amount, date, created_at, kind, account_id, category)
            VALUES ('Salary', '1000', '2025-04-01', 3000, 'income', 1, 'Salary');
        INSERT INTO tasks(title, priority, due_date, completed, created_at)
            VALUES ('File taxes', 'High', '2025-03-20', 0, 1000);
        INSERT INTO habits(name, created_at) VALUES ('Read', 1000);
        INSERT INTO habit_completions(habit_id, date, status, timestamp)
            VALUES (1, '2025-03-05', 'completed', 1000);
        "#,
    )
    .unwrap();
    conn
}

fn sheet<'a>(sheets: &'a [exporter::Sheet], name: &str) -> &'a exporter::Sheet {
    sheets.iter().find(|s| s.name == name).unwrap()
}

#[test]
fn builds_one_sheet_per_entity_plus_summary() {
    let conn = seeded_conn();
    let sheets = exporter::build_sheets(&conn, None).unwrap();
    let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["tasks", "habits", "transactions", "accounts", "summary"]);
}

#[test]
fn month_filter_scopes_entity_sheets() {
    let conn = seeded_conn();
    let sheets = exporter::build_sheets(&conn, Some((2025, 3))).unwrap();

    // April salary is excluded, March expense and transfer remain.
    assert_eq!(sheet(&sheets, "transactions").rows.len(), 2);
    assert_eq!(sheet(&sheets, "tasks").rows.len(), 1);
    assert_eq!(sheet(&sheets, "habits").rows.len(), 1);
    // Accounts always show ending balances, month-independent.
    assert_eq!(sheet(&sheets, "accounts").rows.len(), 2);
}

#[test]
fn summary_sheet_reports_month_net_and_balances() {
    let conn = seeded_conn();
    let sheets = exporter::build_sheets(&conn, Some((2025, 3))).unwrap();
    let summary = sheet(&sheets, "summary");

    let find = |item: &str| -> String {
        summary
            .rows
            .iter()
            .find(|r| r[0] == item)
            .map(|r| r[1].clone())
            .unwrap()
    };
    assert_eq!(find("Total Income"), "0.00");
    assert_eq!(find("Total Expenses"), "200.00");
    assert_eq!(find("Net"), "-200.00");
    assert_eq!(find("Expenses: Food"), "200.00");
    assert_eq!(find("Balance: Cash"), "550.00");
}

#[test]
fn transfer_rows_carry_both_account_names() {
    let conn = seeded_conn();
    let sheets = exporter::build_sheets(&conn, Some((2025, 3))).unwrap();
    let txs = sheet(&sheets, "transactions");
    let transfer = txs.rows.iter().find(|r| r[1] == "transfer").unwrap();
    assert_eq!(transfer[3], "Cash");
    assert_eq!(transfer[4], "Savings");
}

#[test]
fn empty_snapshots_still_emit_every_sheet() {
    let conn = base_conn();
    let sheets = exporter::build_sheets(&conn, None).unwrap();
    assert_eq!(sheets.len(), 5);
    for s in &sheets {
        if s.name != "summary" {
            assert!(s.rows.is_empty(), "{} should be empty", s.name);
        }
        assert!(!s.headers.is_empty());
    }
}

#[test]
fn csv_export_writes_one_file_per_sheet() {
    let conn = seeded_conn();
    let dir = tempdir().unwrap();
    let out = dir.path().join("export");
    let out_str = out.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "tasknest", "export", "--month", "2025-03", "--format", "csv", "--out", &out_str,
    ]);
    let Some(("export", sub)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    exporter::handle(&conn, sub).unwrap();

    for name in ["tasks", "habits", "transactions", "accounts", "summary"] {
        assert!(out.join(format!("{}.csv", name)).exists(), "{}.csv missing", name);
    }
    let txs = std::fs::read_to_string(out.join("transactions.csv")).unwrap();
    assert!(txs.contains("Groceries"));
    assert!(!txs.contains("Salary"));
}

#[test]
fn json_export_writes_single_keyed_object() {
    let conn = seeded_conn();
    let dir = tempdir().unwrap();
    let out = dir.path().join("export.json");
    let out_str = out.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "tasknest", "export", "--format", "json", "--out", &out_str,
    ]);
    let Some(("export", sub)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    exporter::handle(&conn, sub).unwrap();

    let val: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert!(val.get("transactions").is_some());
    assert!(val.get("summary").is_some());
}
