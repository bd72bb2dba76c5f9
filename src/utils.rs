// Copyright (c) 2025 TaskNest.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::models::{
    Account, CompletionEntry, CompletionStatus, ExpenseSubType, Habit, Note, Priority, Task,
    Transaction, TransactionCategory, TransactionKind,
};

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<String> {
    chrono::NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(s.to_string())
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Positive-amount rule shared by every ledger entry point.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d <= Decimal::ZERO {
        return Err(anyhow::anyhow!("Amount must be positive, got '{}'", s));
    }
    Ok(d)
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn id_for_account(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM accounts WHERE name=?1")?;
    let id: i64 = stmt
        .query_row(params![name], |r| r.get(0))
        .with_context(|| format!("Account '{}' not found", name))?;
    Ok(id)
}

pub fn account_name(conn: &Connection, id: i64) -> Result<String> {
    let name: Option<String> = conn
        .query_row("SELECT name FROM accounts WHERE id=?1", params![id], |r| r.get(0))
        .optional()?;
    Ok(name.unwrap_or_else(|| "Unknown".to_string()))
}

// --- Snapshot loaders -------------------------------------------------------
//
// Reports, export, and doctor all work from full in-memory snapshots; the
// aggregation layer never touches the connection itself.

pub fn load_accounts(conn: &Connection) -> Result<Vec<Account>> {
    let mut stmt =
        conn.prepare("SELECT id, name, balance, opening_balance FROM accounts ORDER BY id")?;
    let mut cur = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = cur.next()? {
        let balance_s: String = r.get(2)?;
        let opening_s: String = r.get(3)?;
        out.push(Account {
            id: r.get(0)?,
            name: r.get(1)?,
            balance: parse_decimal(&balance_s)?,
            opening_balance: parse_decimal(&opening_s)?,
        });
    }
    Ok(out)
}

pub fn load_categories(conn: &Connection) -> Result<Vec<TransactionCategory>> {
    let mut stmt =
        conn.prepare("SELECT id, name, kind FROM transaction_categories ORDER BY kind, name")?;
    let mut cur = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = cur.next()? {
        let kind_s: String = r.get(2)?;
        out.push(TransactionCategory {
            id: r.get(0)?,
            name: r.get(1)?,
            kind: TransactionKind::parse(&kind_s)?,
        });
    }
    Ok(out)
}

pub fn load_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, description, amount, date, created_at, kind, account_id, to_account_id,
                category, sub_type
         FROM transactions ORDER BY date, id",
    )?;
    let mut cur = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let amount_s: String = r.get(2)?;
        let date_s: String = r.get(3)?;
        let kind_s: String = r.get(5)?;
        let sub_type_s: Option<String> = r.get(9)?;
        // A malformed row is skipped with a warning rather than aborting the load.
        let date = match parse_date(&date_s) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("warning: skipping transaction {}: {}", id, e);
                continue;
            }
        };
        out.push(Transaction {
            id,
            description: r.get(1)?,
            amount: parse_decimal(&amount_s)?,
            date,
            created_at: r.get(4)?,
            kind: TransactionKind::parse(&kind_s)?,
            account_id: r.get(6)?,
            to_account_id: r.get(7)?,
            category: r.get(8)?,
            sub_type: sub_type_s.as_deref().map(ExpenseSubType::parse).transpose()?,
        });
    }
    Ok(out)
}

pub fn load_habits(conn: &Connection) -> Result<Vec<Habit>> {
    let mut stmt = conn.prepare("SELECT id, name, created_at FROM habits ORDER BY created_at DESC, id DESC")?;
    let mut cur = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = cur.next()? {
        out.push(Habit {
            id: r.get(0)?,
            name: r.get(1)?,
            created_at: r.get(2)?,
            completions: Default::default(),
        });
    }
    let mut cstmt =
        conn.prepare("SELECT habit_id, date, status, timestamp FROM habit_completions")?;
    let mut ccur = cstmt.query([])?;
    while let Some(r) = ccur.next()? {
        let habit_id: i64 = r.get(0)?;
        let date_s: String = r.get(1)?;
        let status_s: String = r.get(2)?;
        let date = match parse_date(&date_s) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("warning: skipping habit completion: {}", e);
                continue;
            }
        };
        if let Some(h) = out.iter_mut().find(|h| h.id == habit_id) {
            h.completions.insert(
                date,
                CompletionEntry {
                    status: CompletionStatus::parse(&status_s)?,
                    timestamp: r.get(3)?,
                },
            );
        }
    }
    Ok(out)
}

pub fn load_tasks(conn: &Connection) -> Result<Vec<Task>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, description, priority, due_date, completed, created_at
         FROM tasks ORDER BY created_at DESC, id DESC",
    )?;
    let mut cur = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = cur.next()? {
        let priority_s: String = r.get(3)?;
        let due_s: Option<String> = r.get(4)?;
        out.push(Task {
            id: r.get(0)?,
            title: r.get(1)?,
            description: r.get(2)?,
            priority: Priority::parse(&priority_s)?,
            due_date: due_s.as_deref().map(parse_date).transpose()?,
            completed: r.get::<_, i64>(5)? != 0,
            created_at: r.get(6)?,
        });
    }
    Ok(out)
}

pub fn load_notes(conn: &Connection) -> Result<Vec<Note>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, content, created_at, updated_at FROM notes ORDER BY updated_at DESC",
    )?;
    let mut cur = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = cur.next()? {
        out.push(Note {
            id: r.get(0)?,
            title: r.get(1)?,
            content: r.get(2)?,
            created_at: r.get(3)?,
            updated_at: r.get(4)?,
        });
    }
    Ok(out)
}
