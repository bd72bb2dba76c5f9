// Copyright (c) 2025 TaskNest.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Snapshot export: one sheet per entity (tasks, habits, transactions,
//! accounts) plus a derived Summary sheet, filterable to a single month.
//! CSV writes one file per sheet into a directory; JSON writes a single
//! object keyed by sheet name. Empty snapshots still produce their sheet.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Account, Habit, Task, Transaction, TransactionKind};
use crate::utils::{
    load_accounts, load_habits, load_tasks, load_transactions, parse_month,
};

#[derive(Debug, Serialize)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn sheet(name: &str, headers: &[&str], rows: Vec<Vec<String>>) -> Sheet {
    Sheet {
        name: name.to_string(),
        headers: headers.iter().map(|h| h.to_string()).collect(),
        rows,
    }
}

fn same_month(date: NaiveDate, target: Option<(i32, u32)>) -> bool {
    target.is_none_or(|(y, m)| date.year() == y && date.month() == m)
}

fn tasks_sheet(tasks: &[Task], month: Option<(i32, u32)>) -> Sheet {
    let mut filtered: Vec<&Task> = tasks
        .iter()
        .filter(|t| match (month, t.due_date) {
            (None, _) => true,
            (Some(_), Some(due)) => same_month(due, month),
            (Some(_), None) => false,
        })
        .collect();
    filtered.sort_by_key(|t| t.due_date);
    let rows = filtered
        .iter()
        .map(|t| {
            vec![
                t.title.clone(),
                t.description.clone().unwrap_or_default(),
                t.priority.as_str().to_string(),
                t.due_date.map(|d| d.to_string()).unwrap_or_else(|| "N/A".into()),
                if t.completed { "Completed" } else { "Pending" }.to_string(),
            ]
        })
        .collect();
    sheet("tasks", &["Title", "Description", "Priority", "Due Date", "Status"], rows)
}

fn habits_sheet(habits: &[Habit], month: Option<(i32, u32)>) -> Sheet {
    let mut entries: Vec<(String, NaiveDate, String)> = habits
        .iter()
        .flat_map(|h| {
            h.completions
                .iter()
                .filter(|(date, _)| same_month(**date, month))
                .map(|(date, entry)| (h.name.clone(), *date, entry.status.as_str().to_string()))
        })
        .collect();
    entries.sort_by_key(|(_, date, _)| *date);
    let rows = entries
        .into_iter()
        .map(|(name, date, status)| vec![name, date.to_string(), status])
        .collect();
    sheet("habits", &["Habit Name", "Date", "Status"], rows)
}

fn transactions_sheet(
    transactions: &[Transaction],
    accounts: &[Account],
    month: Option<(i32, u32)>,
) -> Sheet {
    let names: HashMap<i64, &str> = accounts.iter().map(|a| (a.id, a.name.as_str())).collect();
    let lookup = |id: i64| names.get(&id).copied().unwrap_or("Unknown").to_string();
    let mut filtered: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| same_month(t.date, month))
        .collect();
    filtered.sort_by_key(|t| (t.date, t.id));
    let rows = filtered
        .iter()
        .map(|t| {
            let (from, to) = match t.kind {
                TransactionKind::Income => (String::new(), lookup(t.account_id)),
                TransactionKind::Expense => (lookup(t.account_id), String::new()),
                TransactionKind::Transfer => (
                    lookup(t.account_id),
                    t.to_account_id.map(lookup).unwrap_or_default(),
                ),
            };
            vec![
                t.date.to_string(),
                t.kind.as_str().to_string(),
                t.description.clone(),
                from,
                to,
                t.category.clone().unwrap_or_default(),
                t.sub_type.map(|s| s.as_str().to_string()).unwrap_or_default(),
                t.amount.to_string(),
            ]
        })
        .collect();
    sheet(
        "transactions",
        &["Date", "Type", "Description", "From", "To", "Category", "Expense Type", "Amount"],
        rows,
    )
}

fn accounts_sheet(accounts: &[Account]) -> Sheet {
    let rows = accounts
        .iter()
        .map(|a| vec![a.name.clone(), format!("{:.2}", a.balance)])
        .collect();
    sheet("accounts", &["Account", "Ending Balance"], rows)
}

fn summary_sheet(
    transactions: &[Transaction],
    accounts: &[Account],
    month: Option<(i32, u32)>,
) -> Sheet {
    let scoped: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| same_month(t.date, month))
        .collect();
    let mut income = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;
    let mut by_category: HashMap<String, Decimal> = HashMap::new();
    for t in &scoped {
        match t.kind {
            TransactionKind::Income => income += t.amount,
            TransactionKind::Expense => {
                expenses += t.amount;
                let cat = t.category.clone().unwrap_or_else(|| "(uncategorized)".into());
                *by_category.entry(cat).or_insert(Decimal::ZERO) += t.amount;
            }
            TransactionKind::Transfer => {}
        }
    }
    let mut rows = vec![
        vec!["Total Income".into(), format!("{:.2}", income)],
        vec!["Total Expenses".into(), format!("{:.2}", expenses)],
        vec!["Net".into(), format!("{:.2}", income - expenses)],
    ];
    let mut cats: Vec<_> = by_category.into_iter().collect();
    cats.sort_by(|a, b| b.1.cmp(&a.1));
    for (cat, amt) in cats {
        rows.push(vec![format!("Expenses: {}", cat), format!("{:.2}", amt)]);
    }
    for a in accounts {
        rows.push(vec![format!("Balance: {}", a.name), format!("{:.2}", a.balance)]);
    }
    sheet("summary", &["Item", "Amount"], rows)
}

/// Build every sheet for a month selector (`None` = all data).
pub fn build_sheets(conn: &Connection, month: Option<(i32, u32)>) -> Result<Vec<Sheet>> {
    let tasks = load_tasks(conn)?;
    let habits = load_habits(conn)?;
    let transactions = load_transactions(conn)?;
    let accounts = load_accounts(conn)?;
    Ok(vec![
        tasks_sheet(&tasks, month),
        habits_sheet(&habits, month),
        transactions_sheet(&transactions, &accounts, month),
        accounts_sheet(&accounts),
        summary_sheet(&transactions, &accounts, month),
    ])
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let month_arg = m.get_one::<String>("month").unwrap();
    let fmt = m.get_one::<String>("format").unwrap().to_lowercase();
    let out = m.get_one::<String>("out").unwrap();

    let month = if month_arg == "all" {
        None
    } else {
        let m = parse_month(month_arg)?;
        let parts: Vec<&str> = m.split('-').collect();
        Some((parts[0].parse()?, parts[1].parse()?))
    };

    let sheets = build_sheets(conn, month)?;

    match fmt.as_str() {
        "csv" => {
            let dir = Path::new(out);
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Create export dir {}", dir.display()))?;
            for s in &sheets {
                let path = dir.join(format!("{}.csv", s.name));
                let mut wtr = csv::Writer::from_path(&path)
                    .with_context(|| format!("Open {}", path.display()))?;
                wtr.write_record(&s.headers)?;
                for row in &s.rows {
                    wtr.write_record(row)?;
                }
                wtr.flush()?;
            }
        }
        "json" => {
            let map: HashMap<&str, &Sheet> =
                sheets.iter().map(|s| (s.name.as_str(), s)).collect();
            std::fs::write(out, serde_json::to_string_pretty(&map)?)
                .with_context(|| format!("Write {}", out))?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported {} data to {}", month_arg, out);
    Ok(())
}
