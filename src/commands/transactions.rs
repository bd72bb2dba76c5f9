// Copyright (c) 2025 TaskNest.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{TransactionFilter, filter_transactions, net_flow};
use crate::ledger::{self, NewTransaction};
use crate::models::{ExpenseSubType, Transaction, TransactionKind};
use crate::utils::{
    account_name, id_for_account, maybe_print_json, parse_amount, parse_date, parse_month,
    pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    ledger::ensure_default_accounts(conn)?;
    ledger::ensure_default_categories(conn)?;

    let kind = TransactionKind::parse(sub.get_one::<String>("kind").unwrap())?;
    let account_id = id_for_account(conn, sub.get_one::<String>("account").unwrap())?;
    let to_account_id = sub
        .get_one::<String>("to-account")
        .map(|n| id_for_account(conn, n))
        .transpose()?;
    let sub_type = sub
        .get_one::<String>("sub-type")
        .map(|s| ExpenseSubType::parse(s))
        .transpose()?;

    let new = NewTransaction {
        description: sub.get_one::<String>("description").unwrap().clone(),
        amount: parse_amount(sub.get_one::<String>("amount").unwrap())?,
        date: parse_date(sub.get_one::<String>("date").unwrap())?,
        kind,
        account_id,
        to_account_id,
        category: sub.get_one::<String>("category").cloned(),
        // Expenses default to Need, matching the entry form.
        sub_type: match kind {
            TransactionKind::Expense => sub_type.or(Some(ExpenseSubType::Need)),
            _ => None,
        },
    };
    let id = ledger::record_transaction(conn, &new)?;
    println!(
        "Recorded {} {} on {} ({})",
        new.kind.as_str(),
        new.amount,
        new.date,
        id
    );
    Ok(())
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let filter = TransactionFilter {
        month: sub.get_one::<String>("month").map(|m| parse_month(m)).transpose()?,
        kind: sub
            .get_one::<String>("kind")
            .map(|k| TransactionKind::parse(k))
            .transpose()?,
        category: sub.get_one::<String>("category").cloned(),
    };
    let all = crate::utils::load_transactions(conn)?;
    let mut rows = filter_transactions(&all, &filter);
    if let Some(limit) = sub.get_one::<usize>("limit") {
        rows.truncate(*limit);
    }
    Ok(rows)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    let total = net_flow(&data);
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let mut rows = Vec::new();
        for t in &data {
            let detail = match t.kind {
                TransactionKind::Transfer => format!(
                    "{} -> {}",
                    account_name(conn, t.account_id)?,
                    t.to_account_id
                        .map(|id| account_name(conn, id))
                        .transpose()?
                        .unwrap_or_else(|| "Unknown".into()),
                ),
                _ => format!(
                    "{} / {}",
                    account_name(conn, t.account_id)?,
                    t.category.as_deref().unwrap_or(""),
                ),
            };
            rows.push(vec![
                t.id.to_string(),
                t.date.to_string(),
                t.kind.as_str().to_string(),
                t.description.clone(),
                detail,
                t.sub_type.map(|s| s.as_str().to_string()).unwrap_or_default(),
                format!("{:.2}", t.amount),
            ]);
        }
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Kind", "Description", "Detail", "Type", "Amount"],
                rows,
            )
        );
        println!("Net flow: {:.2}", total);
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let old = ledger::get_transaction(conn, id)?;

    let kind = sub
        .get_one::<String>("kind")
        .map(|k| TransactionKind::parse(k))
        .transpose()?
        .unwrap_or(old.kind);
    let account_id = sub
        .get_one::<String>("account")
        .map(|n| id_for_account(conn, n))
        .transpose()?
        .unwrap_or(old.account_id);
    let to_account_id = match kind {
        TransactionKind::Transfer => sub
            .get_one::<String>("to-account")
            .map(|n| id_for_account(conn, n))
            .transpose()?
            .or(old.to_account_id),
        _ => None,
    };
    let category = match kind {
        TransactionKind::Transfer => None,
        _ => sub.get_one::<String>("category").cloned().or(old.category.clone()),
    };
    let sub_type = match kind {
        TransactionKind::Expense => sub
            .get_one::<String>("sub-type")
            .map(|s| ExpenseSubType::parse(s))
            .transpose()?
            .or(old.sub_type)
            .or(Some(ExpenseSubType::Need)),
        _ => None,
    };

    let new = NewTransaction {
        description: sub
            .get_one::<String>("description")
            .cloned()
            .unwrap_or_else(|| old.description.clone()),
        amount: sub
            .get_one::<String>("amount")
            .map(|a| parse_amount(a))
            .transpose()?
            .unwrap_or(old.amount),
        date: sub
            .get_one::<String>("date")
            .map(|d| parse_date(d))
            .transpose()?
            .unwrap_or(old.date),
        kind,
        account_id,
        to_account_id,
        category,
        sub_type,
    };
    ledger::update_transaction(conn, id, &new)?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    ledger::delete_transaction(conn, id)?;
    println!("Deleted transaction {}", id);
    Ok(())
}
