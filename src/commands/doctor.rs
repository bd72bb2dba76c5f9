// Copyright (c) 2025 TaskNest.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Consistency checks. Ledger writes and balance updates are independent
//! operations, so a failure partway through an edit or delete can leave the
//! stored balances out of step with what the ledger implies. Doctor detects
//! that drift; it never repairs it.

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::models::TransactionKind;
use crate::utils::{load_accounts, load_transactions, pretty_table};

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = run_checks(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

pub fn run_checks(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    let accounts = load_accounts(conn)?;
    let transactions = load_transactions(conn)?;

    // 1) Stored balance vs opening balance plus the sum of ledger deltas.
    for account in &accounts {
        let mut implied = account.opening_balance;
        for t in &transactions {
            match t.kind {
                TransactionKind::Income if t.account_id == account.id => implied += t.amount,
                TransactionKind::Expense if t.account_id == account.id => implied -= t.amount,
                TransactionKind::Transfer => {
                    if t.account_id == account.id {
                        implied -= t.amount;
                    }
                    if t.to_account_id == Some(account.id) {
                        implied += t.amount;
                    }
                }
                _ => {}
            }
        }
        if implied != account.balance {
            rows.push(vec![
                "balance_drift".into(),
                format!(
                    "{}: stored {} vs ledger-implied {}",
                    account.name, account.balance, implied
                ),
            ]);
        }
    }

    // 2) Transfers whose destination account no longer resolves.
    for t in &transactions {
        if t.kind == TransactionKind::Transfer {
            let to_ok = t
                .to_account_id
                .map(|id| accounts.iter().any(|a| a.id == id))
                .unwrap_or(false);
            if !to_ok {
                rows.push(vec![
                    "transfer_missing_destination".into(),
                    format!("transaction {} on {}", t.id, t.date),
                ]);
            }
        }
    }

    // 3) Income/expense rows missing a category.
    for t in &transactions {
        if t.kind != TransactionKind::Transfer
            && t.category.as_deref().map(str::trim).unwrap_or("").is_empty()
        {
            rows.push(vec![
                "missing_category".into(),
                format!("transaction {} on {}", t.id, t.date),
            ]);
        }
    }

    // 4) Non-positive amounts should never have been accepted.
    for t in &transactions {
        if t.amount <= Decimal::ZERO {
            rows.push(vec![
                "non_positive_amount".into(),
                format!("transaction {} amount {}", t.id, t.amount),
            ]);
        }
    }

    Ok(rows)
}
