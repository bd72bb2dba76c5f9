// Copyright (c) 2025 TaskNest.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::utils::{load_accounts, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let balance = parse_decimal(sub.get_one::<String>("balance").unwrap())?;
            ledger::add_account(conn, name, balance)?;
            println!("Added account '{}' (opening balance {})", name, balance);
        }
        Some(("list", sub)) => {
            ledger::ensure_default_accounts(conn)?;
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let accounts = load_accounts(conn)?;
            if !maybe_print_json(json_flag, jsonl_flag, &accounts)? {
                let rows = accounts
                    .iter()
                    .map(|a| {
                        vec![
                            a.id.to_string(),
                            a.name.clone(),
                            format!("{:.2}", a.balance),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Id", "Name", "Balance"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}
