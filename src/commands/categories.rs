// Copyright (c) 2025 TaskNest.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::models::TransactionKind;
use crate::utils::{load_categories, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let kind = TransactionKind::parse(sub.get_one::<String>("kind").unwrap())?;
            ledger::add_category(conn, name, kind)?;
            println!("Added category '{}' ({})", name, kind.as_str());
        }
        Some(("list", _)) => {
            ledger::ensure_default_categories(conn)?;
            let rows = load_categories(conn)?
                .into_iter()
                .map(|c| vec![c.name, c.kind.as_str().to_string()])
                .collect();
            println!("{}", pretty_table(&["Category", "Kind"], rows));
        }
        _ => {}
    }
    Ok(())
}
