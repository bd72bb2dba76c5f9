// Copyright (c) 2025 TaskNest.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{load_notes, now_millis, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let content = sub.get_one::<String>("content").unwrap();
            let title = sub.get_one::<String>("title");
            let now = now_millis();
            conn.execute(
                "INSERT INTO notes(title, content, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
                params![title, content, now],
            )?;
            println!("Added note");
        }
        Some(("list", _)) => {
            let rows = load_notes(conn)?
                .into_iter()
                .map(|n| {
                    vec![
                        n.id.to_string(),
                        n.title.unwrap_or_default(),
                        n.content,
                    ]
                })
                .collect();
            println!("{}", pretty_table(&["Id", "Title", "Content"], rows));
        }
        Some(("edit", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            if let Some(content) = sub.get_one::<String>("content") {
                conn.execute(
                    "UPDATE notes SET content=?1, updated_at=?2 WHERE id=?3",
                    params![content, now_millis(), id],
                )?;
            }
            if let Some(title) = sub.get_one::<String>("title") {
                conn.execute(
                    "UPDATE notes SET title=?1, updated_at=?2 WHERE id=?3",
                    params![title, now_millis(), id],
                )?;
            }
            println!("Updated note {}", id);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            conn.execute("DELETE FROM notes WHERE id=?1", params![id])?;
            println!("Deleted note {}", id);
        }
        _ => {}
    }
    Ok(())
}
