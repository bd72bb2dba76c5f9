// Copyright (c) 2025 TaskNest.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};

use crate::utils::{load_habits, maybe_print_json, now_millis, parse_date, pretty_table};
use anyhow::Result;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            conn.execute(
                "INSERT INTO habits(name, created_at) VALUES (?1, ?2)",
                params![name, now_millis()],
            )?;
            println!("Added habit '{}'", name);
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let habits = load_habits(conn)?;
            let today = Local::now().date_naive();
            if !maybe_print_json(json_flag, jsonl_flag, &habits)? {
                let rows = habits
                    .iter()
                    .map(|h| {
                        let today_status = h
                            .completions
                            .get(&today)
                            .map(|e| e.status.as_str())
                            .unwrap_or("pending");
                        vec![h.id.to_string(), h.name.clone(), today_status.to_string()]
                    })
                    .collect();
                println!("{}", pretty_table(&["Id", "Habit", "Today"], rows));
            }
        }
        Some(("toggle", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let date = sub
                .get_one::<String>("date")
                .map(|d| parse_date(d))
                .transpose()?
                .unwrap_or_else(|| Local::now().date_naive());
            toggle_completion(conn, id, date)?;
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            conn.execute("DELETE FROM habit_completions WHERE habit_id=?1", params![id])?;
            conn.execute("DELETE FROM habits WHERE id=?1", params![id])?;
            println!("Deleted habit {}", id);
        }
        _ => {}
    }
    Ok(())
}

/// Flip one day's entry: a completed entry is removed entirely (back to
/// pending), anything else becomes completed. No path here writes `missed`;
/// that status only appears in history and export of externally written data.
pub fn toggle_completion(conn: &Connection, habit_id: i64, date: chrono::NaiveDate) -> Result<()> {
    let existing: Option<String> = conn
        .query_row(
            "SELECT status FROM habit_completions WHERE habit_id=?1 AND date=?2",
            params![habit_id, date.to_string()],
            |r| r.get(0),
        )
        .optional()?;
    if existing.as_deref() == Some("completed") {
        conn.execute(
            "DELETE FROM habit_completions WHERE habit_id=?1 AND date=?2",
            params![habit_id, date.to_string()],
        )?;
        println!("Habit {} on {}: pending", habit_id, date);
    } else {
        conn.execute(
            "INSERT INTO habit_completions(habit_id, date, status, timestamp)
             VALUES (?1, ?2, 'completed', ?3)
             ON CONFLICT(habit_id, date) DO UPDATE SET status='completed', timestamp=excluded.timestamp",
            params![habit_id, date.to_string(), now_millis()],
        )?;
        println!("Habit {} on {}: completed", habit_id, date);
    }
    Ok(())
}
