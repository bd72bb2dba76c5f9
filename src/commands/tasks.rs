// Copyright (c) 2025 TaskNest.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Priority;
use crate::utils::{load_tasks, maybe_print_json, now_millis, parse_date, pretty_table};
use anyhow::{Context, Result};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let title = sub.get_one::<String>("title").unwrap();
            let description = sub.get_one::<String>("description");
            let priority = Priority::parse(sub.get_one::<String>("priority").unwrap())?;
            let due = sub
                .get_one::<String>("due")
                .map(|d| parse_date(d))
                .transpose()?;
            conn.execute(
                "INSERT INTO tasks(title, description, priority, due_date, completed, created_at)
                 VALUES (?1, ?2, ?3, ?4, 0, ?5)",
                params![
                    title,
                    description,
                    priority.as_str(),
                    due.map(|d| d.to_string()),
                    now_millis()
                ],
            )?;
            println!("Added task '{}'", title);
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let tasks = load_tasks(conn)?;
            if !maybe_print_json(json_flag, jsonl_flag, &tasks)? {
                let rows = tasks
                    .iter()
                    .map(|t| {
                        vec![
                            t.id.to_string(),
                            t.title.clone(),
                            t.priority.as_str().to_string(),
                            t.due_date.map(|d| d.to_string()).unwrap_or_default(),
                            if t.completed { "Completed" } else { "Pending" }.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Title", "Priority", "Due", "Status"], rows)
                );
            }
        }
        Some(("done", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let changed = conn.execute(
                "UPDATE tasks SET completed = 1 - completed WHERE id=?1",
                params![id],
            )?;
            if changed == 0 {
                return Err(anyhow::anyhow!("Task {} not found", id));
            }
            let completed: i64 = conn
                .query_row("SELECT completed FROM tasks WHERE id=?1", params![id], |r| r.get(0))
                .with_context(|| format!("Task {} not found", id))?;
            println!(
                "Task {} marked {}",
                id,
                if completed != 0 { "completed" } else { "pending" }
            );
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            conn.execute("DELETE FROM tasks WHERE id=?1", params![id])?;
            println!("Deleted task {}", id);
        }
        _ => {}
    }
    Ok(())
}
