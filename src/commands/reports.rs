// Copyright (c) 2025 TaskNest.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{Datelike, Local};
use rusqlite::Connection;

use crate::aggregate;
use crate::utils::{load_habits, load_tasks, load_transactions, maybe_print_json, parse_month, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("categories", sub)) => categories(conn, sub)?,
        Some(("habits", sub)) => habits(conn, sub)?,
        Some(("tasks", sub)) => tasks(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn target_month(sub: &clap::ArgMatches) -> Result<(i32, u32)> {
    if let Some(m) = sub.get_one::<String>("month") {
        let m = parse_month(m)?;
        let parts: Vec<&str> = m.split('-').collect();
        Ok((parts[0].parse()?, parts[1].parse()?))
    } else {
        let today = Local::now().date_naive();
        Ok((today.year(), today.month()))
    }
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (year, month) = target_month(sub)?;
    let transactions = load_transactions(conn)?;
    let s = aggregate::monthly_summary(&transactions, year, month);
    if !maybe_print_json(json_flag, jsonl_flag, &s)? {
        let rows = vec![
            vec!["Income".into(), format!("{:.2}", s.total_income)],
            vec!["Needs".into(), format!("{:.2}", s.needs_total)],
            vec!["Wants".into(), format!("{:.2}", s.wants_total)],
            vec!["Spending".into(), format!("{:.2}", s.total_spending)],
            vec!["Remaining".into(), format!("{:.2}", s.remaining)],
        ];
        let title = format!("{}-{:02}", year, month);
        println!("{}", pretty_table(&[title.as_str(), "Amount"], rows));
    }
    Ok(())
}

fn categories(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (year, month) = target_month(sub)?;
    let transactions = load_transactions(conn)?;
    let breakdown = aggregate::category_breakdown(&transactions, year, month);
    let data: Vec<Vec<String>> = breakdown
        .into_iter()
        .map(|(cat, amt)| vec![cat, format!("{:.2}", amt)])
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Category", "Spent"], data));
    }
    Ok(())
}

fn habits(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let habits = load_habits(conn)?;
    let today = Local::now().date_naive();
    let mut data: Vec<Vec<String>> = habits
        .iter()
        .map(|h| {
            vec![
                h.name.clone(),
                format!("{:.0}%", aggregate::habit_completion_rate(h, today)),
            ]
        })
        .collect();
    data.push(vec![
        "(all habits)".into(),
        format!("{:.0}%", aggregate::completion_rate(&habits, today)),
    ]);
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Habit", "7-day rate"], data));
    }
    Ok(())
}

fn tasks(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let tasks = load_tasks(conn)?;
    let s = aggregate::task_summary(&tasks);
    if !maybe_print_json(json_flag, jsonl_flag, &s)? {
        let rows = vec![
            vec!["Completed".into(), s.completed.to_string()],
            vec!["Pending".into(), s.pending.to_string()],
        ];
        println!("{}", pretty_table(&["Status", "Count"], rows));
    }
    Ok(())
}
