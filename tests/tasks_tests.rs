// Copyright (c) 2025 TaskNest.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use tasknest::{cli, commands::tasks};
use tasknest::utils::load_tasks;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    tasknest::db::init_schema(&mut conn).unwrap();
    conn
}

fn run(conn: &Connection, args: &[&str]) {
    let matches = cli::build_cli().get_matches_from(args);
    let Some(("task", sub)) = matches.subcommand() else {
        panic!("no task subcommand");
    };
    tasks::handle(conn, sub).unwrap();
}

#[test]
fn add_list_roundtrip() {
    let conn = setup();
    run(
        &conn,
        &[
            "tasknest", "task", "add", "File taxes", "--priority", "High", "--due", "2025-04-15",
        ],
    );
    let tasks = load_tasks(&conn).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "File taxes");
    assert_eq!(tasks[0].priority.as_str(), "High");
    assert_eq!(tasks[0].due_date.unwrap().to_string(), "2025-04-15");
    assert!(!tasks[0].completed);
}

#[test]
fn done_toggles_completion_both_ways() {
    let conn = setup();
    run(&conn, &["tasknest", "task", "add", "Water plants"]);
    let id = load_tasks(&conn).unwrap()[0].id;

    run(&conn, &["tasknest", "task", "done", &id.to_string()]);
    assert!(load_tasks(&conn).unwrap()[0].completed);

    run(&conn, &["tasknest", "task", "done", &id.to_string()]);
    assert!(!load_tasks(&conn).unwrap()[0].completed);
}

#[test]
fn rm_deletes_task() {
    let conn = setup();
    run(&conn, &["tasknest", "task", "add", "Water plants"]);
    let id = load_tasks(&conn).unwrap()[0].id;
    run(&conn, &["tasknest", "task", "rm", &id.to_string()]);
    assert!(load_tasks(&conn).unwrap().is_empty());
}

#[test]
fn invalid_due_date_is_rejected() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "tasknest", "task", "add", "Bad", "--due", "tomorrow",
    ]);
    let Some(("task", sub)) = matches.subcommand() else {
        panic!("no task subcommand");
    };
    assert!(tasks::handle(&conn, sub).is_err());
    assert!(load_tasks(&conn).unwrap().is_empty());
}
