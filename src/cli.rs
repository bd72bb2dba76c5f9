// Copyright (c) 2025 TaskNest.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON instead of a table"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

pub fn build_cli() -> Command {
    Command::new("tasknest")
        .about("Personal tasks, habits, notes, and finance ledger")
        .version(clap::crate_version!())
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Initialize the database and seed defaults"))
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .about("Add an account")
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("balance")
                                .long("balance")
                                .default_value("0")
                                .help("Opening balance"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").about("List accounts and balances"))),
        )
        .subcommand(
            Command::new("category")
                .about("Manage transaction categories")
                .subcommand(
                    Command::new("add")
                        .about("Add a category")
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .value_parser(["income", "expense"])
                                .default_value("expense"),
                        ),
                )
                .subcommand(Command::new("list").about("List categories")),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and inspect ledger transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(Arg::new("description").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .help("Positive decimal amount"),
                        )
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .required(true)
                                .help("YYYY-MM-DD"),
                        )
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .value_parser(["income", "expense", "transfer"])
                                .default_value("expense"),
                        )
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .required(true)
                                .help("Source account name"),
                        )
                        .arg(
                            Arg::new("to-account")
                                .long("to-account")
                                .help("Destination account (transfers only)"),
                        )
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .help("Category name (income and expenses)"),
                        )
                        .arg(
                            Arg::new("sub-type")
                                .long("sub-type")
                                .value_parser(["Need", "Want"])
                                .help("Need/Want split (expenses only)"),
                        ),
                )
                .subcommand(
                    json_flags(
                        Command::new("list")
                            .about("List transactions, newest first")
                            .arg(Arg::new("month").long("month").help("YYYY-MM"))
                            .arg(
                                Arg::new("kind")
                                    .long("kind")
                                    .value_parser(["income", "expense", "transfer"]),
                            )
                            .arg(Arg::new("category").long("category"))
                            .arg(
                                Arg::new("limit")
                                    .long("limit")
                                    .value_parser(value_parser!(usize)),
                            ),
                    ),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Rewrite a transaction, adjusting balances")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("date").long("date"))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .value_parser(["income", "expense", "transfer"]),
                        )
                        .arg(Arg::new("account").long("account"))
                        .arg(Arg::new("to-account").long("to-account"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("sub-type")
                                .long("sub-type")
                                .value_parser(["Need", "Want"]),
                        ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction, reversing its balance effect")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        ),
                ),
        )
        .subcommand(
            Command::new("task")
                .about("Manage the to-do list")
                .subcommand(
                    Command::new("add")
                        .about("Add a task")
                        .arg(Arg::new("title").required(true))
                        .arg(Arg::new("description").long("description"))
                        .arg(
                            Arg::new("priority")
                                .long("priority")
                                .value_parser(["Low", "Medium", "High"])
                                .default_value("Medium"),
                        )
                        .arg(Arg::new("due").long("due").help("YYYY-MM-DD")),
                )
                .subcommand(json_flags(Command::new("list").about("List tasks")))
                .subcommand(
                    Command::new("done")
                        .about("Toggle a task's completion")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        ),
                )
                .subcommand(
                    Command::new("rm").about("Delete a task").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("habit")
                .about("Track daily habits")
                .subcommand(
                    Command::new("add")
                        .about("Add a habit")
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(json_flags(Command::new("list").about("List habits")))
                .subcommand(
                    Command::new("toggle")
                        .about("Flip a day's completion (marks completed, or clears back to pending)")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, default today")),
                )
                .subcommand(
                    Command::new("rm").about("Delete a habit").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("note")
                .about("Keep free-form notes")
                .subcommand(
                    Command::new("add")
                        .about("Add a note")
                        .arg(Arg::new("content").required(true))
                        .arg(Arg::new("title").long("title")),
                )
                .subcommand(Command::new("list").about("List notes, most recently updated first"))
                .subcommand(
                    Command::new("edit")
                        .about("Edit a note")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("content").long("content"))
                        .arg(Arg::new("title").long("title")),
                )
                .subcommand(
                    Command::new("rm").about("Delete a note").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Derived views over the ledger, habits, and tasks")
                .subcommand(
                    json_flags(
                        Command::new("summary")
                            .about("Monthly income / needs / wants / remaining")
                            .arg(
                                Arg::new("month")
                                    .long("month")
                                    .help("YYYY-MM, default current month"),
                            ),
                    ),
                )
                .subcommand(
                    json_flags(
                        Command::new("categories")
                            .about("Monthly expense breakdown by category")
                            .arg(
                                Arg::new("month")
                                    .long("month")
                                    .help("YYYY-MM, default current month"),
                            ),
                    ),
                )
                .subcommand(json_flags(
                    Command::new("habits").about("Trailing 7-day completion rates"),
                ))
                .subcommand(json_flags(
                    Command::new("tasks").about("Completed vs pending task counts"),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Export snapshots plus a summary sheet")
                .arg(
                    Arg::new("month")
                        .long("month")
                        .default_value("all")
                        .help("'all' or YYYY-MM"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["csv", "json"])
                        .default_value("csv"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .required(true)
                        .help("Output directory (csv) or file (json)"),
                ),
        )
        .subcommand(Command::new("doctor").about("Check ledger/balance consistency"))
}
