// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn opt(name: &'static str) -> Arg {
    Arg::new(name).long(name)
}

fn req(name: &'static str) -> Arg {
    Arg::new(name).long(name).required(true)
}

fn flag(name: &'static str) -> Arg {
    Arg::new(name).long(name).action(ArgAction::SetTrue)
}

fn with_output(cmd: Command) -> Command {
    cmd.arg(flag("json").help("Print pretty JSON"))
        .arg(flag("jsonl").help("Print one JSON object per line").conflicts_with("json"))
}

fn with_range(cmd: Command) -> Command {
    cmd.arg(opt("from").help("First day included, YYYY-MM-DD"))
        .arg(opt("to").help("Last day included, YYYY-MM-DD"))
}

pub fn build_cli() -> Command {
    Command::new("budgetify")
        .about("Personal finance summaries, budget sheets, splits, and projections")
        .version(clap::crate_version!())
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .env("BUDGETIFY_USER")
                .default_value("default")
                .help("Whose data to read and write"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging on stderr"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("add")
                        .arg(req("date"))
                        .arg(req("amount"))
                        .arg(req("type").help("income|expense"))
                        .arg(opt("category"))
                        .arg(opt("description")),
                )
                .subcommand(with_output(with_range(
                    Command::new("list")
                        .arg(opt("type"))
                        .arg(opt("category"))
                        .arg(opt("limit").value_parser(value_parser!(usize))),
                )))
                .subcommand(
                    Command::new("edit")
                        .about("Replace a transaction")
                        .arg(req("id").value_parser(value_parser!(i64)))
                        .arg(req("date"))
                        .arg(req("amount"))
                        .arg(req("type"))
                        .arg(opt("category"))
                        .arg(opt("description")),
                )
                .subcommand(Command::new("rm").arg(req("id").value_parser(value_parser!(i64)))),
        )
        .subcommand(
            Command::new("category")
                .about("Your category names")
                .subcommand(Command::new("add").arg(req("name")))
                .subcommand(Command::new("list"))
                .subcommand(Command::new("rm").arg(req("name"))),
        )
        .subcommand(
            Command::new("investment")
                .about("Investment holdings")
                .subcommand(
                    Command::new("add")
                        .arg(req("name"))
                        .arg(req("value"))
                        .arg(opt("initial").help("Defaults to --value"))
                        .arg(req("rate").allow_negative_numbers(true).help("Annual return in percent"))
                        .arg(opt("type").default_value("other"))
                        .arg(opt("start").help("YYYY-MM-DD, defaults to today")),
                )
                .subcommand(with_output(Command::new("list")))
                .subcommand(Command::new("rm").arg(req("id").value_parser(value_parser!(i64)))),
        )
        .subcommand(
            Command::new("sheet")
                .about("Budget sheets")
                .subcommand(Command::new("create").arg(req("name")))
                .subcommand(Command::new("list"))
                .subcommand(Command::new("rm").arg(req("name")))
                .subcommand(with_output(Command::new("summary").arg(req("sheet")))),
        )
        .subcommand(
            Command::new("entry")
                .about("Entries of a budget sheet")
                .subcommand(
                    Command::new("add")
                        .arg(req("sheet"))
                        .arg(req("type"))
                        .arg(req("amount"))
                        .arg(req("date"))
                        .arg(opt("category"))
                        .arg(opt("description")),
                )
                .subcommand(with_output(Command::new("list").arg(req("sheet"))))
                .subcommand(Command::new("rm").arg(req("id").value_parser(value_parser!(i64)))),
        )
        .subcommand(
            Command::new("split")
                .about("Split expenses")
                .subcommand(
                    Command::new("create")
                        .arg(req("description"))
                        .arg(req("total"))
                        .arg(req("members").help("Comma-separated user ids"))
                        .arg(opt("mode").default_value("equal").help("equal|custom"))
                        .arg(opt("amounts").help("Comma-separated amounts for --mode custom"))
                        .arg(opt("date").help("YYYY-MM-DD, defaults to today")),
                )
                .subcommand(with_output(Command::new("list")))
                .subcommand(
                    Command::new("settle")
                        .arg(req("id").value_parser(value_parser!(i64)))
                        .arg(req("member"))
                        .arg(req("status").help("paid|declined")),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Dashboards")
                .subcommand(with_output(with_range(
                    Command::new("summary")
                        .arg(opt("stated-income").help("Measure savings against this income")),
                )))
                .subcommand(with_output(with_range(
                    Command::new("categories")
                        .arg(opt("type").default_value("expense").help("income|expense|all"))
                        .arg(opt("sort").default_value("value").help("value|name|none")),
                )))
                .subcommand(with_output(
                    Command::new("cashflow")
                        .arg(opt("months").value_parser(value_parser!(usize))),
                ))
                .subcommand(with_output(Command::new("portfolio")))
                .subcommand(with_output(
                    Command::new("projection")
                        .arg(opt("income").help("Annual income used when nothing is invested")),
                )),
        )
        .subcommand(
            Command::new("config")
                .about("Per-user settings")
                .subcommand(with_output(Command::new("show")))
                .subcommand(Command::new("set-currency").arg(req("currency")))
                .subcommand(Command::new("set-income").arg(req("amount")))
                .subcommand(
                    Command::new("set-basis").arg(req("basis").help("transactions|stated")),
                ),
        )
}
