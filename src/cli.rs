// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, command, value_parser};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    ]
}

fn date_args() -> [Arg; 3] {
    [
        Arg::new("from").long("from").help("First date, YYYY-MM-DD"),
        Arg::new("to").long("to").help("Last date, YYYY-MM-DD"),
        Arg::new("month")
            .long("month")
            .conflicts_with_all(["from", "to"])
            .help("Calendar month, YYYY-MM"),
    ]
}

fn filter_args() -> Vec<Arg> {
    let mut args = vec![
        Arg::new("account").long("account").help("Account name"),
        Arg::new("category")
            .long("category")
            .help("Category name; includes its subcategories"),
        Arg::new("kind").long("kind").help("income|expense"),
    ];
    args.extend(date_args());
    args
}

pub fn build_cli() -> Command {
    command!()
        .name("budgetree")
        .about("Hierarchical categories, transactions and spending breakdowns")
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("user")
                .about("Show or switch the current user")
                .arg(Arg::new("id").help("User id to switch to")),
        )
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("checking")
                                .help("checking|savings|credit|cash|investment"),
                        )
                        .arg(Arg::new("currency").long("currency").default_value("USD"))
                        .arg(
                            Arg::new("balance")
                                .long("balance")
                                .default_value("0")
                                .help("Opening balance"),
                        ),
                )
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(Command::new("rm").arg(Arg::new("name").required(true))),
        )
        .subcommand(
            Command::new("category")
                .about("Manage the category tree")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .help("income|expense; defaults to the parent's kind"),
                        )
                        .arg(Arg::new("parent").long("parent").help("Parent category"))
                        .arg(Arg::new("color").long("color").help("#rrggbb")),
                )
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("kind").long("kind").help("income|expense"))
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("rename").long("rename").help("New name"))
                        .arg(
                            Arg::new("parent")
                                .long("parent")
                                .conflicts_with("root")
                                .help("Move under this category"),
                        )
                        .arg(
                            Arg::new("root")
                                .long("root")
                                .action(ArgAction::SetTrue)
                                .help("Move to the top level"),
                        )
                        .arg(
                            Arg::new("color")
                                .long("color")
                                .conflicts_with("no-color")
                                .help("#rrggbb"),
                        )
                        .arg(
                            Arg::new("no-color")
                                .long("no-color")
                                .action(ArgAction::SetTrue)
                                .help("Clear the color"),
                        ),
                )
                .subcommand(Command::new("rm").arg(Arg::new("name").required(true))),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_negative_numbers(true),
                        )
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .help("income|expense; defaults to the category's kind"),
                        )
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(
                    Command::new("list")
                        .args(filter_args())
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .args(json_args()),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true))),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregated views")
                .subcommand(
                    Command::new("chart")
                        .about("Totals per category at one level of the tree")
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .default_value("expense")
                                .help("income|expense"),
                        )
                        .arg(
                            Arg::new("parent")
                                .long("parent")
                                .help("Show the children of this category"),
                        )
                        .arg(Arg::new("account").long("account").help("Account name"))
                        .args(date_args())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("summary")
                        .about("Income, expense and net")
                        .args(filter_args())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("monthly")
                        .about("Income and expense per month")
                        .arg(Arg::new("account").long("account").help("Account name"))
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .default_value("12")
                                .value_parser(value_parser!(usize)),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("balance")
                        .about("Month-end balance of an account")
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .default_value("6")
                                .value_parser(value_parser!(usize)),
                        )
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true))
                    .args(filter_args()),
            ),
        )
        .subcommand(Command::new("doctor").about("Check the category tree for problems"))
}
