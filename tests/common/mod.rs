// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Shared fixtures: an in-memory database and a helper that runs CLI
//! invocations against it.

#![allow(dead_code)]

use budgetree::commands::{accounts, categories, exporter, reports, transactions};
use budgetree::{cli, db};
use rusqlite::Connection;

pub fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["budgetree"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("account", m)) => accounts::handle(conn, m),
        Some(("category", m)) => categories::handle(conn, m),
        Some(("tx", m)) => transactions::handle(conn, m),
        Some(("report", m)) => reports::handle(conn, m),
        Some(("export", m)) => exporter::handle(conn, m),
        other => panic!("unexpected command {:?}", other.map(|(n, _)| n)),
    }
}

/// Matches of the innermost subcommand, e.g. `["tx", "list", ...]`.
pub fn sub_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["budgetree"];
    argv.extend_from_slice(args);
    let mut m = cli::build_cli().get_matches_from(argv);
    while let Some((_, sub)) = m.remove_subcommand() {
        m = sub;
    }
    m
}

pub fn empty() -> Connection {
    db::open_in_memory().unwrap()
}

/// Checking account with
///
/// ```text
/// Housing (#3b82f6)          Rent 1000 (Jan)
/// ├ Rent
/// └ Utilities
///   └ Power                  Power 30 (Jan)
/// Food (#3b82f6)             45.50 (Jan), 20 (Feb)
/// Salary (income)            3000 (Jan)
/// ```
pub fn household() -> Connection {
    let conn = empty();
    let steps: &[&[&str]] = &[
        &["account", "add", "Checking", "--balance", "500"],
        &["category", "add", "Housing", "--kind", "expense", "--color", "#3b82f6"],
        &["category", "add", "Rent", "--parent", "Housing"],
        &["category", "add", "Utilities", "--parent", "Housing"],
        &["category", "add", "Power", "--parent", "Utilities"],
        &["category", "add", "Food", "--kind", "expense", "--color", "#3B82F6"],
        &["category", "add", "Salary", "--kind", "income"],
        &["tx", "add", "--date", "2025-01-01", "--account", "Checking", "--category", "Rent", "--amount", "1000"],
        &["tx", "add", "--date", "2025-01-05", "--account", "Checking", "--category", "Power", "--amount", "30"],
        &["tx", "add", "--date", "2025-01-10", "--account", "Checking", "--category", "Food", "--amount", "45.50", "--description", "Groceries"],
        &["tx", "add", "--date", "2025-01-31", "--account", "Checking", "--category", "Salary", "--amount", "3000"],
        &["tx", "add", "--date", "2025-02-03", "--account", "Checking", "--category", "Food", "--amount", "20"],
    ];
    for args in steps {
        run(&conn, args).unwrap();
    }
    conn
}
