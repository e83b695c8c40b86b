// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use budgetree::{cli, commands, db, logging, utils};

fn main() -> Result<()> {
    logging::init();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("user", sub)) => match sub.get_one::<String>("id") {
            Some(id) if !id.trim().is_empty() => {
                utils::set_current_user(&conn, id.trim())?;
                println!("Current user set to '{}'", id.trim());
            }
            Some(_) => anyhow::bail!("User id must not be empty"),
            None => println!("{}", utils::get_current_user(&conn)?),
        },
        Some(("account", sub)) => commands::accounts::handle(&conn, sub)?,
        Some(("category", sub)) => commands::categories::handle(&conn, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&conn, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
