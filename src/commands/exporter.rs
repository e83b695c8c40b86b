// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions::query_rows;
use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    // Oldest first in files
    let mut rows = query_rows(conn, sub)?;
    rows.reverse();
    let count = rows.len();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Could not create {}", out))?;
            wtr.write_record(["date", "kind", "account", "category", "amount", "description"])?;
            for r in rows {
                wtr.write_record([r.date, r.kind, r.account, r.category, r.amount, r.description])?;
            }
            wtr.flush()?;
        }
        _ => {
            let items: Vec<_> = rows
                .into_iter()
                .map(|r| {
                    json!({
                        "date": r.date, "kind": r.kind, "account": r.account,
                        "category": r.category, "amount": r.amount, "description": r.description
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Could not write {}", out))?;
        }
    }
    tracing::info!(count, path = %out, format = %fmt, "exported transactions");
    println!("Exported {} transaction(s) to {}", count, out);
    Ok(())
}
