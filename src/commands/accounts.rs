// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::current_balance;
use crate::models::{Account, AccountKind};
use crate::store;
use crate::utils::{get_current_user, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let user = get_current_user(conn)?;
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            let kind: AccountKind = sub.get_one::<String>("type").unwrap().parse()?;
            let ccy = sub.get_one::<String>("currency").unwrap().to_uppercase();
            let opening = parse_decimal(sub.get_one::<String>("balance").unwrap())?;
            store::insert_account(
                conn,
                &Account {
                    id: store::new_id(),
                    user_id: user,
                    name: name.clone(),
                    kind,
                    currency: ccy.clone(),
                    opening_balance: opening,
                },
            )?;
            println!("Added account '{}' ({}, {})", name, kind, ccy);
        }
        Some(("list", sub)) => list(conn, &user, sub)?,
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let account = store::find_account(conn, &user, name)?;
            store::delete_account(conn, &user, &account.id)?;
            println!("Removed account '{}'", account.name);
        }
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct AccountRow {
    pub name: String,
    pub kind: AccountKind,
    pub currency: String,
    pub balance: String,
}

fn list(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let accounts = store::list_accounts(conn, user)?;
    let transactions = store::list_transactions(conn, user)?;
    let data: Vec<AccountRow> = accounts
        .iter()
        .map(|a| AccountRow {
            name: a.name.clone(),
            kind: a.kind,
            currency: a.currency.clone(),
            balance: format!("{:.2}", current_balance(a, &transactions)),
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|r| vec![r.name, r.kind.to_string(), r.currency, r.balance])
            .collect();
        println!(
            "{}",
            pretty_table(&["Name", "Type", "Currency", "Balance"], rows)
        );
    }
    Ok(())
}
