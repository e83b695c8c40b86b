// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::filter::TransactionFilter;
use crate::models::{Kind, TransactionRecord};
use crate::store;
use crate::tree::build_tree;
use crate::utils::{
    get_current_user, maybe_print_json, month_bounds, parse_amount, parse_date, pretty_table,
};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let user = get_current_user(conn)?;
            let id = sub.get_one::<String>("id").unwrap();
            store::delete_transaction(conn, &user, id)?;
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = get_current_user(conn)?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let account = store::find_account(conn, &user, sub.get_one::<String>("account").unwrap())?;
    let category = store::find_category(conn, &user, sub.get_one::<String>("category").unwrap())?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let kind = match sub.get_one::<String>("kind") {
        Some(k) => k.parse::<Kind>()?,
        None => category.kind,
    };
    let description = sub
        .get_one::<String>("description")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let tx = TransactionRecord {
        id: store::new_id(),
        user_id: user,
        account_id: account.id.clone(),
        category_id: category.id.clone(),
        amount,
        kind,
        date,
        description,
    };
    store::insert_transaction(conn, &tx)?;
    println!(
        "Recorded {} {:.2} on {} in '{}' (acct: {}, id: {})",
        kind, amount, date, category.name, account.name, tx.id
    );
    Ok(())
}

/// Inclusive date bounds from `--from`/`--to` or `--month`.
pub fn date_range(sub: &clap::ArgMatches) -> Result<(Option<NaiveDate>, Option<NaiveDate>)> {
    if let Some(month) = sub.get_one::<String>("month") {
        let (start, end) = month_bounds(month)?;
        return Ok((Some(start), Some(end)));
    }
    let from = sub
        .get_one::<String>("from")
        .map(|s| parse_date(s))
        .transpose()?;
    let to = sub
        .get_one::<String>("to")
        .map(|s| parse_date(s))
        .transpose()?;
    Ok((from, to))
}

/// Filter from the shared `--account/--category/--kind` and date flags.
pub fn filter_from_matches(
    conn: &Connection,
    user: &str,
    sub: &clap::ArgMatches,
) -> Result<TransactionFilter> {
    let (start, end) = date_range(sub)?;
    let mut filter = TransactionFilter::new().between(start, end);
    if let Some(name) = sub.get_one::<String>("account") {
        filter = filter.account(store::find_account(conn, user, name)?.id);
    }
    if let Some(name) = sub.get_one::<String>("category") {
        let category = store::find_category(conn, user, name)?;
        let forest = build_tree(store::list_categories(conn, user)?);
        filter = filter.category(&category.id, &forest)?;
    }
    if let Some(k) = sub.get_one::<String>("kind") {
        filter = filter.kind(k.parse()?);
    }
    Ok(filter)
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub kind: String,
    pub account: String,
    pub category: String,
    pub amount: String,
    pub description: String,
}

/// Filtered transactions of the current user, newest first, with account
/// and category names resolved.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let user = get_current_user(conn)?;
    let filter = filter_from_matches(conn, &user, sub)?;
    let accounts: HashMap<String, String> = store::list_accounts(conn, &user)?
        .into_iter()
        .map(|a| (a.id, a.name))
        .collect();
    let categories: HashMap<String, String> = store::list_categories(conn, &user)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let limit = sub
        .try_get_one::<usize>("limit")
        .ok()
        .flatten()
        .copied()
        .unwrap_or(usize::MAX);

    Ok(filter
        .apply(store::list_transactions(conn, &user)?)
        .into_iter()
        .take(limit)
        .map(|t| TransactionRow {
            date: t.date.to_string(),
            kind: t.kind.to_string(),
            account: accounts.get(&t.account_id).cloned().unwrap_or_default(),
            category: categories.get(&t.category_id).cloned().unwrap_or_default(),
            amount: format!("{:.2}", t.amount),
            description: t.description.unwrap_or_default(),
            id: t.id,
        })
        .collect())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .into_iter()
            .map(|r| {
                vec![
                    r.date,
                    r.kind,
                    r.account,
                    r.category,
                    r.amount,
                    r.description,
                    r.id,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Kind", "Account", "Category", "Amount", "Description", "Id"],
                rows,
            )
        );
    }
    Ok(())
}
