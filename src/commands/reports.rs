// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{Totals, balance_history, monthly_flows};
use crate::commands::transactions::{date_range, filter_from_matches};
use crate::filter::TransactionFilter;
use crate::models::{BucketShare, Kind};
use crate::store;
use crate::tree::{aggregate, build_tree, disambiguate_colors, shares};
use crate::utils::{fmt_money, get_current_user, maybe_print_json, pretty_table};
use anyhow::{Context, Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("chart", sub)) => chart(conn, sub)?,
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("monthly", sub)) => monthly(conn, sub)?,
        Some(("balance", sub)) => balance(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Buckets for one level of the category tree, colors disambiguated.
pub fn chart_data(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<BucketShare>> {
    let user = get_current_user(conn)?;
    let kind: Kind = sub.get_one::<String>("kind").unwrap().parse()?;
    let forest = build_tree(
        store::list_categories(conn, &user)?
            .into_iter()
            .filter(|c| c.kind == kind),
    );

    let parent_id = match sub.get_one::<String>("parent") {
        Some(name) => {
            let parent = store::find_category(conn, &user, name)?;
            if parent.kind != kind {
                bail!("Category '{}' is {}, not {}", parent.name, parent.kind, kind);
            }
            Some(parent.id)
        }
        None => None,
    };

    let (start, end) = date_range(sub)?;
    let mut filter = TransactionFilter::new().kind(kind).between(start, end);
    if let Some(name) = sub.get_one::<String>("account") {
        filter = filter.account(store::find_account(conn, &user, name)?.id);
    }
    let transactions = filter.apply(store::list_transactions(conn, &user)?);

    let buckets = aggregate(&transactions, &forest, parent_id.as_deref())
        .context("Category tree is inconsistent; run `budgetree doctor`")?;
    Ok(shares(&disambiguate_colors(buckets)))
}

fn chart(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = chart_data(conn, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    if let Some(name) = sub.get_one::<String>("parent") {
        println!("Inside '{}'", name.trim());
    }
    let rows = data
        .into_iter()
        .map(|s| {
            let label = if s.bucket.has_children {
                format!("{} ▸", s.bucket.display_name)
            } else {
                s.bucket.display_name
            };
            vec![
                label,
                format!("{:.2}", s.bucket.total_amount),
                format!("{:.2}%", s.percentage),
                s.bucket.color,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Amount", "Share", "Color"], rows)
    );
    Ok(())
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = get_current_user(conn)?;
    let filter = filter_from_matches(conn, &user, sub)?;
    let transactions = filter.apply(store::list_transactions(conn, &user)?);
    let totals = Totals::from_transactions(&transactions);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &totals)? {
        println!(
            "{}",
            pretty_table(
                &["Income", "Expense", "Net"],
                vec![vec![
                    format!("{:.2}", totals.income),
                    format!("{:.2}", totals.expense),
                    format!("{:.2}", totals.net),
                ]],
            )
        );
    }
    Ok(())
}

fn monthly(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = get_current_user(conn)?;
    let months = *sub.get_one::<usize>("months").unwrap_or(&12);
    let mut filter = TransactionFilter::new();
    if let Some(name) = sub.get_one::<String>("account") {
        filter = filter.account(store::find_account(conn, &user, name)?.id);
    }
    let transactions = filter.apply(store::list_transactions(conn, &user)?);
    let data = monthly_flows(&transactions, months);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|f| {
                vec![
                    f.month,
                    format!("{:.2}", f.income),
                    format!("{:.2}", f.expense),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Month", "Income", "Expense"], rows));
    }
    Ok(())
}

fn balance(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = get_current_user(conn)?;
    let months = *sub.get_one::<usize>("months").unwrap_or(&6);
    let account = store::find_account(conn, &user, sub.get_one::<String>("account").unwrap())?;
    let transactions = store::list_transactions(conn, &user)?;
    let data = balance_history(&account, &transactions, months);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|p| vec![p.month, fmt_money(&p.balance, &account.currency)])
            .collect();
        println!("{}", pretty_table(&["Month", "Balance"], rows));
    }
    Ok(())
}
