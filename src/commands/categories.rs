// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::IntegrityError;
use crate::models::{CategoryRecord, Kind};
use crate::store;
use crate::tree::{build_tree, flatten_with_depth};
use crate::utils::{get_current_user, maybe_print_json, parse_color, pretty_table};
use anyhow::{Context, Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let user = get_current_user(conn)?;
    match m.subcommand() {
        Some(("add", sub)) => add(conn, &user, sub)?,
        Some(("list", sub)) => list(conn, &user, sub)?,
        Some(("edit", sub)) => edit(conn, &user, sub)?,
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let category = store::find_category(conn, &user, name)?;
            store::delete_category(conn, &user, &category.id)
                .with_context(|| format!("Cannot remove category '{}'", category.name))?;
            println!("Removed category '{}'", category.name);
        }
        _ => {}
    }
    Ok(())
}

/// `/` separates path segments in lookups.
fn check_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("Category name must not be empty");
    }
    if name.contains('/') {
        bail!("Category name '{}' must not contain '/'", name);
    }
    Ok(())
}

fn add(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    check_name(&name)?;
    let parent = match sub.get_one::<String>("parent") {
        Some(p) => Some(store::find_category(conn, user, p)?),
        None => None,
    };
    let kind = match (sub.get_one::<String>("kind"), &parent) {
        (Some(k), _) => k.parse::<Kind>()?,
        (None, Some(p)) => p.kind,
        (None, None) => bail!("--kind is required for a top-level category"),
    };
    if let Some(p) = &parent {
        if p.kind != kind {
            bail!(
                "Category '{}' is {}, its subcategories must be too",
                p.name,
                p.kind
            );
        }
    }
    let color = sub
        .get_one::<String>("color")
        .map(|c| parse_color(c))
        .transpose()?;

    let record = CategoryRecord {
        id: store::new_id(),
        user_id: user.to_string(),
        name: name.clone(),
        kind,
        color,
        parent_id: parent.as_ref().map(|p| p.id.clone()),
    };
    store::insert_category(conn, &record)?;
    match parent {
        Some(p) => println!("Added {} category '{}' under '{}'", kind, name, p.name),
        None => println!("Added {} category '{}'", kind, name),
    }
    Ok(())
}

fn list(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let kind = sub
        .get_one::<String>("kind")
        .map(|k| k.parse::<Kind>())
        .transpose()?;
    let records = store::list_categories(conn, user)?;
    let forest = build_tree(
        records
            .into_iter()
            .filter(|r| kind.is_none_or(|k| r.kind == k)),
    );

    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    if json_flag || jsonl_flag {
        let nodes = forest.to_nodes()?;
        maybe_print_json(json_flag, jsonl_flag, &nodes)?;
        return Ok(());
    }

    let rows = flatten_with_depth(&forest)?
        .into_iter()
        .map(|(depth, r)| {
            let label = if depth > 0 {
                format!("{}└ {}", "  ".repeat(depth - 1), r.name)
            } else {
                r.name.clone()
            };
            vec![
                label,
                r.kind.to_string(),
                r.display_color().to_string(),
                forest.children_of(&r.id).count().to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Kind", "Color", "Children"], rows)
    );
    Ok(())
}

fn edit(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let records = store::list_categories(conn, user)?;
    let forest = build_tree(records);
    let current = store::find_category(conn, user, name)?;
    let mut updated = current.clone();

    if let Some(new_name) = sub.get_one::<String>("rename") {
        let new_name = new_name.trim();
        check_name(new_name)?;
        updated.name = new_name.to_string();
    }
    if sub.get_flag("root") {
        updated.parent_id = None;
    } else if let Some(p) = sub.get_one::<String>("parent") {
        let parent = store::find_category(conn, user, p)?;
        if parent.kind != updated.kind {
            bail!(
                "Category '{}' is {}, its subcategories must be too",
                parent.name,
                parent.kind
            );
        }
        updated.parent_id = Some(parent.id);
    }
    if sub.get_flag("no-color") {
        updated.color = None;
    } else if let Some(c) = sub.get_one::<String>("color") {
        updated.color = Some(parse_color(c)?);
    }

    if updated == current {
        println!("Category '{}' unchanged", current.name);
        return Ok(());
    }
    if updated.parent_id != current.parent_id {
        let moved = forest.with_record(updated.clone());
        if let Err(err) = moved.check_lineage(&updated.id) {
            let reason = match &err {
                IntegrityError::Cycle { id } if *id == updated.id => {
                    "it would sit below one of its own subcategories"
                }
                IntegrityError::Cycle { .. } => "the new parent's lineage has a cycle",
                IntegrityError::TooDeep { .. } => "the hierarchy would become too deep",
            };
            return Err(anyhow::Error::new(err)
                .context(format!("Cannot move '{}': {}", current.name, reason)));
        }
    }
    store::update_category(conn, &updated)?;
    println!("Updated category '{}'", updated.name);
    Ok(())
}
