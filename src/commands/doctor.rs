// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::IntegrityError;
use crate::store;
use crate::tree::build_tree;
use crate::utils::{get_current_user, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use std::collections::HashMap;

/// Problems in the current user's data, one `[issue, detail]` row each.
pub fn diagnose(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let user = get_current_user(conn)?;
    let records = store::list_categories(conn, &user)?;
    let forest = build_tree(records);
    let names: HashMap<&str, &str> = forest
        .records()
        .iter()
        .map(|r| (r.id.as_str(), r.name.as_str()))
        .collect();
    let name_of = |id: &str| names.get(id).copied().unwrap_or(id).to_string();
    let mut rows = Vec::new();

    // 1) Parent chains that loop or run too deep
    for issue in forest.integrity_issues() {
        let label = match issue {
            IntegrityError::Cycle { .. } => "category_cycle",
            IntegrityError::TooDeep { .. } => "category_too_deep",
        };
        rows.push(vec![label.into(), name_of(issue.category_id())]);
    }

    // 2) Parents that no longer exist; these show up as top-level
    for r in forest.dangling() {
        rows.push(vec![
            "dangling_parent".into(),
            format!("{} -> {}", r.name, r.parent_id.as_deref().unwrap_or_default()),
        ]);
    }

    // 3) Subcategories of the other kind
    for r in forest.records() {
        if let Some(parent) = forest.parent_of(&r.id) {
            if parent.kind != r.kind {
                rows.push(vec![
                    "kind_mismatch".into(),
                    format!("{} ({}) under {} ({})", r.name, r.kind, parent.name, parent.kind),
                ]);
            }
        }
    }

    // 4) Transactions whose kind differs from their category's
    for tx in store::list_transactions(conn, &user)? {
        match forest.get(&tx.category_id) {
            Some(c) if c.kind != tx.kind => rows.push(vec![
                "txn_kind_mismatch".into(),
                format!("{} {} in {} ({})", tx.date, tx.kind, c.name, c.kind),
            ]),
            Some(_) => {}
            None => rows.push(vec![
                "txn_unknown_category".into(),
                format!("{} {}", tx.date, tx.category_id),
            ]),
        }
    }
    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = diagnose(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        tracing::warn!(issues = rows.len(), "doctor found problems");
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
