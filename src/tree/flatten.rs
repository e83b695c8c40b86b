// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Forest, walk};
use crate::error::{IntegrityError, TreeResult};
use crate::models::CategoryRecord;

/// Flat records back out of a forest: each root followed by its subtree,
/// depth first, children in the order they were attached.
///
/// Feeding the result back into [`build_tree`](super::build_tree) yields the
/// same forest. Records stuck in a parent loop cannot be reached from a root
/// and are reported rather than dropped.
pub fn flatten_tree(forest: &Forest) -> TreeResult<Vec<CategoryRecord>> {
    Ok(flatten_with_depth(forest)?
        .into_iter()
        .map(|(_, record)| record.clone())
        .collect())
}

/// Same order as [`flatten_tree`], borrowing each record along with its
/// depth (roots at 0). Used to print indented trees.
pub fn flatten_with_depth(forest: &Forest) -> TreeResult<Vec<(usize, &CategoryRecord)>> {
    let mut out = Vec::with_capacity(forest.len());
    for &root in forest.root_positions() {
        for (pos, depth) in walk::descendants_with_depth(forest, root)? {
            out.push((depth, forest.record_at(pos)));
        }
    }

    if out.len() < forest.len() {
        let mut reached = vec![false; forest.len()];
        for &root in forest.root_positions() {
            for pos in walk::descendants(forest, root)? {
                reached[pos] = true;
            }
        }
        if let Some(lost) = reached.iter().position(|r| !r) {
            // Only a loop can cut a record off from every root; the walk up
            // names the category where it closes.
            walk::ancestors(forest, lost)?;
            return Err(IntegrityError::Cycle {
                id: forest.record_at(lost).id.clone(),
            });
        }
    }
    Ok(out)
}
