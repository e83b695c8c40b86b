// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tracing::{debug, warn};

use super::Forest;
use crate::models::CategoryRecord;

/// Link flat category records into a forest.
///
/// A record whose `parent_id` is `None`, or names an id that is not among
/// `records`, becomes a root. Dangling parents are not an error. A repeated
/// id replaces the earlier record in place.
///
/// Building never fails: a loop in the parent references leaves its members
/// attached to each other and unreachable from the roots, where the walks in
/// this module report it.
pub fn build_tree<I>(records: I) -> Forest
where
    I: IntoIterator<Item = CategoryRecord>,
{
    let mut forest = Forest::default();
    for record in records {
        match forest.index.get(&record.id) {
            Some(&pos) => {
                warn!(id = %record.id, "duplicate category id, keeping the later record");
                forest.records[pos] = record;
            }
            None => {
                forest.index.insert(record.id.clone(), forest.records.len());
                forest.records.push(record);
            }
        }
    }

    let n = forest.records.len();
    forest.parent = vec![None; n];
    forest.children = vec![Vec::new(); n];

    for pos in 0..n {
        let record = &forest.records[pos];
        let parent = match record.parent_id.as_deref() {
            Some(pid) => {
                let found = forest.index.get(pid).copied();
                if found.is_none() {
                    debug!(id = %record.id, parent_id = pid, "parent not found, treating as root");
                }
                found
            }
            None => None,
        };
        match parent {
            Some(p) => {
                forest.parent[pos] = Some(p);
                forest.children[p].push(pos);
            }
            None => forest.roots.push(pos),
        }
    }
    forest
}
