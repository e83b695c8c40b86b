// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;

use super::{Forest, walk};
use crate::error::TreeResult;

/// `category_id` and the ids of all its descendants.
///
/// An id that is not in the forest yields a set holding just that id, so a
/// filter built from it still matches transactions booked on it directly.
pub fn collect_subtree_ids(category_id: &str, forest: &Forest) -> TreeResult<BTreeSet<String>> {
    let Some(start) = forest.position(category_id) else {
        return Ok(BTreeSet::from([category_id.to_string()]));
    };
    Ok(walk::descendants(forest, start)?
        .into_iter()
        .map(|pos| forest.record_at(pos).id.clone())
        .collect())
}
