// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tracing::trace;

use super::{Forest, walk};
use crate::error::TreeResult;

/// The category that should be credited for a transaction booked on
/// `category_id` when the chart shows the children of `current_parent_id`.
///
/// - `None` shows the top level: the target is the root of the category's
///   lineage (a root credits itself).
/// - `Some(p)` shows the children of `p`: the target is whichever of the
///   category and its ancestors sits directly below `p`.
///
/// `Ok(None)` means the transaction does not belong in this view: the
/// category is unknown, sits on an unrelated branch, or is `p` itself.
/// A lineage that loops or runs deeper than [`MAX_DEPTH`](super::MAX_DEPTH)
/// is an error even when a target would have been found before the loop.
pub fn resolve_target<'f>(
    category_id: &str,
    forest: &'f Forest,
    current_parent_id: Option<&str>,
) -> TreeResult<Option<&'f str>> {
    Ok(resolve_position(category_id, forest, current_parent_id)?
        .map(|pos| forest.record_at(pos).id.as_str()))
}

pub(crate) fn resolve_position(
    category_id: &str,
    forest: &Forest,
    current_parent_id: Option<&str>,
) -> TreeResult<Option<usize>> {
    let Some(start) = forest.position(category_id) else {
        trace!(category_id, "category not in forest");
        return Ok(None);
    };
    let chain = walk::ancestors(forest, start)?;

    let target = match current_parent_id {
        None => chain.last().copied(),
        Some(anchor) => chain.iter().copied().find(|&pos| {
            forest
                .parent_pos(pos)
                .is_some_and(|p| forest.record_at(p).id == anchor)
        }),
    };
    if target.is_none() {
        trace!(category_id, ?current_parent_id, "no target at this level");
    }
    Ok(target)
}
