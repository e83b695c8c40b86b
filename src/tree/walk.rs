// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Bounded walks shared by every hierarchy operation.

use std::collections::HashSet;

use super::Forest;
use crate::error::{IntegrityError, TreeResult};

/// Deepest hierarchy accepted, counted in nodes from a root to a leaf.
pub const MAX_DEPTH: usize = 64;

/// Positions from `start` up to its root, `start` first.
pub(crate) fn ancestors(forest: &Forest, start: usize) -> TreeResult<Vec<usize>> {
    let mut chain = vec![start];
    let mut seen = HashSet::from([start]);
    let mut cur = start;
    while let Some(parent) = forest.parent_pos(cur) {
        if !seen.insert(parent) {
            return Err(IntegrityError::Cycle {
                id: forest.record_at(parent).id.clone(),
            });
        }
        if chain.len() == MAX_DEPTH {
            return Err(IntegrityError::TooDeep {
                id: forest.record_at(start).id.clone(),
                limit: MAX_DEPTH,
            });
        }
        chain.push(parent);
        cur = parent;
    }
    Ok(chain)
}

/// `start` and everything below it, in pre-order.
pub(crate) fn descendants(forest: &Forest, start: usize) -> TreeResult<Vec<usize>> {
    Ok(descendants_with_depth(forest, start)?
        .into_iter()
        .map(|(pos, _)| pos)
        .collect())
}

/// Like [`descendants`], paired with the depth below `start` (0 for `start`).
pub(crate) fn descendants_with_depth(
    forest: &Forest,
    start: usize,
) -> TreeResult<Vec<(usize, usize)>> {
    let mut out = Vec::new();
    let mut seen = HashSet::from([start]);
    let mut stack = vec![(start, 0usize)];
    while let Some((pos, depth)) = stack.pop() {
        if depth >= MAX_DEPTH {
            return Err(IntegrityError::TooDeep {
                id: forest.record_at(pos).id.clone(),
                limit: MAX_DEPTH,
            });
        }
        out.push((pos, depth));
        for &child in forest.child_positions(pos).iter().rev() {
            if !seen.insert(child) {
                return Err(IntegrityError::Cycle {
                    id: forest.record_at(child).id.clone(),
                });
            }
            stack.push((child, depth + 1));
        }
    }
    Ok(out)
}
