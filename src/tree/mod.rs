// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Category hierarchy: building, walking and aggregating over a forest of
//! parent-referenced category records.
//!
//! Everything in here is a pure function of its inputs. A [`Forest`] is
//! rebuilt from flat records whenever the records change and never mutated
//! in place, so the same forest can be shared across threads freely.

mod aggregate;
mod ancestry;
mod builder;
mod colors;
mod flatten;
mod subtree;
mod walk;

use std::collections::HashMap;

pub use aggregate::{aggregate, shares};
pub use ancestry::resolve_target;
pub use builder::build_tree;
pub use colors::{color_variant, disambiguate_colors};
pub use flatten::{flatten_tree, flatten_with_depth};
pub use subtree::collect_subtree_ids;
pub use walk::MAX_DEPTH;

use crate::error::{IntegrityError, TreeResult};
use crate::models::{CategoryNode, CategoryRecord};

/// Categories linked by parent references.
///
/// Nodes live in an arena indexed by position; `parent` and `children` hold
/// positions into it. Records whose parent chain loops are kept in the arena
/// but are not reachable from any root.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    records: Vec<CategoryRecord>,
    index: HashMap<String, usize>,
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
}

impl Forest {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&CategoryRecord> {
        self.position(id).map(|pos| &self.records[pos])
    }

    /// All records, in the order they were given to [`build_tree`].
    pub fn records(&self) -> &[CategoryRecord] {
        &self.records
    }

    pub fn roots(&self) -> impl Iterator<Item = &CategoryRecord> + '_ {
        self.roots.iter().map(|&pos| &self.records[pos])
    }

    pub fn children_of(&self, id: &str) -> impl Iterator<Item = &CategoryRecord> + '_ {
        self.position(id)
            .map(|pos| self.children[pos].as_slice())
            .unwrap_or_default()
            .iter()
            .map(|&pos| &self.records[pos])
    }

    pub fn has_children(&self, id: &str) -> bool {
        self.position(id)
            .is_some_and(|pos| !self.children[pos].is_empty())
    }

    /// The resolved parent. `None` for roots, including records whose
    /// `parent_id` points at a category that is not in the forest.
    pub fn parent_of(&self, id: &str) -> Option<&CategoryRecord> {
        let pos = self.position(id)?;
        self.parent[pos].map(|p| &self.records[p])
    }

    /// Number of levels above `id`; roots are at depth 0.
    pub fn depth_of(&self, id: &str) -> TreeResult<Option<usize>> {
        match self.position(id) {
            Some(pos) => Ok(Some(walk::ancestors(self, pos)?.len() - 1)),
            None => Ok(None),
        }
    }

    /// Names from the root down to `id`, e.g. `["Housing", "Utilities", "Power"]`.
    pub fn path_of(&self, id: &str) -> TreeResult<Vec<&str>> {
        let Some(pos) = self.position(id) else {
            return Ok(Vec::new());
        };
        let chain = walk::ancestors(self, pos)?;
        Ok(chain
            .iter()
            .rev()
            .map(|&p| self.records[p].name.as_str())
            .collect())
    }

    /// Fails on the first category whose lineage loops or runs too deep.
    pub fn check_integrity(&self) -> TreeResult<()> {
        for pos in 0..self.records.len() {
            walk::ancestors(self, pos)?;
        }
        Ok(())
    }

    /// Checks only the hierarchy around `id`: its own lineage must reach a
    /// root, and its deepest descendant must stay within [`MAX_DEPTH`].
    /// Problems elsewhere in the forest are ignored.
    pub fn check_lineage(&self, id: &str) -> TreeResult<()> {
        let Some(pos) = self.position(id) else {
            return Ok(());
        };
        let above = walk::ancestors(self, pos)?.len();
        for (below, depth) in walk::descendants_with_depth(self, pos)? {
            if above + depth > MAX_DEPTH {
                return Err(IntegrityError::TooDeep {
                    id: self.records[below].id.clone(),
                    limit: MAX_DEPTH,
                });
            }
        }
        Ok(())
    }

    /// Every distinct integrity problem, for diagnostics.
    pub fn integrity_issues(&self) -> Vec<IntegrityError> {
        let mut issues: Vec<IntegrityError> = Vec::new();
        for pos in 0..self.records.len() {
            if let Err(e) = walk::ancestors(self, pos) {
                if !issues.contains(&e) {
                    issues.push(e);
                }
            }
        }
        issues
    }

    /// Records whose `parent_id` names a category that is not in the forest.
    pub fn dangling(&self) -> impl Iterator<Item = &CategoryRecord> + '_ {
        self.records.iter().filter(|r| {
            r.parent_id
                .as_deref()
                .is_some_and(|pid| !self.index.contains_key(pid))
        })
    }

    /// Nested nodes for rendering, roots in input order.
    pub fn to_nodes(&self) -> TreeResult<Vec<CategoryNode>> {
        let mut built: Vec<Option<CategoryNode>> = vec![None; self.records.len()];
        for &root in &self.roots {
            let order = walk::descendants(self, root)?;
            // Children come after their parent in pre-order, so walking it
            // backwards always finds them already built.
            for &pos in order.iter().rev() {
                let children = self.children[pos]
                    .iter()
                    .filter_map(|&c| built[c].take())
                    .collect();
                built[pos] = Some(CategoryNode {
                    record: self.records[pos].clone(),
                    children,
                });
            }
        }
        Ok(self
            .roots
            .iter()
            .filter_map(|&root| built[root].take())
            .collect())
    }

    /// A new forest with `record` inserted, or replacing the record with the
    /// same id.
    pub fn with_record(&self, record: CategoryRecord) -> Forest {
        let mut records = self.records.clone();
        match self.position(&record.id) {
            Some(pos) => records[pos] = record,
            None => records.push(record),
        }
        build_tree(records)
    }

    /// A new forest without the record `id`. Its children become roots.
    pub fn without(&self, id: &str) -> Forest {
        build_tree(self.records.iter().filter(|r| r.id != id).cloned())
    }

    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub(crate) fn record_at(&self, pos: usize) -> &CategoryRecord {
        &self.records[pos]
    }

    pub(crate) fn parent_pos(&self, pos: usize) -> Option<usize> {
        self.parent[pos]
    }

    pub(crate) fn child_positions(&self, pos: usize) -> &[usize] {
        &self.children[pos]
    }

    pub(crate) fn root_positions(&self) -> &[usize] {
        &self.roots
    }
}
