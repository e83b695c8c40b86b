// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::error::TreeResult;
use crate::models::{Kind, TransactionRecord};
use crate::tree::{Forest, collect_subtree_ids};

/// Predicate over transactions. Unset fields match everything; date bounds
/// are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub account_id: Option<String>,
    pub category_ids: Option<BTreeSet<String>>,
    pub kind: Option<Kind>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// Match `category_id` and every category below it.
    pub fn category(mut self, category_id: &str, forest: &Forest) -> TreeResult<Self> {
        self.category_ids = Some(collect_subtree_ids(category_id, forest)?);
        Ok(self)
    }

    pub fn kind(mut self, kind: Kind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn between(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn matches(&self, tx: &TransactionRecord) -> bool {
        self.account_id.as_ref().is_none_or(|a| *a == tx.account_id)
            && self
                .category_ids
                .as_ref()
                .is_none_or(|ids| ids.contains(&tx.category_id))
            && self.kind.is_none_or(|k| k == tx.kind)
            && self.start.is_none_or(|s| tx.date >= s)
            && self.end.is_none_or(|e| tx.date <= e)
    }

    pub fn apply(&self, transactions: Vec<TransactionRecord>) -> Vec<TransactionRecord> {
        transactions.into_iter().filter(|t| self.matches(t)).collect()
    }
}
