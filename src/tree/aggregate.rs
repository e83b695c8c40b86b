// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use super::{Forest, ancestry::resolve_position};
use crate::error::TreeResult;
use crate::models::{AggregatedBucket, BucketShare, TransactionRecord};

fn round2(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Roll transactions up to the categories shown at the given drill level.
///
/// Callers pass transactions of a single kind. Each one is credited to the
/// category [`resolve_target`](super::resolve_target) picks for it;
/// transactions without a target are left out. Sums are kept at full
/// precision and rounded to cents only on the way out.
///
/// Buckets come back largest first, ties broken by name and then id.
pub fn aggregate<'t, I>(
    transactions: I,
    forest: &Forest,
    current_parent_id: Option<&str>,
) -> TreeResult<Vec<AggregatedBucket>>
where
    I: IntoIterator<Item = &'t TransactionRecord>,
{
    let mut targets: HashMap<&str, Option<usize>> = HashMap::new();
    let mut sums: HashMap<usize, Decimal> = HashMap::new();
    let mut skipped = 0usize;

    for tx in transactions {
        let target = match targets.get(tx.category_id.as_str()) {
            Some(t) => *t,
            None => {
                let t = resolve_position(&tx.category_id, forest, current_parent_id)?;
                targets.insert(tx.category_id.as_str(), t);
                t
            }
        };
        match target {
            Some(pos) => *sums.entry(pos).or_insert(Decimal::ZERO) += tx.amount,
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!(skipped, ?current_parent_id, "transactions outside the current level");
    }

    let mut totals: Vec<(usize, Decimal)> = sums.into_iter().collect();
    totals.sort_by(|a, b| {
        let ra = forest.record_at(a.0);
        let rb = forest.record_at(b.0);
        b.1.cmp(&a.1)
            .then_with(|| ra.name.cmp(&rb.name))
            .then_with(|| ra.id.cmp(&rb.id))
    });

    Ok(totals
        .into_iter()
        .map(|(pos, total)| {
            let record = forest.record_at(pos);
            AggregatedBucket {
                node_id: record.id.clone(),
                display_name: record.name.clone(),
                total_amount: round2(total),
                color: record.display_color().to_string(),
                has_children: !forest.child_positions(pos).is_empty(),
            }
        })
        .collect())
}

/// Each bucket's share of the combined total, in percent to two places.
///
/// Shares are rounded independently and are not forced to add up to 100.
/// With a zero total every share is zero.
pub fn shares(buckets: &[AggregatedBucket]) -> Vec<BucketShare> {
    let total: Decimal = buckets.iter().map(|b| b.total_amount).sum();
    buckets
        .iter()
        .map(|b| BucketShare {
            bucket: b.clone(),
            percentage: if total.is_zero() {
                Decimal::ZERO
            } else {
                round2(b.total_amount * Decimal::ONE_HUNDRED / total)
            },
        })
        .collect()
}
