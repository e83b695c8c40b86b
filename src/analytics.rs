// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Account, Kind, TransactionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

impl Totals {
    pub fn from_transactions<'t, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'t TransactionRecord>,
    {
        let mut t = Totals::default();
        for tx in transactions {
            match tx.kind {
                Kind::Income => t.income += tx.amount,
                Kind::Expense => t.expense += tx.amount,
            }
        }
        t.net = t.income - t.expense;
        t
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyFlow {
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
}

fn month_key(tx: &TransactionRecord) -> String {
    tx.date.format("%Y-%m").to_string()
}

/// Income and expense per calendar month, oldest first, keeping only the
/// last `months` months that have any activity.
pub fn monthly_flows<'t, I>(transactions: I, months: usize) -> Vec<MonthlyFlow>
where
    I: IntoIterator<Item = &'t TransactionRecord>,
{
    let mut map: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for tx in transactions {
        let entry = map
            .entry(month_key(tx))
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        match tx.kind {
            Kind::Income => entry.0 += tx.amount,
            Kind::Expense => entry.1 += tx.amount,
        }
    }
    let skip = map.len().saturating_sub(months);
    map.into_iter()
        .skip(skip)
        .map(|(month, (income, expense))| MonthlyFlow {
            month,
            income,
            expense,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalancePoint {
    pub month: String,
    pub balance: Decimal,
}

/// Month-end running balance of one account, starting from its opening
/// balance, oldest first and limited to the last `months` active months.
pub fn balance_history(
    account: &Account,
    transactions: &[TransactionRecord],
    months: usize,
) -> Vec<BalancePoint> {
    let mut per_month: BTreeMap<String, Decimal> = BTreeMap::new();
    for tx in transactions.iter().filter(|t| t.account_id == account.id) {
        *per_month.entry(month_key(tx)).or_insert(Decimal::ZERO) += tx.signed_amount();
    }
    let mut running = account.opening_balance;
    let points: Vec<BalancePoint> = per_month
        .into_iter()
        .map(|(month, delta)| {
            running += delta;
            BalancePoint {
                month,
                balance: running,
            }
        })
        .collect();
    let skip = points.len().saturating_sub(months);
    points.into_iter().skip(skip).collect()
}

/// Opening balance plus all income minus all expense booked on the account.
pub fn current_balance(account: &Account, transactions: &[TransactionRecord]) -> Decimal {
    account.opening_balance
        + transactions
            .iter()
            .filter(|t| t.account_id == account.id)
            .map(|t| t.signed_amount())
            .sum::<Decimal>()
}
