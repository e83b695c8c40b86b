// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Color shown for categories that never had one assigned.
pub const DEFAULT_COLOR: &str = "#6b7280";

/// Income or expense. Shared by categories and transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Income,
    Expense,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Income => "income",
            Kind::Expense => "expense",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Kind::Income),
            "expense" => Ok(Kind::Expense),
            other => Err(anyhow!("Invalid kind '{}', expected income|expense", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Checking,
    Savings,
    Credit,
    Cash,
    Investment,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Checking => "checking",
            AccountKind::Savings => "savings",
            AccountKind::Credit => "credit",
            AccountKind::Cash => "cash",
            AccountKind::Investment => "investment",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "checking" => Ok(AccountKind::Checking),
            "savings" => Ok(AccountKind::Savings),
            "credit" => Ok(AccountKind::Credit),
            "cash" => Ok(AccountKind::Cash),
            "investment" => Ok(AccountKind::Investment),
            other => Err(anyhow!(
                "Invalid account type '{}', expected checking|savings|credit|cash|investment",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub kind: AccountKind,
    pub currency: String,
    pub opening_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub kind: Kind,
    pub color: Option<String>,
    pub parent_id: Option<String>,
}

impl CategoryRecord {
    pub fn display_color(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_COLOR)
    }
}

/// A category together with its children, as handed to renderers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub record: CategoryRecord,
    pub children: Vec<CategoryNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub user_id: String,
    pub account_id: String,
    pub category_id: String,
    pub amount: Decimal,
    pub kind: Kind,
    pub date: NaiveDate,
    pub description: Option<String>,
}

impl TransactionRecord {
    /// Amount with the sign implied by `kind`.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            Kind::Income => self.amount,
            Kind::Expense => -self.amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedBucket {
    pub node_id: String,
    pub display_name: String,
    pub total_amount: Decimal,
    pub color: String,
    pub has_children: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketShare {
    #[serde(flatten)]
    pub bucket: AggregatedBucket,
    pub percentage: Decimal,
}
