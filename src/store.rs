// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Record storage for accounts, categories and transactions, scoped to a
//! user id.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::models::{Account, CategoryRecord, TransactionRecord};
use crate::tree::{Forest, build_tree};

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn parse_amount(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid stored amount '{}'", s))
}

fn parse_stored_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid stored date '{}'", s))
}

// Accounts

pub fn insert_account(conn: &Connection, account: &Account) -> Result<()> {
    conn.execute(
        "INSERT INTO accounts(id, user_id, name, type, currency, opening_balance)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            account.id,
            account.user_id,
            account.name,
            account.kind.as_str(),
            account.currency,
            account.opening_balance.to_string()
        ],
    )
    .with_context(|| format!("Could not add account '{}'", account.name))?;
    Ok(())
}

pub fn list_accounts(conn: &Connection, user_id: &str) -> Result<Vec<Account>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, type, currency, opening_balance FROM accounts
         WHERE user_id=?1 ORDER BY name",
    )?;
    let mut rows = stmt.query(params![user_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let kind: String = r.get(2)?;
        let opening: String = r.get(4)?;
        out.push(Account {
            id: r.get(0)?,
            user_id: user_id.to_string(),
            name: r.get(1)?,
            kind: kind.parse()?,
            currency: r.get(3)?,
            opening_balance: parse_amount(&opening)?,
        });
    }
    Ok(out)
}

pub fn find_account(conn: &Connection, user_id: &str, name: &str) -> Result<Account> {
    list_accounts(conn, user_id)?
        .into_iter()
        .find(|a| a.name == name || a.id == name)
        .with_context(|| format!("Account '{}' not found", name))
}

/// Refused while any transaction is booked against the account.
pub fn delete_account(conn: &Connection, user_id: &str, id: &str) -> Result<()> {
    let used: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE user_id=?1 AND account_id=?2",
        params![user_id, id],
        |r| r.get(0),
    )?;
    if used > 0 {
        bail!("Account still has {} transaction(s); remove them first", used);
    }
    conn.execute(
        "DELETE FROM accounts WHERE user_id=?1 AND id=?2",
        params![user_id, id],
    )?;
    Ok(())
}

// Categories

pub fn insert_category(conn: &Connection, category: &CategoryRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO categories(id, user_id, name, type, color, parent_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            category.id,
            category.user_id,
            category.name,
            category.kind.as_str(),
            category.color,
            category.parent_id
        ],
    )
    .with_context(|| format!("Could not add category '{}'", category.name))?;
    Ok(())
}

pub fn update_category(conn: &Connection, category: &CategoryRecord) -> Result<()> {
    let n = conn.execute(
        "UPDATE categories SET name=?1, type=?2, color=?3, parent_id=?4
         WHERE user_id=?5 AND id=?6",
        params![
            category.name,
            category.kind.as_str(),
            category.color,
            category.parent_id,
            category.user_id,
            category.id
        ],
    )
    .with_context(|| format!("Could not update category '{}'", category.name))?;
    if n == 0 {
        bail!("Category '{}' not found", category.name);
    }
    Ok(())
}

/// All of a user's categories, ordered by name.
pub fn list_categories(conn: &Connection, user_id: &str) -> Result<Vec<CategoryRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, type, color, parent_id FROM categories
         WHERE user_id=?1 ORDER BY name",
    )?;
    let mut rows = stmt.query(params![user_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let kind: String = r.get(2)?;
        out.push(CategoryRecord {
            id: r.get(0)?,
            user_id: user_id.to_string(),
            name: r.get(1)?,
            kind: kind.parse()?,
            color: r.get(3)?,
            parent_id: r.get(4)?,
        });
    }
    Ok(out)
}

/// Look a category up by id, by name, or by a `Parent/Child` path. A name or
/// path shared by several categories is an error listing the full paths.
pub fn find_category(conn: &Connection, user_id: &str, name: &str) -> Result<CategoryRecord> {
    let name = name.trim();
    let records = list_categories(conn, user_id)?;
    if let Some(c) = records.iter().find(|c| c.id == name) {
        return Ok(c.clone());
    }
    let forest = build_tree(records);
    let wanted: Vec<&str> = name.split('/').map(str::trim).collect();
    let found: Vec<&CategoryRecord> = forest
        .records()
        .iter()
        .filter(|c| lineage(&forest, c).ends_with(&wanted))
        .collect();
    match found.as_slice() {
        [] => bail!("Category '{}' not found", name),
        [one] => Ok((*one).clone()),
        many => {
            let paths: Vec<String> = many
                .iter()
                .map(|c| format!("{} ({})", lineage(&forest, c).join("/"), c.kind))
                .collect();
            bail!(
                "Category '{}' is ambiguous: {}; use its full path or id",
                name,
                paths.join(", ")
            )
        }
    }
}

/// Names from the root down; a record on a broken lineage is just its name.
fn lineage<'f>(forest: &'f Forest, c: &'f CategoryRecord) -> Vec<&'f str> {
    forest
        .path_of(&c.id)
        .unwrap_or_else(|_| vec![c.name.as_str()])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryUsage {
    pub transactions: i64,
    pub children: usize,
}

impl CategoryUsage {
    pub fn is_unused(&self) -> bool {
        self.transactions == 0 && self.children == 0
    }
}

pub fn category_usage(conn: &Connection, user_id: &str, id: &str) -> Result<CategoryUsage> {
    let transactions: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE user_id=?1 AND category_id=?2",
        params![user_id, id],
        |r| r.get(0),
    )?;
    let forest = build_tree(list_categories(conn, user_id)?);
    Ok(CategoryUsage {
        transactions,
        children: forest.children_of(id).count(),
    })
}

/// Refused while transactions or child categories still reference it.
pub fn delete_category(conn: &Connection, user_id: &str, id: &str) -> Result<()> {
    let usage = category_usage(conn, user_id, id)?;
    if usage.children > 0 {
        bail!(
            "Category has {} child categor{}; move or delete them first",
            usage.children,
            if usage.children == 1 { "y" } else { "ies" }
        );
    }
    if usage.transactions > 0 {
        bail!(
            "Category is used by {} transaction(s); reassign or delete them first",
            usage.transactions
        );
    }
    conn.execute(
        "DELETE FROM categories WHERE user_id=?1 AND id=?2",
        params![user_id, id],
    )?;
    Ok(())
}

// Transactions

pub fn insert_transaction(conn: &Connection, tx: &TransactionRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO transactions(id, user_id, account_id, category_id, amount, type, date, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            tx.id,
            tx.user_id,
            tx.account_id,
            tx.category_id,
            tx.amount.to_string(),
            tx.kind.as_str(),
            tx.date.to_string(),
            tx.description
        ],
    )
    .context("Could not record transaction")?;
    Ok(())
}

/// All of a user's transactions, newest first.
pub fn list_transactions(conn: &Connection, user_id: &str) -> Result<Vec<TransactionRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, account_id, category_id, amount, type, date, description
         FROM transactions WHERE user_id=?1
         ORDER BY date DESC, rowid DESC",
    )?;
    let mut rows = stmt.query(params![user_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let amount: String = r.get(3)?;
        let kind: String = r.get(4)?;
        let date: String = r.get(5)?;
        out.push(TransactionRecord {
            id: r.get(0)?,
            user_id: user_id.to_string(),
            account_id: r.get(1)?,
            category_id: r.get(2)?,
            amount: parse_amount(&amount)?,
            kind: kind.parse()?,
            date: parse_stored_date(&date)?,
            description: r.get(6)?,
        });
    }
    Ok(out)
}

pub fn delete_transaction(conn: &Connection, user_id: &str, id: &str) -> Result<()> {
    let found: Option<String> = conn
        .query_row(
            "SELECT id FROM transactions WHERE user_id=?1 AND id=?2",
            params![user_id, id],
            |r| r.get(0),
        )
        .optional()?;
    if found.is_none() {
        bail!("Transaction '{}' not found", id);
    }
    conn.execute(
        "DELETE FROM transactions WHERE user_id=?1 AND id=?2",
        params![user_id, id],
    )?;
    Ok(())
}
