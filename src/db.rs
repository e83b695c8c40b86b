// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Budgetree", "budgetree"));

/// Overrides the platform data directory when set.
pub const DB_ENV: &str = "BUDGETREE_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("budgetree.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    tracing::debug!(path = %path.display(), "opening database");
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

/// In-memory database with the full schema, for tests and dry runs.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("Open in-memory DB")?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS accounts(
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('checking','savings','credit','cash','investment')),
        currency TEXT NOT NULL,
        opening_balance TEXT NOT NULL DEFAULT '0',
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(user_id, name)
    );

    -- parent_id has no foreign key; a dangling parent reads back as a root.
    CREATE TABLE IF NOT EXISTS categories(
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        color TEXT,
        parent_id TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_categories_parent ON categories(parent_id);
    -- Names are unique among siblings; top-level names once per kind.
    CREATE UNIQUE INDEX IF NOT EXISTS idx_categories_sibling_name
        ON categories(user_id, parent_id, name) WHERE parent_id IS NOT NULL;
    CREATE UNIQUE INDEX IF NOT EXISTS idx_categories_root_name
        ON categories(user_id, type, name) WHERE parent_id IS NULL;

    CREATE TABLE IF NOT EXISTS transactions(
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        account_id TEXT NOT NULL,
        category_id TEXT NOT NULL,
        amount TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        date TEXT NOT NULL,
        description TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(account_id) REFERENCES accounts(id) ON DELETE RESTRICT,
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE RESTRICT
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
    CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category_id);
    "#,
    )?;
    Ok(())
}
