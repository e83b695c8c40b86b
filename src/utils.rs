// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

pub const DEFAULT_USER: &str = "local";

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Non-negative amount; the sign of a transaction lives in its kind.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d.is_sign_negative() && !d.is_zero() {
        anyhow::bail!(
            "Amount '{}' must not be negative; use --kind to record income or expense",
            s
        );
    }
    Ok(d)
}

/// `#rgb` or `#rrggbb`, normalised to lower case.
pub fn parse_color(s: &str) -> Result<String> {
    let t = s.trim();
    let ok = t.strip_prefix('#').is_some_and(|hex| {
        (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
    });
    if !ok {
        anyhow::bail!("Invalid color '{}', expected #rgb or #rrggbb", s);
    }
    Ok(t.to_lowercase())
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {:.2}", ccy, d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn get_current_user(conn: &Connection) -> Result<String> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='current_user'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v.unwrap_or_else(|| DEFAULT_USER.to_string()))
}

pub fn set_current_user(conn: &Connection, user: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('current_user', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![user],
    )?;
    Ok(())
}

/// First and last day of a `YYYY-MM` month.
pub fn month_bounds(month: &str) -> Result<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", month))?;
    let next = start
        .checked_add_months(chrono::Months::new(1))
        .with_context(|| format!("Invalid month '{}'", month))?;
    let end = next
        .pred_opt()
        .with_context(|| format!("Invalid month '{}'", month))?;
    Ok((start, end))
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
