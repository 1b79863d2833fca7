// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, NaiveTime};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use rust_decimal::Decimal;

const UA: &str = concat!(
    "leasedesk/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/leasedesk)"
);

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 ()\-]{5,19}$").expect("phone regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .with_context(|| format!("Invalid time '{}', expected HH:MM", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Parses a monetary amount, rejecting negatives.
pub fn parse_money(s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d.is_sign_negative() && !d.is_zero() {
        return Err(anyhow!("Amount '{}' must not be negative", s.trim()));
    }
    Ok(d)
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn validate_phone(s: &str) -> Result<String> {
    let p = s.trim();
    if !PHONE_RE.is_match(p) {
        return Err(anyhow!("Invalid phone number '{}'", p));
    }
    Ok(p.to_string())
}

pub fn validate_email(s: &str) -> Result<String> {
    let e = s.trim();
    if !EMAIL_RE.is_match(e) {
        return Err(anyhow!("Invalid email '{}'", e));
    }
    Ok(e.to_lowercase())
}

/// Trimmed optional argument; blank values count as absent.
pub fn opt_arg(m: &clap::ArgMatches, id: &str) -> Option<String> {
    m.get_one::<String>(id)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

pub fn req_arg(m: &clap::ArgMatches, id: &str) -> Result<String> {
    opt_arg(m, id).ok_or_else(|| anyhow!("--{} must not be empty", id.replace('_', "-")))
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

pub fn id_for_agent(conn: &Connection, email: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM agents WHERE email=?1")?;
    let id: i64 = stmt
        .query_row(params![email.trim().to_lowercase()], |r| r.get(0))
        .with_context(|| format!("Agent '{}' not found", email.trim()))?;
    Ok(id)
}

/// Resolves the `--agent` argument every entity command carries.
pub fn agent_arg(conn: &Connection, m: &clap::ArgMatches) -> Result<i64> {
    let email = req_arg(m, "agent")?;
    id_for_agent(conn, &email)
}

/// Checks that `id` in `table` belongs to `agent_id`.
pub fn ensure_owned(conn: &Connection, table: &str, id: i64, agent_id: i64) -> Result<()> {
    let sql = format!("SELECT 1 FROM {} WHERE id=?1 AND agent_id=?2", table);
    let found: Option<i64> = conn
        .query_row(&sql, params![id, agent_id], |r| r.get(0))
        .optional()?;
    if found.is_none() {
        return Err(anyhow!("{} {} not found", singular(table), id));
    }
    Ok(())
}

fn singular(table: &str) -> &str {
    match table {
        "properties" => "Property",
        "apartments" => "Apartment",
        "landlords" => "Landlord",
        "tenants" => "Tenant",
        "leases" => "Lease",
        other => other,
    }
}

/// Applies the non-empty `changes` to one agent-owned row.
pub fn update_columns(
    conn: &Connection,
    table: &str,
    id: i64,
    agent_id: i64,
    changes: &[(&str, Option<String>)],
) -> Result<usize> {
    let set: Vec<(&str, &String)> = changes
        .iter()
        .filter_map(|(col, v)| v.as_ref().map(|v| (*col, v)))
        .collect();
    if set.is_empty() {
        return Err(anyhow!("Nothing to update"));
    }
    let assignments: Vec<String> = set
        .iter()
        .enumerate()
        .map(|(i, (col, _))| format!("{}=?{}", col, i + 1))
        .collect();
    let sql = format!(
        "UPDATE {} SET {} WHERE id=?{} AND agent_id=?{}",
        table,
        assignments.join(", "),
        set.len() + 1,
        set.len() + 2
    );
    let mut values: Vec<&dyn rusqlite::ToSql> = set
        .iter()
        .map(|(_, v)| *v as &dyn rusqlite::ToSql)
        .collect();
    values.push(&id);
    values.push(&agent_id);
    let n = conn.execute(&sql, params_from_iter(values))?;
    if n == 0 {
        return Err(anyhow!("{} {} not found", singular(table), id));
    }
    Ok(n)
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub const SCAN_TIME_KEY: &str = "scan_time";
pub const WEBHOOK_KEY: &str = "dispatch_webhook";
pub const DEFAULT_SCAN_TIME: &str = "07:00";

/// Wall-clock time of the daily reminder scan.
pub fn get_scan_time(conn: &Connection) -> Result<NaiveTime> {
    let v = get_setting(conn, SCAN_TIME_KEY)?;
    parse_time(v.as_deref().unwrap_or(DEFAULT_SCAN_TIME))
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
        // If v is an array, stream each element; else stream single line
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
