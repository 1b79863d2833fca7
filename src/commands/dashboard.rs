// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::reminders::{NotificationRow, latest_notifications};
use crate::utils::{agent_arg, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub tenants: i64,
    pub properties: i64,
    pub vacant: i64,
    pub leases: i64,
    pub notifications: Vec<NotificationRow>,
}

pub fn dashboard_stats(conn: &Connection, agent_id: i64) -> Result<DashboardStats> {
    let count = |sql: &str| -> Result<i64> {
        Ok(conn.query_row(sql, params![agent_id], |r| r.get(0))?)
    };
    Ok(DashboardStats {
        tenants: count("SELECT COUNT(*) FROM tenants WHERE agent_id=?1")?,
        properties: count("SELECT COUNT(*) FROM properties WHERE agent_id=?1")?,
        vacant: count("SELECT COUNT(*) FROM apartments WHERE agent_id=?1 AND status='Vacant'")?,
        leases: count("SELECT COUNT(*) FROM leases WHERE agent_id=?1 AND status='Active'")?,
        notifications: latest_notifications(conn, agent_id, 5)?,
    })
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let agent_id = agent_arg(conn, m)?;
    let stats = dashboard_stats(conn, agent_id)?;
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &stats)? {
        return Ok(());
    }
    println!(
        "{}",
        pretty_table(
            &["Tenants", "Buildings", "Vacant units", "Active leases"],
            vec![vec![
                stats.tenants.to_string(),
                stats.properties.to_string(),
                stats.vacant.to_string(),
                stats.leases.to_string(),
            ]],
        )
    );
    if stats.notifications.is_empty() {
        println!("No recent alerts.");
    } else {
        let rows = stats
            .notifications
            .iter()
            .map(|n| vec![n.kind.clone(), n.days_remaining.to_string(), n.message.clone()])
            .collect();
        println!("{}", pretty_table(&["Type", "Days", "Alert"], rows));
    }
    Ok(())
}
