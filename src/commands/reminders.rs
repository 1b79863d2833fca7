// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::clock::{Clock, SystemClock};
use crate::dispatch::{Dispatcher, dispatcher_from_settings};
use crate::reminders::{TIMESTAMP_FMT, next_run_after, run_reminder_scan};
use crate::utils::{agent_arg, get_scan_time, maybe_print_json, parse_time, pretty_table};
use anyhow::Result;
use chrono::NaiveTime;
use rusqlite::{Connection, params};
use serde::Serialize;
use tracing::{error, info};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("scan", _)) => {
            let dispatcher = dispatcher_from_settings(conn)?;
            println!("{}", check_reminders(conn, &SystemClock, dispatcher.as_ref())?);
        }
        Some(("watch", sub)) => {
            let dispatcher = dispatcher_from_settings(conn)?;
            let at = match sub.get_one::<String>("at") {
                Some(s) => parse_time(s)?,
                None => get_scan_time(conn)?,
            };
            watch(conn, &SystemClock, dispatcher.as_ref(), at);
        }
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// On-demand scan with a human readable summary.
pub fn check_reminders(
    conn: &Connection,
    clock: &dyn Clock,
    dispatcher: &dyn Dispatcher,
) -> Result<String> {
    let count = run_reminder_scan(conn, clock, dispatcher)?;
    Ok(format!("Check complete. Generated {} alerts.", count))
}

/// Runs the scan once a day at `at`, forever. A failed run is logged and
/// left to the next tick.
pub fn watch(conn: &Connection, clock: &dyn Clock, dispatcher: &dyn Dispatcher, at: NaiveTime) {
    info!(%at, "rental scheduler is running");
    loop {
        let now = clock.now();
        let next = next_run_after(now, at);
        let wait = (next - now).to_std().unwrap_or_default();
        info!(next = %next.format(TIMESTAMP_FMT), "sleeping until next rent check");
        std::thread::sleep(wait);
        match run_reminder_scan(conn, clock, dispatcher) {
            Ok(count) => info!(count, "scheduled rent check finished"),
            Err(e) => error!("scheduled rent check failed: {}", e),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NotificationRow {
    pub id: i64,
    pub lease_id: i64,
    pub kind: String,
    pub message: String,
    pub days_remaining: i64,
    pub is_read: bool,
    pub created_at: String,
}

/// Latest notifications for one agent, newest first.
pub fn latest_notifications(
    conn: &Connection,
    agent_id: i64,
    limit: usize,
) -> Result<Vec<NotificationRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, lease_id, kind, message, days_remaining, is_read, created_at
         FROM notifications WHERE agent_id=?1
         ORDER BY created_at DESC, id DESC LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![agent_id, limit as i64], |r| {
        Ok(NotificationRow {
            id: r.get(0)?,
            lease_id: r.get(1)?,
            kind: r.get(2)?,
            message: r.get(3)?,
            days_remaining: r.get(4)?,
            is_read: r.get(5)?,
            created_at: r.get(6)?,
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let agent_id = agent_arg(conn, sub)?;
    let limit = *sub.get_one::<usize>("limit").unwrap_or(&5);
    let data = latest_notifications(conn, agent_id, limit)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|n| {
                vec![
                    n.created_at.clone(),
                    n.kind.clone(),
                    n.days_remaining.to_string(),
                    n.message.clone(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Created", "Type", "Days", "Message"], rows));
    }
    Ok(())
}
