// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Rent reminder scan.
//!
//! Active leases are checked against four fixed milestones (90, 30, 7 and 0
//! days before the end date). A milestone only fires on the exact day; a day
//! the scan does not run is a milestone missed for good.

use crate::clock::Clock;
use crate::dispatch::{Dispatcher, format_outbound};
use crate::errors::Result;
use crate::models::{Notification, ReminderKind};
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info, warn};

pub const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

impl ReminderKind {
    /// Exact-match classification; any other value yields nothing.
    pub fn for_days(days_remaining: i64) -> Option<Self> {
        match days_remaining {
            90 => Some(ReminderKind::Info),
            30 => Some(ReminderKind::Warning),
            7 => Some(ReminderKind::Urgent),
            0 => Some(ReminderKind::Critical),
            _ => None,
        }
    }

    /// Agent-facing text stored on the notification.
    pub fn message(&self, tenant_name: &str) -> String {
        match self {
            ReminderKind::Info => format!(
                "3 Months Notice: Contract for {} expires in 90 days. Check renewal intent.",
                tenant_name
            ),
            ReminderKind::Warning => format!(
                "1 Month Notice: Rent due in 30 days for {}. Send Invoice.",
                tenant_name
            ),
            ReminderKind::Urgent => format!(
                "Urgent: Rent due in 1 week for {}. Send Reminder.",
                tenant_name
            ),
            ReminderKind::Critical => format!(
                "DUE DATE: Rent is due TODAY for {}. Collect Payment.",
                tenant_name
            ),
        }
    }
}

pub fn days_remaining(end_date: NaiveDate, today: NaiveDate) -> i64 {
    end_date.signed_duration_since(today).num_days()
}

/// Next time the daily scan should fire, strictly after `now`.
pub fn next_run_after(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let today_run = now.date().and_time(at);
    if now < today_run {
        return today_run;
    }
    let tomorrow = now.date().checked_add_days(Days::new(1)).unwrap_or(now.date());
    tomorrow.and_time(at)
}

struct ActiveLease {
    id: i64,
    agent_id: i64,
    end_date: String,
    tenant_name: Option<String>,
    tenant_phone: Option<String>,
}

fn load_active_leases(conn: &Connection) -> Result<Vec<ActiveLease>> {
    let mut stmt = conn.prepare(
        "SELECT l.id, l.agent_id, l.end_date, t.name, t.phone
         FROM leases l
         LEFT JOIN tenants t ON l.tenant_id=t.id
         WHERE l.status='Active'
         ORDER BY l.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(ActiveLease {
            id: r.get(0)?,
            agent_id: r.get(1)?,
            end_date: r.get(2)?,
            tenant_name: r.get(3)?,
            tenant_phone: r.get(4)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn notified_since(conn: &Connection, lease_id: i64, since: NaiveDateTime) -> Result<bool> {
    let hit: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM notifications WHERE lease_id=?1 AND created_at>=?2 LIMIT 1",
            params![lease_id, since.format(TIMESTAMP_FMT).to_string()],
            |r| r.get(0),
        )
        .optional()?;
    Ok(hit.is_some())
}

/// Creates the reminder notifications due today and returns how many were
/// created. Re-running on the same day creates none. Malformed leases are
/// skipped; store failures abort the whole run.
pub fn run_reminder_scan(
    conn: &Connection,
    clock: &dyn Clock,
    dispatcher: &dyn Dispatcher,
) -> Result<usize> {
    let now = clock.now();
    let today = now.date();
    let midnight = today.and_time(NaiveTime::MIN);
    info!(%today, "running rent check");

    let leases = load_active_leases(conn)?;
    let mut count = 0usize;

    for lease in leases {
        let end_date = match NaiveDate::parse_from_str(lease.end_date.trim(), "%Y-%m-%d") {
            Ok(d) => d,
            Err(e) => {
                warn!(lease_id = lease.id, end_date = %lease.end_date, "skipping lease with bad end date: {}", e);
                continue;
            }
        };
        let Some(tenant_name) = lease.tenant_name else {
            warn!(lease_id = lease.id, "skipping lease without tenant");
            continue;
        };

        let days = days_remaining(end_date, today);
        let Some(kind) = ReminderKind::for_days(days) else {
            continue;
        };

        if notified_since(conn, lease.id, midnight)? {
            debug!(lease_id = lease.id, "already notified today");
            continue;
        }

        let message = kind.message(&tenant_name);
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO notifications(agent_id, lease_id, kind, message, tenant_name, days_remaining, is_read, scan_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?8)",
            params![
                lease.agent_id,
                lease.id,
                kind.as_str(),
                message,
                tenant_name,
                days,
                today.to_string(),
                now.format(TIMESTAMP_FMT).to_string()
            ],
        )?;
        if inserted == 0 {
            debug!(lease_id = lease.id, "notification raced by another scan");
            continue;
        }
        count += 1;

        let notification = Notification {
            id: conn.last_insert_rowid(),
            agent_id: lease.agent_id,
            lease_id: lease.id,
            kind,
            message,
            tenant_name: Some(tenant_name),
            days_remaining: days,
            is_read: false,
            scan_date: today,
            created_at: now,
        };
        let phone = lease.tenant_phone.unwrap_or_default();
        if let Some(outbound) = format_outbound(&notification, &phone) {
            if let Err(e) = dispatcher.dispatch(&outbound) {
                warn!(lease_id = lease.id, "reminder dispatch failed: {:#}", e);
            }
        }
    }

    info!(count, "generated notifications");
    Ok(count)
}
