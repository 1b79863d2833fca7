// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Notification, ReminderKind};
use crate::utils::{WEBHOOK_KEY, get_setting, http_client};
use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;
use tracing::info;

/// A reminder ready to leave the system, addressed to the tenant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundMessage {
    pub to: String,
    pub body: String,
    pub kind: ReminderKind,
    pub lease_id: i64,
    pub days_remaining: i64,
}

/// Tenant-facing text for a milestone, keyed by the exact days remaining.
pub fn outbound_body(days_remaining: i64, tenant_name: &str) -> Option<String> {
    let body = match ReminderKind::for_days(days_remaining)? {
        ReminderKind::Info => format!(
            "Dear {}, your tenancy expires in 90 days. Kindly let us know if you intend to renew.",
            tenant_name
        ),
        ReminderKind::Warning => format!(
            "Dear {}, your rent is due in 30 days. An invoice will be sent to you shortly.",
            tenant_name
        ),
        ReminderKind::Urgent => format!(
            "Dear {}, this is a reminder that your rent is due in 1 week.",
            tenant_name
        ),
        ReminderKind::Critical => format!(
            "Dear {}, your rent is due today. Please make your payment.",
            tenant_name
        ),
    };
    Some(body)
}

pub fn format_outbound(n: &Notification, tenant_phone: &str) -> Option<OutboundMessage> {
    let name = n.tenant_name.as_deref().unwrap_or("Tenant");
    Some(OutboundMessage {
        to: tenant_phone.trim().to_string(),
        body: outbound_body(n.days_remaining, name)?,
        kind: n.kind,
        lease_id: n.lease_id,
        days_remaining: n.days_remaining,
    })
}

pub trait Dispatcher {
    fn dispatch(&self, msg: &OutboundMessage) -> Result<()>;
}

/// Writes outbound reminders to the log only.
#[derive(Debug, Default)]
pub struct LogDispatcher;

impl Dispatcher for LogDispatcher {
    fn dispatch(&self, msg: &OutboundMessage) -> Result<()> {
        info!(to = %msg.to, kind = %msg.kind, lease_id = msg.lease_id, "{}", msg.body);
        Ok(())
    }
}

/// POSTs each reminder as JSON to a configured URL.
pub struct WebhookDispatcher {
    url: String,
    client: reqwest::blocking::Client,
}

impl WebhookDispatcher {
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self {
            url: url.to_string(),
            client: http_client()?,
        })
    }
}

impl Dispatcher for WebhookDispatcher {
    fn dispatch(&self, msg: &OutboundMessage) -> Result<()> {
        self.client
            .post(&self.url)
            .json(msg)
            .send()
            .with_context(|| format!("POST {}", self.url))?
            .error_for_status()?;
        Ok(())
    }
}

/// Webhook dispatcher when `dispatch_webhook` is set, log dispatcher otherwise.
pub fn dispatcher_from_settings(conn: &Connection) -> Result<Box<dyn Dispatcher>> {
    match get_setting(conn, WEBHOOK_KEY)? {
        Some(url) if !url.trim().is_empty() => Ok(Box::new(WebhookDispatcher::new(url.trim())?)),
        _ => Ok(Box::new(LogDispatcher)),
    }
}
