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
    Lazy::new(|| ("com.alphavelocity", "Leasedesk", "leasedesk"));

/// Environment variable that overrides the platform data dir location.
pub const DB_ENV: &str = "LEASEDESK_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("leasedesk.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
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

    CREATE TABLE IF NOT EXISTS agents(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS landlords(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        agent_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        phone TEXT NOT NULL,
        email TEXT,
        bank_name TEXT,
        account_number TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(agent_id) REFERENCES agents(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS properties(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        agent_id INTEGER NOT NULL,
        landlord_id INTEGER NOT NULL,
        title TEXT NOT NULL,
        address TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(agent_id) REFERENCES agents(id) ON DELETE CASCADE,
        FOREIGN KEY(landlord_id) REFERENCES landlords(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS apartments(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        agent_id INTEGER NOT NULL,
        property_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        rent_price TEXT NOT NULL,
        agency_fee TEXT NOT NULL DEFAULT '0',
        legal_fee TEXT NOT NULL DEFAULT '0',
        caution_fee TEXT NOT NULL DEFAULT '0',
        status TEXT NOT NULL DEFAULT 'Vacant' CHECK(status IN ('Vacant','Occupied')),
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(agent_id) REFERENCES agents(id) ON DELETE CASCADE,
        FOREIGN KEY(property_id) REFERENCES properties(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_apartments_property ON apartments(property_id);

    CREATE TABLE IF NOT EXISTS tenants(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        agent_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        phone TEXT NOT NULL,
        email TEXT,
        address TEXT,
        passport_url TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(agent_id) REFERENCES agents(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS leases(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        agent_id INTEGER NOT NULL,
        apartment_id INTEGER NOT NULL,
        tenant_id INTEGER,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        rent_amount TEXT NOT NULL,
        agency_fee TEXT NOT NULL DEFAULT '0',
        legal_fee TEXT NOT NULL DEFAULT '0',
        caution_fee TEXT NOT NULL DEFAULT '0',
        total_package TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'Active' CHECK(status IN ('Active','Terminated')),
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(agent_id) REFERENCES agents(id) ON DELETE CASCADE,
        FOREIGN KEY(apartment_id) REFERENCES apartments(id) ON DELETE CASCADE,
        FOREIGN KEY(tenant_id) REFERENCES tenants(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_leases_status ON leases(status);

    -- one reminder per lease per scan day
    CREATE TABLE IF NOT EXISTS notifications(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        agent_id INTEGER NOT NULL,
        lease_id INTEGER NOT NULL,
        kind TEXT NOT NULL,
        message TEXT NOT NULL,
        tenant_name TEXT,
        days_remaining INTEGER NOT NULL,
        is_read INTEGER NOT NULL DEFAULT 0,
        scan_date TEXT NOT NULL,
        created_at TEXT NOT NULL,
        UNIQUE(lease_id, scan_date),
        FOREIGN KEY(agent_id) REFERENCES agents(id) ON DELETE CASCADE,
        FOREIGN KEY(lease_id) REFERENCES leases(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_notifications_created ON notifications(created_at);
    "#,
    )?;
    Ok(())
}
