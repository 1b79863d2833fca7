// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{agent_arg, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};

/// Occupancy consistency checks over one agent's records, as
/// `[issue, detail]` rows.
pub fn find_issues(conn: &Connection, agent_id: i64) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Occupied without any active lease
    let mut stmt = conn.prepare(
        "SELECT a.id, a.name FROM apartments a
         WHERE a.agent_id=?1 AND a.status='Occupied'
           AND NOT EXISTS (SELECT 1 FROM leases l WHERE l.apartment_id=a.id AND l.status='Active')
         ORDER BY a.id",
    )?;
    let mut cur = stmt.query(params![agent_id])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let name: String = r.get(1)?;
        rows.push(vec![
            "occupied_without_lease".into(),
            format!("apartment #{} {}", id, name),
        ]);
    }

    // 2) Vacant while a lease is still active
    let mut stmt = conn.prepare(
        "SELECT DISTINCT a.id, a.name FROM apartments a
         JOIN leases l ON l.apartment_id=a.id AND l.status='Active'
         WHERE a.agent_id=?1 AND a.status='Vacant'
         ORDER BY a.id",
    )?;
    let mut cur = stmt.query(params![agent_id])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let name: String = r.get(1)?;
        rows.push(vec![
            "vacant_with_active_lease".into(),
            format!("apartment #{} {}", id, name),
        ]);
    }

    // 3) More than one active lease on a unit
    let mut stmt = conn.prepare(
        "SELECT apartment_id, COUNT(*) FROM leases WHERE agent_id=?1 AND status='Active'
         GROUP BY apartment_id HAVING COUNT(*) > 1 ORDER BY apartment_id",
    )?;
    let mut cur = stmt.query(params![agent_id])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let n: i64 = r.get(1)?;
        rows.push(vec![
            "multiple_active_leases".into(),
            format!("apartment #{} has {} active leases", id, n),
        ]);
    }

    // 4) Active leases the reminder scan will skip. tenant_id goes NULL when
    // a tenant row is removed outside the CLI (ON DELETE SET NULL).
    let mut stmt = conn.prepare(
        "SELECT id FROM leases
         WHERE agent_id=?1 AND status='Active' AND tenant_id IS NULL ORDER BY id",
    )?;
    let mut cur = stmt.query(params![agent_id])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["lease_without_tenant".into(), format!("lease #{}", id)]);
    }

    Ok(rows)
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let agent_id = agent_arg(conn, m)?;
    let rows = find_issues(conn, agent_id)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
