// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::leases::query_rows;
use crate::utils::{agent_arg, req_arg};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("leases", sub)) => export_leases(conn, sub),
        _ => Ok(()),
    }
}

fn export_leases(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let agent_id = agent_arg(conn, sub)?;
    let fmt = req_arg(sub, "format")?.to_lowercase();
    let out = req_arg(sub, "out")?;
    let rows = query_rows(conn, agent_id)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(&out)?;
            wtr.write_record([
                "id",
                "tenant",
                "property",
                "apartment",
                "start_date",
                "end_date",
                "rent_amount",
                "total_package",
                "status",
            ])?;
            for r in &rows {
                wtr.write_record([
                    r.id.to_string(),
                    r.tenant.clone(),
                    r.property.clone(),
                    r.apartment.clone(),
                    r.start_date.clone(),
                    r.end_date.clone(),
                    r.rent_amount.clone(),
                    r.total_package.clone(),
                    r.status.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(&out, serde_json::to_string_pretty(&rows)?)?;
        }
        _ => return Err(anyhow!("Unknown format: {} (use csv|json)", fmt)),
    }
    println!("Exported {} leases to {}", rows.len(), out);
    Ok(())
}
