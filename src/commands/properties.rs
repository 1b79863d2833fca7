// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{
    agent_arg, ensure_owned, maybe_print_json, opt_arg, pretty_table, req_arg, update_columns,
};
use anyhow::Result;
use rusqlite::{Connection, params};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("update", sub)) => update(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let agent_id = agent_arg(conn, sub)?;
    let landlord_id = *sub.get_one::<i64>("landlord").unwrap();
    ensure_owned(conn, "landlords", landlord_id, agent_id)?;
    let title = req_arg(sub, "title")?;
    let address = req_arg(sub, "address")?;
    conn.execute(
        "INSERT INTO properties(agent_id, landlord_id, title, address) VALUES (?1, ?2, ?3, ?4)",
        params![agent_id, landlord_id, title, address],
    )?;
    println!("Added building '{}' (#{})", title, conn.last_insert_rowid());
    Ok(())
}

#[derive(Serialize)]
pub struct PropertyRow {
    pub id: i64,
    pub title: String,
    pub address: String,
    pub landlord: String,
    pub units: i64,
    pub vacant: i64,
}

pub fn query_rows(conn: &Connection, agent_id: i64) -> Result<Vec<PropertyRow>> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.title, p.address, l.name,
                (SELECT COUNT(*) FROM apartments a WHERE a.property_id=p.id),
                (SELECT COUNT(*) FROM apartments a WHERE a.property_id=p.id AND a.status='Vacant')
         FROM properties p
         LEFT JOIN landlords l ON p.landlord_id=l.id
         WHERE p.agent_id=?1
         ORDER BY p.created_at DESC, p.id DESC",
    )?;
    let rows = stmt.query_map(params![agent_id], |r| {
        Ok(PropertyRow {
            id: r.get(0)?,
            title: r.get(1)?,
            address: r.get(2)?,
            landlord: r.get::<_, Option<String>>(3)?.unwrap_or_default(),
            units: r.get(4)?,
            vacant: r.get(5)?,
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
    let data = query_rows(conn, agent_id)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|p| {
                vec![
                    p.id.to_string(),
                    p.title.clone(),
                    p.address.clone(),
                    p.landlord.clone(),
                    p.units.to_string(),
                    p.vacant.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Title", "Address", "Landlord", "Units", "Vacant"], rows)
        );
    }
    Ok(())
}

fn update(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let agent_id = agent_arg(conn, sub)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let landlord = match sub.get_one::<i64>("landlord") {
        Some(l) => {
            ensure_owned(conn, "landlords", *l, agent_id)?;
            Some(l.to_string())
        }
        None => None,
    };
    update_columns(
        conn,
        "properties",
        id,
        agent_id,
        &[
            ("title", opt_arg(sub, "title")),
            ("address", opt_arg(sub, "address")),
            ("landlord_id", landlord),
        ],
    )?;
    println!("Updated building #{}", id);
    Ok(())
}
