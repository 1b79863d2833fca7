// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::{Error, Result as StoreResult};
use crate::models::{Apartment, ApartmentStatus};
use crate::utils::{
    agent_arg, ensure_owned, maybe_print_json, opt_arg, parse_money, pretty_table, req_arg,
    update_columns,
};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
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

fn money_arg(sub: &clap::ArgMatches, id: &str) -> Result<Option<String>> {
    opt_arg(sub, id)
        .map(|s| parse_money(&s).map(|d| d.to_string()))
        .transpose()
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let agent_id = agent_arg(conn, sub)?;
    let property_id = *sub.get_one::<i64>("property").unwrap();
    ensure_owned(conn, "properties", property_id, agent_id)?;
    let name = req_arg(sub, "name")?;
    let rent = parse_money(&req_arg(sub, "rent")?)?;
    let zero = || "0".to_string();
    conn.execute(
        "INSERT INTO apartments(agent_id, property_id, name, rent_price, agency_fee, legal_fee, caution_fee)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            agent_id,
            property_id,
            name,
            rent.to_string(),
            money_arg(sub, "agency_fee")?.unwrap_or_else(zero),
            money_arg(sub, "legal_fee")?.unwrap_or_else(zero),
            money_arg(sub, "caution_fee")?.unwrap_or_else(zero)
        ],
    )?;
    println!(
        "Added apartment '{}' (#{}) at {} rent",
        name,
        conn.last_insert_rowid(),
        rent
    );
    Ok(())
}

/// Loads one of the agent's apartments with its current price list.
pub fn get_apartment(conn: &Connection, agent_id: i64, id: i64) -> StoreResult<Apartment> {
    let row = conn
        .query_row(
            "SELECT id, agent_id, property_id, name, rent_price, agency_fee, legal_fee, caution_fee, status
             FROM apartments WHERE id=?1 AND agent_id=?2",
            params![id, agent_id],
            |r| {
                Ok((
                    (r.get::<_, i64>(0)?, r.get::<_, i64>(1)?, r.get::<_, i64>(2)?),
                    r.get::<_, String>(3)?,
                    [
                        r.get::<_, String>(4)?,
                        r.get::<_, String>(5)?,
                        r.get::<_, String>(6)?,
                        r.get::<_, String>(7)?,
                    ],
                    r.get::<_, String>(8)?,
                ))
            },
        )
        .optional()?;
    let Some(((id, agent_id, property_id), name, prices, status)) = row else {
        return Err(Error::not_found(format!("Apartment {}", id)));
    };
    let mut amounts = [Decimal::ZERO; 4];
    for (slot, s) in amounts.iter_mut().zip(prices.iter()) {
        *slot = s.parse::<Decimal>().map_err(|e| {
            Error::validation(format!("apartment {} has bad amount '{}': {}", id, s, e))
        })?;
    }
    Ok(Apartment {
        id,
        agent_id,
        property_id,
        name,
        rent_price: amounts[0],
        agency_fee: amounts[1],
        legal_fee: amounts[2],
        caution_fee: amounts[3],
        status: status.parse().map_err(Error::Validation)?,
    })
}

#[derive(Serialize)]
pub struct ApartmentRow {
    pub id: i64,
    pub name: String,
    pub property: String,
    pub landlord: String,
    pub rent_price: String,
    pub agency_fee: String,
    pub legal_fee: String,
    pub caution_fee: String,
    pub status: String,
}

pub fn query_rows(
    conn: &Connection,
    agent_id: i64,
    property_id: Option<i64>,
    status: Option<ApartmentStatus>,
) -> Result<Vec<ApartmentRow>> {
    let mut sql = String::from(
        "SELECT a.id, a.name, p.title, l.name, a.rent_price, a.agency_fee, a.legal_fee, a.caution_fee, a.status
         FROM apartments a
         LEFT JOIN properties p ON a.property_id=p.id
         LEFT JOIN landlords l ON p.landlord_id=l.id
         WHERE a.agent_id=?",
    );
    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(agent_id)];
    if let Some(pid) = property_id {
        sql.push_str(" AND a.property_id=?");
        params_vec.push(Box::new(pid));
    }
    if let Some(st) = status {
        sql.push_str(" AND a.status=?");
        params_vec.push(Box::new(st.as_str()));
    }
    sql.push_str(" ORDER BY a.created_at DESC, a.id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        rusqlite::params_from_iter(params_vec.iter().map(|p| p.as_ref())),
        |r| {
            Ok(ApartmentRow {
                id: r.get(0)?,
                name: r.get(1)?,
                property: r.get::<_, Option<String>>(2)?.unwrap_or_default(),
                landlord: r.get::<_, Option<String>>(3)?.unwrap_or_default(),
                rent_price: r.get(4)?,
                agency_fee: r.get(5)?,
                legal_fee: r.get(6)?,
                caution_fee: r.get(7)?,
                status: r.get(8)?,
            })
        },
    )?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let agent_id = agent_arg(conn, sub)?;
    let property_id = sub.get_one::<i64>("property").copied();
    let status = opt_arg(sub, "status")
        .map(|s| s.parse::<ApartmentStatus>().map_err(|e| anyhow!(e)))
        .transpose()?;
    let data = query_rows(conn, agent_id, property_id, status)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|a| {
                vec![
                    a.id.to_string(),
                    a.name.clone(),
                    a.property.clone(),
                    a.landlord.clone(),
                    a.rent_price.clone(),
                    a.agency_fee.clone(),
                    a.legal_fee.clone(),
                    a.caution_fee.clone(),
                    a.status.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID", "Unit", "Building", "Landlord", "Rent", "Agency", "Legal", "Caution",
                    "Status"
                ],
                rows
            )
        );
    }
    Ok(())
}

/// Occupancy is owned by the lease lifecycle, so status is not editable here.
fn update(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let agent_id = agent_arg(conn, sub)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    update_columns(
        conn,
        "apartments",
        id,
        agent_id,
        &[
            ("name", opt_arg(sub, "name")),
            ("rent_price", money_arg(sub, "rent")?),
            ("agency_fee", money_arg(sub, "agency_fee")?),
            ("legal_fee", money_arg(sub, "legal_fee")?),
            ("caution_fee", money_arg(sub, "caution_fee")?),
        ],
    )?;
    println!("Updated apartment #{}", id);
    Ok(())
}
