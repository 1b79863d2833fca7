// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::apartments::get_apartment;
use crate::errors::{Error, Result as LeaseResult};
use crate::models::{ApartmentStatus, Lease, LeaseStatus};
use crate::utils::{
    agent_arg, ensure_owned, fmt_money, maybe_print_json, opt_arg, parse_date, parse_money,
    pretty_table, req_arg,
};
use anyhow::{Context, Result};
use chrono::{Datelike, Days, Months, NaiveDate};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

pub const MAX_DURATION_YEARS: u32 = 100;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("create", sub)) => create(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("terminate", sub)) => terminate(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Inputs captured when an agreement is signed.
#[derive(Debug, Clone)]
pub struct NewLease {
    pub agent_id: i64,
    pub apartment_id: i64,
    pub tenant_id: i64,
    pub start_date: NaiveDate,
    pub duration_years: u32,
    pub rent_amount: Decimal,
    pub agency_fee: Decimal,
    pub legal_fee: Decimal,
    pub caution_fee: Decimal,
}

/// A lease runs `12 * years - 1` months, ending one month short of the
/// anniversary. A start day missing from the target month carries the
/// surplus days into the following month (Mar 31 + 11 months is Mar 3).
pub fn lease_end_date(start: NaiveDate, duration_years: u32) -> LeaseResult<NaiveDate> {
    if duration_years == 0 || duration_years > MAX_DURATION_YEARS {
        return Err(Error::validation(format!(
            "duration must be between 1 and {} years, got {}",
            MAX_DURATION_YEARS, duration_years
        )));
    }
    start
        .with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(duration_years * 12 - 1)))
        .and_then(|month| month.checked_add_days(Days::new(u64::from(start.day() - 1))))
        .ok_or_else(|| Error::validation(format!("end date out of range for start {}", start)))
}

pub fn total_package(
    rent_amount: Decimal,
    agency_fee: Decimal,
    legal_fee: Decimal,
    caution_fee: Decimal,
) -> LeaseResult<Decimal> {
    for (name, v) in [
        ("rent amount", rent_amount),
        ("agency fee", agency_fee),
        ("legal fee", legal_fee),
        ("caution fee", caution_fee),
    ] {
        if v.is_sign_negative() && !v.is_zero() {
            return Err(Error::validation(format!("{} must not be negative", name)));
        }
    }
    Ok(rent_amount + agency_fee + legal_fee + caution_fee)
}

fn set_apartment_status(
    conn: &Connection,
    apartment_id: i64,
    status: ApartmentStatus,
) -> LeaseResult<()> {
    conn.execute(
        "UPDATE apartments SET status=?1 WHERE id=?2",
        params![status.as_str(), apartment_id],
    )?;
    Ok(())
}

/// Records a signed lease and marks its apartment Occupied.
///
/// The apartment is not required to be Vacant; `doctor` reports apartments
/// that end up with more than one active lease.
pub fn create_lease(conn: &Connection, new: &NewLease) -> LeaseResult<Lease> {
    let end_date = lease_end_date(new.start_date, new.duration_years)?;
    let total = total_package(
        new.rent_amount,
        new.agency_fee,
        new.legal_fee,
        new.caution_fee,
    )?;

    let tx = conn.unchecked_transaction()?;
    let apartment: Option<i64> = tx
        .query_row(
            "SELECT id FROM apartments WHERE id=?1 AND agent_id=?2",
            params![new.apartment_id, new.agent_id],
            |r| r.get(0),
        )
        .optional()?;
    if apartment.is_none() {
        return Err(Error::not_found(format!("Apartment {}", new.apartment_id)));
    }
    let tenant: Option<i64> = tx
        .query_row(
            "SELECT id FROM tenants WHERE id=?1 AND agent_id=?2",
            params![new.tenant_id, new.agent_id],
            |r| r.get(0),
        )
        .optional()?;
    if tenant.is_none() {
        return Err(Error::not_found(format!("Tenant {}", new.tenant_id)));
    }

    tx.execute(
        "INSERT INTO leases(agent_id, apartment_id, tenant_id, start_date, end_date, rent_amount, agency_fee, legal_fee, caution_fee, total_package, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            new.agent_id,
            new.apartment_id,
            new.tenant_id,
            new.start_date.to_string(),
            end_date.to_string(),
            new.rent_amount.to_string(),
            new.agency_fee.to_string(),
            new.legal_fee.to_string(),
            new.caution_fee.to_string(),
            total.to_string(),
            LeaseStatus::Active.as_str()
        ],
    )?;
    let id = tx.last_insert_rowid();
    set_apartment_status(&tx, new.apartment_id, ApartmentStatus::Occupied)?;
    tx.commit()?;

    info!(lease_id = id, apartment_id = new.apartment_id, %end_date, "lease created");
    Ok(Lease {
        id,
        agent_id: new.agent_id,
        apartment_id: new.apartment_id,
        tenant_id: Some(new.tenant_id),
        start_date: new.start_date,
        end_date,
        rent_amount: new.rent_amount,
        agency_fee: new.agency_fee,
        legal_fee: new.legal_fee,
        caution_fee: new.caution_fee,
        total_package: total,
        status: LeaseStatus::Active,
    })
}

/// Ends a lease and frees its apartment. Terminating twice is harmless.
pub fn terminate_lease(conn: &Connection, lease_id: i64) -> LeaseResult<()> {
    let tx = conn.unchecked_transaction()?;
    let apartment_id: Option<i64> = tx
        .query_row(
            "SELECT apartment_id FROM leases WHERE id=?1",
            params![lease_id],
            |r| r.get(0),
        )
        .optional()?;
    let Some(apartment_id) = apartment_id else {
        return Err(Error::not_found(format!("Lease {}", lease_id)));
    };
    tx.execute(
        "UPDATE leases SET status=?1 WHERE id=?2",
        params![LeaseStatus::Terminated.as_str(), lease_id],
    )?;
    set_apartment_status(&tx, apartment_id, ApartmentStatus::Vacant)?;
    tx.commit()?;
    info!(lease_id, apartment_id, "lease terminated");
    Ok(())
}

pub fn get_lease(conn: &Connection, lease_id: i64) -> LeaseResult<Lease> {
    let row = conn
        .query_row(
            "SELECT id, agent_id, apartment_id, tenant_id, start_date, end_date, rent_amount, agency_fee, legal_fee, caution_fee, total_package, status
             FROM leases WHERE id=?1",
            params![lease_id],
            |r| {
                Ok((
                    (
                        r.get::<_, i64>(0)?,
                        r.get::<_, i64>(1)?,
                        r.get::<_, i64>(2)?,
                        r.get::<_, Option<i64>>(3)?,
                    ),
                    (r.get::<_, String>(4)?, r.get::<_, String>(5)?),
                    [
                        r.get::<_, String>(6)?,
                        r.get::<_, String>(7)?,
                        r.get::<_, String>(8)?,
                        r.get::<_, String>(9)?,
                        r.get::<_, String>(10)?,
                    ],
                    r.get::<_, String>(11)?,
                ))
            },
        )
        .optional()?;
    let Some(((id, agent_id, apartment_id, tenant_id), (start, end), money, status)) = row else {
        return Err(Error::not_found(format!("Lease {}", lease_id)));
    };
    let date = |s: &str| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| Error::validation(format!("lease {} has bad date '{}': {}", id, s, e)))
    };
    let mut amounts = [Decimal::ZERO; 5];
    for (slot, s) in amounts.iter_mut().zip(money.iter()) {
        *slot = s
            .parse::<Decimal>()
            .map_err(|e| Error::validation(format!("lease {} has bad amount '{}': {}", id, s, e)))?;
    }
    Ok(Lease {
        id,
        agent_id,
        apartment_id,
        tenant_id,
        start_date: date(&start)?,
        end_date: date(&end)?,
        rent_amount: amounts[0],
        agency_fee: amounts[1],
        legal_fee: amounts[2],
        caution_fee: amounts[3],
        total_package: amounts[4],
        status: status.parse().map_err(Error::Validation)?,
    })
}

fn create(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let agent_id = agent_arg(conn, sub)?;
    let apartment_id = *sub.get_one::<i64>("apartment").unwrap();
    let tenant_id = *sub.get_one::<i64>("tenant").unwrap();
    let start_date = parse_date(&req_arg(sub, "start")?)?;
    let duration_years = *sub.get_one::<u32>("years").unwrap_or(&1);

    // Financials default to the apartment's current price list.
    let apartment = get_apartment(conn, agent_id, apartment_id)?;
    let pick = |id: &str, fallback: Decimal| -> Result<Decimal> {
        match opt_arg(sub, id) {
            Some(raw) => parse_money(&raw).with_context(|| format!("Invalid --{}", id.replace('_', "-"))),
            None => Ok(fallback),
        }
    };
    let new = NewLease {
        agent_id,
        apartment_id,
        tenant_id,
        start_date,
        duration_years,
        rent_amount: pick("rent", apartment.rent_price)?,
        agency_fee: pick("agency_fee", apartment.agency_fee)?,
        legal_fee: pick("legal_fee", apartment.legal_fee)?,
        caution_fee: pick("caution_fee", apartment.caution_fee)?,
    };
    let lease = create_lease(conn, &new)?;
    println!(
        "Created lease #{} for apartment {} ({} -> {}), total package {}",
        lease.id,
        lease.apartment_id,
        lease.start_date,
        lease.end_date,
        fmt_money(&lease.total_package)
    );
    Ok(())
}

fn terminate(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let agent_id = agent_arg(conn, sub)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    ensure_owned(conn, "leases", id, agent_id)?;
    terminate_lease(conn, id)?;
    println!("Lease terminated successfully");
    Ok(())
}

#[derive(Serialize)]
pub struct LeaseRow {
    pub id: i64,
    pub tenant: String,
    pub apartment: String,
    pub property: String,
    pub start_date: String,
    pub end_date: String,
    pub rent_amount: String,
    pub total_package: String,
    pub status: String,
}

/// Newest first, with tenant, apartment and building names resolved.
pub fn query_rows(conn: &Connection, agent_id: i64) -> Result<Vec<LeaseRow>> {
    let mut stmt = conn.prepare(
        "SELECT l.id, t.name, a.name, p.title, l.start_date, l.end_date, l.rent_amount, l.total_package, l.status
         FROM leases l
         LEFT JOIN tenants t ON l.tenant_id=t.id
         LEFT JOIN apartments a ON l.apartment_id=a.id
         LEFT JOIN properties p ON a.property_id=p.id
         WHERE l.agent_id=?1
         ORDER BY l.created_at DESC, l.id DESC",
    )?;
    let rows = stmt.query_map(params![agent_id], |r| {
        Ok(LeaseRow {
            id: r.get(0)?,
            tenant: r.get::<_, Option<String>>(1)?.unwrap_or_default(),
            apartment: r.get::<_, Option<String>>(2)?.unwrap_or_default(),
            property: r.get::<_, Option<String>>(3)?.unwrap_or_default(),
            start_date: r.get(4)?,
            end_date: r.get(5)?,
            rent_amount: r.get(6)?,
            total_package: r.get(7)?,
            status: r.get(8)?,
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
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.tenant.clone(),
                    format!("{} / {}", r.property, r.apartment),
                    r.start_date.clone(),
                    r.end_date.clone(),
                    r.rent_amount.clone(),
                    r.total_package.clone(),
                    r.status.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Tenant", "Unit", "Start", "End", "Rent", "Package", "Status"],
                rows
            )
        );
    }
    Ok(())
}
