// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Landlord;
use crate::utils::{
    agent_arg, maybe_print_json, opt_arg, pretty_table, req_arg, update_columns, validate_email,
    validate_phone,
};
use anyhow::Result;
use rusqlite::{Connection, params};

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
    let name = req_arg(sub, "name")?;
    let phone = validate_phone(&req_arg(sub, "phone")?)?;
    let email = opt_arg(sub, "email").map(|e| validate_email(&e)).transpose()?;
    conn.execute(
        "INSERT INTO landlords(agent_id, name, phone, email, bank_name, account_number)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            agent_id,
            name,
            phone,
            email,
            opt_arg(sub, "bank"),
            opt_arg(sub, "account_number")
        ],
    )?;
    println!("Added landlord '{}' (#{})", name, conn.last_insert_rowid());
    Ok(())
}

pub fn list_landlords(conn: &Connection, agent_id: i64) -> Result<Vec<Landlord>> {
    let mut stmt = conn.prepare(
        "SELECT id, agent_id, name, phone, email, bank_name, account_number
         FROM landlords WHERE agent_id=?1 ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![agent_id], |r| {
        Ok(Landlord {
            id: r.get(0)?,
            agent_id: r.get(1)?,
            name: r.get(2)?,
            phone: r.get(3)?,
            email: r.get(4)?,
            bank_name: r.get(5)?,
            account_number: r.get(6)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let agent_id = agent_arg(conn, sub)?;
    let data = list_landlords(conn, agent_id)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|l| {
                vec![
                    l.id.to_string(),
                    l.name,
                    l.phone,
                    l.email.unwrap_or_default(),
                    l.bank_name.unwrap_or_default(),
                    l.account_number.unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Name", "Phone", "Email", "Bank", "Account"], rows)
        );
    }
    Ok(())
}

fn update(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let agent_id = agent_arg(conn, sub)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let phone = opt_arg(sub, "phone").map(|p| validate_phone(&p)).transpose()?;
    let email = opt_arg(sub, "email").map(|e| validate_email(&e)).transpose()?;
    update_columns(
        conn,
        "landlords",
        id,
        agent_id,
        &[
            ("name", opt_arg(sub, "name")),
            ("phone", phone),
            ("email", email),
            ("bank_name", opt_arg(sub, "bank")),
            ("account_number", opt_arg(sub, "account_number")),
        ],
    )?;
    println!("Updated landlord #{}", id);
    Ok(())
}
