// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Agent;
use crate::utils::{agent_arg, opt_arg, pretty_table, req_arg, validate_email};
use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = req_arg(sub, "name")?;
            let email = validate_email(&req_arg(sub, "email")?)?;
            conn.execute(
                "INSERT INTO agents(name, email) VALUES (?1, ?2)",
                params![name, email],
            )?;
            println!("Added agent '{}' <{}>", name, email);
        }
        Some(("list", _)) => {
            let data = list_agents(conn)?
                .into_iter()
                .map(|a| vec![a.id.to_string(), a.name, a.email])
                .collect();
            println!("{}", pretty_table(&["ID", "Name", "Email"], data));
        }
        Some(("update", sub)) => {
            let id = agent_arg(conn, sub)?;
            let email = opt_arg(sub, "email").map(|e| validate_email(&e)).transpose()?;
            update_agent(conn, id, opt_arg(sub, "name"), email)?;
            println!("Updated agent #{}", id);
        }
        _ => {}
    }
    Ok(())
}

/// Changes an agent's name and/or email; absent values are left as they are.
pub fn update_agent(
    conn: &Connection,
    id: i64,
    name: Option<String>,
    email: Option<String>,
) -> Result<()> {
    if name.is_none() && email.is_none() {
        return Err(anyhow!("Nothing to update"));
    }
    let n = conn
        .execute(
            "UPDATE agents SET name=COALESCE(?1, name), email=COALESCE(?2, email) WHERE id=?3",
            params![name, email, id],
        )
        .with_context(|| format!("Update agent #{} (is the email already taken?)", id))?;
    if n == 0 {
        return Err(anyhow!("Agent {} not found", id));
    }
    Ok(())
}

pub fn list_agents(conn: &Connection) -> Result<Vec<Agent>> {
    let mut stmt = conn.prepare("SELECT id, name, email FROM agents ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok(Agent {
            id: r.get(0)?,
            name: r.get(1)?,
            email: r.get(2)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
