// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use leasedesk::{cli, commands, db};

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LEASEDESK_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("agent", sub)) => commands::agents::handle(&conn, sub)?,
        Some(("landlord", sub)) => commands::landlords::handle(&conn, sub)?,
        Some(("property", sub)) => commands::properties::handle(&conn, sub)?,
        Some(("apartment", sub)) => commands::apartments::handle(&conn, sub)?,
        Some(("tenant", sub)) => commands::tenants::handle(&conn, sub)?,
        Some(("lease", sub)) => commands::leases::handle(&conn, sub)?,
        Some(("remind", sub)) => commands::reminders::handle(&conn, sub)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(&conn, sub)?,
        Some(("doctor", sub)) => commands::doctor::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("settings", sub)) => commands::settings::handle(&conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
