// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{
    DEFAULT_SCAN_TIME, SCAN_TIME_KEY, WEBHOOK_KEY, get_setting, parse_time, pretty_table,
    req_arg, set_setting,
};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let scan_time =
                get_setting(conn, SCAN_TIME_KEY)?.unwrap_or_else(|| DEFAULT_SCAN_TIME.into());
            let webhook = get_setting(conn, WEBHOOK_KEY)?.unwrap_or_default();
            println!(
                "{}",
                pretty_table(
                    &["Key", "Value"],
                    vec![
                        vec![SCAN_TIME_KEY.into(), scan_time],
                        vec![WEBHOOK_KEY.into(), webhook],
                    ]
                )
            );
        }
        Some(("set", sub)) => {
            let key = req_arg(sub, "key")?;
            let value = sub
                .get_one::<String>("value")
                .map(|s| s.trim().to_string())
                .unwrap_or_default();
            let stored = match key.as_str() {
                SCAN_TIME_KEY => parse_time(&value)?.format("%H:%M").to_string(),
                WEBHOOK_KEY => value,
                other => return Err(anyhow!("Unknown setting '{}'", other)),
            };
            set_setting(conn, &key, &stored)?;
            println!("{} = {}", key, stored);
        }
        _ => {}
    }
    Ok(())
}
