// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use leasedesk::clock::FixedClock;
use leasedesk::commands::leases::{NewLease, create_lease, terminate_lease};
use leasedesk::commands::{agents, apartments, dashboard, doctor, exporter, settings, tenants};
use leasedesk::dispatch::LogDispatcher;
use leasedesk::models::ApartmentStatus;
use leasedesk::reminders::run_reminder_scan;
use leasedesk::{cli, db, utils};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use tempfile::tempdir;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO agents(id, name, email) VALUES (1, 'Ada Agent', 'ada@example.com');
        INSERT INTO agents(id, name, email) VALUES (2, 'Bo Agent', 'bo@example.com');
        INSERT INTO landlords(id, agent_id, name, phone) VALUES (1, 1, 'Chief Okafor', '08035550101');
        INSERT INTO landlords(id, agent_id, name, phone) VALUES (2, 2, 'Mrs Eze', '08035550102');
        INSERT INTO properties(id, agent_id, landlord_id, title, address) VALUES (1, 1, 1, 'Palm Court', '12 Marina Rd');
        INSERT INTO properties(id, agent_id, landlord_id, title, address) VALUES (2, 2, 2, 'Lagoon View', '3 Bourdillon');
        INSERT INTO apartments(id, agent_id, property_id, name, rent_price) VALUES (1, 1, 1, 'Flat 1A', '1200');
        INSERT INTO apartments(id, agent_id, property_id, name, rent_price) VALUES (2, 1, 1, 'Flat 1B', '1300');
        INSERT INTO apartments(id, agent_id, property_id, name, rent_price) VALUES (3, 2, 2, 'Suite 4', '900');
        INSERT INTO tenants(id, agent_id, name, phone) VALUES (1, 1, 'Tola Bello', '08035550199');
        INSERT INTO tenants(id, agent_id, name, phone) VALUES (2, 2, 'Musa Ali', '08035550177');
        "#,
    )
    .unwrap();
    conn
}

fn sign(conn: &Connection, apartment_id: i64, start: &str) -> i64 {
    create_lease(
        conn,
        &NewLease {
            agent_id: 1,
            apartment_id,
            tenant_id: 1,
            start_date: NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap(),
            duration_years: 1,
            rent_amount: Decimal::new(1200, 0),
            agency_fee: Decimal::ZERO,
            legal_fee: Decimal::ZERO,
            caution_fee: Decimal::ZERO,
        },
    )
    .unwrap()
    .id
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["leasedesk"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("agent", sub)) => agents::handle(conn, sub),
        Some(("apartment", sub)) => apartments::handle(conn, sub),
        Some(("doctor", sub)) => doctor::handle(conn, sub),
        Some(("tenant", sub)) => tenants::handle(conn, sub),
        Some(("export", sub)) => exporter::handle(conn, sub),
        Some(("settings", sub)) => settings::handle(conn, sub),
        _ => panic!("command not parsed"),
    }
}

#[test]
fn apartment_listing_is_agent_scoped_and_filterable() {
    let conn = setup();
    sign(&conn, 1, "2025-01-10");

    let all = apartments::query_rows(&conn, 1, None, None).unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|a| a.property == "Palm Court"));
    assert!(all.iter().all(|a| a.landlord == "Chief Okafor"));

    let vacant = apartments::query_rows(&conn, 1, Some(1), Some(ApartmentStatus::Vacant)).unwrap();
    assert_eq!(vacant.len(), 1);
    assert_eq!(vacant[0].name, "Flat 1B");

    let other = apartments::query_rows(&conn, 2, None, None).unwrap();
    assert_eq!(other.len(), 1);
    assert_eq!(other[0].name, "Suite 4");
}

#[test]
fn apartment_add_rejects_foreign_property_and_negative_rent() {
    let conn = setup();
    let err = run(
        &conn,
        &["apartment", "add", "--agent", "ada@example.com", "--property", "2", "--name", "X", "--rent", "100"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Property 2 not found"));

    let err = run(
        &conn,
        &["apartment", "add", "--agent", "ada@example.com", "--property", "1", "--name", "X", "--rent=-5"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("must not be negative"));

    run(
        &conn,
        &[
            "apartment", "add", "--agent", "ada@example.com", "--property", "1", "--name", " Flat 2C ",
            "--rent", "1500", "--caution-fee", "300",
        ],
    )
    .unwrap();
    let (name, caution, status): (String, String, String) = conn
        .query_row(
            "SELECT name, caution_fee, status FROM apartments WHERE name='Flat 2C'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .unwrap();
    assert_eq!(name, "Flat 2C");
    assert_eq!(caution, "300");
    assert_eq!(status, "Vacant");
}

#[test]
fn tenant_update_validates_and_stays_in_partition() {
    let conn = setup();
    run(
        &conn,
        &["tenant", "update", "--agent", "ada@example.com", "--id", "1", "--phone", " 0803 555 0000 "],
    )
    .unwrap();
    let phone: String = conn
        .query_row("SELECT phone FROM tenants WHERE id=1", [], |r| r.get(0))
        .unwrap();
    assert_eq!(phone, "0803 555 0000");

    let err = run(
        &conn,
        &["tenant", "update", "--agent", "ada@example.com", "--id", "2", "--name", "Hijack"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Tenant 2 not found"));

    let err = run(
        &conn,
        &["tenant", "update", "--agent", "ada@example.com", "--id", "1", "--phone", "nope"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Invalid phone"));
}

#[test]
fn dashboard_counts_only_own_records() {
    let conn = setup();
    sign(&conn, 1, "2024-07-01");
    // ends 2025-06-01, so a due-today alert on that date
    run_reminder_scan(
        &conn,
        &FixedClock::on(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()),
        &LogDispatcher,
    )
    .unwrap();

    let stats = dashboard::dashboard_stats(&conn, 1).unwrap();
    assert_eq!(stats.tenants, 1);
    assert_eq!(stats.properties, 1);
    assert_eq!(stats.vacant, 1);
    assert_eq!(stats.leases, 1);
    assert_eq!(stats.notifications.len(), 1);
    assert_eq!(stats.notifications[0].kind, "Critical");

    let other = dashboard::dashboard_stats(&conn, 2).unwrap();
    assert_eq!(other.leases, 0);
    assert_eq!(other.vacant, 1);
    assert!(other.notifications.is_empty());
}

#[test]
fn doctor_reports_occupancy_drift() {
    let conn = setup();
    assert!(doctor::find_issues(&conn, 1).unwrap().is_empty());

    // two active leases on one unit, then a manual status edit elsewhere
    sign(&conn, 1, "2025-01-01");
    let second = sign(&conn, 1, "2025-02-01");
    conn.execute("UPDATE apartments SET status='Occupied' WHERE id=2", [])
        .unwrap();
    let issues = doctor::find_issues(&conn, 1).unwrap();
    let kinds: Vec<&str> = issues.iter().map(|r| r[0].as_str()).collect();
    assert!(kinds.contains(&"multiple_active_leases"));
    assert!(kinds.contains(&"occupied_without_lease"));

    // terminating one frees the unit although another lease is still active
    terminate_lease(&conn, second).unwrap();
    let issues = doctor::find_issues(&conn, 1).unwrap();
    let kinds: Vec<&str> = issues.iter().map(|r| r[0].as_str()).collect();
    assert!(kinds.contains(&"vacant_with_active_lease"));
    assert!(!kinds.contains(&"multiple_active_leases"));
}

#[test]
fn doctor_only_sees_the_callers_records() {
    let conn = setup();
    conn.execute("UPDATE apartments SET status='Occupied' WHERE id=3", [])
        .unwrap();

    let theirs = doctor::find_issues(&conn, 2).unwrap();
    assert_eq!(theirs.len(), 1);
    assert_eq!(theirs[0][0], "occupied_without_lease");
    assert!(theirs[0][1].contains("Suite 4"));

    assert!(doctor::find_issues(&conn, 1).unwrap().is_empty());
    run(&conn, &["doctor", "--agent", "ada@example.com"]).unwrap();
}

#[test]
fn doctor_flags_active_lease_whose_tenant_was_removed() {
    let conn = setup();
    let id = sign(&conn, 1, "2025-01-01");
    // no command deletes tenants; this mimics a manual cleanup of the file
    conn.execute("DELETE FROM tenants WHERE id=1", []).unwrap();

    let issues = doctor::find_issues(&conn, 1).unwrap();
    assert!(
        issues
            .iter()
            .any(|r| r[0] == "lease_without_tenant" && r[1] == format!("lease #{}", id))
    );
    assert!(doctor::find_issues(&conn, 2).unwrap().is_empty());
}

#[test]
fn agent_update_changes_profile() {
    let conn = setup();
    run(
        &conn,
        &["agent", "update", "--agent", "ada@example.com", "--name", "Ada Obi", "--email", "Ada@Lettings.ng"],
    )
    .unwrap();
    let (name, email): (String, String) = conn
        .query_row("SELECT name, email FROM agents WHERE id=1", [], |r| {
            Ok((r.get(0)?, r.get(1)?))
        })
        .unwrap();
    assert_eq!(name, "Ada Obi");
    assert_eq!(email, "ada@lettings.ng");
    assert_eq!(utils::id_for_agent(&conn, "ada@lettings.ng").unwrap(), 1);
    assert!(utils::id_for_agent(&conn, "ada@example.com").is_err());

    let err = run(&conn, &["agent", "update", "--agent", "ada@lettings.ng"]).unwrap_err();
    assert!(err.to_string().contains("Nothing to update"));

    // email belongs to agent 2
    assert!(run(
        &conn,
        &["agent", "update", "--agent", "ada@lettings.ng", "--email", "bo@example.com"],
    )
    .is_err());
    let err = run(&conn, &["agent", "update", "--agent", "ada@lettings.ng", "--email", "nope"]).unwrap_err();
    assert!(err.to_string().contains("Invalid email"));
}

#[test]
fn export_leases_writes_csv() {
    let conn = setup();
    sign(&conn, 1, "2024-01-15");
    let dir = tempdir().unwrap();
    let out = dir.path().join("leases.csv");
    let out_str = out.to_string_lossy().to_string();

    run(
        &conn,
        &["export", "leases", "--agent", "ada@example.com", "--format", "csv", "--out", out_str.as_str()],
    )
    .unwrap();

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(&headers[0], "id");
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(&records[0][1], "Tola Bello");
    assert_eq!(&records[0][5], "2024-12-15");
    assert_eq!(&records[0][8], "Active");
}

#[test]
fn settings_validate_scan_time() {
    let conn = setup();
    assert_eq!(
        utils::get_scan_time(&conn).unwrap().format("%H:%M").to_string(),
        "07:00"
    );
    run(&conn, &["settings", "set", "--key", "scan_time", "--value", "06:30"]).unwrap();
    assert_eq!(
        utils::get_scan_time(&conn).unwrap().format("%H:%M").to_string(),
        "06:30"
    );
    let err = run(&conn, &["settings", "set", "--key", "scan_time", "--value", "noon"]).unwrap_err();
    assert!(err.to_string().contains("Invalid time"));
    let err = run(&conn, &["settings", "set", "--key", "colour", "--value", "red"]).unwrap_err();
    assert!(err.to_string().contains("Unknown setting"));

    let stored: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params!["colour"],
            |r| r.get(0),
        )
        .ok();
    assert!(stored.is_none());
}
