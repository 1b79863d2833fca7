// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use leasedesk::commands::leases::{self, NewLease, create_lease, get_lease, terminate_lease};
use leasedesk::errors::Error;
use leasedesk::models::LeaseStatus;
use leasedesk::{cli, commands::apartments, db};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO agents(id, name, email) VALUES (1, 'Ada Agent', 'ada@example.com');
        INSERT INTO agents(id, name, email) VALUES (2, 'Bo Agent', 'bo@example.com');
        INSERT INTO landlords(id, agent_id, name, phone) VALUES (1, 1, 'Chief Okafor', '08035550101');
        INSERT INTO properties(id, agent_id, landlord_id, title, address) VALUES (1, 1, 1, 'Palm Court', '12 Marina Rd');
        INSERT INTO apartments(id, agent_id, property_id, name, rent_price, agency_fee, legal_fee, caution_fee)
            VALUES (1, 1, 1, 'Flat 1A', '1200.00', '100.00', '50.00', '200.00');
        INSERT INTO tenants(id, agent_id, name, phone) VALUES (1, 1, 'Tola Bello', '08035550199');
        "#,
    )
    .unwrap();
    conn
}

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn new_lease(start: &str, years: u32) -> NewLease {
    NewLease {
        agent_id: 1,
        apartment_id: 1,
        tenant_id: 1,
        start_date: d(start),
        duration_years: years,
        rent_amount: Decimal::new(120000, 2),
        agency_fee: Decimal::new(10000, 2),
        legal_fee: Decimal::new(5000, 2),
        caution_fee: Decimal::new(20000, 2),
    }
}

fn apartment_status(conn: &Connection, id: i64) -> String {
    conn.query_row(
        "SELECT status FROM apartments WHERE id=?1",
        params![id],
        |r| r.get(0),
    )
    .unwrap()
}

#[test]
fn create_lease_computes_end_date_and_package() {
    let conn = setup();
    let lease = create_lease(&conn, &new_lease("2024-01-15", 1)).unwrap();

    assert_eq!(lease.end_date, d("2024-12-15"));
    assert_eq!(lease.total_package, Decimal::new(155000, 2));
    assert_eq!(lease.status, LeaseStatus::Active);

    let stored = get_lease(&conn, lease.id).unwrap();
    assert_eq!(stored.end_date, d("2024-12-15"));
    assert_eq!(stored.total_package, Decimal::new(155000, 2));
    assert_eq!(stored.tenant_id, Some(1));
}

#[test]
fn create_lease_occupies_apartment() {
    let conn = setup();
    assert_eq!(apartment_status(&conn, 1), "Vacant");
    create_lease(&conn, &new_lease("2025-03-01", 2)).unwrap();
    assert_eq!(apartment_status(&conn, 1), "Occupied");
}

#[test]
fn create_lease_rejects_negative_fee_without_side_effects() {
    let conn = setup();
    let mut bad = new_lease("2025-03-01", 1);
    bad.legal_fee = Decimal::new(-1, 0);
    let err = create_lease(&conn, &bad).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM leases", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
    assert_eq!(apartment_status(&conn, 1), "Vacant");
}

#[test]
fn create_lease_requires_agent_owned_references() {
    let conn = setup();
    let mut other_agent = new_lease("2025-03-01", 1);
    other_agent.agent_id = 2;
    let err = create_lease(&conn, &other_agent).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let mut missing_tenant = new_lease("2025-03-01", 1);
    missing_tenant.tenant_id = 42;
    let err = create_lease(&conn, &missing_tenant).unwrap_err();
    assert!(err.to_string().contains("Tenant 42"));
    assert_eq!(apartment_status(&conn, 1), "Vacant");
}

#[test]
fn terminate_lease_is_idempotent() {
    let conn = setup();
    let lease = create_lease(&conn, &new_lease("2025-03-01", 1)).unwrap();

    terminate_lease(&conn, lease.id).unwrap();
    assert_eq!(get_lease(&conn, lease.id).unwrap().status, LeaseStatus::Terminated);
    assert_eq!(apartment_status(&conn, 1), "Vacant");

    terminate_lease(&conn, lease.id).unwrap();
    assert_eq!(get_lease(&conn, lease.id).unwrap().status, LeaseStatus::Terminated);
    assert_eq!(apartment_status(&conn, 1), "Vacant");
}

#[test]
fn terminate_unknown_lease_is_not_found() {
    let conn = setup();
    let err = terminate_lease(&conn, 99).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn package_is_not_recomputed_when_prices_change() {
    let conn = setup();
    let lease = create_lease(&conn, &new_lease("2025-03-01", 1)).unwrap();

    let matches = cli::build_cli().get_matches_from([
        "leasedesk",
        "apartment",
        "update",
        "--agent",
        "ada@example.com",
        "--id",
        "1",
        "--rent",
        "2500",
    ]);
    if let Some(("apartment", sub)) = matches.subcommand() {
        apartments::handle(&conn, sub).unwrap();
    } else {
        panic!("apartment command not parsed");
    }

    let rent: String = conn
        .query_row("SELECT rent_price FROM apartments WHERE id=1", [], |r| r.get(0))
        .unwrap();
    assert_eq!(rent, "2500");
    let stored = get_lease(&conn, lease.id).unwrap();
    assert_eq!(stored.rent_amount, Decimal::new(120000, 2));
    assert_eq!(stored.total_package, Decimal::new(155000, 2));
}

#[test]
fn apartment_update_cannot_set_status() {
    let result = cli::build_cli().try_get_matches_from([
        "leasedesk",
        "apartment",
        "update",
        "--agent",
        "ada@example.com",
        "--id",
        "1",
        "--status",
        "Occupied",
    ]);
    assert!(result.is_err());
}

#[test]
fn cli_create_defaults_financials_from_apartment() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "leasedesk",
        "lease",
        "create",
        "--agent",
        " ada@example.com ",
        "--apartment",
        "1",
        "--tenant",
        "1",
        "--start",
        " 2024-01-15 ",
        "--years",
        "2",
        "--caution-fee",
        "0",
    ]);
    if let Some(("lease", sub)) = matches.subcommand() {
        leases::handle(&conn, sub).unwrap();
    } else {
        panic!("lease command not parsed");
    }

    let lease = get_lease(&conn, 1).unwrap();
    assert_eq!(lease.end_date, d("2025-12-15"));
    assert_eq!(lease.rent_amount, Decimal::new(120000, 2));
    assert_eq!(lease.caution_fee, Decimal::ZERO);
    assert_eq!(lease.total_package, Decimal::new(135000, 2));
    assert_eq!(apartment_status(&conn, 1), "Occupied");
}

#[test]
fn cli_terminate_is_scoped_to_agent() {
    let conn = setup();
    let lease = create_lease(&conn, &new_lease("2025-03-01", 1)).unwrap();
    let id = lease.id.to_string();
    let matches = cli::build_cli().get_matches_from([
        "leasedesk",
        "lease",
        "terminate",
        "--agent",
        "bo@example.com",
        "--id",
        id.as_str(),
    ]);
    if let Some(("lease", sub)) = matches.subcommand() {
        let err = leases::handle(&conn, sub).unwrap_err();
        assert!(err.to_string().contains("not found"));
    } else {
        panic!("lease command not parsed");
    }
    assert_eq!(get_lease(&conn, lease.id).unwrap().status, LeaseStatus::Active);
}

#[test]
fn lease_list_resolves_names_for_agent() {
    let conn = setup();
    create_lease(&conn, &new_lease("2025-03-01", 1)).unwrap();
    let rows = leases::query_rows(&conn, 1).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].tenant, "Tola Bello");
    assert_eq!(rows[0].apartment, "Flat 1A");
    assert_eq!(rows[0].property, "Palm Court");
    assert!(leases::query_rows(&conn, 2).unwrap().is_empty());
}

#[test]
fn get_apartment_reads_price_list_for_owner_only() {
    let conn = setup();
    let apt = apartments::get_apartment(&conn, 1, 1).unwrap();
    assert_eq!(apt.rent_price, Decimal::new(120000, 2));
    assert_eq!(apt.caution_fee, Decimal::new(20000, 2));
    assert_eq!(apt.status.as_str(), "Vacant");
    let err = apartments::get_apartment(&conn, 2, 1).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn month_end_start_spills_into_following_month() {
    let conn = setup();
    let lease = create_lease(&conn, &new_lease("2024-03-31", 1)).unwrap();
    assert_eq!(lease.end_date, d("2025-03-03"));
    assert_eq!(get_lease(&conn, lease.id).unwrap().end_date, d("2025-03-03"));
}
