// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Landlord {
    pub id: i64,
    pub agent_id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApartmentStatus {
    Vacant,
    Occupied,
}

impl ApartmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApartmentStatus::Vacant => "Vacant",
            ApartmentStatus::Occupied => "Occupied",
        }
    }
}

impl fmt::Display for ApartmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApartmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vacant" => Ok(ApartmentStatus::Vacant),
            "occupied" => Ok(ApartmentStatus::Occupied),
            other => Err(format!("Unknown apartment status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Apartment {
    pub id: i64,
    pub agent_id: i64,
    pub property_id: i64,
    pub name: String,
    pub rent_price: Decimal,
    pub agency_fee: Decimal,
    pub legal_fee: Decimal,
    pub caution_fee: Decimal,
    pub status: ApartmentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: i64,
    pub agent_id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub passport_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaseStatus {
    Active,
    Terminated,
}

impl LeaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaseStatus::Active => "Active",
            LeaseStatus::Terminated => "Terminated",
        }
    }
}

impl fmt::Display for LeaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(LeaseStatus::Active),
            "Terminated" => Ok(LeaseStatus::Terminated),
            other => Err(format!("Unknown lease status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lease {
    pub id: i64,
    pub agent_id: i64,
    pub apartment_id: i64,
    pub tenant_id: Option<i64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rent_amount: Decimal,
    pub agency_fee: Decimal,
    pub legal_fee: Decimal,
    pub caution_fee: Decimal,
    pub total_package: Decimal, // cached at creation
    pub status: LeaseStatus,
}

/// Severity of a rent reminder. Each variant belongs to exactly one
/// days-remaining milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReminderKind {
    Info,
    Warning,
    Urgent,
    Critical,
}

impl ReminderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderKind::Info => "Info",
            ReminderKind::Warning => "Warning",
            ReminderKind::Urgent => "Urgent",
            ReminderKind::Critical => "Critical",
        }
    }
}

impl fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Info" => Ok(ReminderKind::Info),
            "Warning" => Ok(ReminderKind::Warning),
            "Urgent" => Ok(ReminderKind::Urgent),
            "Critical" => Ok(ReminderKind::Critical),
            other => Err(format!("Unknown reminder kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub agent_id: i64,
    pub lease_id: i64,
    pub kind: ReminderKind,
    pub message: String,
    pub tenant_name: Option<String>,
    pub days_remaining: i64, // negative when overdue
    pub is_read: bool,
    pub scan_date: NaiveDate,
    pub created_at: NaiveDateTime,
}
