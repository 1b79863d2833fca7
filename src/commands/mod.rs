// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod agents;
pub mod apartments;
pub mod dashboard;
pub mod doctor;
pub mod exporter;
pub mod landlords;
pub mod leases;
pub mod properties;
pub mod reminders;
pub mod settings;
pub mod tenants;
