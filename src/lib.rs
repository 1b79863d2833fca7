// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod clock;
pub mod commands;
pub mod db;
pub mod dispatch;
pub mod errors;
pub mod models;
pub mod reminders;
pub mod utils;
