// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Source of the current local time. Everything date-sensitive takes one of
/// these instead of reading the wall clock.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    /// Today's date; the scan treats this as local midnight.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    pub fn at(now: NaiveDateTime) -> Self {
        FixedClock(now)
    }

    /// Noon on `date`.
    pub fn on(date: NaiveDate) -> Self {
        FixedClock(date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
