// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Date buckets for dashboards and exports.
//!
//! Timestamps are stored in UTC. Reports bucket them by the calendar date
//! in the business timezone, so a booking created at 23:30 UTC counts
//! towards the next day in Lagos.

use crate::error::DomainError;
use chrono::{Datelike, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, Duration, Month};

/// Default business timezone.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Africa::Lagos;

/// A reporting window relative to "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DateBucket {
    /// The current day.
    Today,
    /// Monday through Sunday of the current week.
    ThisWeek,
    /// The current calendar month.
    ThisMonth,
    /// The current calendar year.
    ThisYear,
    /// No restriction.
    #[default]
    All,
}

impl DateBucket {
    /// Returns the query-string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::ThisWeek => "this_week",
            Self::ThisMonth => "this_month",
            Self::ThisYear => "this_year",
            Self::All => "all",
        }
    }

    /// Returns whether `date` falls inside this bucket as seen from `today`.
    #[must_use]
    pub fn contains(&self, date: Date, today: Date) -> bool {
        match self {
            Self::Today => date == today,
            Self::ThisWeek => {
                let monday = today
                    - Duration::days(i64::from(today.weekday().number_days_from_monday()));
                let sunday = monday + Duration::days(6);
                date >= monday && date <= sunday
            }
            Self::ThisMonth => date.year() == today.year() && date.month() == today.month(),
            Self::ThisYear => date.year() == today.year(),
            Self::All => true,
        }
    }
}

impl FromStr for DateBucket {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(Self::Today),
            "this_week" => Ok(Self::ThisWeek),
            "this_month" => Ok(Self::ThisMonth),
            "this_year" => Ok(Self::ThisYear),
            "all" => Ok(Self::All),
            _ => Err(DomainError::InvalidDateBucket(s.to_string())),
        }
    }
}

impl std::fmt::Display for DateBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn chrono_to_time(date: chrono::NaiveDate) -> Result<Date, DomainError> {
    let month_number = u8::try_from(date.month()).map_err(|_| DomainError::DateArithmeticOverflow {
        operation: String::from("converting month"),
    })?;
    let day = u8::try_from(date.day()).map_err(|_| DomainError::DateArithmeticOverflow {
        operation: String::from("converting day"),
    })?;
    let month = Month::try_from(month_number).map_err(|e| DomainError::DateParseError {
        date_string: date.to_string(),
        error: e.to_string(),
    })?;
    Date::from_calendar_date(date.year(), month, day).map_err(|e| DomainError::DateParseError {
        date_string: date.to_string(),
        error: e.to_string(),
    })
}

/// Returns the calendar date of a UTC `YYYY-MM-DD HH:MM:SS` timestamp in `tz`.
///
/// # Errors
///
/// Returns `DateParseError` when the timestamp is malformed.
pub fn business_date(utc_timestamp: &str, tz: Tz) -> Result<Date, DomainError> {
    let naive = NaiveDateTime::parse_from_str(utc_timestamp.trim(), "%Y-%m-%d %H:%M:%S")
        .map_err(|e| DomainError::DateParseError {
            date_string: utc_timestamp.to_string(),
            error: e.to_string(),
        })?;
    let local = Utc.from_utc_datetime(&naive).with_timezone(&tz);
    chrono_to_time(local.date_naive())
}

/// Returns today's date in `tz`.
///
/// # Errors
///
/// Only fails if the system clock is outside the supported calendar range.
pub fn today_in(tz: Tz) -> Result<Date, DomainError> {
    chrono_to_time(Utc::now().with_timezone(&tz).date_naive())
}

/// Parses an IANA timezone name.
///
/// # Errors
///
/// Returns `DateParseError` for unknown zones.
pub fn parse_timezone(name: &str) -> Result<Tz, DomainError> {
    name.parse::<Tz>().map_err(|e| DomainError::DateParseError {
        date_string: name.to_string(),
        error: e.to_string(),
    })
}
