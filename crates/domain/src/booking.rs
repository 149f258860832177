// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;
use time::macros::format_description;

/// Largest per-day sequence number a job id can carry.
pub const MAX_DAILY_SEQUENCE: u32 = 9999;

/// A booking's public job identifier, `JOB-YYYYMMDD-NNNN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId {
    value: String,
}

impl JobId {
    /// Builds the job id for the `sequence`th booking of `date`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidJobId` when the sequence is zero or above 9999.
    pub fn compose(date: Date, sequence: u32) -> Result<Self, DomainError> {
        if sequence == 0 || sequence > MAX_DAILY_SEQUENCE {
            return Err(DomainError::InvalidJobId(format!(
                "sequence {sequence} for {date}"
            )));
        }
        Ok(Self {
            value: format!(
                "JOB-{:04}{:02}{:02}-{sequence:04}",
                date.year(),
                u8::from(date.month()),
                date.day()
            ),
        })
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns the booking date encoded in the identifier.
    ///
    /// # Errors
    ///
    /// Only fails if the stored value was not produced by `compose` or `from_str`.
    pub fn date(&self) -> Result<Date, DomainError> {
        let digits = self
            .value
            .get(4..12)
            .ok_or_else(|| DomainError::InvalidJobId(self.value.clone()))?;
        Date::parse(digits, format_description!("[year][month][day]"))
            .map_err(|_| DomainError::InvalidJobId(self.value.clone()))
    }

    /// Returns the per-day sequence number.
    #[must_use]
    pub fn sequence(&self) -> u32 {
        self.value
            .get(13..)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for JobId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidJobId(s.to_string());
        let rest = s.strip_prefix("JOB-").ok_or_else(invalid)?;
        let (date_part, seq_part) = rest.split_once('-').ok_or_else(invalid)?;
        if date_part.len() != 8
            || seq_part.len() != 4
            || !date_part.chars().all(|c| c.is_ascii_digit())
            || !seq_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }
        let date = Date::parse(date_part, format_description!("[year][month][day]"))
            .map_err(|_| invalid())?;
        let sequence: u32 = seq_part.parse().map_err(|_| invalid())?;
        Self::compose(date, sequence).map_err(|_| invalid())
    }
}

impl TryFrom<String> for JobId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<JobId> for String {
    fn from(value: JobId) -> Self {
        value.value
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

/// Intake form data for a new booking.
///
/// Client fields are matched against existing clients before the booking
/// row is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDraft {
    /// Contact name.
    pub client_name: String,
    /// Contact phone, as entered.
    pub client_phone: String,
    /// Company name, if any.
    pub client_company: Option<String>,
    /// Contact email, if any.
    pub client_email: Option<String>,
    /// Client's address, if given.
    pub client_address: Option<String>,
    /// Where the cargo is collected.
    pub pickup_address: String,
    /// Where the cargo is delivered.
    pub dropoff_address: String,
    /// Free-text route description, e.g. `Lagos - Abuja`.
    pub route: Option<String>,
    /// What is being moved.
    pub cargo_description: String,
    /// Planned collection date.
    pub pickup_date: Date,
    /// The client's stated budget.
    pub budget: Money,
    /// Extra notes from intake.
    pub notes: Option<String>,
}

/// Parses an ISO `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `DateParseError` when the text is not a valid calendar date.
pub fn parse_iso_date(raw: &str) -> Result<Date, DomainError> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).map_err(|e| {
        DomainError::DateParseError {
            date_string: raw.to_string(),
            error: e.to_string(),
        }
    })
}

/// Formats a date as ISO `YYYY-MM-DD`.
#[must_use]
pub fn format_iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
