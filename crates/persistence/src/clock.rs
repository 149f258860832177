// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! UTC timestamps in the stored `YYYY-MM-DD HH:MM:SS` form.

use time::OffsetDateTime;
use time::macros::format_description;

use crate::error::PersistenceError;

/// Formats a UTC instant for storage.
///
/// # Errors
///
/// Returns an error if formatting fails.
pub fn format_timestamp(instant: OffsetDateTime) -> Result<String, PersistenceError> {
    instant
        .to_offset(time::UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .map_err(|e| PersistenceError::Other(format!("Failed to format timestamp: {e}")))
}

/// The current time, formatted for storage.
///
/// # Errors
///
/// Returns an error if formatting fails.
pub fn now() -> Result<String, PersistenceError> {
    format_timestamp(OffsetDateTime::now_utc())
}
