// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::{Date, Duration};

/// Days before the due date at which a schedule is flagged as due soon.
pub const DUE_SOON_WINDOW_DAYS: i64 = 7;

/// Where a recurring maintenance schedule stands relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleState {
    /// More than a week away.
    Upcoming,
    /// Due within the next week, or today.
    DueSoon,
    /// Past its due date.
    Overdue,
}

/// Computes the next service date from the last one.
///
/// # Errors
///
/// Returns `InvalidInterval` for intervals below one day and
/// `DateArithmeticOverflow` past the supported calendar range.
pub fn next_due_date(last_service: Date, interval_days: i32) -> Result<Date, DomainError> {
    if interval_days < 1 {
        return Err(DomainError::InvalidInterval(interval_days));
    }
    last_service
        .checked_add(Duration::days(i64::from(interval_days)))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("adding {interval_days} days to {last_service}"),
        })
}

/// Returns true once `today` is past `next_due`.
#[must_use]
pub fn is_overdue(next_due: Date, today: Date) -> bool {
    today > next_due
}

/// Classifies a schedule.
#[must_use]
pub fn schedule_state(next_due: Date, today: Date) -> ScheduleState {
    if is_overdue(next_due, today) {
        ScheduleState::Overdue
    } else if (next_due - today).whole_days() <= DUE_SOON_WINDOW_DAYS {
        ScheduleState::DueSoon
    } else {
        ScheduleState::Upcoming
    }
}
