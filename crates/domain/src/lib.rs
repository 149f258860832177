// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod booking;
mod client;
mod error;
mod maintenance;
mod money;
mod refunds;
mod reporting;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use booking::{BookingDraft, JobId, MAX_DAILY_SEQUENCE, format_iso_date, parse_iso_date};
pub use client::{Client, ClientMatch, PhoneNumber};
pub use maintenance::{
    DUE_SOON_WINDOW_DAYS, ScheduleState, is_overdue, next_due_date, schedule_state,
};
pub use money::{Money, percent_of};
pub use refunds::{ChargedExpense, Refund, compute_refunds};
pub use reporting::{DEFAULT_TIMEZONE, DateBucket, business_date, parse_timezone, today_in};

// Re-export public types
pub use error::DomainError;
pub use types::{
    BookingStatus, ExpenseCategory, MaintenanceStatus, PaymentStatus, ProcurementStatus,
    VehicleStatus,
};
pub use validation::{
    validate_amount_non_negative, validate_amount_positive, validate_booking_fields,
    validate_client_fields, validate_non_empty, validate_quantity, validate_url,
};

pub use chrono_tz::Tz;
