// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleetdesk_audit::{AuditEvent, StateSnapshot};
use fleetdesk_domain::{BookingStatus, JobId, Money, PaymentStatus};
use serde::{Deserialize, Serialize};
use time::Date;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// A booking as the lifecycle sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// The database id; `None` before the row is written.
    pub booking_id: Option<i64>,
    /// The public job identifier.
    pub job_id: JobId,
    /// The client this job is for.
    pub client_id: i64,
    /// Collection address.
    pub pickup_address: String,
    /// Delivery address.
    pub dropoff_address: String,
    /// Free-text route.
    pub route: Option<String>,
    /// What is being moved.
    pub cargo_description: String,
    /// Planned collection date.
    #[serde(with = "iso_date")]
    pub pickup_date: Date,
    /// The client's stated budget.
    pub budget: Money,
    /// The price agreed with the client.
    pub agreed_amount: Option<Money>,
    /// Lifecycle status.
    pub status: BookingStatus,
    /// Assigned driver.
    pub driver_id: Option<i64>,
    /// Assigned vehicle.
    pub vehicle_id: Option<i64>,
    /// Fuel spend recorded against the job.
    pub fuel_amount: Money,
    /// Ticketing spend recorded against the job.
    pub ticketing_amount: Money,
    /// Allowance paid for the job.
    pub allowance_amount: Money,
    /// Whether the client has paid.
    pub payment_status: PaymentStatus,
    /// Set when cancelled.
    pub cancellation_reason: Option<String>,
    /// Intake notes.
    pub notes: Option<String>,
    /// The operator who took the booking.
    pub created_by: Option<i64>,
    /// UTC creation timestamp, set by the database layer.
    pub created_at: Option<String>,
    /// UTC last-change timestamp, set by the database layer.
    pub updated_at: Option<String>,
}

impl Booking {
    /// Total trip spend recorded on the booking.
    ///
    /// # Errors
    ///
    /// Returns `AmountOverflow` on overflow.
    pub fn total_expenses(&self) -> Result<Money, fleetdesk_domain::DomainError> {
        Money::sum([self.fuel_amount, self.ticketing_amount, self.allowance_amount])
    }

    /// Serializes the booking for a timeline snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_snapshot(&self) -> Result<StateSnapshot, serde_json::Error> {
        Ok(StateSnapshot::new(serde_json::to_string(self)?))
    }
}

/// The result of a successful booking transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The booking after the transition.
    pub booking: Booking,
    /// The timeline entry recording this transition.
    pub audit_event: AuditEvent,
}
