// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Diesel row structs shared by queries and mutations, and their
//! conversions to the public types.

use diesel::prelude::*;
use fleetdesk::Booking;
use fleetdesk_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use fleetdesk_domain::{
    BookingStatus, JobId, Money, PaymentStatus, format_iso_date, parse_iso_date,
};

use crate::data_models::{
    ActionData, ActorData, CauseData, DriverData, MaintenanceScheduleData, OperatorData,
    SessionData, TopupData,
};
use crate::diesel_schema::{
    account_topups, bookings, drivers, job_timeline, maintenance_schedules, operators, sessions,
};
use crate::error::PersistenceError;

fn reconstruction<E: std::fmt::Display>(column: &'static str) -> impl Fn(E) -> PersistenceError {
    move |e| PersistenceError::ReconstructionError(format!("column {column}: {e}"))
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = operators)]
pub struct OperatorRow {
    pub operator_id: i64,
    pub login_name: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: String,
    pub is_disabled: i32,
    pub created_at: String,
    pub disabled_at: Option<String>,
    pub last_login_at: Option<String>,
}

impl From<OperatorRow> for OperatorData {
    fn from(row: OperatorRow) -> Self {
        Self {
            operator_id: row.operator_id,
            login_name: row.login_name,
            display_name: row.display_name,
            password_hash: row.password_hash,
            role: row.role,
            is_disabled: row.is_disabled != 0,
            created_at: row.created_at,
            disabled_at: row.disabled_at,
            last_login_at: row.last_login_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = sessions)]
pub struct SessionRow {
    pub session_id: i64,
    pub session_token: String,
    pub operator_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

impl From<SessionRow> for SessionData {
    fn from(row: SessionRow) -> Self {
        Self {
            session_id: row.session_id,
            session_token: row.session_token,
            operator_id: row.operator_id,
            created_at: row.created_at,
            last_activity_at: row.last_activity_at,
            expires_at: row.expires_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = drivers)]
pub struct DriverRow {
    pub driver_id: i64,
    pub full_name: String,
    pub phone: String,
    pub license_number: String,
    pub vehicle_id: Option<i64>,
    pub operator_id: Option<i64>,
    pub is_active: i32,
    pub created_at: String,
}

impl From<DriverRow> for DriverData {
    fn from(row: DriverRow) -> Self {
        Self {
            driver_id: row.driver_id,
            full_name: row.full_name,
            phone: row.phone,
            license_number: row.license_number,
            vehicle_id: row.vehicle_id,
            operator_id: row.operator_id,
            is_active: row.is_active != 0,
            created_at: row.created_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = account_topups)]
pub struct TopupRow {
    pub topup_id: i64,
    pub account_id: i64,
    pub amount_kobo: i64,
    pub reference: Option<String>,
    pub note: Option<String>,
    pub is_refund: i32,
    pub source_job_id: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: String,
}

impl From<TopupRow> for TopupData {
    fn from(row: TopupRow) -> Self {
        Self {
            topup_id: row.topup_id,
            account_id: row.account_id,
            amount_kobo: row.amount_kobo,
            reference: row.reference,
            note: row.note,
            is_refund: row.is_refund != 0,
            source_job_id: row.source_job_id,
            created_by: row.created_by,
            created_at: row.created_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = maintenance_schedules)]
pub struct ScheduleRow {
    pub schedule_id: i64,
    pub vehicle_id: i64,
    pub service_type: String,
    pub interval_days: i32,
    pub last_service_date: String,
    pub next_due_date: String,
    pub is_active: i32,
    pub created_at: String,
}

impl From<ScheduleRow> for MaintenanceScheduleData {
    fn from(row: ScheduleRow) -> Self {
        Self {
            schedule_id: row.schedule_id,
            vehicle_id: row.vehicle_id,
            service_type: row.service_type,
            interval_days: row.interval_days,
            last_service_date: row.last_service_date,
            next_due_date: row.next_due_date,
            is_active: row.is_active != 0,
            created_at: row.created_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = bookings)]
pub struct BookingRow {
    pub booking_id: i64,
    pub job_id: String,
    pub client_id: i64,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub route: Option<String>,
    pub cargo_description: String,
    pub pickup_date: String,
    pub budget_kobo: i64,
    pub agreed_amount_kobo: Option<i64>,
    pub status: String,
    pub driver_id: Option<i64>,
    pub vehicle_id: Option<i64>,
    pub fuel_kobo: i64,
    pub ticketing_kobo: i64,
    pub allowance_kobo: i64,
    pub payment_status: String,
    pub cancellation_reason: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<BookingRow> for Booking {
    type Error = PersistenceError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            booking_id: Some(row.booking_id),
            job_id: row
                .job_id
                .parse::<JobId>()
                .map_err(reconstruction("bookings.job_id"))?,
            client_id: row.client_id,
            pickup_address: row.pickup_address,
            dropoff_address: row.dropoff_address,
            route: row.route,
            cargo_description: row.cargo_description,
            pickup_date: parse_iso_date(&row.pickup_date)
                .map_err(reconstruction("bookings.pickup_date"))?,
            budget: Money::from_kobo(row.budget_kobo),
            agreed_amount: row.agreed_amount_kobo.map(Money::from_kobo),
            status: row
                .status
                .parse::<BookingStatus>()
                .map_err(reconstruction("bookings.status"))?,
            driver_id: row.driver_id,
            vehicle_id: row.vehicle_id,
            fuel_amount: Money::from_kobo(row.fuel_kobo),
            ticketing_amount: Money::from_kobo(row.ticketing_kobo),
            allowance_amount: Money::from_kobo(row.allowance_kobo),
            payment_status: row
                .payment_status
                .parse::<PaymentStatus>()
                .map_err(reconstruction("bookings.payment_status"))?,
            cancellation_reason: row.cancellation_reason,
            notes: row.notes,
            created_by: row.created_by,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        })
    }
}

/// Insert form of a booking.
#[derive(Insertable)]
#[diesel(table_name = bookings)]
pub struct NewBookingRow {
    pub job_id: String,
    pub client_id: i64,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub route: Option<String>,
    pub cargo_description: String,
    pub pickup_date: String,
    pub budget_kobo: i64,
    pub agreed_amount_kobo: Option<i64>,
    pub status: String,
    pub driver_id: Option<i64>,
    pub vehicle_id: Option<i64>,
    pub fuel_kobo: i64,
    pub ticketing_kobo: i64,
    pub allowance_kobo: i64,
    pub payment_status: String,
    pub cancellation_reason: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl NewBookingRow {
    pub fn from_booking(booking: &Booking, now: &str) -> Self {
        Self {
            job_id: booking.job_id.to_string(),
            client_id: booking.client_id,
            pickup_address: booking.pickup_address.clone(),
            dropoff_address: booking.dropoff_address.clone(),
            route: booking.route.clone(),
            cargo_description: booking.cargo_description.clone(),
            pickup_date: format_iso_date(booking.pickup_date),
            budget_kobo: booking.budget.kobo(),
            agreed_amount_kobo: booking.agreed_amount.map(Money::kobo),
            status: booking.status.to_string(),
            driver_id: booking.driver_id,
            vehicle_id: booking.vehicle_id,
            fuel_kobo: booking.fuel_amount.kobo(),
            ticketing_kobo: booking.ticketing_amount.kobo(),
            allowance_kobo: booking.allowance_amount.kobo(),
            payment_status: booking.payment_status.to_string(),
            cancellation_reason: booking.cancellation_reason.clone(),
            notes: booking.notes.clone(),
            created_by: booking.created_by,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }
}

/// The columns a lifecycle transition may change.
#[derive(AsChangeset)]
#[diesel(table_name = bookings, treat_none_as_null = true)]
pub struct BookingChangeset {
    pub route: Option<String>,
    pub agreed_amount_kobo: Option<i64>,
    pub status: String,
    pub driver_id: Option<i64>,
    pub vehicle_id: Option<i64>,
    pub fuel_kobo: i64,
    pub ticketing_kobo: i64,
    pub allowance_kobo: i64,
    pub payment_status: String,
    pub cancellation_reason: Option<String>,
    pub notes: Option<String>,
    pub updated_at: String,
}

impl BookingChangeset {
    pub fn from_booking(booking: &Booking, now: &str) -> Self {
        Self {
            route: booking.route.clone(),
            agreed_amount_kobo: booking.agreed_amount.map(Money::kobo),
            status: booking.status.to_string(),
            driver_id: booking.driver_id,
            vehicle_id: booking.vehicle_id,
            fuel_kobo: booking.fuel_amount.kobo(),
            ticketing_kobo: booking.ticketing_amount.kobo(),
            allowance_kobo: booking.allowance_amount.kobo(),
            payment_status: booking.payment_status.to_string(),
            cancellation_reason: booking.cancellation_reason.clone(),
            notes: booking.notes.clone(),
            updated_at: now.to_string(),
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = job_timeline)]
pub struct TimelineRow {
    pub event_id: i64,
    pub booking_id: Option<i64>,
    pub job_id: Option<String>,
    pub actor_operator_id: i64,
    pub actor_login_name: String,
    pub actor_display_name: String,
    pub actor_json: String,
    pub cause_json: String,
    pub action_name: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
    pub created_at: String,
}

impl TryFrom<TimelineRow> for AuditEvent {
    type Error = PersistenceError;

    fn try_from(row: TimelineRow) -> Result<Self, Self::Error> {
        let actor_data: ActorData = serde_json::from_str(&row.actor_json)?;
        let cause_data: CauseData = serde_json::from_str(&row.cause_json)?;
        let action_data: ActionData = serde_json::from_str(&row.action_json)?;

        let actor = if row.actor_operator_id > 0 {
            Actor::with_operator(
                actor_data.id,
                actor_data.actor_type,
                row.actor_operator_id,
                row.actor_login_name,
                row.actor_display_name,
            )
        } else {
            Actor::new(actor_data.id, actor_data.actor_type)
        };

        let job_id = row
            .job_id
            .map(|raw| raw.parse::<JobId>())
            .transpose()
            .map_err(reconstruction("job_timeline.job_id"))?;

        Ok(Self {
            event_id: Some(row.event_id),
            actor,
            cause: Cause::new(cause_data.id, cause_data.description),
            action: Action::new(action_data.name, action_data.details),
            before: StateSnapshot::new(row.before_snapshot_json),
            after: StateSnapshot::new(row.after_snapshot_json),
            booking_id: row.booking_id,
            job_id,
        })
    }
}

/// Insert form of a timeline entry.
#[derive(Insertable)]
#[diesel(table_name = job_timeline)]
pub struct NewTimelineRow {
    pub booking_id: Option<i64>,
    pub job_id: Option<String>,
    pub actor_operator_id: i64,
    pub actor_login_name: String,
    pub actor_display_name: String,
    pub actor_json: String,
    pub cause_json: String,
    pub action_name: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
    pub created_at: String,
}

impl NewTimelineRow {
    /// Builds the row for `event`. `booking_id` overrides the event's own
    /// id, which is unset until the booking row exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON columns cannot be serialized.
    pub fn from_event(
        event: &AuditEvent,
        booking_id: Option<i64>,
        now: &str,
    ) -> Result<Self, PersistenceError> {
        let actor_json = serde_json::to_string(&ActorData {
            id: event.actor.id.clone(),
            actor_type: event.actor.actor_type.clone(),
        })?;
        let cause_json = serde_json::to_string(&CauseData {
            id: event.cause.id.clone(),
            description: event.cause.description.clone(),
        })?;
        let action_json = serde_json::to_string(&ActionData {
            name: event.action.name.clone(),
            details: event.action.details.clone(),
        })?;

        Ok(Self {
            booking_id: booking_id.or(event.booking_id),
            job_id: event.job_id.as_ref().map(ToString::to_string),
            actor_operator_id: event.actor.operator_id.unwrap_or(0),
            actor_login_name: event
                .actor
                .operator_login_name
                .clone()
                .unwrap_or_else(|| event.actor.id.clone()),
            actor_display_name: event.actor.display_name().to_string(),
            actor_json,
            cause_json,
            action_name: event.action.name.clone(),
            action_json,
            before_snapshot_json: event.before.data.clone(),
            after_snapshot_json: event.after.data.clone(),
            created_at: now.to_string(),
        })
    }
}
