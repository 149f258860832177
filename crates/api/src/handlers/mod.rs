// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions.
//!
//! Every handler follows the same shape: authorize, validate and parse the
//! request, make one or more persistence calls, write a timeline row, then
//! notify best-effort. Handlers are synchronous; the server holds the
//! persistence lock for the duration of a call.

pub mod auth;
pub mod bookings;
pub mod clients;
pub mod fleet;
pub mod ledger;
pub mod maintenance;
pub mod procurement;
pub mod reports;
pub mod workdrive;

use fleetdesk::Booking;
use fleetdesk_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use fleetdesk_domain::{JobId, Money};
use fleetdesk_persistence::{OperatorData, Persistence, PersistenceError};
use serde::Serialize;

use crate::auth::AuthenticatedActor;
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};

pub(crate) fn internal(context: &str) -> impl FnOnce(PersistenceError) -> ApiError + '_ {
    move |e| ApiError::Internal {
        message: format!("{context}: {e}"),
    }
}

pub(crate) fn not_found(resource_type: &str) -> impl FnOnce(PersistenceError) -> ApiError + '_ {
    move |e| translate_persistence_error(e, resource_type)
}

/// Parses a Naira amount typed by an operator.
pub(crate) fn parse_money(field: &str, raw: &str) -> Result<Money, ApiError> {
    Money::from_naira_str(raw).map_err(|e| ApiError::InvalidInput {
        field: String::from(field),
        message: e.to_string(),
    })
}

pub(crate) fn parse_job_id(raw: &str) -> Result<JobId, ApiError> {
    raw.trim().parse::<JobId>().map_err(translate_domain_error)
}

/// Trims an optional text field, treating blank as absent.
pub(crate) fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<String, ApiError> {
    fleetdesk_domain::validate_non_empty(field, value).map_err(translate_domain_error)?;
    Ok(value.trim().to_string())
}

pub(crate) fn load_booking(persistence: &mut Persistence, job_id: &JobId) -> Result<Booking, ApiError> {
    persistence
        .get_booking_by_job_id(job_id)
        .map_err(not_found("Booking"))
}

pub(crate) fn booking_id_of(booking: &Booking) -> Result<i64, ApiError> {
    booking.booking_id.ok_or_else(|| ApiError::Internal {
        message: format!("Booking {} has no database id", booking.job_id),
    })
}

pub(crate) fn snapshot<T: Serialize>(value: &T) -> Result<StateSnapshot, ApiError> {
    serde_json::to_string(value)
        .map(StateSnapshot::new)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to snapshot state: {e}"),
        })
}

/// A timeline row not tied to any booking.
pub(crate) struct GlobalEntry<'a> {
    pub action: &'static str,
    pub details: String,
    pub before: StateSnapshot,
    pub after: StateSnapshot,
    pub actor: &'a AuthenticatedActor,
    pub operator: &'a OperatorData,
}

impl GlobalEntry<'_> {
    pub(crate) fn persist(self, persistence: &mut Persistence, cause: Cause) -> Result<i64, ApiError> {
        let actor: Actor = self.actor.to_audit_actor(self.operator);
        let event = AuditEvent::new_global(
            actor,
            cause,
            Action::new(String::from(self.action), Some(self.details)),
            self.before,
            self.after,
        );
        persistence
            .persist_audit_event(&event)
            .map_err(internal("Failed to persist audit event"))
    }
}

/// Writes a booking-scoped timeline row for a side action that does not
/// change the booking itself (waybills, incidents).
pub(crate) fn persist_booking_note(
    persistence: &mut Persistence,
    booking: &Booking,
    action: &'static str,
    details: String,
    after: StateSnapshot,
    actor: Actor,
    cause: Cause,
) -> Result<i64, ApiError> {
    let event = AuditEvent::new(
        actor,
        cause,
        Action::new(String::from(action), Some(details)),
        StateSnapshot::empty(),
        after,
        Some(booking_id_of(booking)?),
        booking.job_id.clone(),
    );
    persistence
        .persist_audit_event(&event)
        .map_err(internal("Failed to persist audit event"))
}
