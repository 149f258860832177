// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Job timeline entries.
//!
//! Every successful change to a booking, and every administrative change
//! that is not tied to a booking, is recorded as one immutable
//! [`AuditEvent`]. Booking-scoped events carry the booking's id and job id
//! and make up that booking's timeline.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

#[cfg(test)]
mod tests;

use fleetdesk_domain::JobId;

/// Represents the entity performing an action.
///
/// Operator fields are filled in when the action came through an
/// authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "operator", "system").
    pub actor_type: String,
    /// The operator's database id, if any.
    pub operator_id: Option<i64>,
    /// The operator's login name, if any.
    pub operator_login_name: Option<String>,
    /// The operator's display name, if any.
    pub operator_display_name: Option<String>,
}

impl Actor {
    /// Creates an actor with no operator attached.
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self {
            id,
            actor_type,
            operator_id: None,
            operator_login_name: None,
            operator_display_name: None,
        }
    }

    /// Creates an actor for an authenticated operator.
    #[must_use]
    pub const fn with_operator(
        id: String,
        actor_type: String,
        operator_id: i64,
        operator_login_name: String,
        operator_display_name: String,
    ) -> Self {
        Self {
            id,
            actor_type,
            operator_id: Some(operator_id),
            operator_login_name: Some(operator_login_name),
            operator_display_name: Some(operator_display_name),
        }
    }

    /// The name shown on the timeline.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.operator_display_name.as_deref().unwrap_or(&self.id)
    }
}

/// Represents the reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`AssignDriver`", "`MarkPaid`").
    pub name: String,
    /// Optional free-text details shown on the timeline.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A serialized view of an entity before or after a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// The snapshot text, usually JSON.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// A snapshot for "nothing existed".
    #[must_use]
    pub fn empty() -> Self {
        Self {
            data: String::from("{}"),
        }
    }
}

/// An immutable audit event representing one change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The database id, once persisted.
    pub event_id: Option<i64>,
    /// Who performed the action.
    pub actor: Actor,
    /// Why it was performed.
    pub cause: Cause,
    /// What was done.
    pub action: Action,
    /// The entity before the change.
    pub before: StateSnapshot,
    /// The entity after the change.
    pub after: StateSnapshot,
    /// The booking this event belongs to; `None` for global events.
    pub booking_id: Option<i64>,
    /// The booking's job id; `None` for global events.
    pub job_id: Option<JobId>,
}

impl AuditEvent {
    /// Creates a booking-scoped event.
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        booking_id: Option<i64>,
        job_id: JobId,
    ) -> Self {
        Self {
            event_id: None,
            actor,
            cause,
            action,
            before,
            after,
            booking_id,
            job_id: Some(job_id),
        }
    }

    /// Creates an event not tied to any booking (fleet, ledger, operators).
    #[must_use]
    pub const fn new_global(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            event_id: None,
            actor,
            cause,
            action,
            before,
            after,
            booking_id: None,
            job_id: None,
        }
    }

    /// Returns a copy carrying the persisted id.
    #[must_use]
    pub fn with_event_id(mut self, event_id: i64) -> Self {
        self.event_id = Some(event_id);
        self
    }

    /// Returns a copy bound to a booking row id.
    ///
    /// Intake events are built before the booking row exists.
    #[must_use]
    pub fn for_booking(mut self, booking_id: i64) -> Self {
        self.booking_id = Some(booking_id);
        self
    }

    /// Returns true if this event is not scoped to a booking.
    #[must_use]
    pub const fn is_global(&self) -> bool {
        self.job_id.is_none()
    }
}
