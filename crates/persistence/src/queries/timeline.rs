// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Job timeline reads.

use diesel::prelude::*;
use fleetdesk_audit::AuditEvent;
use tracing::debug;

use crate::diesel_schema::job_timeline;
use crate::error::PersistenceError;
use crate::rows::TimelineRow;

backend_fn! {
/// Returns the timeline of one booking, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn get_job_timeline(
    conn: &mut _,
    booking_id: i64,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let rows: Vec<TimelineRow> = job_timeline::table
        .filter(job_timeline::booking_id.eq(booking_id))
        .order(job_timeline::event_id.asc())
        .select(TimelineRow::as_select())
        .load(conn)?;

    debug!(booking_id, count = rows.len(), "Loaded job timeline");
    rows.into_iter().map(AuditEvent::try_from).collect()
}
}

backend_fn! {
/// Returns events not tied to a booking, such as operator changes and
/// deletions, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn get_global_audit_events(conn: &mut _) -> Result<Vec<AuditEvent>, PersistenceError> {
    let rows: Vec<TimelineRow> = job_timeline::table
        .filter(job_timeline::booking_id.is_null())
        .order(job_timeline::event_id.asc())
        .select(TimelineRow::as_select())
        .load(conn)?;

    rows.into_iter().map(AuditEvent::try_from).collect()
}
}

backend_fn! {
/// Retrieves a single timeline entry.
///
/// # Errors
///
/// Returns `EventNotFound` if no entry has this id.
pub fn get_audit_event(conn: &mut _, event_id: i64) -> Result<AuditEvent, PersistenceError> {
    let row: Option<TimelineRow> = job_timeline::table
        .filter(job_timeline::event_id.eq(event_id))
        .select(TimelineRow::as_select())
        .first(conn)
        .optional()?;

    row.ok_or(PersistenceError::EventNotFound(event_id))
        .and_then(AuditEvent::try_from)
}
}
