// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use fleetdesk_audit::AuditEvent;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::clock;
use crate::diesel_schema::job_timeline;
use crate::error::PersistenceError;
use crate::rows::NewTimelineRow;

backend_fn! {
/// Appends a timeline entry and returns its id.
///
/// # Errors
///
/// Returns an error if serialization or the insert fails.
pub fn persist_audit_event(conn: &mut _, event: &AuditEvent) -> Result<i64, PersistenceError> {
    let row = NewTimelineRow::from_event(event, None, &clock::now()?)?;

    diesel::insert_into(job_timeline::table)
        .values(&row)
        .execute(conn)?;
    let event_id: i64 = conn.get_last_insert_rowid()?;

    debug!(event_id, action = %event.action.name, "Persisted timeline entry");
    Ok(event_id)
}
}
