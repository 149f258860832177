// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use fleetdesk_domain::ProcurementStatus;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::clock;
use crate::data_models::NewProcurement;
use crate::diesel_schema::procurements;
use crate::error::PersistenceError;

backend_fn! {
/// Files a procurement request as `Requested`.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_procurement(
    conn: &mut _,
    request: &NewProcurement,
) -> Result<i64, PersistenceError> {
    let now = clock::now()?;
    diesel::insert_into(procurements::table)
        .values((
            procurements::title.eq(request.title.trim()),
            procurements::vehicle_type.eq(request.vehicle_type.trim()),
            procurements::quantity.eq(request.quantity),
            procurements::estimated_cost_kobo.eq(request.estimated_cost.kobo()),
            procurements::supplier.eq(request.supplier.as_deref()),
            procurements::justification.eq(request.justification.as_deref()),
            procurements::photo_url.eq(request.photo_url.as_deref()),
            procurements::status.eq(ProcurementStatus::Requested.as_str()),
            procurements::requested_by.eq(request.requested_by),
            procurements::created_at.eq(&now),
            procurements::updated_at.eq(&now),
        ))
        .execute(conn)?;
    let procurement_id: i64 = conn.get_last_insert_rowid()?;

    info!(procurement_id, "Filed procurement request");
    Ok(procurement_id)
}
}

backend_fn! {
/// Sets a procurement request's status.
///
/// `decided_by` and `decision_note` are only written when given, so a later
/// `Ordered` or `Delivered` step keeps the approval on record.
///
/// # Errors
///
/// Returns `NotFound` if the request does not exist.
pub fn update_procurement_status(
    conn: &mut _,
    procurement_id: i64,
    status: ProcurementStatus,
    decided_by: Option<i64>,
    decision_note: Option<&str>,
) -> Result<(), PersistenceError> {
    let now = clock::now()?;
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let updated: usize = diesel::update(procurements::table)
            .filter(procurements::procurement_id.eq(procurement_id))
            .set((
                procurements::status.eq(status.as_str()),
                procurements::updated_at.eq(&now),
            ))
            .execute(conn)?;
        if updated == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Procurement {procurement_id} not found"
            )));
        }

        if decided_by.is_some() {
            diesel::update(procurements::table)
                .filter(procurements::procurement_id.eq(procurement_id))
                .set((
                    procurements::decided_by.eq(decided_by),
                    procurements::decision_note.eq(decision_note),
                ))
                .execute(conn)?;
        }

        info!(procurement_id, %status, "Updated procurement status");
        Ok(())
    })
}
}

backend_fn! {
/// Deletes a procurement request.
///
/// # Errors
///
/// Returns `NotFound` if the request does not exist.
pub fn delete_procurement(conn: &mut _, procurement_id: i64) -> Result<(), PersistenceError> {
    let removed: usize = diesel::delete(procurements::table)
        .filter(procurements::procurement_id.eq(procurement_id))
        .execute(conn)?;
    if removed == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Procurement {procurement_id} not found"
        )));
    }
    Ok(())
}
}
