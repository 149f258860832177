// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use fleetdesk_domain::ProcurementStatus;

use crate::data_models::ProcurementData;
use crate::diesel_schema::procurements;
use crate::error::PersistenceError;

backend_fn! {
/// Lists procurement requests, newest first, optionally by status.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_procurements(
    conn: &mut _,
    status: Option<ProcurementStatus>,
) -> Result<Vec<ProcurementData>, PersistenceError> {
    let mut query = procurements::table
        .select(ProcurementData::as_select())
        .into_boxed();
    if let Some(status) = status {
        query = query.filter(procurements::status.eq(status.as_str()));
    }
    Ok(query.order(procurements::procurement_id.desc()).load(conn)?)
}
}

backend_fn! {
/// Retrieves a procurement request.
///
/// # Errors
///
/// Returns `NotFound` if no request has this id.
pub fn get_procurement(
    conn: &mut _,
    procurement_id: i64,
) -> Result<ProcurementData, PersistenceError> {
    procurements::table
        .filter(procurements::procurement_id.eq(procurement_id))
        .select(ProcurementData::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Procurement {procurement_id} not found")))
}
}
