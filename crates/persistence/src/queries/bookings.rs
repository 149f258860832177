// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking queries, including the per-booking side tables.

use diesel::prelude::*;
use fleetdesk::Booking;
use fleetdesk_domain::JobId;
use tracing::debug;

use crate::data_models::{
    BookingFilter, DeletionLogData, IncidentData, NegotiationData, WaybillData,
};
use crate::diesel_schema::{
    bookings, deletion_log, incidents, negotiation_threads, waybill_uploads,
};
use crate::error::PersistenceError;
use crate::rows::BookingRow;

backend_fn! {
/// Retrieves a booking by id.
///
/// # Errors
///
/// Returns `BookingNotFound` if no booking has this id.
pub fn get_booking(conn: &mut _, booking_id: i64) -> Result<Booking, PersistenceError> {
    bookings::table
        .filter(bookings::booking_id.eq(booking_id))
        .select(BookingRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::BookingNotFound(format!("id {booking_id}")))
        .and_then(Booking::try_from)
}
}

backend_fn! {
/// Retrieves a booking by its job id.
///
/// # Errors
///
/// Returns `BookingNotFound` if no booking has this job id.
pub fn get_booking_by_job_id(conn: &mut _, job_id: &JobId) -> Result<Booking, PersistenceError> {
    bookings::table
        .filter(bookings::job_id.eq(job_id.as_str()))
        .select(BookingRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::BookingNotFound(job_id.to_string()))
        .and_then(Booking::try_from)
}
}

backend_fn! {
/// Lists bookings, newest first, narrowed by `filter`.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_bookings(
    conn: &mut _,
    filter: &BookingFilter,
) -> Result<Vec<Booking>, PersistenceError> {
    let mut query = bookings::table
        .select(BookingRow::as_select())
        .into_boxed();
    if let Some(status) = filter.status {
        query = query.filter(bookings::status.eq(status.as_str()));
    }
    if let Some(client_id) = filter.client_id {
        query = query.filter(bookings::client_id.eq(client_id));
    }
    if let Some(driver_id) = filter.driver_id {
        query = query.filter(bookings::driver_id.eq(driver_id));
    }

    let rows: Vec<BookingRow> = query.order(bookings::booking_id.desc()).load(conn)?;

    debug!(count = rows.len(), "Listed bookings");
    rows.into_iter().map(Booking::try_from).collect()
}
}

backend_fn! {
/// Lists price offers on a booking, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_negotiations(
    conn: &mut _,
    booking_id: i64,
) -> Result<Vec<NegotiationData>, PersistenceError> {
    Ok(negotiation_threads::table
        .filter(negotiation_threads::booking_id.eq(booking_id))
        .order(negotiation_threads::negotiation_id.asc())
        .select(NegotiationData::as_select())
        .load(conn)?)
}
}

backend_fn! {
/// Lists waybills uploaded for a booking.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_waybills(conn: &mut _, booking_id: i64) -> Result<Vec<WaybillData>, PersistenceError> {
    Ok(waybill_uploads::table
        .filter(waybill_uploads::booking_id.eq(booking_id))
        .order(waybill_uploads::waybill_id.asc())
        .select(WaybillData::as_select())
        .load(conn)?)
}
}

backend_fn! {
/// Lists incidents reported for a booking.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_incidents(conn: &mut _, booking_id: i64) -> Result<Vec<IncidentData>, PersistenceError> {
    Ok(incidents::table
        .filter(incidents::booking_id.eq(booking_id))
        .order(incidents::incident_id.asc())
        .select(IncidentData::as_select())
        .load(conn)?)
}
}

backend_fn! {
/// Lists deleted bookings, most recent first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_deletion_logs(conn: &mut _) -> Result<Vec<DeletionLogData>, PersistenceError> {
    Ok(deletion_log::table
        .order(deletion_log::deletion_id.desc())
        .select(DeletionLogData::as_select())
        .load(conn)?)
}
}
