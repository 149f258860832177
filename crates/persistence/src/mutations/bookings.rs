// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking writes.
//!
//! A booking row never changes without a timeline row being written in the
//! same transaction.

use diesel::prelude::*;
use fleetdesk::{Booking, TransitionResult};
use fleetdesk_audit::AuditEvent;
use fleetdesk_domain::{JobId, MAX_DAILY_SEQUENCE, Money, Refund, format_iso_date};
use time::Date;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::clock;
use crate::data_models::{DeletionSummary, NewDeletionLog, PersistTransitionResult};
use crate::diesel_schema::{
    account_topups, bookings, deletion_log, expense_transactions, incidents, job_id_sequences,
    job_timeline, negotiation_threads, prepaid_accounts, waybill_uploads,
};
use crate::error::PersistenceError;
use crate::rows::{BookingChangeset, BookingRow, NewBookingRow, NewTimelineRow};

backend_fn! {
/// Issues the next job id for `date`.
///
/// Sequences restart at 1 each day and are never reused, even when the
/// booking that took a number is later deleted.
///
/// # Errors
///
/// Returns `SequenceExhausted` once the day's numbers run out.
pub fn generate_job_id(conn: &mut _, date: Date) -> Result<JobId, PersistenceError> {
    let day = format_iso_date(date);
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let last: Option<i32> = job_id_sequences::table
            .filter(job_id_sequences::sequence_date.eq(&day))
            .select(job_id_sequences::last_sequence)
            .first(conn)
            .optional()?;

        let next: i32 = match last {
            Some(last) => {
                let next = last.saturating_add(1);
                diesel::update(job_id_sequences::table)
                    .filter(job_id_sequences::sequence_date.eq(&day))
                    .set(job_id_sequences::last_sequence.eq(next))
                    .execute(conn)?;
                next
            }
            None => {
                diesel::insert_into(job_id_sequences::table)
                    .values((
                        job_id_sequences::sequence_date.eq(&day),
                        job_id_sequences::last_sequence.eq(1),
                    ))
                    .execute(conn)?;
                1
            }
        };

        let sequence = u32::try_from(next)
            .ok()
            .filter(|seq| *seq <= MAX_DAILY_SEQUENCE)
            .ok_or_else(|| PersistenceError::SequenceExhausted(day.clone()))?;
        let job_id = JobId::compose(date, sequence)
            .map_err(|e| PersistenceError::Other(e.to_string()))?;

        debug!(job_id = %job_id, "Issued job id");
        Ok(job_id)
    })
}
}

backend_fn! {
/// Writes a new booking and its creation entry on the timeline.
///
/// # Errors
///
/// Returns `Conflict` if the job id is taken, or another error if a write
/// fails. Nothing is written on error.
pub fn insert_booking(
    conn: &mut _,
    result: &TransitionResult,
) -> Result<PersistTransitionResult, PersistenceError> {
    let now = clock::now()?;
    conn.transaction::<_, PersistenceError, _>(|conn| {
        diesel::insert_into(bookings::table)
            .values(&NewBookingRow::from_booking(&result.booking, &now))
            .execute(conn)?;
        let booking_id: i64 = conn.get_last_insert_rowid()?;

        let event = NewTimelineRow::from_event(&result.audit_event, Some(booking_id), &now)?;
        diesel::insert_into(job_timeline::table)
            .values(&event)
            .execute(conn)?;
        let event_id: i64 = conn.get_last_insert_rowid()?;

        let booking: Booking = bookings::table
            .filter(bookings::booking_id.eq(booking_id))
            .select(BookingRow::as_select())
            .first(conn)?
            .try_into()?;

        info!(booking_id, job_id = %booking.job_id, "Inserted booking");
        Ok(PersistTransitionResult { booking, event_id })
    })
}
}

backend_fn! {
/// Stores a lifecycle transition: the updated booking and its timeline entry.
///
/// # Errors
///
/// Returns `BookingNotFound` if the booking is gone, or another error if a
/// write fails. Nothing is written on error.
pub fn update_booking(
    conn: &mut _,
    result: &TransitionResult,
) -> Result<PersistTransitionResult, PersistenceError> {
    let booking_id = result.booking.booking_id.ok_or_else(|| {
        PersistenceError::Other(format!("Booking {} has no id", result.booking.job_id))
    })?;
    let now = clock::now()?;

    conn.transaction::<_, PersistenceError, _>(|conn| {
        let updated: usize = diesel::update(bookings::table)
            .filter(bookings::booking_id.eq(booking_id))
            .set(&BookingChangeset::from_booking(&result.booking, &now))
            .execute(conn)?;
        if updated == 0 {
            return Err(PersistenceError::BookingNotFound(result.booking.job_id.to_string()));
        }

        let event = NewTimelineRow::from_event(&result.audit_event, Some(booking_id), &now)?;
        diesel::insert_into(job_timeline::table)
            .values(&event)
            .execute(conn)?;
        let event_id: i64 = conn.get_last_insert_rowid()?;

        let booking: Booking = bookings::table
            .filter(bookings::booking_id.eq(booking_id))
            .select(BookingRow::as_select())
            .first(conn)?
            .try_into()?;

        info!(
            booking_id,
            job_id = %booking.job_id,
            action = %result.audit_event.action.name,
            status = %booking.status,
            "Updated booking"
        );
        Ok(PersistTransitionResult { booking, event_id })
    })
}
}

backend_fn! {
/// Records a price offer on a booking.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_negotiation(
    conn: &mut _,
    booking_id: i64,
    proposed: Money,
    message: Option<&str>,
    author_operator_id: Option<i64>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(negotiation_threads::table)
        .values((
            negotiation_threads::booking_id.eq(booking_id),
            negotiation_threads::proposed_kobo.eq(proposed.kobo()),
            negotiation_threads::message.eq(message),
            negotiation_threads::author_operator_id.eq(author_operator_id),
            negotiation_threads::created_at.eq(clock::now()?),
        ))
        .execute(conn)?;
    Ok(conn.get_last_insert_rowid()?)
}
}

backend_fn! {
/// Records an uploaded waybill link.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_waybill(
    conn: &mut _,
    booking_id: i64,
    file_url: &str,
    file_name: &str,
    uploaded_by: Option<i64>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(waybill_uploads::table)
        .values((
            waybill_uploads::booking_id.eq(booking_id),
            waybill_uploads::file_url.eq(file_url),
            waybill_uploads::file_name.eq(file_name),
            waybill_uploads::uploaded_by.eq(uploaded_by),
            waybill_uploads::uploaded_at.eq(clock::now()?),
        ))
        .execute(conn)?;
    Ok(conn.get_last_insert_rowid()?)
}
}

backend_fn! {
/// Records an incident on a trip.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_incident(
    conn: &mut _,
    booking_id: i64,
    description: &str,
    severity: &str,
    reported_by: Option<i64>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(incidents::table)
        .values((
            incidents::booking_id.eq(booking_id),
            incidents::description.eq(description),
            incidents::severity.eq(severity),
            incidents::reported_by.eq(reported_by),
            incidents::reported_at.eq(clock::now()?),
        ))
        .execute(conn)?;
    Ok(conn.get_last_insert_rowid()?)
}
}

backend_fn! {
/// Deletes a booking with everything hanging off it.
///
/// In one transaction: credits each refund back to its account as a refund
/// top-up, removes the booking's waybills, incidents, offers, expense
/// transactions and timeline, removes the booking, then writes the
/// deletion log row and `event`.
///
/// # Errors
///
/// Returns `BookingNotFound` if the booking is gone, or another error if a
/// write fails. Nothing is written on error.
pub fn delete_booking_cascade(
    conn: &mut _,
    booking_id: i64,
    refunds: &[Refund],
    deletion: &NewDeletionLog,
    event: &AuditEvent,
) -> Result<DeletionSummary, PersistenceError> {
    let now = clock::now()?;
    let refunds_json = serde_json::to_string(refunds)?;

    conn.transaction::<_, PersistenceError, _>(|conn| {
        let mut summary = DeletionSummary::default();

        for refund in refunds {
            diesel::insert_into(account_topups::table)
                .values((
                    account_topups::account_id.eq(refund.account_id),
                    account_topups::amount_kobo.eq(refund.amount.kobo()),
                    account_topups::reference.eq(Some(deletion.job_id.as_str())),
                    account_topups::note.eq(Some(format!(
                        "Refund for deleted job {}",
                        deletion.job_id
                    ))),
                    account_topups::is_refund.eq(1),
                    account_topups::source_job_id.eq(Some(deletion.job_id.as_str())),
                    account_topups::created_by.eq(deletion.deleted_by),
                    account_topups::created_at.eq(&now),
                ))
                .execute(conn)?;

            let credited: usize = diesel::update(prepaid_accounts::table)
                .filter(prepaid_accounts::account_id.eq(refund.account_id))
                .set(
                    prepaid_accounts::balance_kobo
                        .eq(prepaid_accounts::balance_kobo + refund.amount.kobo()),
                )
                .execute(conn)?;
            if credited == 0 {
                return Err(PersistenceError::NotFound(format!(
                    "Prepaid account {} not found",
                    refund.account_id
                )));
            }
            summary.refund_topups += 1;
        }

        summary.waybills = diesel::delete(waybill_uploads::table)
            .filter(waybill_uploads::booking_id.eq(booking_id))
            .execute(conn)?;
        summary.incidents = diesel::delete(incidents::table)
            .filter(incidents::booking_id.eq(booking_id))
            .execute(conn)?;
        summary.negotiations = diesel::delete(negotiation_threads::table)
            .filter(negotiation_threads::booking_id.eq(booking_id))
            .execute(conn)?;
        summary.expense_transactions = diesel::delete(expense_transactions::table)
            .filter(expense_transactions::booking_id.eq(booking_id))
            .execute(conn)?;
        summary.timeline_entries = diesel::delete(job_timeline::table)
            .filter(job_timeline::booking_id.eq(booking_id))
            .execute(conn)?;

        let removed: usize = diesel::delete(bookings::table)
            .filter(bookings::booking_id.eq(booking_id))
            .execute(conn)?;
        if removed == 0 {
            return Err(PersistenceError::BookingNotFound(deletion.job_id.clone()));
        }

        diesel::insert_into(deletion_log::table)
            .values((
                deletion_log::booking_id.eq(booking_id),
                deletion_log::job_id.eq(&deletion.job_id),
                deletion_log::deleted_by.eq(deletion.deleted_by),
                deletion_log::reason.eq(deletion.reason.as_deref()),
                deletion_log::booking_snapshot_json.eq(&deletion.booking_snapshot_json),
                deletion_log::refunds_json.eq(&refunds_json),
                deletion_log::deleted_at.eq(&now),
            ))
            .execute(conn)?;
        summary.deletion_id = conn.get_last_insert_rowid()?;

        let row = NewTimelineRow::from_event(event, None, &now)?;
        diesel::insert_into(job_timeline::table)
            .values(&row)
            .execute(conn)?;

        info!(
            booking_id,
            job_id = %deletion.job_id,
            refunds = summary.refund_topups,
            expense_transactions = summary.expense_transactions,
            "Deleted booking"
        );
        Ok(summary)
    })
}
}
