// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking intake, the trip lifecycle, and paperwork.
//!
//! Lifecycle steps are flat `POST`s carrying the job id in the body; reads
//! take it from the path.

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    routing::{delete, get, post},
};
use fleetdesk_api::{
    ApproveBookingRequest, AssignDriverRequest, BookingTransitionResponse, CancelBookingRequest,
    CompleteBookingRequest, CreateBookingRequest, CreateBookingResponse, DeleteBookingRequest,
    DeleteBookingResponse, GetBookingResponse, JobRequest, JobTimelineResponse,
    ListBookingsRequest, ListBookingsResponse, ListNegotiationsResponse, ListWaybillsResponse,
    NegotiateBookingRequest, ReportIncidentRequest, UploadWaybillRequest, WriteResponse,
    handlers::bookings,
};
use serde::Deserialize;
use tracing::info;

use crate::AppState;
use crate::http::{HttpError, RequestCause, Success};
use crate::live::LiveEvent;
use crate::session::SessionOperator;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(handle_list_bookings))
        .route("/bookings", post(handle_create_booking))
        .route("/bookings/{job_id}", get(handle_get_booking))
        .route("/bookings/{job_id}", delete(handle_delete_booking))
        .route("/bookings/{job_id}/timeline", get(handle_get_timeline))
        .route("/bookings/{job_id}/negotiations", get(handle_list_negotiations))
        .route("/bookings/{job_id}/waybills", get(handle_list_waybills))
        .route("/bookings/negotiate", post(handle_negotiate))
        .route("/bookings/approve", post(handle_approve))
        .route("/bookings/assign", post(handle_assign_driver))
        .route("/bookings/start", post(handle_start_trip))
        .route("/bookings/in_transit", post(handle_mark_in_transit))
        .route("/bookings/complete", post(handle_complete))
        .route("/bookings/close", post(handle_close))
        .route("/bookings/cancel", post(handle_cancel))
        .route("/bookings/mark_paid", post(handle_mark_paid))
        .route("/bookings/waybills", post(handle_upload_waybill))
        .route("/bookings/incidents", post(handle_report_incident))
}

/// Query string for `DELETE /bookings/{job_id}`.
#[derive(Debug, Default, Deserialize)]
struct DeleteQuery {
    reason: Option<String>,
}

fn changed(app_state: &AppState, job_id: &str) {
    app_state.publish(&LiveEvent::BookingChanged {
        job_id: job_id.to_string(),
    });
}

async fn handle_list_bookings(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Query(req): Query<ListBookingsRequest>,
) -> Result<Json<Success<ListBookingsResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response =
        bookings::list_bookings(&mut persistence, &req, &actor, &operator, app_state.timezone)?;
    Ok(Success::json(response))
}

async fn handle_create_booking(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<Success<CreateBookingResponse>>, HttpError> {
    info!(actor_id = %actor.id, "Handling create_booking request");
    let mut persistence = app_state.persistence.lock().await;
    let response = bookings::create_booking(
        &mut persistence,
        &app_state.notifier,
        req,
        &actor,
        &operator,
        cause,
        app_state.timezone,
    )?;
    drop(persistence);

    changed(&app_state, &response.job_id);
    app_state.publish(&LiveEvent::resource("clients"));
    Ok(Success::json(response))
}

async fn handle_get_booking(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionOperator,
    Path(job_id): Path<String>,
) -> Result<Json<Success<GetBookingResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = bookings::get_booking(&mut persistence, &JobRequest { job_id })?;
    Ok(Success::json(response))
}

async fn handle_get_timeline(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionOperator,
    Path(job_id): Path<String>,
) -> Result<Json<Success<JobTimelineResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = bookings::get_job_timeline(&mut persistence, &JobRequest { job_id })?;
    Ok(Success::json(response))
}

async fn handle_list_negotiations(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionOperator,
    Path(job_id): Path<String>,
) -> Result<Json<Success<ListNegotiationsResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = bookings::list_negotiations(&mut persistence, &JobRequest { job_id })?;
    Ok(Success::json(response))
}

async fn handle_list_waybills(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionOperator,
    Path(job_id): Path<String>,
) -> Result<Json<Success<ListWaybillsResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = bookings::list_waybills(&mut persistence, &JobRequest { job_id })?;
    Ok(Success::json(response))
}

async fn handle_negotiate(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<NegotiateBookingRequest>,
) -> Result<Json<Success<BookingTransitionResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = bookings::negotiate_booking(&mut persistence, req, &actor, &operator, cause)?;
    drop(persistence);

    changed(&app_state, &response.job_id);
    Ok(Success::json(response))
}

async fn handle_approve(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<ApproveBookingRequest>,
) -> Result<Json<Success<BookingTransitionResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = bookings::approve_booking(
        &mut persistence,
        &app_state.notifier,
        &req,
        &actor,
        &operator,
        cause,
    )?;
    drop(persistence);

    changed(&app_state, &response.job_id);
    Ok(Success::json(response))
}

async fn handle_assign_driver(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<AssignDriverRequest>,
) -> Result<Json<Success<BookingTransitionResponse>>, HttpError> {
    info!(job_id = %req.job_id, driver_id = req.driver_id, "Handling assign_driver request");
    let mut persistence = app_state.persistence.lock().await;
    let response = bookings::assign_driver(
        &mut persistence,
        &app_state.notifier,
        req,
        &actor,
        &operator,
        cause,
    )?;
    drop(persistence);

    changed(&app_state, &response.job_id);
    if !response.expense_transaction_ids.is_empty() {
        app_state.publish(&LiveEvent::resource("prepaid_accounts"));
    }
    Ok(Success::json(response))
}

async fn handle_start_trip(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<JobRequest>,
) -> Result<Json<Success<BookingTransitionResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = bookings::start_trip(&mut persistence, &req, &actor, &operator, cause)?;
    drop(persistence);

    changed(&app_state, &response.job_id);
    Ok(Success::json(response))
}

async fn handle_mark_in_transit(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<JobRequest>,
) -> Result<Json<Success<BookingTransitionResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = bookings::mark_in_transit(&mut persistence, &req, &actor, &operator, cause)?;
    drop(persistence);

    changed(&app_state, &response.job_id);
    Ok(Success::json(response))
}

async fn handle_complete(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<CompleteBookingRequest>,
) -> Result<Json<Success<BookingTransitionResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = bookings::complete_booking(
        &mut persistence,
        &app_state.notifier,
        req,
        &actor,
        &operator,
        cause,
    )?;
    drop(persistence);

    changed(&app_state, &response.job_id);
    if !response.expense_transaction_ids.is_empty() {
        app_state.publish(&LiveEvent::resource("prepaid_accounts"));
    }
    Ok(Success::json(response))
}

async fn handle_close(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<JobRequest>,
) -> Result<Json<Success<BookingTransitionResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = bookings::close_booking(&mut persistence, &req, &actor, &operator, cause)?;
    drop(persistence);

    changed(&app_state, &response.job_id);
    Ok(Success::json(response))
}

async fn handle_cancel(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<CancelBookingRequest>,
) -> Result<Json<Success<BookingTransitionResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = bookings::cancel_booking(
        &mut persistence,
        &app_state.notifier,
        req,
        &actor,
        &operator,
        cause,
    )?;
    drop(persistence);

    changed(&app_state, &response.job_id);
    Ok(Success::json(response))
}

async fn handle_mark_paid(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<JobRequest>,
) -> Result<Json<Success<BookingTransitionResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = bookings::mark_paid(&mut persistence, &req, &actor, &operator, cause)?;
    drop(persistence);

    changed(&app_state, &response.job_id);
    Ok(Success::json(response))
}

async fn handle_upload_waybill(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<UploadWaybillRequest>,
) -> Result<Json<Success<WriteResponse>>, HttpError> {
    let job_id = req.job_id.clone();
    let mut persistence = app_state.persistence.lock().await;
    let response = bookings::upload_waybill(&mut persistence, req, &actor, &operator, cause)?;
    drop(persistence);

    changed(&app_state, &job_id);
    Ok(Success::json(response))
}

async fn handle_report_incident(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<ReportIncidentRequest>,
) -> Result<Json<Success<WriteResponse>>, HttpError> {
    let job_id = req.job_id.clone();
    let mut persistence = app_state.persistence.lock().await;
    let response = bookings::report_incident(
        &mut persistence,
        &app_state.notifier,
        req,
        &actor,
        &operator,
        cause,
    )?;
    drop(persistence);

    changed(&app_state, &job_id);
    Ok(Success::json(response))
}

async fn handle_delete_booking(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Path(job_id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<Success<DeleteBookingResponse>>, HttpError> {
    info!(%job_id, actor_id = %actor.id, "Handling delete_booking request");
    let mut persistence = app_state.persistence.lock().await;
    let response = bookings::delete_booking(
        &mut persistence,
        &app_state.notifier,
        DeleteBookingRequest {
            job_id,
            reason: query.reason,
        },
        &actor,
        &operator,
        cause,
    )?;
    drop(persistence);

    changed(&app_state, &response.job_id);
    if !response.refunds.is_empty() {
        app_state.publish(&LiveEvent::resource("prepaid_accounts"));
    }
    Ok(Success::json(response))
}
