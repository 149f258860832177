// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Maintenance logs and recurring schedules.

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    routing::{delete, get, post},
};
use fleetdesk_api::{
    CreateMaintenanceLogRequest, CreateMaintenanceScheduleRequest, CreatedResponse,
    ListMaintenanceLogsResponse, ListMaintenanceSchedulesResponse,
    UpdateMaintenanceStatusRequest, WriteResponse, handlers::maintenance,
};
use serde::Deserialize;

use crate::AppState;
use crate::http::{HttpError, RequestCause, Success};
use crate::live::LiveEvent;
use crate::session::SessionOperator;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/maintenance/logs", get(handle_list_logs))
        .route("/maintenance/logs", post(handle_create_log))
        .route("/maintenance/logs/status", post(handle_update_status))
        .route("/maintenance/logs/{log_id}", delete(handle_delete_log))
        .route("/maintenance/schedules", get(handle_list_schedules))
        .route("/maintenance/schedules", post(handle_create_schedule))
        .route(
            "/maintenance/schedules/{schedule_id}/deactivate",
            post(handle_deactivate_schedule),
        )
}

#[derive(Debug, Default, Deserialize)]
struct LogsQuery {
    vehicle_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct SchedulesQuery {
    #[serde(default)]
    active_only: bool,
}

fn maintenance_changed(app_state: &AppState) {
    app_state.publish(&LiveEvent::resource("maintenance"));
}

async fn handle_list_logs(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionOperator,
    Query(query): Query<LogsQuery>,
) -> Result<Json<Success<ListMaintenanceLogsResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = maintenance::list_maintenance_logs(&mut persistence, query.vehicle_id)?;
    Ok(Success::json(response))
}

async fn handle_create_log(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<CreateMaintenanceLogRequest>,
) -> Result<Json<Success<CreatedResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response =
        maintenance::create_maintenance_log(&mut persistence, req, &actor, &operator, cause)?;
    drop(persistence);

    maintenance_changed(&app_state);
    Ok(Success::json(response))
}

async fn handle_update_status(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<UpdateMaintenanceStatusRequest>,
) -> Result<Json<Success<WriteResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = maintenance::update_maintenance_status(
        &mut persistence,
        &req,
        &actor,
        &operator,
        cause,
        app_state.timezone,
    )?;
    drop(persistence);

    maintenance_changed(&app_state);
    app_state.publish(&LiveEvent::resource("vehicles"));
    Ok(Success::json(response))
}

async fn handle_delete_log(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Path(log_id): Path<i64>,
) -> Result<Json<Success<WriteResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response =
        maintenance::delete_maintenance_log(&mut persistence, log_id, &actor, &operator, cause)?;
    drop(persistence);

    maintenance_changed(&app_state);
    Ok(Success::json(response))
}

async fn handle_list_schedules(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionOperator,
    Query(query): Query<SchedulesQuery>,
) -> Result<Json<Success<ListMaintenanceSchedulesResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = maintenance::list_maintenance_schedules(
        &mut persistence,
        query.active_only,
        app_state.timezone,
    )?;
    Ok(Success::json(response))
}

async fn handle_create_schedule(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<CreateMaintenanceScheduleRequest>,
) -> Result<Json<Success<CreatedResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response =
        maintenance::create_maintenance_schedule(&mut persistence, &req, &actor, &operator, cause)?;
    drop(persistence);

    maintenance_changed(&app_state);
    Ok(Success::json(response))
}

async fn handle_deactivate_schedule(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Path(schedule_id): Path<i64>,
) -> Result<Json<Success<WriteResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = maintenance::deactivate_maintenance_schedule(
        &mut persistence,
        schedule_id,
        &actor,
        &operator,
        cause,
    )?;
    drop(persistence);

    maintenance_changed(&app_state);
    Ok(Success::json(response))
}
