// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    routing::{delete, get, post},
};
use fleetdesk_api::{
    CreateProcurementRequest, CreatedResponse, ListProcurementsResponse,
    UpdateProcurementStatusRequest, WriteResponse, handlers::procurement,
};
use serde::Deserialize;

use crate::AppState;
use crate::http::{HttpError, RequestCause, Success};
use crate::live::LiveEvent;
use crate::session::SessionOperator;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/procurements", get(handle_list))
        .route("/procurements", post(handle_create))
        .route("/procurements/status", post(handle_update_status))
        .route("/procurements/{procurement_id}", delete(handle_delete))
}

#[derive(Debug, Default, Deserialize)]
struct StatusQuery {
    status: Option<String>,
}

fn procurements_changed(app_state: &AppState) {
    app_state.publish(&LiveEvent::resource("procurements"));
}

async fn handle_list(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionOperator,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Success<ListProcurementsResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = procurement::list_procurements(&mut persistence, query.status.as_deref())?;
    Ok(Success::json(response))
}

async fn handle_create(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<CreateProcurementRequest>,
) -> Result<Json<Success<CreatedResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = procurement::create_procurement(
        &mut persistence,
        &app_state.notifier,
        req,
        &actor,
        &operator,
        cause,
    )?;
    drop(persistence);

    procurements_changed(&app_state);
    Ok(Success::json(response))
}

async fn handle_update_status(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<UpdateProcurementStatusRequest>,
) -> Result<Json<Success<WriteResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = procurement::update_procurement_status(
        &mut persistence,
        &app_state.notifier,
        req,
        &actor,
        &operator,
        cause,
    )?;
    drop(persistence);

    procurements_changed(&app_state);
    Ok(Success::json(response))
}

async fn handle_delete(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Path(procurement_id): Path<i64>,
) -> Result<Json<Success<WriteResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = procurement::delete_procurement(
        &mut persistence,
        procurement_id,
        &actor,
        &operator,
        cause,
    )?;
    drop(persistence);

    procurements_changed(&app_state);
    Ok(Success::json(response))
}
