// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    routing::{get, post},
};
use fleetdesk_api::{
    GetClientResponse, ListClientsResponse, UpdateClientRequest, WriteResponse, handlers::clients,
};

use crate::AppState;
use crate::http::{HttpError, RequestCause, Success};
use crate::live::LiveEvent;
use crate::session::SessionOperator;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/clients", get(handle_list_clients))
        .route("/clients/{client_id}", get(handle_get_client))
        .route("/clients/update", post(handle_update_client))
}

async fn handle_list_clients(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionOperator,
) -> Result<Json<Success<ListClientsResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = clients::list_clients(&mut persistence)?;
    Ok(Success::json(response))
}

async fn handle_get_client(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionOperator,
    Path(client_id): Path<i64>,
) -> Result<Json<Success<GetClientResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = clients::get_client(&mut persistence, client_id)?;
    Ok(Success::json(response))
}

async fn handle_update_client(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<UpdateClientRequest>,
) -> Result<Json<Success<WriteResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = clients::update_client(&mut persistence, req, &actor, &operator, cause)?;
    drop(persistence);

    app_state.publish(&LiveEvent::resource("clients"));
    Ok(Success::json(response))
}
