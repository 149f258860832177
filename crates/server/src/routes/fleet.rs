// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vehicles and drivers.

use axum::{
    Json, Router,
    extract::State as AxumState,
    routing::{get, post},
};
use fleetdesk_api::{
    AssignVehicleRequest, CreateDriverRequest, CreateVehicleRequest, CreatedResponse,
    ListDriversResponse, ListVehiclesResponse, UpdateVehicleStatusRequest, WriteResponse,
    handlers::fleet,
};

use crate::AppState;
use crate::http::{HttpError, RequestCause, Success};
use crate::live::LiveEvent;
use crate::session::SessionOperator;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vehicles", get(handle_list_vehicles))
        .route("/vehicles", post(handle_create_vehicle))
        .route("/vehicles/status", post(handle_update_vehicle_status))
        .route("/drivers", get(handle_list_drivers))
        .route("/drivers", post(handle_create_driver))
        .route("/drivers/vehicle", post(handle_assign_vehicle))
}

async fn handle_list_vehicles(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionOperator,
) -> Result<Json<Success<ListVehiclesResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = fleet::list_vehicles(&mut persistence)?;
    Ok(Success::json(response))
}

async fn handle_create_vehicle(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<CreateVehicleRequest>,
) -> Result<Json<Success<CreatedResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = fleet::create_vehicle(&mut persistence, req, &actor, &operator, cause)?;
    drop(persistence);

    app_state.publish(&LiveEvent::resource("vehicles"));
    Ok(Success::json(response))
}

async fn handle_update_vehicle_status(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<UpdateVehicleStatusRequest>,
) -> Result<Json<Success<WriteResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = fleet::update_vehicle_status(&mut persistence, &req, &actor, &operator, cause)?;
    drop(persistence);

    app_state.publish(&LiveEvent::resource("vehicles"));
    Ok(Success::json(response))
}

async fn handle_list_drivers(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionOperator,
) -> Result<Json<Success<ListDriversResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = fleet::list_drivers(&mut persistence)?;
    Ok(Success::json(response))
}

async fn handle_create_driver(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<CreateDriverRequest>,
) -> Result<Json<Success<CreatedResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = fleet::create_driver(&mut persistence, req, &actor, &operator, cause)?;
    drop(persistence);

    app_state.publish(&LiveEvent::resource("drivers"));
    Ok(Success::json(response))
}

async fn handle_assign_vehicle(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<AssignVehicleRequest>,
) -> Result<Json<Success<WriteResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response =
        fleet::assign_vehicle_to_driver(&mut persistence, req, &actor, &operator, cause)?;
    drop(persistence);

    app_state.publish(&LiveEvent::resource("drivers"));
    Ok(Success::json(response))
}
