// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bootstrap, login and operator management.

use axum::{
    Json, Router,
    extract::State as AxumState,
    routing::{get, post},
};
use fleetdesk_api::{
    BootstrapStatusResponse, CreateFirstAdminRequest, CreateOperatorRequest,
    CreateOperatorResponse, ListOperatorsResponse, LoginRequest, LoginResponse,
    OperatorStatusRequest, OperatorStatusResponse, WhoAmIResponse, handlers::auth,
};
use tracing::info;

use crate::AppState;
use crate::http::{HttpError, MessageBody, RequestCause, Success};
use crate::live::LiveEvent;
use crate::session::{BearerToken, SessionOperator};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/bootstrap", get(handle_bootstrap_status))
        .route("/auth/bootstrap", post(handle_bootstrap))
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/auth/me", get(handle_whoami))
        .route("/operators", get(handle_list_operators))
        .route("/operators", post(handle_create_operator))
        .route("/operators/disable", post(handle_disable_operator))
        .route("/operators/enable", post(handle_enable_operator))
}

async fn handle_bootstrap_status(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Success<BootstrapStatusResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = auth::check_bootstrap_status(&mut persistence)?;
    Ok(Success::json(response))
}

async fn handle_bootstrap(
    AxumState(app_state): AxumState<AppState>,
    RequestCause(cause): RequestCause,
    Json(req): Json<CreateFirstAdminRequest>,
) -> Result<Json<Success<CreateOperatorResponse>>, HttpError> {
    info!(login_name = %req.login_name, "Handling bootstrap request");
    let mut persistence = app_state.persistence.lock().await;
    let response = auth::bootstrap_first_admin(&mut persistence, req, cause)?;
    drop(persistence);

    app_state.publish(&LiveEvent::resource("operators"));
    Ok(Success::json(response))
}

async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Success<LoginResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = auth::login(&mut persistence, &req)?;
    Ok(Success::json(response))
}

async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Success<MessageBody>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    auth::logout(&mut persistence, &token)?;
    Ok(Success::json(MessageBody {
        message: String::from("Logged out"),
    }))
}

async fn handle_whoami(
    SessionOperator(actor, operator): SessionOperator,
) -> Json<Success<WhoAmIResponse>> {
    Success::json(auth::whoami(&actor, &operator))
}

async fn handle_list_operators(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
) -> Result<Json<Success<ListOperatorsResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = auth::list_operators(&mut persistence, &actor, &operator)?;
    Ok(Success::json(response))
}

async fn handle_create_operator(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<CreateOperatorRequest>,
) -> Result<Json<Success<CreateOperatorResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = auth::create_operator(&mut persistence, req, &actor, &operator, cause)?;
    drop(persistence);

    app_state.publish(&LiveEvent::resource("operators"));
    Ok(Success::json(response))
}

async fn handle_disable_operator(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<OperatorStatusRequest>,
) -> Result<Json<Success<OperatorStatusResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = auth::disable_operator(&mut persistence, req, &actor, &operator, cause)?;
    drop(persistence);

    app_state.publish(&LiveEvent::resource("operators"));
    Ok(Success::json(response))
}

async fn handle_enable_operator(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<OperatorStatusRequest>,
) -> Result<Json<Success<OperatorStatusResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = auth::enable_operator(&mut persistence, req, &actor, &operator, cause)?;
    drop(persistence);

    app_state.publish(&LiveEvent::resource("operators"));
    Ok(Success::json(response))
}
