// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `WorkDrive` folders and document links.

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    routing::{delete, get, post},
};
use fleetdesk_api::{
    AddDocumentRequest, CreateFolderRequest, CreatedResponse, ListFolderResponse,
    MoveDocumentRequest, RenameRequest, WriteResponse, handlers::workdrive,
};
use serde::Deserialize;

use crate::AppState;
use crate::http::{HttpError, RequestCause, Success};
use crate::live::LiveEvent;
use crate::session::SessionOperator;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/workdrive", get(handle_list_folder))
        .route("/workdrive/folders", post(handle_create_folder))
        .route("/workdrive/folders/rename", post(handle_rename_folder))
        .route("/workdrive/folders/{folder_id}", delete(handle_delete_folder))
        .route("/workdrive/documents", post(handle_add_document))
        .route("/workdrive/documents/move", post(handle_move_document))
        .route("/workdrive/documents/rename", post(handle_rename_document))
        .route(
            "/workdrive/documents/{document_id}",
            delete(handle_delete_document),
        )
}

#[derive(Debug, Default, Deserialize)]
struct FolderQuery {
    folder_id: Option<i64>,
}

fn workdrive_changed(app_state: &AppState) {
    app_state.publish(&LiveEvent::resource("workdrive"));
}

async fn handle_list_folder(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionOperator,
    Query(query): Query<FolderQuery>,
) -> Result<Json<Success<ListFolderResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = workdrive::list_folder(&mut persistence, query.folder_id)?;
    Ok(Success::json(response))
}

async fn handle_create_folder(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<CreateFolderRequest>,
) -> Result<Json<Success<CreatedResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = workdrive::create_folder(&mut persistence, &req, &actor, &operator, cause)?;
    drop(persistence);

    workdrive_changed(&app_state);
    Ok(Success::json(response))
}

async fn handle_rename_folder(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<RenameRequest>,
) -> Result<Json<Success<WriteResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = workdrive::rename_folder(&mut persistence, &req, &actor, &operator, cause)?;
    drop(persistence);

    workdrive_changed(&app_state);
    Ok(Success::json(response))
}

async fn handle_delete_folder(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Path(folder_id): Path<i64>,
) -> Result<Json<Success<WriteResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = workdrive::delete_folder(&mut persistence, folder_id, &actor, &operator, cause)?;
    drop(persistence);

    workdrive_changed(&app_state);
    Ok(Success::json(response))
}

async fn handle_add_document(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<AddDocumentRequest>,
) -> Result<Json<Success<CreatedResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = workdrive::add_document(&mut persistence, req, &actor, &operator, cause)?;
    drop(persistence);

    workdrive_changed(&app_state);
    Ok(Success::json(response))
}

async fn handle_move_document(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<MoveDocumentRequest>,
) -> Result<Json<Success<WriteResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = workdrive::move_document(&mut persistence, req, &actor, &operator, cause)?;
    drop(persistence);

    workdrive_changed(&app_state);
    Ok(Success::json(response))
}

async fn handle_rename_document(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<RenameRequest>,
) -> Result<Json<Success<WriteResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = workdrive::rename_document(&mut persistence, &req, &actor, &operator, cause)?;
    drop(persistence);

    workdrive_changed(&app_state);
    Ok(Success::json(response))
}

async fn handle_delete_document(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Path(document_id): Path<i64>,
) -> Result<Json<Success<WriteResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response =
        workdrive::delete_document(&mut persistence, document_id, &actor, &operator, cause)?;
    drop(persistence);

    workdrive_changed(&app_state);
    Ok(Success::json(response))
}
