// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Prepaid accounts, top-ups and expense transactions.

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    routing::{get, post},
};
use fleetdesk_api::{
    CreatePrepaidAccountRequest, CreatedResponse, LedgerWriteResponse, ListExpensesRequest,
    ListExpensesResponse, ListPrepaidAccountsResponse, ListTopupsResponse,
    ReconcileAccountResponse, RecordExpenseRequest, TopUpAccountRequest, handlers::ledger,
};
use serde::Deserialize;

use crate::AppState;
use crate::http::{HttpError, RequestCause, Success};
use crate::live::LiveEvent;
use crate::session::SessionOperator;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(handle_list_accounts))
        .route("/accounts", post(handle_create_account))
        .route("/accounts/topup", post(handle_top_up))
        .route("/accounts/{account_id}/reconcile", post(handle_reconcile))
        .route("/topups", get(handle_list_topups))
        .route("/expenses", get(handle_list_expenses))
        .route("/expenses", post(handle_record_expense))
}

#[derive(Debug, Default, Deserialize)]
struct TopupsQuery {
    account_id: Option<i64>,
}

fn accounts_changed(app_state: &AppState) {
    app_state.publish(&LiveEvent::resource("prepaid_accounts"));
}

async fn handle_list_accounts(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionOperator,
) -> Result<Json<Success<ListPrepaidAccountsResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = ledger::list_prepaid_accounts(&mut persistence)?;
    Ok(Success::json(response))
}

async fn handle_create_account(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<CreatePrepaidAccountRequest>,
) -> Result<Json<Success<CreatedResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = ledger::create_prepaid_account(&mut persistence, &req, &actor, &operator, cause)?;
    drop(persistence);

    accounts_changed(&app_state);
    Ok(Success::json(response))
}

async fn handle_top_up(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<TopUpAccountRequest>,
) -> Result<Json<Success<LedgerWriteResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = ledger::top_up_account(&mut persistence, req, &actor, &operator, cause)?;
    drop(persistence);

    accounts_changed(&app_state);
    Ok(Success::json(response))
}

async fn handle_reconcile(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Path(account_id): Path<i64>,
) -> Result<Json<Success<ReconcileAccountResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response =
        ledger::reconcile_account(&mut persistence, account_id, &actor, &operator, cause)?;
    drop(persistence);

    if response.event_id.is_some() {
        accounts_changed(&app_state);
    }
    Ok(Success::json(response))
}

async fn handle_list_topups(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionOperator,
    Query(query): Query<TopupsQuery>,
) -> Result<Json<Success<ListTopupsResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = ledger::list_topups(&mut persistence, query.account_id)?;
    Ok(Success::json(response))
}

async fn handle_list_expenses(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionOperator,
    Query(req): Query<ListExpensesRequest>,
) -> Result<Json<Success<ListExpensesResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = ledger::list_expense_transactions(&mut persistence, &req)?;
    Ok(Success::json(response))
}

async fn handle_record_expense(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    RequestCause(cause): RequestCause,
    Json(req): Json<RecordExpenseRequest>,
) -> Result<Json<Success<LedgerWriteResponse>>, HttpError> {
    let job_id = req.job_id.clone();
    let mut persistence = app_state.persistence.lock().await;
    let response = ledger::record_expense(&mut persistence, req, &actor, &operator, cause)?;
    drop(persistence);

    accounts_changed(&app_state);
    if let Some(job_id) = job_id {
        app_state.publish(&LiveEvent::BookingChanged { job_id });
    }
    Ok(Success::json(response))
}
