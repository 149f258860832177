// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dashboard figures and the expense export.

use axum::{
    Json, Router,
    extract::{Query, State as AxumState},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::get,
};
use fleetdesk_api::{DashboardSummary, ReportRequest, handlers::reports};
use tracing::info;

use crate::AppState;
use crate::http::{HttpError, Success};
use crate::session::SessionOperator;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports/dashboard", get(handle_dashboard))
        .route("/reports/expenses.csv", get(handle_export_expenses))
}

async fn handle_dashboard(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Query(req): Query<ReportRequest>,
) -> Result<Json<Success<DashboardSummary>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = reports::dashboard_summary(&mut persistence, &req, &actor, app_state.timezone)?;
    Ok(Success::json(response))
}

/// Streams the CSV itself rather than the JSON envelope so browsers can
/// download it directly.
async fn handle_export_expenses(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Query(req): Query<ReportRequest>,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let export = reports::export_expenses_csv(&mut persistence, &req, &actor, app_state.timezone)?;
    drop(persistence);

    info!(actor_id = %actor.id, rows = export.row_count, "Expense CSV downloaded");
    Ok((
        [
            (CONTENT_TYPE, String::from("text/csv; charset=utf-8")),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.file_name),
            ),
        ],
        export.content,
    )
        .into_response())
}
