// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::http::{StatusCode, header};
use serde_json::json;

use crate::tests::helpers::{TestApp, create_booking};

#[tokio::test]
async fn test_dashboard_counts_new_booking() {
    let app = TestApp::new();
    let dispatcher = app.token_for("dispatch1", "Dispatcher").await;
    let manager = app.token_for("manager1", "Manager").await;
    create_booking(&app, &dispatcher, "08031234567").await;

    let (status, body) = app
        .call("GET", "/reports/dashboard?bucket=today", Some(&manager), None)
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["bucket"], json!("today"));
    assert_eq!(body["total_bookings"], json!(1));
    assert_eq!(body["delivered"], json!(0));
}

#[tokio::test]
async fn test_dispatcher_cannot_view_dashboard() {
    let app = TestApp::new();
    let token = app.token_for("dispatch1", "Dispatcher").await;

    let (status, body) = app
        .call("GET", "/reports/dashboard", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_unknown_bucket_is_400() {
    let app = TestApp::new();
    let token = app.token_for("accounts1", "Accountant").await;

    let (status, _) = app
        .call("GET", "/reports/dashboard?bucket=last_decade", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_expense_csv_is_a_download() {
    let app = TestApp::new();
    let token = app.token_for("accounts1", "Accountant").await;

    let response = app
        .raw("GET", "/reports/expenses.csv?bucket=this_month", Some(&token), None)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers[header::CONTENT_TYPE].to_str().unwrap(),
        "text/csv; charset=utf-8"
    );
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"expenses-this_month-"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert_eq!(
        text.lines().next(),
        Some("date,job_id,account,category,amount_naira,description,receipt_url")
    );
}
