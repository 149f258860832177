// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::http::StatusCode;
use serde_json::json;

use crate::tests::helpers::{TEST_PASSWORD, TestApp};

#[tokio::test]
async fn test_bootstrap_then_login_then_whoami() {
    let app = TestApp::new();

    let (status, body) = app.call("GET", "/auth/bootstrap", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["is_bootstrap_mode"], json!(true));

    let (status, body) = app
        .call(
            "POST",
            "/auth/bootstrap",
            None,
            Some(json!({
                "login_name": "ngozi",
                "display_name": "Ngozi Eze",
                "password": TEST_PASSWORD,
                "password_confirmation": TEST_PASSWORD,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["login_name"], json!("NGOZI"));

    let token = app.login("ngozi").await;
    let (status, body) = app.call("GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["role"], json!("Admin"));
}

#[tokio::test]
async fn test_second_bootstrap_is_rule_violation() {
    let app = TestApp::new();
    app.add_operator("admin1", "Admin").await;

    let (status, body) = app
        .call(
            "POST",
            "/auth/bootstrap",
            None,
            Some(json!({
                "login_name": "intruder",
                "display_name": "Not Welcome",
                "password": TEST_PASSWORD,
                "password_confirmation": TEST_PASSWORD,
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_missing_token_is_401() {
    let app = TestApp::new();

    let (status, body) = app.call("GET", "/bookings", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("Authorization"));
}

#[tokio::test]
async fn test_wrong_password_is_401() {
    let app = TestApp::new();
    app.add_operator("admin1", "Admin").await;

    let (status, body) = app
        .call(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "login_name": "admin1", "password": "Wrong-Password-1" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_logout_invalidates_token() {
    let app = TestApp::new();
    let token = app.token_for("admin1", "Admin").await;

    let (status, _) = app.call("POST", "/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.call("GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_manager_cannot_create_operators() {
    let app = TestApp::new();
    let token = app.token_for("manager1", "Manager").await;

    let (status, body) = app
        .call(
            "POST",
            "/operators",
            Some(&token),
            Some(json!({
                "login_name": "tunde",
                "display_name": "Tunde Adeyemi",
                "role": "Dispatcher",
                "password": TEST_PASSWORD,
                "password_confirmation": TEST_PASSWORD,
            })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], json!(false));
}
