// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use fleetdesk_domain::DEFAULT_TIMEZONE;
use fleetdesk_persistence::Persistence;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{AppState, build_router};

pub const TEST_PASSWORD: &str = "Fleet-Desk-2026";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let persistence = Persistence::new_in_memory().expect("in-memory database");
        let state = AppState::new(persistence, DEFAULT_TIMEZONE);
        Self {
            router: build_router(state.clone()),
            state,
        }
    }

    /// Creates an operator straight in the database and returns its id.
    pub async fn add_operator(&self, login: &str, role: &str) -> i64 {
        let mut persistence = self.state.persistence.lock().await;
        persistence
            .create_operator(login, &format!("Test {login}"), TEST_PASSWORD, role)
            .unwrap()
    }

    /// Creates an operator and logs them in over HTTP.
    pub async fn token_for(&self, login: &str, role: &str) -> String {
        self.add_operator(login, role).await;
        self.login(login).await
    }

    pub async fn login(&self, login: &str) -> String {
        let (status, body) = self
            .call(
                "POST",
                "/auth/login",
                None,
                Some(json!({ "login_name": login, "password": TEST_PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["session_token"].as_str().unwrap().to_string()
    }

    pub async fn raw(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Sends a request and decodes the JSON body.
    pub async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.raw(method, uri, token, body).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

pub fn booking_body(phone: &str) -> Value {
    json!({
        "client_name": "Chinedu Okafor",
        "client_phone": phone,
        "client_company": "Okafor Foods Ltd",
        "client_email": null,
        "client_address": null,
        "pickup_address": "12 Wharf Road, Apapa",
        "dropoff_address": "5 Ring Road, Ibadan",
        "route": "Lagos-Ibadan Expressway",
        "cargo_description": "40 pallets of flour",
        "pickup_date": "2026-03-14",
        "budget": "450,000",
        "notes": null
    })
}

/// Creates a booking over HTTP and returns its job id.
pub async fn create_booking(app: &TestApp, token: &str, phone: &str) -> String {
    let (status, body) = app
        .call("POST", "/bookings", Some(token), Some(booking_body(phone)))
        .await;
    assert_eq!(status, StatusCode::OK, "create booking failed: {body}");
    body["job_id"].as_str().unwrap().to_string()
}
