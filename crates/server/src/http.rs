// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Response envelopes and error mapping.
//!
//! Successful responses are `{ "success": true, ...payload }`; failures are
//! `{ "success": false, "error": "..." }` with a status chosen from the
//! [`ApiError`] variant.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{Method, StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use fleetdesk_api::ApiError;
use fleetdesk_audit::Cause;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tracing::error;

/// Header a client may set to correlate timeline entries with its own
/// request log.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A successful response with the payload's fields inlined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Success<T> {
    /// Always `true`.
    pub success: bool,
    /// The handler's response.
    #[serde(flatten)]
    pub data: T,
}

impl<T> Success<T> {
    /// Wraps a payload.
    pub const fn json(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

/// A payload that is only a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageBody {
    /// What happened.
    pub message: String,
}

/// The body of every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// What went wrong.
    pub error: String,
}

impl ErrorBody {
    /// Builds a failure response.
    pub fn response(status: StatusCode, error: String) -> Response {
        (
            status,
            Json(Self {
                success: false,
                error,
            }),
        )
            .into_response()
    }
}

/// An error on its way out as an HTTP response.
#[derive(Debug)]
pub struct HttpError {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error message.
    pub message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        ErrorBody::response(self.status, self.message)
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. } | ApiError::PasswordPolicyViolation { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// The audit cause for a write, taken from `X-Request-Id` when present and
/// otherwise named after the route.
pub struct RequestCause(pub Cause);

impl<S: Send + Sync> FromRequestParts<S> for RequestCause {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let route = format!("{} {}", parts.method, parts.uri.path());
        let id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map_or_else(|| route.clone(), String::from);
        let description = if parts.method == Method::DELETE {
            format!("Deletion via {route}")
        } else {
            format!("HTTP request {route}")
        };
        Ok(Self(Cause::new(id, description)))
    }
}
