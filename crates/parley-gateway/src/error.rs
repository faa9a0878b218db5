// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping from [`ParleyError`] to JSON error responses.
//!
//! Client errors carry their message. Storage, configuration, and internal
//! failures are logged in full and answered with a generic body so that SQL
//! or filesystem details never reach the caller.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use parley_core::ParleyError;
use serde::Serialize;
use utoipa::ToSchema;

/// Body returned for every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// An HTTP status paired with the message sent to the client.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ParleyError> for ApiError {
    fn from(err: ParleyError) -> Self {
        match &err {
            ParleyError::Validation(message) => Self::bad_request(message.clone()),
            ParleyError::NotFound { .. } => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            ParleyError::Auth(message) => Self::unauthorized(message.clone()),
            ParleyError::Storage { .. }
            | ParleyError::Provider { .. }
            | ParleyError::Config(_)
            | ParleyError::Internal(_) => {
                tracing::error!(error = %err, "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}
