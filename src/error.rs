// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Errors raised by the gateway itself, before any upstream is involved.
//! Upstream auth failures are [`crate::auth::AuthError`]; backend failures
//! travel inside a `ForwardResult`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    /// Form input failed validation. Nothing was sent upstream.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: message.into(),
        }
    }

    /// No forwarded action by that name.
    pub fn unknown_action(action: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("Unknown action: {action}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}
