// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Errors from calls to the external auth service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Auth service error type.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The auth service answered with a non-2xx status.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    /// Network failure or an unreadable response body.
    #[error("Auth service unavailable: {0}")]
    Upstream(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Rejected { .. } => "auth_rejected",
            AuthError::Upstream(_) => "auth_unavailable",
        }
    }

    /// Get the HTTP status code for this error.
    ///
    /// Rejections keep the auth service's own status so the browser sees
    /// the same 401/403/422 the service produced.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Rejected { status, .. } => *status,
            AuthError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
