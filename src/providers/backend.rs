// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authenticated request forwarding to the backend API.
//!
//! A forwarded call attaches the located session cookie, makes exactly one
//! request, and folds whatever happens into a [`ForwardResult`]. Nothing is
//! retried, refreshed or cached; the caller decides what to show.

use axum::http::{
    header::{CACHE_CONTROL, CONTENT_TYPE, COOKIE},
    Method,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use crate::config::Config;

/// Error code reported when a session-only endpoint is called without one.
pub const NO_ACTIVE_SESSION: &str = "No active session";

/// A backend resource plus the wording used when calling it fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub path: &'static str,
    pub method: Method,
    /// When set, an empty credential short-circuits with "No active session".
    pub requires_session: bool,
    /// Completes "Please sign in to access ...".
    pub subject: &'static str,
    /// `error` when the backend answers non-2xx without its own `error`.
    pub http_failure: &'static str,
    /// `error` when the call itself fails.
    pub transport_failure: &'static str,
}

impl Endpoint {
    pub const PUBLIC: Endpoint = Endpoint {
        path: "/api/public",
        method: Method::GET,
        requires_session: false,
        subject: "public routes",
        http_failure: "Failed to access public route",
        transport_failure: "Failed to test public route",
    };

    pub const PROTECTED: Endpoint = Endpoint {
        path: "/api/protected",
        method: Method::GET,
        requires_session: true,
        subject: "protected routes",
        http_failure: "Failed to access protected route",
        transport_failure: "Failed to test protected route",
    };

    pub const ADMIN: Endpoint = Endpoint {
        path: "/api/admin",
        method: Method::GET,
        requires_session: true,
        subject: "admin routes",
        http_failure: "Failed to access admin route",
        transport_failure: "Failed to test admin route",
    };

    pub const PROFILE: Endpoint = Endpoint {
        path: "/api/profile",
        method: Method::GET,
        requires_session: true,
        subject: "profile",
        http_failure: "Failed to get profile",
        transport_failure: "Failed to get user profile",
    };

    /// Look up a named endpoint by its action name.
    pub fn by_name(name: &str) -> Option<Endpoint> {
        match name {
            "public" => Some(Self::PUBLIC),
            "protected" => Some(Self::PROTECTED),
            "admin" => Some(Self::ADMIN),
            "profile" => Some(Self::PROFILE),
            _ => None,
        }
    }

    fn sign_in_message(&self) -> String {
        format!("Please sign in to access {}", self.subject)
    }
}

/// Uniform outcome of a forwarded call.
///
/// - success: `{success: true, data}`
/// - backend said no: `{success: false, error, message, status}`
/// - call failed or no session: `{success: false, error, message}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForwardResult {
    pub success: bool,
    /// The backend body's `data` field.
    #[serde(rename = "data", default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// HTTP status, only for backend (non-2xx) failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ForwardResult {
    pub fn ok(payload: Option<Value>) -> Self {
        Self {
            success: true,
            payload,
            error: None,
            message: None,
            status: None,
        }
    }

    pub fn no_session(endpoint: &Endpoint) -> Self {
        Self::failed(NO_ACTIVE_SESSION.to_string(), Some(endpoint.sign_in_message()), None)
    }

    pub fn rejected(error: String, message: Option<String>, status: u16) -> Self {
        Self::failed(error, message, Some(status))
    }

    pub fn transport(endpoint: &Endpoint, cause: impl std::fmt::Display) -> Self {
        Self::failed(
            endpoint.transport_failure.to_string(),
            Some(cause.to_string()),
            None,
        )
    }

    fn failed(error: String, message: Option<String>, status: Option<u16>) -> Self {
        Self {
            success: false,
            payload: None,
            error: Some(error),
            message,
            status,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    api_base_url: String,
    http: Client,
}

impl BackendClient {
    pub fn new(config: &Config, http: Client) -> Self {
        Self {
            api_base_url: config.api_url(""),
            http,
        }
    }

    /// Forward one call to `endpoint` carrying `credential` (a `Cookie`
    /// header value, empty when no session cookie was found).
    pub async fn forward(&self, endpoint: &Endpoint, credential: &str) -> ForwardResult {
        if credential.is_empty() && endpoint.requires_session {
            debug!(path = endpoint.path, "no session cookie, not forwarding");
            return ForwardResult::no_session(endpoint);
        }

        let url = format!("{}{}", self.api_base_url.trim_end_matches('/'), endpoint.path);
        let mut request = self
            .http
            .request(endpoint.method.clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(CACHE_CONTROL, "no-store");
        if !credential.is_empty() {
            request = request.header(COOKIE, credential);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(path = endpoint.path, error = %e, "backend request failed");
                return ForwardResult::transport(endpoint, e);
            }
        };

        let status = response.status();
        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!(path = endpoint.path, status = status.as_u16(), error = %e, "backend returned unreadable body");
                return ForwardResult::transport(endpoint, e);
            }
        };

        if !status.is_success() {
            info!(path = endpoint.path, status = status.as_u16(), "backend rejected forwarded call");
            let error = body
                .get("error")
                .and_then(Value::as_str)
                .filter(|e| !e.is_empty())
                .unwrap_or(endpoint.http_failure)
                .to_string();
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string);
            return ForwardResult::rejected(error, message, status.as_u16());
        }

        debug!(path = endpoint.path, status = status.as_u16(), "forwarded call succeeded");
        ForwardResult::ok(body.get("data").cloned())
    }

    /// Any HTTP answer from the backend, whatever its status, counts as
    /// reachable.
    pub async fn is_reachable(&self) -> bool {
        let url = format!(
            "{}{}",
            self.api_base_url.trim_end_matches('/'),
            Endpoint::PUBLIC.path
        );
        self.http
            .get(url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await
            .is_ok()
    }
}
