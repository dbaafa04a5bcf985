// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cookie inspection page for admins testing the forwarded routes by hand.

use axum::{extract::State, http::HeaderMap, Json};
use axum_extra::extract::CookieJar;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{auth::AdminOnly, state::AppState};

const PREVIEW_CHARS: usize = 50;
const TRUNCATE_CHARS: usize = 100;

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionCookieStatus {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Ready-to-paste `Cookie: name=value` line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie_header: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CookieEntry {
    pub name: String,
    pub value: String,
    pub is_session: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CookieDebugResponse {
    pub session: SessionCookieStatus,
    pub cookies: Vec<CookieEntry>,
}

fn shorten(value: &str, max: usize) -> String {
    if value.chars().count() > max {
        format!("{}...", value.chars().take(max).collect::<String>())
    } else {
        value.to_string()
    }
}

/// First [`PREVIEW_CHARS`] characters, always followed by `...`.
fn preview(value: &str) -> String {
    format!("{}...", value.chars().take(PREVIEW_CHARS).collect::<String>())
}

/// The session entry uses the raw header value; the listing is decoded.
pub fn inspect(state: &AppState, headers: &HeaderMap) -> CookieDebugResponse {
    let credential = state.locator.locate_in_headers(headers);
    let jar = CookieJar::from_headers(headers);
    let session = match credential.cookie() {
        Some(cookie) => SessionCookieStatus {
            found: true,
            name: Some(cookie.name.clone()),
            preview: Some(preview(&cookie.value)),
            value: Some(cookie.value.clone()),
            cookie_header: Some(format!("Cookie: {}", cookie.header_value())),
        },
        None => SessionCookieStatus {
            found: false,
            name: None,
            preview: None,
            value: None,
            cookie_header: None,
        },
    };

    let session_name = credential.cookie().map(|c| c.name.as_str());
    let mut cookies: Vec<CookieEntry> = jar
        .iter()
        .map(|c| CookieEntry {
            name: c.name().to_string(),
            value: shorten(c.value(), TRUNCATE_CHARS),
            is_session: Some(c.name()) == session_name,
        })
        .collect();
    cookies.sort_by(|a, b| a.name.cmp(&b.name));

    CookieDebugResponse { session, cookies }
}

#[utoipa::path(
    get,
    path = "/debug/cookies",
    tag = "Debug",
    responses(
        (status = 200, description = "Cookies on this request", body = CookieDebugResponse),
        (status = 303, description = "Not an admin; redirect to sign-in"),
    )
)]
pub async fn cookies(
    State(state): State<AppState>,
    _admin: AdminOnly,
    headers: HeaderMap,
) -> Json<CookieDebugResponse> {
    Json(inspect(&state, &headers))
}
