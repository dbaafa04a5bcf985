// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session-forwarding actions.
//!
//! Each action forwards the caller's session cookie to one backend route and
//! returns the normalized [`ForwardResult`]. The HTTP status is always 200:
//! success or failure lives in the result value, and the browser decides how
//! to present it.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    auth::{Credential, CurrentSession, Session},
    error::ApiError,
    providers::{Endpoint, ForwardResult},
    state::AppState,
};

/// Forward the session to a named backend route.
#[utoipa::path(
    post,
    path = "/actions/{action}",
    tag = "Actions",
    params(("action" = String, Path, description = "public, protected, admin or profile")),
    responses(
        (status = 200, description = "Forwarded call outcome", body = ForwardResult),
        (status = 404, description = "Unknown action"),
    )
)]
pub async fn run_action(
    State(state): State<AppState>,
    Path(action): Path<String>,
    Credential(credential): Credential,
) -> Result<Json<ForwardResult>, ApiError> {
    let endpoint = Endpoint::by_name(&action).ok_or_else(|| ApiError::unknown_action(&action))?;

    let result = state
        .backend
        .forward(&endpoint, &credential.header_value())
        .await;

    Ok(Json(result))
}

/// Current session, or `null` when signed out or the lookup fails.
#[utoipa::path(
    get,
    path = "/actions/current-user",
    tag = "Actions",
    responses(
        (status = 200, description = "Session or null", body = Option<Session>),
    )
)]
pub async fn current_user(CurrentSession(ctx): CurrentSession) -> Json<Option<Session>> {
    Json(ctx.into_session())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::router;
    use crate::config::Config;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn state_for(server: &MockServer) -> AppState {
        AppState::new(Config {
            api_base_url: crate::config::parse_base_url(&server.uri()).unwrap(),
            ..Config::default()
        })
    }

    async fn call(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn protected_action_forwards_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/protected"))
            .and(header("cookie", "backend.session_token=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "user": { "name": "Alice", "role": "admin" } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = Request::post("/actions/protected")
            .header("cookie", "backend.session_token=abc; theme=dark")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(state_for(&server), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "success": true, "data": { "user": { "name": "Alice", "role": "admin" } } })
        );
    }

    #[tokio::test]
    async fn encoded_cookie_reaches_backend_unchanged() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/profile"))
            .and(header("cookie", "backend.session_token=abc.sig%2B%2F%3D"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
            .expect(1)
            .mount(&server)
            .await;

        let request = Request::post("/actions/profile")
            .header("cookie", "backend.session_token=abc.sig%2B%2F%3D")
            .body(Body::empty())
            .unwrap();
        let (_, body) = call(state_for(&server), request).await;

        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn protected_action_without_cookie_reports_no_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let request = Request::post("/actions/admin").body(Body::empty()).unwrap();
        let (status, body) = call(state_for(&server), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "success": false,
                "error": "No active session",
                "message": "Please sign in to access admin routes"
            })
        );
    }

    #[tokio::test]
    async fn unknown_action_is_404() {
        let server = MockServer::start().await;
        let request = Request::post("/actions/wallets").body(Body::empty()).unwrap();
        let (status, body) = call(state_for(&server), request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Unknown action: wallets");
    }

    #[tokio::test]
    async fn current_user_is_null_without_cookie() {
        let server = MockServer::start().await;
        let request = Request::get("/actions/current-user").body(Body::empty()).unwrap();
        let (status, body) = call(state_for(&server), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn current_user_is_null_when_lookup_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/get-session"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let request = Request::get("/actions/current-user")
            .header("cookie", "backend.session_token=abc")
            .body(Body::empty())
            .unwrap();
        let (_, body) = call(state_for(&server), request).await;

        assert_eq!(body, Value::Null);
    }
}
