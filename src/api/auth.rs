// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Endpoints behind the sign-in, sign-up, email verification, password reset
//! and sign-out screens.
//!
//! Every handler validates its input, relays the call to the auth service,
//! and passes the service's `Set-Cookie` headers through to the browser. The
//! answer names the page the browser should go to next.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::{
    auth::{AuthError, AuthResponse, Credential, CurrentSession, SessionContext, SessionCredential},
    error::ApiError,
    models::{
        AuthOutcome, EmailRequest, ResetPasswordRequest, SignInRequest, SignUpRequest, Validate,
        VerifyEmailRequest,
    },
    state::AppState,
};

/// Failure from an auth screen: bad input or an auth service error.
#[derive(Debug)]
pub enum AuthRouteError {
    Invalid(ApiError),
    Auth(AuthError),
}

impl From<AuthError> for AuthRouteError {
    fn from(e: AuthError) -> Self {
        AuthRouteError::Auth(e)
    }
}

impl IntoResponse for AuthRouteError {
    fn into_response(self) -> Response {
        match self {
            AuthRouteError::Invalid(e) => e.into_response(),
            AuthRouteError::Auth(e) => e.into_response(),
        }
    }
}

fn validated<T: Validate>(request: &T) -> Result<(), AuthRouteError> {
    request
        .validate()
        .map_err(|message| AuthRouteError::Invalid(ApiError::invalid_input(message)))
}

/// `/path?email=<urlencoded>`
fn with_email(path: &str, email: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(email.trim().as_bytes()).collect();
    format!("{path}?email={encoded}")
}

/// Outcome body plus the auth service's cookies.
fn relay(set_cookies: Vec<HeaderValue>, outcome: AuthOutcome) -> Response {
    let mut headers = HeaderMap::new();
    for value in set_cookies {
        headers.append(SET_COOKIE, value);
    }
    (StatusCode::OK, headers, Json(outcome)).into_response()
}

/// Session context after an auth call that may have replaced the cookie.
async fn refreshed(
    state: &AppState,
    previous: SessionCredential,
    response: &AuthResponse,
) -> SessionContext {
    let credential = state
        .locator
        .locate_in_set_cookies(&response.set_cookies)
        .unwrap_or(previous);
    let mut ctx = SessionContext::default();
    ctx.refresh(&state.auth, credential).await;
    ctx
}

#[utoipa::path(
    post,
    path = "/auth/sign-in",
    tag = "Auth",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in; session cookie set", body = AuthOutcome),
        (status = 401, description = "Rejected by the auth service"),
        (status = 422, description = "Invalid input"),
    )
)]
pub async fn sign_in(
    State(state): State<AppState>,
    Credential(credential): Credential,
    Json(request): Json<SignInRequest>,
) -> Result<Response, AuthRouteError> {
    validated(&request)?;

    let response = state.auth.sign_in_email(&credential, &request).await?;
    let ctx = refreshed(&state, credential, &response).await;
    info!(authenticated = ctx.is_authenticated(), "email sign-in completed");

    let user = ctx.into_session().map(|s| s.user);
    Ok(relay(
        response.set_cookies,
        AuthOutcome::redirect("/dashboard").with_user(user),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/sign-up",
    tag = "Auth",
    request_body = SignUpRequest,
    responses(
        (status = 200, description = "Account created; verify email next", body = AuthOutcome),
        (status = 422, description = "Invalid input or account exists"),
    )
)]
pub async fn sign_up(
    State(state): State<AppState>,
    Credential(credential): Credential,
    Json(request): Json<SignUpRequest>,
) -> Result<Response, AuthRouteError> {
    validated(&request)?;

    let response = state.auth.sign_up_email(&credential, &request).await?;
    info!("email sign-up completed");

    Ok(relay(
        response.set_cookies,
        AuthOutcome::redirect(with_email("/verify-email", &request.email)),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/verify-email",
    tag = "Auth",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Email verified", body = AuthOutcome),
        (status = 400, description = "Invalid or expired code"),
        (status = 422, description = "Invalid input"),
    )
)]
pub async fn verify_email(
    State(state): State<AppState>,
    Credential(credential): Credential,
    Json(request): Json<VerifyEmailRequest>,
) -> Result<Response, AuthRouteError> {
    validated(&request)?;

    let response = state.auth.verify_email(&credential, &request).await?;
    let ctx = refreshed(&state, credential, &response).await;

    let user = ctx.into_session().map(|s| s.user);
    Ok(relay(
        response.set_cookies,
        AuthOutcome::redirect("/dashboard").with_user(user),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/verify-email/resend",
    tag = "Auth",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "New code sent", body = AuthOutcome),
        (status = 422, description = "Invalid input"),
    )
)]
pub async fn resend_verification(
    State(state): State<AppState>,
    Json(request): Json<EmailRequest>,
) -> Result<Response, AuthRouteError> {
    validated(&request)?;

    let response = state.auth.send_verification_otp(&request).await?;
    Ok(relay(response.set_cookies, AuthOutcome::stay()))
}

#[utoipa::path(
    post,
    path = "/auth/forget-password",
    tag = "Auth",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Reset code sent", body = AuthOutcome),
        (status = 422, description = "Invalid input"),
    )
)]
pub async fn forget_password(
    State(state): State<AppState>,
    Json(request): Json<EmailRequest>,
) -> Result<Response, AuthRouteError> {
    validated(&request)?;

    let response = state.auth.forget_password(&request).await?;
    Ok(relay(
        response.set_cookies,
        AuthOutcome::redirect(with_email("/reset-password", &request.email)),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/reset-password",
    tag = "Auth",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = AuthOutcome),
        (status = 400, description = "Invalid or expired code"),
        (status = 422, description = "Invalid input"),
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Response, AuthRouteError> {
    validated(&request)?;

    let response = state.auth.reset_password(&request).await?;
    info!("password reset completed");

    Ok(relay(response.set_cookies, AuthOutcome::redirect("/sign-in")))
}

#[utoipa::path(
    post,
    path = "/auth/sign-out",
    tag = "Auth",
    responses(
        (status = 200, description = "Signed out; session cookie cleared", body = AuthOutcome),
    )
)]
pub async fn sign_out(
    State(state): State<AppState>,
    Credential(credential): Credential,
) -> Result<Response, AuthRouteError> {
    let response = state.auth.sign_out(&credential).await?;
    info!(had_session = credential.is_present(), "signed out");

    Ok(relay(response.set_cookies, AuthOutcome::redirect("/sign-in")))
}

/// Sign in anonymously unless a session already exists.
#[utoipa::path(
    post,
    path = "/auth/anonymous",
    tag = "Auth",
    responses(
        (status = 200, description = "Existing or new anonymous session", body = AuthOutcome),
    )
)]
pub async fn anonymous(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
) -> Result<Response, AuthRouteError> {
    if let Some(session) = ctx.session() {
        return Ok(relay(
            Vec::new(),
            AuthOutcome::stay().with_user(Some(session.user.clone())),
        ));
    }

    let response = state.auth.sign_in_anonymous().await?;
    let ctx = refreshed(&state, ctx.credential().clone(), &response).await;
    info!(authenticated = ctx.is_authenticated(), "anonymous sign-in completed");

    let user = ctx.into_session().map(|s| s.user);
    Ok(relay(response.set_cookies, AuthOutcome::stay().with_user(user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::router;
    use crate::config::Config;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
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

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(state: AppState, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, serde_json::from_slice(&bytes).unwrap())
    }

    fn session_json(role: &str) -> Value {
        json!({
            "session": { "id": "s1", "userId": "u1" },
            "user": { "id": "u1", "name": "Alice", "email": "alice@example.com", "role": role }
        })
    }

    #[test]
    fn with_email_encodes_query() {
        assert_eq!(
            with_email("/reset-password", "a+b@example.com"),
            "/reset-password?email=a%2Bb%40example.com"
        );
    }

    #[tokio::test]
    async fn sign_in_relays_cookie_and_reports_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/sign-in/email"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "backend.session_token=fresh; Path=/; HttpOnly")
                    .set_body_json(json!({ "redirect": false })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/auth/get-session"))
            .and(header("cookie", "backend.session_token=fresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_json("user")))
            .expect(1)
            .mount(&server)
            .await;

        let request = post_json(
            "/auth/sign-in",
            json!({ "email": "alice@example.com", "password": "password123" }),
        );
        let (status, headers, body) = send(state_for(&server), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[SET_COOKIE],
            "backend.session_token=fresh; Path=/; HttpOnly"
        );
        assert_eq!(body["redirect_to"], "/dashboard");
        assert_eq!(body["user"]["name"], "Alice");
    }

    #[tokio::test]
    async fn invalid_sign_in_never_reaches_auth_service() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let request = post_json(
            "/auth/sign-in",
            json!({ "email": "alice@example.com", "password": "short" }),
        );
        let (status, _, body) = send(state_for(&server), request).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Password must be at least 8 characters.");
    }

    #[tokio::test]
    async fn rejected_sign_in_keeps_upstream_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/sign-in/email"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "code": "INVALID_EMAIL_OR_PASSWORD",
                "message": "Invalid email or password"
            })))
            .mount(&server)
            .await;

        let request = post_json(
            "/auth/sign-in",
            json!({ "email": "alice@example.com", "password": "wrongpassword" }),
        );
        let (status, headers, body) = send(state_for(&server), request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(headers.get(SET_COOKIE).is_none());
        assert_eq!(body["error"], "Invalid email or password");
    }

    #[tokio::test]
    async fn sign_up_redirects_to_verification() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/sign-up/email"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": null })))
            .mount(&server)
            .await;

        let request = post_json(
            "/auth/sign-up",
            json!({ "name": "Alice", "email": "alice@example.com", "password": "password123" }),
        );
        let (status, _, body) = send(state_for(&server), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["redirect_to"], "/verify-email?email=alice%40example.com");
    }

    #[tokio::test]
    async fn forget_password_redirects_to_reset() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/forget-password/email-otp"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        let request = post_json("/auth/forget-password", json!({ "email": "alice@example.com" }));
        let (status, _, body) = send(state_for(&server), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["redirect_to"], "/reset-password?email=alice%40example.com");
    }

    #[tokio::test]
    async fn reset_password_redirects_to_sign_in() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/email-otp/reset-password"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .mount(&server)
            .await;

        let request = post_json(
            "/auth/reset-password",
            json!({ "email": "alice@example.com", "otp": "123456", "password": "newpassword" }),
        );
        let (status, _, body) = send(state_for(&server), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["redirect_to"], "/sign-in");
    }

    #[tokio::test]
    async fn sign_out_relays_cleared_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/sign-out"))
            .and(header("cookie", "backend.session_token=abc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "backend.session_token=; Max-Age=0; Path=/")
                    .set_body_json(json!({ "success": true })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let request = Request::post("/auth/sign-out")
            .header("cookie", "backend.session_token=abc")
            .body(Body::empty())
            .unwrap();
        let (status, headers, body) = send(state_for(&server), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[SET_COOKIE], "backend.session_token=; Max-Age=0; Path=/");
        assert_eq!(body["redirect_to"], "/sign-in");
    }

    #[tokio::test]
    async fn anonymous_is_noop_with_existing_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/get-session"))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_json("user")))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/auth/sign-in/anonymous"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let request = Request::post("/auth/anonymous")
            .header("cookie", "backend.session_token=abc")
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = send(state_for(&server), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["id"], "u1");
    }

    #[tokio::test]
    async fn unreachable_auth_service_is_bad_gateway() {
        let state = AppState::new(Config {
            api_base_url: crate::config::parse_base_url("http://127.0.0.1:9").unwrap(),
            ..Config::default()
        });

        let request = post_json("/auth/forget-password", json!({ "email": "alice@example.com" }));
        let (status, _, body) = send(state, request).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error_code"], "auth_unavailable");
    }
}
