// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Body,
    http::Request,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{debug_span, Span};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{Role, Session, SessionDetails, SessionUser},
    models::{
        AuthOutcome, EmailRequest, ResetPasswordRequest, SignInRequest, SignUpRequest,
        VerifyEmailRequest,
    },
    providers::ForwardResult,
    state::AppState,
};

pub mod actions;
pub mod auth;
pub mod dashboard;
pub mod debug;
pub mod health;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/actions/current-user", get(actions::current_user))
        .route("/actions/{action}", post(actions::run_action))
        .route("/auth/sign-in", post(auth::sign_in))
        .route("/auth/sign-up", post(auth::sign_up))
        .route("/auth/verify-email", post(auth::verify_email))
        .route("/auth/verify-email/resend", post(auth::resend_verification))
        .route("/auth/forget-password", post(auth::forget_password))
        .route("/auth/reset-password", post(auth::reset_password))
        .route("/auth/sign-out", post(auth::sign_out))
        .route("/auth/anonymous", post(auth::anonymous))
        .route("/dashboard", get(dashboard::entry))
        .route("/dashboard/admin", get(dashboard::admin))
        .route("/dashboard/admin/test-routes", get(dashboard::test_routes))
        .route("/dashboard/user", get(dashboard::user))
        .route("/debug/cookies", get(debug::cookies))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(CorsLayer::permissive()),
        )
}

// Cookie and Authorization headers stay out of the span.
fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    debug_span!(
        "http-request",
        method = %request.method(),
        path = request.uri().path(),
        request_id
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::liveness,
        health::readiness,
        actions::run_action,
        actions::current_user,
        auth::sign_in,
        auth::sign_up,
        auth::verify_email,
        auth::resend_verification,
        auth::forget_password,
        auth::reset_password,
        auth::sign_out,
        auth::anonymous,
        dashboard::entry,
        dashboard::admin,
        dashboard::user,
        dashboard::test_routes,
        debug::cookies
    ),
    components(
        schemas(
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks,
            ForwardResult,
            Session,
            SessionDetails,
            SessionUser,
            Role,
            SignInRequest,
            SignUpRequest,
            VerifyEmailRequest,
            EmailRequest,
            ResetPasswordRequest,
            AuthOutcome,
            dashboard::TestRoutesResponse,
            debug::CookieDebugResponse,
            debug::SessionCookieStatus,
            debug::CookieEntry
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Actions", description = "Session-forwarding calls to the backend API"),
        (name = "Auth", description = "Sign-in, sign-up, email verification and password reset"),
        (name = "Dashboard", description = "Role-gated dashboard areas"),
        (name = "Debug", description = "Cookie inspection")
    )
)]
struct ApiDoc;
