// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Role-gated dashboard entry points.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{
    AdminOnly, CurrentSession, Role, Session, SessionContext, SessionUser, SignedIn, SIGN_IN_PATH,
};

/// Where `/dashboard` sends the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    SignIn,
    Area(Role),
    /// Signed in with a missing or unrecognized role. Terminal.
    Nothing,
}

pub fn dispatch(ctx: &SessionContext) -> Gate {
    if !ctx.is_authenticated() {
        return Gate::SignIn;
    }
    ctx.role().map_or(Gate::Nothing, Gate::Area)
}

impl IntoResponse for Gate {
    fn into_response(self) -> Response {
        match self {
            Gate::SignIn => Redirect::to(SIGN_IN_PATH).into_response(),
            Gate::Area(role) => Redirect::to(role.dashboard_path()).into_response(),
            Gate::Nothing => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "Dashboard",
    responses(
        (status = 303, description = "Redirect to sign-in or the role's area"),
        (status = 204, description = "Signed in without a recognized role"),
    )
)]
pub async fn entry(CurrentSession(ctx): CurrentSession) -> Gate {
    dispatch(&ctx)
}

#[utoipa::path(
    get,
    path = "/dashboard/admin",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Admin session", body = Session),
        (status = 303, description = "Not an admin; redirect to sign-in"),
    )
)]
pub async fn admin(AdminOnly(session): AdminOnly) -> Json<Session> {
    Json(session)
}

#[utoipa::path(
    get,
    path = "/dashboard/user",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Current session", body = Session),
        (status = 303, description = "Signed out; redirect to sign-in"),
    )
)]
pub async fn user(SignedIn(session): SignedIn) -> Json<Session> {
    Json(session)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TestRoutesResponse {
    pub authenticated: bool,
    pub user: Option<SessionUser>,
}

/// Admin page for exercising the forwarded backend routes.
#[utoipa::path(
    get,
    path = "/dashboard/admin/test-routes",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Current user", body = TestRoutesResponse),
        (status = 303, description = "Not an admin; redirect to sign-in"),
    )
)]
pub async fn test_routes(AdminOnly(session): AdminOnly) -> Json<TestRoutesResponse> {
    Json(TestRoutesResponse {
        authenticated: true,
        user: Some(session.user),
    })
}
