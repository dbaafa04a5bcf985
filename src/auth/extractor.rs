// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the session cookie and the session behind it.
//!
//! ```rust,ignore
//! async fn my_handler(Credential(credential): Credential) -> impl IntoResponse {
//!     // credential.header_value() is "" when no session cookie was sent
//! }
//! ```

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use super::{Role, Session, SessionContext, SessionCredential};
use crate::state::AppState;

/// Where unauthenticated or under-privileged visitors are sent.
pub const SIGN_IN_PATH: &str = "/sign-in";

/// Located session cookie. Never rejects.
pub struct Credential(pub SessionCredential);

impl FromRequestParts<AppState> for Credential {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Credential(state.locator.locate_in_headers(&parts.headers)))
    }
}

/// Session context for the request. Never rejects; may be signed out.
pub struct CurrentSession(pub SessionContext);

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<SessionContext>().cloned() {
            return Ok(CurrentSession(ctx));
        }

        let Credential(credential) = Credential::from_request_parts(parts, state).await?;
        let ctx = SessionContext::load(&state.auth, credential).await;
        parts.extensions.insert(ctx.clone());

        Ok(CurrentSession(ctx))
    }
}

/// Rejection that sends the browser to the sign-in page.
#[derive(Debug)]
pub struct SignInRedirect;

impl IntoResponse for SignInRedirect {
    fn into_response(self) -> Response {
        Redirect::to(SIGN_IN_PATH).into_response()
    }
}

/// Any signed-in user.
pub struct SignedIn(pub Session);

impl FromRequestParts<AppState> for SignedIn {
    type Rejection = SignInRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Ok(CurrentSession(ctx)) = CurrentSession::from_request_parts(parts, state).await;

        match ctx.into_session() {
            Some(session) => Ok(SignedIn(session)),
            None => {
                debug!(path = %parts.uri.path(), "no session, redirecting to sign-in");
                Err(SignInRedirect)
            }
        }
    }
}

/// Signed-in user whose role grants admin access.
pub struct AdminOnly(pub Session);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = SignInRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let SignedIn(session) = SignedIn::from_request_parts(parts, state).await?;

        let is_admin = session
            .role()
            .is_some_and(|role| role.has_privilege(Role::Admin));
        if !is_admin {
            debug!(path = %parts.uri.path(), "not an admin, redirecting to sign-in");
            return Err(SignInRedirect);
        }

        Ok(AdminOnly(session))
    }
}
