// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client for the external auth service.
//!
//! Every call carries the browser's session cookie (when one was located)
//! and hands back the `Set-Cookie` headers the service emitted, so the
//! caller can pass them to the browser untouched. Nothing here inspects or
//! stores the credential.

use axum::http::{
    header::{CACHE_CONTROL, CONTENT_TYPE, COOKIE, SET_COOKIE},
    HeaderValue, Method, StatusCode,
};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{AuthError, Session, SessionCredential};
use crate::config::Config;
use crate::models::{
    EmailRequest, ResetPasswordRequest, SignInRequest, SignUpRequest, VerifyEmailRequest,
};

/// Where the auth service sends the browser after an email sign-in.
const SIGN_IN_CALLBACK_URL: &str = "/dashboard";

/// OTP purpose understood by the auth service's email-OTP plugin.
const EMAIL_VERIFICATION_OTP: &str = "email-verification";

/// Parsed body and cookies from one auth service call.
#[derive(Debug, Clone)]
pub struct AuthResponse {
    pub body: Value,
    pub set_cookies: Vec<HeaderValue>,
}

#[derive(Debug, Clone)]
pub struct AuthClient {
    base_url: String,
    http: Client,
}

impl AuthClient {
    pub fn new(config: &Config, http: Client) -> Self {
        Self {
            base_url: config.auth_url(""),
            http,
        }
    }

    pub async fn get_session(
        &self,
        credential: &SessionCredential,
    ) -> Result<Option<Session>, AuthError> {
        let response = self
            .call(Method::GET, "/get-session", credential, None)
            .await?;

        if response.body.is_null() {
            return Ok(None);
        }

        serde_json::from_value(response.body)
            .map(Some)
            .map_err(|e| AuthError::Upstream(format!("invalid session payload: {e}")))
    }

    pub async fn sign_in_email(
        &self,
        credential: &SessionCredential,
        request: &SignInRequest,
    ) -> Result<AuthResponse, AuthError> {
        let payload = json!({
            "email": request.email.trim(),
            "password": request.password,
            "callbackURL": SIGN_IN_CALLBACK_URL,
        });
        self.call(Method::POST, "/sign-in/email", credential, Some(&payload))
            .await
    }

    pub async fn sign_up_email(
        &self,
        credential: &SessionCredential,
        request: &SignUpRequest,
    ) -> Result<AuthResponse, AuthError> {
        let payload = json!({
            "name": request.name.trim(),
            "email": request.email.trim(),
            "password": request.password,
        });
        self.call(Method::POST, "/sign-up/email", credential, Some(&payload))
            .await
    }

    pub async fn sign_in_anonymous(&self) -> Result<AuthResponse, AuthError> {
        let payload = json!({});
        self.call(
            Method::POST,
            "/sign-in/anonymous",
            &SessionCredential::absent(),
            Some(&payload),
        )
        .await
    }

    pub async fn send_verification_otp(
        &self,
        request: &EmailRequest,
    ) -> Result<AuthResponse, AuthError> {
        let payload = json!({
            "email": request.email.trim(),
            "type": EMAIL_VERIFICATION_OTP,
        });
        self.call(
            Method::POST,
            "/email-otp/send-verification-otp",
            &SessionCredential::absent(),
            Some(&payload),
        )
        .await
    }

    pub async fn verify_email(
        &self,
        credential: &SessionCredential,
        request: &VerifyEmailRequest,
    ) -> Result<AuthResponse, AuthError> {
        let payload = json!({
            "email": request.email.trim(),
            "otp": request.otp,
        });
        self.call(
            Method::POST,
            "/email-otp/verify-email",
            credential,
            Some(&payload),
        )
        .await
    }

    pub async fn forget_password(&self, request: &EmailRequest) -> Result<AuthResponse, AuthError> {
        let payload = json!({ "email": request.email.trim() });
        self.call(
            Method::POST,
            "/forget-password/email-otp",
            &SessionCredential::absent(),
            Some(&payload),
        )
        .await
    }

    pub async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<AuthResponse, AuthError> {
        let payload = json!({
            "email": request.email.trim(),
            "otp": request.otp,
            "password": request.password,
        });
        self.call(
            Method::POST,
            "/email-otp/reset-password",
            &SessionCredential::absent(),
            Some(&payload),
        )
        .await
    }

    pub async fn sign_out(&self, credential: &SessionCredential) -> Result<AuthResponse, AuthError> {
        let payload = json!({});
        self.call(Method::POST, "/sign-out", credential, Some(&payload))
            .await
    }

    async fn call(
        &self,
        method: Method,
        route: &str,
        credential: &SessionCredential,
        payload: Option<&Value>,
    ) -> Result<AuthResponse, AuthError> {
        let url = format!("{}{}", self.base_url, route);
        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(CACHE_CONTROL, "no-store");

        if credential.is_present() {
            request = request.header(COOKIE, credential.header_value());
        }
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request.send().await.map_err(|e| {
            warn!(%method, route, error = %e, "auth service request failed");
            AuthError::Upstream(e.to_string())
        })?;

        let status = response.status();
        let set_cookies: Vec<HeaderValue> =
            response.headers().get_all(SET_COOKIE).iter().cloned().collect();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AuthError::Upstream(format!("failed to read response: {e}")))?;

        debug!(%method, route, status = status.as_u16(), "auth service responded");

        let body: Value = if bytes.is_empty() {
            Value::Null
        } else {
            match serde_json::from_slice(&bytes) {
                Ok(body) => body,
                Err(e) if status.is_success() => {
                    return Err(AuthError::Upstream(format!("invalid JSON response: {e}")));
                }
                Err(_) => Value::Null,
            }
        };

        if !status.is_success() {
            return Err(AuthError::Rejected {
                status,
                message: rejection_message(&body, status),
            });
        }

        Ok(AuthResponse { body, set_cookies })
    }
}

/// User-facing message from an auth service error body.
fn rejection_message(body: &Value, status: StatusCode) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .or_else(|| body.get("code").and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Authentication request failed")
                .to_string()
        })
}
