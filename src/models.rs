// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies for the auth screens. Requests are validated
//! here, before anything is sent to the auth service, with the same rules
//! the sign-in and password forms enforce in the browser.
//!
//! ## Model Categories
//!
//! - **Credentials**: sign-in, sign-up
//! - **Email OTP**: verify email, resend code, forget/reset password
//! - **Outcomes**: the `{ok, redirect_to}` answer every auth screen receives

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::SessionUser;

/// Minimum password length accepted by the auth service.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Length of the emailed one-time code.
pub const OTP_LEN: usize = 6;

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

pub fn valid_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email))
}

/// A request body that can be checked before it leaves the gateway.
pub trait Validate {
    /// First failing rule, as a user-facing message.
    fn validate(&self) -> Result<(), String>;
}

fn check_email(email: &str, message: &str) -> Result<(), String> {
    if valid_email(email.trim()) {
        Ok(())
    } else {
        Err(message.to_string())
    }
}

fn check_password(password: &str) -> Result<(), String> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters."
        ))
    }
}

fn check_otp(otp: &str) -> Result<(), String> {
    if otp.len() == OTP_LEN && otp.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(format!("Verification code must be {OTP_LEN} digits."))
    }
}

// =============================================================================
// Credentials
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

impl Validate for SignInRequest {
    fn validate(&self) -> Result<(), String> {
        check_email(&self.email, "Invalid email address.")?;
        check_password(&self.password)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Validate for SignUpRequest {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required.".to_string());
        }
        check_email(&self.email, "Invalid email address.")?;
        check_password(&self.password)
    }
}

// =============================================================================
// Email OTP
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyEmailRequest {
    pub email: String,
    pub otp: String,
}

impl Validate for VerifyEmailRequest {
    fn validate(&self) -> Result<(), String> {
        check_email(&self.email, "Please enter a valid email address.")?;
        check_otp(&self.otp)
    }
}

/// Body for resending a verification code or starting a password reset.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmailRequest {
    pub email: String,
}

impl Validate for EmailRequest {
    fn validate(&self) -> Result<(), String> {
        check_email(&self.email, "Please enter a valid email address.")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub password: String,
}

impl Validate for ResetPasswordRequest {
    fn validate(&self) -> Result<(), String> {
        check_email(&self.email, "Please enter a valid email address.")?;
        check_otp(&self.otp)?;
        check_password(&self.password)
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// Answer to every auth screen submission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthOutcome {
    pub ok: bool,
    /// Where the browser should navigate next.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
    /// Signed-in user after the call, when the auth service reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

impl AuthOutcome {
    pub fn redirect(to: impl Into<String>) -> Self {
        Self {
            ok: true,
            redirect_to: Some(to.into()),
            user: None,
        }
    }

    pub fn stay() -> Self {
        Self {
            ok: true,
            redirect_to: None,
            user: None,
        }
    }

    pub fn with_user(mut self, user: Option<SessionUser>) -> Self {
        self.user = user;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_check() {
        assert!(valid_email("alice@example.com"));
        assert!(!valid_email("alice@example"));
        assert!(!valid_email("alice example.com"));
        assert!(!valid_email(""));
    }

    #[test]
    fn sign_in_requires_eight_char_password() {
        let req = SignInRequest {
            email: "alice@example.com".into(),
            password: "short".into(),
        };
        assert_eq!(
            req.validate().unwrap_err(),
            "Password must be at least 8 characters."
        );

        let ok = SignInRequest {
            password: "longenough".into(),
            ..req
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn sign_in_reports_email_first() {
        let req = SignInRequest {
            email: "nope".into(),
            password: "x".into(),
        };
        assert_eq!(req.validate().unwrap_err(), "Invalid email address.");
    }

    #[test]
    fn sign_up_requires_name() {
        let req = SignUpRequest {
            name: "  ".into(),
            email: "alice@example.com".into(),
            password: "password123".into(),
        };
        assert_eq!(req.validate().unwrap_err(), "Name is required.");
    }

    #[test]
    fn otp_must_be_six_digits() {
        let mut req = VerifyEmailRequest {
            email: "alice@example.com".into(),
            otp: "12345".into(),
        };
        assert!(req.validate().is_err());

        req.otp = "12a456".into();
        assert!(req.validate().is_err());

        req.otp = "123456".into();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn reset_password_checks_every_field() {
        let req = ResetPasswordRequest {
            email: "alice@example.com".into(),
            otp: "654321".into(),
            password: "1234567".into(),
        };
        assert!(req.validate().is_err());

        let ok = ResetPasswordRequest {
            password: "12345678".into(),
            ..req
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn outcome_omits_empty_fields() {
        let json = serde_json::to_value(AuthOutcome::stay()).unwrap();
        assert_eq!(json, serde_json::json!({ "ok": true }));

        let json = serde_json::to_value(AuthOutcome::redirect("/sign-in")).unwrap();
        assert_eq!(json["redirect_to"], "/sign-in");
    }
}
