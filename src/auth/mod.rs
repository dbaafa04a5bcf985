// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! The gateway does not authenticate anyone. It finds the session cookie the
//! external auth service issued, hands it back to that service or to the
//! backend API, and reads the answer.
//!
//! ## Flow
//!
//! 1. Browser signs in through `/auth/*`; the auth service's `Set-Cookie`
//!    is relayed unchanged
//! 2. Later requests carry `backend.session_token` (or its `__Secure-`
//!    variant over HTTPS)
//! 3. Extractors locate that cookie and, when a handler needs it, resolve
//!    the session through the auth service's `get-session` route
//!
//! ## Security
//!
//! - The cookie value is never logged, parsed or modified
//! - Role checks here only steer navigation; the backend API enforces access

pub mod client;
pub mod cookies;
pub mod error;
pub mod extractor;
pub mod roles;
pub mod session;

pub use client::{AuthClient, AuthResponse};
pub use cookies::{SessionCookie, SessionCredential, SessionLocator};
pub use error::AuthError;
pub use extractor::{AdminOnly, Credential, CurrentSession, SignInRedirect, SignedIn, SIGN_IN_PATH};
pub use roles::Role;
pub use session::{Session, SessionContext, SessionDetails, SessionUser};
