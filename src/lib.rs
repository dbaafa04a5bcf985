// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Auth Portal - session-forwarding web gateway
//!
//! This crate serves the sign-in, sign-up, email verification and password
//! reset flows of an external auth service, and forwards the browser's
//! session cookie to a backend HTTP API.
//!
//! ## Modules
//!
//! - `api` - HTTP handlers and router (Axum)
//! - `auth` - Session cookie lookup, auth service client, extractors
//! - `providers` - Backend API forwarder
//! - `config` - Environment configuration
//! - `telemetry` - Tracing subscriber

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod state;
pub mod telemetry;
