// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup into a [`Config`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `NEXT_PUBLIC_API_BASE_URL` | Base URL of the backend API and auth service | `http://localhost:8090` |
//! | `AUTH_BASE_PATH` | Path prefix of the auth service routes | `/api/auth` |
//! | `SESSION_COOKIE_NAMES` | Ordered, comma-separated session cookie names | `backend.session_token,__Secure-backend.session_token` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `3000` |
//! | `TLS_CERT_PATH` | PEM certificate chain (enables HTTPS with `TLS_KEY_PATH`) | Optional |
//! | `TLS_KEY_PATH` | PEM private key | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;

use url::Url;

pub const API_BASE_URL_ENV: &str = "NEXT_PUBLIC_API_BASE_URL";
pub const AUTH_BASE_PATH_ENV: &str = "AUTH_BASE_PATH";
pub const SESSION_COOKIE_NAMES_ENV: &str = "SESSION_COOKIE_NAMES";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Local development backend, used when `NEXT_PUBLIC_API_BASE_URL` is unset.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8090";
pub const DEFAULT_AUTH_BASE_PATH: &str = "/api/auth";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// Session cookie issued over plain HTTP.
pub const PLAIN_SESSION_COOKIE: &str = "backend.session_token";

/// Session cookie issued when the auth service marks cookies `Secure`.
pub const SECURE_SESSION_COOKIE: &str = "__Secure-backend.session_token";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is not a valid URL: {reason}")]
    InvalidUrl { name: &'static str, reason: String },

    #[error("{name} must use http or https, got {scheme}")]
    UnsupportedScheme { name: &'static str, scheme: String },

    #[error("{0} must name at least one cookie")]
    NoCookieNames(&'static str),

    #[error("invalid bind address {0}")]
    InvalidBindAddress(String),

    #[error("{TLS_CERT_PATH_ENV} and {TLS_KEY_PATH_ENV} must be set together")]
    PartialTls,
}

/// Paths to the PEM files used to serve HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var(LOG_FORMAT_ENV) {
            Ok(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL for every forwarded call, without a trailing slash.
    pub api_base_url: Url,
    pub auth_base_path: String,
    /// Candidate session cookie names, in lookup order.
    pub session_cookie_names: Vec<String>,
    pub bind_addr: SocketAddr,
    pub tls: Option<TlsPaths>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = parse_base_url(&env_or_default(API_BASE_URL_ENV, DEFAULT_API_BASE_URL))?;
        let auth_base_path =
            normalize_path_prefix(&env_or_default(AUTH_BASE_PATH_ENV, DEFAULT_AUTH_BASE_PATH));

        let session_cookie_names = match std::env::var(SESSION_COOKIE_NAMES_ENV) {
            Ok(raw) => parse_cookie_names(&raw)?,
            Err(_) => default_cookie_names(),
        };

        let host = env_or_default(HOST_ENV, DEFAULT_HOST);
        let port = std::env::var(PORT_ENV)
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let bind_addr = format!("{host}:{port}")
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(format!("{host}:{port}")))?;

        let tls = match (
            std::env::var(TLS_CERT_PATH_ENV).ok(),
            std::env::var(TLS_KEY_PATH_ENV).ok(),
        ) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::PartialTls),
        };

        Ok(Self {
            api_base_url,
            auth_base_path,
            session_cookie_names,
            bind_addr,
            tls,
        })
    }

    /// Join a path onto the API base URL.
    pub fn api_url(&self, path: &str) -> String {
        join_url(&self.api_base_url, path)
    }

    /// Join an auth service route onto the API base URL.
    pub fn auth_url(&self, route: &str) -> String {
        join_url(&self.api_base_url, &format!("{}{}", self.auth_base_path, route))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default base URL is valid"),
            auth_base_path: DEFAULT_AUTH_BASE_PATH.to_string(),
            session_cookie_names: default_cookie_names(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            tls: None,
        }
    }
}

pub fn default_cookie_names() -> Vec<String> {
    vec![
        PLAIN_SESSION_COOKIE.to_string(),
        SECURE_SESSION_COOKIE.to_string(),
    ]
}

pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
        name: API_BASE_URL_ENV,
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme {
            name: API_BASE_URL_ENV,
            scheme: other.to_string(),
        }),
    }
}

pub fn parse_cookie_names(raw: &str) -> Result<Vec<String>, ConfigError> {
    let names: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect();

    if names.is_empty() {
        return Err(ConfigError::NoCookieNames(SESSION_COOKIE_NAMES_ENV));
    }
    Ok(names)
}

fn join_url(base: &Url, path: &str) -> String {
    let base = base.as_str().trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

fn normalize_path_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
