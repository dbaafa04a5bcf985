// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use reqwest::Client;

use crate::auth::{AuthClient, SessionLocator};
use crate::config::Config;
use crate::providers::BackendClient;

/// Shared, read-only handler state. One HTTP connection pool serves both
/// upstreams.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub locator: SessionLocator,
    pub auth: AuthClient,
    pub backend: BackendClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let http = Client::new();
        Self {
            locator: SessionLocator::new(config.session_cookie_names.clone()),
            auth: AuthClient::new(&config, http.clone()),
            backend: BackendClient::new(&config, http),
            config: Arc::new(config),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
