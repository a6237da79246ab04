// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Panel gateway: the dashboard's authenticated front door to the backend API.
//!
//! Browser requests are forwarded to the backend with the session's bearer
//! token, which lives only in httpOnly cookies. A rejected token is
//! refreshed once and the request retried transparently.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::BackendClient;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub backend: BackendClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let backend = BackendClient::new(&config);
        Self { config, backend }
    }
}
