// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development.

use std::env;

/// Default request body limit for proxied uploads (20 MiB).
const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend API base URL, without a trailing slash
    pub api_base_url: String,
    /// Value of the `version` header sent to the backend
    pub api_version: String,
    /// Value of the `branch` header sent to the backend
    pub api_branch: String,
    /// Dashboard origin allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Production mode: Secure cookies and HSTS
    pub production: bool,
    /// Maximum inbound body size accepted by the proxy
    pub max_body_bytes: usize,
}

impl Config {
    /// Config for tests: points at a backend that is never listening.
    pub fn test_default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:9".to_string(),
            api_version: "1".to_string(),
            api_branch: "ISFAHAN".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            port: 8080,
            production: false,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_base_url = env::var("API_BASE_URL")
            .map_err(|_| ConfigError::Missing("API_BASE_URL"))?
            .trim()
            .trim_end_matches('/')
            .to_string();
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: "API_BASE_URL",
                reason: format!("expected an http(s) URL, got {api_base_url:?}"),
            });
        }

        Ok(Self {
            api_base_url,
            api_version: env::var("API_VERSION").unwrap_or_else(|_| "1".to_string()),
            api_branch: env::var("API_BRANCH").unwrap_or_else(|_| "ISFAHAN".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            production: env::var("APP_ENV")
                .map(|v| v.eq_ignore_ascii_case("production"))
                .unwrap_or(false),
            max_body_bytes: env::var("PROXY_MAX_BODY_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_BODY_BYTES),
        })
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.production
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}
