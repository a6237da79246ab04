// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token payloads exchanged with the backend auth endpoints.

use serde::{Deserialize, Serialize};

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Tokens returned by `/auth/login` and `/auth/refresh`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Access token expiry (Unix seconds)
    pub exp: i64,
    /// Refresh token expiry (Unix seconds)
    pub refresh_exp: i64,
}

impl TokenPayload {
    /// Value for the upstream `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

/// The backend answers either with the bare payload or wrapped in `data`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TokenEnvelope {
    Wrapped { data: TokenPayload },
    Bare(TokenPayload),
}

impl TokenEnvelope {
    pub fn into_payload(self) -> TokenPayload {
        match self {
            TokenEnvelope::Wrapped { data } => data,
            TokenEnvelope::Bare(payload) => payload,
        }
    }
}

/// Body sent to `/auth/refresh`.
#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}
