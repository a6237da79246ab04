// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session status returned to the dashboard.

use crate::models::TokenPayload;
use crate::services::session::SessionTokens;
use crate::time_utils::format_unix_rfc3339;
use serde::Serialize;

/// What the dashboard is told about its session. Tokens are never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_expires_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_expires_at: Option<String>,
}

impl From<&TokenPayload> for SessionResponse {
    fn from(tokens: &TokenPayload) -> Self {
        Self {
            authenticated: true,
            token_type: Some(tokens.token_type.clone()),
            token_expires_at: format_unix_rfc3339(tokens.exp),
            refresh_expires_at: format_unix_rfc3339(tokens.refresh_exp),
        }
    }
}

impl From<&SessionTokens> for SessionResponse {
    fn from(session: &SessionTokens) -> Self {
        Self {
            authenticated: session.access_token.is_some() || session.refresh_token.is_some(),
            token_type: session.token_type.clone(),
            token_expires_at: session.token_exp.and_then(format_unix_rfc3339),
            refresh_expires_at: session.refresh_exp.and_then(format_unix_rfc3339),
        }
    }
}
