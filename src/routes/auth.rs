// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session routes: login, refresh, logout and session status.
//!
//! Tokens only ever travel in httpOnly cookies; response bodies carry the
//! session summary.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::Value;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::SessionResponse;
use crate::services::session::{clear_tokens, store_tokens, SessionTokens};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/session", get(session))
}

/// Log in with the backend and store the returned tokens.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let body = body?;
    let credentials: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))?;

    let tokens = state.backend.login(&credentials).await.map_err(|e| {
        tracing::info!(error = %e, "Login rejected");
        e
    })?;

    tracing::info!("Login successful, session cookies issued");

    let jar = store_tokens(jar, &tokens, state.config.secure_cookies());
    Ok((jar, Json(SessionResponse::from(&tokens))))
}

/// Refresh the session explicitly using the refresh token cookie.
async fn refresh(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Result<Json<SessionResponse>>) {
    let secure = state.config.secure_cookies();

    let Some(refresh_token) = SessionTokens::from_jar(&jar).refresh_token else {
        return (clear_tokens(jar, secure), Err(AppError::InvalidAuthentication));
    };

    match state.backend.refresh(&refresh_token).await {
        Ok(tokens) => {
            tracing::info!("Session refreshed");
            let response = SessionResponse::from(&tokens);
            (store_tokens(jar, &tokens, secure), Ok(Json(response)))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Session refresh failed, clearing cookies");
            (clear_tokens(jar, secure), Err(AppError::InvalidAuthentication))
        }
    }
}

/// Logout - clears the session cookies. The backend is not contacted.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, StatusCode) {
    (
        clear_tokens(jar, state.config.secure_cookies()),
        StatusCode::NO_CONTENT,
    )
}

/// Report the session as seen from the cookies alone.
async fn session(jar: CookieJar) -> Json<SessionResponse> {
    Json(SessionResponse::from(&SessionTokens::from_jar(&jar)))
}
