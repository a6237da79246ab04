// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated forwarding with a single refresh-and-retry on 401.
//!
//! Flow:
//! 1. Send the request with the bearer token from the cookies (if any)
//! 2. On 401 with a refresh token cookie, call `/auth/refresh` once
//! 3. On refresh success, rewrite the cookies and resend once
//! 4. On refresh failure or no refresh token, clear the cookies and answer 401
//!
//! Concurrent 401s each refresh independently; there is no single-flight guard.

use crate::error::{AppError, Result};
use crate::services::backend::{BackendClient, UpstreamRequest};
use crate::services::session::{clear_tokens, store_tokens, SessionTokens};
use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::Value;

/// Content types relayed as raw bytes instead of JSON.
const BINARY_CONTENT_TYPES: [&str; 2] = ["application/pdf", "application/octet-stream"];

/// Forward `request`, refreshing the session once if the backend rejects it.
///
/// The returned jar carries any cookie changes and must be sent back to the
/// browser alongside the response, including on error.
pub async fn forward(
    backend: &BackendClient,
    jar: CookieJar,
    request: &UpstreamRequest,
    secure_cookies: bool,
) -> (CookieJar, Result<Response>) {
    let session = SessionTokens::from_jar(&jar);

    let response = match backend
        .send(request, session.authorization().as_deref())
        .await
    {
        Ok(response) => response,
        Err(e) => return (jar, Err(e)),
    };

    if response.status() != StatusCode::UNAUTHORIZED {
        return (jar, relay(response).await);
    }

    let Some(refresh_token) = session.refresh_token else {
        tracing::info!(path = %request.path, "Backend rejected request and no refresh token is present");
        return (
            clear_tokens(jar, secure_cookies),
            Err(AppError::InvalidAuthentication),
        );
    };

    tracing::info!(path = %request.path, "Access token rejected, refreshing session");

    let tokens = match backend.refresh(&refresh_token).await {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::warn!(error = %e, "Session refresh failed, clearing cookies");
            return (
                clear_tokens(jar, secure_cookies),
                Err(AppError::InvalidAuthentication),
            );
        }
    };

    let jar = store_tokens(jar, &tokens, secure_cookies);

    let result = match backend.send(request, Some(&tokens.authorization())).await {
        Ok(response) => {
            tracing::debug!(status = %response.status(), "Retried request after refresh");
            relay(response).await
        }
        Err(e) => Err(e),
    };

    (jar, result)
}

fn is_binary(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    BINARY_CONTENT_TYPES.contains(&essence.as_str())
}

/// Translate a backend response into the browser response.
pub async fn relay(response: reqwest::Response) -> Result<Response> {
    let status = response.status();

    if !status.is_success() {
        let body = response.bytes().await?;
        tracing::debug!(status = %status, "Backend returned an error");
        return Err(AppError::upstream(status, &body));
    }

    let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
    let content_disposition = response.headers().get(header::CONTENT_DISPOSITION).cloned();

    if let Some(ct) = content_type
        .as_ref()
        .filter(|ct| ct.to_str().map(is_binary).unwrap_or(false))
    {
        let ct = ct.clone();
        let body = response.bytes().await?;

        let mut relayed = Response::new(Body::from(body));
        *relayed.status_mut() = status;
        relayed.headers_mut().insert(header::CONTENT_TYPE, ct);
        if let Some(disposition) = content_disposition {
            relayed
                .headers_mut()
                .insert(header::CONTENT_DISPOSITION, disposition);
        }
        return Ok(relayed);
    }

    let body = response.bytes().await?;
    if body.is_empty() {
        return Ok(status.into_response());
    }

    let json: Value = serde_json::from_slice(&body).map_err(|e| {
        AppError::Internal(anyhow::anyhow!("Backend returned a non-JSON body: {}", e))
    })?;

    Ok((status, Json(json)).into_response())
}
