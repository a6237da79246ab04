// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Catch-all route forwarding dashboard requests to the backend.

use crate::error::{AppError, Result};
use crate::services::backend::{FormField, UpstreamBody, UpstreamRequest};
use crate::services::proxy;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request, State},
    http::{header, Method},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

const PROXY_PREFIX: &str = "/api/proxy/";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/proxy/{*path}",
        get(proxy_request)
            .post(proxy_request)
            .put(proxy_request)
            .delete(proxy_request)
            .patch(proxy_request),
    )
}

/// Forward any dashboard request below `/api/proxy/` to the backend.
async fn proxy_request(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    request: Request,
) -> Response {
    let upstream = match upstream_request(request).await {
        Ok(upstream) => upstream,
        Err(e) => return e.into_response(),
    };

    tracing::debug!(
        method = %upstream.method,
        path = %upstream.path,
        "Forwarding request to backend"
    );

    proxy::forward(
        &state.backend,
        jar,
        &upstream,
        state.config.secure_cookies(),
    )
    .await
    .into_response()
}

/// Capture everything needed to replay the inbound request upstream.
async fn upstream_request(request: Request) -> Result<UpstreamRequest> {
    let method = request.method().clone();
    let path = proxy_path(request.uri().path())?;
    let query = request.uri().query().map(str::to_string);

    let body = if matches!(method, Method::POST | Method::PUT | Method::PATCH) {
        read_body(request).await?
    } else {
        UpstreamBody::Empty
    };

    Ok(UpstreamRequest {
        method,
        path,
        query,
        body,
    })
}

/// Path below the backend base URL. Dot segments are refused so a request
/// cannot climb above the base URL's own path.
fn proxy_path(uri_path: &str) -> Result<String> {
    let path = uri_path.strip_prefix(PROXY_PREFIX).unwrap_or_default();

    let has_dot_segment = path.split(['/', '\\']).any(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == "." || decoded == ".."
    });
    if has_dot_segment {
        return Err(AppError::BadRequest(format!("Invalid proxy path: {path}")));
    }

    Ok(path.to_string())
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.to_ascii_lowercase().contains("multipart/form-data"))
        .unwrap_or(false)
}

/// Buffer the inbound body. Malformed JSON is forwarded as no body.
async fn read_body(request: Request) -> Result<UpstreamBody> {
    if is_multipart(&request) {
        let mut multipart = Multipart::from_request(request, &()).await?;

        let mut fields = Vec::new();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await?;
            fields.push(FormField {
                name,
                file_name,
                content_type,
                data,
            });
        }

        return Ok(UpstreamBody::Multipart(fields));
    }

    let bytes = Bytes::from_request(request, &()).await?;

    if bytes.is_empty() {
        return Ok(UpstreamBody::Empty);
    }

    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(UpstreamBody::Json(value)),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring malformed JSON body");
            Ok(UpstreamBody::Empty)
        }
    }
}
