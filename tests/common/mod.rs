// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{http::header, response::Response};
use panel_gateway::config::Config;
use panel_gateway::routes::create_router;
use panel_gateway::AppState;
use serde_json::{json, Value};
use std::sync::Arc;

/// The five cookies the gateway owns.
#[allow(dead_code)]
pub const SESSION_COOKIES: [&str; 5] = [
    "access_token",
    "refresh_token",
    "token_type",
    "token_exp",
    "refresh_exp",
];

/// Create a test app talking to the given backend.
#[allow(dead_code)]
pub fn create_test_app(api_base_url: &str) -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config {
        api_base_url: api_base_url.to_string(),
        ..Config::test_default()
    })
}

#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config));
    (create_router(state.clone()), state)
}

/// Token payload as the backend returns it.
#[allow(dead_code)]
pub fn token_payload(access: &str, refresh: &str) -> Value {
    json!({
        "access_token": access,
        "refresh_token": refresh,
        "token_type": "Bearer",
        "exp": 1_767_225_600,
        "refresh_exp": 1_767_830_400
    })
}

#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

#[allow(dead_code)]
pub fn find_cookie(headers: &[String], name: &str) -> String {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
        .unwrap_or_else(|| panic!("missing Set-Cookie header for {name}: {headers:?}"))
}

/// Value part of a `Set-Cookie` header (`name=value; ...`).
#[allow(dead_code)]
pub fn cookie_value(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .next()
        .and_then(|pair| pair.split_once('='))
        .map(|(_, value)| value.trim_matches('"').to_string())
        .unwrap_or_default()
}

#[allow(dead_code)]
pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
