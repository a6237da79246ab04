// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backend API client.
//!
//! Every request carries the fixed `version` and `branch` headers the
//! backend routes on. Non-multipart requests are sent as JSON.

use crate::config::Config;
use crate::error::AppError;
use crate::models::{RefreshRequest, TokenEnvelope, TokenPayload};
use axum::body::Bytes;
use axum::http::{header, Method};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

/// A buffered multipart field, replayable across retries.
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Body of a forwarded request.
#[derive(Debug, Clone, Default)]
pub enum UpstreamBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(Vec<FormField>),
}

impl UpstreamBody {
    /// Build a fresh multipart form; reqwest picks the boundary.
    fn to_form(fields: &[FormField]) -> Result<Form, AppError> {
        fields.iter().try_fold(Form::new(), |form, field| {
            let mut part = Part::bytes(field.data.to_vec());
            if let Some(file_name) = &field.file_name {
                part = part.file_name(file_name.clone());
            }
            if let Some(content_type) = &field.content_type {
                part = part.mime_str(content_type)?;
            }
            Ok(form.part(field.name.clone(), part))
        })
    }
}

/// A request to relay to the backend.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    /// Path below the backend base URL, without a leading slash
    pub path: String,
    /// Raw query string, forwarded verbatim
    pub query: Option<String>,
    pub body: UpstreamBody,
}

/// Backend API client.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    version: String,
    branch: String,
}

impl BackendClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            version: config.api_version.clone(),
            branch: config.api_branch.clone(),
        }
    }

    fn url(&self, path: &str, query: Option<&str>) -> String {
        let path = path.trim_start_matches('/');
        match query.filter(|q| !q.is_empty()) {
            Some(query) => format!("{}/{}?{}", self.base_url, path, query),
            None => format!("{}/{}", self.base_url, path),
        }
    }

    /// Request builder with the fixed routing headers.
    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("version", &self.version)
            .header("branch", &self.branch)
    }

    /// Exchange credentials for tokens via `/auth/login`.
    pub async fn login(&self, credentials: &Value) -> Result<TokenPayload, AppError> {
        let response = self
            .request(Method::POST, &self.url("auth/login", None))
            .json(credentials)
            .send()
            .await?;

        Self::token_response(response).await
    }

    /// Mint new tokens via `/auth/refresh`.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPayload, AppError> {
        let response = self
            .request(Method::POST, &self.url("auth/refresh", None))
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;

        Self::token_response(response).await
    }

    /// Relay a request, optionally with an `Authorization` header.
    pub async fn send(
        &self,
        request: &UpstreamRequest,
        authorization: Option<&str>,
    ) -> Result<reqwest::Response, AppError> {
        let url = self.url(&request.path, request.query.as_deref());
        let mut builder = self.request(request.method.clone(), &url);

        if let Some(authorization) = authorization {
            builder = builder.header(header::AUTHORIZATION, authorization);
        }

        builder = match &request.body {
            UpstreamBody::Multipart(fields) => builder.multipart(UpstreamBody::to_form(fields)?),
            UpstreamBody::Json(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(value).map_err(anyhow::Error::from)?),
            UpstreamBody::Empty => builder.header(header::CONTENT_TYPE, "application/json"),
        };

        Ok(builder.send().await?)
    }

    /// Parse a token payload, or map a failed response to an error.
    async fn token_response(response: reqwest::Response) -> Result<TokenPayload, AppError> {
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(AppError::upstream(status, &body));
        }

        let envelope: TokenEnvelope = serde_json::from_slice(&body).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Unreadable token payload: {}", e))
        })?;
        Ok(envelope.into_payload())
    }
}
