//! Thin reqwest wrapper for the admin backend.
//!
//! Base-url-relative JSON requests over a cookie-credentialed session.
//! Non-success statuses become DomainError::Api with the message pulled
//! from the body; 401 becomes DomainError::Unauthorized (the global
//! clear-session signal), regardless of endpoint.

use crate::adapters::api::normalize;
use crate::domain::DomainError;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Shared HTTP client for all backend endpoints.
///
/// The cookie jar carries the admin session cookie between requests, the
/// same way the browser original relied on `credentials: "include"`.
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Config(format!("http client: {}", e)))?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { http, base_url })
    }

    pub async fn get(&self, path: &str) -> Result<Value, DomainError> {
        self.execute(Method::GET, path, None).await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, DomainError> {
        let body = serde_json::to_value(body)
            .map_err(|e| DomainError::Decode(format!("serialize request body: {}", e)))?;
        self.execute(Method::POST, path, Some(body)).await
    }

    /// POST with no body (e.g. logout).
    pub async fn post_empty(&self, path: &str) -> Result<Value, DomainError> {
        self.execute(Method::POST, path, None).await
    }

    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, DomainError> {
        let body = serde_json::to_value(body)
            .map_err(|e| DomainError::Decode(format!("serialize request body: {}", e)))?;
        self.execute(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, DomainError> {
        self.execute(Method::DELETE, path, None).await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, DomainError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "backend request");

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DomainError::Transport(format!("read response body: {}", e)))?;

        if status == StatusCode::UNAUTHORIZED {
            warn!(%url, "backend returned 401");
            return Err(DomainError::Unauthorized);
        }

        if !status.is_success() {
            let message = normalize::error_message(&text);
            warn!(status = status.as_u16(), %url, message, "backend error");
            return Err(DomainError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| DomainError::Decode(format!("response is not JSON: {}", e)))
    }
}
