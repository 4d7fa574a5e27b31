//! Storefront REST API gateways.
//!
//! # Architecture
//!
//! - One shared [`ApiClient`] owns the `reqwest` client and base URL and is
//!   the single place the credential header is attached
//! - Each resource gets a thin gateway on top: [`cart`], [`wishlist`],
//!   [`auth`], [`catalog`], [`orders`]
//! - Responses are decoded text-first for better error diagnostics, then
//!   normalized through the envelope types in [`envelope`] before any
//!   business logic inspects them
//!
//! Idempotent GETs are retried a fixed number of times with a fixed delay;
//! mutating calls are never retried (no idempotency keys upstream, retrying
//! a POST/PUT/DELETE risks double-application).

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod envelope;
pub mod orders;
pub mod wishlist;

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;

use freshcart_core::BearerToken;

use crate::config::ClientConfig;
use crate::error::ApiError;
use envelope::EnvelopeHead;

/// Header carrying the bearer token. The upstream API uses a custom header,
/// not `Authorization`.
const TOKEN_HEADER: &str = "token";

/// Shared HTTP client for the storefront API.
///
/// Cheaply cloneable; all gateways hold one.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    config: ClientConfig,
}

/// How a single request attempt failed. Only transport and server-side
/// failures are retryable; envelope rejections and decode failures are not.
enum RequestFailure {
    Transport(reqwest::Error),
    Status {
        code: StatusCode,
        message: Option<String>,
    },
    Decode(serde_json::Error),
}

impl RequestFailure {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { code, .. } => code.is_server_error(),
            Self::Decode(_) => false,
        }
    }
}

impl From<RequestFailure> for ApiError {
    fn from(failure: RequestFailure) -> Self {
        match failure {
            RequestFailure::Transport(e) => Self::Http(e),
            RequestFailure::Decode(e) => Self::Parse(e),
            RequestFailure::Status { code, message } => Self::Status { code, message },
        }
    }
}

impl ApiClient {
    /// Create a new API client.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                http: reqwest::Client::new(),
                config,
            }),
        }
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Issue a single request and decode the response body.
    ///
    /// Mutating entry point - no retries.
    pub(crate) async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: Option<&BearerToken>,
        body: Option<&serde_json::Value>,
    ) -> Result<T, ApiError> {
        self.execute(method, path, token, body)
            .await
            .map_err(ApiError::from)
    }

    /// GET with the configured fixed-count, fixed-delay retry policy.
    ///
    /// Only transport errors and 5xx responses are retried; an envelope the
    /// server rejected outright comes back immediately.
    pub(crate) async fn get_with_retry<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&BearerToken>,
    ) -> Result<T, ApiError> {
        let retries = self.inner.config.fetch_retries;
        let mut attempt = 0;

        loop {
            match self.execute(Method::GET, path, token, None).await {
                Ok(value) => return Ok(value),
                Err(failure) if failure.is_retryable() && attempt < retries => {
                    attempt += 1;
                    tracing::debug!(path, attempt, retries, "retrying GET after failure");
                    tokio::time::sleep(self.inner.config.fetch_retry_delay).await;
                }
                Err(failure) => return Err(failure.into()),
            }
        }
    }

    /// One request attempt: send, read the body as text, decode.
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: Option<&BearerToken>,
        body: Option<&serde_json::Value>,
    ) -> Result<T, RequestFailure> {
        let url = self.inner.config.endpoint(path);

        let mut request = self.inner.http.request(method, &url);
        if let Some(token) = token {
            request = request.header(TOKEN_HEADER, token.expose());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(RequestFailure::Transport)?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let text = response.text().await.map_err(RequestFailure::Transport)?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                "API returned non-success status"
            );
            // Error bodies usually carry a head with a human-readable message
            let message = serde_json::from_str::<EnvelopeHead>(&text)
                .ok()
                .and_then(EnvelopeHead::failure_message);
            return Err(RequestFailure::Status {
                code: status,
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            RequestFailure::Decode(e)
        })
    }
}

/// Config used by tests to avoid sleeping in retry paths.
#[cfg(test)]
pub(crate) fn test_config() -> ClientConfig {
    ClientConfig {
        fetch_retries: 0,
        fetch_retry_delay: std::time::Duration::from_millis(0),
        ..ClientConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_retryable_rejections_are_not() {
        let transient = RequestFailure::Status {
            code: StatusCode::BAD_GATEWAY,
            message: None,
        };
        assert!(transient.is_retryable());

        let rejected = RequestFailure::Status {
            code: StatusCode::BAD_REQUEST,
            message: Some("No cart exists".into()),
        };
        assert!(!rejected.is_retryable());
    }

    #[test]
    fn status_failure_maps_to_status_error() {
        let err: ApiError = RequestFailure::Status {
            code: StatusCode::NOT_FOUND,
            message: Some("No product found".into()),
        }
        .into();
        assert_eq!(err.server_message(), Some("No product found"));
    }
}
