//! Transport layer for GraphQL requests.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::config::ApiConfig;

use super::ApiError;

/// Sends an already-built GraphQL request body and returns the raw JSON
/// response envelope (`{"data": ..., "errors": ...}`).
///
/// Implementations only deal with transport concerns. Decoding and error
/// extraction happen in [`super::ApiClient`].
#[async_trait]
pub trait GraphQLTransport: Send + Sync {
    /// Send a request body, authenticated with `token` when given.
    async fn send(
        &self,
        body: &serde_json::Value,
        token: Option<&SecretString>,
    ) -> Result<serde_json::Value, ApiError>;
}

/// HTTP transport backed by `reqwest`.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
    /// Used for calls made before a user has signed in.
    service_token: Option<SecretString>,
}

impl HttpTransport {
    /// Create a new HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            service_token: config.service_token.clone(),
        })
    }
}

#[async_trait]
impl GraphQLTransport for HttpTransport {
    async fn send(
        &self,
        body: &serde_json::Value,
        token: Option<&SecretString>,
    ) -> Result<serde_json::Value, ApiError> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header("Content-Type", "application/json")
            .json(body);

        if let Some(token) = token.or(self.service_token.as_ref()) {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        // Check for unauthorized
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized(
                "Invalid or expired access token".to_string(),
            ));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Platform API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: response_text.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse platform GraphQL response"
            );
            ApiError::Parse(e)
        })
    }
}
