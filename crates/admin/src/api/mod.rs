//! Platform GraphQL API client.
//!
//! The dashboard owns no data of its own: products, promocodes and
//! restaurants all live behind the platform's GraphQL API.
//!
//! # Architecture
//!
//! - Every operation is a unit struct implementing `graphql_client::GraphQLQuery`
//!   with typed `Variables` and `ResponseData` (see [`operations`])
//! - Operation documents live in `crates/admin/graphql/*.graphql`
//! - [`ApiClient`] builds the request body, sends it through a
//!   [`GraphQLTransport`] and validates the response at the boundary
//! - [`HttpTransport`] is the `reqwest` implementation used in production
//!
//! # Example
//!
//! ```rust,ignore
//! use yumbox_admin::api::{ApiClient, operations::FindUniquePromocode, inputs::UniqueArgs};
//!
//! let client = ApiClient::http(&config.api)?;
//! let promocode = client
//!     .execute::<FindUniquePromocode>(UniqueArgs::new(id), Some(&token))
//!     .await?
//!     .into_inner();
//! ```

mod client;
pub mod inputs;
pub mod operations;
mod transport;
pub mod types;

pub use client::ApiClient;
pub use transport::{GraphQLTransport, HttpTransport};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with the platform API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The response carried neither data nor errors.
    #[error("No data in response to {0}")]
    NoData(&'static str),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The API answered with a non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// A GraphQL error returned by the platform API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
    /// `extensions.code`, when the server classifies the error.
    pub code: Option<String>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

impl GraphQLError {
    /// An error with only a message, for failures detected client-side.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: vec![],
            path: vec![],
            code: None,
        }
    }

    /// Whether the server marked this error as an authentication failure.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.code.as_deref(), Some("UNAUTHENTICATED" | "FORBIDDEN"))
    }
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}
