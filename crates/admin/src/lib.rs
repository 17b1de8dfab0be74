//! Yumbox Admin library.
//!
//! Backend of the dashboard used by restaurant moderators and platform admins
//! to manage promocodes and products. All data lives behind the platform's
//! GraphQL API; this crate keeps paged list results in memory and patches
//! them with the records returned by successful mutations.
//!
//! # Modules
//!
//! - [`api`] - typed GraphQL operations and transport
//! - [`cache`] - list cache and the patches applied after mutations
//! - [`scope`] - role-scoped list variables
//! - [`services`] - promocode, product, restaurant and sign-in logic
//! - [`routes`] - JSON HTTP handlers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod scope;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::create_session_layer;
use crate::state::AppState;

/// Build the application router with sessions and request tracing.
///
/// Sentry layers are added by the binary, outside this router.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .merge(routes::routes())
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        #[allow(clippy::cast_possible_truncation)]
                        span.record("latency_ms", latency.as_millis() as u64);
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
