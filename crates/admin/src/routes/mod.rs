//! HTTP route handlers for the dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                     - Health check
//!
//! # Auth (credentials checked by the platform API)
//! POST   /auth/login                 - Sign in
//! POST   /auth/logout                - Sign out
//! GET    /auth/me                    - Current user
//!
//! # Promocodes
//! GET    /promocodes                 - Paged list (search, page, publish, restaurant_id)
//! POST   /promocodes                 - Create
//! GET    /promocodes/{id}            - Detail
//! PUT    /promocodes/{id}            - Update
//! DELETE /promocodes/{id}            - Delete
//! POST   /promocodes/{id}/publish    - Publish or unpublish
//!
//! # Products
//! GET    /products                   - Paged list (search, page, publish, restaurant_id)
//! POST   /products                   - Create
//! GET    /products/{id}              - Detail
//! PUT    /products/{id}              - Update
//! DELETE /products/{id}              - Delete
//! POST   /products/{id}/publish      - Publish or unpublish
//! GET    /categories                 - Categories used by a restaurant
//!
//! # Restaurants (admins only)
//! GET    /restaurants                - Restaurant selector
//! ```
//!
//! List handlers always fetch and remember the key of the page they served in
//! the session, discarding the page served before it. Mutation handlers pass
//! that key down so the service patches exactly the page the user is looking
//! at, and return the patched page with the record.

pub mod auth;
pub mod products;
pub mod promocodes;
pub mod restaurants;

use axum::{Router, routing::get};
use serde::{Deserialize, Serialize};

use crate::services::PatchedList;
use crate::state::AppState;

/// Build the complete dashboard router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(auth::router())
        .merge(promocodes::router())
        .merge(products::router())
        .merge(restaurants::router())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the platform API.
async fn health() -> &'static str {
    "ok"
}

/// Success response of a mutation: a notice for the user and the record.
///
/// Entity mutations also carry the session's active list page as patched by
/// the mutation, when that page is still cached.
#[derive(Debug, Serialize)]
pub struct Notice<T> {
    pub message: &'static str,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<PatchedList<T>>,
}

impl<T> Notice<T> {
    pub const fn new(message: &'static str, data: T) -> Self {
        Self {
            message,
            data,
            list: None,
        }
    }

    #[must_use]
    pub fn with_list(mut self, list: Option<PatchedList<T>>) -> Self {
        self.list = list;
        self
    }
}

/// Body of the publish toggle.
#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub publish: bool,
}
