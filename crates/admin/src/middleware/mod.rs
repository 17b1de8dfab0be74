//! HTTP middleware for the dashboard.
//!
//! - [`session`] - tower-sessions layer
//! - [`auth`] - extractors that require a signed-in user

pub mod auth;
pub mod session;

pub use auth::{AuthRejection, RequireAdmin, RequireUser};
pub use session::create_session_layer;
