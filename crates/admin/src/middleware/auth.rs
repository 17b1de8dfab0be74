//! Authentication extractors for the dashboard.
//!
//! Provides extractors for requiring a signed-in user in route handlers.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use secrecy::SecretString;
use serde_json::json;
use tower_sessions::Session;

use crate::cache::ListQueryKey;
use crate::models::{CurrentUser, session_keys};

/// Extractor that requires a signed-in user.
///
/// Carries the session too, so handlers can read and update the active list
/// keys without extracting it twice.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(user: RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.user.name)
/// }
/// ```
pub struct RequireUser {
    pub user: CurrentUser,
    /// Platform API token issued at sign-in.
    pub token: SecretString,
    pub session: Session,
}

/// Extractor that requires a signed-in admin.
pub struct RequireAdmin(pub RequireUser);

/// Error returned when authentication or the admin role is required.
#[derive(Debug)]
pub enum AuthRejection {
    /// No signed-in user.
    Unauthorized,
    /// Signed in, but not an admin.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Sign in to continue"})),
            )
                .into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(json!({"error": "Only admins can access this resource"})),
            )
                .into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AuthRejection::Unauthorized)?;

        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection::Unauthorized)?;

        let token: String = session
            .get(session_keys::API_TOKEN)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection::Unauthorized)?;

        Ok(Self {
            user,
            token: SecretString::from(token),
            session,
        })
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = RequireUser::from_request_parts(parts, state).await?;

        if !user.user.actor.is_admin() {
            return Err(AuthRejection::Forbidden);
        }

        Ok(Self(user))
    }
}

impl RequireUser {
    /// The list page this session last rendered under `slot`.
    ///
    /// A missing or unreadable key means there is nothing to patch.
    pub async fn active_key(&self, slot: &str) -> Option<ListQueryKey> {
        self.session.get(slot).await.ok().flatten()
    }

    /// Remember `key` as the list page this session renders under `slot`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn set_active_key(
        &self,
        slot: &str,
        key: &ListQueryKey,
    ) -> Result<(), tower_sessions::session::Error> {
        self.session.insert(slot, key).await
    }
}

/// Helper to store a signed-in user in the session.
///
/// The session id is cycled first so a pre-login session id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
    token: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await?;
    session.insert(session_keys::API_TOKEN, token).await
}

/// Helper to end the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be flushed.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
