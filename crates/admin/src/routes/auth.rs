//! Sign-in route handlers.

use axum::{Json, Router, extract::State, routing::get, routing::post};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tower_sessions::Session;

use crate::{
    error::{AppError, clear_sentry_user, set_sentry_user},
    middleware::auth::{RequireUser, clear_current_user, set_current_user},
    models::CurrentUser,
    state::AppState,
};

use super::Notice;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

/// Sign-in form.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// Sign in and start a session.
///
/// # Errors
///
/// Returns 401 for refused credentials and 502 if the API is unreachable.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Notice<CurrentUser>>, AppError> {
    let signed_in = state.auth().sign_in(&body.login, &body.password).await?;

    set_current_user(&session, &signed_in.user, signed_in.token.expose_secret()).await?;
    set_sentry_user(signed_in.user.id.as_i32(), &signed_in.user.name);

    Ok(Json(Notice::new("Signed in", signed_in.user)))
}

/// End the session.
///
/// # Errors
///
/// Returns 500 if the session store fails.
pub async fn logout(session: Session) -> Result<Json<Notice<()>>, AppError> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(Json(Notice::new("Signed out", ())))
}

/// The signed-in user.
pub async fn me(user: RequireUser) -> Json<CurrentUser> {
    Json(user.user)
}
