//! Restaurant route handlers (admins only).

use axum::{Json, Router, extract::State, routing::get};

use crate::{
    api::RestaurantRef, error::AppError, middleware::auth::RequireAdmin, state::AppState,
};

/// Build the restaurants router.
pub fn router() -> Router<AppState> {
    Router::new().route("/restaurants", get(index))
}

/// Every live restaurant, for the admin restaurant selector.
///
/// # Errors
///
/// Returns 403 for moderators, 502 if the API call fails.
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<RestaurantRef>>, AppError> {
    let restaurants = state
        .restaurants()
        .list(&admin.user.actor, &admin.token)
        .await?;
    Ok(Json(restaurants))
}
