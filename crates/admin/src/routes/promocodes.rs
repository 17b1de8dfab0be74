//! Promocode route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use yumbox_core::PromocodeId;

use crate::{
    api::Promocode,
    error::AppError,
    middleware::auth::RequireUser,
    models::session_keys::ACTIVE_PROMOCODE_LIST,
    scope::ListParams,
    services::{ListPage, PromocodeForm},
    state::AppState,
};

use super::{Notice, PublishRequest};

/// Build the promocodes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/promocodes", get(index).post(create))
        .route("/promocodes/{id}", get(show).put(update).delete(destroy))
        .route("/promocodes/{id}/publish", post(publish))
}

/// Paged promocode list, always fetched. Replaces the session's active page.
///
/// # Errors
///
/// Returns 502 if the API call fails.
pub async fn index(
    user: RequireUser,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListPage<Promocode>>, AppError> {
    let previous = user.active_key(ACTIVE_PROMOCODE_LIST).await;
    let page = state
        .promocodes()
        .list(&user.user.actor, &user.token, &params, previous.as_ref())
        .await?;
    user.set_active_key(ACTIVE_PROMOCODE_LIST, &page.key).await?;
    Ok(Json(page))
}

/// One promocode.
///
/// # Errors
///
/// Returns 404 outside the user's scope, 502 if the API call fails.
pub async fn show(
    user: RequireUser,
    State(state): State<AppState>,
    Path(id): Path<PromocodeId>,
) -> Result<Json<Promocode>, AppError> {
    let promocode = state
        .promocodes()
        .find(&user.user.actor, &user.token, id)
        .await?;
    Ok(Json(promocode))
}

/// Create a promocode.
///
/// # Errors
///
/// Returns 400 for invalid input, 502 if the API call fails.
pub async fn create(
    user: RequireUser,
    State(state): State<AppState>,
    Json(form): Json<PromocodeForm>,
) -> Result<Json<Notice<Promocode>>, AppError> {
    let active = user.active_key(ACTIVE_PROMOCODE_LIST).await;
    let created = state
        .promocodes()
        .create(&user.user.actor, &user.token, &form, active.as_ref())
        .await?;
    Ok(Json(
        Notice::new("Promocode added", created)
            .with_list(state.promocodes().active_list(active.as_ref()).await),
    ))
}

/// Update a promocode.
///
/// # Errors
///
/// Returns 400 for invalid input, 404 outside the user's scope, 502 if the
/// API call fails.
pub async fn update(
    user: RequireUser,
    State(state): State<AppState>,
    Path(id): Path<PromocodeId>,
    Json(form): Json<PromocodeForm>,
) -> Result<Json<Notice<Promocode>>, AppError> {
    let active = user.active_key(ACTIVE_PROMOCODE_LIST).await;
    let updated = state
        .promocodes()
        .update(&user.user.actor, &user.token, id, &form, active.as_ref())
        .await?;
    Ok(Json(
        Notice::new("Promocode updated", updated)
            .with_list(state.promocodes().active_list(active.as_ref()).await),
    ))
}

/// Publish or unpublish a promocode.
///
/// # Errors
///
/// Returns 404 outside the user's scope, 502 if the API call fails.
pub async fn publish(
    user: RequireUser,
    State(state): State<AppState>,
    Path(id): Path<PromocodeId>,
    Json(body): Json<PublishRequest>,
) -> Result<Json<Notice<Promocode>>, AppError> {
    let active = user.active_key(ACTIVE_PROMOCODE_LIST).await;
    let updated = state
        .promocodes()
        .set_published(
            &user.user.actor,
            &user.token,
            id,
            body.publish,
            active.as_ref(),
        )
        .await?;
    Ok(Json(
        Notice::new("Promocode updated", updated)
            .with_list(state.promocodes().active_list(active.as_ref()).await),
    ))
}

/// Delete a promocode.
///
/// # Errors
///
/// Returns 404 outside the user's scope, 502 if the API call fails.
pub async fn destroy(
    user: RequireUser,
    State(state): State<AppState>,
    Path(id): Path<PromocodeId>,
) -> Result<Json<Notice<Promocode>>, AppError> {
    let active = user.active_key(ACTIVE_PROMOCODE_LIST).await;
    let deleted = state
        .promocodes()
        .delete(&user.user.actor, &user.token, id, active.as_ref())
        .await?;
    Ok(Json(
        Notice::new("Promocode deleted", deleted)
            .with_list(state.promocodes().active_list(active.as_ref()).await),
    ))
}
