//! Product route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::Deserialize;
use yumbox_core::{ProductId, RestaurantId};

use crate::{
    api::Product,
    error::AppError,
    middleware::auth::RequireUser,
    models::session_keys::ACTIVE_PRODUCT_LIST,
    scope::ListParams,
    services::{ListPage, ProductForm},
    state::AppState,
};

use super::{Notice, PublishRequest};

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(index).post(create))
        .route("/products/{id}", get(show).put(update).delete(destroy))
        .route("/products/{id}/publish", post(publish))
        .route("/categories", get(categories))
}

/// Query of the categories lookup.
#[derive(Debug, Deserialize)]
pub struct CategoriesQuery {
    /// Ignored for moderators; required from admins.
    pub restaurant_id: Option<RestaurantId>,
}

/// Categories already used by a restaurant's products.
///
/// # Errors
///
/// Returns 400 if an admin names no restaurant, 502 if the API call fails.
pub async fn categories(
    user: RequireUser,
    State(state): State<AppState>,
    Query(query): Query<CategoriesQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    let categories = state
        .products()
        .categories(&user.user.actor, &user.token, query.restaurant_id)
        .await?;
    Ok(Json(categories))
}

/// Paged product list, always fetched. Replaces the session's active page.
///
/// # Errors
///
/// Returns 502 if the API call fails.
pub async fn index(
    user: RequireUser,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListPage<Product>>, AppError> {
    let previous = user.active_key(ACTIVE_PRODUCT_LIST).await;
    let page = state
        .products()
        .list(&user.user.actor, &user.token, &params, previous.as_ref())
        .await?;
    user.set_active_key(ACTIVE_PRODUCT_LIST, &page.key).await?;
    Ok(Json(page))
}

/// One product.
///
/// # Errors
///
/// Returns 404 outside the user's scope, 502 if the API call fails.
pub async fn show(
    user: RequireUser,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>, AppError> {
    let product = state
        .products()
        .find(&user.user.actor, &user.token, id)
        .await?;
    Ok(Json(product))
}

/// Create a product.
///
/// # Errors
///
/// Returns 400 for invalid input, 502 if the API call fails.
pub async fn create(
    user: RequireUser,
    State(state): State<AppState>,
    Json(form): Json<ProductForm>,
) -> Result<Json<Notice<Product>>, AppError> {
    let active = user.active_key(ACTIVE_PRODUCT_LIST).await;
    let created = state
        .products()
        .create(&user.user.actor, &user.token, &form, active.as_ref())
        .await?;
    Ok(Json(
        Notice::new("Product added", created)
            .with_list(state.products().active_list(active.as_ref()).await),
    ))
}

/// Update a product.
///
/// # Errors
///
/// Returns 400 for invalid input, 404 outside the user's scope, 502 if the
/// API call fails.
pub async fn update(
    user: RequireUser,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(form): Json<ProductForm>,
) -> Result<Json<Notice<Product>>, AppError> {
    let active = user.active_key(ACTIVE_PRODUCT_LIST).await;
    let updated = state
        .products()
        .update(&user.user.actor, &user.token, id, &form, active.as_ref())
        .await?;
    Ok(Json(
        Notice::new("Product updated", updated)
            .with_list(state.products().active_list(active.as_ref()).await),
    ))
}

/// Publish or unpublish a product.
///
/// # Errors
///
/// Returns 404 outside the user's scope, 502 if the API call fails.
pub async fn publish(
    user: RequireUser,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(body): Json<PublishRequest>,
) -> Result<Json<Notice<Product>>, AppError> {
    let active = user.active_key(ACTIVE_PRODUCT_LIST).await;
    let updated = state
        .products()
        .set_published(
            &user.user.actor,
            &user.token,
            id,
            body.publish,
            active.as_ref(),
        )
        .await?;
    Ok(Json(
        Notice::new("Product updated", updated)
            .with_list(state.products().active_list(active.as_ref()).await),
    ))
}

/// Delete a product.
///
/// # Errors
///
/// Returns 404 outside the user's scope, 502 if the API call fails.
pub async fn destroy(
    user: RequireUser,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Notice<Product>>, AppError> {
    let active = user.active_key(ACTIVE_PRODUCT_LIST).await;
    let deleted = state
        .products()
        .delete(&user.user.actor, &user.token, id, active.as_ref())
        .await?;
    Ok(Json(
        Notice::new("Product deleted", deleted)
            .with_list(state.products().active_list(active.as_ref()).await),
    ))
}
