//! Wishlist handlers.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::WishlistView;
use crate::errors::AppResult;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItemRequest {
    pub product_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WishlistStatus {
    pub in_wishlist: bool,
}

pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_wishlist).delete(clear_wishlist))
        .route("/items", post(add_product))
        .route("/items/:product_id", get(contains).delete(remove_product))
}

#[utoipa::path(
    get,
    path = "/wishlist",
    tag = "Wishlist",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Current wishlist", body = WishlistView))
)]
pub async fn get_wishlist(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<WishlistView>> {
    Ok(Json(state.wishlist_service.get_wishlist(current_user.id).await?))
}

#[utoipa::path(
    post,
    path = "/wishlist/items",
    tag = "Wishlist",
    security(("bearer_auth" = [])),
    request_body = WishlistItemRequest,
    responses(
        (status = 201, description = "Product added", body = WishlistView),
        (status = 404, description = "Product not found"),
        (status = 400, description = "Already in wishlist")
    )
)]
pub async fn add_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<WishlistItemRequest>,
) -> AppResult<(StatusCode, Json<WishlistView>)> {
    let wishlist = state
        .wishlist_service
        .add_product(current_user.id, payload.product_id)
        .await?;
    Ok((StatusCode::CREATED, Json(wishlist)))
}

/// Whether a product is saved
#[utoipa::path(
    get,
    path = "/wishlist/items/{product_id}",
    tag = "Wishlist",
    security(("bearer_auth" = [])),
    params(("product_id" = Uuid, Path, description = "Product ID")),
    responses((status = 200, description = "Membership", body = WishlistStatus))
)]
pub async fn contains(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<WishlistStatus>> {
    let in_wishlist = state
        .wishlist_service
        .contains(current_user.id, product_id)
        .await?;
    Ok(Json(WishlistStatus { in_wishlist }))
}

#[utoipa::path(
    delete,
    path = "/wishlist/items/{product_id}",
    tag = "Wishlist",
    security(("bearer_auth" = [])),
    params(("product_id" = Uuid, Path, description = "Product ID")),
    responses((status = 200, description = "Updated wishlist", body = WishlistView))
)]
pub async fn remove_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<WishlistView>> {
    let wishlist = state
        .wishlist_service
        .remove_product(current_user.id, product_id)
        .await?;
    Ok(Json(wishlist))
}

#[utoipa::path(
    delete,
    path = "/wishlist",
    tag = "Wishlist",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Emptied wishlist", body = WishlistView))
)]
pub async fn clear_wishlist(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<WishlistView>> {
    Ok(Json(state.wishlist_service.clear(current_user.id).await?))
}
