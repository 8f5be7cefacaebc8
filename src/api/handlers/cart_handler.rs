//! Cart handlers. Every route acts on the caller's own cart.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::DEFAULT_CART_QUANTITY;
use crate::domain::CartView;
use crate::errors::AppResult;

fn default_quantity() -> u32 {
    DEFAULT_CART_QUANTITY
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemRequest {
    pub product_id: Uuid,
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    #[schema(example = 2)]
    pub quantity: u32,
}

/// Zero or less removes the line.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCartItemRequest {
    #[schema(example = 3)]
    pub quantity: i64,
}

pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cart).delete(clear_cart))
        .route("/items", post(add_item))
        .route("/items/:product_id", put(update_item).delete(remove_item))
}

#[utoipa::path(
    get,
    path = "/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current cart", body = CartView),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_cart(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<CartView>> {
    Ok(Json(state.cart_service.get_cart(current_user.id).await?))
}

/// Add a product, merging with an existing line
#[utoipa::path(
    post,
    path = "/cart/items",
    tag = "Cart",
    security(("bearer_auth" = [])),
    request_body = AddCartItemRequest,
    responses(
        (status = 200, description = "Updated cart", body = CartView),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn add_item(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AddCartItemRequest>,
) -> AppResult<Json<CartView>> {
    let cart = state
        .cart_service
        .add_item(current_user.id, payload.product_id, payload.quantity)
        .await?;
    Ok(Json(cart))
}

#[utoipa::path(
    put,
    path = "/cart/items/{product_id}",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(("product_id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Updated cart", body = CartView),
        (status = 404, description = "Item not in cart")
    )
)]
pub async fn update_item(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCartItemRequest>,
) -> AppResult<Json<CartView>> {
    let cart = state
        .cart_service
        .set_item_quantity(current_user.id, product_id, payload.quantity)
        .await?;
    Ok(Json(cart))
}

#[utoipa::path(
    delete,
    path = "/cart/items/{product_id}",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(("product_id" = Uuid, Path, description = "Product ID")),
    responses((status = 200, description = "Updated cart", body = CartView))
)]
pub async fn remove_item(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<CartView>> {
    let cart = state
        .cart_service
        .remove_item(current_user.id, product_id)
        .await?;
    Ok(Json(cart))
}

#[utoipa::path(
    delete,
    path = "/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Emptied cart", body = CartView))
)]
pub async fn clear_cart(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<CartView>> {
    Ok(Json(state.cart_service.clear(current_user.id).await?))
}
