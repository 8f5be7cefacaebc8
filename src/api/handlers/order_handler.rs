//! Order handlers: checkout, history, and the payment/delivery transitions.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{Order, OrderStatus, PaymentMethod, PaymentResult, ShippingAddress};
use crate::errors::AppResult;
use crate::services::{NewOrder, OrderLine};
use crate::types::{Paginated, PaginatedOrders, PaginationParams};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    #[schema(example = 1)]
    pub quantity: u32,
}

/// Checkout body. Prices are range-checked and otherwise stored as sent.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "No order items"), nested)]
    pub order_items: Vec<OrderItemRequest>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    #[schema(value_type = String, example = "998.00")]
    pub items_price: Decimal,
    #[schema(value_type = String, example = "50.00")]
    pub shipping_price: Decimal,
    #[schema(value_type = String, example = "1048.00")]
    pub total_price: Decimal,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(req: CreateOrderRequest) -> Self {
        Self {
            items: req
                .order_items
                .into_iter()
                .map(|item| OrderLine {
                    product_id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
            shipping_address: req.shipping_address,
            payment_method: req.payment_method,
            items_price: req.items_price,
            shipping_price: req.shipping_price,
            total_price: req.total_price,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusRequest {
    pub order_status: OrderStatus,
}

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order).get(list_my_orders))
        .route("/all", get(list_all_orders))
        .route("/:id", get(get_order))
        .route("/:id/pay", put(mark_paid))
        .route("/:id/deliver", put(mark_delivered))
        .route("/:id/status", put(set_status))
        .route("/:id/cancel", put(cancel_order))
}

/// Place an order
#[utoipa::path(
    post,
    path = "/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = Order),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn create_order(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state
        .order_service
        .create_order(current_user.id, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// The caller's orders, newest first
#[utoipa::path(
    get,
    path = "/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Own orders", body = Vec<Order>))
)]
pub async fn list_my_orders(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(state.order_service.list_mine(current_user.id).await?))
}

/// Every order (admin only)
#[utoipa::path(
    get,
    path = "/orders/all",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of orders", body = PaginatedOrders),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_all_orders(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Order>>> {
    let (orders, total) = state
        .order_service
        .list_all(current_user.requester(), &params)
        .await?;

    Ok(Json(Paginated::new(orders, &params, total)))
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order", body = Order),
        (status = 403, description = "Not your order"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Order>> {
    let order = state
        .order_service
        .get_order(current_user.requester(), id)
        .await?;
    Ok(Json(order))
}

/// Record the payment provider's confirmation
#[utoipa::path(
    put,
    path = "/orders/{id}/pay",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = PaymentResult,
    responses(
        (status = 200, description = "Order paid", body = Order),
        (status = 403, description = "Not your order"),
        (status = 409, description = "Order already delivered")
    )
)]
pub async fn mark_paid(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payment): Json<PaymentResult>,
) -> AppResult<Json<Order>> {
    let order = state
        .order_service
        .mark_paid(current_user.requester(), id, payment)
        .await?;
    Ok(Json(order))
}

#[utoipa::path(
    put,
    path = "/orders/{id}/deliver",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order delivered", body = Order),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 409, description = "Order already delivered")
    )
)]
pub async fn mark_delivered(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Order>> {
    let order = state
        .order_service
        .mark_delivered(current_user.requester(), id)
        .await?;
    Ok(Json(order))
}

#[utoipa::path(
    put,
    path = "/orders/{id}/status",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = SetStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = Order),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 409, description = "Transition not allowed")
    )
)]
pub async fn set_status(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<SetStatusRequest>,
) -> AppResult<Json<Order>> {
    let order = state
        .order_service
        .set_status(current_user.requester(), id, payload.order_status)
        .await?;
    Ok(Json(order))
}

#[utoipa::path(
    put,
    path = "/orders/{id}/cancel",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order cancelled", body = Order),
        (status = 409, description = "Order already delivered")
    )
)]
pub async fn cancel_order(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Order>> {
    let order = state
        .order_service
        .cancel(current_user.requester(), id)
        .await?;
    Ok(Json(order))
}
