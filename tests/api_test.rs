//! End-to-end behaviour over an in-memory Unit of Work.
//!
//! The services run against plain `HashMap` repositories so that carts,
//! wishlists and orders can be exercised across several calls without a
//! database or Redis.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    response::IntoResponse,
    routing::post,
    Router,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;
use utoipa::OpenApi;
use uuid::Uuid;
use validator::Validate;

use storefront_api::api::extractors::ValidatedJson;
use storefront_api::api::handlers::{account_handler, cart_handler, order_handler};
use storefront_api::api::ApiDoc;
use storefront_api::domain::{
    Account, AccountResponse, AddressInput, AddressKind, Cart, CartItem, Category, NewProduct,
    Order, OrderPolicy, OrderStatus, PaymentMethod, PaymentResult, Product, ProductFilter,
    Requester, Role, ShippingAddress, ShippingRates, Wishlist,
};
use storefront_api::errors::{AppError, AppResult};
use storefront_api::infra::{
    AccountRepository, CartRepository, CategoryRepository, OrderRepository, ProductRepository,
    UnitOfWork, WishlistRepository,
};
use storefront_api::services::{
    CartManager, CartService, NewOrder, OrderLine, OrderManager, OrderService, WishlistManager,
    WishlistService,
};
use storefront_api::types::PaginationParams;

// =============================================================================
// In-memory persistence
// =============================================================================

#[derive(Default)]
struct Store {
    accounts: Mutex<HashMap<Uuid, Account>>,
    products: Mutex<HashMap<Uuid, Product>>,
    categories: Mutex<HashMap<Uuid, Category>>,
    carts: Mutex<HashMap<Uuid, Cart>>,
    wishlists: Mutex<HashMap<Uuid, Wishlist>>,
    orders: Mutex<HashMap<Uuid, Order>>,
}

fn page<T>(mut items: Vec<T>, params: &PaginationParams) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let start = (params.page_index() * params.limit()) as usize;
    let items = if start >= items.len() {
        Vec::new()
    } else {
        items
            .drain(start..)
            .take(params.limit() as usize)
            .collect()
    };
    (items, total)
}

#[async_trait]
impl AccountRepository for Store {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        Ok(self.accounts.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<Account>, u64)> {
        let mut accounts: Vec<Account> = self.accounts.lock().unwrap().values().cloned().collect();
        accounts.sort_by_key(|a| a.created_at);
        Ok(page(accounts, params))
    }

    async fn save(&self, account: &Account) -> AppResult<()> {
        self.accounts
            .lock()
            .unwrap()
            .insert(account.id, account.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.accounts.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn legacy_cart(&self, _id: Uuid) -> AppResult<Option<Vec<CartItem>>> {
        Ok(None)
    }

    async fn clear_legacy_cart(&self, _id: Uuid) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for Store {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        Ok(self.products.lock().unwrap().get(&id).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Product>> {
        let products = self.products.lock().unwrap();
        Ok(ids.iter().filter_map(|id| products.get(id).cloned()).collect())
    }

    async fn list(
        &self,
        filter: &ProductFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)> {
        let mut products: Vec<Product> = self
            .products
            .lock()
            .unwrap()
            .values()
            .filter(|p| filter.category_id.is_none() || p.category_id == filter.category_id)
            .cloned()
            .collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(products, params))
    }

    async fn save(&self, product: &Product) -> AppResult<()> {
        self.products
            .lock()
            .unwrap()
            .insert(product.id, product.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.products.lock().unwrap().remove(&id);
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for Store {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        Ok(self.categories.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Category>> {
        let categories = self.categories.lock().unwrap();
        Ok(categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Category>> {
        Ok(self.categories.lock().unwrap().values().cloned().collect())
    }

    async fn save(&self, category: &Category) -> AppResult<()> {
        self.categories
            .lock()
            .unwrap()
            .insert(category.id, category.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.categories.lock().unwrap().remove(&id);
        Ok(())
    }
}

#[async_trait]
impl CartRepository for Store {
    async fn find_by_account(&self, account_id: Uuid) -> AppResult<Option<Cart>> {
        Ok(self.carts.lock().unwrap().get(&account_id).cloned())
    }

    async fn save(&self, cart: &Cart) -> AppResult<()> {
        self.carts
            .lock()
            .unwrap()
            .insert(cart.account_id, cart.clone());
        Ok(())
    }
}

#[async_trait]
impl WishlistRepository for Store {
    async fn find_by_account(&self, account_id: Uuid) -> AppResult<Option<Wishlist>> {
        Ok(self.wishlists.lock().unwrap().get(&account_id).cloned())
    }

    async fn save(&self, wishlist: &Wishlist) -> AppResult<()> {
        self.wishlists
            .lock()
            .unwrap()
            .insert(wishlist.account_id, wishlist.clone());
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for Store {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        Ok(self.orders.lock().unwrap().get(&id).cloned())
    }

    async fn list_by_account(&self, account_id: Uuid) -> AppResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .orders
            .lock()
            .unwrap()
            .values()
            .filter(|o| o.account_id == account_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<Order>, u64)> {
        let mut orders: Vec<Order> = self.orders.lock().unwrap().values().cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(orders, params))
    }

    async fn save(&self, order: &Order) -> AppResult<()> {
        self.orders.lock().unwrap().insert(order.id, order.clone());
        Ok(())
    }
}

#[derive(Clone, Default)]
struct InMemory {
    store: Arc<Store>,
}

impl InMemory {
    fn add_product(&self, name: &str, price: Decimal) -> Product {
        let product = Product::new(NewProduct {
            name: name.to_string(),
            description: String::new(),
            price,
            category_id: None,
            stock: 10,
        })
        .unwrap();
        self.store
            .products
            .lock()
            .unwrap()
            .insert(product.id, product.clone());
        product
    }

    fn stored_order(&self, id: Uuid) -> Order {
        self.store.orders.lock().unwrap()[&id].clone()
    }
}

impl UnitOfWork for InMemory {
    fn accounts(&self) -> Arc<dyn AccountRepository> {
        self.store.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.store.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.store.clone()
    }

    fn carts(&self) -> Arc<dyn CartRepository> {
        self.store.clone()
    }

    fn wishlists(&self) -> Arc<dyn WishlistRepository> {
        self.store.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.store.clone()
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

fn orders(uow: &InMemory, policy: OrderPolicy) -> OrderManager<InMemory> {
    OrderManager::new(Arc::new(uow.clone()), ShippingRates::default(), policy)
}

fn checkout(lines: &[(Uuid, u32)], city: &str, shipping: Decimal) -> NewOrder {
    NewOrder {
        items: lines
            .iter()
            .map(|&(product_id, quantity)| OrderLine {
                product_id,
                quantity,
            })
            .collect(),
        shipping_address: ShippingAddress {
            address: "House 12, Road 4".into(),
            city: Some(city.to_string()),
            ..ShippingAddress::default()
        },
        payment_method: PaymentMethod::Card,
        items_price: dec!(500),
        shipping_price: shipping,
        total_price: dec!(500) + shipping,
    }
}

fn payment() -> PaymentResult {
    PaymentResult {
        id: "PAY-123".into(),
        status: "COMPLETED".into(),
        update_time: None,
        email_address: Some("buyer@example.com".into()),
    }
}

async fn error_body(err: AppError) -> (StatusCode, Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_cart_merge_update_and_remove_flow() {
    let uow = InMemory::default();
    let lamp = uow.add_product("Desk Lamp", dec!(250));
    let carts = CartManager::new(Arc::new(uow.clone()));
    let buyer = Uuid::new_v4();

    carts.add_item(buyer, lamp.id, 2).await.unwrap();
    let cart = carts.add_item(buyer, lamp.id, 3).await.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 5);
    assert_eq!(cart.total_items, 5);
    assert_eq!(cart.total_price, dec!(1250));

    let cart = carts.set_item_quantity(buyer, lamp.id, 0).await.unwrap();
    assert!(cart.items.is_empty());
    assert_eq!(cart.total_price, Decimal::ZERO);

    // Removing a line that is already gone leaves the cart as it is
    let cart = carts.remove_item(buyer, lamp.id).await.unwrap();
    assert!(cart.items.is_empty());
}

#[tokio::test]
async fn test_carts_are_isolated_per_account() {
    let uow = InMemory::default();
    let lamp = uow.add_product("Desk Lamp", dec!(250));
    let carts = CartManager::new(Arc::new(uow.clone()));
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

    carts.add_item(alice, lamp.id, 1).await.unwrap();

    assert_eq!(carts.get_cart(alice).await.unwrap().total_items, 1);
    assert_eq!(carts.get_cart(bob).await.unwrap().total_items, 0);
}

#[tokio::test]
async fn test_cart_view_drops_deleted_products() {
    let uow = InMemory::default();
    let lamp = uow.add_product("Desk Lamp", dec!(250));
    let fan = uow.add_product("Fan", dec!(1000));
    let carts = CartManager::new(Arc::new(uow.clone()));
    let buyer = Uuid::new_v4();

    carts.add_item(buyer, lamp.id, 1).await.unwrap();
    carts.add_item(buyer, fan.id, 1).await.unwrap();
    uow.store.products.lock().unwrap().remove(&fan.id);

    let cart = carts.get_cart(buyer).await.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.total_price, dec!(250));
}

// =============================================================================
// Wishlist
// =============================================================================

#[tokio::test]
async fn test_wishlist_duplicate_is_bad_request() {
    let uow = InMemory::default();
    let lamp = uow.add_product("Desk Lamp", dec!(250));
    let wishlists = WishlistManager::new(Arc::new(uow.clone()));
    let buyer = Uuid::new_v4();

    let view = wishlists.add_product(buyer, lamp.id).await.unwrap();
    assert_eq!(view.count, 1);
    assert!(wishlists.contains(buyer, lamp.id).await.unwrap());

    let err = wishlists.add_product(buyer, lamp.id).await.unwrap_err();
    let (status, body) = error_body(err).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "DUPLICATE_ITEM");
}

#[tokio::test]
async fn test_wishlist_remove_then_contains_is_false() {
    let uow = InMemory::default();
    let lamp = uow.add_product("Desk Lamp", dec!(250));
    let wishlists = WishlistManager::new(Arc::new(uow.clone()));
    let buyer = Uuid::new_v4();

    wishlists.add_product(buyer, lamp.id).await.unwrap();
    let view = wishlists.remove_product(buyer, lamp.id).await.unwrap();

    assert_eq!(view.count, 0);
    assert!(!wishlists.contains(buyer, lamp.id).await.unwrap());
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn test_order_lifecycle_pay_deliver_then_cancel_conflicts() {
    let uow = InMemory::default();
    let lamp = uow.add_product("Desk Lamp", dec!(250));
    let service = orders(&uow, OrderPolicy::default());
    let buyer = Requester::new(Uuid::new_v4(), Role::User);
    let admin = Requester::new(Uuid::new_v4(), Role::Admin);

    let order = service
        .create_order(buyer.id, checkout(&[(lamp.id, 2)], "Rajshahi", dec!(50)))
        .await
        .unwrap();
    assert_eq!(order.order_status, OrderStatus::Processing);
    assert!(!order.is_paid);

    let order = service.mark_paid(buyer, order.id, payment()).await.unwrap();
    assert!(order.is_paid);
    assert!(order.paid_at.is_some());
    assert_eq!(order.order_status, OrderStatus::Processing);

    let order = service.mark_delivered(admin, order.id).await.unwrap();
    assert!(order.is_delivered);
    assert!(order.delivered_at.is_some());
    assert_eq!(order.order_status, OrderStatus::Delivered);

    let err = service.cancel(buyer, order.id).await.unwrap_err();
    let (status, body) = error_body(err).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "ALREADY_DELIVERED");
    assert_eq!(uow.stored_order(order.id).order_status, OrderStatus::Delivered);
}

#[tokio::test]
async fn test_wrong_shipping_price_names_expected_value() {
    let uow = InMemory::default();
    let lamp = uow.add_product("Desk Lamp", dec!(250));
    let service = orders(&uow, OrderPolicy::default());

    let err = service
        .create_order(Uuid::new_v4(), checkout(&[(lamp.id, 1)], "Dhaka", dec!(50)))
        .await
        .unwrap_err();

    let (status, body) = error_body(err).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_SHIPPING_PRICE");
    assert_eq!(body["error"]["message"], "Invalid shipping price, expected 100");
    assert!(uow.store.orders.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_out_of_range_prices_are_bad_requests() {
    let uow = InMemory::default();
    let lamp = uow.add_product("Desk Lamp", dec!(250));
    let service = orders(
        &uow,
        OrderPolicy {
            verify_totals: true,
            ..OrderPolicy::default()
        },
    );

    let mut request = checkout(&[(lamp.id, 1)], "Dhaka", dec!(100));
    request.items_price = Decimal::MAX;
    let err = service
        .create_order(Uuid::new_v4(), request)
        .await
        .unwrap_err();
    let (status, body) = error_body(err).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let mut request = checkout(&[(lamp.id, 1)], "Dhaka", dec!(100));
    request.items_price = dec!(100000000000);
    request.total_price = dec!(100000000100);
    let err = service
        .create_order(Uuid::new_v4(), request)
        .await
        .unwrap_err();
    let (status, _) = error_body(err).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(uow.store.orders.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_order_items_are_snapshots() {
    let uow = InMemory::default();
    let lamp = uow.add_product("Desk Lamp", dec!(250));
    let service = orders(&uow, OrderPolicy::default());
    let buyer = Requester::new(Uuid::new_v4(), Role::User);

    let order = service
        .create_order(buyer.id, checkout(&[(lamp.id, 2)], "Rajshahi", dec!(50)))
        .await
        .unwrap();

    if let Some(stored) = uow.store.products.lock().unwrap().get_mut(&lamp.id) {
        stored.price = dec!(999);
        stored.name = "Renamed Lamp".into();
    }

    let order = service.get_order(buyer, order.id).await.unwrap();
    assert_eq!(order.items[0].price, dec!(250));
    assert_eq!(order.items[0].name, "Desk Lamp");
    assert_eq!(order.items[0].quantity, 2);
}

#[tokio::test]
async fn test_checkout_keeps_cart_unless_configured() {
    let uow = InMemory::default();
    let lamp = uow.add_product("Desk Lamp", dec!(250));
    let carts = CartManager::new(Arc::new(uow.clone()));
    let buyer = Uuid::new_v4();
    carts.add_item(buyer, lamp.id, 2).await.unwrap();

    orders(&uow, OrderPolicy::default())
        .create_order(buyer, checkout(&[(lamp.id, 2)], "Rajshahi", dec!(50)))
        .await
        .unwrap();
    assert_eq!(carts.get_cart(buyer).await.unwrap().total_items, 2);

    let clearing = OrderPolicy {
        clear_cart_on_checkout: true,
        ..OrderPolicy::default()
    };
    orders(&uow, clearing)
        .create_order(buyer, checkout(&[(lamp.id, 2)], "Rajshahi", dec!(50)))
        .await
        .unwrap();
    assert_eq!(carts.get_cart(buyer).await.unwrap().total_items, 0);
}

#[tokio::test]
async fn test_only_admin_lists_all_orders() {
    let uow = InMemory::default();
    let lamp = uow.add_product("Desk Lamp", dec!(250));
    let service = orders(&uow, OrderPolicy::default());
    let buyer = Requester::new(Uuid::new_v4(), Role::User);
    let admin = Requester::new(Uuid::new_v4(), Role::Admin);

    for _ in 0..3 {
        service
            .create_order(buyer.id, checkout(&[(lamp.id, 1)], "Rajshahi", dec!(50)))
            .await
            .unwrap();
    }

    let params = PaginationParams::new(Some(1), Some(2));
    let (page, total) = service.list_all(admin, &params).await.unwrap();
    assert_eq!(total, 3);
    assert_eq!(page.len(), 2);

    let err = service.list_all(buyer, &params).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
    assert_eq!(service.list_mine(buyer.id).await.unwrap().len(), 3);
}

// =============================================================================
// Request and response shapes
// =============================================================================

#[tokio::test]
async fn test_error_body_shape() {
    let (status, body) = error_body(AppError::not_found("Order")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"error": {"code": "NOT_FOUND", "message": "Order not found"}})
    );
}

#[tokio::test]
async fn test_internal_errors_hide_details() {
    let (status, body) = error_body(AppError::internal("connection pool exhausted")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["message"], "An internal error occurred");
}

#[test]
fn test_account_response_hides_credentials() {
    let account = Account::new(
        "Jane Doe".into(),
        "jane@example.com".into(),
        "$argon2id$secret".into(),
    );

    let body = serde_json::to_value(AccountResponse::from(account)).unwrap();
    assert_eq!(body["email"], "jane@example.com");
    assert_eq!(body["role"], "user");
    assert_eq!(body["isApproved"], false);
    assert!(!body.to_string().contains("argon2"));
}

#[test]
fn test_address_request_maps_type_and_defaults() {
    let request: account_handler::AddressRequest = serde_json::from_value(json!({
        "type": "work",
        "address": "Level 3, Plot 9",
        "city": "Rajshahi",
        "zipCode": "6000",
        "isDefault": true
    }))
    .unwrap();
    let input = AddressInput::from(request);
    assert_eq!(input.kind, AddressKind::Work);
    assert_eq!(input.zip_code.as_deref(), Some("6000"));
    assert!(input.is_default);

    let minimal: account_handler::AddressRequest =
        serde_json::from_value(json!({"address": "House 1", "city": "Dhaka"})).unwrap();
    let input = AddressInput::from(minimal);
    assert_eq!(input.kind, AddressKind::Home);
    assert!(!input.is_default);
}

#[test]
fn test_create_order_request_requires_items() {
    let request: order_handler::CreateOrderRequest = serde_json::from_value(json!({
        "orderItems": [],
        "shippingAddress": {"address": "House 1", "city": "Rajshahi"},
        "paymentMethod": "cash",
        "itemsPrice": "0",
        "shippingPrice": "50",
        "totalPrice": "50"
    }))
    .unwrap();

    assert!(request.validate().is_err());
}

#[test]
fn test_create_order_request_converts_lines() {
    let product_id = Uuid::new_v4();
    let request: order_handler::CreateOrderRequest = serde_json::from_value(json!({
        "orderItems": [{"productId": product_id, "quantity": 2}],
        "shippingAddress": {"address": "House 1", "city": "Rajshahi"},
        "paymentMethod": "card",
        "itemsPrice": "500.00",
        "shippingPrice": "50",
        "totalPrice": "550.00"
    }))
    .unwrap();
    assert!(request.validate().is_ok());

    let order = NewOrder::from(request);
    assert_eq!(
        order.items,
        vec![OrderLine {
            product_id,
            quantity: 2
        }]
    );
    assert_eq!(order.payment_method, PaymentMethod::Card);
    assert_eq!(order.total_price, dec!(550));
}

#[test]
fn test_openapi_lists_storefront_paths() {
    let doc = ApiDoc::openapi();
    for path in [
        "/auth/login",
        "/accounts/me/addresses",
        "/products/{id}/images/{public_id}",
        "/cart/items/{product_id}",
        "/wishlist/items/{product_id}",
        "/orders/{id}/pay",
        "/orders/all",
    ] {
        assert!(doc.paths.paths.contains_key(path), "missing {}", path);
    }
}

fn add_to_cart_app() -> Router {
    Router::new().route(
        "/cart/items",
        post(
            |ValidatedJson(payload): ValidatedJson<cart_handler::AddCartItemRequest>| async move {
                payload.quantity.to_string()
            },
        ),
    )
}

fn json_post(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/cart/items")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_add_to_cart_quantity_defaults_to_one() {
    let response = add_to_cart_app()
        .oneshot(json_post(json!({"productId": Uuid::new_v4()})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"1");
}

#[tokio::test]
async fn test_add_to_cart_rejects_zero_quantity() {
    let response = add_to_cart_app()
        .oneshot(json_post(json!({"productId": Uuid::new_v4(), "quantity": 0})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["message"], "Quantity must be at least 1");
}
