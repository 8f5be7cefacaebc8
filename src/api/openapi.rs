//! OpenAPI documentation configuration.
//!
//! Served through Swagger UI at `/swagger-ui`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    account_handler, auth_handler, cart_handler, catalog_handler, order_handler,
    wishlist_handler,
};
use crate::domain::{
    AccountResponse, Address, AddressKind, CartLine, CartView, Category, Gender, MediaAsset,
    Order, OrderItem, OrderStatus, PaymentMethod, PaymentResult, Product, Profile, Role,
    ShippingAddress, WishlistEntry, WishlistView,
};
use crate::services::TokenResponse;
use crate::types::{PaginatedAccounts, PaginatedOrders, PaginatedProducts, PaginationMeta};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = "E-commerce backend: catalog, accounts, carts, wishlists and orders",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        account_handler::get_current_account,
        account_handler::update_current_account,
        account_handler::upload_avatar,
        account_handler::list_addresses,
        account_handler::add_address,
        account_handler::update_address,
        account_handler::remove_address,
        account_handler::set_default_address,
        account_handler::list_accounts,
        account_handler::approve_account,
        account_handler::delete_account,
        catalog_handler::list_products,
        catalog_handler::get_product,
        catalog_handler::create_product,
        catalog_handler::update_product,
        catalog_handler::delete_product,
        catalog_handler::add_product_image,
        catalog_handler::remove_product_image,
        catalog_handler::list_categories,
        catalog_handler::get_category,
        catalog_handler::create_category,
        catalog_handler::update_category,
        catalog_handler::delete_category,
        cart_handler::get_cart,
        cart_handler::add_item,
        cart_handler::update_item,
        cart_handler::remove_item,
        cart_handler::clear_cart,
        wishlist_handler::get_wishlist,
        wishlist_handler::add_product,
        wishlist_handler::contains,
        wishlist_handler::remove_product,
        wishlist_handler::clear_wishlist,
        order_handler::create_order,
        order_handler::list_my_orders,
        order_handler::list_all_orders,
        order_handler::get_order,
        order_handler::mark_paid,
        order_handler::mark_delivered,
        order_handler::set_status,
        order_handler::cancel_order,
    ),
    components(
        schemas(
            Role,
            Gender,
            Profile,
            AddressKind,
            Address,
            AccountResponse,
            MediaAsset,
            Product,
            Category,
            CartLine,
            CartView,
            WishlistEntry,
            WishlistView,
            PaymentMethod,
            OrderStatus,
            OrderItem,
            ShippingAddress,
            PaymentResult,
            Order,
            PaginationMeta,
            PaginatedAccounts,
            PaginatedProducts,
            PaginatedOrders,
            TokenResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            account_handler::UpdateProfileRequest,
            account_handler::AddressRequest,
            account_handler::UpdateAddressRequest,
            catalog_handler::CreateProductRequest,
            catalog_handler::UpdateProductRequest,
            catalog_handler::CategoryRequest,
            catalog_handler::UpdateCategoryRequest,
            cart_handler::AddCartItemRequest,
            cart_handler::UpdateCartItemRequest,
            wishlist_handler::WishlistItemRequest,
            wishlist_handler::WishlistStatus,
            order_handler::OrderItemRequest,
            order_handler::CreateOrderRequest,
            order_handler::SetStatusRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and login"),
        (name = "Accounts", description = "Profiles and account administration"),
        (name = "Addresses", description = "The caller's address book"),
        (name = "Catalog", description = "Products and categories"),
        (name = "Cart", description = "The caller's shopping cart"),
        (name = "Wishlist", description = "The caller's saved products"),
        (name = "Orders", description = "Checkout and order lifecycle")
    )
)]
pub struct ApiDoc;

/// JWT bearer scheme referenced as `bearer_auth`
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
