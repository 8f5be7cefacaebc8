//! HTTP request handlers.

pub mod account_handler;
pub mod auth_handler;
pub mod cart_handler;
pub mod catalog_handler;
pub mod order_handler;
pub mod wishlist_handler;

pub use account_handler::account_routes;
pub use auth_handler::auth_routes;
pub use cart_handler::cart_routes;
pub use catalog_handler::{
    category_admin_routes, category_routes, product_admin_routes, product_routes,
};
pub use order_handler::order_routes;
pub use wishlist_handler::wishlist_routes;
