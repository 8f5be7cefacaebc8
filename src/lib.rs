//! Storefront API - an e-commerce REST backend.
//!
//! Accounts with address books, a product catalog, per-account carts and
//! wishlists, and orders with a payment/delivery state machine.
//!
//! # Architecture Layers
//!
//! - **cli** / **commands**: `serve` and `migrate`
//! - **config**: environment configuration and constants
//! - **domain**: entities and their invariants, no I/O
//! - **services**: use cases over a Unit of Work
//! - **infra**: Postgres (sea-orm), Redis, media host client
//! - **api**: axum handlers, middleware, routes and OpenAPI
//! - **types**: pagination
//! - **errors**: `AppError` and its HTTP mapping
//!
//! ```bash
//! storefront-api migrate up
//! storefront-api serve --port 3000
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

pub use api::AppState;
pub use config::Config;
pub use domain::{Account, Cart, Order, Product, Role, Wishlist};
pub use errors::{AppError, AppResult};
pub use infra::Cache;
