//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure. Each one is a
//! trait with a `*Manager` implementation generic over the `UnitOfWork`,
//! so tests can swap in mocked repositories.

mod account_service;
mod auth_service;
mod cart_service;
mod catalog_service;
pub mod container;
mod order_service;
mod wishlist_service;

#[cfg(test)]
pub(crate) mod testing;

pub use container::{ServiceContainer, Services};

pub use account_service::{AccountManager, AccountService};
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use cart_service::{CartManager, CartService};
pub use catalog_service::{CatalogManager, CatalogService};
pub use order_service::{NewOrder, OrderLine, OrderManager, OrderService};
pub use wishlist_service::{WishlistManager, WishlistService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
