//! Repository layer - Data access abstraction
//!
//! One repository per aggregate. Saves replace the whole document
//! (last write wins).

mod account_repository;
mod cart_repository;
pub(crate) mod entities;
mod order_repository;
mod product_repository;

pub use account_repository::{AccountRepository, AccountStore};
pub use cart_repository::{CartRepository, CartStore, WishlistRepository, WishlistStore};
pub use order_repository::{OrderRepository, OrderStore};
pub use product_repository::{CategoryRepository, CategoryStore, ProductRepository, ProductStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use account_repository::MockAccountRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use cart_repository::{MockCartRepository, MockWishlistRepository};
#[cfg(any(test, feature = "test-utils"))]
pub use order_repository::MockOrderRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::{MockCategoryRepository, MockProductRepository};
