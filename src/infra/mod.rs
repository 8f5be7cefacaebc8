//! Infrastructure layer - External systems integration
//!
//! - Database connection, migrations and repositories
//! - Redis cache (account profiles, rate limiting)
//! - Media host client
//! - Unit of Work for repository access

pub mod cache;
pub mod db;
pub mod media;
pub mod repositories;
pub mod unit_of_work;

pub use cache::Cache;
pub use db::{Database, Migrator};
pub use media::{MediaClient, MediaStore};
pub use repositories::{
    AccountRepository, CartRepository, CategoryRepository, OrderRepository, ProductRepository,
    WishlistRepository,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use media::MockMediaStore;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockAccountRepository, MockCartRepository, MockCategoryRepository, MockOrderRepository,
    MockProductRepository, MockWishlistRepository,
};
