//! Unit of Work: one place to reach every repository.
//!
//! Each operation is a single read-modify-write per document; nothing here
//! spans documents in a transaction.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{
    AccountRepository, AccountStore, CartRepository, CartStore, CategoryRepository,
    CategoryStore, OrderRepository, OrderStore, ProductRepository, ProductStore,
    WishlistRepository, WishlistStore,
};

/// Repository access for services.
pub trait UnitOfWork: Send + Sync {
    fn accounts(&self) -> Arc<dyn AccountRepository>;

    fn products(&self) -> Arc<dyn ProductRepository>;

    fn categories(&self) -> Arc<dyn CategoryRepository>;

    fn carts(&self) -> Arc<dyn CartRepository>;

    fn wishlists(&self) -> Arc<dyn WishlistRepository>;

    fn orders(&self) -> Arc<dyn OrderRepository>;
}

/// Database-backed UnitOfWork
pub struct Persistence {
    accounts: Arc<AccountStore>,
    products: Arc<ProductStore>,
    categories: Arc<CategoryStore>,
    carts: Arc<CartStore>,
    wishlists: Arc<WishlistStore>,
    orders: Arc<OrderStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            accounts: Arc::new(AccountStore::new(db.clone())),
            products: Arc::new(ProductStore::new(db.clone())),
            categories: Arc::new(CategoryStore::new(db.clone())),
            carts: Arc::new(CartStore::new(db.clone())),
            wishlists: Arc::new(WishlistStore::new(db.clone())),
            orders: Arc::new(OrderStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn accounts(&self) -> Arc<dyn AccountRepository> {
        self.accounts.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.categories.clone()
    }

    fn carts(&self) -> Arc<dyn CartRepository> {
        self.carts.clone()
    }

    fn wishlists(&self) -> Arc<dyn WishlistRepository> {
        self.wishlists.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.orders.clone()
    }
}
