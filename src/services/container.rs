//! Service container - one handle to every application service.

use std::sync::Arc;

use super::{
    AccountManager, AccountService, AuthService, Authenticator, CartManager, CartService,
    CatalogManager, CatalogService, OrderManager, OrderService, WishlistManager, WishlistService,
};
use crate::config::Config;
use crate::infra::{MediaStore, Persistence};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn accounts(&self) -> Arc<dyn AccountService>;

    fn catalog(&self) -> Arc<dyn CatalogService>;

    fn carts(&self) -> Arc<dyn CartService>;

    fn wishlists(&self) -> Arc<dyn WishlistService>;

    fn orders(&self) -> Arc<dyn OrderService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth: Arc<dyn AuthService>,
    accounts: Arc<dyn AccountService>,
    catalog: Arc<dyn CatalogService>,
    carts: Arc<dyn CartService>,
    wishlists: Arc<dyn WishlistService>,
    orders: Arc<dyn OrderService>,
}

impl Services {
    /// Wire every service over a single database-backed unit of work.
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        config: Config,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let rates = config.shipping.clone();
        let policy = config.orders;

        Self {
            accounts: Arc::new(AccountManager::new(uow.clone(), media.clone())),
            catalog: Arc::new(CatalogManager::new(uow.clone(), media)),
            carts: Arc::new(CartManager::new(uow.clone())),
            wishlists: Arc::new(WishlistManager::new(uow.clone())),
            orders: Arc::new(OrderManager::new(uow.clone(), rates, policy)),
            auth: Arc::new(Authenticator::new(uow, config)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn accounts(&self) -> Arc<dyn AccountService> {
        self.accounts.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog.clone()
    }

    fn carts(&self) -> Arc<dyn CartService> {
        self.carts.clone()
    }

    fn wishlists(&self) -> Arc<dyn WishlistService> {
        self.wishlists.clone()
    }

    fn orders(&self) -> Arc<dyn OrderService> {
        self.orders.clone()
    }
}
