//! Application state shared by every handler.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database, MediaClient};
use crate::services::{
    AccountService, AuthService, CartService, CatalogService, OrderService, ServiceContainer,
    Services, WishlistService,
};

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub account_service: Arc<dyn AccountService>,
    pub catalog_service: Arc<dyn CatalogService>,
    pub cart_service: Arc<dyn CartService>,
    pub wishlist_service: Arc<dyn WishlistService>,
    pub order_service: Arc<dyn OrderService>,
    /// Redis cache (account profiles, rate limits)
    pub cache: Arc<Cache>,
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire the database-backed services and the HTTP media client.
    pub fn from_config(database: Arc<Database>, cache: Arc<Cache>, config: Config) -> Self {
        let media = Arc::new(MediaClient::new(config.media.clone()));
        let services = Services::from_connection(database.connection().clone(), config, media);
        Self::new(&services, cache, database)
    }

    /// Build state from any service container.
    pub fn new(services: &dyn ServiceContainer, cache: Arc<Cache>, database: Arc<Database>) -> Self {
        Self {
            auth_service: services.auth(),
            account_service: services.accounts(),
            catalog_service: services.catalog(),
            cart_service: services.carts(),
            wishlist_service: services.wishlists(),
            order_service: services.orders(),
            cache,
            database,
        }
    }
}
