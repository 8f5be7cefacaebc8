//! Cart service.
//!
//! Every operation works on the caller's single cart, creating it on first
//! use. Accounts created before carts were split out may still carry their
//! items on the account document; those are moved over the first time the
//! cart is loaded.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::{Cart, CartView};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait CartService: Send + Sync {
    async fn get_cart(&self, account_id: Uuid) -> AppResult<CartView>;

    /// Add a product, merging quantities when it is already in the cart.
    async fn add_item(&self, account_id: Uuid, product_id: Uuid, quantity: u32)
        -> AppResult<CartView>;

    /// Overwrite a line's quantity; zero or less removes the line.
    async fn set_item_quantity(
        &self,
        account_id: Uuid,
        product_id: Uuid,
        quantity: i64,
    ) -> AppResult<CartView>;

    async fn remove_item(&self, account_id: Uuid, product_id: Uuid) -> AppResult<CartView>;

    async fn clear(&self, account_id: Uuid) -> AppResult<CartView>;
}

pub struct CartManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CartManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn load_or_create(&self, account_id: Uuid) -> AppResult<Cart> {
        if let Some(cart) = self.uow.carts().find_by_account(account_id).await? {
            return Ok(cart);
        }

        let legacy = self.uow.accounts().legacy_cart(account_id).await?;
        let migrated = legacy.is_some();
        let cart = match legacy {
            Some(items) => Cart::from_legacy(account_id, items),
            None => Cart::new(account_id),
        };
        self.uow.carts().save(&cart).await?;

        if migrated {
            self.uow.accounts().clear_legacy_cart(account_id).await?;
            info!(account_id = %account_id, items = cart.items.len(), "Migrated embedded cart");
        }
        Ok(cart)
    }

    async fn view(&self, cart: &Cart) -> AppResult<CartView> {
        if cart.items.is_empty() {
            return Ok(CartView::join(cart, &[]));
        }
        let products = self.uow.products().find_many(&cart.product_ids()).await?;
        Ok(CartView::join(cart, &products))
    }

    async fn save_and_view(&self, cart: &Cart) -> AppResult<CartView> {
        self.uow.carts().save(cart).await?;
        self.view(cart).await
    }
}

#[async_trait]
impl<U: UnitOfWork> CartService for CartManager<U> {
    async fn get_cart(&self, account_id: Uuid) -> AppResult<CartView> {
        let cart = self.load_or_create(account_id).await?;
        self.view(&cart).await
    }

    #[instrument(skip(self))]
    async fn add_item(
        &self,
        account_id: Uuid,
        product_id: Uuid,
        quantity: u32,
    ) -> AppResult<CartView> {
        self.uow
            .products()
            .find_by_id(product_id)
            .await?
            .ok_or_not_found("Product")?;

        let mut cart = self.load_or_create(account_id).await?;
        cart.add_item(product_id, quantity)?;
        self.save_and_view(&cart).await
    }

    #[instrument(skip(self))]
    async fn set_item_quantity(
        &self,
        account_id: Uuid,
        product_id: Uuid,
        quantity: i64,
    ) -> AppResult<CartView> {
        let mut cart = self.load_or_create(account_id).await?;
        cart.set_item_quantity(product_id, quantity)?;
        self.save_and_view(&cart).await
    }

    async fn remove_item(&self, account_id: Uuid, product_id: Uuid) -> AppResult<CartView> {
        let mut cart = self.load_or_create(account_id).await?;
        if cart.remove_item(product_id) {
            self.save_and_view(&cart).await
        } else {
            self.view(&cart).await
        }
    }

    async fn clear(&self, account_id: Uuid) -> AppResult<CartView> {
        let mut cart = self.load_or_create(account_id).await?;
        cart.clear();
        self.save_and_view(&cart).await
    }
}
