//! Cart and wishlist repositories, both keyed by owning account.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use super::entities::cart::{self, Entity as CartEntity};
use super::entities::wishlist::{self, Entity as WishlistEntity};
use crate::domain::{Cart, Wishlist};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn find_by_account(&self, account_id: Uuid) -> AppResult<Option<Cart>>;

    /// Insert or replace the whole cart document.
    async fn save(&self, cart: &Cart) -> AppResult<()>;
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait WishlistRepository: Send + Sync {
    async fn find_by_account(&self, account_id: Uuid) -> AppResult<Option<Wishlist>>;

    async fn save(&self, wishlist: &Wishlist) -> AppResult<()>;
}

pub struct CartStore {
    db: DatabaseConnection,
}

impl CartStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartRepository for CartStore {
    async fn find_by_account(&self, account_id: Uuid) -> AppResult<Option<Cart>> {
        CartEntity::find()
            .filter(cart::Column::AccountId.eq(account_id))
            .one(&self.db)
            .await?
            .map(Cart::try_from)
            .transpose()
    }

    async fn save(&self, cart: &Cart) -> AppResult<()> {
        let model = cart::active_model(cart)?;
        if CartEntity::find_by_id(cart.id).one(&self.db).await?.is_some() {
            model.update(&self.db).await?;
        } else {
            model.insert(&self.db).await?;
        }
        Ok(())
    }
}

pub struct WishlistStore {
    db: DatabaseConnection,
}

impl WishlistStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WishlistRepository for WishlistStore {
    async fn find_by_account(&self, account_id: Uuid) -> AppResult<Option<Wishlist>> {
        WishlistEntity::find()
            .filter(wishlist::Column::AccountId.eq(account_id))
            .one(&self.db)
            .await?
            .map(Wishlist::try_from)
            .transpose()
    }

    async fn save(&self, wishlist: &Wishlist) -> AppResult<()> {
        let model = wishlist::active_model(wishlist)?;
        if WishlistEntity::find_by_id(wishlist.id)
            .one(&self.db)
            .await?
            .is_some()
        {
            model.update(&self.db).await?;
        } else {
            model.insert(&self.db).await?;
        }
        Ok(())
    }
}
