//! Wishlist service.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::domain::{Wishlist, WishlistView};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait WishlistService: Send + Sync {
    /// Populated wishlist; empty when the account has none yet.
    async fn get_wishlist(&self, account_id: Uuid) -> AppResult<WishlistView>;

    async fn add_product(&self, account_id: Uuid, product_id: Uuid) -> AppResult<WishlistView>;

    async fn remove_product(&self, account_id: Uuid, product_id: Uuid) -> AppResult<WishlistView>;

    async fn clear(&self, account_id: Uuid) -> AppResult<WishlistView>;

    /// Membership check that never creates a wishlist.
    async fn contains(&self, account_id: Uuid, product_id: Uuid) -> AppResult<bool>;
}

pub struct WishlistManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> WishlistManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn load_or_create(&self, account_id: Uuid) -> AppResult<Wishlist> {
        Ok(self
            .uow
            .wishlists()
            .find_by_account(account_id)
            .await?
            .unwrap_or_else(|| Wishlist::new(account_id)))
    }

    async fn view(&self, wishlist: &Wishlist) -> AppResult<WishlistView> {
        if wishlist.items.is_empty() {
            return Ok(WishlistView::empty());
        }
        let products = self
            .uow
            .products()
            .find_many(&wishlist.product_ids())
            .await?;
        Ok(WishlistView::join(wishlist, products))
    }
}

#[async_trait]
impl<U: UnitOfWork> WishlistService for WishlistManager<U> {
    async fn get_wishlist(&self, account_id: Uuid) -> AppResult<WishlistView> {
        match self.uow.wishlists().find_by_account(account_id).await? {
            Some(wishlist) => self.view(&wishlist).await,
            None => Ok(WishlistView::empty()),
        }
    }

    #[instrument(skip(self))]
    async fn add_product(&self, account_id: Uuid, product_id: Uuid) -> AppResult<WishlistView> {
        self.uow
            .products()
            .find_by_id(product_id)
            .await?
            .ok_or_not_found("Product")?;

        let mut wishlist = self.load_or_create(account_id).await?;
        wishlist.add(product_id)?;
        self.uow.wishlists().save(&wishlist).await?;
        self.view(&wishlist).await
    }

    /// Removing a product that is not listed is a no-op.
    #[instrument(skip(self))]
    async fn remove_product(&self, account_id: Uuid, product_id: Uuid) -> AppResult<WishlistView> {
        let Some(mut wishlist) = self.uow.wishlists().find_by_account(account_id).await? else {
            return Ok(WishlistView::empty());
        };

        if wishlist.remove(product_id) {
            self.uow.wishlists().save(&wishlist).await?;
        }
        self.view(&wishlist).await
    }

    async fn clear(&self, account_id: Uuid) -> AppResult<WishlistView> {
        let mut wishlist = self.load_or_create(account_id).await?;
        wishlist.clear();
        self.uow.wishlists().save(&wishlist).await?;
        Ok(WishlistView::empty())
    }

    async fn contains(&self, account_id: Uuid, product_id: Uuid) -> AppResult<bool> {
        Ok(self
            .uow
            .wishlists()
            .find_by_account(account_id)
            .await?
            .is_some_and(|wishlist| wishlist.contains(product_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::services::testing::{product, TestUnitOfWork};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_contains_without_wishlist_is_false_and_creates_nothing() {
        let mut uow = TestUnitOfWork::default();
        uow.wishlists.expect_find_by_account().returning(|_| Ok(None));
        uow.wishlists.expect_save().never();

        let service = WishlistManager::new(uow.build());
        assert!(!service
            .contains(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_first_add_creates_wishlist() {
        let account_id = Uuid::new_v4();
        let lamp = product(dec!(30));
        let product_id = lamp.id;

        let mut uow = TestUnitOfWork::default();
        let found = lamp.clone();
        uow.products
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        uow.wishlists.expect_find_by_account().returning(|_| Ok(None));
        uow.wishlists
            .expect_save()
            .withf(move |w| w.account_id == account_id && w.contains(product_id))
            .times(1)
            .returning(|_| Ok(()));
        uow.products
            .expect_find_many()
            .returning(move |_| Ok(vec![lamp.clone()]));

        let service = WishlistManager::new(uow.build());
        let view = service.add_product(account_id, product_id).await.unwrap();

        assert_eq!(view.count, 1);
        assert_eq!(view.items[0].product.id, product_id);
    }

    #[tokio::test]
    async fn test_duplicate_add_rejected() {
        let account_id = Uuid::new_v4();
        let lamp = product(dec!(30));
        let product_id = lamp.id;

        let mut existing = Wishlist::new(account_id);
        existing.add(product_id).unwrap();

        let mut uow = TestUnitOfWork::default();
        uow.products
            .expect_find_by_id()
            .returning(move |_| Ok(Some(lamp.clone())));
        uow.wishlists
            .expect_find_by_account()
            .returning(move |_| Ok(Some(existing.clone())));
        uow.wishlists.expect_save().never();

        let service = WishlistManager::new(uow.build());
        let err = service.add_product(account_id, product_id).await.unwrap_err();

        assert!(matches!(err, AppError::DuplicateItem));
    }

    #[tokio::test]
    async fn test_remove_missing_product_is_noop() {
        let account_id = Uuid::new_v4();
        let mut uow = TestUnitOfWork::default();
        uow.wishlists
            .expect_find_by_account()
            .returning(move |_| Ok(Some(Wishlist::new(account_id))));
        uow.wishlists.expect_save().never();

        let service = WishlistManager::new(uow.build());
        let view = service
            .remove_product(account_id, Uuid::new_v4())
            .await
            .unwrap();

        assert_eq!(view.count, 0);
    }

    #[tokio::test]
    async fn test_view_skips_deleted_products() {
        let account_id = Uuid::new_v4();
        let kept = product(dec!(10));
        let mut wishlist = Wishlist::new(account_id);
        wishlist.add(kept.id).unwrap();
        wishlist.add(Uuid::new_v4()).unwrap();

        let mut uow = TestUnitOfWork::default();
        uow.wishlists
            .expect_find_by_account()
            .returning(move |_| Ok(Some(wishlist.clone())));
        uow.products
            .expect_find_many()
            .returning(move |_| Ok(vec![kept.clone()]));

        let service = WishlistManager::new(uow.build());
        let view = service.get_wishlist(account_id).await.unwrap();

        assert_eq!(view.count, 1);
    }
}
