//! Account service - profile, avatar, admin management and address book.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::MEDIA_FOLDER_AVATARS;
use crate::domain::{Account, Address, AddressInput, AddressPatch, ProfileUpdate, Requester};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::media::{self, MediaStore};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

#[async_trait]
pub trait AccountService: Send + Sync {
    async fn get_account(&self, id: Uuid) -> AppResult<Account>;

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> AppResult<Account>;

    /// Upload a new avatar; the previous one is deleted best-effort.
    async fn set_avatar(&self, id: Uuid, bytes: Vec<u8>, file_name: String) -> AppResult<Account>;

    async fn list_accounts(
        &self,
        requester: Requester,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Account>, u64)>;

    async fn approve_account(&self, requester: Requester, id: Uuid) -> AppResult<Account>;

    /// Admin-only; an admin cannot delete their own account.
    async fn delete_account(&self, requester: Requester, id: Uuid) -> AppResult<()>;

    async fn list_addresses(&self, id: Uuid) -> AppResult<Vec<Address>>;

    async fn add_address(&self, id: Uuid, input: AddressInput) -> AppResult<Vec<Address>>;

    async fn update_address(
        &self,
        id: Uuid,
        address_id: Uuid,
        patch: AddressPatch,
    ) -> AppResult<Vec<Address>>;

    async fn remove_address(&self, id: Uuid, address_id: Uuid) -> AppResult<Vec<Address>>;

    async fn set_default_address(&self, id: Uuid, address_id: Uuid) -> AppResult<Vec<Address>>;
}

pub struct AccountManager<U: UnitOfWork> {
    uow: Arc<U>,
    media: Arc<dyn MediaStore>,
}

impl<U: UnitOfWork> AccountManager<U> {
    pub fn new(uow: Arc<U>, media: Arc<dyn MediaStore>) -> Self {
        Self { uow, media }
    }

    async fn load(&self, id: Uuid) -> AppResult<Account> {
        self.uow
            .accounts()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Account")
    }

    /// Load, mutate and save an account, returning its address book.
    async fn edit_addresses<F>(&self, id: Uuid, edit: F) -> AppResult<Vec<Address>>
    where
        F: FnOnce(&mut Account) -> AppResult<()> + Send,
    {
        let mut account = self.load(id).await?;
        edit(&mut account)?;
        self.uow.accounts().save(&account).await?;
        Ok(account.addresses)
    }
}

#[async_trait]
impl<U: UnitOfWork> AccountService for AccountManager<U> {
    async fn get_account(&self, id: Uuid) -> AppResult<Account> {
        self.load(id).await
    }

    #[instrument(skip(self, update))]
    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> AppResult<Account> {
        let mut account = self.load(id).await?;
        account.update_profile(update);
        self.uow.accounts().save(&account).await?;
        Ok(account)
    }

    #[instrument(skip(self, bytes))]
    async fn set_avatar(&self, id: Uuid, bytes: Vec<u8>, file_name: String) -> AppResult<Account> {
        let mut account = self.load(id).await?;
        let uploaded = self
            .media
            .upload(bytes, MEDIA_FOLDER_AVATARS, &file_name)
            .await?;

        let previous = account.replace_avatar(uploaded);
        self.uow.accounts().save(&account).await?;

        if let Some(previous) = previous {
            media::release(self.media.as_ref(), &previous).await;
        }
        info!(account_id = %id, "Avatar replaced");
        Ok(account)
    }

    async fn list_accounts(
        &self,
        requester: Requester,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Account>, u64)> {
        requester.require_admin()?;
        self.uow.accounts().list(params).await
    }

    #[instrument(skip(self))]
    async fn approve_account(&self, requester: Requester, id: Uuid) -> AppResult<Account> {
        requester.require_admin()?;
        let mut account = self.load(id).await?;
        account.approve();
        self.uow.accounts().save(&account).await?;
        info!(account_id = %id, "Account approved");
        Ok(account)
    }

    #[instrument(skip(self))]
    async fn delete_account(&self, requester: Requester, id: Uuid) -> AppResult<()> {
        requester.require_admin()?;
        if requester.id == id {
            return Err(AppError::validation("You cannot delete your own account"));
        }

        let account = self.load(id).await?;
        self.uow.accounts().delete(id).await?;

        if let Some(avatar) = &account.profile.avatar {
            media::release(self.media.as_ref(), avatar).await;
        }
        info!(account_id = %id, "Account deleted");
        Ok(())
    }

    async fn list_addresses(&self, id: Uuid) -> AppResult<Vec<Address>> {
        Ok(self.load(id).await?.addresses)
    }

    async fn add_address(&self, id: Uuid, input: AddressInput) -> AppResult<Vec<Address>> {
        self.edit_addresses(id, |account| account.add_address(input).map(|_| ()))
            .await
    }

    async fn update_address(
        &self,
        id: Uuid,
        address_id: Uuid,
        patch: AddressPatch,
    ) -> AppResult<Vec<Address>> {
        self.edit_addresses(id, |account| account.update_address(address_id, patch))
            .await
    }

    async fn remove_address(&self, id: Uuid, address_id: Uuid) -> AppResult<Vec<Address>> {
        self.edit_addresses(id, |account| account.remove_address(address_id))
            .await
    }

    async fn set_default_address(&self, id: Uuid, address_id: Uuid) -> AppResult<Vec<Address>> {
        self.edit_addresses(id, |account| account.set_default_address(address_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MediaAsset, Role};
    use crate::infra::MockMediaStore;
    use crate::services::testing::{account, TestUnitOfWork};

    fn address(city: &str, is_default: bool) -> AddressInput {
        AddressInput {
            address: "Road 5, House 9".into(),
            city: city.into(),
            is_default,
            ..AddressInput::default()
        }
    }

    fn asset(id: &str) -> MediaAsset {
        MediaAsset {
            public_id: id.into(),
            url: format!("https://cdn.example.com/{}.png", id),
        }
    }

    #[tokio::test]
    async fn test_add_default_address_clears_other_defaults() {
        let mut stored = account(Role::User);
        stored.add_address(address("Dhaka", true)).unwrap();
        let id = stored.id;

        let mut uow = TestUnitOfWork::default();
        uow.accounts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        uow.accounts
            .expect_save()
            .withf(|a| a.addresses.iter().filter(|x| x.is_default).count() == 1)
            .times(1)
            .returning(|_| Ok(()));

        let service = AccountManager::new(uow.build(), Arc::new(MockMediaStore::new()));
        let addresses = service
            .add_address(id, address("Rajshahi", true))
            .await
            .unwrap();

        assert_eq!(addresses.len(), 2);
        assert!(!addresses[0].is_default);
        assert!(addresses[1].is_default);
    }

    #[tokio::test]
    async fn test_invalid_address_is_not_saved() {
        let stored = account(Role::User);
        let id = stored.id;

        let mut uow = TestUnitOfWork::default();
        uow.accounts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        uow.accounts.expect_save().never();

        let service = AccountManager::new(uow.build(), Arc::new(MockMediaStore::new()));
        let err = service.add_address(id, address("", false)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_avatar_replacement_survives_cleanup_failure() {
        let mut stored = account(Role::User);
        stored.replace_avatar(asset("old"));
        let id = stored.id;

        let mut uow = TestUnitOfWork::default();
        uow.accounts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        uow.accounts
            .expect_save()
            .withf(|a| a.profile.avatar.as_ref().map(|m| m.public_id.as_str()) == Some("new"))
            .times(1)
            .returning(|_| Ok(()));

        let mut media = MockMediaStore::new();
        media
            .expect_upload()
            .withf(|_, folder, _| folder == MEDIA_FOLDER_AVATARS)
            .returning(|_, _, _| Ok(asset("new")));
        media
            .expect_delete()
            .withf(|public_id| public_id == "old")
            .times(1)
            .returning(|_| Err(AppError::internal("media host down")));

        let service = AccountManager::new(uow.build(), Arc::new(media));
        let account = service
            .set_avatar(id, vec![1, 2, 3], "me.png".into())
            .await
            .unwrap();

        assert_eq!(account.profile.avatar.unwrap().public_id, "new");
    }

    #[tokio::test]
    async fn test_admin_cannot_delete_self() {
        let admin = Requester::new(Uuid::new_v4(), Role::Admin);
        let service = AccountManager::new(
            TestUnitOfWork::default().build(),
            Arc::new(MockMediaStore::new()),
        );

        let err = service.delete_account(admin, admin.id).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_listing_accounts_requires_admin() {
        let service = AccountManager::new(
            TestUnitOfWork::default().build(),
            Arc::new(MockMediaStore::new()),
        );

        let err = service
            .list_accounts(
                Requester::new(Uuid::new_v4(), Role::User),
                &PaginationParams::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }
}
