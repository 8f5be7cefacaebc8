//! Account repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::account::{self, ActiveModel, Entity as AccountEntity};
use crate::domain::{Account, CartItem};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;

    /// Find account by (already normalized) email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    /// Page through accounts, oldest first. Returns the page and the total count.
    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<Account>, u64)>;

    /// Insert or replace the account document.
    async fn save(&self, account: &Account) -> AppResult<()>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Cart items still embedded on the account record, if any.
    async fn legacy_cart(&self, id: Uuid) -> AppResult<Option<Vec<CartItem>>>;

    /// Drop the embedded cart after it has been migrated.
    async fn clear_legacy_cart(&self, id: Uuid) -> AppResult<()>;
}

pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        AccountEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        AccountEntity::find()
            .filter(account::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<Account>, u64)> {
        let paginator = AccountEntity::find()
            .order_by_asc(account::Column::CreatedAt)
            .paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page_index()).await?;

        let accounts = models
            .into_iter()
            .map(Account::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((accounts, total))
    }

    async fn save(&self, account: &Account) -> AppResult<()> {
        let model = account::active_model(account)?;
        if AccountEntity::find_by_id(account.id)
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

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = AccountEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("Account"));
        }
        Ok(())
    }

    async fn legacy_cart(&self, id: Uuid) -> AppResult<Option<Vec<CartItem>>> {
        match AccountEntity::find_by_id(id).one(&self.db).await? {
            Some(model) => model.legacy_cart_items(),
            None => Ok(None),
        }
    }

    async fn clear_legacy_cart(&self, id: Uuid) -> AppResult<()> {
        let model = AccountEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Account"))?;

        let mut active: ActiveModel = model.into();
        active.legacy_cart = Set(None);
        active.update(&self.db).await?;
        Ok(())
    }
}
