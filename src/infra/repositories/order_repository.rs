//! Order repository. Orders are never deleted.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use super::entities::order::{self, Entity as OrderEntity};
use crate::domain::Order;
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>>;

    /// Orders placed by one account, newest first
    async fn list_by_account(&self, account_id: Uuid) -> AppResult<Vec<Order>>;

    /// Every order, newest first, with the total count
    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<Order>, u64)>;

    async fn save(&self, order: &Order) -> AppResult<()>;
}

pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        OrderEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Order::try_from)
            .transpose()
    }

    async fn list_by_account(&self, account_id: Uuid) -> AppResult<Vec<Order>> {
        OrderEntity::find()
            .filter(order::Column::AccountId.eq(account_id))
            .order_by_desc(order::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Order::try_from)
            .collect()
    }

    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<Order>, u64)> {
        let paginator = OrderEntity::find()
            .order_by_desc(order::Column::CreatedAt)
            .paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let orders = paginator
            .fetch_page(params.page_index())
            .await?
            .into_iter()
            .map(Order::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((orders, total))
    }

    async fn save(&self, order: &Order) -> AppResult<()> {
        let model = order::active_model(order)?;
        if OrderEntity::find_by_id(order.id).one(&self.db).await?.is_some() {
            model.update(&self.db).await?;
        } else {
            model.insert(&self.db).await?;
        }
        Ok(())
    }
}
