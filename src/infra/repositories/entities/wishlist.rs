//! Wishlist database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::document::{decode, encode};
use crate::domain::Wishlist;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "wishlists")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub account_id: Uuid,
    #[sea_orm(column_type = "JsonBinary")]
    pub items: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Wishlist {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Wishlist {
            id: model.id,
            account_id: model.account_id,
            items: decode(model.items, "wishlist items")?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

pub fn active_model(wishlist: &Wishlist) -> AppResult<ActiveModel> {
    Ok(ActiveModel {
        id: Set(wishlist.id),
        account_id: Set(wishlist.account_id),
        items: Set(encode(&wishlist.items)?),
        created_at: Set(wishlist.created_at),
        updated_at: Set(wishlist.updated_at),
    })
}
