//! Product database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::document::{decode, encode};
use crate::domain::Product;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub category_id: Option<Uuid>,
    pub stock: i32,
    #[sea_orm(column_type = "JsonBinary")]
    pub images: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Product {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Product {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            category_id: model.category_id,
            stock: model.stock,
            images: decode(model.images, "product images")?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

pub fn active_model(product: &Product) -> AppResult<ActiveModel> {
    Ok(ActiveModel {
        id: Set(product.id),
        name: Set(product.name.clone()),
        description: Set(product.description.clone()),
        price: Set(product.price),
        category_id: Set(product.category_id),
        stock: Set(product.stock),
        images: Set(encode(&product.images)?),
        created_at: Set(product.created_at),
        updated_at: Set(product.updated_at),
    })
}
