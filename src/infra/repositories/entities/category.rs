//! Category database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::document::{decode, encode};
use crate::domain::Category;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub image: Option<Json>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Category {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        let image = match model.image {
            None | Some(Json::Null) => None,
            Some(document) => Some(decode(document, "category image")?),
        };

        Ok(Category {
            id: model.id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            image,
            created_at: model.created_at,
        })
    }
}

pub fn active_model(category: &Category) -> AppResult<ActiveModel> {
    let image = match &category.image {
        Some(image) => Some(encode(image)?),
        None => None,
    };

    Ok(ActiveModel {
        id: Set(category.id),
        name: Set(category.name.clone()),
        slug: Set(category.slug.clone()),
        description: Set(category.description.clone()),
        image: Set(image),
        created_at: Set(category.created_at),
    })
}
