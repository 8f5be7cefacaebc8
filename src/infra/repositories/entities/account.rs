//! Account database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::address_document;
use super::document::{decode, encode};
use crate::domain::{Account, CartItem, Profile, Role};
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_approved: bool,
    #[sea_orm(column_type = "JsonBinary")]
    pub profile: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub addresses: Json,
    /// Cart items embedded by older releases; cleared once migrated.
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub legacy_cart: Option<Json>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Decode the embedded legacy cart, treating an empty array as absent.
    pub fn legacy_cart_items(&self) -> AppResult<Option<Vec<CartItem>>> {
        match &self.legacy_cart {
            None | Some(Json::Null) => Ok(None),
            Some(document) => {
                let items: Vec<CartItem> = decode(document.clone(), "legacy cart")?;
                Ok((!items.is_empty()).then_some(items))
            }
        }
    }
}

impl TryFrom<Model> for Account {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        let profile: Profile = match model.profile {
            Json::Null => Profile::default(),
            document => decode(document, "profile")?,
        };

        Ok(Account {
            id: model.id,
            name: model.name,
            email: model.email,
            password_hash: model.password_hash,
            role: Role::from(model.role.as_str()),
            is_approved: model.is_approved,
            profile,
            addresses: address_document::account_addresses(&model.addresses)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Active model carrying every column except `legacy_cart`, which only the
/// legacy cart migration touches.
pub fn active_model(account: &Account) -> AppResult<ActiveModel> {
    Ok(ActiveModel {
        id: Set(account.id),
        name: Set(account.name.clone()),
        email: Set(account.email.clone()),
        password_hash: Set(account.password_hash.clone()),
        role: Set(account.role.to_string()),
        is_approved: Set(account.is_approved),
        profile: Set(encode(&account.profile)?),
        addresses: Set(encode(&account.addresses)?),
        created_at: Set(account.created_at),
        updated_at: Set(account.updated_at),
        ..Default::default()
    })
}
