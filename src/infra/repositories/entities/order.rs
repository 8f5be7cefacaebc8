//! Order database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::address_document;
use super::document::{decode, encode};
use crate::domain::{Order, OrderStatus, PaymentMethod};
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_id: Uuid,
    #[sea_orm(column_type = "JsonBinary")]
    pub items: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub shipping_address: Json,
    pub payment_method: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub items_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub shipping_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_price: Decimal,
    pub is_paid: bool,
    pub paid_at: Option<DateTimeUtc>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub payment_result: Option<Json>,
    pub is_delivered: bool,
    pub delivered_at: Option<DateTimeUtc>,
    pub order_status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Order {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        let payment_method = match model.payment_method.as_str() {
            "card" => PaymentMethod::Card,
            "cash" => PaymentMethod::Cash,
            other => {
                return Err(AppError::internal(format!(
                    "Unknown payment method stored on order {}: {}",
                    model.id, other
                )))
            }
        };

        let payment_result = match model.payment_result {
            None | Some(Json::Null) => None,
            Some(document) => Some(decode(document, "payment result")?),
        };

        let order_status = model.order_status.parse::<OrderStatus>().map_err(|_| {
            AppError::internal(format!(
                "Unknown status stored on order {}: {}",
                model.id, model.order_status
            ))
        })?;

        Ok(Order {
            id: model.id,
            account_id: model.account_id,
            items: decode(model.items, "order items")?,
            shipping_address: address_document::shipping_address(&model.shipping_address)?,
            payment_method,
            items_price: model.items_price,
            shipping_price: model.shipping_price,
            total_price: model.total_price,
            is_paid: model.is_paid,
            paid_at: model.paid_at,
            payment_result,
            is_delivered: model.is_delivered,
            delivered_at: model.delivered_at,
            order_status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

pub fn active_model(order: &Order) -> AppResult<ActiveModel> {
    let payment_method = match order.payment_method {
        PaymentMethod::Cash => "cash",
        PaymentMethod::Card => "card",
    };
    let payment_result = match &order.payment_result {
        Some(result) => Some(encode(result)?),
        None => None,
    };

    Ok(ActiveModel {
        id: Set(order.id),
        account_id: Set(order.account_id),
        items: Set(encode(&order.items)?),
        shipping_address: Set(encode(&order.shipping_address)?),
        payment_method: Set(payment_method.to_string()),
        items_price: Set(order.items_price),
        shipping_price: Set(order.shipping_price),
        total_price: Set(order.total_price),
        is_paid: Set(order.is_paid),
        paid_at: Set(order.paid_at),
        payment_result: Set(payment_result),
        is_delivered: Set(order.is_delivered),
        delivered_at: Set(order.delivered_at),
        order_status: Set(order.order_status.to_string()),
        created_at: Set(order.created_at),
        updated_at: Set(order.updated_at),
    })
}
