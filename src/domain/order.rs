//! Order aggregate and its payment/delivery state machine.
//!
//! Status edges: `Processing -> {Shipped, Cancelled}`,
//! `Shipped -> {Delivered, Cancelled}`; `Delivered` and `Cancelled` are
//! terminal. The `is_paid`/`is_delivered` flags move independently of the
//! status label, except that delivery always implies payment and the
//! `Delivered` status. Every mutation goes through [`Order::apply`], which
//! finishes with [`Order::reconcile`] to restore that coupling.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::money::{checked_sum, validate_money};
use super::shipping::ShippingRates;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OrderStatus {
    #[default]
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether `next` is one of the listed edges out of this status.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Processing, OrderStatus::Shipped)
                | (OrderStatus::Processing, OrderStatus::Cancelled)
                | (OrderStatus::Shipped, OrderStatus::Delivered)
                | (OrderStatus::Shipped, OrderStatus::Cancelled)
        )
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Processing" => Ok(OrderStatus::Processing),
            "Shipped" => Ok(OrderStatus::Shipped),
            "Delivered" => Ok(OrderStatus::Delivered),
            "Cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(AppError::validation(format!("Unknown order status: {}", other))),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line item captured from the catalog when the order is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: Uuid,
    pub name: String,
    pub image: Option<String>,
    #[schema(value_type = String, example = "499.00")]
    pub price: Decimal,
    pub quantity: u32,
}

/// Canonical shipping address carried by an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub address: String,
    /// Region used for the shipping table.
    pub city: Option<String>,
    pub landmark: Option<String>,
    pub district: Option<String>,
    pub division: Option<String>,
    pub zip_code: Option<String>,
    pub phone: Option<String>,
}

/// Confirmation returned by the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    pub id: String,
    pub status: String,
    pub update_time: Option<String>,
    pub email_address: Option<String>,
}

/// Order toggles for behaviour that is off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderPolicy {
    /// Reject orders where `items_price + shipping_price != total_price`.
    pub verify_totals: bool,
    /// Empty the buyer's cart once the order is stored.
    pub clear_cart_on_checkout: bool,
    /// Only accept the listed status edges in `SetStatus`.
    pub strict_transitions: bool,
}

/// Checkout request after catalog snapshotting.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub items_price: Decimal,
    pub shipping_price: Decimal,
    pub total_price: Decimal,
}

/// A mutation requested on an existing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderChange {
    MarkPaid(PaymentResult),
    MarkDelivered,
    SetStatus(OrderStatus),
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub account_id: Uuid,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    #[schema(value_type = String)]
    pub items_price: Decimal,
    #[schema(value_type = String)]
    pub shipping_price: Decimal,
    #[schema(value_type = String)]
    pub total_price: Decimal,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_result: Option<PaymentResult>,
    pub is_delivered: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    pub order_status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Validate a draft and create a `Processing`, unpaid order from it.
    pub fn place(
        account_id: Uuid,
        draft: OrderDraft,
        rates: &ShippingRates,
        policy: &OrderPolicy,
    ) -> AppResult<Self> {
        if draft.items.is_empty() {
            return Err(AppError::validation("Order must contain at least one item"));
        }
        if draft.items.iter().any(|item| item.quantity == 0) {
            return Err(AppError::validation("Item quantity must be at least 1"));
        }
        if draft.shipping_address.address.trim().is_empty() {
            return Err(AppError::validation("Shipping address is required"));
        }

        validate_money("Items price", draft.items_price)?;
        validate_money("Shipping price", draft.shipping_price)?;
        validate_money("Total price", draft.total_price)?;

        rates.verify(draft.shipping_address.city.as_deref(), draft.shipping_price)?;

        if policy.verify_totals {
            let expected = checked_sum("Total price", draft.items_price, draft.shipping_price)?;
            if draft.total_price != expected {
                return Err(AppError::InvalidTotals { expected });
            }
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            account_id,
            items: draft.items,
            shipping_address: draft.shipping_address,
            payment_method: draft.payment_method,
            items_price: draft.items_price,
            shipping_price: draft.shipping_price,
            total_price: draft.total_price,
            is_paid: false,
            paid_at: None,
            payment_result: None,
            is_delivered: false,
            delivered_at: None,
            order_status: OrderStatus::Processing,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_owned_by(&self, account_id: Uuid) -> bool {
        self.account_id == account_id
    }

    /// Apply one change. On error the order is left untouched.
    pub fn apply(
        &mut self,
        change: OrderChange,
        policy: &OrderPolicy,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        match change {
            OrderChange::MarkPaid(result) => {
                self.is_paid = true;
                self.paid_at = Some(now);
                self.payment_result = Some(result);
            }
            OrderChange::MarkDelivered => {
                self.is_delivered = true;
            }
            OrderChange::SetStatus(next) => {
                if self.is_delivered && next != OrderStatus::Delivered {
                    return Err(AppError::AlreadyDelivered);
                }
                if policy.strict_transitions
                    && next != self.order_status
                    && !self.order_status.can_transition_to(next)
                {
                    return Err(AppError::validation(format!(
                        "Cannot move order from {} to {}",
                        self.order_status, next
                    )));
                }
                self.order_status = next;
            }
            OrderChange::Cancel => {
                if self.is_delivered {
                    return Err(AppError::AlreadyDelivered);
                }
                self.order_status = OrderStatus::Cancelled;
            }
        }

        self.reconcile(now);
        self.updated_at = now;
        Ok(())
    }

    /// Restore the delivery coupling: a `Delivered` status marks the order
    /// delivered, and a delivered order is paid, stamped, and `Delivered`.
    pub fn reconcile(&mut self, now: DateTime<Utc>) {
        if self.order_status == OrderStatus::Delivered {
            self.is_delivered = true;
        }
        if self.is_delivered {
            self.is_paid = true;
            self.paid_at.get_or_insert(now);
            self.delivered_at.get_or_insert(now);
            self.order_status = OrderStatus::Delivered;
        }
    }
}
