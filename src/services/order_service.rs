//! Order service - checkout and the payment/delivery lifecycle.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::{
    Order, OrderChange, OrderDraft, OrderItem, OrderPolicy, OrderStatus, PaymentMethod,
    PaymentResult, Requester, ShippingAddress, ShippingRates,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

/// One requested line at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: Uuid,
    pub quantity: u32,
}

/// Checkout input as submitted by the buyer.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub items: Vec<OrderLine>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub items_price: Decimal,
    pub shipping_price: Decimal,
    pub total_price: Decimal,
}

#[async_trait]
pub trait OrderService: Send + Sync {
    async fn create_order(&self, account_id: Uuid, order: NewOrder) -> AppResult<Order>;

    /// Owner or admin.
    async fn get_order(&self, requester: Requester, id: Uuid) -> AppResult<Order>;

    async fn list_mine(&self, account_id: Uuid) -> AppResult<Vec<Order>>;

    async fn list_all(
        &self,
        requester: Requester,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)>;

    /// Owner only.
    async fn mark_paid(
        &self,
        requester: Requester,
        id: Uuid,
        payment: PaymentResult,
    ) -> AppResult<Order>;

    async fn mark_delivered(&self, requester: Requester, id: Uuid) -> AppResult<Order>;

    async fn set_status(
        &self,
        requester: Requester,
        id: Uuid,
        status: OrderStatus,
    ) -> AppResult<Order>;

    /// Owner or admin. A delivered order cannot be cancelled.
    async fn cancel(&self, requester: Requester, id: Uuid) -> AppResult<Order>;
}

pub struct OrderManager<U: UnitOfWork> {
    uow: Arc<U>,
    rates: ShippingRates,
    policy: OrderPolicy,
}

impl<U: UnitOfWork> OrderManager<U> {
    pub fn new(uow: Arc<U>, rates: ShippingRates, policy: OrderPolicy) -> Self {
        Self { uow, rates, policy }
    }

    async fn load(&self, id: Uuid) -> AppResult<Order> {
        self.uow
            .orders()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Order")
    }

    /// Capture name, thumbnail and current price for each requested line.
    async fn snapshot(&self, lines: &[OrderLine]) -> AppResult<Vec<OrderItem>> {
        let ids: Vec<Uuid> = lines.iter().map(|line| line.product_id).collect();
        let catalog: HashMap<Uuid, _> = self
            .uow
            .products()
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|product| (product.id, product))
            .collect();

        lines
            .iter()
            .map(|line| {
                let product = catalog
                    .get(&line.product_id)
                    .ok_or_else(|| AppError::not_found("Product"))?;
                Ok(OrderItem {
                    product_id: product.id,
                    name: product.name.clone(),
                    image: product.primary_image().map(|image| image.url.clone()),
                    price: product.price,
                    quantity: line.quantity,
                })
            })
            .collect()
    }

    async fn clear_cart(&self, account_id: Uuid) -> AppResult<()> {
        if let Some(mut cart) = self.uow.carts().find_by_account(account_id).await? {
            cart.clear();
            self.uow.carts().save(&cart).await?;
        }
        Ok(())
    }

    /// Apply a change to a loaded order and persist it. A rejected change
    /// leaves the stored order untouched.
    async fn transition(&self, mut order: Order, change: OrderChange) -> AppResult<Order> {
        order.apply(change, &self.policy, Utc::now())?;
        self.uow.orders().save(&order).await?;
        info!(
            order_id = %order.id,
            status = %order.order_status,
            is_paid = order.is_paid,
            is_delivered = order.is_delivered,
            "Order updated"
        );
        Ok(order)
    }
}

#[async_trait]
impl<U: UnitOfWork> OrderService for OrderManager<U> {
    #[instrument(skip(self, order), fields(lines = order.items.len()))]
    async fn create_order(&self, account_id: Uuid, order: NewOrder) -> AppResult<Order> {
        if order.items.is_empty() {
            return Err(AppError::validation("Order must contain at least one item"));
        }

        let items = self.snapshot(&order.items).await?;
        let draft = OrderDraft {
            items,
            shipping_address: order.shipping_address,
            payment_method: order.payment_method,
            items_price: order.items_price,
            shipping_price: order.shipping_price,
            total_price: order.total_price,
        };
        let placed = Order::place(account_id, draft, &self.rates, &self.policy)?;
        self.uow.orders().save(&placed).await?;

        if self.policy.clear_cart_on_checkout {
            self.clear_cart(account_id).await?;
        }

        info!(order_id = %placed.id, account_id = %account_id, "Order placed");
        Ok(placed)
    }

    async fn get_order(&self, requester: Requester, id: Uuid) -> AppResult<Order> {
        let order = self.load(id).await?;
        requester.require_owner_or_admin(order.account_id)?;
        Ok(order)
    }

    async fn list_mine(&self, account_id: Uuid) -> AppResult<Vec<Order>> {
        self.uow.orders().list_by_account(account_id).await
    }

    async fn list_all(
        &self,
        requester: Requester,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)> {
        requester.require_admin()?;
        self.uow.orders().list(params).await
    }

    #[instrument(skip(self, payment))]
    async fn mark_paid(
        &self,
        requester: Requester,
        id: Uuid,
        payment: PaymentResult,
    ) -> AppResult<Order> {
        let order = self.load(id).await?;
        if !order.is_owned_by(requester.id) {
            return Err(AppError::Forbidden);
        }
        self.transition(order, OrderChange::MarkPaid(payment)).await
    }

    #[instrument(skip(self))]
    async fn mark_delivered(&self, requester: Requester, id: Uuid) -> AppResult<Order> {
        requester.require_admin()?;
        let order = self.load(id).await?;
        self.transition(order, OrderChange::MarkDelivered).await
    }

    #[instrument(skip(self))]
    async fn set_status(
        &self,
        requester: Requester,
        id: Uuid,
        status: OrderStatus,
    ) -> AppResult<Order> {
        requester.require_admin()?;
        let order = self.load(id).await?;
        self.transition(order, OrderChange::SetStatus(status)).await
    }

    #[instrument(skip(self))]
    async fn cancel(&self, requester: Requester, id: Uuid) -> AppResult<Order> {
        let order = self.load(id).await?;
        requester.require_owner_or_admin(order.account_id)?;
        self.transition(order, OrderChange::Cancel).await
    }
}
