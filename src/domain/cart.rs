//! Shopping cart aggregate.
//!
//! A cart stores product references and quantities only. Names and prices
//! are joined from the live catalog each time the cart is viewed, so totals
//! follow catalog price changes until the order snapshot is taken.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::catalog::{MediaAsset, Product};
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: Uuid,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    pub id: Uuid,
    pub account_id: Uuid,
    pub items: Vec<CartItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn new(account_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            account_id,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a standalone cart from items previously embedded on the account.
    ///
    /// Repeated products are merged and zero quantities dropped.
    pub fn from_legacy(account_id: Uuid, legacy: Vec<CartItem>) -> Self {
        let mut cart = Self::new(account_id);
        for item in legacy.into_iter().filter(|item| item.quantity > 0) {
            match cart.line_mut(item.product_id) {
                Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
                None => cart.items.push(item),
            }
        }
        cart
    }

    pub fn quantity_of(&self, product_id: Uuid) -> Option<u32> {
        self.items
            .iter()
            .find(|item| item.product_id == product_id)
            .map(|item| item.quantity)
    }

    /// Add `quantity` of a product, merging into an existing line.
    pub fn add_item(&mut self, product_id: Uuid, quantity: u32) -> AppResult<()> {
        if quantity == 0 {
            return Err(AppError::validation("Quantity must be at least 1"));
        }

        match self.line_mut(product_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.items.push(CartItem {
                product_id,
                quantity,
                added_at: Utc::now(),
            }),
        }
        self.touch();
        Ok(())
    }

    /// Overwrite a line's quantity. Zero or less removes the line.
    pub fn set_item_quantity(&mut self, product_id: Uuid, quantity: i64) -> AppResult<()> {
        if self.quantity_of(product_id).is_none() {
            return Err(AppError::not_found("Product in cart"));
        }

        if quantity <= 0 {
            self.items.retain(|item| item.product_id != product_id);
        } else if let Some(line) = self.line_mut(product_id) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        self.touch();
        Ok(())
    }

    /// Remove a product's line. Returns whether anything was removed.
    pub fn remove_item(&mut self, product_id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.product_id != product_id);
        let removed = self.items.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.touch();
    }

    pub fn product_ids(&self) -> Vec<Uuid> {
        self.items.iter().map(|item| item.product_id).collect()
    }

    fn line_mut(&mut self, product_id: Uuid) -> Option<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|item| item.product_id == product_id)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Cart line joined with the current catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: Uuid,
    pub name: String,
    #[schema(value_type = String, example = "499.00")]
    pub price: Decimal,
    pub image: Option<MediaAsset>,
    pub stock: i32,
    pub quantity: u32,
    #[schema(value_type = String, example = "998.00")]
    pub subtotal: Decimal,
    pub added_at: DateTime<Utc>,
}

/// Cart as returned to clients, with derived totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub total_items: u64,
    #[schema(value_type = String, example = "998.00")]
    pub total_price: Decimal,
}

impl CartView {
    /// Join cart lines with catalog products. Lines whose product no longer
    /// exists are left out of both the items and the totals.
    pub fn join(cart: &Cart, products: &[Product]) -> Self {
        let catalog: HashMap<Uuid, &Product> = products.iter().map(|p| (p.id, p)).collect();

        let items: Vec<CartLine> = cart
            .items
            .iter()
            .filter_map(|item| {
                let product = catalog.get(&item.product_id)?;
                Some(CartLine {
                    product_id: item.product_id,
                    name: product.name.clone(),
                    price: product.price,
                    image: product.primary_image().cloned(),
                    stock: product.stock,
                    quantity: item.quantity,
                    subtotal: product.price * Decimal::from(item.quantity),
                    added_at: item.added_at,
                })
            })
            .collect();

        let total_items = items.iter().map(|line| u64::from(line.quantity)).sum();
        let total_price = items.iter().map(|line| line.subtotal).sum();

        Self {
            items,
            total_items,
            total_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::NewProduct;
    use rust_decimal_macros::dec;

    fn product(price: Decimal) -> Product {
        Product::new(NewProduct {
            name: "Mug".into(),
            description: String::new(),
            price,
            category_id: None,
            stock: 10,
        })
        .unwrap()
    }

    #[test]
    fn test_add_merges_quantities() {
        let mut cart = Cart::new(Uuid::new_v4());
        let p = Uuid::new_v4();

        cart.add_item(p, 2).unwrap();
        cart.add_item(p, 3).unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.quantity_of(p), Some(5));
    }

    #[test]
    fn test_add_zero_rejected() {
        let mut cart = Cart::new(Uuid::new_v4());
        assert!(matches!(
            cart.add_item(Uuid::new_v4(), 0),
            Err(AppError::Validation(_))
        ));
        assert!(cart.items.is_empty());
    }

    #[test]
    fn test_set_quantity_overwrites_and_zero_removes() {
        let mut cart = Cart::new(Uuid::new_v4());
        let p = Uuid::new_v4();
        cart.add_item(p, 4).unwrap();

        cart.set_item_quantity(p, 2).unwrap();
        assert_eq!(cart.quantity_of(p), Some(2));

        cart.set_item_quantity(p, 0).unwrap();
        assert_eq!(cart.quantity_of(p), None);
    }

    #[test]
    fn test_set_quantity_on_missing_line_is_not_found() {
        let mut cart = Cart::new(Uuid::new_v4());
        let err = cart.set_item_quantity(Uuid::new_v4(), 3).unwrap_err();
        assert_eq!(err.to_string(), "Product in cart not found");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = Cart::new(Uuid::new_v4());
        let p = Uuid::new_v4();
        cart.add_item(p, 1).unwrap();

        assert!(cart.remove_item(p));
        assert!(!cart.remove_item(p));
    }

    #[test]
    fn test_legacy_items_are_merged() {
        let p = Uuid::new_v4();
        let q = Uuid::new_v4();
        let at = Utc::now();
        let legacy = vec![
            CartItem { product_id: p, quantity: 1, added_at: at },
            CartItem { product_id: q, quantity: 0, added_at: at },
            CartItem { product_id: p, quantity: 2, added_at: at },
        ];

        let cart = Cart::from_legacy(Uuid::new_v4(), legacy);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.quantity_of(p), Some(3));
    }

    #[test]
    fn test_view_uses_live_prices_and_skips_missing_products() {
        let mug = product(dec!(250));
        let mut cart = Cart::new(Uuid::new_v4());
        cart.add_item(mug.id, 3).unwrap();
        cart.add_item(Uuid::new_v4(), 7).unwrap();

        let view = CartView::join(&cart, &[mug.clone()]);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.total_items, 3);
        assert_eq!(view.total_price, dec!(750));

        let mut repriced = mug;
        repriced.price = dec!(300);
        let view = CartView::join(&cart, &[repriced]);
        assert_eq!(view.total_price, dec!(900));
    }

    #[test]
    fn test_add_add_remove_scenario() {
        let p1 = product(dec!(99.5));
        let mut cart = Cart::new(Uuid::new_v4());

        cart.add_item(p1.id, 2).unwrap();
        assert_eq!(cart.quantity_of(p1.id), Some(2));
        cart.add_item(p1.id, 3).unwrap();
        assert_eq!(cart.quantity_of(p1.id), Some(5));
        cart.remove_item(p1.id);

        let view = CartView::join(&cart, &[p1]);
        assert!(view.items.is_empty());
        assert_eq!(view.total_items, 0);
        assert_eq!(view.total_price, Decimal::ZERO);
    }
}
