//! Wishlist aggregate: an ordered set of product references per account.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::catalog::Product;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub product_id: Uuid,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wishlist {
    pub id: Uuid,
    pub account_id: Uuid,
    pub items: Vec<WishlistItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wishlist {
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

    pub fn contains(&self, product_id: Uuid) -> bool {
        self.items.iter().any(|item| item.product_id == product_id)
    }

    pub fn add(&mut self, product_id: Uuid) -> AppResult<()> {
        if self.contains(product_id) {
            return Err(AppError::DuplicateItem);
        }
        let now = Utc::now();
        self.items.push(WishlistItem {
            product_id,
            added_at: now,
        });
        self.updated_at = now;
        Ok(())
    }

    /// Returns whether the product was present.
    pub fn remove(&mut self, product_id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.product_id != product_id);
        let removed = before != self.items.len();
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.updated_at = Utc::now();
    }

    pub fn product_ids(&self) -> Vec<Uuid> {
        self.items.iter().map(|item| item.product_id).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub product: Product,
    pub added_at: DateTime<Utc>,
}

/// Wishlist as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WishlistView {
    pub items: Vec<WishlistEntry>,
    /// Entries whose product is still in the catalog. Stored references to
    /// deleted products are not counted, so this can be lower than the
    /// number of saved items.
    pub count: usize,
}

impl WishlistView {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            count: 0,
        }
    }

    /// Populate product references; entries for deleted products are skipped.
    pub fn join(wishlist: &Wishlist, products: Vec<Product>) -> Self {
        let catalog: HashMap<Uuid, Product> = products.into_iter().map(|p| (p.id, p)).collect();

        let items: Vec<WishlistEntry> = wishlist
            .items
            .iter()
            .filter_map(|item| {
                let product = catalog.get(&item.product_id)?.clone();
                Some(WishlistEntry {
                    product,
                    added_at: item.added_at,
                })
            })
            .collect();

        Self {
            count: items.len(),
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_add_fails() {
        let mut wishlist = Wishlist::new(Uuid::new_v4());
        let p = Uuid::new_v4();

        wishlist.add(p).unwrap();
        assert!(matches!(wishlist.add(p), Err(AppError::DuplicateItem)));
        assert_eq!(wishlist.items.len(), 1);
    }

    #[test]
    fn test_contains_tracks_add_and_remove() {
        let mut wishlist = Wishlist::new(Uuid::new_v4());
        let p = Uuid::new_v4();

        assert!(!wishlist.contains(p));
        wishlist.add(p).unwrap();
        assert!(wishlist.contains(p));
        assert!(wishlist.remove(p));
        assert!(!wishlist.contains(p));
        assert!(!wishlist.remove(p));
    }

    #[test]
    fn test_view_count_excludes_deleted_products() {
        let mut wishlist = Wishlist::new(Uuid::new_v4());
        let kept = Product::new(crate::domain::NewProduct {
            name: "Kettle".into(),
            description: "1.7L".into(),
            price: rust_decimal::Decimal::from(1200),
            category_id: None,
            stock: 4,
        })
        .unwrap();
        wishlist.add(kept.id).unwrap();
        wishlist.add(Uuid::new_v4()).unwrap();

        let view = WishlistView::join(&wishlist, vec![kept.clone()]);

        assert_eq!(wishlist.items.len(), 2);
        assert_eq!(view.count, 1);
        assert_eq!(view.items[0].product.id, kept.id);
    }
}
