//! Catalog entities: products, categories and the media references they carry.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::money::validate_money;
use crate::errors::{AppError, AppResult};

/// Reference to a file kept on the media host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaAsset {
    #[schema(example = "storefront/products/abc123")]
    pub public_id: String,
    #[schema(example = "https://media.example.com/storefront/products/abc123.jpg")]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[schema(value_type = String, example = "499.00")]
    pub price: Decimal,
    pub category_id: Option<Uuid>,
    pub stock: i32,
    pub images: Vec<MediaAsset>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a product
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: Option<Uuid>,
    pub stock: i32,
}

/// Partial product update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category_id: Option<Uuid>,
    pub stock: Option<i32>,
}

/// Query options for product listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category_id: Option<Uuid>,
    pub search: Option<String>,
}

impl Product {
    pub fn new(input: NewProduct) -> AppResult<Self> {
        validate_price_and_stock(input.price, input.stock)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            price: input.price,
            category_id: input.category_id,
            stock: input.stock,
            images: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, patch: ProductPatch) -> AppResult<()> {
        let price = patch.price.unwrap_or(self.price);
        let stock = patch.stock.unwrap_or(self.stock);
        validate_price_and_stock(price, stock)?;

        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if patch.category_id.is_some() {
            self.category_id = patch.category_id;
        }
        self.price = price;
        self.stock = stock;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// First image, used as the thumbnail in carts and order snapshots.
    pub fn primary_image(&self) -> Option<&MediaAsset> {
        self.images.first()
    }

    pub fn add_image(&mut self, image: MediaAsset) {
        self.images.push(image);
        self.updated_at = Utc::now();
    }

    /// Detach an image by public id, returning it for cleanup.
    pub fn remove_image(&mut self, public_id: &str) -> AppResult<MediaAsset> {
        let index = self
            .images
            .iter()
            .position(|image| image.public_id == public_id)
            .ok_or_else(|| AppError::not_found("Image"))?;
        self.updated_at = Utc::now();
        Ok(self.images.remove(index))
    }
}

fn validate_price_and_stock(price: Decimal, stock: i32) -> AppResult<()> {
    validate_money("Price", price)?;
    if stock < 0 {
        return Err(AppError::validation("Stock cannot be negative"));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[schema(example = "home-appliances")]
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<MediaAsset>,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: String, description: Option<String>) -> AppResult<Self> {
        let slug = slugify(&name);
        if slug.is_empty() {
            return Err(AppError::validation("Category name is required"));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            slug,
            description,
            image: None,
            created_at: Utc::now(),
        })
    }

    pub fn rename(&mut self, name: String) -> AppResult<()> {
        let slug = slugify(&name);
        if slug.is_empty() {
            return Err(AppError::validation("Category name is required"));
        }
        self.name = name;
        self.slug = slug;
        Ok(())
    }
}

/// Lowercase ASCII slug with single dashes between words.
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product() -> Product {
        Product::new(NewProduct {
            name: "Kettle".into(),
            description: "1.7L".into(),
            price: dec!(1200),
            category_id: None,
            stock: 4,
        })
        .unwrap()
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Home & Kitchen"), "home-kitchen");
        assert_eq!(slugify("  Men's  T-Shirts "), "men-s-t-shirts");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut product = product();
        let err = product
            .apply(ProductPatch {
                price: Some(dec!(-1)),
                ..ProductPatch::default()
            })
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(product.price, dec!(1200));
    }

    #[test]
    fn test_price_must_fit_money_column() {
        let err = Product::new(NewProduct {
            name: "Generator".into(),
            description: "Industrial".into(),
            price: dec!(10000000000),
            category_id: None,
            stock: 1,
        })
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let mut product = product();
        assert!(product
            .apply(ProductPatch {
                price: Some(dec!(19.999)),
                ..ProductPatch::default()
            })
            .is_err());
        assert_eq!(product.price, dec!(1200));
    }

    #[test]
    fn test_remove_image_returns_detached_asset() {
        let mut product = product();
        product.add_image(MediaAsset {
            public_id: "a".into(),
            url: "https://cdn/a.jpg".into(),
        });
        product.add_image(MediaAsset {
            public_id: "b".into(),
            url: "https://cdn/b.jpg".into(),
        });

        let removed = product.remove_image("a").unwrap();
        assert_eq!(removed.public_id, "a");
        assert_eq!(product.primary_image().unwrap().public_id, "b");
        assert!(matches!(
            product.remove_image("a"),
            Err(AppError::NotFound(_))
        ));
    }
}
