//! Test doubles shared by the service tests.

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{Account, MediaAsset, NewProduct, Product, Role};
use crate::infra::repositories::{
    AccountRepository, CartRepository, CategoryRepository, MockAccountRepository,
    MockCartRepository, MockCategoryRepository, MockOrderRepository, MockProductRepository,
    MockWishlistRepository, OrderRepository, ProductRepository, WishlistRepository,
};
use crate::infra::UnitOfWork;

/// UnitOfWork over mockall repositories. Any repository left at its default
/// has no expectations and panics if a service touches it.
#[derive(Default)]
pub struct TestUnitOfWork {
    pub accounts: MockAccountRepository,
    pub products: MockProductRepository,
    pub categories: MockCategoryRepository,
    pub carts: MockCartRepository,
    pub wishlists: MockWishlistRepository,
    pub orders: MockOrderRepository,
}

impl TestUnitOfWork {
    pub fn build(self) -> Arc<MockedUnitOfWork> {
        Arc::new(MockedUnitOfWork {
            accounts: Arc::new(self.accounts),
            products: Arc::new(self.products),
            categories: Arc::new(self.categories),
            carts: Arc::new(self.carts),
            wishlists: Arc::new(self.wishlists),
            orders: Arc::new(self.orders),
        })
    }
}

/// `UnitOfWork` view of a configured `TestUnitOfWork`.
pub struct MockedUnitOfWork {
    accounts: Arc<MockAccountRepository>,
    products: Arc<MockProductRepository>,
    categories: Arc<MockCategoryRepository>,
    carts: Arc<MockCartRepository>,
    wishlists: Arc<MockWishlistRepository>,
    orders: Arc<MockOrderRepository>,
}

impl UnitOfWork for MockedUnitOfWork {
    fn accounts(&self) -> Arc<dyn AccountRepository> {
        self.accounts.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.categories.clone()
    }

    fn carts(&self) -> Arc<dyn CartRepository> {
        self.carts.clone()
    }

    fn wishlists(&self) -> Arc<dyn WishlistRepository> {
        self.wishlists.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.orders.clone()
    }
}

pub fn account(role: Role) -> Account {
    let mut account = Account::new(
        "Test Buyer".to_string(),
        format!("{}@example.com", Uuid::new_v4()),
        "hashed".to_string(),
    );
    account.role = role;
    account
}

pub fn product(price: Decimal) -> Product {
    let mut product = Product::new(NewProduct {
        name: "Desk Lamp".to_string(),
        description: "LED".to_string(),
        price,
        category_id: None,
        stock: 12,
    })
    .expect("valid product");
    product.images.push(MediaAsset {
        public_id: format!("storefront/products/{}", product.id),
        url: "https://cdn.example.com/lamp.jpg".to_string(),
    });
    product
}
