//! Domain layer - Core business entities and logic
//!
//! Accounts and their address books, the catalog, carts, wishlists and
//! orders. Nothing here touches storage or HTTP.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod credential;
pub mod money;
pub mod order;
pub mod shipping;
pub mod wishlist;

pub use account::{
    Account, AccountResponse, Address, AddressInput, AddressKind, AddressPatch, Gender, Profile,
    ProfileUpdate, Requester, Role,
};
pub use cart::{Cart, CartItem, CartLine, CartView};
pub use catalog::{
    slugify, Category, MediaAsset, NewProduct, Product, ProductFilter, ProductPatch,
};
pub use credential::Credential;
pub use order::{
    Order, OrderChange, OrderDraft, OrderItem, OrderPolicy, OrderStatus, PaymentMethod,
    PaymentResult, ShippingAddress,
};
pub use money::validate_money;
pub use shipping::ShippingRates;
pub use wishlist::{Wishlist, WishlistEntry, WishlistItem, WishlistView};
