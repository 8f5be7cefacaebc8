//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.
//! Embedded sequences and sub-records live in JSONB columns.

pub mod account;
pub mod address_document;
pub mod cart;
pub mod category;
mod document;
pub mod order;
pub mod product;
pub mod wishlist;
