//! Shared request/response types.

mod pagination;

pub use pagination::{
    PaginatedAccounts, PaginatedOrders, PaginatedProducts, Paginated, PaginationMeta,
    PaginationParams,
};
