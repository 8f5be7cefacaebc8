//! HTTP surface: routers, handlers, middleware and OpenAPI.
//!
//! Catalog reads and `/auth` are public. Everything else requires a bearer
//! token; admin checks happen in the services.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
