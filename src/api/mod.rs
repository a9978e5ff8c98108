//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! All endpoints live under `/api/v1/`; see [`routes::create_router`] for
//! the full table.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
