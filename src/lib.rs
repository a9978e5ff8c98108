//! shardcache - a sharded in-memory cache server
//!
//! Provides a key-value cache with per-key TTL expiration, probabilistic
//! garbage collection, JSON snapshot persistence, and an HTTP API.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{Cache, Ttl};
pub use config::Config;
pub use tasks::spawn_gc_task;
