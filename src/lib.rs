//! Product Cache - cache-aside data access for products
//!
//! Reads consult a cache backend (in-process or Redis) before the store;
//! writes keep the cache from diverging from the store.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use service::{CollectionPolicy, ProductCacheService};
pub use tasks::spawn_cleanup_task;
