//! Domain and transport models
//!
//! `Product` is the cached entity; the request/response DTOs carry it over HTTP.

pub mod product;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use product::{Product, ProductId};
pub use requests::ProductRequest;
pub use responses::{ErrorResponse, HealthResponse, StatsResponse};
