//! API Module
//!
//! HTTP handlers and routing for the product REST API.
//!
//! # Endpoints
//! - `GET /products` - List all products
//! - `GET /products/:id` - Fetch one product
//! - `POST /products` - Create a product
//! - `PUT /products/:id` - Replace a product
//! - `DELETE /products/:id` - Delete a product
//! - `GET /stats` - Cache backend statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
