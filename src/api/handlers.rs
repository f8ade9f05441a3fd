//! API Handlers
//!
//! HTTP request handlers; each product endpoint maps onto one
//! `ProductCacheService` operation.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::error::Result;
use crate::models::{HealthResponse, Product, ProductId, ProductRequest, StatsResponse};
use crate::service::ProductCacheService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ProductCacheService>,
}

impl AppState {
    /// Creates a new AppState around the given service.
    pub fn new(service: ProductCacheService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Handler for GET /products
pub async fn list_products_handler(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state.service.get_collection().await?;
    Ok(Json(products))
}

/// Handler for GET /products/:id
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = state.service.get_product(id).await?;
    Ok(Json(product))
}

/// Handler for POST /products
///
/// Responds 201 with a `Location` header pointing at the new product.
pub async fn create_product_handler(
    State(state): State<AppState>,
    Json(req): Json<ProductRequest>,
) -> Result<impl IntoResponse> {
    let product = state.service.create_product(req).await?;
    let location = format!("/products/{}", product.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(product),
    ))
}

/// Handler for PUT /products/:id
pub async fn update_product_handler(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(req): Json<ProductRequest>,
) -> Result<Json<Product>> {
    let product = state.service.update_product(id, req).await?;
    Ok(Json(product))
}

/// Handler for DELETE /products/:id
pub async fn delete_product_handler(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    state.service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.service.cache_stats().await;
    Json(StatsResponse::new(state.service.backend_name(), stats))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
