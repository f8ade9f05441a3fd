//! Product entity owned by the store.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::ProductRequest;

/// Store-assigned product identity.
pub type ProductId = Uuid;

/// A product as persisted by the store and cached by the service.
///
/// The service never edits one in place: it reads, replaces or deletes
/// whole entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub quantity: i32,
}

impl Product {
    /// Builds a product from request fields under the given identity.
    pub fn from_request(id: ProductId, request: ProductRequest) -> Self {
        Self {
            id,
            name: request.name,
            description: request.description,
            price: request.price,
            quantity: request.quantity,
        }
    }
}
