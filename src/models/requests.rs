//! Request DTOs for the product API
//!
//! Defines the structure of incoming HTTP request bodies.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Maximum product name length in characters
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum product description length in characters
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Request body for create (POST /products) and update (PUT /products/:id)
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    /// Defaults to 0 when omitted
    #[serde(default)]
    pub quantity: i32,
}

impl ProductRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("Name cannot be empty".to_string());
        }
        if self.name.chars().count() > MAX_NAME_LENGTH {
            return Some(format!(
                "Name exceeds maximum length of {} characters",
                MAX_NAME_LENGTH
            ));
        }
        if let Some(description) = &self.description {
            if description.chars().count() > MAX_DESCRIPTION_LENGTH {
                return Some(format!(
                    "Description exceeds maximum length of {} characters",
                    MAX_DESCRIPTION_LENGTH
                ));
            }
        }
        if self.price < Decimal::ZERO {
            return Some("Price cannot be negative".to_string());
        }
        if self.quantity < 0 {
            return Some("Quantity cannot be negative".to_string());
        }
        None
    }
}
