//! Response DTOs for the product API
//!
//! Products themselves are serialized directly; these cover the rest.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Active cache backend ("memory" or "redis")
    pub backend: String,
    /// Backend counters, when the backend keeps any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<CacheStats>,
    /// Hit rate (hits / (hits + misses)), when counters are available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit_rate: Option<f64>,
}

impl StatsResponse {
    /// Creates a new StatsResponse from optional backend statistics
    pub fn new(backend: impl Into<String>, stats: Option<CacheStats>) -> Self {
        let hit_rate = stats.as_ref().map(CacheStats::hit_rate);
        Self {
            backend: backend.into(),
            stats,
            hit_rate,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
