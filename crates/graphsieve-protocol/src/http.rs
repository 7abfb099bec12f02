//! HTTP/REST API types

use serde::{Deserialize, Serialize};

/// HTTP API endpoint paths, relative to the configured prefix unless noted
pub mod endpoints {
    /// Served at the root, outside the prefix
    pub const HEALTH: &str = "/health";
    pub const NODES_FILTER: &str = "/nodes/filter";
    pub const RELATIONSHIPS_FILTER: &str = "/relationships/filter";
    pub const NODES_FILTER_SUMMARY: &str = "/nodes/filter/summary";
    pub const RELATIONSHIPS_FILTER_SUMMARY: &str = "/relationships/filter/summary";
}

/// One page of filter results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterResponse<T> {
    /// Matches irrespective of pagination
    pub total: u64,

    /// Page size that was applied
    pub limit: i64,

    /// Offset that was applied
    pub skip: i64,

    /// Entities on this page
    pub data: Vec<T>,

    /// Human-readable list of the constraints that were compiled
    pub active_filters: Vec<String>,
}

impl<T> FilterResponse<T> {
    /// Number of entities on this page
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the page is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether more matches exist past this page
    pub fn has_more(&self) -> bool {
        let seen = self.skip.max(0) as u64 + self.data.len() as u64;
        seen < self.total
    }
}

/// Service health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: HealthStatus,

    /// Whether the database answered the probe
    pub connected: bool,

    /// Database server version, when connected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Uptime in seconds
    pub uptime_seconds: u64,
}

impl HealthResponse {
    /// Build a response from the outcome of a connectivity probe
    pub fn from_probe(version: Option<String>, uptime_seconds: u64) -> Self {
        let connected = version.is_some();
        Self {
            status: if connected {
                HealthStatus::Healthy
            } else {
                HealthStatus::Degraded
            },
            connected,
            version,
            uptime_seconds,
        }
    }
}

/// Error body returned for every failed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Short error category, e.g. `Bad Request`
    pub error: String,

    /// Stable machine-readable code
    pub error_code: String,

    /// Human-readable message
    pub message: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}

/// Documented example request served by the summary endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterExample {
    /// What the example selects
    pub description: String,

    /// Request body to POST to the filter endpoint
    pub request: serde_json::Value,

    /// Summary the request compiles to
    pub active_filters: Vec<String>,
}

/// Summary endpoint payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSummary {
    /// Filter endpoint the examples apply to
    pub endpoint: String,

    /// Operators accepted in `property_filters`
    pub operators: Vec<String>,

    /// Example requests
    pub examples: Vec<FilterExample>,
}
