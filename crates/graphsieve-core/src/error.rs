//! Error types for GraphSieve
//!
//! One hierarchy covers the whole request path: validation of the filter
//! shape, compilation, database round trips and record mapping.

use thiserror::Error;

/// The main error type for GraphSieve operations
#[derive(Error, Debug)]
pub enum Error {
    // ========== Validation Errors ==========
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid predicate on '{property}': {reason}")]
    InvalidPredicate { property: String, reason: String },

    #[error("Invalid depth range: min_depth {min} / max_depth {max}")]
    DepthRange { min: u32, max: u32 },

    #[error("Pagination out of range: {0}")]
    PaginationRange(String),

    #[error("At least one filter constraint must be provided")]
    EmptyFilterSet,

    // ========== Internal Contract Errors ==========
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    // ========== Database Errors ==========
    #[error("Database unavailable: {0}")]
    DatabaseUnavailable(String),

    #[error("Query execution failed ({code}): {message}")]
    QueryExecution { code: String, message: String },

    // ========== Serialization Errors ==========
    #[error("Serialization error: {0}")]
    Serialization(String),

    // ========== IO Errors ==========
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ========== Configuration Errors ==========
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for GraphSieve operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns true if the caller sent a malformed filter
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::InvalidPredicate { .. }
                | Error::DepthRange { .. }
                | Error::PaginationRange(_)
                | Error::EmptyFilterSet
        )
    }

    /// Returns true if this error means the compiler, schema or driver
    /// disagree with each other. These are defects, not caller mistakes.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedOperator(_) | Error::MalformedRecord(_) | Error::QueryExecution { .. }
        )
    }

    /// Returns true if the database could not be reached in time
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::DatabaseUnavailable(_))
    }

    /// Stable machine-readable code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::InvalidPredicate { .. } => "INVALID_PREDICATE",
            Error::DepthRange { .. } => "INVALID_DEPTH_RANGE",
            Error::PaginationRange(_) => "PAGINATION_RANGE",
            Error::EmptyFilterSet => "EMPTY_FILTER_SET",
            Error::UnsupportedOperator(_) => "UNSUPPORTED_OPERATOR",
            Error::MalformedRecord(_) => "MALFORMED_RECORD",
            Error::DatabaseUnavailable(_) => "DATABASE_UNAVAILABLE",
            Error::QueryExecution { .. } => "QUERY_EXECUTION_FAILED",
            Error::Serialization(_) => "SERIALIZATION_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
