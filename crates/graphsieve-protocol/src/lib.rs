//! GraphSieve Protocol Types
//!
//! Wire-level message types shared by the server and the database client.
//!
//! # Protocols
//!
//! - **HTTP**: REST API served to filter clients
//! - **Transactional**: Neo4j HTTP API spoken to the database

pub mod http;
pub mod transactional;

pub use http::{
    endpoints, ErrorBody, FilterExample, FilterResponse, FilterSummary, HealthResponse,
    HealthStatus,
};
pub use transactional::{CommitRequest, CommitResponse, Discovery, ServerError};
