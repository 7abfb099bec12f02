//! GraphSieve Graph Access
//!
//! Executes compiled filter queries against a graph database.
//!
//! # Overview
//!
//! - `session` - The `GraphSession` seam and the raw `Record` type
//! - `neo4j` - `GraphSession` over the Neo4j HTTP transactional API
//! - `mapper` - Raw records to node and relationship results
//! - `service` - `FilterService`, one filter request end to end

pub mod mapper;
pub mod neo4j;
pub mod service;
pub mod session;

pub use mapper::{map_node, map_relationship, map_total};
pub use neo4j::{Neo4jConfig, Neo4jSession};
pub use service::{FilterService, DEFAULT_QUERY_TIMEOUT};
pub use session::{GraphSession, Record, ServerInfo, StaticSession};
