//! GraphSieve - declarative filters compiled to parameterized Cypher
//!
//! This is the main library crate that re-exports all GraphSieve components.

pub use graphsieve_core as core;
pub use graphsieve_graph as graph;
pub use graphsieve_protocol as protocol;
pub use graphsieve_query as query;
pub use graphsieve_server as server;

// Re-export commonly used types
pub use graphsieve_core::{
    Direction, Error, FilterRequest, LogicalOperator, NodeFilter, NodeResult, OperatorKind,
    PropertyPredicate, PropertyValue, RelationshipFilter, RelationshipResult, Result,
};

pub use graphsieve_graph::{FilterService, GraphSession, Neo4jSession};
pub use graphsieve_protocol::FilterResponse;
pub use graphsieve_query::{CompiledQuery, CompilerConfig, QueryAssembler, QueryTarget};
