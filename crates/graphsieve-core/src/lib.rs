//! GraphSieve Core Library
//!
//! This crate provides the fundamental types and error handling shared by
//! every GraphSieve component.
//!
//! # Overview
//!
//! GraphSieve turns declarative filter requests into parameterized
//! Cypher queries. The types here describe both sides of that translation:
//! what a caller may ask for and what comes back.
//!
//! # Modules
//!
//! - `filter` - Filter request model (predicates, node/relationship filters)
//! - `property` - Closed property value type and ordered property maps
//! - `types` - Result entities returned to callers
//! - `error` - Error types and result aliases

pub mod error;
pub mod filter;
pub mod property;
pub mod types;

pub use error::{Error, Result};
pub use filter::{
    check_identifier, FilterRequest, LogicalOperator, NodeFilter, OperatorKind, PropertyPredicate,
    RelationshipFilter, RequestLimits, DEFAULT_PAGE_SIZE,
};
pub use property::{Properties, PropertyValue};
pub use types::{Direction, NodeResult, RelationshipResult, ResultEntity};
