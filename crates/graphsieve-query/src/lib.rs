//! GraphSieve Query Compiler
//!
//! Translates declarative filter requests into parameterized Cypher.
//!
//! # Overview
//!
//! Compilation runs bottom-up:
//! - `operator` - Fixed table mapping each comparison operator to a template
//! - `predicate` - One property predicate to one boolean fragment and parameter
//! - `filter` - Label tests and predicate groups joined by AND/OR
//! - `traversal` - Relationship patterns, directions and hop ranges
//! - `assembler` - Full query text, count companion and active-filters summary
//!
//! User-supplied values never appear in query text. They are bound as
//! parameters named `p0`, `p1`, ... in emission order.

pub mod assembler;
pub mod filter;
pub mod operator;
pub mod predicate;
pub mod projection;
pub mod summary;
pub mod traversal;

pub use assembler::{CompiledQuery, CompilerConfig, QueryAssembler, QueryTarget};
pub use filter::CompiledFilter;
pub use operator::{lookup, Arity, OperatorSpec};
pub use predicate::{ParamNamer, Parameters};
pub use projection::{NodeColumns, RelationshipColumns};
