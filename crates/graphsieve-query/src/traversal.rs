//! Traversal compiler
//!
//! Emits the `MATCH` pattern for a relationship traversal. Relationship
//! types and hop bounds are structural and live in the pattern; property
//! predicates go into the boolean clause.

use crate::filter::{self, CompiledFilter};
use crate::predicate::{quote_identifier, ParamNamer};
use crate::summary::names_line;
use graphsieve_core::{Direction, RelationshipFilter, Result};

/// Variable bound to the source node
pub const SOURCE_VAR: &str = "n";
/// Variable bound to the (last) relationship
pub const REL_VAR: &str = "r";
/// Variable bound to the target node
pub const TARGET_VAR: &str = "m";
/// Path variable used by variable-length traversals
pub const PATH_VAR: &str = "p";

const HOP_VAR: &str = "rel";

/// Compiled traversal shape
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTraversal {
    /// Pattern for the `MATCH` clause
    pub pattern: String,

    /// Relationship property predicates, plus their bindings and summary
    pub predicate: CompiledFilter,

    /// Whether the pattern spans more than a fixed single hop
    pub variable_length: bool,

    /// Whether zero-hop paths can match (`min_depth == 0`)
    pub allows_zero_hops: bool,
}

/// Compile the traversal for `filter`.
///
/// Without a filter any single relationship in either direction matches.
pub fn compile(filter: Option<&RelationshipFilter>, namer: &mut ParamNamer) -> Result<CompiledTraversal> {
    let Some(filter) = filter else {
        return Ok(CompiledTraversal {
            pattern: format!("({})-[{}]-({})", SOURCE_VAR, REL_VAR, TARGET_VAR),
            predicate: CompiledFilter::default(),
            variable_length: false,
            allows_zero_hops: false,
        });
    };

    let (left, right) = arrows(filter.direction);
    let types = type_alternation(&filter.relationship_types);
    let mut summary = Vec::new();

    if !filter.relationship_types.is_empty() {
        summary.push(names_line("Relationship", &filter.relationship_types));
    }
    if filter.direction != Direction::Both {
        summary.push(format!("Direction: {}", filter.direction));
    }

    let (pattern, mut predicate) = if filter.is_single_hop() {
        let pattern = format!(
            "({}){}[{}{}]{}({})",
            SOURCE_VAR, left, REL_VAR, types, right, TARGET_VAR
        );
        let predicate = filter::compile_predicates(
            &filter.property_filters,
            filter.logical_operator,
            REL_VAR,
            "",
            namer,
        )?;
        (pattern, predicate)
    } else {
        summary.push(format!("Depth: {}", depth_text(filter.min_depth, filter.max_depth)));
        let pattern = format!(
            "{} = ({}){}[{}{}]{}({})",
            PATH_VAR,
            SOURCE_VAR,
            left,
            types,
            hop_range(filter.min_depth, filter.max_depth),
            right,
            TARGET_VAR
        );
        let mut predicate = filter::compile_predicates(
            &filter.property_filters,
            filter.logical_operator,
            HOP_VAR,
            "",
            namer,
        )?;
        if !predicate.is_empty() {
            // Every hop on the path must satisfy the relationship predicates.
            predicate.clause = format!(
                "all({} IN relationships({}) WHERE {})",
                HOP_VAR, PATH_VAR, predicate.clause
            );
        }
        (pattern, predicate)
    };

    summary.append(&mut predicate.summary);
    predicate.summary = summary;

    Ok(CompiledTraversal {
        pattern,
        predicate,
        variable_length: !filter.is_single_hop(),
        allows_zero_hops: filter.min_depth == 0,
    })
}

fn arrows(direction: Direction) -> (&'static str, &'static str) {
    match direction {
        Direction::Outgoing => ("-", "->"),
        Direction::Incoming => ("<-", "-"),
        Direction::Both => ("-", "-"),
    }
}

fn type_alternation(types: &[String]) -> String {
    if types.is_empty() {
        return String::new();
    }
    let quoted: Vec<String> = types.iter().map(|t| quote_identifier(t)).collect();
    format!(":{}", quoted.join("|"))
}

fn hop_range(min: u32, max: u32) -> String {
    format!("*{}", depth_text(min, max))
}

fn depth_text(min: u32, max: u32) -> String {
    if min == max {
        min.to_string()
    } else {
        format!("{}..{}", min, max)
    }
}
