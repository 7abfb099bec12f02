//! Filter compiler
//!
//! Combines the label test and the property predicates of one filter into a
//! single boolean fragment. An empty fragment means "no constraint".

use crate::predicate::{self, ParamNamer, Parameters};
use crate::summary::names_line;
use graphsieve_core::{LogicalOperator, NodeFilter, PropertyPredicate, PropertyValue, Result};

/// Boolean fragment with its bindings and summary lines
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledFilter {
    /// Boolean fragment; empty when the filter constrains nothing
    pub clause: String,

    /// Parameters referenced by `clause`
    pub parameters: Parameters,

    /// One line per applied constraint, in source order
    pub summary: Vec<String>,
}

impl CompiledFilter {
    /// Returns true if no constraint was compiled
    pub fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }

    /// Fold another fragment in with AND, skipping empty fragments
    pub fn and(mut self, other: CompiledFilter) -> CompiledFilter {
        let clause = join_clauses(
            &[self.clause.as_str(), other.clause.as_str()],
            LogicalOperator::And,
        );
        self.clause = clause;
        self.parameters.extend(other.parameters);
        self.summary.extend(other.summary);
        self
    }
}

/// Join non-empty fragments with `op`.
///
/// More than one fragment is parenthesized so the result can be combined
/// with any other fragment without precedence surprises.
pub fn join_clauses(clauses: &[&str], op: LogicalOperator) -> String {
    let parts: Vec<&str> = clauses.iter().copied().filter(|c| !c.is_empty()).collect();
    match parts.len() {
        0 => String::new(),
        1 => parts[0].to_string(),
        _ => format!("({})", parts.join(&format!(" {} ", op.keyword()))),
    }
}

/// Compile a node filter against `variable`.
///
/// `summary_prefix` is prepended to every summary line.
pub fn compile_node_filter(
    filter: &NodeFilter,
    variable: &str,
    summary_prefix: &str,
    namer: &mut ParamNamer,
) -> Result<CompiledFilter> {
    let mut compiled = CompiledFilter::default();

    if !filter.node_types.is_empty() {
        let param = namer.next_name();
        compiled.clause = format!(
            "any(label IN labels({}) WHERE label IN ${})",
            variable, param
        );
        compiled.parameters.insert(
            param,
            PropertyValue::List(filter.node_types.iter().cloned().map(PropertyValue::String).collect()),
        );
        compiled
            .summary
            .push(format!("{}{}", summary_prefix, names_line("Type", &filter.node_types)));
    }

    let predicates = compile_predicates(
        &filter.property_filters,
        filter.logical_operator,
        variable,
        summary_prefix,
        namer,
    )?;

    // Type and property constraints always combine with AND.
    Ok(compiled.and(predicates))
}

/// Compile a predicate group joined by `logical_operator`
pub fn compile_predicates(
    predicates: &[PropertyPredicate],
    logical_operator: LogicalOperator,
    variable: &str,
    summary_prefix: &str,
    namer: &mut ParamNamer,
) -> Result<CompiledFilter> {
    let mut clauses = Vec::with_capacity(predicates.len());
    let mut compiled = CompiledFilter::default();

    for p in predicates {
        let c = predicate::compile(p, variable, namer)?;
        compiled.parameters.insert(c.param_name, c.value);
        compiled.summary.push(format!("{}{}", summary_prefix, c.summary));
        clauses.push(c.clause);
    }

    let refs: Vec<&str> = clauses.iter().map(String::as_str).collect();
    compiled.clause = join_clauses(&refs, logical_operator);
    Ok(compiled)
}
