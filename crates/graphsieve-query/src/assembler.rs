//! Query assembler
//!
//! Top-level entry point of the compiler: validates a `FilterRequest`,
//! compiles every present constraint and assembles the final Cypher text,
//! its count companion, the parameter bindings and the active-filters
//! summary.

use crate::filter::{self, join_clauses, CompiledFilter};
use crate::predicate::{property_accessor, ParamNamer, Parameters};
use crate::projection;
use crate::traversal::{self, PATH_VAR, REL_VAR, SOURCE_VAR, TARGET_VAR};
use graphsieve_core::{
    check_identifier, Error, FilterRequest, LogicalOperator, NodeFilter, PropertyValue,
    RequestLimits, Result,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameter holding the lowercased search term
pub const SEARCH_PARAM: &str = "search";
/// Parameter holding the page offset
pub const SKIP_PARAM: &str = "skip";
/// Parameter holding the page size
pub const LIMIT_PARAM: &str = "limit";

/// What a compiled query returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryTarget {
    Nodes,
    Relationships,
}

/// Compiler policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Largest accepted page size
    pub max_page_size: i64,

    /// Largest accepted traversal depth
    pub max_depth: u32,

    /// Reject requests that carry no constraint at all
    pub require_constraint: bool,

    /// String properties searched by `search_query`; empty means every key
    pub searchable_properties: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        let limits = RequestLimits::default();
        Self {
            max_page_size: limits.max_page_size,
            max_depth: limits.max_depth,
            require_constraint: false,
            searchable_properties: Vec::new(),
        }
    }
}

impl CompilerConfig {
    /// Validation bounds derived from this configuration
    pub fn limits(&self) -> RequestLimits {
        RequestLimits {
            max_page_size: self.max_page_size,
            max_depth: self.max_depth,
        }
    }
}

/// The immutable output of one compile pass
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    target: QueryTarget,
    query_text: String,
    count_text: String,
    parameters: Parameters,
    active_filters: Vec<String>,
}

impl CompiledQuery {
    /// What the query returns
    pub fn target(&self) -> QueryTarget {
        self.target
    }

    /// Paginated data query
    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    /// Count query over the same pattern and predicate
    pub fn count_text(&self) -> &str {
        &self.count_text
    }

    /// Bindings for `query_text`
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Bindings for `count_text` (no pagination)
    pub fn count_parameters(&self) -> Parameters {
        self.parameters
            .iter()
            .filter(|(name, _)| name.as_str() != SKIP_PARAM && name.as_str() != LIMIT_PARAM)
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// One line per constraint that was actually compiled
    pub fn active_filters(&self) -> &[String] {
        &self.active_filters
    }
}

/// Compiles filter requests into Cypher
#[derive(Debug, Clone, Default)]
pub struct QueryAssembler {
    config: CompilerConfig,
}

impl QueryAssembler {
    /// Create an assembler with the given policy
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile `request` into a query returning `target` entities
    pub fn assemble(&self, request: &FilterRequest, target: QueryTarget) -> Result<CompiledQuery> {
        let limits = self.config.limits();
        match target {
            QueryTarget::Nodes => request.validate_nodes(&limits)?,
            QueryTarget::Relationships => request.validate(&limits)?,
        }
        for property in &self.config.searchable_properties {
            check_identifier("searchable_properties", property)?;
        }

        let mut namer = ParamNamer::new();
        let empty_node_filter = NodeFilter::default();

        let mut compiled = filter::compile_node_filter(
            request.node_filter.as_ref().unwrap_or(&empty_node_filter),
            SOURCE_VAR,
            "",
            &mut namer,
        )?;

        let traversal = match target {
            QueryTarget::Nodes => None,
            QueryTarget::Relationships => {
                let traversal = traversal::compile(request.relationship_filter.as_ref(), &mut namer)?;
                compiled = compiled.and(traversal.predicate.clone());
                if let Some(target_filter) = &request.target_node_filter {
                    compiled = compiled.and(filter::compile_node_filter(
                        target_filter,
                        TARGET_VAR,
                        "Target ",
                        &mut namer,
                    )?);
                }
                Some(traversal)
            }
        };

        if let Some(term) = request.search_term() {
            compiled = compiled.and(self.search_filter(term, target));
        }

        if self.config.require_constraint && compiled.summary.is_empty() {
            return Err(Error::EmptyFilterSet);
        }

        let CompiledFilter {
            clause,
            mut parameters,
            summary,
        } = compiled;

        let mut body = match &traversal {
            None => format!("MATCH ({})", SOURCE_VAR),
            Some(t) => format!("MATCH {}", t.pattern),
        };
        if !clause.is_empty() {
            body.push_str("\nWHERE ");
            body.push_str(&clause);
        }
        if let Some(t) = &traversal {
            if t.variable_length {
                body.push_str(&format!(
                    "\nWITH {}, {}, last(relationships({})) AS {}",
                    SOURCE_VAR, TARGET_VAR, PATH_VAR, REL_VAR
                ));
                if t.allows_zero_hops {
                    body.push_str(&format!("\nWHERE {} IS NOT NULL", REL_VAR));
                }
            }
        }

        let projection = match target {
            QueryTarget::Nodes => projection::NODE.project(SOURCE_VAR),
            QueryTarget::Relationships => format!(
                "{}, {}, {}",
                projection::RELATIONSHIP.project(REL_VAR),
                projection::SOURCE.project(SOURCE_VAR),
                projection::TARGET.project(TARGET_VAR)
            ),
        };

        let query_text = format!(
            "{}\nRETURN {}\nSKIP ${} LIMIT ${}",
            body, projection, SKIP_PARAM, LIMIT_PARAM
        );
        let count_text = format!("{}\nRETURN count(*) AS {}", body, projection::TOTAL);

        parameters.insert(SKIP_PARAM.to_string(), PropertyValue::Integer(request.skip));
        parameters.insert(LIMIT_PARAM.to_string(), PropertyValue::Integer(request.limit));

        debug!(
            target_kind = ?target,
            parameters = parameters.len(),
            "Compiled filter query:\n{}",
            query_text
        );

        Ok(CompiledQuery {
            target,
            query_text,
            count_text,
            parameters,
            active_filters: summary,
        })
    }

    /// Case-insensitive contains test over labels and searchable properties
    fn search_filter(&self, term: &str, target: QueryTarget) -> CompiledFilter {
        let clause = match target {
            QueryTarget::Nodes => self.search_clause(SOURCE_VAR),
            QueryTarget::Relationships => join_clauses(
                &[&self.search_clause(SOURCE_VAR), &self.search_clause(TARGET_VAR)],
                LogicalOperator::Or,
            ),
        };

        let mut parameters = Parameters::new();
        parameters.insert(SEARCH_PARAM.to_string(), PropertyValue::String(term.to_lowercase()));

        CompiledFilter {
            clause,
            parameters,
            summary: vec![format!("Search: {}", term)],
        }
    }

    fn search_clause(&self, variable: &str) -> String {
        let mut terms = vec![format!(
            "any(label IN labels({}) WHERE toLower(label) CONTAINS ${})",
            variable, SEARCH_PARAM
        )];

        if self.config.searchable_properties.is_empty() {
            terms.push(format!(
                "any(key IN keys({v}) WHERE toLower(toStringOrNull({v}[key])) CONTAINS ${})",
                SEARCH_PARAM,
                v = variable
            ));
        } else {
            for property in &self.config.searchable_properties {
                terms.push(format!(
                    "toLower(toStringOrNull({})) CONTAINS ${}",
                    property_accessor(variable, property),
                    SEARCH_PARAM
                ));
            }
        }

        let refs: Vec<&str> = terms.iter().map(String::as_str).collect();
        join_clauses(&refs, LogicalOperator::Or)
    }
}
