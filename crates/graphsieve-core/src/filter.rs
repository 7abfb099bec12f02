//! Filter request model
//!
//! The declarative shape callers submit: per-property predicates grouped
//! into node and relationship filters, plus free-text search and paging.

use crate::error::{Error, Result};
use crate::property::PropertyValue;
use crate::types::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Page size used when the caller does not send a `limit`
pub const DEFAULT_PAGE_SIZE: i64 = 100;

/// Comparison, text, membership and pattern operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorKind {
    #[serde(rename = "=", alias = "==")]
    Equal,
    #[serde(rename = "!=", alias = "<>")]
    NotEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = "CONTAINS")]
    Contains,
    #[serde(rename = "STARTS WITH")]
    StartsWith,
    #[serde(rename = "ENDS WITH")]
    EndsWith,
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "NOT IN")]
    NotIn,
    #[serde(rename = "=~")]
    RegexMatch,
}

impl OperatorKind {
    /// Every operator, in declaration order
    pub const ALL: [OperatorKind; 12] = [
        OperatorKind::Equal,
        OperatorKind::NotEqual,
        OperatorKind::GreaterThan,
        OperatorKind::GreaterOrEqual,
        OperatorKind::LessThan,
        OperatorKind::LessOrEqual,
        OperatorKind::Contains,
        OperatorKind::StartsWith,
        OperatorKind::EndsWith,
        OperatorKind::In,
        OperatorKind::NotIn,
        OperatorKind::RegexMatch,
    ];

    /// Canonical wire symbol, also used in filter summaries
    pub fn symbol(self) -> &'static str {
        match self {
            OperatorKind::Equal => "=",
            OperatorKind::NotEqual => "!=",
            OperatorKind::GreaterThan => ">",
            OperatorKind::GreaterOrEqual => ">=",
            OperatorKind::LessThan => "<",
            OperatorKind::LessOrEqual => "<=",
            OperatorKind::Contains => "CONTAINS",
            OperatorKind::StartsWith => "STARTS WITH",
            OperatorKind::EndsWith => "ENDS WITH",
            OperatorKind::In => "IN",
            OperatorKind::NotIn => "NOT IN",
            OperatorKind::RegexMatch => "=~",
        }
    }

    /// Returns true for the ordering comparisons (`>`, `>=`, `<`, `<=`)
    pub fn is_range(self) -> bool {
        matches!(
            self,
            OperatorKind::GreaterThan
                | OperatorKind::GreaterOrEqual
                | OperatorKind::LessThan
                | OperatorKind::LessOrEqual
        )
    }
}

impl FromStr for OperatorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
        match normalized.as_str() {
            "==" => Ok(OperatorKind::Equal),
            "<>" => Ok(OperatorKind::NotEqual),
            other => OperatorKind::ALL
                .into_iter()
                .find(|op| op.symbol() == other)
                .ok_or_else(|| Error::UnsupportedOperator(s.to_string())),
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// How the predicates of one filter combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

impl LogicalOperator {
    /// Cypher keyword for this combinator
    pub fn keyword(self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
        }
    }
}

/// A single property/operator/value test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyPredicate {
    /// Property to test
    pub property_name: String,

    /// Comparison operator
    pub operator: OperatorKind,

    /// Value to compare against; a list for `IN` / `NOT IN`
    pub value: PropertyValue,
}

impl PropertyPredicate {
    /// Create a predicate
    pub fn new<N: Into<String>, V: Into<PropertyValue>>(
        property_name: N,
        operator: OperatorKind,
        value: V,
    ) -> Self {
        Self {
            property_name: property_name.into(),
            operator,
            value: value.into(),
        }
    }
}

/// Constraints on nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeFilter {
    /// Labels, OR'd together
    pub node_types: Vec<String>,

    /// Property predicates, combined with `logical_operator`
    pub property_filters: Vec<PropertyPredicate>,

    /// Combinator for `property_filters`
    pub logical_operator: LogicalOperator,
}

impl NodeFilter {
    /// Returns true if this filter constrains nothing
    pub fn is_empty(&self) -> bool {
        self.node_types.is_empty() && self.property_filters.is_empty()
    }
}

/// Constraints on a relationship traversal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationshipFilter {
    /// Relationship types, OR'd together
    pub relationship_types: Vec<String>,

    /// Traversal direction relative to the source node
    pub direction: Direction,

    /// Minimum hop count
    pub min_depth: u32,

    /// Maximum hop count
    pub max_depth: u32,

    /// Property predicates, combined with `logical_operator`
    pub property_filters: Vec<PropertyPredicate>,

    /// Combinator for `property_filters`
    pub logical_operator: LogicalOperator,
}

impl Default for RelationshipFilter {
    fn default() -> Self {
        Self {
            relationship_types: Vec::new(),
            direction: Direction::Outgoing,
            min_depth: 1,
            max_depth: 1,
            property_filters: Vec::new(),
            logical_operator: LogicalOperator::And,
        }
    }
}

impl RelationshipFilter {
    /// Returns true if the traversal is exactly one hop
    pub fn is_single_hop(&self) -> bool {
        self.min_depth == 1 && self.max_depth == 1
    }
}

/// Bounds a request must respect before it is compiled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLimits {
    /// Largest accepted `limit`
    pub max_page_size: i64,

    /// Largest accepted `max_depth`
    pub max_depth: u32,
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self {
            max_page_size: 1000,
            max_depth: 10,
        }
    }
}

/// Complete filter request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRequest {
    /// Constraints on the matched (or source) node
    #[serde(default)]
    pub node_filter: Option<NodeFilter>,

    /// Traversal constraints; only used by relationship queries
    #[serde(default)]
    pub relationship_filter: Option<RelationshipFilter>,

    /// Constraints on the far end of a traversal
    #[serde(default)]
    pub target_node_filter: Option<NodeFilter>,

    /// Free-text search across labels and string properties
    #[serde(default)]
    pub search_query: Option<String>,

    /// Page size
    #[serde(default = "default_limit")]
    pub limit: i64,

    /// Rows to skip
    #[serde(default)]
    pub skip: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for FilterRequest {
    fn default() -> Self {
        Self {
            node_filter: None,
            relationship_filter: None,
            target_node_filter: None,
            search_query: None,
            limit: DEFAULT_PAGE_SIZE,
            skip: 0,
        }
    }
}

impl FilterRequest {
    /// The search term, if present and not blank
    pub fn search_term(&self) -> Option<&str> {
        self.search_query
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Check the request shape against `limits`.
    ///
    /// Runs before any compilation so a rejected request never yields
    /// partial query text.
    pub fn validate(&self, limits: &RequestLimits) -> Result<()> {
        self.validate_nodes(limits)?;

        if let Some(target) = &self.target_node_filter {
            validate_node_filter(target)?;
        }

        if let Some(rel) = &self.relationship_filter {
            if rel.min_depth > rel.max_depth || rel.max_depth == 0 || rel.max_depth > limits.max_depth
            {
                return Err(Error::DepthRange {
                    min: rel.min_depth,
                    max: rel.max_depth,
                });
            }
            for name in &rel.relationship_types {
                check_identifier("relationship_types", name)?;
            }
            validate_predicates(&rel.property_filters)?;
        }

        Ok(())
    }

    /// Check only what a node query reads: pagination and `node_filter`.
    ///
    /// The traversal and target filters are ignored by node queries and
    /// are not checked here.
    pub fn validate_nodes(&self, limits: &RequestLimits) -> Result<()> {
        if self.limit < 1 || self.limit > limits.max_page_size {
            return Err(Error::PaginationRange(format!(
                "limit must be between 1 and {}, got {}",
                limits.max_page_size, self.limit
            )));
        }
        if self.skip < 0 {
            return Err(Error::PaginationRange(format!(
                "skip must not be negative, got {}",
                self.skip
            )));
        }

        if let Some(filter) = &self.node_filter {
            validate_node_filter(filter)?;
        }
        Ok(())
    }
}

/// Reject a name that cannot be embedded in a backtick-quoted identifier.
///
/// Backslashes are refused because Cypher resolves `\u` escapes inside
/// quoted names, which would let a name close its own quoting.
pub fn check_identifier(field: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation(format!("{} must not contain blank names", field)));
    }
    if let Some(c) = name.chars().find(|c| *c == '\\' || c.is_control()) {
        return Err(Error::Validation(format!(
            "{} contains forbidden character {:?} in '{}'",
            field,
            c,
            name.escape_default()
        )));
    }
    Ok(())
}

fn validate_node_filter(filter: &NodeFilter) -> Result<()> {
    // labels are bound as a parameter, so only blank names are refused
    if filter.node_types.iter().any(|n| n.trim().is_empty()) {
        return Err(Error::Validation("node_types must not contain blank names".to_string()));
    }
    validate_predicates(&filter.property_filters)
}

fn validate_predicates(predicates: &[PropertyPredicate]) -> Result<()> {
    for predicate in predicates {
        check_identifier("property_name", &predicate.property_name)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operator_from_str() {
        assert_eq!("starts   with".parse::<OperatorKind>().unwrap(), OperatorKind::StartsWith);
        assert_eq!("<>".parse::<OperatorKind>().unwrap(), OperatorKind::NotEqual);
        assert!(matches!(
            "LIKE".parse::<OperatorKind>(),
            Err(Error::UnsupportedOperator(_))
        ));
        for op in OperatorKind::ALL {
            assert_eq!(op.symbol().parse::<OperatorKind>().unwrap(), op);
        }
    }

    #[test]
    fn test_request_deserialization() {
        let request: FilterRequest = serde_json::from_value(json!({
            "node_filter": {
                "node_types": ["Person"],
                "property_filters": [
                    {"property_name": "age", "operator": ">", "value": 25},
                    {"property_name": "country", "operator": "IN", "value": ["USA", "Canada"]}
                ],
                "logical_operator": "OR"
            }
        }))
        .unwrap();

        let node = request.node_filter.unwrap();
        assert_eq!(node.logical_operator, LogicalOperator::Or);
        assert_eq!(node.property_filters[0].operator, OperatorKind::GreaterThan);
        assert_eq!(node.property_filters[1].value, PropertyValue::from(vec!["USA", "Canada"]));
        assert_eq!(request.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(request.skip, 0);
    }

    #[test]
    fn test_relationship_defaults() {
        let rel: RelationshipFilter =
            serde_json::from_value(json!({"relationship_types": ["WORKS_AT"]})).unwrap();
        assert_eq!(rel.direction, Direction::Outgoing);
        assert!(rel.is_single_hop());
    }

    #[test]
    fn test_unknown_operator_rejected() {
        let result: std::result::Result<PropertyPredicate, _> = serde_json::from_value(
            json!({"property_name": "a", "operator": "LIKE", "value": "x"}),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_pagination() {
        let limits = RequestLimits::default();
        let zero = FilterRequest {
            limit: 0,
            ..Default::default()
        };
        assert!(matches!(zero.validate(&limits), Err(Error::PaginationRange(_))));

        let negative = FilterRequest {
            skip: -1,
            ..Default::default()
        };
        assert!(matches!(negative.validate(&limits), Err(Error::PaginationRange(_))));

        let too_large = FilterRequest {
            limit: 1001,
            ..Default::default()
        };
        assert!(too_large.validate(&limits).is_err());

        assert!(FilterRequest::default().validate(&limits).is_ok());
    }

    #[test]
    fn test_validate_depth_range() {
        let limits = RequestLimits::default();
        let inverted = FilterRequest {
            relationship_filter: Some(RelationshipFilter {
                min_depth: 3,
                max_depth: 1,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(
            inverted.validate(&limits),
            Err(Error::DepthRange { min: 3, max: 1 })
        ));

        let too_deep = FilterRequest {
            relationship_filter: Some(RelationshipFilter {
                min_depth: 1,
                max_depth: 11,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(too_deep.validate(&limits).is_err());
    }

    #[test]
    fn test_validate_blank_names() {
        let request = FilterRequest {
            node_filter: Some(NodeFilter {
                node_types: vec![" ".into()],
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(
            request.validate(&RequestLimits::default()),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_escape_sequences_in_names() {
        let limits = RequestLimits::default();
        let hostile = FilterRequest {
            node_filter: Some(NodeFilter {
                property_filters: vec![PropertyPredicate::new(
                    "x\\u0060 IS NULL OR true OR n.\\u0060y",
                    OperatorKind::Equal,
                    "a",
                )],
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(hostile.validate(&limits), Err(Error::Validation(_))));
        assert!(matches!(hostile.validate_nodes(&limits), Err(Error::Validation(_))));

        let rel_type = FilterRequest {
            relationship_filter: Some(RelationshipFilter {
                relationship_types: vec!["KNOWS\\u0060".into()],
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(rel_type.validate(&limits), Err(Error::Validation(_))));

        assert!(check_identifier("property_name", "line\nbreak").is_err());
        assert!(check_identifier("property_name", "odd`name").is_ok());
    }

    #[test]
    fn test_validate_nodes_ignores_traversal() {
        let limits = RequestLimits::default();
        let request = FilterRequest {
            relationship_filter: Some(RelationshipFilter {
                min_depth: 3,
                max_depth: 1,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(request.validate_nodes(&limits).is_ok());
        assert!(request.validate(&limits).is_err());
    }

    #[test]
    fn test_search_term_blank() {
        let request = FilterRequest {
            search_query: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(request.search_term(), None);
    }
}
