//! Core graph types for GraphSieve
//!
//! Defines the traversal direction and the entities handed back to callers.

use crate::property::Properties;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a relationship traversal, relative to the source node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Outgoing relationship (->)
    #[default]
    Outgoing,
    /// Incoming relationship (<-)
    Incoming,
    /// Either direction (--)
    #[serde(alias = "undirected")]
    Both,
}

impl Direction {
    /// Wire name of this direction
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Outgoing => "outgoing",
            Direction::Incoming => "incoming",
            Direction::Both => "both",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A matched node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeResult {
    /// Database identity
    pub id: i64,

    /// Labels carried by the node
    pub labels: Vec<String>,

    /// Node properties
    pub properties: Properties,
}

/// A matched relationship together with its endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipResult {
    /// Database identity
    pub id: i64,

    /// Relationship type
    #[serde(rename = "type")]
    pub rel_type: String,

    /// Node the traversal started from
    pub source: NodeResult,

    /// Node the traversal ended at
    pub target: NodeResult,

    /// Relationship properties
    pub properties: Properties,
}

/// Either kind of result entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultEntity {
    Relationship(RelationshipResult),
    Node(NodeResult),
}

impl From<NodeResult> for ResultEntity {
    fn from(node: NodeResult) -> Self {
        ResultEntity::Node(node)
    }
}

impl From<RelationshipResult> for ResultEntity {
    fn from(rel: RelationshipResult) -> Self {
        ResultEntity::Relationship(rel)
    }
}
