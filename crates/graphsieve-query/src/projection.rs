//! Return projections and the column names the result mapper reads back

/// Columns describing one node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeColumns {
    pub id: &'static str,
    pub labels: &'static str,
    pub properties: &'static str,
}

/// Columns describing one relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationshipColumns {
    pub id: &'static str,
    pub rel_type: &'static str,
    pub properties: &'static str,
}

/// The matched node of a node query
pub const NODE: NodeColumns = NodeColumns {
    id: "node_id",
    labels: "node_labels",
    properties: "node_properties",
};

/// Source endpoint of a relationship query
pub const SOURCE: NodeColumns = NodeColumns {
    id: "source_id",
    labels: "source_labels",
    properties: "source_properties",
};

/// Target endpoint of a relationship query
pub const TARGET: NodeColumns = NodeColumns {
    id: "target_id",
    labels: "target_labels",
    properties: "target_properties",
};

/// The matched relationship of a relationship query
pub const RELATIONSHIP: RelationshipColumns = RelationshipColumns {
    id: "rel_id",
    rel_type: "rel_type",
    properties: "rel_properties",
};

/// Single column returned by count queries
pub const TOTAL: &str = "total";

impl NodeColumns {
    /// Projection items for the node bound to `variable`
    pub fn project(&self, variable: &str) -> String {
        format!(
            "id({v}) AS {}, labels({v}) AS {}, properties({v}) AS {}",
            self.id,
            self.labels,
            self.properties,
            v = variable
        )
    }
}

impl RelationshipColumns {
    /// Projection items for the relationship bound to `variable`
    pub fn project(&self, variable: &str) -> String {
        format!(
            "id({v}) AS {}, type({v}) AS {}, properties({v}) AS {}",
            self.id,
            self.rel_type,
            self.properties,
            v = variable
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_projection() {
        assert_eq!(
            NODE.project("n"),
            "id(n) AS node_id, labels(n) AS node_labels, properties(n) AS node_properties"
        );
    }

    #[test]
    fn test_relationship_projection() {
        assert_eq!(
            RELATIONSHIP.project("r"),
            "id(r) AS rel_id, type(r) AS rel_type, properties(r) AS rel_properties"
        );
    }
}
