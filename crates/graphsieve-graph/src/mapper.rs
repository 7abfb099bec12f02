//! Result mapper
//!
//! Converts raw records into result entities. A record missing any expected
//! column, or carrying one of the wrong JSON shape, is a driver contract
//! violation and fails with `MalformedRecord`.

use crate::session::Record;
use graphsieve_core::{Error, NodeResult, Properties, RelationshipResult, Result};
use graphsieve_query::projection::{self, NodeColumns};
use serde_json::Value;

/// Map a node-query record
pub fn map_node(record: &Record) -> Result<NodeResult> {
    node_from(record, projection::NODE)
}

/// Map a relationship-query record, including both endpoints
pub fn map_relationship(record: &Record) -> Result<RelationshipResult> {
    let columns = projection::RELATIONSHIP;
    Ok(RelationshipResult {
        id: integer(record, columns.id)?,
        rel_type: string(record, columns.rel_type)?,
        source: node_from(record, projection::SOURCE)?,
        target: node_from(record, projection::TARGET)?,
        properties: properties(record, columns.properties)?,
    })
}

/// Read the total from the single row of a count query
pub fn map_total(records: &[Record]) -> Result<u64> {
    let record = records
        .first()
        .ok_or_else(|| Error::MalformedRecord("count query returned no rows".to_string()))?;
    required(record, projection::TOTAL)?
        .as_u64()
        .ok_or_else(|| malformed(projection::TOTAL, "a non-negative integer"))
}

fn node_from(record: &Record, columns: NodeColumns) -> Result<NodeResult> {
    Ok(NodeResult {
        id: integer(record, columns.id)?,
        labels: string_list(record, columns.labels)?,
        properties: properties(record, columns.properties)?,
    })
}

fn required<'a>(record: &'a Record, column: &str) -> Result<&'a Value> {
    match record.get(column) {
        Some(Value::Null) | None => Err(Error::MalformedRecord(format!(
            "missing column '{}'",
            column
        ))),
        Some(value) => Ok(value),
    }
}

fn malformed(column: &str, expected: &str) -> Error {
    Error::MalformedRecord(format!("column '{}' is not {}", column, expected))
}

fn integer(record: &Record, column: &str) -> Result<i64> {
    required(record, column)?
        .as_i64()
        .ok_or_else(|| malformed(column, "an integer"))
}

fn string(record: &Record, column: &str) -> Result<String> {
    required(record, column)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| malformed(column, "a string"))
}

fn string_list(record: &Record, column: &str) -> Result<Vec<String>> {
    let items = required(record, column)?
        .as_array()
        .ok_or_else(|| malformed(column, "a list"))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| malformed(column, "a list of strings"))
        })
        .collect()
}

fn properties(record: &Record, column: &str) -> Result<Properties> {
    required(record, column)?
        .as_object()
        .map(Properties::from_json_map)
        .ok_or_else(|| malformed(column, "a map"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphsieve_core::PropertyValue;
    use serde_json::json;

    fn node_record() -> Record {
        Record::new()
            .with("node_id", 7)
            .with("node_labels", json!(["Person", "Employee"]))
            .with("node_properties", json!({"name": "Ada", "age": 36}))
    }

    fn relationship_record() -> Record {
        Record::new()
            .with("rel_id", 11)
            .with("rel_type", "WORKS_AT")
            .with("rel_properties", json!({"since": 2020}))
            .with("source_id", 1)
            .with("source_labels", json!(["Person"]))
            .with("source_properties", json!({"name": "Ada"}))
            .with("target_id", 2)
            .with("target_labels", json!(["Company"]))
            .with("target_properties", json!({}))
    }

    #[test]
    fn test_map_node() {
        let node = map_node(&node_record()).unwrap();
        assert_eq!(node.id, 7);
        assert_eq!(node.labels, vec!["Person", "Employee"]);
        assert_eq!(node.properties.get("age"), Some(&PropertyValue::Integer(36)));
    }

    #[test]
    fn test_map_relationship() {
        let rel = map_relationship(&relationship_record()).unwrap();
        assert_eq!(rel.id, 11);
        assert_eq!(rel.rel_type, "WORKS_AT");
        assert_eq!(rel.source.id, 1);
        assert_eq!(rel.target.labels, vec!["Company"]);
        assert!(rel.target.properties.is_empty());
        assert_eq!(rel.properties.get("since"), Some(&PropertyValue::Integer(2020)));
    }

    #[test]
    fn test_missing_identity_is_malformed() {
        let record = Record::new()
            .with("node_labels", json!([]))
            .with("node_properties", json!({}));
        let err = map_node(&record).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord(ref m) if m.contains("node_id")));
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_wrong_shapes_are_malformed() {
        let record = node_record().with("node_properties", json!([1, 2]));
        assert!(map_node(&record).is_err());

        let record = node_record().with("node_labels", json!([1]));
        assert!(map_node(&record).is_err());

        let record = relationship_record().with("target_id", Value::Null);
        assert!(map_relationship(&record).is_err());
    }

    #[test]
    fn test_map_total() {
        assert_eq!(map_total(&[Record::new().with("total", 5)]).unwrap(), 5);
        assert!(map_total(&[]).is_err());
        assert!(map_total(&[Record::new().with("total", -1)]).is_err());
    }
}
