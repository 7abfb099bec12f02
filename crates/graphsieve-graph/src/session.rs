//! Database session seam
//!
//! The filter service only needs one capability from the database: run a
//! compiled read query and hand back its rows. `GraphSession` captures that
//! so the service can be driven by a real server or by an in-process double.

use async_trait::async_trait;
use graphsieve_core::{Error, Result};
use graphsieve_query::Parameters;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

/// One result row keyed by column name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Zip a positional row with its column names
    pub fn from_row(columns: &[String], row: Vec<Value>) -> Result<Self> {
        if columns.len() != row.len() {
            return Err(Error::MalformedRecord(format!(
                "row has {} values for {} columns",
                row.len(),
                columns.len()
            )));
        }
        Ok(Self {
            fields: columns.iter().cloned().zip(row).collect(),
        })
    }

    /// Builder-style setter
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(column.into(), value.into());
        self
    }

    /// Get a column value
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    /// Column names present in this record
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Database server identification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    pub version: String,
    pub edition: Option<String>,
}

/// A session able to run read-only Cypher
#[async_trait]
pub trait GraphSession: Send + Sync {
    /// Run `query` with `parameters` and collect every row
    async fn run(&self, query: &str, parameters: &Parameters) -> Result<Vec<Record>>;

    /// Probe connectivity and identify the server
    async fn server_info(&self) -> Result<ServerInfo>;
}

/// In-process session returning canned rows
///
/// Count queries (those returning `count(*)`) get a single `total` row;
/// every other query gets the configured rows. Executed statements are
/// recorded for inspection.
#[derive(Debug, Default)]
pub struct StaticSession {
    rows: Vec<Record>,
    total: Option<u64>,
    unavailable: Option<String>,
    executed: Mutex<Vec<(String, Parameters)>>,
}

impl StaticSession {
    /// Create a session with no rows
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows returned by data queries
    pub fn with_rows(mut self, rows: Vec<Record>) -> Self {
        self.rows = rows;
        self
    }

    /// Total returned by count queries; defaults to the number of rows
    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    /// A session whose every call fails as unreachable
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            unavailable: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Statements run so far, in order
    pub async fn executed(&self) -> Vec<(String, Parameters)> {
        self.executed.lock().await.clone()
    }
}

#[async_trait]
impl GraphSession for StaticSession {
    async fn run(&self, query: &str, parameters: &Parameters) -> Result<Vec<Record>> {
        if let Some(reason) = &self.unavailable {
            return Err(Error::DatabaseUnavailable(reason.clone()));
        }

        self.executed
            .lock()
            .await
            .push((query.to_string(), parameters.clone()));

        if query.contains("count(*)") {
            let total = self.total.unwrap_or(self.rows.len() as u64);
            return Ok(vec![Record::new().with("total", total)]);
        }
        Ok(self.rows.clone())
    }

    async fn server_info(&self) -> Result<ServerInfo> {
        match &self.unavailable {
            Some(reason) => Err(Error::DatabaseUnavailable(reason.clone())),
            None => Ok(ServerInfo {
                version: "static".to_string(),
                edition: None,
            }),
        }
    }
}
