//! Neo4j HTTP transactional API messages
//!
//! Request and response bodies of `POST /db/{database}/tx/commit` and the
//! discovery document served at the server root.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Path of the auto-commit endpoint for `database`
pub fn commit_path(database: &str) -> String {
    format!("/db/{}/tx/commit", database)
}

/// One statement with its parameters
#[derive(Debug, Clone, Serialize)]
pub struct Statement<'a, P: Serialize> {
    pub statement: &'a str,
    pub parameters: &'a P,
}

/// Request body: statements run in one implicit transaction
#[derive(Debug, Clone, Serialize)]
pub struct CommitRequest<'a, P: Serialize> {
    pub statements: Vec<Statement<'a, P>>,
}

impl<'a, P: Serialize> CommitRequest<'a, P> {
    /// A request running a single statement
    pub fn single(statement: &'a str, parameters: &'a P) -> Self {
        Self {
            statements: vec![Statement {
                statement,
                parameters,
            }],
        }
    }
}

/// Response body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitResponse {
    #[serde(default)]
    pub results: Vec<StatementResult>,

    #[serde(default)]
    pub errors: Vec<ServerError>,
}

/// Result of one statement
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatementResult {
    #[serde(default)]
    pub columns: Vec<String>,

    #[serde(default)]
    pub data: Vec<ResultRow>,
}

/// One row, positionally aligned with `columns`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultRow {
    #[serde(default)]
    pub row: Vec<Value>,
}

/// Error reported by the server
#[derive(Debug, Clone, Deserialize)]
pub struct ServerError {
    pub code: String,
    pub message: String,
}

/// Discovery document served at `GET /`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Discovery {
    #[serde(default)]
    pub neo4j_version: Option<String>,

    #[serde(default)]
    pub neo4j_edition: Option<String>,
}
