//! Neo4j session over the HTTP transactional API
//!
//! Each `run` is one auto-commit transaction. Connection failures, timeouts
//! and non-success HTTP statuses surface as `DatabaseUnavailable`; errors the
//! server reports for a statement surface as `QueryExecution`.

use crate::session::{GraphSession, Record, ServerInfo};
use async_trait::async_trait;
use graphsieve_core::{Error, Result};
use graphsieve_protocol::transactional::{commit_path, CommitRequest, CommitResponse, Discovery};
use graphsieve_query::Parameters;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Neo4jConfig {
    /// Base URL of the HTTP endpoint
    pub uri: String,

    /// Basic-auth user
    pub user: String,

    /// Basic-auth password
    #[serde(skip_serializing)]
    pub password: String,

    /// Database name
    pub database: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            uri: "http://localhost:7474".to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
            database: "neo4j".to_string(),
            timeout_secs: 30,
        }
    }
}

/// HTTP session against one Neo4j database
pub struct Neo4jSession {
    config: Neo4jConfig,
    client: reqwest::Client,
    commit_url: String,
}

impl Neo4jSession {
    /// Create a session; no connection is made until the first call
    pub fn new(config: Neo4jConfig) -> Result<Self> {
        if config.uri.trim().is_empty() {
            return Err(Error::Configuration("Neo4j URI must not be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        let base = config.uri.trim_end_matches('/');
        let commit_url = format!("{}{}", base, commit_path(&config.database));

        info!("Created Neo4j session for {} (database '{}')", base, config.database);

        Ok(Self {
            config,
            client,
            commit_url,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Neo4jConfig {
        &self.config
    }

    fn base_url(&self) -> &str {
        self.config.uri.trim_end_matches('/')
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.basic_auth(&self.config.user, Some(&self.config.password))
    }
}

fn unavailable(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::DatabaseUnavailable("request to Neo4j timed out".to_string())
    } else {
        Error::DatabaseUnavailable(err.to_string())
    }
}

/// Turn a decoded commit response into records
fn into_records(response: CommitResponse) -> Result<Vec<Record>> {
    if let Some(err) = response.errors.into_iter().next() {
        return Err(Error::QueryExecution {
            code: err.code,
            message: err.message,
        });
    }

    let Some(result) = response.results.into_iter().next() else {
        return Ok(Vec::new());
    };

    result
        .data
        .into_iter()
        .map(|row| Record::from_row(&result.columns, row.row))
        .collect()
}

#[async_trait]
impl GraphSession for Neo4jSession {
    async fn run(&self, query: &str, parameters: &Parameters) -> Result<Vec<Record>> {
        let body = CommitRequest::single(query, parameters);

        let response = self
            .authorized(self.client.post(&self.commit_url))
            .json(&body)
            .send()
            .await
            .map_err(unavailable)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("Neo4j answered {}: {}", status, text);
            return Err(Error::DatabaseUnavailable(format!("Neo4j answered {}", status)));
        }

        let decoded: CommitResponse = response
            .json()
            .await
            .map_err(|e| Error::MalformedRecord(format!("undecodable response: {}", e)))?;

        let records = into_records(decoded)?;
        debug!("Neo4j returned {} rows", records.len());
        Ok(records)
    }

    async fn server_info(&self) -> Result<ServerInfo> {
        let response = self
            .authorized(self.client.get(self.base_url()))
            .send()
            .await
            .map_err(unavailable)?;

        if !response.status().is_success() {
            return Err(Error::DatabaseUnavailable(format!(
                "Neo4j answered {}",
                response.status()
            )));
        }

        let discovery: Discovery = response.json().await.map_err(unavailable)?;
        Ok(ServerInfo {
            version: discovery.neo4j_version.unwrap_or_else(|| "unknown".to_string()),
            edition: discovery.neo4j_edition,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_commit_url() {
        let session = Neo4jSession::new(Neo4jConfig {
            uri: "http://db:7474/".to_string(),
            database: "movies".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(session.commit_url, "http://db:7474/db/movies/tx/commit");
    }

    #[test]
    fn test_empty_uri_rejected() {
        let result = Neo4jSession::new(Neo4jConfig {
            uri: " ".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_into_records() {
        let response: CommitResponse = serde_json::from_value(json!({
            "results": [{
                "columns": ["total"],
                "data": [{"row": [3]}]
            }],
            "errors": []
        }))
        .unwrap();

        let records = into_records(response).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("total"), Some(&json!(3)));
    }

    #[test]
    fn test_server_error_becomes_query_execution() {
        let response: CommitResponse = serde_json::from_value(json!({
            "results": [],
            "errors": [{"code": "Neo.ClientError.Statement.SyntaxError", "message": "Invalid input"}]
        }))
        .unwrap();

        let err = into_records(response).unwrap_err();
        assert!(matches!(err, Error::QueryExecution { ref code, .. } if code.ends_with("SyntaxError")));
    }

    #[test]
    fn test_password_not_serialized() {
        let config = Neo4jConfig {
            password: "secret".to_string(),
            ..Default::default()
        };
        let text = serde_json::to_string(&config).unwrap();
        assert!(!text.contains("secret"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_unavailable() {
        let session = Neo4jSession::new(Neo4jConfig {
            uri: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..Default::default()
        })
        .unwrap();

        let err = session.run("RETURN 1", &Parameters::new()).await.unwrap_err();
        assert!(err.is_unavailable());
    }
}
