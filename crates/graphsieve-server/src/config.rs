//! Server configuration

use graphsieve_core::{check_identifier, Error, Result};
use graphsieve_graph::Neo4jConfig;
use graphsieve_query::CompilerConfig;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,

    /// Prefix of the filter routes
    pub api_prefix: String,

    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,

    /// Database connection
    pub neo4j: Neo4jConfig,

    /// Per-round-trip query timeout in seconds
    pub query_timeout_secs: u64,

    /// Largest accepted page size
    pub max_page_size: i64,

    /// Largest accepted traversal depth
    pub max_depth: u32,

    /// Reject requests without any constraint
    pub require_constraint: bool,

    /// Properties searched by `search_query`; empty searches every key
    pub search_properties: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let compiler = CompilerConfig::default();
        Self {
            http_port: 8000,
            api_prefix: "/api/v1".to_string(),
            log_level: "info".to_string(),
            neo4j: Neo4jConfig::default(),
            query_timeout_secs: 30,
            max_page_size: compiler.max_page_size,
            max_depth: compiler.max_depth,
            require_constraint: compiler.require_constraint,
            search_properties: compiler.searchable_properties,
        }
    }
}

impl ServerConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from `lookup`, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = var("GRAPHSIEVE_HTTP_PORT") {
            config.http_port = parse("GRAPHSIEVE_HTTP_PORT", &port)?;
        }
        if let Some(prefix) = var("GRAPHSIEVE_API_PREFIX") {
            config.api_prefix = prefix;
        }
        if let Some(level) = var("GRAPHSIEVE_LOG_LEVEL") {
            config.log_level = level;
        }
        if let Some(uri) = var("NEO4J_URI") {
            config.neo4j.uri = uri;
        }
        if let Some(user) = var("NEO4J_USER") {
            config.neo4j.user = user;
        }
        if let Some(password) = lookup("NEO4J_PASSWORD") {
            config.neo4j.password = password;
        }
        if let Some(database) = var("NEO4J_DATABASE") {
            config.neo4j.database = database;
        }
        if let Some(secs) = var("GRAPHSIEVE_QUERY_TIMEOUT_SECS") {
            config.query_timeout_secs = parse("GRAPHSIEVE_QUERY_TIMEOUT_SECS", &secs)?;
        }
        if let Some(size) = var("GRAPHSIEVE_MAX_PAGE_SIZE") {
            config.max_page_size = parse("GRAPHSIEVE_MAX_PAGE_SIZE", &size)?;
        }
        if let Some(depth) = var("GRAPHSIEVE_MAX_DEPTH") {
            config.max_depth = parse("GRAPHSIEVE_MAX_DEPTH", &depth)?;
        }
        if let Some(flag) = var("GRAPHSIEVE_REQUIRE_CONSTRAINT") {
            config.require_constraint = parse_flag("GRAPHSIEVE_REQUIRE_CONSTRAINT", &flag)?;
        }
        if let Some(list) = var("GRAPHSIEVE_SEARCH_PROPERTIES") {
            config.search_properties = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.max_page_size < 1 {
            return Err(Error::Configuration("max_page_size must be at least 1".to_string()));
        }
        if self.max_depth < 1 {
            return Err(Error::Configuration("max_depth must be at least 1".to_string()));
        }
        if self.query_timeout_secs == 0 {
            return Err(Error::Configuration("query timeout must be at least 1 second".to_string()));
        }
        if !self.api_prefix.is_empty() && !self.api_prefix.starts_with('/') {
            return Err(Error::Configuration(format!(
                "api_prefix must start with '/', got '{}'",
                self.api_prefix
            )));
        }
        for property in &self.search_properties {
            check_identifier("search_properties", property)
                .map_err(|e| Error::Configuration(e.to_string()))?;
        }
        Ok(())
    }

    /// Compiler policy derived from this configuration
    pub fn compiler_config(&self) -> CompilerConfig {
        CompilerConfig {
            max_page_size: self.max_page_size,
            max_depth: self.max_depth,
            require_constraint: self.require_constraint,
            searchable_properties: self.search_properties.clone(),
        }
    }

    /// Per-round-trip timeout
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    /// Database connection settings; the HTTP client timeout follows the query timeout
    pub fn neo4j_config(&self) -> Neo4jConfig {
        Neo4jConfig {
            timeout_secs: self.query_timeout_secs,
            ..self.neo4j.clone()
        }
    }

    /// Builder: set HTTP port
    pub fn http_port(mut self, port: u16) -> Self {
        self.http_port = port;
        self
    }

    /// Builder: set route prefix
    pub fn api_prefix(mut self, prefix: &str) -> Self {
        self.api_prefix = prefix.to_string();
        self
    }

    /// Builder: set Neo4j URI
    pub fn neo4j_uri(mut self, uri: &str) -> Self {
        self.neo4j.uri = uri.to_string();
        self
    }

    /// Builder: require at least one constraint per request
    pub fn require_constraint(mut self) -> Self {
        self.require_constraint = true;
        self
    }

    /// Builder: set log level
    pub fn log_level(mut self, level: &str) -> Self {
        self.log_level = level.to_string();
        self
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Configuration(format!("{} has an invalid value: '{}'", key, value)))
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Configuration(format!("{} must be a boolean, got '{}'", key, value))),
    }
}
