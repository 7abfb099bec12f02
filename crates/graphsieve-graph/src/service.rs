//! Filter service
//!
//! Runs one filter request end to end: compile, execute the data and count
//! queries against a session, map the rows and wrap them in a response page.

use crate::mapper::{self, map_total};
use crate::session::{GraphSession, Record};
use graphsieve_core::{Error, FilterRequest, NodeResult, RelationshipResult, Result};
use graphsieve_protocol::FilterResponse;
use graphsieve_query::{CompiledQuery, CompilerConfig, Parameters, QueryAssembler, QueryTarget};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Default per-round-trip timeout
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Compiles and executes filter requests
#[derive(Debug, Clone)]
pub struct FilterService {
    assembler: QueryAssembler,
    query_timeout: Duration,
}

impl Default for FilterService {
    fn default() -> Self {
        Self::new(CompilerConfig::default())
    }
}

impl FilterService {
    /// Create a service with the given compiler policy
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            assembler: QueryAssembler::new(config),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Set the per-round-trip timeout
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Get the compiler configuration
    pub fn config(&self) -> &CompilerConfig {
        self.assembler.config()
    }

    /// Get the per-round-trip timeout
    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    /// Filter nodes
    #[instrument(skip_all, fields(request_id = %Uuid::new_v4(), kind = "nodes"))]
    pub async fn filter_nodes(
        &self,
        session: &dyn GraphSession,
        request: &FilterRequest,
    ) -> Result<FilterResponse<NodeResult>> {
        self.execute(session, request, QueryTarget::Nodes, mapper::map_node)
            .await
            .inspect_err(log_failure)
    }

    /// Filter relationships, each with its source and target node
    #[instrument(skip_all, fields(request_id = %Uuid::new_v4(), kind = "relationships"))]
    pub async fn filter_relationships(
        &self,
        session: &dyn GraphSession,
        request: &FilterRequest,
    ) -> Result<FilterResponse<RelationshipResult>> {
        self.execute(session, request, QueryTarget::Relationships, mapper::map_relationship)
            .await
            .inspect_err(log_failure)
    }

    /// Compile `request` without executing it and return its summary
    pub fn active_filters(&self, request: &FilterRequest, target: QueryTarget) -> Result<Vec<String>> {
        let compiled = self.assembler.assemble(request, target)?;
        Ok(compiled.active_filters().to_vec())
    }

    /// Compile `request` without executing it
    pub fn compile(&self, request: &FilterRequest, target: QueryTarget) -> Result<CompiledQuery> {
        self.assembler.assemble(request, target)
    }

    async fn execute<T>(
        &self,
        session: &dyn GraphSession,
        request: &FilterRequest,
        target: QueryTarget,
        map: fn(&Record) -> Result<T>,
    ) -> Result<FilterResponse<T>> {
        let compiled = self.assembler.assemble(request, target)?;
        let count_parameters = compiled.count_parameters();

        let (rows, totals) = tokio::try_join!(
            self.run(session, compiled.query_text(), compiled.parameters()),
            self.run(session, compiled.count_text(), &count_parameters),
        )?;

        let total = map_total(&totals)?;
        let data = rows.iter().map(map).collect::<Result<Vec<T>>>()?;

        info!(
            returned = data.len(),
            total,
            filters = compiled.active_filters().len(),
            "Filter request completed"
        );

        Ok(FilterResponse {
            total,
            limit: request.limit,
            skip: request.skip,
            data,
            active_filters: compiled.active_filters().to_vec(),
        })
    }

    async fn run(&self, session: &dyn GraphSession, query: &str, parameters: &Parameters) -> Result<Vec<Record>> {
        debug!(parameters = parameters.len(), "Running statement");
        tokio::time::timeout(self.query_timeout, session.run(query, parameters))
            .await
            .map_err(|_| {
                Error::DatabaseUnavailable(format!(
                    "query timed out after {}s",
                    self.query_timeout.as_secs_f64()
                ))
            })?
    }
}

fn log_failure(err: &Error) {
    if err.is_validation() {
        warn!("Rejected filter request: {}", err);
    } else if err.is_contract_violation() {
        error!(code = err.error_code(), "Contract violation: {}", err);
    } else {
        error!(code = err.error_code(), "Filter request failed: {}", err);
    }
}
