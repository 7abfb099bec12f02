//! Server implementation

use crate::config::ServerConfig;
use crate::cors::CorsConfig;
use crate::http_server::{self, AppState};
use graphsieve_core::{Error, Result};
use graphsieve_graph::{FilterService, GraphSession, Neo4jSession};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// GraphSieve Server
pub struct Server {
    /// Server configuration
    config: ServerConfig,

    /// Shared handler state
    state: AppState,

    /// CORS policy
    cors: CorsConfig,

    /// Running state
    running: AtomicBool,

    /// Bound address once started
    local_addr: Mutex<Option<SocketAddr>>,

    /// HTTP server handle
    http_handle: Mutex<Option<JoinHandle<()>>>,
}

impl Server {
    /// Create a server talking to the Neo4j instance named in `config`
    pub fn new(config: ServerConfig) -> Result<Self> {
        config.validate()?;
        let session = Neo4jSession::new(config.neo4j_config())?;
        Ok(Self::with_session(config, Arc::new(session)))
    }

    /// Create a server over an existing session
    pub fn with_session(config: ServerConfig, session: Arc<dyn GraphSession>) -> Self {
        let service = FilterService::new(config.compiler_config())
            .with_query_timeout(config.query_timeout());

        Self {
            state: AppState::new(service, session),
            cors: CorsConfig::from_env(),
            config,
            running: AtomicBool::new(false),
            local_addr: Mutex::new(None),
            http_handle: Mutex::new(None),
        }
    }

    /// Builder: override the CORS policy
    pub fn with_cors(mut self, cors: CorsConfig) -> Self {
        self.cors = cors;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Check if server is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Address the HTTP listener is bound to, once started
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.lock().await
    }

    /// Start the server
    pub async fn start(&self) -> Result<()> {
        if self.is_running() {
            return Err(Error::Configuration("Server already running".to_string()));
        }

        info!("Starting GraphSieve server...");
        info!(
            "Neo4j at {} (database '{}')",
            self.config.neo4j.uri, self.config.neo4j.database
        );

        let router = http_server::create_router(
            self.state.clone(),
            &self.config.api_prefix,
            &self.cors,
        );
        let addr = format!("0.0.0.0:{}", self.config.http_port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        let bound = listener.local_addr()?;

        info!("HTTP server listening on {}{}", bound, self.config.api_prefix);

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                warn!("HTTP server error: {}", e);
            }
        });

        *self.http_handle.lock().await = Some(handle);
        *self.local_addr.lock().await = Some(bound);
        self.running.store(true, Ordering::SeqCst);

        info!("GraphSieve server started successfully");
        Ok(())
    }

    /// Stop the server
    pub async fn stop(&self) -> Result<()> {
        if !self.is_running() {
            return Err(Error::Configuration("Server not running".to_string()));
        }

        info!("Stopping GraphSieve server...");

        if let Some(handle) = self.http_handle.lock().await.take() {
            handle.abort();
        }
        *self.local_addr.lock().await = None;
        self.running.store(false, Ordering::SeqCst);

        info!("GraphSieve server stopped");
        Ok(())
    }

    /// Get server version
    pub fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
