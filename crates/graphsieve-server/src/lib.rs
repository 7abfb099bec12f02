//! GraphSieve Server
//!
//! HTTP front end for the filter service.
//!
//! # Features
//!
//! - Node and relationship filter endpoints
//! - Documented example requests with their compiled summaries
//! - Health probe reporting database connectivity
//! - Environment-driven configuration and CORS policy

pub mod config;
pub mod cors;
pub mod http_server;
pub mod server;

pub use config::ServerConfig;
pub use cors::CorsConfig;
pub use http_server::{create_router, ApiError, AppState};
pub use server::Server;
