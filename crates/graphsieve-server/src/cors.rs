//! CORS configuration
//!
//! Permissive unless an origin whitelist is configured.

use axum::http::{header, HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

/// CORS configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Allowed origins (empty = allow all)
    pub allowed_origins: Vec<String>,
    /// Whether to allow credentials
    pub allow_credentials: bool,
    /// Preflight cache lifetime in seconds
    pub max_age_secs: u64,
    /// Allowed HTTP methods
    pub allowed_methods: Vec<Method>,
    /// Allowed request headers
    pub allowed_headers: Vec<String>,
    /// Allow everything
    pub permissive: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            allow_credentials: false,
            max_age_secs: 3600,
            allowed_methods: vec![Method::GET, Method::POST, Method::OPTIONS],
            allowed_headers: vec![
                "Content-Type".to_string(),
                "Accept".to_string(),
                "Origin".to_string(),
                "X-Request-ID".to_string(),
            ],
            permissive: true,
        }
    }
}

impl CorsConfig {
    /// Restrict to `origins`
    pub fn restricted(origins: Vec<String>) -> Self {
        Self {
            allowed_origins: origins,
            permissive: false,
            ..Default::default()
        }
    }

    /// Load from the process environment
    ///
    /// - `CORS_ALLOWED_ORIGINS`: comma-separated origins
    /// - `CORS_ALLOW_CREDENTIALS`: "true" or "false" (default: false)
    /// - `CORS_MAX_AGE`: preflight cache lifetime in seconds (default: 3600)
    /// - `CORS_PERMISSIVE`: "true" or "false" (default: true when no origins are set)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from `lookup`, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let allowed_origins: Vec<String> = lookup("CORS_ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let allow_credentials = lookup("CORS_ALLOW_CREDENTIALS")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let max_age_secs = lookup("CORS_MAX_AGE")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(3600);

        let permissive = lookup("CORS_PERMISSIVE")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(allowed_origins.is_empty());

        Self {
            allowed_origins,
            allow_credentials,
            max_age_secs,
            permissive,
            ..Default::default()
        }
    }

    /// Build the tower-http layer
    pub fn build_layer(&self) -> CorsLayer {
        if self.permissive {
            return CorsLayer::permissive();
        }

        let origins: Vec<HeaderValue> = self
            .allowed_origins
            .iter()
            .filter_map(|origin| {
                origin.parse().ok().or_else(|| {
                    tracing::warn!("CORS: Invalid origin format: {}", origin);
                    None
                })
            })
            .collect();

        let mut layer = if origins.is_empty() {
            tracing::warn!("CORS: No valid origins configured, allowing any origin");
            CorsLayer::new().allow_origin(Any)
        } else {
            CorsLayer::new().allow_origin(origins)
        };

        let headers: Vec<header::HeaderName> = self
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();

        layer = layer
            .allow_methods(self.allowed_methods.clone())
            .allow_headers(headers)
            .max_age(Duration::from_secs(self.max_age_secs));

        // Credentials cannot be combined with a wildcard origin.
        if self.allow_credentials && !self.allowed_origins.is_empty() {
            layer = layer.allow_credentials(true);
        }

        layer
    }
}
