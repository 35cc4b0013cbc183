//! API Configuration Module
//!
//! CORS, bind address, concurrency cap and the allow-list source. Values
//! are loaded from environment variables with defaults for development.

use std::net::SocketAddr;
use std::path::PathBuf;

use roster_core::AllowLists;

use crate::error::{ApiError, ApiResult};

/// Path of a TOML file holding the allow-lists.
pub const ENV_ALLOWLIST_FILE: &str = "ROSTER_ALLOWLIST_FILE";

// ============================================================================
// API CONFIGURATION
// ============================================================================

#[derive(Debug, Clone)]
pub struct ApiConfig {
    // ========================================================================
    // CORS Configuration
    // ========================================================================
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    /// Whether to allow credentials in CORS requests.
    pub cors_allow_credentials: bool,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    // ========================================================================
    // Server Configuration
    // ========================================================================
    /// Maximum number of requests handled at once.
    pub max_concurrent_requests: usize,

    /// Optional TOML file with allow-lists; environment is used otherwise.
    pub allowlist_file: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            cors_allow_credentials: false,
            cors_max_age_secs: 86400,
            max_concurrent_requests: 512,
            allowlist_file: None,
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `ROSTER_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `ROSTER_CORS_ALLOW_CREDENTIALS`: "true" or "false" (default: false)
    /// - `ROSTER_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `ROSTER_MAX_CONCURRENT_REQUESTS`: In-flight request cap (default: 512)
    /// - `ROSTER_ALLOWLIST_FILE`: TOML allow-list file (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let cors_origins = std::env::var("ROSTER_CORS_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_allow_credentials = std::env::var("ROSTER_CORS_ALLOW_CREDENTIALS")
            .ok()
            .map(|s| s.to_lowercase() == "true")
            .unwrap_or(defaults.cors_allow_credentials);

        let cors_max_age_secs = std::env::var("ROSTER_CORS_MAX_AGE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.cors_max_age_secs);

        let max_concurrent_requests = std::env::var("ROSTER_MAX_CONCURRENT_REQUESTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(defaults.max_concurrent_requests);

        let allowlist_file = std::env::var(ENV_ALLOWLIST_FILE)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Self {
            cors_origins,
            cors_allow_credentials,
            cors_max_age_secs,
            max_concurrent_requests,
            allowlist_file,
        }
    }

    /// Check if a given origin is allowed.
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        if self.cors_origins.is_empty() {
            // Dev mode: allow all
            return true;
        }

        self.cors_origins.iter().any(|allowed| {
            if allowed == origin {
                return true;
            }
            // Wildcard subdomains: *.example.com
            if let Some(pattern) = allowed.strip_prefix("*.") {
                if let Some(origin_domain) = origin.strip_prefix("https://") {
                    return origin_domain.ends_with(&format!(".{}", pattern))
                        || origin_domain == pattern;
                }
            }
            false
        })
    }

    /// Load the allow-lists from the configured file, or from the
    /// environment when no file is set. The result is validated.
    pub fn load_allow_lists(&self) -> ApiResult<AllowLists> {
        let lists = match &self.allowlist_file {
            Some(path) => AllowLists::load(path),
            None => {
                let lists = AllowLists::from_env();
                lists.validate().map(|_| lists)
            }
        }
        .map_err(|e| ApiError::internal_error(format!("Invalid allow-list configuration: {}", e)))?;

        tracing::info!(
            sources = lists.sources.len(),
            tags = lists.tags.len(),
            categories = lists.categories.len(),
            allow_unrestricted_scope = lists.allow_unrestricted_scope,
            "Allow-lists loaded"
        );
        Ok(lists)
    }
}

/// Resolve the listen address from `ROSTER_API_BIND` and `PORT` or
/// `ROSTER_API_PORT`.
pub fn resolve_bind_addr() -> ApiResult<SocketAddr> {
    let host = std::env::var("ROSTER_API_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT")
        .ok()
        .or_else(|| std::env::var("ROSTER_API_PORT").ok());
    bind_addr(&host, port.as_deref())
}

fn bind_addr(host: &str, port: Option<&str>) -> ApiResult<SocketAddr> {
    let port_str = port.unwrap_or("3000");
    let port = port_str
        .parse::<u16>()
        .map_err(|_| ApiError::internal_error(format!("Invalid port value: {}", port_str)))?;

    let addr = format!("{}:{}", host, port);
    addr.parse::<SocketAddr>()
        .map_err(|e| ApiError::internal_error(format!("Invalid bind address {}: {}", addr, e)))
}
