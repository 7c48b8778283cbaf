//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Environment variable holding the upstream client identifier.
pub const CLIENT_ID_VAR: &str = "CATALOG_CLIENT_ID";

/// Environment variable holding the upstream client secret.
pub const CLIENT_SECRET_VAR: &str = "CATALOG_CLIENT_SECRET";

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream catalog API endpoints and timeouts.
    pub upstream: UpstreamConfig,

    /// Token cache settings.
    pub token: TokenConfig,

    /// Upstream client credentials. Normally supplied via environment
    /// variables rather than the config file.
    pub credentials: Credentials,

    /// Static asset fallback for non-API paths.
    pub assets: AssetsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Upstream catalog API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the catalog API (resource endpoints live under /v1).
    pub api_base_url: String,

    /// Token endpoint URL for the client-credentials exchange.
    pub token_url: String,

    /// Per-call timeout for upstream requests in seconds.
    pub request_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.spotify.com".to_string(),
            token_url: "https://accounts.spotify.com/api/token".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Token cache settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Seconds subtracted from the upstream-reported token lifetime before
    /// caching its expiry, so a refresh happens ahead of actual rejection.
    pub safety_margin_secs: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            safety_margin_secs: 300,
        }
    }
}

/// Upstream client credentials.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Credentials {
    /// OAuth client identifier.
    pub client_id: String,

    /// OAuth client secret.
    pub client_secret: String,
}

impl Credentials {
    /// True when both fields are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    /// Overlay values from the process environment, which take precedence
    /// over anything in the config file.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(id) = std::env::var(CLIENT_ID_VAR) {
            if !id.is_empty() {
                self.client_id = id;
            }
        }
        if let Ok(secret) = std::env::var(CLIENT_SECRET_VAR) {
            if !secret.is_empty() {
                self.client_secret = secret;
            }
        }
        self
    }
}

/// Static asset fallback configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Serve static assets for non-API paths.
    pub enabled: bool,

    /// Directory containing the built frontend bundle.
    pub dir: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: "dist".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
