//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check addresses and URLs actually parse
//! - Validate value ranges (timeouts > 0)
//! - Require upstream credentials to be present
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::{RelayConfig, CLIENT_ID_VAR, CLIENT_SECRET_VAR};

/// A single semantic problem found in the configuration.
#[derive(Debug)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a loaded configuration, collecting every problem found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "listener.bind_address",
            message: format!("not a valid socket address: {}", config.listener.bind_address),
        });
    }

    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "listener.request_timeout_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    if Url::parse(&config.upstream.api_base_url).is_err() {
        errors.push(ValidationError {
            field: "upstream.api_base_url",
            message: format!("not a valid URL: {}", config.upstream.api_base_url),
        });
    }

    if Url::parse(&config.upstream.token_url).is_err() {
        errors.push(ValidationError {
            field: "upstream.token_url",
            message: format!("not a valid URL: {}", config.upstream.token_url),
        });
    }

    if config.upstream.request_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "upstream.request_timeout_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    if !config.credentials.is_complete() {
        errors.push(ValidationError {
            field: "credentials",
            message: format!(
                "client_id and client_secret are required; set {} and {}",
                CLIENT_ID_VAR, CLIENT_SECRET_VAR
            ),
        });
    }

    if config.assets.enabled && config.assets.dir.is_empty() {
        errors.push(ValidationError {
            field: "assets.dir",
            message: "must be set when assets.enabled is true".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
