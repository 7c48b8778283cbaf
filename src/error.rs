//! Relay error taxonomy and wire rendering.
//!
//! # Responsibilities
//! - Define the closed set of failure kinds the relay can report
//! - Map each kind to a stable wire code and HTTP status
//! - Render every failure as the `{error, message, status}` JSON envelope
//!
//! # Design Decisions
//! - Discrimination is by enum variant, never by message text
//! - No variant is ever retried inside the relay; each is terminal for
//!   the current request

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::upstream::ResourceKind;

/// Every failure the relay can surface to a client.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Client id or secret absent from configuration. Fatal, detected
    /// before any network call.
    #[error("{0}")]
    MissingCredentials(String),

    /// A resource identifier failed the 22-char base62 shape check.
    #[error("{kind} ID must be 22 alphanumeric characters, got: \"{id}\"")]
    InvalidId { kind: ResourceKind, id: String },

    /// A batch request was empty, oversized, or contained a malformed id.
    #[error("{0}")]
    InvalidBatch(String),

    /// The token endpoint or the catalog API rejected our credentials.
    #[error("upstream authentication failed: HTTP {status} {body}")]
    UpstreamAuthFailed { status: u16, body: String },

    /// The catalog API returned 429.
    #[error("upstream rate limit exceeded, try again later")]
    UpstreamRateLimited,

    /// The catalog API returned 404. Batch calls carry no single id.
    #[error("{kind} not found upstream{}", .id.as_deref().map(|i| format!(" for ID {i}")).unwrap_or_default())]
    NotFound {
        kind: ResourceKind,
        id: Option<String>,
    },

    /// Any other non-2xx from the catalog API.
    #[error("upstream API error (HTTP {status}){}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    UpstreamApi { status: u16, detail: Option<String> },

    /// Transport-level failure before an upstream status was received.
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(#[source] reqwest::Error),

    /// Anything that escaped the closed taxonomy.
    #[error("an unexpected error occurred: {0}")]
    Internal(String),
}

/// Wire envelope for all failure responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    pub status: u16,
}

impl RelayError {
    /// Stable code the UI collaborator branches on.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCredentials(_) => "MISSING_ENV_VARS",
            Self::InvalidId { .. } => "INVALID_ID",
            Self::InvalidBatch(_) => "INVALID_BATCH_REQUEST",
            Self::UpstreamAuthFailed { .. } => "UPSTREAM_AUTH_FAILED",
            Self::UpstreamRateLimited => "UPSTREAM_RATE_LIMITED",
            Self::NotFound { kind, .. } => match kind {
                ResourceKind::Track => "TRACK_NOT_FOUND",
                ResourceKind::Artist => "ARTIST_NOT_FOUND",
                ResourceKind::AudioFeatures => "AUDIO_FEATURES_NOT_FOUND",
            },
            Self::UpstreamApi { .. } => "UPSTREAM_API_ERROR",
            Self::UpstreamUnreachable(_) => "UPSTREAM_UNREACHABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status rendered on the wire.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingCredentials(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidId { .. } | Self::InvalidBatch(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::UpstreamRateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::UpstreamAuthFailed { .. }
            | Self::UpstreamApi { .. }
            | Self::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.code().to_string(),
            message: self.to_string(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}
