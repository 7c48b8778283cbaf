//! HTTP boundary subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → server.rs (axum setup, CORS, timeout, request id, metrics)
//!     → handlers.rs (param extraction, batch ids parsing)
//!     → upstream client / token cache
//!     → JSON passthrough, or RelayError rendered as the error envelope
//! non-API paths → static asset fallback (SPA)
//! ```

pub mod handlers;
pub mod server;

pub use server::{AppState, HttpServer};
