//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via tracing; initialized once in main
//! - Metrics are cheap (atomic increments) and exposed for Prometheus scrape
//! - Request ID flows through handlers via the x-request-id header

pub mod metrics;
