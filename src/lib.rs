//! Catalog Relay
//!
//! A lightweight edge proxy brokering browser access to a third-party music
//! catalog API.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌────────────────────────────────────────────┐
//!                    │               CATALOG RELAY                 │
//!    UI request      │  ┌──────┐   ┌──────────┐   ┌────────────┐  │
//!    ────────────────┼─▶│ http │──▶│ upstream │──▶│   token    │  │
//!                    │  │router│   │ fetcher  │   │   cache    │  │
//!                    │  └──┬───┘   └────┬─────┘   └─────┬──────┘  │
//!                    │     │            │               │          │
//!    JSON passthrough│     │            ▼               ▼          │
//!    or error        │     │      catalog API      token endpoint  │
//!    envelope        │     │      (bearer GET)     (client creds)  │
//!    ◀───────────────┼─────┘                                       │
//!                    │  ┌──────────────────────────────────────┐   │
//!                    │  │ config  ·  observability  ·  errors  │   │
//!                    │  └──────────────────────────────────────┘   │
//!                    └────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod error;
pub mod http;
pub mod token;
pub mod upstream;

// Cross-cutting concerns
pub mod observability;

pub use config::RelayConfig;
pub use error::RelayError;
pub use http::HttpServer;
