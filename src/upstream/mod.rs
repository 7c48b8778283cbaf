//! Upstream catalog API subsystem.
//!
//! # Data Flow
//! ```text
//! handler request (kind + id(s))
//!     → id.rs (shape + cardinality checks, no network on failure)
//!     → token cache (bearer token, cached or refreshed)
//!     → client.rs (GET against the catalog API)
//!     → fixed status→error mapping, batch null filtering
//!     → parsed JSON back to the handler, passthrough
//! ```
//!
//! # Design Decisions
//! - Validation always precedes the token lookup and the network call
//! - The status mapping table is closed; nothing is retried here
//! - A batch with null holes is a success with the holes filtered out

pub mod client;
pub mod id;
pub mod types;

pub use client::CatalogClient;
pub use types::ResourceKind;
