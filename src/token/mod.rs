//! Token cache and issuance subsystem.
//!
//! # Data Flow
//! ```text
//! fetch handler needs a bearer token
//!     → cache.rs (check the in-process slot against the clock)
//!     → hit: return cached token, no network
//!     → miss/expired: exchange.rs (client-credentials POST)
//!     → overwrite slot with token + margin-adjusted expiry
//! ```
//!
//! # Design Decisions
//! - One token slot per process instance; never persisted
//! - Clock and exchanger are injected so tests need no real time or network
//! - No internal retries; a failed exchange is terminal for the request
//! - The slot lock is never held across the exchange await, so concurrent
//!   refreshes may duplicate the upstream call; the overwrite is idempotent

pub mod cache;
pub mod exchange;

pub use cache::{Clock, SystemClock, TokenCache};
pub use exchange::{HttpTokenExchanger, TokenExchanger, TokenGrant};
