//! Expiry-aware caching of the single upstream access token.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

use crate::config::schema::{CLIENT_ID_VAR, CLIENT_SECRET_VAR};
use crate::config::Credentials;
use crate::error::RelayError;
use crate::observability::metrics;
use crate::token::exchange::TokenExchanger;

/// Time source for expiry checks. Injected so tests can move time manually.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

/// Wall-clock implementation used in production.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// The single cached credential for this process instance.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    /// Absolute expiry, already reduced by the safety margin.
    expires_at_ms: u64,
}

/// Owns the upstream credential: issues, caches, and refreshes the access
/// token with expiry-aware reuse.
///
/// The slot lock guards only the copy-in/copy-out, never the exchange await.
/// Two callers racing a refresh may both hit the token endpoint; both writes
/// store an equally valid token, so the race is left uncoordinated.
pub struct TokenCache {
    slot: Mutex<Option<CachedToken>>,
    credentials: Credentials,
    safety_margin_secs: u64,
    exchanger: Arc<dyn TokenExchanger>,
    clock: Arc<dyn Clock>,
}

impl TokenCache {
    pub fn new(
        credentials: Credentials,
        safety_margin_secs: u64,
        exchanger: Arc<dyn TokenExchanger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            slot: Mutex::new(None),
            credentials,
            safety_margin_secs,
            exchanger,
            clock,
        }
    }

    /// Return a valid access token, issuing a new one only when the cached
    /// token is absent or past its margin-adjusted expiry.
    pub async fn get_token(&self) -> Result<String, RelayError> {
        if !self.credentials.is_complete() {
            return Err(RelayError::MissingCredentials(format!(
                "{} and {} must be set",
                CLIENT_ID_VAR, CLIENT_SECRET_VAR
            )));
        }

        let now = self.clock.now_millis();

        if let Some(cached) = self.slot.lock().as_ref() {
            if now < cached.expires_at_ms {
                metrics::record_token_cache("hit");
                return Ok(cached.access_token.clone());
            }
        }

        let grant = self.exchanger.exchange(&self.credentials).await?;

        let usable_secs = grant.expires_in_secs.saturating_sub(self.safety_margin_secs);
        let expires_at_ms = now + usable_secs * 1000;

        *self.slot.lock() = Some(CachedToken {
            access_token: grant.access_token.clone(),
            expires_at_ms,
        });

        metrics::record_token_cache("refresh");
        tracing::debug!(
            expires_in_secs = grant.expires_in_secs,
            usable_secs,
            "Access token refreshed"
        );

        Ok(grant.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::exchange::TokenGrant;
    use futures_util::future::BoxFuture;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    struct ManualClock(AtomicU64);

    impl ManualClock {
        fn advance_secs(&self, secs: u64) {
            self.0.fetch_add(secs * 1000, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now_millis(&self) -> u64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    struct CountingExchanger {
        calls: AtomicUsize,
        result: fn() -> Result<TokenGrant, RelayError>,
    }

    impl CountingExchanger {
        fn succeeding() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                result: || {
                    Ok(TokenGrant {
                        access_token: "token-abc".into(),
                        expires_in_secs: 3600,
                    })
                },
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                result: || {
                    Err(RelayError::UpstreamAuthFailed {
                        status: 400,
                        body: "invalid_client".into(),
                    })
                },
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TokenExchanger for CountingExchanger {
        fn exchange<'a>(
            &'a self,
            _credentials: &'a Credentials,
        ) -> BoxFuture<'a, Result<TokenGrant, RelayError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = (self.result)();
            Box::pin(async move { result })
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            client_id: "id".into(),
            client_secret: "secret".into(),
        }
    }

    fn cache_with(
        exchanger: Arc<CountingExchanger>,
        clock: Arc<ManualClock>,
        credentials: Credentials,
    ) -> TokenCache {
        TokenCache::new(credentials, 300, exchanger, clock)
    }

    #[tokio::test]
    async fn reuses_cached_token_within_validity_window() {
        let exchanger = Arc::new(CountingExchanger::succeeding());
        let clock = Arc::new(ManualClock(AtomicU64::new(0)));
        let cache = cache_with(exchanger.clone(), clock.clone(), credentials());

        for _ in 0..5 {
            assert_eq!(cache.get_token().await.unwrap(), "token-abc");
        }

        assert_eq!(exchanger.calls(), 1);
    }

    #[tokio::test]
    async fn refreshes_exactly_once_after_expiry() {
        let exchanger = Arc::new(CountingExchanger::succeeding());
        let clock = Arc::new(ManualClock(AtomicU64::new(0)));
        let cache = cache_with(exchanger.clone(), clock.clone(), credentials());

        cache.get_token().await.unwrap();
        assert_eq!(exchanger.calls(), 1);

        // Lifetime 3600s minus 300s margin: valid strictly below 3300s.
        clock.advance_secs(3299);
        cache.get_token().await.unwrap();
        assert_eq!(exchanger.calls(), 1);

        clock.advance_secs(1);
        cache.get_token().await.unwrap();
        assert_eq!(exchanger.calls(), 2);

        cache.get_token().await.unwrap();
        assert_eq!(exchanger.calls(), 2);
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_any_exchange() {
        let exchanger = Arc::new(CountingExchanger::succeeding());
        let clock = Arc::new(ManualClock(AtomicU64::new(0)));
        let cache = cache_with(
            exchanger.clone(),
            clock,
            Credentials {
                client_id: "id".into(),
                client_secret: String::new(),
            },
        );

        let err = cache.get_token().await.unwrap_err();
        assert_eq!(err.code(), "MISSING_ENV_VARS");
        assert_eq!(exchanger.calls(), 0);
    }

    #[tokio::test]
    async fn failed_exchange_leaves_slot_empty_and_is_not_retried() {
        let exchanger = Arc::new(CountingExchanger::failing());
        let clock = Arc::new(ManualClock(AtomicU64::new(0)));
        let cache = cache_with(exchanger.clone(), clock, credentials());

        let err = cache.get_token().await.unwrap_err();
        assert_eq!(err.code(), "UPSTREAM_AUTH_FAILED");
        assert_eq!(exchanger.calls(), 1);

        // The next call attempts a fresh exchange instead of serving a
        // stale slot; still exactly one exchange per call.
        let _ = cache.get_token().await.unwrap_err();
        assert_eq!(exchanger.calls(), 2);
    }
}
