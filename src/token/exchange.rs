//! Client-credentials exchange against the upstream token endpoint.

use futures_util::future::BoxFuture;
use serde::Deserialize;
use url::Url;

use crate::config::Credentials;
use crate::error::RelayError;

/// A freshly issued access token and its upstream-reported lifetime.
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub access_token: String,
    pub expires_in_secs: u64,
}

/// Performs the credential exchange. Injected into [`crate::token::TokenCache`]
/// so tests can substitute a counting or failing implementation.
pub trait TokenExchanger: Send + Sync {
    fn exchange<'a>(
        &'a self,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<TokenGrant, RelayError>>;
}

/// Wire shape of the token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[allow(dead_code)]
    token_type: String,
    /// Lifetime in seconds.
    expires_in: u64,
}

/// Production exchanger: basic-auth POST with `grant_type=client_credentials`.
pub struct HttpTokenExchanger {
    http: reqwest::Client,
    token_url: Url,
}

impl HttpTokenExchanger {
    pub fn new(http: reqwest::Client, token_url: Url) -> Self {
        Self { http, token_url }
    }
}

impl TokenExchanger for HttpTokenExchanger {
    fn exchange<'a>(
        &'a self,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<TokenGrant, RelayError>> {
        Box::pin(async move {
            let response = self
                .http
                .post(self.token_url.clone())
                .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
                .form(&[("grant_type", "client_credentials")])
                .send()
                .await
                .map_err(RelayError::UpstreamUnreachable)?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                tracing::warn!(status = status.as_u16(), "Token exchange rejected");
                return Err(RelayError::UpstreamAuthFailed {
                    status: status.as_u16(),
                    body,
                });
            }

            let parsed: TokenResponse = response
                .json()
                .await
                .map_err(|e| RelayError::Internal(format!("malformed token response: {e}")))?;

            Ok(TokenGrant {
                access_token: parsed.access_token,
                expires_in_secs: parsed.expires_in,
            })
        })
    }
}
