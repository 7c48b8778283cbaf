//! Catalog API client: token attachment, the upstream GET, and the fixed
//! failure mapping.

use std::sync::Arc;

use serde_json::Value;
use url::Url;

use crate::error::RelayError;
use crate::observability::metrics;
use crate::token::TokenCache;
use crate::upstream::id;
use crate::upstream::types::ResourceKind;

/// Brokers resource reads against the upstream catalog API.
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<TokenCache>,
}

impl CatalogClient {
    pub fn new(http: reqwest::Client, base_url: Url, tokens: Arc<TokenCache>) -> Self {
        Self {
            http,
            base_url,
            tokens,
        }
    }

    /// Fetch a single resource by id. The response body is passed through
    /// unmodified.
    pub async fn fetch_one(&self, kind: ResourceKind, id: &str) -> Result<Value, RelayError> {
        id::validate_id(kind, id)?;

        let url = self.endpoint(&kind.single_path(id))?;
        self.get_json(kind, url, Some(id)).await
    }

    /// Fetch a batch of resources. Null holes in the upstream collection are
    /// filtered out; a partial batch is a success.
    pub async fn fetch_batch(&self, kind: ResourceKind, ids: &[String]) -> Result<Value, RelayError> {
        id::validate_batch(kind, ids)?;

        let mut url = self.endpoint(kind.batch_path())?;
        url.query_pairs_mut().append_pair("ids", &ids.join(","));

        let mut body = self.get_json(kind, url, None).await?;
        filter_batch_nulls(kind, &mut body);
        Ok(body)
    }

    fn endpoint(&self, path: &str) -> Result<Url, RelayError> {
        self.base_url
            .join(path)
            .map_err(|e| RelayError::Internal(format!("bad upstream path {path}: {e}")))
    }

    async fn get_json(
        &self,
        kind: ResourceKind,
        url: Url,
        id: Option<&str>,
    ) -> Result<Value, RelayError> {
        let token = self.tokens.get_token().await?;

        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                metrics::record_upstream(kind.label(), "unreachable");
                RelayError::UpstreamUnreachable(e)
            })?;

        let status = response.status().as_u16();
        let error = match status {
            200..=299 => {
                metrics::record_upstream(kind.label(), "ok");
                return response
                    .json()
                    .await
                    .map_err(|e| RelayError::Internal(format!("malformed upstream body: {e}")));
            }
            404 => RelayError::NotFound {
                kind,
                id: id.map(str::to_string),
            },
            // A 401 here means the cached token went bad before its expiry.
            // The cache keeps trusting it until then; no refresh, no retry.
            401 => RelayError::UpstreamAuthFailed {
                status,
                body: response.text().await.unwrap_or_default(),
            },
            429 => RelayError::UpstreamRateLimited,
            _ => RelayError::UpstreamApi {
                status,
                detail: extract_error_message(response).await,
            },
        };

        metrics::record_upstream(kind.label(), error.code());
        tracing::warn!(
            kind = kind.label(),
            status,
            code = error.code(),
            "Upstream request failed"
        );
        Err(error)
    }
}

/// Pull `error.message` out of an upstream error body, if there is one.
async fn extract_error_message(response: reqwest::Response) -> Option<String> {
    let body: Value = response.json().await.ok()?;
    body.get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

/// Drop `null` entries from the batch collection, preserving the order of the
/// remaining items. Upstream returns `null` for ids it cannot resolve.
fn filter_batch_nulls(kind: ResourceKind, body: &mut Value) {
    if let Some(items) = body
        .get_mut(kind.collection_key())
        .and_then(Value::as_array_mut)
    {
        items.retain(|item| !item.is_null());
    }
}
