//! Route handlers: parameter extraction and dispatch to the fetcher.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::RelayError;
use crate::http::server::AppState;
use crate::upstream::ResourceKind;

/// POST /api/token, diagnostic token issuance.
pub async fn issue_token(State(state): State<AppState>) -> Result<Json<Value>, RelayError> {
    let access_token = state.tokens.get_token().await?;
    Ok(Json(json!({
        "access_token": access_token,
        "token_type": "Bearer",
    })))
}

/// GET /api/tracks/{id}
pub async fn get_track(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, RelayError> {
    state
        .catalog
        .fetch_one(ResourceKind::Track, &id)
        .await
        .map(Json)
}

/// GET /api/artists/{id}
pub async fn get_artist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, RelayError> {
    state
        .catalog
        .fetch_one(ResourceKind::Artist, &id)
        .await
        .map(Json)
}

/// GET /api/audio-features/{id}
pub async fn get_audio_features(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, RelayError> {
    state
        .catalog
        .fetch_one(ResourceKind::AudioFeatures, &id)
        .await
        .map(Json)
}

/// Query shape shared by all batch endpoints.
#[derive(Debug, Deserialize)]
pub struct BatchQuery {
    ids: Option<String>,
}

/// GET /api/tracks?ids=a,b,c
pub async fn get_tracks_batch(
    State(state): State<AppState>,
    Query(query): Query<BatchQuery>,
) -> Result<Json<Value>, RelayError> {
    fetch_batch(&state, ResourceKind::Track, query).await
}

/// GET /api/artists?ids=a,b,c
pub async fn get_artists_batch(
    State(state): State<AppState>,
    Query(query): Query<BatchQuery>,
) -> Result<Json<Value>, RelayError> {
    fetch_batch(&state, ResourceKind::Artist, query).await
}

/// GET /api/audio-features?ids=a,b,c
pub async fn get_audio_features_batch(
    State(state): State<AppState>,
    Query(query): Query<BatchQuery>,
) -> Result<Json<Value>, RelayError> {
    fetch_batch(&state, ResourceKind::AudioFeatures, query).await
}

async fn fetch_batch(
    state: &AppState,
    kind: ResourceKind,
    query: BatchQuery,
) -> Result<Json<Value>, RelayError> {
    let ids = parse_ids(kind, query)?;
    state.catalog.fetch_batch(kind, &ids).await.map(Json)
}

/// Split and trim the comma-separated `ids` parameter. Cardinality and shape
/// checks happen in the fetcher, before any network call.
fn parse_ids(kind: ResourceKind, query: BatchQuery) -> Result<Vec<String>, RelayError> {
    let raw = query.ids.unwrap_or_default();
    if raw.trim().is_empty() {
        return Err(RelayError::InvalidBatch(format!(
            "Missing 'ids' query parameter. Use ?ids=id1,id2,id3 for a batch of {}s.",
            kind.label()
        )));
    }

    Ok(raw.split(',').map(|id| id.trim().to_string()).collect())
}
