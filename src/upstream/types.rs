//! Resource kinds served by the catalog API.

use std::fmt;

/// The three upstream resource families the relay brokers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Track,
    Artist,
    AudioFeatures,
}

impl ResourceKind {
    /// Upstream path for a single resource.
    pub fn single_path(&self, id: &str) -> String {
        match self {
            Self::Track => format!("/v1/tracks/{id}"),
            Self::Artist => format!("/v1/artists/{id}"),
            Self::AudioFeatures => format!("/v1/audio-features/{id}"),
        }
    }

    /// Upstream path for the batch endpoint (ids go in the query string).
    pub fn batch_path(&self) -> &'static str {
        match self {
            Self::Track => "/v1/tracks",
            Self::Artist => "/v1/artists",
            Self::AudioFeatures => "/v1/audio-features",
        }
    }

    /// Documented upstream cap on ids per batch call.
    pub fn batch_limit(&self) -> usize {
        match self {
            Self::Track | Self::Artist => 20,
            Self::AudioFeatures => 100,
        }
    }

    /// Key under which the upstream nests the batch collection.
    pub fn collection_key(&self) -> &'static str {
        match self {
            Self::Track => "tracks",
            Self::Artist => "artists",
            Self::AudioFeatures => "audio_features",
        }
    }

    /// Lowercase label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Artist => "artist",
            Self::AudioFeatures => "audio_features",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Track => write!(f, "Track"),
            Self::Artist => write!(f, "Artist"),
            Self::AudioFeatures => write!(f, "Audio features"),
        }
    }
}
