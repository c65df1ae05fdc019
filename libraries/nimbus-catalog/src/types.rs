//! Types for Nimbus catalog API requests and responses.

use nimbus_core::Track;
use serde::Deserialize;

/// Configuration for connecting to a Nimbus catalog server.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the catalog (e.g., "https://music.example.com")
    pub url: String,
    /// Optional bearer token sent with every request
    pub bearer_token: Option<String>,
}

impl CatalogConfig {
    /// Create a new catalog config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            bearer_token: None,
        }
    }

    /// Create a config with a bearer token.
    pub fn with_token(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            bearer_token: Some(token.into()),
        }
    }
}

// =============================================================================
// Wire Types
// =============================================================================

/// Standard response envelope used by list and delete endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// Paged listing payload inside the envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageData {
    pub records: Vec<WireTrack>,
    pub total: u64,
    pub current: u32,
    pub size: u32,
}

/// A track record as the catalog serializes it.
///
/// Numeric-looking fields (`duration`, `fileSize`) arrive as strings;
/// conversion to domain values happens in `From<WireTrack> for Track`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireTrack {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub singer: String,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub file_size: String,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub play_count: u64,
    #[serde(default)]
    pub cover_url: Option<String>,
}

impl From<WireTrack> for Track {
    fn from(wire: WireTrack) -> Self {
        Track {
            duration_secs: parse_duration(&wire.duration),
            file_size: wire.file_size.parse().unwrap_or(0),
            id: wire.id,
            title: wire.title,
            artist: wire.singer,
            album: wire.album,
            file_type: wire.file_type,
            play_count: wire.play_count,
            cover_url: wire.cover_url,
        }
    }
}

/// Parse a catalog duration field into seconds.
///
/// Accepts plain seconds ("215", "215.5") or clock notation ("3:35").
/// Unparseable values collapse to zero; decoded media metadata corrects
/// the duration once the track is loaded.
fn parse_duration(raw: &str) -> f64 {
    let raw = raw.trim();
    if let Some((minutes, seconds)) = raw.split_once(':') {
        let minutes: f64 = minutes.parse().unwrap_or(0.0);
        let seconds: f64 = seconds.parse().unwrap_or(0.0);
        minutes * 60.0 + seconds
    } else {
        raw.parse().unwrap_or(0.0)
    }
}
