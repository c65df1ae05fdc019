//! Error types for the playback session

use nimbus_core::CatalogError;
use thiserror::Error;

/// Playback session errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Catalog request failed
    #[error("Catalog fetch failed: {0}")]
    Fetch(#[from] CatalogError),

    /// Operation requires a bound playback surface
    #[error("Playback surface is not ready")]
    SurfaceNotReady,

    /// Player could not start within the retry budget
    #[error("Player is not ready")]
    PlayerNotReady,

    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// The audio sink reported a failure
    #[error("Sink error: {0}")]
    Sink(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
