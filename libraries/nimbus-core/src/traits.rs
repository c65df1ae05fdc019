/// Core traits for Nimbus Player
use crate::error::Result;
use crate::types::{TrackPage, TrackQuery};
use async_trait::async_trait;
use bytes::Bytes;

/// Remote track catalog.
///
/// Implementers expose a paged track listing, encoded audio retrieval,
/// and track removal. The playback session drives all catalog access
/// through this trait so tests can substitute an in-memory fake.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch one page of the catalog listing.
    ///
    /// # Errors
    /// Returns an error if the catalog is unreachable or the response
    /// cannot be decoded.
    async fn fetch_page(&self, query: &TrackQuery) -> Result<TrackPage>;

    /// Fetch the full encoded audio for a track.
    ///
    /// # Errors
    /// Returns an error if the track does not exist or the transfer fails.
    async fn fetch_audio(&self, track_id: &str) -> Result<Bytes>;

    /// Delete a track from the catalog.
    ///
    /// # Errors
    /// Returns an error if the catalog refuses the deletion.
    async fn delete_track(&self, track_id: &str) -> Result<()>;
}
