//! Play history tracking
//!
//! Maintains a bounded, most-recent-first ledger of played tracks.
//! Replaying a track promotes its existing entry instead of adding a
//! duplicate.

use nimbus_core::Track;
use std::collections::VecDeque;

/// Bounded play history
///
/// Most recent entry sits at the front. When the cap is reached, the
/// oldest entry is discarded.
#[derive(Debug, Clone)]
pub struct HistoryLedger {
    /// History buffer (most recent = front)
    tracks: VecDeque<Track>,

    /// Maximum history size
    max_size: usize,
}

impl HistoryLedger {
    /// Create a new ledger with the specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            tracks: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Record a play of `track`.
    ///
    /// If the track is already in the ledger it moves to the front;
    /// otherwise it is inserted at the front and the oldest entry is
    /// dropped once the ledger is full.
    pub fn record(&mut self, track: Track) {
        if let Some(pos) = self.tracks.iter().position(|t| t.id == track.id) {
            self.tracks.remove(pos);
        }
        self.tracks.push_front(track);
        self.tracks.truncate(self.max_size);
    }

    /// All entries, most recent first
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the ledger is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Maximum number of entries
    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::new(50)
    }
}
