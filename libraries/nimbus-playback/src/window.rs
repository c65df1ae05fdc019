//! Catalog page window
//!
//! The session only ever holds one page of the catalog in memory.
//! Navigation is planned against that window: either an index move
//! within it, or a fetch of an adjacent (or wrap-around) page.

use nimbus_core::{Track, TrackPage};

/// Where to land in a freshly fetched page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Landing {
    First,
    Last,
}

/// Planned navigation move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NavStep {
    /// Nothing to do (empty window)
    None,

    /// Play the track at this index in the current window
    Within(usize),

    /// Fetch `page` and play the `land` element of the result
    Fetch { page: u32, land: Landing },
}

/// One resident page of the catalog listing.
#[derive(Debug, Clone, Default)]
pub(crate) struct PageWindow {
    tracks: Vec<Track>,
    page: u32,
    page_size: u32,
    total: u64,
}

impl PageWindow {
    pub fn empty(page_size: u32) -> Self {
        Self {
            tracks: Vec::new(),
            page: 1,
            page_size,
            total: 0,
        }
    }

    pub fn from_page(page: TrackPage) -> Self {
        Self {
            tracks: page.tracks,
            page: page.page.max(1),
            page_size: page.page_size,
            total: page.total,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn first(&self) -> Option<&Track> {
        self.tracks.first()
    }

    pub fn last(&self) -> Option<&Track> {
        self.tracks.last()
    }

    pub fn index_of(&self, track_id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == track_id)
    }

    /// Remove a track from the window, keeping `total` consistent.
    /// Returns whether anything was removed.
    pub fn remove_track(&mut self, track_id: &str) -> bool {
        match self.index_of(track_id) {
            Some(index) => {
                self.tracks.remove(index);
                self.total = self.total.saturating_sub(1);
                true
            }
            None => false,
        }
    }

    /// Whether the catalog has a page after this one.
    pub fn has_next_page(&self) -> bool {
        u64::from(self.page) * u64::from(self.page_size) < self.total
    }

    /// Number of the final page for the active query.
    pub fn last_page(&self) -> u32 {
        if self.page_size == 0 || self.total == 0 {
            return 1;
        }
        let pages = self.total.div_ceil(u64::from(self.page_size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Plan the move to the track after `current_id`.
    ///
    /// A current track missing from the window (deleted, or the window
    /// was refetched) restarts from the window's first element.
    pub fn next_step(&self, current_id: &str) -> NavStep {
        if self.tracks.is_empty() {
            return NavStep::None;
        }
        let Some(index) = self.index_of(current_id) else {
            return NavStep::Within(0);
        };
        if index + 1 < self.tracks.len() {
            NavStep::Within(index + 1)
        } else if self.has_next_page() {
            NavStep::Fetch {
                page: self.page + 1,
                land: Landing::First,
            }
        } else {
            // End of catalog: wrap to the first page
            NavStep::Fetch {
                page: 1,
                land: Landing::First,
            }
        }
    }

    /// Plan the move to the track before `current_id`.
    ///
    /// Mirrors `next_step`: falls off the front of the window into the
    /// previous page, and wraps from page 1 to the final page.
    pub fn previous_step(&self, current_id: &str) -> NavStep {
        if self.tracks.is_empty() {
            return NavStep::None;
        }
        let Some(index) = self.index_of(current_id) else {
            return NavStep::Within(self.tracks.len() - 1);
        };
        if index > 0 {
            NavStep::Within(index - 1)
        } else if self.page > 1 {
            NavStep::Fetch {
                page: self.page - 1,
                land: Landing::Last,
            }
        } else {
            NavStep::Fetch {
                page: self.last_page(),
                land: Landing::Last,
            }
        }
    }
}
