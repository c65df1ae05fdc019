//! Domain types shared across Nimbus Player crates.

use serde::{Deserialize, Serialize};

/// A track as known to the remote catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Catalog identifier
    pub id: String,
    /// Track title
    pub title: String,
    /// Performing artist
    pub artist: String,
    /// Album name, if the catalog knows one
    pub album: Option<String>,
    /// Reported duration in seconds. Decoded media metadata, once
    /// available, supersedes this value for display.
    pub duration_secs: f64,
    /// Encoded file size in bytes
    pub file_size: u64,
    /// Container/codec label (e.g., "mp3", "flac")
    pub file_type: String,
    /// Server-side play counter
    pub play_count: u64,
    /// Cover art location, if any
    pub cover_url: Option<String>,
}

/// One page of catalog results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPage {
    /// Tracks on this page, in catalog order
    pub tracks: Vec<Track>,
    /// 1-based page number this slice came from
    pub page: u32,
    /// Requested page size
    pub page_size: u32,
    /// Total matching tracks across all pages
    pub total: u64,
}

impl TrackPage {
    /// Number of pages the catalog holds for this query.
    pub fn page_count(&self) -> u32 {
        if self.page_size == 0 {
            return 1;
        }
        let pages = self.total.div_ceil(u64::from(self.page_size));
        u32::try_from(pages.max(1)).unwrap_or(u32::MAX)
    }
}

/// Parameters for a paged catalog listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackQuery {
    /// Optional title filter (substring match, server-side)
    pub title: Option<String>,
    /// 1-based page to fetch
    pub page: u32,
    /// Tracks per page
    pub page_size: u32,
}

impl TrackQuery {
    /// Query for the first page with the given page size and no filter.
    pub fn first_page(page_size: u32) -> Self {
        Self {
            title: None,
            page: 1,
            page_size,
        }
    }

    /// Same query pointed at a different page.
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            title: self.title.clone(),
            page,
            page_size: self.page_size,
        }
    }

    /// Same query with a title filter applied.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
