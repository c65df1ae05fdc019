//! Core types for the playback session

use nimbus_core::Track;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Transport status of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportStatus {
    /// No track loaded
    Idle,

    /// Fetching or decoding a track
    Loading,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,
}

/// Loop mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopMode {
    /// Stop when the current track ends
    None,

    /// Repeat the current track
    One,

    /// Advance to the next track, wrapping at the catalog end
    All,
}

impl LoopMode {
    /// Next mode in the None -> One -> All cycle.
    pub fn cycled(self) -> Self {
        match self {
            Self::None => Self::One,
            Self::One => Self::All,
            Self::All => Self::None,
        }
    }
}

/// Configuration for a playback session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum history size (default: 50)
    pub history_size: usize,

    /// Initial volume, 0.0 to 1.0 (default: 0.7)
    pub volume: f32,

    /// Initial playback rate (default: 1.0)
    pub rate: f32,

    /// Initial loop mode (default: None)
    pub loop_mode: LoopMode,

    /// Tracks per catalog page (default: 10)
    pub page_size: u32,

    /// How long to wait for the sink readiness signal before
    /// proceeding anyway, in milliseconds (default: 3000)
    pub ready_wait_ms: u64,

    /// Retry attempts while waiting for the surface in `play` (default: 3)
    pub play_retry_attempts: u32,

    /// Delay between surface retries, in milliseconds (default: 200)
    pub play_retry_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_size: 50,
            volume: 0.7,
            rate: 1.0,
            loop_mode: LoopMode::None,
            page_size: 10,
            ready_wait_ms: 3000,
            play_retry_attempts: 3,
            play_retry_delay_ms: 200,
        }
    }
}

impl SessionConfig {
    pub(crate) fn ready_wait(&self) -> Duration {
        Duration::from_millis(self.ready_wait_ms)
    }

    pub(crate) fn play_retry_delay(&self) -> Duration {
        Duration::from_millis(self.play_retry_delay_ms)
    }
}

/// Point-in-time view of the session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Track the session is centered on, if any
    pub current: Option<Track>,

    /// Transport status
    pub status: TransportStatus,

    /// Playhead position in seconds
    pub position_secs: f64,

    /// Track duration in seconds
    pub duration_secs: f64,

    /// Volume, 0.0 to 1.0
    pub volume: f32,

    /// Whether output is muted
    pub muted: bool,

    /// Playback rate
    pub rate: f32,

    /// Loop mode
    pub loop_mode: LoopMode,

    /// Whether a listing fetch is in flight
    pub list_loading: bool,

    /// Whether an audio fetch/decode is in flight
    pub audio_loading: bool,

    /// Current catalog page (1-based)
    pub page: u32,

    /// Total tracks matching the active query
    pub total: u64,
}

/// Format a playhead position as "M:SS".
///
/// Seconds are truncated; negative or non-finite values render as "0:00".
pub fn format_position(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
