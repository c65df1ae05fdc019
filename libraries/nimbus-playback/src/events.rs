//! Session events
//!
//! State transitions queue an event; the embedding UI drains them with
//! `PlayerSession::take_events` after each operation.

use crate::types::{LoopMode, TransportStatus};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Transport status changed
    StateChanged {
        /// New status
        status: TransportStatus,
    },

    /// A different track became current
    TrackChanged {
        /// New current track
        track_id: String,
        /// Previously current track, if any
        previous_track_id: Option<String>,
    },

    /// The current track played to its end
    TrackFinished {
        /// Track that finished
        track_id: String,
    },

    /// Playhead moved
    PositionChanged {
        /// Position in seconds
        position_secs: f64,
        /// Duration in seconds
        duration_secs: f64,
    },

    /// Volume or mute state changed
    VolumeChanged {
        /// Volume, 0.0 to 1.0
        volume: f32,
        /// Whether output is muted
        muted: bool,
    },

    /// Loop mode changed
    LoopModeChanged {
        /// New mode
        mode: LoopMode,
    },

    /// The visible catalog window was replaced
    WindowChanged {
        /// Page now in the window (1-based)
        page: u32,
        /// Total tracks matching the active query
        total: u64,
    },

    /// The sink reported a fault outside any session call
    SinkFault {
        /// Sink-provided description
        message: String,
    },
}
