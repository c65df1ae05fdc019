//! Surface binding
//!
//! A session can exist before its playback surface does (the UI builds
//! state first, the platform attaches an audio sink later). Until the
//! sink arrives, the latest requested load is parked here.

use crate::error::{PlaybackError, Result};
use crate::sink::AudioSink;
use nimbus_core::Track;
use tracing::debug;

/// A load request parked while the surface is unbound.
#[derive(Debug, Clone)]
pub(crate) struct PendingLoad {
    pub track: Track,
    pub autoplay: bool,
}

/// Holds the sink once the platform attaches it, plus at most one
/// pending load request. A newer request overwrites an older one.
pub(crate) struct SurfaceBinding {
    sink: Option<Box<dyn AudioSink>>,
    pending: Option<PendingLoad>,
}

impl SurfaceBinding {
    pub fn new() -> Self {
        Self {
            sink: None,
            pending: None,
        }
    }

    /// Attach the sink. Returns the parked load request, if any;
    /// the caller executes it exactly once.
    pub fn bind(&mut self, sink: Box<dyn AudioSink>) -> Option<PendingLoad> {
        self.sink = Some(sink);
        self.pending.take()
    }

    pub fn is_ready(&self) -> bool {
        self.sink.is_some()
    }

    /// Park a load request until the surface binds. Latest wins.
    pub fn queue_load(&mut self, track: Track, autoplay: bool) {
        if let Some(old) = &self.pending {
            debug!(
                superseded = %old.track.id,
                by = %track.id,
                "Replacing pending load request"
            );
        }
        self.pending = Some(PendingLoad { track, autoplay });
    }

    pub fn sink_mut(&mut self) -> Result<&mut (dyn AudioSink + 'static)> {
        self.sink
            .as_deref_mut()
            .ok_or(PlaybackError::SurfaceNotReady)
    }
}
