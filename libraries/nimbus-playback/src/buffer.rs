//! Transient audio buffer handling
//!
//! The session keeps at most one decoded-audio handle alive. Acquiring
//! a new buffer always releases the previous one first, so a stale
//! handle can never outlive a track switch.

use bytes::Bytes;
use tracing::debug;

/// Encoded audio for one track, held while that track is current.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    track_id: String,
    bytes: Bytes,
}

impl AudioBuffer {
    /// Track this buffer belongs to.
    pub fn track_id(&self) -> &str {
        &self.track_id
    }

    /// Raw encoded audio.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Encoded size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the buffer holds no data.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Single-slot holder for the live audio buffer.
#[derive(Debug, Default)]
pub(crate) struct BufferSlot {
    current: Option<AudioBuffer>,
}

impl BufferSlot {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Install a new buffer, releasing any previous one first.
    pub fn acquire(&mut self, track_id: String, bytes: Bytes) -> &AudioBuffer {
        self.release();
        debug!(track_id = %track_id, bytes = bytes.len(), "Acquired audio buffer");
        self.current.insert(AudioBuffer { track_id, bytes })
    }

    /// Drop the live buffer. Idempotent.
    pub fn release(&mut self) {
        if let Some(buffer) = self.current.take() {
            debug!(track_id = %buffer.track_id, "Released audio buffer");
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&AudioBuffer> {
        self.current.as_ref()
    }

    pub fn holds_track(&self, track_id: &str) -> bool {
        self.current
            .as_ref()
            .is_some_and(|b| b.track_id == track_id)
    }
}
