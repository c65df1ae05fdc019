//! Audio sink trait
//!
//! The sink is the platform side of playback: it accepts an encoded
//! buffer, decodes it, and plays it out. Desktop, mobile, and web
//! surfaces each supply their own implementation.

use crate::buffer::AudioBuffer;
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by an audio sink
#[derive(Debug, Error)]
pub enum SinkError {
    /// The platform's media policy refused to start playback without
    /// a user gesture. Not fatal; the session stays paused.
    #[error("Playback start blocked by autoplay policy")]
    AutoplayBlocked,

    /// Decode or output failure
    #[error("Sink failure: {0}")]
    Failed(String),
}

/// Platform audio sink.
///
/// All methods are synchronous state pushes except `wait_until_ready`
/// (resolves when the sink can accept transport commands) and `play`
/// (may be refused by the platform's autoplay policy).
#[async_trait]
pub trait AudioSink: Send {
    /// Hand the sink a new encoded buffer, replacing whatever it held.
    ///
    /// # Errors
    /// Returns an error if the sink cannot accept the buffer.
    fn load(&mut self, buffer: &AudioBuffer) -> Result<(), SinkError>;

    /// Resolve once the sink is ready for transport commands.
    ///
    /// Callers bound this with a timeout; a sink that never signals
    /// readiness must not wedge the session.
    async fn wait_until_ready(&mut self);

    /// Start or resume playback.
    ///
    /// # Errors
    /// Returns `AutoplayBlocked` if the platform refuses, or `Failed`
    /// on any other startup error.
    async fn play(&mut self) -> Result<(), SinkError>;

    /// Pause playback, keeping the loaded buffer.
    fn pause(&mut self);

    /// Move the playhead to `seconds` from the start.
    fn set_position(&mut self, seconds: f64);

    /// Current playhead position in seconds.
    fn position(&self) -> f64;

    /// Duration of the loaded media, once known.
    fn duration(&self) -> Option<f64>;

    /// Set output volume, 0.0 to 1.0.
    fn set_volume(&mut self, volume: f32);

    /// Mute or unmute output.
    fn set_muted(&mut self, muted: bool);

    /// Set playback rate (1.0 = normal).
    fn set_rate(&mut self, rate: f32);

    /// Enable sink-level single-track looping.
    fn set_looping(&mut self, looping: bool);
}
