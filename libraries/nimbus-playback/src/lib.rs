//! Nimbus Player - Playback Session
//!
//! Client-side playback management for Nimbus Player.
//!
//! This crate provides:
//! - Transport state machine (Idle, Loading, Playing, Paused)
//! - Single-slot streaming buffer (one live audio handle at a time)
//! - Surface binding with a parked load request (latest wins)
//! - Catalog window navigation (next/previous across pages, with wrap)
//! - Bounded play history (dedup to front, 50 entries)
//! - Loop modes (None, One, All) and volume/mute coupling
//!
//! # Architecture
//!
//! `nimbus-playback` is platform-agnostic: remote access goes through
//! the [`nimbus_core::Catalog`] trait and audio output through the
//! [`AudioSink`] trait. The embedding layer (desktop shell, web view)
//! supplies both and drains [`SessionEvent`]s after each call.
//!
//! # Example
//!
//! ```rust
//! use nimbus_playback::{format_position, HistoryLedger, SessionConfig};
//!
//! let config = SessionConfig::default();
//! assert_eq!(config.history_size, 50);
//!
//! let ledger = HistoryLedger::new(config.history_size);
//! assert!(ledger.is_empty());
//!
//! assert_eq!(format_position(215.0), "3:35");
//! ```

mod buffer;
mod error;
mod events;
mod history;
mod session;
mod sink;
mod surface;
pub mod types;
mod window;

// Public exports
pub use buffer::AudioBuffer;
pub use error::{PlaybackError, Result};
pub use events::SessionEvent;
pub use history::HistoryLedger;
pub use session::PlayerSession;
pub use sink::{AudioSink, SinkError};
pub use types::{
    format_position, LoopMode, SessionConfig, SessionSnapshot, TransportStatus,
};
