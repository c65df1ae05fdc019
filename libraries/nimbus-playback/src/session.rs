//! Playback session - core orchestration
//!
//! Coordinates the catalog window, audio buffer, surface binding,
//! history, and transport state. The session is single-owner: the
//! embedding layer drives it from one task and drains events after
//! each call.

use crate::{
    buffer::BufferSlot,
    error::{PlaybackError, Result},
    events::SessionEvent,
    history::HistoryLedger,
    sink::AudioSink,
    surface::SurfaceBinding,
    types::{LoopMode, SessionConfig, SessionSnapshot, TransportStatus},
    window::{Landing, NavStep, PageWindow},
};
use nimbus_core::{Catalog, Track, TrackQuery};
use std::sync::Arc;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

/// Floor applied when unmuting from zero volume, so unmute is audible
const MIN_AUDIBLE_VOLUME: f32 = 0.3;

/// Client-side playback session.
///
/// Owns the transport state machine, one page of the catalog listing,
/// the single live audio buffer, and the play history. All remote
/// access goes through the injected [`Catalog`]; all audio output goes
/// through the bound [`AudioSink`].
pub struct PlayerSession {
    config: SessionConfig,
    catalog: Arc<dyn Catalog>,

    status: TransportStatus,
    current: Option<Track>,
    position: f64,
    duration: f64,
    volume: f32,
    muted: bool,
    rate: f32,
    loop_mode: LoopMode,
    autoplay_enabled: bool,
    list_loading: bool,
    audio_loading: bool,

    surface: SurfaceBinding,
    buffer: BufferSlot,
    history: HistoryLedger,
    window: PageWindow,
    filter: TrackQuery,

    /// Monotonic load generation; a fetch that comes back under an old
    /// generation is abandoned instead of clobbering a newer load.
    load_generation: u64,

    pending_events: Vec<SessionEvent>,
}

impl PlayerSession {
    /// Create a session over the given catalog.
    pub fn new(catalog: Arc<dyn Catalog>, config: SessionConfig) -> Self {
        let volume = config.volume.clamp(0.0, 1.0);
        Self {
            status: TransportStatus::Idle,
            current: None,
            position: 0.0,
            duration: 0.0,
            volume,
            muted: volume == 0.0,
            rate: config.rate,
            loop_mode: config.loop_mode,
            autoplay_enabled: false,
            list_loading: false,
            audio_loading: false,
            surface: SurfaceBinding::new(),
            buffer: BufferSlot::new(),
            history: HistoryLedger::new(config.history_size),
            window: PageWindow::empty(config.page_size),
            filter: TrackQuery::first_page(config.page_size),
            load_generation: 0,
            pending_events: Vec::new(),
            catalog,
            config,
        }
    }

    // =========================================================================
    // Surface lifecycle
    // =========================================================================

    /// Attach the platform audio sink.
    ///
    /// The session's volume, mute, rate, and loop settings are pushed
    /// to the fresh sink, then the parked load request (if any) runs
    /// exactly once. A queued load that fails is logged, not raised;
    /// the surface arriving late is a background event.
    pub async fn bind_surface(&mut self, sink: Box<dyn AudioSink>) {
        let pending = self.surface.bind(sink);
        info!(had_pending = pending.is_some(), "Playback surface bound");

        if let Ok(sink) = self.surface.sink_mut() {
            sink.set_volume(self.volume);
            sink.set_muted(self.muted);
            sink.set_rate(self.rate);
            sink.set_looping(self.loop_mode == LoopMode::One);
        }

        if let Some(request) = pending {
            debug!(track_id = %request.track.id, "Draining pending load request");
            if let Err(err) = self.load(request.track, request.autoplay).await {
                warn!(error = %err, "Queued load failed after surface bind");
            }
        }
    }

    /// Release the live buffer and park the transport.
    ///
    /// Called when the embedding surface goes away (view unmounts,
    /// app backgrounds). The session itself stays usable.
    pub fn teardown(&mut self) {
        if let Ok(sink) = self.surface.sink_mut() {
            sink.pause();
        }
        self.buffer.release();
        self.position = 0.0;
        self.set_status(TransportStatus::Idle);
    }

    // =========================================================================
    // Loading and transport
    // =========================================================================

    /// Load a track into the session, optionally starting playback.
    ///
    /// Before the surface binds, the request is parked (latest wins)
    /// and this returns `Ok`. With a surface, the audio is fetched,
    /// the previous buffer is swapped out, and the sink is given the
    /// new one. An autoplay refusal from the sink leaves the session
    /// paused rather than failing the load.
    pub async fn load(&mut self, track: Track, autoplay: bool) -> Result<()> {
        if !self.surface.is_ready() {
            debug!(track_id = %track.id, autoplay, "Surface not bound, parking load request");
            self.surface.queue_load(track, autoplay);
            return Ok(());
        }

        self.load_generation += 1;
        let generation = self.load_generation;
        let prev_status = self.status;

        self.audio_loading = true;
        self.set_status(TransportStatus::Loading);

        let bytes = match self.catalog.fetch_audio(&track.id).await {
            Ok(bytes) => bytes,
            Err(err) => {
                self.audio_loading = false;
                // Leave whatever was playing before untouched
                let restored = if self.buffer.is_loaded()
                    && matches!(
                        prev_status,
                        TransportStatus::Playing | TransportStatus::Paused
                    ) {
                    prev_status
                } else {
                    TransportStatus::Idle
                };
                self.set_status(restored);
                return Err(err.into());
            }
        };

        if generation != self.load_generation {
            debug!(track_id = %track.id, "Load superseded by a newer request, dropping result");
            return Ok(());
        }

        self.buffer.acquire(track.id.clone(), bytes);

        let load_result = {
            let buffer = self
                .buffer
                .current()
                .ok_or(PlaybackError::NoTrackLoaded)?;
            self.surface.sink_mut()?.load(buffer)
        };
        if let Err(err) = load_result {
            self.buffer.release();
            self.audio_loading = false;
            self.set_status(TransportStatus::Idle);
            return Err(PlaybackError::Sink(err.to_string()));
        }

        // Bounded wait: a sink that never signals readiness must not
        // wedge the session.
        let ready_wait = self.config.ready_wait();
        let waited = {
            let sink = self.surface.sink_mut()?;
            timeout(ready_wait, sink.wait_until_ready()).await
        };
        if waited.is_err() {
            debug!(track_id = %track.id, wait_ms = self.config.ready_wait_ms,
                "Sink readiness signal timed out, proceeding");
        }

        let previous_track_id = self.current.replace(track.clone()).map(|t| t.id);
        self.position = 0.0;
        self.duration = track.duration_secs;
        self.audio_loading = false;
        self.history.record(track.clone());
        self.emit(SessionEvent::TrackChanged {
            track_id: track.id.clone(),
            previous_track_id,
        });

        if autoplay {
            let played = self.surface.sink_mut()?.play().await;
            match played {
                Ok(()) => self.set_status(TransportStatus::Playing),
                Err(err) => {
                    // Autoplay refusals are expected on some platforms
                    warn!(track_id = %track.id, error = %err, "Playback start refused, staying paused");
                    self.set_status(TransportStatus::Paused);
                }
            }
        } else {
            self.set_status(TransportStatus::Paused);
        }

        Ok(())
    }

    /// Play a track, or toggle the current one.
    ///
    /// If `track` is already current with a live buffer, this toggles
    /// play/pause in place. Otherwise it loads the track with
    /// autoplay. Waits briefly for the surface before an in-place
    /// resume; a fresh load parks instead of waiting.
    pub async fn play(&mut self, track: Track) -> Result<()> {
        let mut attempts = 0;
        while !self.surface.is_ready() && attempts < self.config.play_retry_attempts {
            attempts += 1;
            debug!(attempt = attempts, "Surface not ready, retrying shortly");
            sleep(self.config.play_retry_delay()).await;
        }

        let resume_in_place = self.current.as_ref().is_some_and(|c| c.id == track.id)
            && self.buffer.holds_track(&track.id);

        if resume_in_place {
            if !self.surface.is_ready() {
                return Err(PlaybackError::PlayerNotReady);
            }
            if self.status == TransportStatus::Playing {
                self.pause();
                Ok(())
            } else {
                self.resume().await
            }
        } else {
            self.load(track, true).await
        }
    }

    /// Resume the loaded track.
    ///
    /// # Errors
    /// `PlayerNotReady` when no track/buffer is loaded; `Sink` when
    /// the sink refuses an explicit, user-initiated start.
    pub async fn resume(&mut self) -> Result<()> {
        if self.current.is_none() || !self.buffer.is_loaded() {
            return Err(PlaybackError::PlayerNotReady);
        }
        let sink = self
            .surface
            .sink_mut()
            .map_err(|_| PlaybackError::PlayerNotReady)?;

        match sink.play().await {
            Ok(()) => {
                self.set_status(TransportStatus::Playing);
                Ok(())
            }
            Err(err) => Err(PlaybackError::Sink(err.to_string())),
        }
    }

    /// Pause playback, keeping the buffer and position.
    pub fn pause(&mut self) {
        if self.status != TransportStatus::Playing {
            return;
        }
        if let Ok(sink) = self.surface.sink_mut() {
            sink.pause();
        }
        self.set_status(TransportStatus::Paused);
    }

    /// Toggle play/pause for the current track.
    ///
    /// A no-op when nothing is loaded or the surface never bound.
    pub async fn toggle(&mut self) -> Result<()> {
        if self.current.is_none() || !self.surface.is_ready() {
            return Ok(());
        }
        if self.status == TransportStatus::Playing {
            self.pause();
            Ok(())
        } else {
            self.resume().await
        }
    }

    /// Stop playback and unload the current track.
    pub fn stop(&mut self) {
        if let Ok(sink) = self.surface.sink_mut() {
            sink.pause();
            sink.set_position(0.0);
        }
        self.buffer.release();
        self.current = None;
        self.position = 0.0;
        self.duration = 0.0;
        self.set_status(TransportStatus::Idle);
    }

    /// Move the playhead to `seconds`.
    ///
    /// # Errors
    /// `SurfaceNotReady` when no sink is bound.
    pub fn seek(&mut self, seconds: f64) -> Result<()> {
        let seconds = seconds.max(0.0);
        self.surface.sink_mut()?.set_position(seconds);
        self.position = seconds;
        self.emit(SessionEvent::PositionChanged {
            position_secs: self.position,
            duration_secs: self.duration,
        });
        Ok(())
    }

    // =========================================================================
    // Volume, rate, loop mode
    // =========================================================================

    /// Set output volume. Zero mutes; any positive value unmutes.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.muted = self.volume == 0.0;
        if let Ok(sink) = self.surface.sink_mut() {
            sink.set_volume(self.volume);
            sink.set_muted(self.muted);
        }
        self.emit(SessionEvent::VolumeChanged {
            volume: self.volume,
            muted: self.muted,
        });
    }

    /// Set the mute flag without touching volume.
    pub fn set_mute(&mut self, muted: bool) {
        self.muted = muted;
        if let Ok(sink) = self.surface.sink_mut() {
            sink.set_muted(muted);
        }
        self.emit(SessionEvent::VolumeChanged {
            volume: self.volume,
            muted: self.muted,
        });
    }

    /// Flip the mute flag.
    ///
    /// Unmuting at zero volume would be inaudible, so the volume is
    /// raised to a floor while the flag still toggles.
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        if self.volume == 0.0 {
            self.volume = MIN_AUDIBLE_VOLUME;
            if let Ok(sink) = self.surface.sink_mut() {
                sink.set_volume(self.volume);
            }
        }
        if let Ok(sink) = self.surface.sink_mut() {
            sink.set_muted(self.muted);
        }
        self.emit(SessionEvent::VolumeChanged {
            volume: self.volume,
            muted: self.muted,
        });
    }

    /// Set the playback rate (1.0 = normal).
    pub fn set_rate(&mut self, rate: f32) {
        if rate <= 0.0 || !rate.is_finite() {
            return;
        }
        self.rate = rate;
        if let Ok(sink) = self.surface.sink_mut() {
            sink.set_rate(rate);
        }
    }

    /// Set the loop mode.
    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        self.loop_mode = mode;
        if let Ok(sink) = self.surface.sink_mut() {
            sink.set_looping(mode == LoopMode::One);
        }
        self.emit(SessionEvent::LoopModeChanged { mode });
    }

    /// Advance the loop mode through None -> One -> All.
    pub fn cycle_loop_mode(&mut self) {
        self.set_loop_mode(self.loop_mode.cycled());
    }

    /// Let fetched pages preload their first track (paused) when
    /// nothing is current.
    pub fn enable_autoplay(&mut self) {
        self.autoplay_enabled = true;
    }

    /// Stop preloading on page fetches.
    pub fn disable_autoplay(&mut self) {
        self.autoplay_enabled = false;
    }

    // =========================================================================
    // Catalog window and navigation
    // =========================================================================

    /// Fetch a catalog page into the window.
    ///
    /// The query (filter plus page cursor) is retained for later
    /// navigation. With autoplay enabled and nothing current, the
    /// page's first track is preloaded paused; a preload failure is
    /// logged, not raised.
    pub async fn fetch_page(&mut self, query: TrackQuery) -> Result<()> {
        self.replace_window(query).await?;

        if self.autoplay_enabled && self.current.is_none() {
            if let Some(first) = self.window.first().cloned() {
                debug!(track_id = %first.id, "Preloading first track of fetched page");
                if let Err(err) = self.load(first, false).await {
                    warn!(error = %err, "Preload of first track failed");
                }
            }
        }
        Ok(())
    }

    /// Advance to the track after the current one.
    ///
    /// Falls off the window into the next page, and wraps from the
    /// catalog's end back to page 1. A no-op with no current track or
    /// an empty window.
    pub async fn next(&mut self) -> Result<()> {
        let Some(current_id) = self.current.as_ref().map(|t| t.id.clone()) else {
            return Ok(());
        };
        let step = self.window.next_step(&current_id);
        self.apply_nav_step(step).await
    }

    /// Step back to the track before the current one.
    ///
    /// Mirrors [`next`](Self::next): crosses into the previous page,
    /// and wraps from page 1 to the final page.
    pub async fn previous(&mut self) -> Result<()> {
        let Some(current_id) = self.current.as_ref().map(|t| t.id.clone()) else {
            return Ok(());
        };
        let step = self.window.previous_step(&current_id);
        self.apply_nav_step(step).await
    }

    /// Delete a track from the catalog.
    ///
    /// Deleting the current track stops playback and releases the
    /// buffer. The window shrinks; history keeps its entry.
    pub async fn delete_track(&mut self, track_id: &str) -> Result<()> {
        self.catalog.delete_track(track_id).await?;
        info!(track_id = %track_id, "Track deleted from catalog");

        if self.current.as_ref().is_some_and(|t| t.id == track_id) {
            self.stop();
        }
        if self.window.remove_track(track_id) {
            self.emit(SessionEvent::WindowChanged {
                page: self.window.page(),
                total: self.window.total(),
            });
        }
        Ok(())
    }

    async fn replace_window(&mut self, query: TrackQuery) -> Result<()> {
        self.list_loading = true;
        debug!(page = query.page, title = ?query.title, "Fetching catalog page");

        let fetched = match self.catalog.fetch_page(&query).await {
            Ok(page) => page,
            Err(err) => {
                // Window stays as it was
                self.list_loading = false;
                return Err(err.into());
            }
        };

        self.filter = query.with_page(fetched.page.max(1));
        self.window = PageWindow::from_page(fetched);
        self.list_loading = false;
        self.emit(SessionEvent::WindowChanged {
            page: self.window.page(),
            total: self.window.total(),
        });
        Ok(())
    }

    async fn apply_nav_step(&mut self, step: NavStep) -> Result<()> {
        match step {
            NavStep::None => Ok(()),
            NavStep::Within(index) => match self.window.get(index).cloned() {
                Some(track) => self.play(track).await,
                None => Ok(()),
            },
            NavStep::Fetch { page, land } => {
                let query = self.filter.with_page(page);
                self.replace_window(query).await?;
                let target = match land {
                    Landing::First => self.window.first().cloned(),
                    Landing::Last => self.window.last().cloned(),
                };
                match target {
                    Some(track) => self.play(track).await,
                    None => Ok(()),
                }
            }
        }
    }

    // =========================================================================
    // Sink event entry points
    // =========================================================================

    /// Sink decoded the media headers; its duration wins over the
    /// catalog's value.
    pub fn handle_metadata_loaded(&mut self, duration_secs: f64) {
        if duration_secs.is_finite() && duration_secs >= 0.0 {
            self.duration = duration_secs;
        }
    }

    /// Periodic playhead update from the sink.
    pub fn handle_position_update(&mut self, position_secs: f64) {
        self.position = position_secs.max(0.0);
        self.emit(SessionEvent::PositionChanged {
            position_secs: self.position,
            duration_secs: self.duration,
        });
    }

    /// The current track played to its end.
    ///
    /// Loop one restarts it, loop all advances, otherwise the session
    /// goes idle at position zero. Failures here are background noise
    /// and are absorbed.
    pub async fn handle_track_ended(&mut self) {
        let Some(track_id) = self.current.as_ref().map(|t| t.id.clone()) else {
            return;
        };
        self.emit(SessionEvent::TrackFinished {
            track_id: track_id.clone(),
        });

        match self.loop_mode {
            LoopMode::One => {
                self.position = 0.0;
                let restarted = match self.surface.sink_mut() {
                    Ok(sink) => {
                        sink.set_position(0.0);
                        sink.play().await
                    }
                    Err(_) => Ok(()),
                };
                match restarted {
                    Ok(()) => self.set_status(TransportStatus::Playing),
                    Err(err) => {
                        warn!(track_id = %track_id, error = %err, "Loop restart refused");
                        self.set_status(TransportStatus::Paused);
                    }
                }
            }
            LoopMode::All => {
                if let Err(err) = self.next().await {
                    warn!(track_id = %track_id, error = %err, "Auto-advance failed");
                }
            }
            LoopMode::None => {
                self.position = 0.0;
                self.set_status(TransportStatus::Idle);
            }
        }
    }

    /// The sink reported a fault outside any session call.
    pub fn handle_sink_error(&mut self, message: &str) {
        warn!(message = %message, "Sink fault");
        self.audio_loading = false;
        let downgraded = if self.buffer.is_loaded() {
            TransportStatus::Paused
        } else {
            TransportStatus::Idle
        };
        self.set_status(downgraded);
        self.emit(SessionEvent::SinkFault {
            message: message.to_string(),
        });
    }

    // =========================================================================
    // State access
    // =========================================================================

    /// Current transport status.
    pub fn status(&self) -> TransportStatus {
        self.status
    }

    /// Track the session is centered on, if any.
    pub fn current_track(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    /// Track id of the live audio buffer, if any.
    pub fn buffered_track_id(&self) -> Option<&str> {
        self.buffer.current().map(|b| b.track_id())
    }

    /// Tracks in the resident catalog window.
    pub fn window_tracks(&self) -> &[Track] {
        self.window.tracks()
    }

    /// Play history, most recent first.
    pub fn history(&self) -> impl Iterator<Item = &Track> {
        self.history.tracks()
    }

    /// Point-in-time copy of the session state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            current: self.current.clone(),
            status: self.status,
            position_secs: self.position,
            duration_secs: self.duration,
            volume: self.volume,
            muted: self.muted,
            rate: self.rate,
            loop_mode: self.loop_mode,
            list_loading: self.list_loading,
            audio_loading: self.audio_loading,
            page: self.window.page(),
            total: self.window.total(),
        }
    }

    /// Drain events queued since the last call.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn emit(&mut self, event: SessionEvent) {
        self.pending_events.push(event);
    }

    fn set_status(&mut self, status: TransportStatus) {
        if self.status != status {
            self.status = status;
            self.emit(SessionEvent::StateChanged { status });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::test_sink::{SinkState, TestSink};
    use async_trait::async_trait;
    use bytes::Bytes;
    use nimbus_core::{CatalogError, TrackPage};
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Mutex;

    fn create_test_track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            title: format!("Track {id}"),
            artist: "Test Artist".to_string(),
            album: Some("Test Album".to_string()),
            duration_secs: 180.0,
            file_size: 1024,
            file_type: "mp3".to_string(),
            play_count: 0,
            cover_url: None,
        }
    }

    struct FakeCatalog {
        tracks: Vec<Track>,
        fail_audio: AtomicBool,
        deleted: Mutex<Vec<String>>,
        page_fetches: AtomicU32,
    }

    impl FakeCatalog {
        fn with_tracks(count: u32) -> Arc<Self> {
            Arc::new(Self {
                tracks: (1..=count)
                    .map(|i| create_test_track(&i.to_string()))
                    .collect(),
                fail_audio: AtomicBool::new(false),
                deleted: Mutex::new(Vec::new()),
                page_fetches: AtomicU32::new(0),
            })
        }
    }

    #[async_trait]
    impl Catalog for FakeCatalog {
        async fn fetch_page(&self, query: &TrackQuery) -> nimbus_core::Result<TrackPage> {
            self.page_fetches.fetch_add(1, Ordering::SeqCst);
            let size = query.page_size as usize;
            let start = (query.page.saturating_sub(1) as usize) * size;
            Ok(TrackPage {
                tracks: self.tracks.iter().skip(start).take(size).cloned().collect(),
                page: query.page,
                page_size: query.page_size,
                total: self.tracks.len() as u64,
            })
        }

        async fn fetch_audio(&self, track_id: &str) -> nimbus_core::Result<Bytes> {
            if self.fail_audio.load(Ordering::SeqCst) {
                return Err(CatalogError::network("connection reset"));
            }
            Ok(Bytes::from(format!("audio:{track_id}")))
        }

        async fn delete_track(&self, track_id: &str) -> nimbus_core::Result<()> {
            self.deleted.lock().unwrap().push(track_id.to_string());
            Ok(())
        }
    }

    fn session(catalog: &Arc<FakeCatalog>) -> PlayerSession {
        PlayerSession::new(
            Arc::clone(catalog) as Arc<dyn Catalog>,
            SessionConfig::default(),
        )
    }

    async fn bound_session(
        catalog: &Arc<FakeCatalog>,
    ) -> (PlayerSession, Arc<Mutex<SinkState>>) {
        let mut session = session(catalog);
        let (sink, state) = TestSink::new();
        session.bind_surface(Box::new(sink)).await;
        (session, state)
    }

    // =========================================================================
    // Loading and surface binding
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn play_before_bind_parks_and_drains_on_bind() {
        let catalog = FakeCatalog::with_tracks(3);
        let mut session = session(&catalog);

        // No surface yet: parked, not an error
        session.play(create_test_track("1")).await.unwrap();
        session.play(create_test_track("2")).await.unwrap();
        assert!(session.current_track().is_none());

        let (sink, state) = TestSink::new();
        session.bind_surface(Box::new(sink)).await;

        // Only the latest request ran, with autoplay
        assert_eq!(session.current_track().unwrap().id, "2");
        assert_eq!(session.status(), TransportStatus::Playing);
        assert!(state.lock().unwrap().playing);
        assert_eq!(state.lock().unwrap().play_calls, 1);
    }

    #[tokio::test]
    async fn load_swaps_single_live_buffer() {
        let catalog = FakeCatalog::with_tracks(3);
        let (mut session, state) = bound_session(&catalog).await;

        session.load(create_test_track("1"), false).await.unwrap();
        assert_eq!(session.buffered_track_id(), Some("1"));

        session.load(create_test_track("2"), false).await.unwrap();
        assert_eq!(session.buffered_track_id(), Some("2"));
        assert_eq!(state.lock().unwrap().loaded_track.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn fetch_failure_keeps_previous_track_playing() {
        let catalog = FakeCatalog::with_tracks(3);
        let (mut session, state) = bound_session(&catalog).await;

        session.play(create_test_track("1")).await.unwrap();
        assert_eq!(session.status(), TransportStatus::Playing);

        catalog.fail_audio.store(true, Ordering::SeqCst);
        let result = session.load(create_test_track("2"), true).await;

        assert!(matches!(result, Err(PlaybackError::Fetch(_))));
        assert_eq!(session.current_track().unwrap().id, "1");
        assert_eq!(session.buffered_track_id(), Some("1"));
        assert_eq!(session.status(), TransportStatus::Playing);
        assert!(state.lock().unwrap().playing);
    }

    #[tokio::test]
    async fn autoplay_refusal_leaves_session_paused() {
        let catalog = FakeCatalog::with_tracks(3);
        let mut session = session(&catalog);
        let (mut sink, state) = TestSink::new();
        sink.block_autoplay = true;
        session.bind_surface(Box::new(sink)).await;

        // Refusal is swallowed: Ok, paused, track still current
        session.load(create_test_track("1"), true).await.unwrap();
        assert_eq!(session.status(), TransportStatus::Paused);
        assert_eq!(session.current_track().unwrap().id, "1");
        assert!(!state.lock().unwrap().playing);
    }

    #[tokio::test(start_paused = true)]
    async fn unready_sink_times_out_and_proceeds() {
        let catalog = FakeCatalog::with_tracks(3);
        let mut session = session(&catalog);
        let (mut sink, _state) = TestSink::new();
        sink.never_ready = true;
        session.bind_surface(Box::new(sink)).await;

        session.load(create_test_track("1"), true).await.unwrap();
        assert_eq!(session.current_track().unwrap().id, "1");
        assert_eq!(session.status(), TransportStatus::Playing);
    }

    // =========================================================================
    // Transport
    // =========================================================================

    #[tokio::test]
    async fn play_same_track_toggles() {
        let catalog = FakeCatalog::with_tracks(3);
        let (mut session, state) = bound_session(&catalog).await;

        let track = create_test_track("1");
        session.play(track.clone()).await.unwrap();
        assert_eq!(session.status(), TransportStatus::Playing);

        session.play(track.clone()).await.unwrap();
        assert_eq!(session.status(), TransportStatus::Paused);
        assert!(!state.lock().unwrap().playing);

        session.play(track).await.unwrap();
        assert_eq!(session.status(), TransportStatus::Playing);
    }

    #[tokio::test]
    async fn resume_without_track_is_not_ready() {
        let catalog = FakeCatalog::with_tracks(3);
        let (mut session, _state) = bound_session(&catalog).await;

        let result = session.resume().await;
        assert!(matches!(result, Err(PlaybackError::PlayerNotReady)));
    }

    #[tokio::test]
    async fn explicit_resume_refusal_is_an_error() {
        let catalog = FakeCatalog::with_tracks(3);
        let mut session = session(&catalog);
        let (mut sink, _state) = TestSink::new();
        sink.block_autoplay = true;
        session.bind_surface(Box::new(sink)).await;

        session.load(create_test_track("1"), false).await.unwrap();
        let result = session.resume().await;
        assert!(matches!(result, Err(PlaybackError::Sink(_))));
        assert_eq!(session.status(), TransportStatus::Paused);
    }

    #[tokio::test]
    async fn toggle_without_surface_is_noop() {
        let catalog = FakeCatalog::with_tracks(3);
        let mut session = session(&catalog);

        session.toggle().await.unwrap();
        assert_eq!(session.status(), TransportStatus::Idle);
    }

    #[tokio::test]
    async fn seek_requires_surface() {
        let catalog = FakeCatalog::with_tracks(3);
        let mut session = session(&catalog);

        let result = session.seek(30.0);
        assert!(matches!(result, Err(PlaybackError::SurfaceNotReady)));
    }

    #[tokio::test]
    async fn seek_moves_sink_and_session() {
        let catalog = FakeCatalog::with_tracks(3);
        let (mut session, state) = bound_session(&catalog).await;

        session.play(create_test_track("1")).await.unwrap();
        session.seek(42.5).unwrap();

        assert_eq!(state.lock().unwrap().position, 42.5);
        assert_eq!(session.snapshot().position_secs, 42.5);
    }

    #[tokio::test]
    async fn stop_unloads_everything() {
        let catalog = FakeCatalog::with_tracks(3);
        let (mut session, state) = bound_session(&catalog).await;

        session.play(create_test_track("1")).await.unwrap();
        session.stop();

        assert_eq!(session.status(), TransportStatus::Idle);
        assert!(session.current_track().is_none());
        assert!(session.buffered_track_id().is_none());
        assert_eq!(session.snapshot().position_secs, 0.0);
        assert!(!state.lock().unwrap().playing);
    }

    // =========================================================================
    // Volume and mute coupling
    // =========================================================================

    #[tokio::test]
    async fn zero_volume_mutes_positive_unmutes() {
        let catalog = FakeCatalog::with_tracks(3);
        let (mut session, state) = bound_session(&catalog).await;

        session.set_volume(0.0);
        assert!(session.snapshot().muted);
        assert!(state.lock().unwrap().muted);

        session.set_volume(0.5);
        let snap = session.snapshot();
        assert!(!snap.muted);
        assert_eq!(snap.volume, 0.5);
        assert!(!state.lock().unwrap().muted);
    }

    #[tokio::test]
    async fn toggle_mute_at_zero_volume_applies_floor() {
        let catalog = FakeCatalog::with_tracks(3);
        let (mut session, state) = bound_session(&catalog).await;

        session.set_volume(0.0);
        assert!(session.snapshot().muted);

        // Unmute from zero: volume climbs to the floor
        session.toggle_mute();
        let snap = session.snapshot();
        assert!(!snap.muted);
        assert_eq!(snap.volume, 0.3);
        assert_eq!(state.lock().unwrap().volume, 0.3);
    }

    #[tokio::test]
    async fn volume_is_clamped() {
        let catalog = FakeCatalog::with_tracks(3);
        let (mut session, _state) = bound_session(&catalog).await;

        session.set_volume(1.7);
        assert_eq!(session.snapshot().volume, 1.0);
        session.set_volume(-0.2);
        let snap = session.snapshot();
        assert_eq!(snap.volume, 0.0);
        assert!(snap.muted);
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    #[tokio::test]
    async fn next_crosses_into_following_page() {
        // 12 tracks, page size 10
        let catalog = FakeCatalog::with_tracks(12);
        let (mut session, _state) = bound_session(&catalog).await;

        session.fetch_page(TrackQuery::first_page(10)).await.unwrap();
        session.play(create_test_track("10")).await.unwrap();

        session.next().await.unwrap();
        assert_eq!(session.current_track().unwrap().id, "11");
        assert_eq!(session.snapshot().page, 2);
        assert_eq!(session.status(), TransportStatus::Playing);
    }

    #[tokio::test]
    async fn next_wraps_from_catalog_end_to_page_one() {
        let catalog = FakeCatalog::with_tracks(12);
        let (mut session, _state) = bound_session(&catalog).await;

        session
            .fetch_page(TrackQuery::first_page(10).with_page(2))
            .await
            .unwrap();
        session.play(create_test_track("12")).await.unwrap();

        session.next().await.unwrap();
        assert_eq!(session.current_track().unwrap().id, "1");
        assert_eq!(session.snapshot().page, 1);
    }

    #[tokio::test]
    async fn previous_wraps_to_final_page() {
        let catalog = FakeCatalog::with_tracks(12);
        let (mut session, _state) = bound_session(&catalog).await;

        session.fetch_page(TrackQuery::first_page(10)).await.unwrap();
        session.play(create_test_track("1")).await.unwrap();

        session.previous().await.unwrap();
        assert_eq!(session.current_track().unwrap().id, "12");
        assert_eq!(session.snapshot().page, 2);
    }

    #[tokio::test]
    async fn next_within_page_plays_adjacent() {
        let catalog = FakeCatalog::with_tracks(5);
        let (mut session, _state) = bound_session(&catalog).await;

        session.fetch_page(TrackQuery::first_page(10)).await.unwrap();
        session.play(create_test_track("2")).await.unwrap();

        session.next().await.unwrap();
        assert_eq!(session.current_track().unwrap().id, "3");

        session.previous().await.unwrap();
        assert_eq!(session.current_track().unwrap().id, "2");
    }

    #[tokio::test]
    async fn navigation_without_current_is_noop() {
        let catalog = FakeCatalog::with_tracks(5);
        let (mut session, _state) = bound_session(&catalog).await;

        session.fetch_page(TrackQuery::first_page(10)).await.unwrap();
        let fetches = catalog.page_fetches.load(Ordering::SeqCst);

        session.next().await.unwrap();
        session.previous().await.unwrap();
        assert!(session.current_track().is_none());
        assert_eq!(catalog.page_fetches.load(Ordering::SeqCst), fetches);
    }

    // =========================================================================
    // Catalog window and deletion
    // =========================================================================

    #[tokio::test]
    async fn fetch_page_retains_filter_for_navigation() {
        let catalog = FakeCatalog::with_tracks(12);
        let (mut session, _state) = bound_session(&catalog).await;

        let query = TrackQuery::first_page(10).with_title("track");
        session.fetch_page(query).await.unwrap();
        assert_eq!(session.window_tracks().len(), 10);
        assert_eq!(session.snapshot().total, 12);
    }

    #[tokio::test]
    async fn autoplay_preloads_first_track_paused() {
        let catalog = FakeCatalog::with_tracks(5);
        let (mut session, state) = bound_session(&catalog).await;

        session.enable_autoplay();
        session.fetch_page(TrackQuery::first_page(10)).await.unwrap();

        assert_eq!(session.current_track().unwrap().id, "1");
        assert_eq!(session.status(), TransportStatus::Paused);
        assert!(!state.lock().unwrap().playing);
        assert_eq!(state.lock().unwrap().play_calls, 0);
    }

    #[tokio::test]
    async fn preload_skipped_when_track_already_current() {
        let catalog = FakeCatalog::with_tracks(5);
        let (mut session, _state) = bound_session(&catalog).await;

        session.enable_autoplay();
        session.play(create_test_track("3")).await.unwrap();
        session.fetch_page(TrackQuery::first_page(10)).await.unwrap();

        assert_eq!(session.current_track().unwrap().id, "3");
        assert_eq!(session.status(), TransportStatus::Playing);
    }

    #[tokio::test]
    async fn deleting_current_track_stops_playback() {
        let catalog = FakeCatalog::with_tracks(5);
        let (mut session, _state) = bound_session(&catalog).await;

        session.fetch_page(TrackQuery::first_page(10)).await.unwrap();
        session.play(create_test_track("2")).await.unwrap();

        session.delete_track("2").await.unwrap();

        assert_eq!(session.status(), TransportStatus::Idle);
        assert!(session.current_track().is_none());
        assert!(session.buffered_track_id().is_none());
        assert!(session.window_tracks().iter().all(|t| t.id != "2"));
        assert_eq!(session.snapshot().total, 4);
        assert_eq!(catalog.deleted.lock().unwrap().as_slice(), ["2"]);

        // History deliberately keeps the stale entry
        assert!(session.history().any(|t| t.id == "2"));
    }

    #[tokio::test]
    async fn deleting_other_track_keeps_playing() {
        let catalog = FakeCatalog::with_tracks(5);
        let (mut session, _state) = bound_session(&catalog).await;

        session.fetch_page(TrackQuery::first_page(10)).await.unwrap();
        session.play(create_test_track("2")).await.unwrap();

        session.delete_track("4").await.unwrap();
        assert_eq!(session.status(), TransportStatus::Playing);
        assert_eq!(session.current_track().unwrap().id, "2");
    }

    // =========================================================================
    // Track end handling
    // =========================================================================

    #[tokio::test]
    async fn track_end_without_loop_goes_idle() {
        let catalog = FakeCatalog::with_tracks(5);
        let (mut session, _state) = bound_session(&catalog).await;

        session.play(create_test_track("1")).await.unwrap();
        session.handle_track_ended().await;

        let snap = session.snapshot();
        assert_eq!(snap.status, TransportStatus::Idle);
        assert_eq!(snap.position_secs, 0.0);
    }

    #[tokio::test]
    async fn track_end_loop_one_restarts() {
        let catalog = FakeCatalog::with_tracks(5);
        let (mut session, state) = bound_session(&catalog).await;

        session.set_loop_mode(LoopMode::One);
        session.play(create_test_track("1")).await.unwrap();
        session.seek(170.0).unwrap();

        session.handle_track_ended().await;

        assert_eq!(session.status(), TransportStatus::Playing);
        assert_eq!(session.snapshot().position_secs, 0.0);
        assert_eq!(state.lock().unwrap().position, 0.0);
        assert_eq!(session.current_track().unwrap().id, "1");
    }

    #[tokio::test]
    async fn track_end_loop_all_advances() {
        let catalog = FakeCatalog::with_tracks(5);
        let (mut session, _state) = bound_session(&catalog).await;

        session.set_loop_mode(LoopMode::All);
        session.fetch_page(TrackQuery::first_page(10)).await.unwrap();
        session.play(create_test_track("1")).await.unwrap();

        session.handle_track_ended().await;
        assert_eq!(session.current_track().unwrap().id, "2");
        assert_eq!(session.status(), TransportStatus::Playing);
    }

    // =========================================================================
    // History and events
    // =========================================================================

    #[tokio::test]
    async fn plays_are_recorded_most_recent_first() {
        let catalog = FakeCatalog::with_tracks(5);
        let (mut session, _state) = bound_session(&catalog).await;

        session.play(create_test_track("1")).await.unwrap();
        session.play(create_test_track("2")).await.unwrap();
        session.play(create_test_track("1")).await.unwrap();

        // "1" is no longer buffered, so the third play reloads it and
        // promotes its history entry instead of duplicating it
        let ids: Vec<&str> = session.history().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn take_events_drains_queue() {
        let catalog = FakeCatalog::with_tracks(5);
        let (mut session, _state) = bound_session(&catalog).await;

        session.play(create_test_track("1")).await.unwrap();

        let events = session.take_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, SessionEvent::TrackChanged { track_id, .. } if track_id == "1")));
        assert!(events
            .iter()
            .any(|e| matches!(
                e,
                SessionEvent::StateChanged {
                    status: TransportStatus::Playing
                }
            )));

        assert!(session.take_events().is_empty());
    }

    #[tokio::test]
    async fn sink_fault_downgrades_status() {
        let catalog = FakeCatalog::with_tracks(5);
        let (mut session, _state) = bound_session(&catalog).await;

        session.play(create_test_track("1")).await.unwrap();
        session.handle_sink_error("element error");

        assert_eq!(session.status(), TransportStatus::Paused);
        assert!(session
            .take_events()
            .iter()
            .any(|e| matches!(e, SessionEvent::SinkFault { .. })));
    }

    #[tokio::test]
    async fn metadata_duration_overrides_catalog_value() {
        let catalog = FakeCatalog::with_tracks(5);
        let (mut session, _state) = bound_session(&catalog).await;

        session.play(create_test_track("1")).await.unwrap();
        assert_eq!(session.snapshot().duration_secs, 180.0);

        session.handle_metadata_loaded(183.4);
        assert_eq!(session.snapshot().duration_secs, 183.4);
    }

    #[tokio::test]
    async fn teardown_releases_buffer_but_keeps_session() {
        let catalog = FakeCatalog::with_tracks(5);
        let (mut session, state) = bound_session(&catalog).await;

        session.play(create_test_track("1")).await.unwrap();
        session.teardown();

        assert!(session.buffered_track_id().is_none());
        assert_eq!(session.status(), TransportStatus::Idle);
        assert!(!state.lock().unwrap().playing);

        // Still usable afterwards
        session.play(create_test_track("2")).await.unwrap();
        assert_eq!(session.status(), TransportStatus::Playing);
    }
}
