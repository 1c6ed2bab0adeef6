// Playlist cursor state machine driving the media engine

use crate::callback::{ControllerEvent, ControllerListener, Edge, ListenerSet};
use crate::config::ControllerConfig;
use crate::engine::{EngineEvent, EngineNotifier, MediaEngine};
use crate::error::{PlaybackError, Result};
use crate::hook::{CompletionHook, DirectAdvance};
use crate::resolver::TrackResolver;
use crate::session::{MediaSession, TransportCommand};
use crate::state::{validate_transition, PlaybackPhase, UNSET_DURATION_MS};
use crate::track::{Playlist, Track};
use std::sync::Arc;

/// Result of a skip request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Cursor moved and a load was issued
    Moved,
    /// Cursor was already at the playlist edge and stayed there
    Boundary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    NotAttached,
    Attached,
    Detached,
}

/// Tracks what should be playing and drives the engine accordingly.
///
/// All methods are meant to be called from a single owning context. The
/// engine reports back through an [`EngineNotifier`]; the owner applies
/// those reports with [`PlaybackController::dispatch_pending`]. Every load
/// carries a generation, and reports for any other generation are dropped,
/// so a late "ready" for a superseded track never starts it.
pub struct PlaybackController {
    engine: Box<dyn MediaEngine>,
    resolver: Box<dyn TrackResolver>,
    hook: Arc<dyn CompletionHook>,
    session: Option<Box<dyn MediaSession>>,
    session_state: SessionState,
    listeners: ListenerSet,
    notifier: EngineNotifier,
    config: ControllerConfig,
    playlist: Playlist,
    cursor: Option<usize>,
    started: bool,
    auto_advance: bool,
    phase: PlaybackPhase,
    next_generation: u64,
    active_generation: Option<u64>,
    released: bool,
}

impl PlaybackController {
    pub fn new(engine: Box<dyn MediaEngine>, resolver: Box<dyn TrackResolver>) -> Self {
        Self::with_config(engine, resolver, ControllerConfig::default())
    }

    pub fn with_config(
        mut engine: Box<dyn MediaEngine>,
        resolver: Box<dyn TrackResolver>,
        config: ControllerConfig,
    ) -> Self {
        let notifier = EngineNotifier::new();
        engine.set_notifier(notifier.clone());
        log::info!("Creating playback controller: {:?}", config);

        Self {
            engine,
            resolver,
            hook: Arc::new(DirectAdvance),
            session: None,
            session_state: SessionState::NotAttached,
            listeners: ListenerSet::new(),
            notifier,
            auto_advance: config.auto_advance,
            config,
            playlist: Playlist::default(),
            cursor: None,
            started: false,
            phase: PlaybackPhase::Idle,
            next_generation: 0,
            active_generation: None,
            released: false,
        }
    }

    // ---------------------------------------------------------------------
    // Playlist and cursor
    // ---------------------------------------------------------------------

    /// Replace the playlist. The cursor goes back to the first track and
    /// nothing is loaded until `play` is called.
    pub fn set_playlist(&mut self, tracks: impl Into<Playlist>) {
        self.playlist = tracks.into();
        self.cursor = if self.playlist.is_empty() { None } else { Some(0) };
        self.started = false;
        self.active_generation = None;
        self.set_phase(PlaybackPhase::Idle);

        log::info!("Playlist replaced: {} tracks", self.playlist.len());
        self.listeners.dispatch(ControllerEvent::PlaylistReplaced {
            len: self.playlist.len(),
        });
    }

    /// Select a track directly. Out-of-range indices are a caller error and
    /// leave the cursor untouched.
    pub fn set_cursor(&mut self, index: usize) -> Result<()> {
        if index >= self.playlist.len() {
            return Err(PlaybackError::InvalidCursor {
                index,
                len: self.playlist.len(),
            });
        }
        if self.cursor != Some(index) {
            // The engine still holds the previous selection
            self.started = false;
            self.select(index);
        }
        Ok(())
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.cursor.and_then(|index| self.playlist.get(index))
    }

    fn select(&mut self, index: usize) {
        self.cursor = Some(index);
        log::debug!("Cursor moved to {}", index);
        self.listeners
            .dispatch(ControllerEvent::TrackSelected { index });
    }

    // ---------------------------------------------------------------------
    // Transport
    // ---------------------------------------------------------------------

    /// Reset the engine and request an asynchronous load of the selected
    /// track. Failures are logged and leave playback stopped.
    pub fn play(&mut self) {
        match self.load_selected() {
            Ok(generation) => log::debug!("Load requested, generation {}", generation),
            Err(PlaybackError::EmptyPlaylist) => {
                log::warn!("play() ignored: playlist is empty");
            }
            Err(err @ PlaybackError::ResourceResolution(_)) => {
                log::error!("Failed to resolve track: {}", err);
                self.set_phase(PlaybackPhase::Failed);
                if let Some(index) = self.cursor {
                    self.listeners.dispatch(ControllerEvent::ResolutionFailed {
                        index,
                        message: err.to_string(),
                    });
                }
            }
            Err(err) => {
                self.set_phase(PlaybackPhase::Failed);
                self.report_engine_error(err);
            }
        }
    }

    fn load_selected(&mut self) -> Result<u64> {
        if self.released {
            return Err(PlaybackError::InvalidState(
                "Controller already released".to_string(),
            ));
        }
        let index = self.cursor.ok_or(PlaybackError::EmptyPlaylist)?;
        let track = self
            .playlist
            .get(index)
            .cloned()
            .ok_or(PlaybackError::InvalidCursor {
                index,
                len: self.playlist.len(),
            })?;

        self.next_generation += 1;
        let generation = self.next_generation;
        self.active_generation = None;

        self.engine.reset();
        self.started = false;
        self.set_phase(PlaybackPhase::Loading);

        let resource = self.resolver.resolve(&track)?;
        log::info!(
            "Loading track {} ({} \"{}\") from {}",
            index,
            track.id(),
            track.title().unwrap_or("untitled"),
            resource
        );

        self.active_generation = Some(generation);
        if let Err(err) = self.engine.load_async(&resource, generation) {
            self.active_generation = None;
            return Err(err);
        }

        self.listeners
            .dispatch(ControllerEvent::LoadRequested { index, generation });
        Ok(generation)
    }

    pub fn pause(&mut self) {
        if self.playlist.is_empty() {
            log::debug!("pause() ignored: playlist is empty");
            return;
        }
        log::info!("Pausing playback");
        if let Err(err) = self.engine.pause() {
            self.report_engine_error(err);
            return;
        }
        let can_pause = match self.phase {
            PlaybackPhase::Playing => true,
            PlaybackPhase::Failed => self.started,
            _ => false,
        };
        if can_pause {
            self.set_phase(PlaybackPhase::Paused);
        }
    }

    /// Continue playback. Before the selected track has started this is a
    /// cold start identical to `play`.
    pub fn resume(&mut self) {
        if !self.started {
            self.play();
            return;
        }

        log::info!("Resuming playback");
        if self.config.resync_on_resume {
            let position_ms = self.engine.current_position_ms();
            if let Err(err) = self.engine.seek_to(position_ms) {
                self.report_engine_error(err);
            }
        }
        match self.engine.start() {
            Ok(()) => self.set_phase(PlaybackPhase::Playing),
            Err(err) => self.report_engine_error(err),
        }
    }

    /// Forward a seek to the engine; range checks are the engine's business
    pub fn seek(&mut self, position_ms: u64) {
        if self.playlist.is_empty() {
            log::debug!("seek() ignored: playlist is empty");
            return;
        }
        log::debug!("Seeking to {} ms", position_ms);
        if let Err(err) = self.engine.seek_to(position_ms) {
            self.report_engine_error(err);
        }
    }

    /// Move to the next track and load it. At the last track the cursor
    /// stays put and the engine is sent to the end of the current track.
    pub fn next(&mut self) -> StepOutcome {
        let Some(cursor) = self.cursor else {
            log::debug!("next() ignored: playlist is empty");
            return StepOutcome::Boundary;
        };

        if self.playlist.last_index() == Some(cursor) {
            log::info!("Already at the last track");
            let end_ms = self.current_duration_ms();
            if let Err(err) = self.engine.seek_to(end_ms) {
                self.report_engine_error(err);
            }
            self.listeners
                .dispatch(ControllerEvent::Boundary { edge: Edge::End });
            return StepOutcome::Boundary;
        }

        self.started = false;
        self.select(cursor + 1);
        self.play();
        StepOutcome::Moved
    }

    /// Move to the previous track and load it. At the first track the
    /// cursor stays put but the first track is reloaded from the start.
    pub fn prev(&mut self) -> StepOutcome {
        let Some(cursor) = self.cursor else {
            log::debug!("prev() ignored: playlist is empty");
            return StepOutcome::Boundary;
        };

        self.started = false;
        match cursor.checked_sub(1) {
            Some(target) => {
                self.select(target);
                self.play();
                StepOutcome::Moved
            }
            None => {
                log::info!("Already at the first track, restarting it");
                self.listeners
                    .dispatch(ControllerEvent::Boundary { edge: Edge::Start });
                self.play();
                StepOutcome::Boundary
            }
        }
    }

    /// Apply a command coming from the media session or notification
    pub fn handle_command(&mut self, command: TransportCommand) -> Option<StepOutcome> {
        log::debug!("Transport command: {:?}", command);
        match command {
            TransportCommand::Play => self.resume(),
            TransportCommand::Pause => self.pause(),
            TransportCommand::TogglePlayPause => {
                if self.is_playing() {
                    self.pause();
                } else {
                    self.resume();
                }
            }
            TransportCommand::Next => return Some(self.next()),
            TransportCommand::Previous => return Some(self.prev()),
            TransportCommand::SeekTo(position_ms) => self.seek(position_ms),
        }
        None
    }

    pub fn set_auto_advance(&mut self, enabled: bool) {
        log::debug!("Auto-advance set to {}", enabled);
        self.auto_advance = enabled;
    }

    pub fn auto_advance(&self) -> bool {
        self.auto_advance
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn is_playing(&self) -> bool {
        self.engine.is_playing()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn current_position_ms(&self) -> u64 {
        self.engine.current_position_ms()
    }

    /// Engine duration while playing, `UNSET_DURATION_MS` otherwise
    pub fn current_duration_ms(&self) -> u64 {
        if self.engine.is_playing() {
            self.engine.duration_ms()
        } else {
            UNSET_DURATION_MS
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    /// Generation of the load the controller currently accepts reports for
    pub fn active_generation(&self) -> Option<u64> {
        self.active_generation
    }

    // ---------------------------------------------------------------------
    // Engine reports
    // ---------------------------------------------------------------------

    /// Handle for engines (or bridges) to queue reports from any thread
    pub fn notifier(&self) -> EngineNotifier {
        self.notifier.clone()
    }

    /// Apply every queued engine report in arrival order.
    /// Returns how many reports were taken off the queue.
    pub fn dispatch_pending(&mut self) -> usize {
        let events = self.notifier.drain();
        let count = events.len();
        for event in events {
            self.handle_event(event);
        }
        count
    }

    pub fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Prepared { generation } => self.on_engine_ready(generation),
            EngineEvent::Completed { generation } => self.on_track_finished(generation),
            EngineEvent::Error {
                generation,
                what,
                extra,
            } => self.on_engine_error(generation, what, extra),
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        if self.active_generation == Some(generation) {
            true
        } else {
            log::debug!(
                "Dropping stale engine report for generation {} (active {:?})",
                generation,
                self.active_generation
            );
            false
        }
    }

    /// The engine finished loading. The only place `started` becomes true.
    pub fn on_engine_ready(&mut self, generation: u64) {
        if !self.is_current(generation) {
            return;
        }
        if self.phase != PlaybackPhase::Loading {
            log::debug!("Ready report while {:?}, ignoring", self.phase);
            return;
        }

        match self.engine.start() {
            Ok(()) => {
                self.started = true;
                self.set_phase(PlaybackPhase::Playing);
                if let Some(index) = self.cursor {
                    log::info!("Playback started: track {}", index);
                    self.listeners
                        .dispatch(ControllerEvent::PlaybackStarted { index });
                }
            }
            Err(err) => {
                self.set_phase(PlaybackPhase::Failed);
                self.report_engine_error(err);
            }
        }
    }

    /// The selected track played to its end
    pub fn on_track_finished(&mut self, generation: u64) {
        if !self.is_current(generation) {
            return;
        }
        if let Some(index) = self.cursor {
            self.listeners
                .dispatch(ControllerEvent::TrackFinished { index });
        }

        if self.auto_advance {
            let hook = Arc::clone(&self.hook);
            hook.on_track_finished(self);
        } else {
            // Suppression covers exactly one completion
            log::debug!("Auto-advance suppressed for this completion");
            self.auto_advance = true;
        }
    }

    /// The engine failed. Terminal for the current load only.
    pub fn on_engine_error(&mut self, generation: u64, what: i32, extra: i32) {
        if !self.is_current(generation) {
            return;
        }
        self.active_generation = None;
        self.set_phase(PlaybackPhase::Failed);
        self.report_engine_error(PlaybackError::Engine(format!(
            "what={}, extra={}",
            what, extra
        )));
    }

    fn report_engine_error(&self, err: PlaybackError) {
        log::error!("{}", err);
        self.listeners.dispatch(ControllerEvent::EngineError {
            message: err.to_string(),
        });
    }

    fn set_phase(&mut self, new_phase: PlaybackPhase) {
        let old_phase = self.phase;
        if old_phase == new_phase {
            return;
        }
        if let Err(err) = validate_transition(old_phase, new_phase) {
            log::warn!("{}", err);
            return;
        }

        self.phase = new_phase;
        log::debug!("Playback phase changed to: {:?}", new_phase);
        self.listeners.dispatch(ControllerEvent::PhaseChanged {
            old_phase,
            new_phase,
        });
    }

    // ---------------------------------------------------------------------
    // Hooks, listeners, session
    // ---------------------------------------------------------------------

    /// Route auto-advance through `hook` instead of calling `next` directly
    pub fn set_completion_hook(&mut self, hook: Arc<dyn CompletionHook>) {
        self.hook = hook;
    }

    /// Go back to advancing directly on completion
    pub fn clear_completion_hook(&mut self) {
        self.hook = Arc::new(DirectAdvance);
    }

    pub fn add_listener(&self, listener: Arc<dyn ControllerListener>) {
        self.listeners.add(listener);
    }

    pub fn clear_listeners(&self) {
        self.listeners.clear();
    }

    /// Hand over the platform session. Allowed once per controller.
    pub fn attach_session(&mut self, mut session: Box<dyn MediaSession>) -> Result<()> {
        match self.session_state {
            SessionState::Attached => Err(PlaybackError::InvalidState(
                "Session already attached".to_string(),
            )),
            SessionState::Detached => Err(PlaybackError::InvalidState(
                "Session already ended".to_string(),
            )),
            SessionState::NotAttached => {
                session.attach()?;
                self.session = Some(session);
                self.session_state = SessionState::Attached;
                log::info!("Media session attached");
                Ok(())
            }
        }
    }

    /// Release the platform session. Allowed once, after `attach_session`.
    pub fn detach_session(&mut self) -> Result<()> {
        if self.session_state != SessionState::Attached {
            return Err(PlaybackError::InvalidState(format!(
                "Cannot detach session in state {:?}",
                self.session_state
            )));
        }
        if let Some(mut session) = self.session.take() {
            session.detach();
        }
        self.session_state = SessionState::Detached;
        log::info!("Media session detached");
        Ok(())
    }

    pub fn is_session_attached(&self) -> bool {
        self.session_state == SessionState::Attached
    }

    /// Tear down: detach the session if needed, then reset and release the
    /// engine. Safe to call more than once.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        log::info!("Releasing playback controller");

        if self.session_state == SessionState::Attached {
            let _ = self.detach_session();
        }
        self.active_generation = None;
        self.engine.reset();
        self.engine.release();
        self.released = true;
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.release();
    }
}
