// Test doubles shared by the controller tests

use crate::engine::{EngineNotifier, MediaEngine};
use crate::error::{PlaybackError, Result};
use crate::session::MediaSession;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Reset,
    Release,
    Load { resource: String, generation: u64 },
    Start,
    Pause,
    SeekTo(u64),
}

#[derive(Default)]
struct EngineState {
    calls: Vec<EngineCall>,
    playing: bool,
    position_ms: u64,
    duration_ms: u64,
    fail_load: bool,
    fail_start: bool,
    notifier: Option<EngineNotifier>,
}

/// Engine that records every call; clones share the same log
#[derive(Clone, Default)]
pub struct RecordingEngine {
    state: Arc<Mutex<EngineState>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    pub fn loads(&self) -> Vec<(String, u64)> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                EngineCall::Load {
                    resource,
                    generation,
                } => Some((resource.clone(), *generation)),
                _ => None,
            })
            .collect()
    }

    pub fn last_generation(&self) -> Option<u64> {
        self.loads().last().map(|(_, generation)| *generation)
    }

    pub fn set_playing(&self, playing: bool) {
        self.state.lock().playing = playing;
    }

    pub fn set_position_ms(&self, position_ms: u64) {
        self.state.lock().position_ms = position_ms;
    }

    pub fn set_duration_ms(&self, duration_ms: u64) {
        self.state.lock().duration_ms = duration_ms;
    }

    pub fn fail_load(&self, fail: bool) {
        self.state.lock().fail_load = fail;
    }

    pub fn fail_start(&self, fail: bool) {
        self.state.lock().fail_start = fail;
    }

    pub fn notifier(&self) -> EngineNotifier {
        self.state
            .lock()
            .notifier
            .clone()
            .expect("controller registers a notifier on construction")
    }
}

impl MediaEngine for RecordingEngine {
    fn reset(&mut self) {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::Reset);
        state.playing = false;
    }

    fn release(&mut self) {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::Release);
        state.playing = false;
    }

    fn load_async(&mut self, resource: &str, generation: u64) -> Result<()> {
        let mut state = self.state.lock();
        if state.fail_load {
            return Err(PlaybackError::Engine("setDataSource failed".to_string()));
        }
        state.calls.push(EngineCall::Load {
            resource: resource.to_string(),
            generation,
        });
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        let mut state = self.state.lock();
        if state.fail_start {
            return Err(PlaybackError::Engine("start in wrong state".to_string()));
        }
        state.calls.push(EngineCall::Start);
        state.playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::Pause);
        state.playing = false;
        Ok(())
    }

    fn seek_to(&mut self, position_ms: u64) -> Result<()> {
        self.state.lock().calls.push(EngineCall::SeekTo(position_ms));
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.state.lock().playing
    }

    fn current_position_ms(&self) -> u64 {
        self.state.lock().position_ms
    }

    fn duration_ms(&self) -> u64 {
        self.state.lock().duration_ms
    }

    fn set_notifier(&mut self, notifier: EngineNotifier) {
        self.state.lock().notifier = Some(notifier);
    }
}

/// Session that counts attach/detach calls
#[derive(Clone, Default)]
pub struct RecordingSession {
    counts: Arc<Mutex<(usize, usize)>>,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attaches(&self) -> usize {
        self.counts.lock().0
    }

    pub fn detaches(&self) -> usize {
        self.counts.lock().1
    }
}

impl MediaSession for RecordingSession {
    fn attach(&mut self) -> Result<()> {
        self.counts.lock().0 += 1;
        Ok(())
    }

    fn detach(&mut self) {
        self.counts.lock().1 += 1;
    }
}
