// Controller events for UI observers

use crate::state::PlaybackPhase;
use parking_lot::Mutex;
use std::sync::Arc;

/// Which end of the playlist a skip ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Start,
    End,
}

/// Controller event types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// Playlist replaced; cursor back at the first track
    PlaylistReplaced { len: usize },

    /// Cursor moved to a new track
    TrackSelected { index: usize },

    /// Load request issued to the engine
    LoadRequested { index: usize, generation: u64 },

    /// Engine started playback of the selected track
    PlaybackStarted { index: usize },

    /// Phase changed
    PhaseChanged {
        old_phase: PlaybackPhase,
        new_phase: PlaybackPhase,
    },

    /// Skip hit the edge of the playlist
    Boundary { edge: Edge },

    /// Selected track played to its end
    TrackFinished { index: usize },

    /// Track could not be resolved to a playable resource
    ResolutionFailed { index: usize, message: String },

    /// Engine reported or returned an error
    EngineError { message: String },
}

/// Controller listener trait
/// Implementations should be lightweight; they run on the controller's context
pub trait ControllerListener: Send + Sync {
    fn on_event(&self, event: &ControllerEvent);
}

/// Fan-out of controller events to every registered listener
#[derive(Clone, Default)]
pub struct ListenerSet {
    listeners: Arc<Mutex<Vec<Arc<dyn ControllerListener>>>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listener: Arc<dyn ControllerListener>) {
        self.listeners.lock().push(listener);
    }

    pub fn clear(&self) {
        self.listeners.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dispatch(&self, event: ControllerEvent) {
        // Snapshot so a listener may register another without deadlocking
        let listeners = self.listeners.lock().clone();
        for listener in listeners.iter() {
            listener.on_event(&event);
        }
    }
}

/// Listener that records events, for tests
#[cfg(test)]
#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<ControllerEvent>>,
}

#[cfg(test)]
impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ControllerEvent> {
        self.events.lock().clone()
    }
}

#[cfg(test)]
impl ControllerListener for RecordingListener {
    fn on_event(&self, event: &ControllerEvent) {
        self.events.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_reaches_all_listeners() {
        let set = ListenerSet::new();
        let first = Arc::new(RecordingListener::new());
        let second = Arc::new(RecordingListener::new());
        set.add(first.clone());
        set.add(second.clone());

        set.dispatch(ControllerEvent::TrackSelected { index: 1 });

        assert_eq!(first.events(), vec![ControllerEvent::TrackSelected { index: 1 }]);
        assert_eq!(second.events().len(), 1);
    }

    #[test]
    fn test_clear() {
        let set = ListenerSet::new();
        let listener = Arc::new(RecordingListener::new());
        set.add(listener.clone());
        set.clear();
        assert!(set.is_empty());

        set.dispatch(ControllerEvent::Boundary { edge: Edge::End });
        assert!(listener.events().is_empty());
    }
}
