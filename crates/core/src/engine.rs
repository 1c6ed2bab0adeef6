// Media engine capability and the event queue it reports through

use crate::error::Result;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// External decode/output engine driven by the controller.
///
/// The controller never decodes anything itself. Implementations wrap a
/// platform player (Android `MediaPlayer`, a test double, ...). A load is
/// asynchronous: `load_async` returns immediately and the engine later pushes
/// exactly one of [`EngineEvent::Prepared`] or [`EngineEvent::Error`] carrying
/// the same `generation` through the notifier it was given.
pub trait MediaEngine: Send {
    /// Drop the current source and return to the uninitialized state
    fn reset(&mut self);

    /// Release all engine resources; the engine is unusable afterwards
    fn release(&mut self);

    /// Begin loading `resource`. Synchronous failures (bad data source) are
    /// returned here; asynchronous ones arrive as `EngineEvent::Error`.
    fn load_async(&mut self, resource: &str, generation: u64) -> Result<()>;

    /// Start or restart output of the loaded source
    fn start(&mut self) -> Result<()>;

    /// Pause output
    fn pause(&mut self) -> Result<()>;

    /// Seek to a position in milliseconds
    fn seek_to(&mut self, position_ms: u64) -> Result<()>;

    fn is_playing(&self) -> bool;

    fn current_position_ms(&self) -> u64;

    /// Duration of the loaded source. Only meaningful while playing.
    fn duration_ms(&self) -> u64;

    /// Register where ready/finished/error notifications go
    fn set_notifier(&mut self, notifier: EngineNotifier);
}

/// Notification from the engine about a load request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Source for `generation` is ready to start
    Prepared { generation: u64 },

    /// Source for `generation` played to its end
    Completed { generation: u64 },

    /// Engine failed while loading or playing `generation`
    Error { generation: u64, what: i32, extra: i32 },
}

impl EngineEvent {
    pub fn generation(&self) -> u64 {
        match self {
            EngineEvent::Prepared { generation }
            | EngineEvent::Completed { generation }
            | EngineEvent::Error { generation, .. } => *generation,
        }
    }
}

/// Cloneable handle engines use to report events from any thread.
///
/// Events are only queued here; the controller applies them when its owner
/// calls `dispatch_pending` on the owning context.
#[derive(Clone, Default)]
pub struct EngineNotifier {
    queue: Arc<Mutex<VecDeque<EngineEvent>>>,
}

impl EngineNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&self, event: EngineEvent) {
        log::trace!("Engine event queued: {:?}", event);
        self.queue.lock().push_back(event);
    }

    pub fn prepared(&self, generation: u64) {
        self.notify(EngineEvent::Prepared { generation });
    }

    pub fn completed(&self, generation: u64) {
        self.notify(EngineEvent::Completed { generation });
    }

    pub fn error(&self, generation: u64, what: i32, extra: i32) {
        self.notify(EngineEvent::Error {
            generation,
            what,
            extra,
        });
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Take everything queued so far, oldest first
    pub(crate) fn drain(&self) -> Vec<EngineEvent> {
        self.queue.lock().drain(..).collect()
    }
}
