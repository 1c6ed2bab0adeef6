// Core types and traits for the SimplePlayer playback service

pub mod callback;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod hook;
pub mod resolver;
pub mod session;
pub mod state;
pub mod track;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use callback::{ControllerEvent, ControllerListener, Edge, ListenerSet};
pub use config::ControllerConfig;
pub use controller::{PlaybackController, StepOutcome};
pub use engine::{EngineEvent, EngineNotifier, MediaEngine};
pub use error::{PlaybackError, Result};
pub use hook::{CompletionHook, DirectAdvance};
pub use resolver::{ContentUriResolver, TrackResolver, EXTERNAL_AUDIO_CONTENT_URI};
pub use session::{MediaSession, TransportCommand};
pub use state::{PlaybackPhase, UNSET_DURATION_MS};
pub use track::{Playlist, Track, TrackId};
