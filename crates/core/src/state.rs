// Controller playback phase and transition rules

use crate::error::{PlaybackError, Result};

/// Duration reported while the engine is not playing.
/// Large enough that seeking to it lands at the end of any track.
pub const UNSET_DURATION_MS: u64 = i64::MAX as u64;

/// Phase of the currently selected track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// Nothing requested for the selected track yet
    Idle,
    /// Load requested, waiting for the engine to report ready
    Loading,
    /// Engine has started playback
    Playing,
    /// Playback started and then paused
    Paused,
    /// Resolution, load or engine failure for the selected track
    Failed,
}

/// Check a phase transition against the controller's state machine.
///
/// Any phase may go back to `Loading` (a new load supersedes the old one)
/// or to `Idle` (playlist replaced).
pub fn validate_transition(from: PlaybackPhase, to: PlaybackPhase) -> Result<()> {
    use PlaybackPhase::*;

    match (from, to) {
        (_, Loading) => Ok(()),
        (_, Idle) => Ok(()),

        (Loading, Playing) => Ok(()),
        (Loading, Failed) => Ok(()),

        (Playing, Paused) => Ok(()),
        (Playing, Failed) => Ok(()),
        (Playing, Playing) => Ok(()), // resume after a seek

        (Paused, Playing) => Ok(()),
        (Paused, Paused) => Ok(()),
        (Paused, Failed) => Ok(()),

        (Failed, Failed) => Ok(()),
        // engine error on a started track; the engine may still resume it
        (Failed, Playing) => Ok(()),
        (Failed, Paused) => Ok(()),

        _ => Err(PlaybackError::InvalidState(format!(
            "Invalid phase transition from {:?} to {:?}",
            from, to
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_always_reachable() {
        for from in [
            PlaybackPhase::Idle,
            PlaybackPhase::Loading,
            PlaybackPhase::Playing,
            PlaybackPhase::Paused,
            PlaybackPhase::Failed,
        ] {
            assert!(validate_transition(from, PlaybackPhase::Loading).is_ok());
        }
    }

    #[test]
    fn test_cannot_play_without_load() {
        assert!(validate_transition(PlaybackPhase::Idle, PlaybackPhase::Playing).is_err());
        assert!(validate_transition(PlaybackPhase::Loading, PlaybackPhase::Paused).is_err());
        assert!(validate_transition(PlaybackPhase::Idle, PlaybackPhase::Paused).is_err());
    }

    #[test]
    fn test_failed_track_can_resume() {
        assert!(validate_transition(PlaybackPhase::Failed, PlaybackPhase::Playing).is_ok());
        assert!(validate_transition(PlaybackPhase::Failed, PlaybackPhase::Paused).is_ok());
        assert!(validate_transition(PlaybackPhase::Idle, PlaybackPhase::Failed).is_err());
    }
}
