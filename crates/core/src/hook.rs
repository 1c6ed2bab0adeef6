// Routing of auto-advance on track completion

use crate::controller::PlaybackController;

/// Decides what happens when the selected track finishes and auto-advance
/// is on.
///
/// A richer UI layer installs its own hook to update displayed metadata
/// before the controller moves on. The hook runs while the controller is
/// borrowed, so it must act through the `controller` argument and never
/// re-enter the controller by another path.
pub trait CompletionHook: Send + Sync {
    fn on_track_finished(&self, controller: &mut PlaybackController);
}

/// Default routing: advance straight to the next track
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectAdvance;

impl CompletionHook for DirectAdvance {
    fn on_track_finished(&self, controller: &mut PlaybackController) {
        let outcome = controller.next();
        log::debug!("Auto-advance: {:?}", outcome);
    }
}
