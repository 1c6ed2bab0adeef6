// Controller configuration

/// Controller settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Whether track completion starts the next track when the
    /// controller is created
    pub auto_advance: bool,
    /// On resume, seek the engine to its own position before restarting so
    /// the controller and the engine agree on where playback continues
    pub resync_on_resume: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            auto_advance: true,
            resync_on_resume: true,
        }
    }
}
