// OS media session / notification lifecycle and the commands it delivers

use crate::error::Result;

/// Platform media session and notification resources of one service session.
///
/// The controller calls `attach` once when the session is handed over and
/// `detach` once when the session ends.
pub trait MediaSession: Send {
    /// Acquire the session and notification resources
    fn attach(&mut self) -> Result<()>;

    /// Release everything `attach` acquired
    fn detach(&mut self);
}

/// Transport command from a notification button, headset or lock screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCommand {
    Play,
    Pause,
    TogglePlayPause,
    Next,
    Previous,
    SeekTo(u64),
}

impl TransportCommand {
    /// Decode the integer form used across the JNI boundary
    pub fn from_code(code: i32, arg: i64) -> Option<Self> {
        match code {
            0 => Some(TransportCommand::Play),
            1 => Some(TransportCommand::Pause),
            2 => Some(TransportCommand::TogglePlayPause),
            3 => Some(TransportCommand::Next),
            4 => Some(TransportCommand::Previous),
            5 if arg >= 0 => Some(TransportCommand::SeekTo(arg as u64)),
            _ => None,
        }
    }
}
