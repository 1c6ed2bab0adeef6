// Error handling for the playback controller

use std::fmt;

/// Playback error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// Track identifier could not be turned into a playable resource
    ResourceResolution(String),

    /// Engine call failed, or the engine reported a decode/output failure
    Engine(String),

    /// Direct selection outside the playlist
    InvalidCursor { index: usize, len: usize },

    /// Operation needs a track but the playlist is empty
    EmptyPlaylist,

    /// Lifecycle misuse (double attach, unknown handle, ...)
    InvalidState(String),

    /// Generic error
    Other(String),
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlaybackError::ResourceResolution(msg) => {
                write!(f, "Resource resolution error: {}", msg)
            }
            PlaybackError::Engine(msg) => write!(f, "Engine error: {}", msg),
            PlaybackError::InvalidCursor { index, len } => {
                write!(f, "Cursor {} out of range for playlist of {} tracks", index, len)
            }
            PlaybackError::EmptyPlaylist => write!(f, "Playlist is empty"),
            PlaybackError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            PlaybackError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for PlaybackError {}

/// Result type alias for controller operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_error_message() {
        let err = PlaybackError::InvalidCursor { index: 5, len: 3 };
        assert_eq!(
            err.to_string(),
            "Cursor 5 out of range for playlist of 3 tracks"
        );
    }
}
