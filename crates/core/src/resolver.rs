// Track id to playable resource resolution

use crate::error::{PlaybackError, Result};
use crate::track::Track;

/// Base URI of the external audio media collection
pub const EXTERNAL_AUDIO_CONTENT_URI: &str = "content://media/external/audio/media";

/// Turns a track into something the engine can load
pub trait TrackResolver: Send + Sync {
    fn resolve(&self, track: &Track) -> Result<String>;
}

impl<F> TrackResolver for F
where
    F: Fn(&Track) -> Result<String> + Send + Sync,
{
    fn resolve(&self, track: &Track) -> Result<String> {
        self(track)
    }
}

/// Appends the track id to a content collection URI
#[derive(Debug, Clone)]
pub struct ContentUriResolver {
    base: String,
}

impl ContentUriResolver {
    pub fn new() -> Self {
        Self::with_base(EXTERNAL_AUDIO_CONTENT_URI)
    }

    pub fn with_base(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }
}

impl Default for ContentUriResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackResolver for ContentUriResolver {
    fn resolve(&self, track: &Track) -> Result<String> {
        let id = track.id().0;
        if id < 0 {
            return Err(PlaybackError::ResourceResolution(format!(
                "Track id {} is not a media index row",
                id
            )));
        }
        if self.base.is_empty() {
            return Err(PlaybackError::ResourceResolution(
                "No content base configured".to_string(),
            ));
        }
        Ok(format!("{}/{}", self.base, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::TrackId;

    #[test]
    fn test_content_uri() {
        let resolver = ContentUriResolver::new();
        let uri = resolver.resolve(&Track::new(TrackId(1234))).unwrap();
        assert_eq!(uri, "content://media/external/audio/media/1234");
    }

    #[test]
    fn test_custom_base_trailing_slash() {
        let resolver = ContentUriResolver::with_base("content://media/internal/audio/media/");
        assert_eq!(resolver.base(), "content://media/internal/audio/media");
        assert_eq!(
            resolver.resolve(&Track::new(TrackId(7))).unwrap(),
            "content://media/internal/audio/media/7"
        );
    }

    #[test]
    fn test_negative_id_rejected() {
        let resolver = ContentUriResolver::new();
        let err = resolver.resolve(&Track::new(TrackId(-1))).unwrap_err();
        assert!(matches!(err, PlaybackError::ResourceResolution(_)));
    }

    #[test]
    fn test_closure_resolver() {
        let resolver =
            |track: &Track| -> Result<String> { Ok(format!("file:///music/{}.mp3", track.id())) };
        assert_eq!(
            TrackResolver::resolve(&resolver, &Track::new(TrackId(3))).unwrap(),
            "file:///music/3.mp3"
        );
    }
}
