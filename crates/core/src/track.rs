// Tracks and the ordered playlist the controller walks through

use std::fmt;

/// Opaque platform identifier of a track (media index row id on Android)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackId(pub i64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One playable audio item.
///
/// Fields are private so a track stays immutable once it sits in a
/// playlist; build it with [`Track::new`] and the `with_*` helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    id: TrackId,
    title: Option<String>,
    artist: Option<String>,
    duration_ms: Option<u64>,
}

impl Track {
    pub fn new(id: TrackId) -> Self {
        Self {
            id,
            title: None,
            artist: None,
            duration_ms: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    /// Display duration as reported by the media index
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn artist(&self) -> Option<&str> {
        self.artist.as_deref()
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }
}

impl From<TrackId> for Track {
    fn from(id: TrackId) -> Self {
        Track::new(id)
    }
}

/// Ordered, index-addressable sequence of tracks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Index of the last track, `None` for an empty playlist
    pub fn last_index(&self) -> Option<usize> {
        self.tracks.len().checked_sub(1)
    }
}

impl From<Vec<Track>> for Playlist {
    fn from(tracks: Vec<Track>) -> Self {
        Playlist::new(tracks)
    }
}

impl FromIterator<Track> for Playlist {
    fn from_iter<I: IntoIterator<Item = Track>>(iter: I) -> Self {
        Playlist::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_index() {
        assert_eq!(Playlist::default().last_index(), None);

        let playlist: Playlist = (1..=3).map(|id| Track::new(TrackId(id))).collect();
        assert_eq!(playlist.len(), 3);
        assert_eq!(playlist.last_index(), Some(2));
        assert_eq!(playlist.get(2).map(|t| t.id()), Some(TrackId(3)));
        assert!(playlist.get(3).is_none());
    }

    #[test]
    fn test_track_builder() {
        let track = Track::new(TrackId(42))
            .with_title("Song")
            .with_artist("Band")
            .with_duration_ms(180_000);

        assert_eq!(track.id(), TrackId(42));
        assert_eq!(track.title(), Some("Song"));
        assert_eq!(track.artist(), Some("Band"));
        assert_eq!(track.duration_ms(), Some(180_000));
    }
}
