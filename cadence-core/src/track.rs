use std::fmt::Display;
use std::sync::Arc;

use crate::error::PlaybackError;

/// Stable identity of a track, as handed out by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrackId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Immutable descriptor of a playable item.
///
/// Tracks are owned by the catalog and shared with the playback engine as
/// `Arc<Track>`; the engine never copies or mutates them.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    id: TrackId,
    /// Track title
    title: String,
    /// Performing artist (several artists are separated by semicolon)
    artist: String,
    /// Where the audio can be loaded from (local path or `file://` URI)
    audio_locator: String,
    /// Cover art location (if any)
    image_locator: Option<String>,
    /// Catalog duration in seconds. The decoded media has the final word.
    duration_secs: Option<f32>,
}

impl Track {
    pub fn builder(id: impl Into<TrackId>, audio_locator: impl Into<String>) -> TrackBuilder {
        TrackBuilder::new(id, audio_locator)
    }

    pub fn id(&self) -> &TrackId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn audio_locator(&self) -> &str {
        &self.audio_locator
    }

    pub fn image_locator(&self) -> Option<&str> {
        self.image_locator.as_deref()
    }

    pub fn duration_secs(&self) -> Option<f32> {
        self.duration_secs
    }

    /// Re-check the invariants `TrackBuilder::build` enforces.
    pub fn validate(&self) -> Result<(), PlaybackError> {
        if self.id.as_str().trim().is_empty() {
            return Err(PlaybackError::MalformedTrack("empty track id".to_string()));
        }
        if self.audio_locator.trim().is_empty() {
            return Err(PlaybackError::MalformedTrack(format!(
                "track {} has no audio locator",
                self.id
            )));
        }
        if let Some(duration) = self.duration_secs {
            if !duration.is_finite() || duration < 0.0 {
                return Err(PlaybackError::MalformedTrack(format!(
                    "track {} has invalid duration {}",
                    self.id, duration
                )));
            }
        }
        Ok(())
    }

    /// Whether two descriptors refer to the same catalog item.
    pub fn same_as(&self, other: &Track) -> bool {
        self.id == other.id
    }
}

impl Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.title, self.artist)?;
        if let Some(duration) = self.duration_secs {
            let mins = (duration / 60.0).floor() as u64;
            let secs = (duration % 60.0).floor() as u64;
            write!(f, " ({:02}:{:02})", mins, secs)?;
        }
        Ok(())
    }
}

impl From<String> for TrackId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

pub struct TrackBuilder {
    id: TrackId,
    audio_locator: String,
    title: Option<String>,
    artist: Option<String>,
    image_locator: Option<String>,
    duration_secs: Option<f32>,
}

impl TrackBuilder {
    pub fn new(id: impl Into<TrackId>, audio_locator: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            audio_locator: audio_locator.into(),
            title: None,
            artist: None,
            image_locator: None,
            duration_secs: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    pub fn artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn image_locator(mut self, locator: impl Into<String>) -> Self {
        self.image_locator = Some(locator.into());
        self
    }

    pub fn duration_secs(mut self, duration: f32) -> Self {
        self.duration_secs = Some(duration);
        self
    }

    pub fn build(self) -> Result<Track, PlaybackError> {
        let track = Track {
            title: self.title.unwrap_or_else(|| "Unknown Title".to_string()),
            artist: self.artist.unwrap_or_else(|| "Unknown Artist".to_string()),
            id: self.id,
            audio_locator: self.audio_locator,
            image_locator: self.image_locator,
            duration_secs: self.duration_secs,
        };
        track.validate()?;
        Ok(track)
    }

    /// Build straight into the shared form the engine works with.
    pub fn build_shared(self) -> Result<Arc<Track>, PlaybackError> {
        self.build().map(Arc::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_display_defaults() {
        let track = Track::builder("t1", "/music/a.mp3").build().unwrap();
        assert_eq!(track.title(), "Unknown Title");
        assert_eq!(track.artist(), "Unknown Artist");
        assert_eq!(track.duration_secs(), None);
    }

    #[test]
    fn builder_rejects_missing_locator() {
        let err = Track::builder("t1", "  ").build().unwrap_err();
        assert!(matches!(err, PlaybackError::MalformedTrack(_)));
    }

    #[test]
    fn builder_rejects_empty_id_and_bad_duration() {
        assert!(Track::builder("", "/a.mp3").build().is_err());
        assert!(
            Track::builder("t1", "/a.mp3")
                .duration_secs(f32::NAN)
                .build()
                .is_err()
        );
        assert!(
            Track::builder("t1", "/a.mp3")
                .duration_secs(-3.0)
                .build()
                .is_err()
        );
    }

    #[test]
    fn display_includes_length_when_known() {
        let track = Track::builder("t1", "/a.mp3")
            .title("Song")
            .artist("Band")
            .duration_secs(125.0)
            .build()
            .unwrap();
        assert_eq!(track.to_string(), "Song - Band (02:05)");
    }

    #[test]
    fn identity_is_by_id() {
        let a = Track::builder("same", "/a.mp3").title("A").build().unwrap();
        let b = Track::builder("same", "/b.mp3").title("B").build().unwrap();
        assert!(a.same_as(&b));
        assert_ne!(a, b);
    }
}
