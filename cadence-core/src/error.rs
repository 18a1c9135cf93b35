use std::fmt::Display;

use thiserror::Error;

use crate::track::TrackId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    #[error("queue index {index} is out of range (queue holds {len} tracks)")]
    InvalidIndex { index: usize, len: usize },
    #[error("cannot seek to {0} seconds")]
    InvalidSeek(f32),
    #[error("volume {0} is outside 0.0..=1.0")]
    InvalidVolume(f32),
    #[error("malformed track: {0}")]
    MalformedTrack(String),
    #[error("\"{title}\" Already in queue.")]
    Duplicate { id: TrackId, title: String },
    #[error("failed to load media: {0}")]
    MediaLoad(String),
    #[error("output refused to start playback: {0}")]
    PlaybackBlocked(String),
    #[error("audio output error: {0}")]
    Output(String),
}

/// Coarse error categories surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed command arguments, rejected synchronously
    Validation,
    /// Track already present in the queue
    Duplicate,
    /// Load or decode failure, reported asynchronously
    Media,
    /// The output device refused to start; needs a user gesture
    Autoplay,
}

impl PlaybackError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlaybackError::InvalidIndex { .. }
            | PlaybackError::InvalidSeek(_)
            | PlaybackError::InvalidVolume(_)
            | PlaybackError::MalformedTrack(_) => ErrorKind::Validation,
            PlaybackError::Duplicate { .. } => ErrorKind::Duplicate,
            PlaybackError::MediaLoad(_) | PlaybackError::Output(_) => ErrorKind::Media,
            PlaybackError::PlaybackBlocked(_) => ErrorKind::Autoplay,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum NoticeLevel {
    #[strum(serialize = "info")]
    Info,
    #[strum(serialize = "ok")]
    Success,
    #[strum(serialize = "warn")]
    Warning,
    #[strum(serialize = "error")]
    Error,
}

/// Lightweight user-facing message produced by a command.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl From<&PlaybackError> for Notice {
    fn from(err: &PlaybackError) -> Self {
        match err.kind() {
            ErrorKind::Validation | ErrorKind::Autoplay => Notice::warning(err.to_string()),
            ErrorKind::Duplicate => Notice::info(err.to_string()),
            ErrorKind::Media => Notice::error(err.to_string()),
        }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_categories() {
        assert_eq!(
            PlaybackError::InvalidIndex { index: 3, len: 1 }.kind(),
            ErrorKind::Validation
        );
        assert_eq!(PlaybackError::InvalidVolume(2.0).kind(), ErrorKind::Validation);
        assert_eq!(
            PlaybackError::Duplicate {
                id: TrackId::new("a"),
                title: "A".into()
            }
            .kind(),
            ErrorKind::Duplicate
        );
        assert_eq!(
            PlaybackError::MediaLoad("404".into()).kind(),
            ErrorKind::Media
        );
        assert_eq!(
            PlaybackError::PlaybackBlocked("autoplay".into()).kind(),
            ErrorKind::Autoplay
        );
    }

    #[test]
    fn media_errors_become_error_notices() {
        let notice = Notice::from(&PlaybackError::MediaLoad("decode failed".into()));
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.to_string(), "[error] failed to load media: decode failed");
    }
}
