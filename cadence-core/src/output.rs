use std::fmt::Display;

use crate::{error::PlaybackError, track::TrackId};

/// Identifies one load request. Every event an output reports carries the
/// ticket of the load it belongs to, so late events for a superseded load can
/// be told apart from current ones even when the same track is reloaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub track_id: TrackId,
    pub generation: u64,
}

impl Display for LoadTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.track_id, self.generation)
    }
}

/// Asynchronous notifications coming back from the audio output
#[derive(Debug, Clone, PartialEq)]
pub enum OutputEventKind {
    /// Media decoded; duration in seconds is now known
    Loaded { duration: f32 },
    /// Periodic playback position report
    TimeUpdate { position: f32 },
    /// Playback reached the end of the media
    Ended,
    /// Loading or decoding failed
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputEvent {
    pub ticket: LoadTicket,
    pub kind: OutputEventKind,
}

impl OutputEvent {
    pub fn new(ticket: LoadTicket, kind: OutputEventKind) -> Self {
        Self { ticket, kind }
    }
}

/// The single audio output owned by the transport.
///
/// Implementations report progress as `OutputEvent`s on a channel handed to
/// them at construction; none of these calls block on media loading.
pub trait AudioOutput {
    /// Start loading `locator`. Supersedes any earlier load.
    fn load(&mut self, ticket: LoadTicket, locator: &str) -> Result<(), PlaybackError>;

    /// Start or resume output of the loaded media. May be refused
    /// (`PlaybackError::PlaybackBlocked`).
    fn play(&mut self) -> Result<(), PlaybackError>;

    fn pause(&mut self);

    /// Stop and drop the loaded media.
    fn stop(&mut self);

    fn seek(&mut self, seconds: f32) -> Result<(), PlaybackError>;

    fn set_volume(&mut self, volume: f32);

    /// Called on every engine tick; outputs that cannot push events on their
    /// own emit `TimeUpdate` / `Ended` from here.
    fn poll(&mut self) {}

    fn name(&self) -> &str {
        "output"
    }
}
