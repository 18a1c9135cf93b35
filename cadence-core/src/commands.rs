use std::sync::Arc;

use crate::{error::Notice, player::PlayerSnapshot, track::Track};

/// Commands sent from the UI to the audio engine
#[derive(Debug, Clone)]
pub enum AudioCommand {
    /// Replace the current track and start playing it
    PlayNow(Arc<Track>),
    /// Replace the whole session with a playlist, starting at its first track
    PlayAll(Vec<Arc<Track>>),
    /// Append to the pending queue (starts playback if nothing is current)
    Enqueue(Arc<Track>),
    /// Jump to the given pending index
    PlayQueueIndex(usize),
    /// Remove the given pending index
    RemoveFromQueue(usize),
    /// Empty the queue and history
    ClearQueue,
    /// Skip to the next track
    Next,
    /// Go back to the previously played track
    Previous,
    /// Start or resume playback
    Play,
    /// Pause playback
    Pause,
    TogglePlay,
    /// Seek to position in seconds
    Seek(f32),
    /// Set volume (0.0 to 1.0)
    SetVolume(f32),
    ToggleMute,
    /// Flip between repeat-one and no repeat
    ToggleRepeat,
    /// End the session and return to defaults
    Reset,
    /// Shutdown the audio engine
    Quit,
}

/// Responses sent from the audio engine to the UI
#[derive(Debug, Clone)]
pub enum AudioResponse {
    /// Player state after a command or output event changed it
    StateChanged(Box<PlayerSnapshot>),
    /// Something worth telling the user about
    Notice(Notice),
    /// An error occurred
    Error(String),
    /// Engine is shutting down
    Shutdown,
}
