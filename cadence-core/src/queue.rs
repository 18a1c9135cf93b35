use std::collections::VecDeque;
use std::sync::Arc;

use strum::EnumIter;

use crate::{error::PlaybackError, track::Track, volume::Volume};

/// Repeat behaviour when the current track ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, strum::Display)]
pub enum RepeatMode {
    #[default]
    #[strum(serialize = "➡️ Off")]
    Off,
    #[strum(serialize = "🔂 One")]
    One,
}

impl RepeatMode {
    pub fn toggled(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

/// What `PlaybackQueue::enqueue` did with the track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueued {
    /// Nothing was playing, the track became current
    Started,
    /// Appended to the tail of the pending queue
    Appended,
    /// Already current or pending; nothing changed
    Duplicate,
}

/// The playback state aggregate: current track, pending queue, history and
/// the playing intent / repeat / volume flags that go with them.
///
/// The pending queue is consumed front to back by `advance`. `play_from_queue`
/// only moves the focus: the jumped-to entry stays in `pending` (at `focus`)
/// and the entries around it remain playable. History is a stack, most
/// recently played on top.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaybackQueue {
    current: Option<Arc<Track>>,
    pending: VecDeque<Arc<Track>>,
    history: Vec<Arc<Track>>,
    focus: Option<usize>,
    is_playing: bool,
    repeat: RepeatMode,
    volume: Volume,
}

impl PlaybackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_volume(volume: Volume) -> Self {
        Self {
            volume,
            ..Self::default()
        }
    }

    pub fn current(&self) -> Option<&Arc<Track>> {
        self.current.as_ref()
    }

    pub fn pending(&self) -> &VecDeque<Arc<Track>> {
        &self.pending
    }

    /// Oldest first, most recently played last
    pub fn history(&self) -> &[Arc<Track>] {
        &self.history
    }

    /// Index in `pending` of the entry last jumped to with `play_from_queue`
    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn is_repeat_one(&self) -> bool {
        self.repeat == RepeatMode::One
    }

    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    pub fn volume_mut(&mut self) -> &mut Volume {
        &mut self.volume
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.pending.is_empty() && self.history.is_empty()
    }

    /// Whether `track` is already current or waiting in the queue
    pub fn contains(&self, track: &Track) -> bool {
        self.current.as_ref().is_some_and(|c| c.same_as(track))
            || self.pending.iter().any(|t| t.same_as(track))
    }

    /// Replace the whole session with `track` and start playing it.
    pub fn play_now(&mut self, track: Arc<Track>) {
        self.pending.clear();
        self.history.clear();
        self.focus = None;
        self.current = Some(track);
        self.is_playing = true;
    }

    /// Replace the session with a list: the first track plays, the rest wait.
    /// Repeated ids keep their first occurrence. Returns false for an empty list.
    pub fn play_all(&mut self, tracks: Vec<Arc<Track>>) -> bool {
        let mut unique: Vec<Arc<Track>> = Vec::with_capacity(tracks.len());
        for track in tracks {
            if !unique.iter().any(|t| t.same_as(&track)) {
                unique.push(track);
            }
        }

        let mut tracks = unique.into_iter();
        let Some(first) = tracks.next() else {
            self.clear();
            return false;
        };

        self.history.clear();
        self.focus = None;
        self.pending = tracks.collect();
        self.current = Some(first);
        self.is_playing = true;
        true
    }

    pub fn enqueue(&mut self, track: Arc<Track>) -> Enqueued {
        if self.contains(&track) {
            return Enqueued::Duplicate;
        }
        if self.current.is_none() {
            self.current = Some(track);
            return Enqueued::Started;
        }
        self.pending.push_back(track);
        Enqueued::Appended
    }

    /// Jump to `pending[index]` without consuming anything.
    /// Returns `Ok(false)` when that entry already has the focus.
    pub fn play_from_queue(&mut self, index: usize) -> Result<bool, PlaybackError> {
        let target = self
            .pending
            .get(index)
            .cloned()
            .ok_or(PlaybackError::InvalidIndex {
                index,
                len: self.pending.len(),
            })?;

        if self.focus == Some(index) {
            return Ok(false);
        }

        if let Some(previous) = self.current.take() {
            self.history.push(previous);
        }
        self.current = Some(target);
        self.focus = Some(index);
        Ok(true)
    }

    /// Move forward. The track that was playing goes onto history, every
    /// pending entry up to the focus is dropped, and the head becomes current.
    /// Returns the new current track, `None` once the queue is exhausted.
    pub fn advance(&mut self) -> Option<Arc<Track>> {
        let previous = self.current.take();

        if let Some(focus) = self.focus.take() {
            let end = (focus + 1).min(self.pending.len());
            self.pending.drain(..end);
        }
        if let Some(previous) = previous {
            self.history.push(previous);
        }

        match self.pending.pop_front() {
            Some(next) => {
                self.current = Some(Arc::clone(&next));
                Some(next)
            }
            None => {
                self.is_playing = false;
                None
            }
        }
    }

    /// Step back to the top of history; the track being left is put back at
    /// the head of the queue so moving forward replays it.
    /// Returns false (and changes nothing) when history is empty.
    pub fn retreat(&mut self) -> bool {
        let Some(previous) = self.history.pop() else {
            return false;
        };

        if let Some(focus) = self.focus.take() {
            // current is the focused entry and already sits in the queue
            if let Some(entry) = self.pending.remove(focus) {
                self.pending.push_front(entry);
            }
        } else if let Some(current) = self.current.take() {
            self.pending.push_front(current);
        }

        // it may have been enqueued again after it was played
        self.pending.retain(|t| t.id() != previous.id());
        self.current = Some(previous);
        true
    }

    pub fn remove_from_queue(&mut self, index: usize) -> Result<Arc<Track>, PlaybackError> {
        let removed = self
            .pending
            .remove(index)
            .ok_or(PlaybackError::InvalidIndex {
                index,
                len: self.pending.len(),
            })?;

        match self.focus {
            Some(focus) if index < focus => self.focus = Some(focus - 1),
            Some(focus) if index == focus => {
                // the focused entry was the current track
                self.current = self.pending.front().cloned();
                self.focus = self.current.as_ref().map(|_| 0);
            }
            _ => {}
        }

        if self.pending.is_empty() {
            self.current = None;
            self.focus = None;
            self.is_playing = false;
        }

        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.history.clear();
        self.current = None;
        self.focus = None;
        self.is_playing = false;
    }

    /// Back to a fresh session: empty queue, no repeat, the given volume.
    pub fn reset(&mut self, volume: Volume) {
        self.clear();
        self.repeat = RepeatMode::Off;
        self.volume = volume;
    }

    /// Set playing intent. Ignored (returns false) when nothing is current.
    pub fn set_playing(&mut self, playing: bool) -> bool {
        if self.current.is_none() {
            return false;
        }
        self.is_playing = playing;
        true
    }

    pub fn toggle_repeat(&mut self) -> RepeatMode {
        self.repeat = self.repeat.toggled();
        self.repeat
    }
}
