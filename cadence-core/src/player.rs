use std::sync::Arc;

use crate::{
    config::EngineConfig,
    error::{Notice, PlaybackError},
    output::{AudioOutput, OutputEvent},
    queue::{Enqueued, PlaybackQueue, RepeatMode},
    track::Track,
    transport::{Transport, TransportPhase, TransportSignal},
};

/// Read-only view of the player for rendering
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerSnapshot {
    pub current: Option<Arc<Track>>,
    pub pending: Vec<Arc<Track>>,
    /// Oldest first
    pub history: Vec<Arc<Track>>,
    /// Pending entry last jumped to, if any
    pub focus: Option<usize>,
    pub is_playing: bool,
    pub repeat: RepeatMode,
    pub volume: f32,
    pub is_muted: bool,
    pub effective_volume: f32,
    pub elapsed: f32,
    pub duration: Option<f32>,
    pub phase: TransportPhase,
    /// Playing intent is set but the output refused to start
    pub output_blocked: bool,
    pub last_error: Option<PlaybackError>,
}

impl PlayerSnapshot {
    pub fn is_repeat_one(&self) -> bool {
        self.repeat == RepeatMode::One
    }

    /// Progress through the current media (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        match self.duration {
            Some(duration) if duration > 0.0 => (self.elapsed / duration).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }
}

/// The command surface: validates arguments, mutates the queue and lets the
/// transport follow. Every method runs to completion before the next one can
/// start (`&mut self`), so observers never see a half-applied command.
pub struct Player {
    queue: PlaybackQueue,
    transport: Transport,
    config: EngineConfig,
    notices: Vec<Notice>,
}

impl Player {
    pub fn new(output: Box<dyn AudioOutput>, config: EngineConfig) -> Self {
        let mut player = Self {
            queue: PlaybackQueue::with_volume(config.volume()),
            transport: Transport::new(output),
            config,
            notices: Vec::new(),
        };
        player.sync();
        player
    }

    pub fn queue(&self) -> &PlaybackQueue {
        &self.queue
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        let volume = self.queue.volume();
        PlayerSnapshot {
            current: self.queue.current().cloned(),
            pending: self.queue.pending().iter().cloned().collect(),
            history: self.queue.history().to_vec(),
            focus: self.queue.focus(),
            is_playing: self.queue.is_playing(),
            repeat: self.queue.repeat(),
            volume: volume.level(),
            is_muted: volume.is_muted(),
            effective_volume: volume.effective(),
            elapsed: self.transport.elapsed(),
            duration: self.transport.duration(),
            phase: self.transport.phase(),
            output_blocked: self.transport.is_blocked(),
            last_error: self.transport.last_error().cloned(),
        }
    }

    /// Notices produced since the last call
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn play_now(&mut self, track: Arc<Track>) -> Result<(), PlaybackError> {
        track.validate()?;
        log::info!("Play now: {}", track);
        self.notices
            .push(Notice::info(format!("Now playing \"{}\".", track.title())));
        self.queue.play_now(track);
        self.transport.clear_block();
        self.transport.retry();
        self.sync();
        Ok(())
    }

    /// Replace the session with a playlist or album, starting at its first track
    pub fn play_all(&mut self, tracks: Vec<Arc<Track>>) -> Result<(), PlaybackError> {
        for track in &tracks {
            track.validate()?;
        }

        if self.queue.play_all(tracks) {
            if let Some(first) = self.queue.current() {
                log::info!(
                    "Playing {} tracks starting with {}",
                    self.queue.pending().len() + 1,
                    first
                );
                self.notices.push(Notice::info(format!(
                    "Playing playlist. Starting with \"{}\".",
                    first.title()
                )));
            }
        } else {
            self.notices.push(Notice::warning("Playlist is empty."));
        }
        self.transport.clear_block();
        self.transport.retry();
        self.sync();
        Ok(())
    }

    pub fn enqueue(&mut self, track: Arc<Track>) -> Result<Enqueued, PlaybackError> {
        track.validate()?;
        let id = track.id().clone();
        let title = track.title().to_string();
        let outcome = self.queue.enqueue(track);
        match outcome {
            Enqueued::Duplicate => {
                let err = PlaybackError::Duplicate { id, title };
                log::info!("Enqueue rejected: {}", err);
                self.notices.push(Notice::from(&err));
            }
            Enqueued::Appended => {
                self.notices
                    .push(Notice::success(format!("Added \"{}\" into queue.", title)));
            }
            Enqueued::Started => {
                self.notices
                    .push(Notice::success(format!("Added \"{}\" into queue.", title)));
                self.notices
                    .push(Notice::info(format!("Playing \"{}\".", title)));
            }
        }
        self.sync();
        Ok(outcome)
    }

    pub fn play_from_queue(&mut self, index: usize) -> Result<(), PlaybackError> {
        if self.queue.play_from_queue(index)? {
            log::info!("Jumped to queue entry {}", index);
            self.sync();
        }
        Ok(())
    }

    /// Skip forward. A no-op when nothing is current or queued.
    pub fn next(&mut self) {
        if self.queue.current().is_none() && self.queue.pending().is_empty() {
            return;
        }
        match self.queue.advance() {
            Some(track) => log::info!("Next: {}", track),
            None => log::info!("Reached the end of the queue"),
        }
        self.sync();
    }

    /// Step back through history. Returns false when there is no history.
    pub fn previous(&mut self) -> bool {
        if !self.queue.retreat() {
            log::debug!("Previous ignored, history is empty");
            return false;
        }
        if let Some(track) = self.queue.current() {
            log::info!("Previous: {}", track);
        }
        self.sync();
        true
    }

    pub fn remove_from_queue(&mut self, index: usize) -> Result<Arc<Track>, PlaybackError> {
        let removed = self.queue.remove_from_queue(index)?;
        log::info!("Removed {} from queue", removed);
        self.notices.push(Notice::success("Removed song from queue."));
        self.sync();
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.notices.push(Notice::warning("Queue cleared."));
        self.sync();
    }

    /// End the session (e.g. on logout): empty queue, default volume, no repeat
    pub fn reset(&mut self) {
        self.queue.reset(self.config.volume());
        self.sync();
    }

    pub fn play(&mut self) {
        if !self.queue.set_playing(true) {
            log::debug!("Play ignored, nothing is current");
            return;
        }
        self.transport.clear_block();
        self.transport.retry();
        self.sync();
    }

    pub fn pause(&mut self) {
        if self.queue.set_playing(false) {
            self.sync();
        }
    }

    pub fn toggle_play(&mut self) {
        if self.queue.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Seek within the current media. Rejects negative or non-finite
    /// positions; positions past the end are clamped by the transport.
    pub fn seek(&mut self, seconds: f32) -> Result<(), PlaybackError> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(PlaybackError::InvalidSeek(seconds));
        }
        if !self.transport.seek(seconds)? {
            log::debug!("Seek to {}s ignored, duration unknown", seconds);
        }
        Ok(())
    }

    pub fn set_volume(&mut self, volume: f32) -> Result<(), PlaybackError> {
        if !volume.is_finite() || !(0.0..=1.0).contains(&volume) {
            return Err(PlaybackError::InvalidVolume(volume));
        }
        self.queue.volume_mut().set(volume);
        self.transport.apply_volume(self.queue.volume());
        Ok(())
    }

    pub fn toggle_mute(&mut self) {
        self.queue.volume_mut().toggle_mute();
        self.transport.apply_volume(self.queue.volume());
    }

    pub fn toggle_repeat(&mut self) -> RepeatMode {
        let mode = self.queue.toggle_repeat();
        log::info!("Repeat: {}", mode);
        mode
    }

    /// Feed one asynchronous event from the output
    pub fn handle_output_event(&mut self, event: OutputEvent) {
        match self.transport.handle_event(event, &self.queue) {
            TransportSignal::Advance => {
                self.queue.advance();
                self.sync();
            }
            TransportSignal::LoadFailed(e) | TransportSignal::Blocked(e) => {
                self.notices.push(Notice::from(&e));
            }
            TransportSignal::None | TransportSignal::Stale | TransportSignal::Restarted => {}
        }
    }

    /// Periodic housekeeping, driven by the engine loop
    pub fn tick(&mut self) {
        self.transport.poll();
    }

    pub fn shutdown(&mut self) {
        self.transport.shutdown();
    }

    fn sync(&mut self) {
        if let Some(e) = self.transport.sync(&self.queue) {
            self.notices.push(Notice::from(&e));
        }
    }
}
