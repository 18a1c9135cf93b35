use crate::{
    error::PlaybackError,
    output::{AudioOutput, LoadTicket, OutputEvent, OutputEventKind},
    queue::PlaybackQueue,
    volume::Volume,
};

/// Lifecycle of the media behind the current track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum TransportPhase {
    /// Nothing is current; output stopped and unloaded
    #[default]
    Idle,
    /// Load issued, waiting for the output to report `Loaded`
    Loading,
    /// Media decoded, duration known
    Ready,
    Playing,
    Paused,
    /// Load or decode failed; waits for the user to move on or retry
    Failed,
}

impl TransportPhase {
    /// Whether media is loaded and can be started, paused or sought
    pub fn has_media(self) -> bool {
        matches!(
            self,
            TransportPhase::Ready | TransportPhase::Playing | TransportPhase::Paused
        )
    }
}

/// What the owner of the transport has to act on after an output event
#[derive(Debug, Clone, PartialEq)]
pub enum TransportSignal {
    None,
    /// Event belonged to a superseded load and was dropped
    Stale,
    /// Track ended without repeat; the queue should advance
    Advance,
    /// Track ended with repeat-one and was restarted in place
    Restarted,
    LoadFailed(PlaybackError),
    /// Output refused to start while playing intent is set
    Blocked(PlaybackError),
}

/// Sole owner of the audio output. Mirrors the queue's current track and
/// playing intent onto the device and turns device events into signals.
pub struct Transport {
    output: Box<dyn AudioOutput>,
    phase: TransportPhase,
    ticket: Option<LoadTicket>,
    generation: u64,
    elapsed: f32,
    duration: Option<f32>,
    blocked: bool,
    last_error: Option<PlaybackError>,
    applied_volume: Option<f32>,
}

impl Transport {
    pub fn new(output: Box<dyn AudioOutput>) -> Self {
        Self {
            output,
            phase: TransportPhase::Idle,
            ticket: None,
            generation: 0,
            elapsed: 0.0,
            duration: None,
            blocked: false,
            last_error: None,
            applied_volume: None,
        }
    }

    pub fn phase(&self) -> TransportPhase {
        self.phase
    }

    /// Seconds into the current media
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Decoded duration, `None` until the media has loaded
    pub fn duration(&self) -> Option<f32> {
        self.duration
    }

    /// Playing intent is set but the output refused to start
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn last_error(&self) -> Option<&PlaybackError> {
        self.last_error.as_ref()
    }

    pub fn ticket(&self) -> Option<&LoadTicket> {
        self.ticket.as_ref()
    }

    pub fn output_name(&self) -> &str {
        self.output.name()
    }

    /// Bring the output in line with the queue: load a changed track, go
    /// idle when nothing is current, apply playing intent and volume.
    /// Returns an error raised synchronously by the output.
    pub fn sync(&mut self, queue: &PlaybackQueue) -> Option<PlaybackError> {
        self.apply_volume(queue.volume());

        let Some(track) = queue.current() else {
            self.go_idle();
            return None;
        };

        let changed = self
            .ticket
            .as_ref()
            .is_none_or(|ticket| &ticket.track_id != track.id());
        if changed {
            self.generation += 1;
            let ticket = LoadTicket {
                track_id: track.id().clone(),
                generation: self.generation,
            };
            log::debug!("Loading {} from {}", ticket, track.audio_locator());

            self.ticket = Some(ticket.clone());
            self.phase = TransportPhase::Loading;
            self.elapsed = 0.0;
            self.duration = None;
            self.blocked = false;
            self.last_error = None;

            if let Err(e) = self.output.load(ticket, track.audio_locator()) {
                log::error!("Load of {} rejected: {}", track.id(), e);
                return Some(self.fail(e));
            }
            return None;
        }

        if self.phase.has_media() {
            return self.apply_intent(queue.is_playing());
        }
        None
    }

    /// Handle one event from the output. Events for any load other than the
    /// one in flight are discarded.
    pub fn handle_event(&mut self, event: OutputEvent, queue: &PlaybackQueue) -> TransportSignal {
        if self.ticket.as_ref() != Some(&event.ticket) {
            log::warn!(
                "Discarding stale {:?} for {} (current load: {:?})",
                event.kind,
                event.ticket,
                self.ticket.as_ref().map(|t| t.to_string())
            );
            return TransportSignal::Stale;
        }

        match event.kind {
            OutputEventKind::Loaded { duration } => {
                if self.phase != TransportPhase::Loading {
                    return TransportSignal::None;
                }
                self.duration = Some(duration.max(0.0));
                self.phase = TransportPhase::Ready;
                log::debug!("{} ready, duration {:.1}s", event.ticket, duration);

                self.applied_volume = None;
                self.apply_volume(queue.volume());
                match self.apply_intent(queue.is_playing()) {
                    Some(e) => TransportSignal::Blocked(e),
                    None => TransportSignal::None,
                }
            }
            OutputEventKind::TimeUpdate { position } => {
                if self.phase.has_media() {
                    self.elapsed = self.clamp_to_duration(position);
                }
                TransportSignal::None
            }
            OutputEventKind::Ended => {
                if !self.phase.has_media() {
                    return TransportSignal::None;
                }
                if queue.is_repeat_one() {
                    log::debug!("Repeating {}", event.ticket);
                    self.elapsed = 0.0;
                    if let Err(e) = self.output.seek(0.0) {
                        return TransportSignal::LoadFailed(self.fail(e));
                    }
                    self.phase = TransportPhase::Ready;
                    return match self.apply_intent(true) {
                        Some(e) => TransportSignal::Blocked(e),
                        None => TransportSignal::Restarted,
                    };
                }
                if let Some(duration) = self.duration {
                    self.elapsed = duration;
                }
                TransportSignal::Advance
            }
            OutputEventKind::Failed(reason) => {
                log::error!("Media for {} failed: {}", event.ticket, reason);
                TransportSignal::LoadFailed(self.fail(PlaybackError::MediaLoad(reason)))
            }
        }
    }

    /// Seek within the loaded media, clamped to `[0, duration]`.
    /// Returns false without touching the output while duration is unknown.
    pub fn seek(&mut self, seconds: f32) -> Result<bool, PlaybackError> {
        if self.duration.is_none() || !self.phase.has_media() {
            return Ok(false);
        }
        let target = self.clamp_to_duration(seconds);
        self.output.seek(target)?;
        self.elapsed = target;
        Ok(true)
    }

    pub fn apply_volume(&mut self, volume: &Volume) {
        let effective = volume.effective();
        if self.applied_volume != Some(effective) {
            self.output.set_volume(effective);
            self.applied_volume = Some(effective);
        }
    }

    /// Forget a refused start so the next sync tries the output again
    pub fn clear_block(&mut self) {
        self.blocked = false;
    }

    /// After a failure, make the next sync reload the current track
    pub fn retry(&mut self) {
        if self.phase == TransportPhase::Failed {
            self.ticket = None;
        }
    }

    pub fn poll(&mut self) {
        self.output.poll();
    }

    pub fn shutdown(&mut self) {
        self.go_idle();
    }

    fn apply_intent(&mut self, playing: bool) -> Option<PlaybackError> {
        if playing {
            if self.phase == TransportPhase::Playing || self.blocked {
                return None;
            }
            match self.output.play() {
                Ok(()) => {
                    self.phase = TransportPhase::Playing;
                    None
                }
                Err(e) => {
                    log::warn!("Output refused to play: {}", e);
                    self.output.pause();
                    self.phase = TransportPhase::Paused;
                    self.blocked = true;
                    Some(e)
                }
            }
        } else {
            if self.phase != TransportPhase::Paused {
                self.output.pause();
                self.phase = TransportPhase::Paused;
            }
            self.blocked = false;
            None
        }
    }

    fn go_idle(&mut self) {
        if self.phase != TransportPhase::Idle || self.ticket.is_some() {
            log::debug!("Transport idle");
            self.output.stop();
        }
        self.phase = TransportPhase::Idle;
        self.ticket = None;
        self.elapsed = 0.0;
        self.duration = None;
        self.blocked = false;
        self.last_error = None;
    }

    fn fail(&mut self, error: PlaybackError) -> PlaybackError {
        self.phase = TransportPhase::Failed;
        self.duration = None;
        self.blocked = false;
        self.last_error = Some(error.clone());
        error
    }

    fn clamp_to_duration(&self, seconds: f32) -> f32 {
        let upper = self.duration.unwrap_or(f32::MAX);
        if seconds.is_finite() {
            seconds.clamp(0.0, upper)
        } else {
            0.0
        }
    }
}
