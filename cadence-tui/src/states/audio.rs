use cadence_core::{
    error::Notice,
    player::PlayerSnapshot,
    track::Track,
    transport::TransportPhase,
};

/// Playback state mirrored from the engine, plus the last message for the user
#[derive(Debug, Clone, Default)]
pub struct AudioState {
    pub snapshot: PlayerSnapshot,
    /// Most recent notice from the engine
    pub notice: Option<Notice>,
    /// Status message to display
    pub status_message: String,
}

impl AudioState {
    pub fn new() -> Self {
        Self {
            status_message: "Nothing queued. Pass files as arguments or pick some in the Browser."
                .to_string(),
            ..Default::default()
        }
    }

    pub fn apply_snapshot(&mut self, snapshot: PlayerSnapshot) {
        self.status_message = match snapshot.phase {
            TransportPhase::Failed => match &snapshot.last_error {
                Some(e) => format!("Error: {}", e),
                None => "Error".to_string(),
            },
            TransportPhase::Idle if snapshot.pending.is_empty() => "Queue is empty".to_string(),
            TransportPhase::Idle => "Stopped".to_string(),
            TransportPhase::Loading => "Loading...".to_string(),
            _ if snapshot.output_blocked => "Output refused to start, press Space".to_string(),
            TransportPhase::Playing => "Playing".to_string(),
            TransportPhase::Ready | TransportPhase::Paused => "Paused".to_string(),
        };
        self.snapshot = snapshot;
    }

    pub fn now_playing(&self) -> Option<&Track> {
        self.snapshot.current.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.snapshot.is_playing
    }

    /// Duration of the current media, falling back to the catalog's figure
    /// until the output has decoded it
    pub fn duration(&self) -> f32 {
        self.snapshot
            .duration
            .or_else(|| self.now_playing().and_then(|t| t.duration_secs()))
            .unwrap_or(0.0)
    }

    /// Get the progress percentage (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        let duration = self.duration();
        if duration > 0.0 {
            (self.snapshot.elapsed / duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Seek position `delta` seconds away from the current one
    pub fn seek_target(&self, delta: f32) -> f32 {
        (self.snapshot.elapsed + delta).max(0.0)
    }

    /// Volume one step up or down, kept on a clean 0.05 grid
    pub fn volume_step(&self, delta: f32) -> f32 {
        let stepped = ((self.snapshot.volume + delta) * 20.0).round() / 20.0;
        stepped.clamp(0.0, 1.0)
    }

    pub fn volume_label(&self) -> String {
        if self.snapshot.is_muted {
            "🔇 Muted".to_string()
        } else {
            format!("Vol: {:3.0}%", self.snapshot.volume * 100.0)
        }
    }

    /// Format time as MM:SS
    pub fn format_time(seconds: f32) -> String {
        let seconds = seconds.max(0.0);
        let mins = (seconds / 60.0).floor() as u32;
        let secs = (seconds % 60.0).floor() as u32;
        format!("{:02}:{:02}", mins, secs)
    }
}
