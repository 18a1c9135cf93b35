use std::time::Duration;

use crate::volume::{DEFAULT_UNMUTE_LEVEL, Volume};

/// Tunables for the playback engine
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Volume a fresh session starts with (0.0 to 1.0)
    pub initial_volume: f32,
    /// Level restored when unmuting while the volume sits at zero
    pub unmute_fallback_volume: f32,
    /// How often the engine polls the output for position / end of media
    pub tick_interval: Duration,
    /// Smallest position change (seconds) worth reporting as a time update
    pub time_update_resolution: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_volume: 1.0,
            unmute_fallback_volume: DEFAULT_UNMUTE_LEVEL,
            tick_interval: Duration::from_millis(100),
            time_update_resolution: 0.25,
        }
    }
}

impl EngineConfig {
    pub fn with_initial_volume(mut self, volume: f32) -> Self {
        self.initial_volume = volume;
        self
    }

    pub fn with_unmute_fallback(mut self, volume: f32) -> Self {
        self.unmute_fallback_volume = volume;
        self
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        // a zero tick would spin the engine loop
        self.tick_interval = interval.max(Duration::from_millis(10));
        self
    }

    pub fn with_time_update_resolution(mut self, seconds: f32) -> Self {
        self.time_update_resolution = seconds.max(0.0);
        self
    }

    /// Volume for a fresh session
    pub fn volume(&self) -> Volume {
        Volume::new(self.initial_volume, self.unmute_fallback_volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_audible() {
        let config = EngineConfig::default();
        assert_eq!(config.volume().effective(), 1.0);
        assert_eq!(config.tick_interval, Duration::from_millis(100));
    }

    #[test]
    fn setters_sanitise_input() {
        let config = EngineConfig::default()
            .with_initial_volume(3.0)
            .with_tick_interval(Duration::ZERO)
            .with_time_update_resolution(-1.0);
        assert_eq!(config.volume().level(), 1.0);
        assert_eq!(config.tick_interval, Duration::from_millis(10));
        assert_eq!(config.time_update_resolution, 0.0);
    }
}
