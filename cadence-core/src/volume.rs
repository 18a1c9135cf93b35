/// Output level with a non-destructive mute.
///
/// `level` is the user-chosen volume and survives muting; the device is driven
/// with `effective()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    level: f32,
    muted: bool,
    /// Level to restore when unmuting from a zero volume
    fallback: f32,
}

impl Volume {
    pub fn new(level: f32, fallback: f32) -> Self {
        let fallback = if fallback.is_finite() && fallback > 0.0 {
            fallback.min(1.0)
        } else {
            DEFAULT_UNMUTE_LEVEL
        };
        Self {
            level: clamp_level(level),
            muted: false,
            fallback,
        }
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// The level actually applied to the output
    pub fn effective(&self) -> f32 {
        if self.muted { 0.0 } else { self.level }
    }

    /// Set the level (clamped to `[0, 1]`). Any audible level unmutes.
    pub fn set(&mut self, level: f32) {
        self.level = clamp_level(level);
        if self.level > 0.0 {
            self.muted = false;
        }
    }

    /// Flip mute. Unmuting a zero level falls back to an audible default.
    pub fn toggle_mute(&mut self) {
        if self.muted {
            self.muted = false;
            if self.level <= 0.0 {
                self.level = self.fallback;
            }
        } else {
            self.muted = true;
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0, DEFAULT_UNMUTE_LEVEL)
    }
}

pub const DEFAULT_UNMUTE_LEVEL: f32 = 0.5;

fn clamp_level(level: f32) -> f32 {
    if level.is_finite() {
        level.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_clamps_into_unit_range() {
        let mut volume = Volume::default();
        volume.set(1.7);
        assert_eq!(volume.level(), 1.0);
        volume.set(-0.2);
        assert_eq!(volume.level(), 0.0);
    }

    #[test]
    fn mute_keeps_level() {
        let mut volume = Volume::new(0.8, 0.5);
        volume.toggle_mute();
        assert!(volume.is_muted());
        assert_eq!(volume.effective(), 0.0);
        assert_eq!(volume.level(), 0.8);

        volume.toggle_mute();
        assert!(!volume.is_muted());
        assert_eq!(volume.effective(), 0.8);
    }

    #[test]
    fn unmute_from_zero_restores_audible_level() {
        let mut volume = Volume::new(0.8, 0.5);
        volume.set(0.0);
        volume.toggle_mute();
        volume.toggle_mute();
        assert!(volume.effective() > 0.0);
        assert_eq!(volume.level(), 0.5);
    }

    #[test]
    fn audible_level_unmutes() {
        let mut volume = Volume::default();
        volume.toggle_mute();
        volume.set(0.0);
        assert!(volume.is_muted());
        volume.set(0.3);
        assert!(!volume.is_muted());
        assert_eq!(volume.effective(), 0.3);
    }

    #[test]
    fn bogus_fallback_uses_default() {
        let mut volume = Volume::new(0.0, 0.0);
        volume.toggle_mute();
        volume.toggle_mute();
        assert_eq!(volume.level(), DEFAULT_UNMUTE_LEVEL);
    }
}
