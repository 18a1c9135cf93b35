use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Instant,
};

use anyhow::Context;
use rodio::{Decoder, Source};

use crate::error::PlaybackError;

/// Turn a track's audio locator into a local path. Plain paths and
/// `file://` locators are supported; any other scheme is a media error.
pub fn resolve_locator(locator: &str) -> Result<PathBuf, PlaybackError> {
    if let Some(path) = locator.strip_prefix("file://") {
        return Ok(PathBuf::from(path));
    }
    if let Some((scheme, _)) = locator.split_once("://") {
        return Err(PlaybackError::MediaLoad(format!(
            "unsupported locator scheme '{}'",
            scheme
        )));
    }
    Ok(PathBuf::from(locator))
}

/// Shared position tracker between source and output
#[derive(Clone)]
pub struct PositionTracker {
    /// Current sample position (atomic for thread-safe access)
    position: Arc<AtomicUsize>,
    /// Total number of samples
    total_samples: usize,
    /// Sample rate for time calculations
    sample_rate: u32,
    /// Number of channels
    channels: u16,
}

impl PositionTracker {
    pub fn new(total_samples: usize, sample_rate: u32, channels: u16) -> Self {
        Self {
            position: Arc::new(AtomicUsize::new(0)),
            total_samples,
            sample_rate: sample_rate.max(1),
            channels: channels.max(1),
        }
    }

    /// Get current position in seconds
    pub fn position_seconds(&self) -> f32 {
        let pos = self.position.load(Ordering::Relaxed);
        let frames = pos / (self.channels as usize);
        (frames as f32) / (self.sample_rate as f32)
    }

    /// Get total duration in seconds
    pub fn duration_seconds(&self) -> f32 {
        let frames = self.total_samples / (self.channels as usize);
        (frames as f32) / (self.sample_rate as f32)
    }

    /// Set position from seconds
    pub fn seek_to_seconds(&self, seconds: f32) {
        let frames = (seconds.max(0.0) * (self.sample_rate as f32)) as usize;
        let sample_pos = (frames * (self.channels as usize)).min(self.total_samples);
        self.position.store(sample_pos, Ordering::Relaxed);
    }

    /// Whether every sample has been handed to the device
    pub fn is_finished(&self) -> bool {
        self.position.load(Ordering::Relaxed) >= self.total_samples
    }

    /// Reset position to start
    pub fn reset(&self) {
        self.position.store(0, Ordering::Relaxed);
    }
}

/// Fully decoded media, ready to be played from any position
#[derive(Clone)]
pub struct AudioPlaybackData {
    buffer: Arc<Vec<f32>>,
    sample_rate: u32,
    channels: u16,
    position_tracker: PositionTracker,
}

impl AudioPlaybackData {
    pub fn load_local_audio(path: &Path) -> anyhow::Result<AudioPlaybackData> {
        let start_time = Instant::now();

        let file = File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let decoder = Decoder::try_from(file).context("Failed to decode the opened audio file")?;

        let sample_rate = decoder.sample_rate();
        let num_channels = decoder.channels();
        if sample_rate == 0 || num_channels == 0 {
            anyhow::bail!("{} reports no audio stream", path.display());
        }

        log::debug!("Starting full decode of {}", path.display());
        let samples: Vec<f32> = decoder.collect();
        log::debug!("Finished decoding {} samples.", samples.len());

        let data = Self::from_samples(samples, sample_rate, num_channels);
        log::debug!("Load audio finished in {:?}", start_time.elapsed());
        Ok(data)
    }

    /// Wrap already decoded interleaved samples
    pub fn from_samples(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        let position_tracker = PositionTracker::new(samples.len(), sample_rate, channels);
        Self {
            buffer: Arc::new(samples),
            sample_rate: sample_rate.max(1),
            channels: channels.max(1),
            position_tracker,
        }
    }

    pub fn duration_seconds(&self) -> f32 {
        self.position_tracker.duration_seconds()
    }

    /// Get a reference to the position tracker
    pub fn position_tracker(&self) -> &PositionTracker {
        &self.position_tracker
    }

    /// Create a rodio Source reading from the shared position
    pub fn create_source(&self) -> BufferedSource {
        BufferedSource {
            samples: Arc::clone(&self.buffer),
            sample_rate: self.sample_rate,
            channels: self.channels,
            position_tracker: self.position_tracker.clone(),
        }
    }
}

/// A buffered audio source that implements rodio's Source trait
pub struct BufferedSource {
    samples: Arc<Vec<f32>>,
    sample_rate: u32,
    channels: u16,
    position_tracker: PositionTracker,
}

impl Iterator for BufferedSource {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.position_tracker.position.load(Ordering::Relaxed);
        if pos < self.samples.len() {
            let sample = self.samples[pos];
            self.position_tracker.position.store(pos + 1, Ordering::Relaxed);
            Some(sample)
        } else {
            None
        }
    }
}

impl Source for BufferedSource {
    fn current_span_len(&self) -> Option<usize> {
        let pos = self.position_tracker.position.load(Ordering::Relaxed);
        Some(self.samples.len().saturating_sub(pos))
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<std::time::Duration> {
        let frames = self.samples.len() / (self.channels as usize);
        Some(std::time::Duration::from_secs_f64((frames as f64) / (self.sample_rate as f64)))
    }
}
