use std::{
    sync::{Arc, Mutex, PoisonError},
    thread,
};

use anyhow::Context;
use crossbeam_channel::Sender;
use rodio::{
    DeviceTrait, OutputStream, OutputStreamBuilder, Sink,
    cpal::{self, traits::HostTrait},
};

use crate::{
    error::PlaybackError,
    output::{AudioOutput, LoadTicket, OutputEvent, OutputEventKind},
    source::{AudioPlaybackData, resolve_locator},
};

/// Hand-over slot between decode threads and the output. Only the load that
/// is still wanted may deposit its buffer.
#[derive(Default)]
struct Staging {
    wanted: Option<LoadTicket>,
    ready: Option<(LoadTicket, AudioPlaybackData)>,
}

impl Staging {
    /// Wait for `ticket`, dropping whatever an earlier load left behind
    fn expect(&mut self, ticket: LoadTicket) {
        self.wanted = Some(ticket);
        self.ready = None;
    }

    fn cancel(&mut self) {
        self.wanted = None;
        self.ready = None;
    }

    fn is_wanted(&self, ticket: &LoadTicket) -> bool {
        self.wanted.as_ref() == Some(ticket)
    }

    /// Keep a decoded buffer. Returns false, dropping `data`, when the load
    /// was superseded while decoding.
    fn deposit(&mut self, ticket: LoadTicket, data: AudioPlaybackData) -> bool {
        if !self.is_wanted(&ticket) {
            return false;
        }
        self.ready = Some((ticket, data));
        true
    }

    fn take(&mut self) -> Option<(LoadTicket, AudioPlaybackData)> {
        self.ready.take()
    }
}

/// What a poll of the active media has to report
#[derive(Debug, PartialEq)]
enum Report {
    Nothing,
    Time(f32),
    Ended,
}

/// Ended once the source ran out and the sink drained; otherwise a time
/// update when the position moved at least `resolution` since the last one.
fn report(
    position: f32,
    finished: bool,
    drained: bool,
    last_reported: Option<f32>,
    resolution: f32,
) -> Report {
    if finished && drained {
        return Report::Ended;
    }
    let due = last_reported.is_none_or(|last| (position - last).abs() >= resolution);
    if due {
        Report::Time(position)
    } else {
        Report::Nothing
    }
}

struct Active {
    ticket: LoadTicket,
    data: AudioPlaybackData,
    last_reported: Option<f32>,
    ended: bool,
}

/// `AudioOutput` on the default rodio device. Media is decoded in full on a
/// background thread and played from memory, so seeking is a position store.
pub struct RodioOutput {
    _stream: OutputStream,
    sink: Sink,
    device_name: String,
    events: Sender<OutputEvent>,
    staging: Arc<Mutex<Staging>>,
    active: Option<Active>,
    resolution: f32,
}

impl RodioOutput {
    /// Open the default output device. The stream is not `Send`; create this
    /// on the thread that will own it.
    pub fn try_new_default(events: Sender<OutputEvent>, resolution: f32) -> anyhow::Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("No default output device found")?;

        let device_name = device.name().unwrap_or_else(|_| "(unknown)".to_string());

        let stream_builder = OutputStreamBuilder::from_device(device)
            .context("cannot create output stream builder from device")?;

        let mut stream = stream_builder.open_stream().context("Cannot create stream output")?;
        stream.log_on_drop(false);

        let sink = Sink::connect_new(stream.mixer());
        sink.pause();
        log::info!("Audio output opened on {}", device_name);

        Ok(RodioOutput {
            _stream: stream,
            sink,
            device_name,
            events,
            staging: Arc::new(Mutex::new(Staging::default())),
            active: None,
            resolution,
        })
    }

    fn staging(&self) -> std::sync::MutexGuard<'_, Staging> {
        self.staging.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move a finished decode from the staging slot into the sink
    fn install_staged(&mut self) {
        let Some((ticket, data)) = self.staging().take() else {
            return;
        };
        log::debug!("Installing decoded media for {}", ticket);
        self.sink.clear();
        self.sink.append(data.create_source());
        self.active = Some(Active {
            ticket,
            data,
            last_reported: None,
            ended: false,
        });
    }

    /// Put the source back after it ran dry
    fn rearm(&mut self) {
        if let Some(active) = &self.active {
            if self.sink.empty() {
                self.sink.append(active.data.create_source());
            }
        }
    }

    fn send(&self, ticket: LoadTicket, kind: OutputEventKind) {
        if self.events.send(OutputEvent::new(ticket, kind)).is_err() {
            log::debug!("Output event dropped, engine is gone");
        }
    }
}

impl AudioOutput for RodioOutput {
    fn load(&mut self, ticket: LoadTicket, locator: &str) -> Result<(), PlaybackError> {
        let path = resolve_locator(locator)?;

        self.sink.clear();
        self.active = None;
        self.staging().expect(ticket.clone());

        let staging = Arc::clone(&self.staging);
        let events = self.events.clone();
        thread::Builder::new()
            .name(format!("decode-{}", ticket))
            .spawn(move || {
                let result = AudioPlaybackData::load_local_audio(&path);

                let mut slot = staging.lock().unwrap_or_else(PoisonError::into_inner);
                let kind = match result {
                    Ok(data) => {
                        let duration = data.duration_seconds();
                        if !slot.deposit(ticket.clone(), data) {
                            log::debug!("Decode of {} finished after being superseded", ticket);
                            return;
                        }
                        OutputEventKind::Loaded { duration }
                    }
                    Err(_) if !slot.is_wanted(&ticket) => return,
                    Err(e) => {
                        log::error!("Decode of {} failed: {:#}", path.display(), e);
                        OutputEventKind::Failed(format!("{:#}", e))
                    }
                };
                drop(slot);
                let _ = events.send(OutputEvent::new(ticket, kind));
            })
            .map_err(|e| PlaybackError::Output(format!("cannot spawn decoder: {}", e)))?;

        Ok(())
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        self.install_staged();
        let Some(active) = &mut self.active else {
            return Err(PlaybackError::PlaybackBlocked("no media loaded".to_string()));
        };
        if active.ended {
            active.data.position_tracker().reset();
            active.ended = false;
            active.last_reported = None;
        }
        self.rearm();
        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.install_staged();
        self.sink.pause();
    }

    fn stop(&mut self) {
        self.sink.clear();
        self.active = None;
        self.staging().cancel();
    }

    fn seek(&mut self, seconds: f32) -> Result<(), PlaybackError> {
        self.install_staged();
        let Some(active) = &mut self.active else {
            return Ok(());
        };
        active.data.position_tracker().seek_to_seconds(seconds);
        active.ended = false;
        active.last_reported = None;
        self.rearm();
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn poll(&mut self) {
        let Some(active) = &mut self.active else {
            return;
        };
        if active.ended {
            return;
        }

        let tracker = active.data.position_tracker();
        let kind = match report(
            tracker.position_seconds(),
            tracker.is_finished(),
            self.sink.empty(),
            active.last_reported,
            self.resolution,
        ) {
            Report::Nothing => return,
            Report::Ended => {
                active.ended = true;
                OutputEventKind::Ended
            }
            Report::Time(position) => {
                active.last_reported = Some(position);
                OutputEventKind::TimeUpdate { position }
            }
        };
        let ticket = active.ticket.clone();
        self.send(ticket, kind);
    }

    fn name(&self) -> &str {
        &self.device_name
    }
}
