#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use cadence_core::{
    config::EngineConfig,
    error::PlaybackError,
    output::{AudioOutput, LoadTicket, OutputEvent, OutputEventKind},
    player::Player,
    track::Track,
};
use crossbeam_channel::Sender;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load(String),
    Play,
    Pause,
    Stop,
    Seek(f32),
    Volume(f32),
}

#[derive(Default)]
struct Script {
    calls: Vec<Call>,
    last_ticket: Option<LoadTicket>,
    refuse_play: bool,
    /// Report `Loaded` with this duration as soon as a load is issued
    auto_load: Option<f32>,
    events: Option<Sender<OutputEvent>>,
    polls: usize,
}

/// In-memory output that records every call made to it
pub struct ScriptedOutput {
    script: Arc<Mutex<Script>>,
}

/// Test side of a `ScriptedOutput`
#[derive(Clone)]
pub struct Remote {
    script: Arc<Mutex<Script>>,
}

pub fn scripted() -> (ScriptedOutput, Remote) {
    let script = Arc::new(Mutex::new(Script::default()));
    (
        ScriptedOutput {
            script: Arc::clone(&script),
        },
        Remote { script },
    )
}

impl AudioOutput for ScriptedOutput {
    fn load(&mut self, ticket: LoadTicket, locator: &str) -> Result<(), PlaybackError> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(Call::Load(locator.to_string()));
        script.last_ticket = Some(ticket.clone());
        if let (Some(duration), Some(events)) = (script.auto_load, &script.events) {
            let _ = events.send(OutputEvent::new(ticket, OutputEventKind::Loaded { duration }));
        }
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        let mut script = self.script.lock().unwrap();
        if script.refuse_play {
            return Err(PlaybackError::PlaybackBlocked("not allowed".to_string()));
        }
        script.calls.push(Call::Play);
        Ok(())
    }

    fn pause(&mut self) {
        self.script.lock().unwrap().calls.push(Call::Pause);
    }

    fn stop(&mut self) {
        self.script.lock().unwrap().calls.push(Call::Stop);
    }

    fn seek(&mut self, seconds: f32) -> Result<(), PlaybackError> {
        self.script.lock().unwrap().calls.push(Call::Seek(seconds));
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.script.lock().unwrap().calls.push(Call::Volume(volume));
    }

    fn poll(&mut self) {
        self.script.lock().unwrap().polls += 1;
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

impl Remote {
    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut self.script.lock().unwrap().calls)
    }

    /// Number of times the engine polled the output
    pub fn polls(&self) -> usize {
        self.script.lock().unwrap().polls
    }

    pub fn refuse_play(&self, refuse: bool) {
        self.script.lock().unwrap().refuse_play = refuse;
    }

    pub fn auto_load(&self, duration: f32, events: Sender<OutputEvent>) {
        let mut script = self.script.lock().unwrap();
        script.auto_load = Some(duration);
        script.events = Some(events);
    }

    /// Ticket of the most recent load
    pub fn ticket(&self) -> LoadTicket {
        self.script
            .lock()
            .unwrap()
            .last_ticket
            .clone()
            .expect("nothing was loaded")
    }

    /// An event for the most recent load
    pub fn event(&self, kind: OutputEventKind) -> OutputEvent {
        OutputEvent::new(self.ticket(), kind)
    }

    /// Push an event through the output's channel, as a device would
    pub fn emit(&self, kind: OutputEventKind) {
        let event = self.event(kind);
        let script = self.script.lock().unwrap();
        script
            .events
            .as_ref()
            .expect("no event channel attached")
            .send(event)
            .unwrap();
    }
}

pub fn track(id: &str) -> Arc<Track> {
    Track::builder(id, format!("/music/{id}.mp3"))
        .title(id.to_uppercase())
        .artist("Test Artist")
        .build_shared()
        .unwrap()
}

pub fn player() -> (Player, Remote) {
    cadence_core::init_logger();
    let (output, remote) = scripted();
    let player = Player::new(Box::new(output), EngineConfig::default());
    remote.take_calls();
    (player, remote)
}

/// Report the most recent load as decoded
pub fn finish_load(player: &mut Player, remote: &Remote, duration: f32) {
    player.handle_output_event(remote.event(OutputEventKind::Loaded { duration }));
}

pub fn ids(tracks: &[Arc<Track>]) -> Vec<String> {
    tracks.iter().map(|t| t.id().to_string()).collect()
}
