use std::thread::{self, JoinHandle};

use anyhow::Context;
use crossbeam_channel::{Receiver, Sender, bounded, never, select, tick, unbounded};

use crate::{
    commands::{AudioCommand, AudioResponse},
    config::EngineConfig,
    output::{AudioOutput, OutputEvent},
    player::{Player, PlayerSnapshot},
    sink::RodioOutput,
};

/// UI side of the engine: send commands, receive responses
pub struct AudioEngineHandle {
    pub cmd_tx: Sender<AudioCommand>,
    pub resp_rx: Receiver<AudioResponse>,
}

/// Runs the player on a dedicated thread. Commands, output events and the
/// periodic tick are all handled on that thread, one at a time.
pub struct AudioEngine {
    player: Player,
    resp_tx: Sender<AudioResponse>,
    last_snapshot: Option<PlayerSnapshot>,
}

impl AudioEngine {
    /// Spawn the engine on the default audio device
    pub fn spawn(config: EngineConfig) -> anyhow::Result<(JoinHandle<()>, AudioEngineHandle)> {
        let resolution = config.time_update_resolution;
        Self::spawn_with(config, move |events| {
            let output = RodioOutput::try_new_default(events, resolution)?;
            Ok(Box::new(output) as Box<dyn AudioOutput>)
        })
    }

    /// Spawn the engine with a custom output. `make_output` runs on the
    /// engine thread; a failure there is returned from this call.
    pub fn spawn_with<F>(
        config: EngineConfig,
        make_output: F,
    ) -> anyhow::Result<(JoinHandle<()>, AudioEngineHandle)>
    where
        F: FnOnce(Sender<OutputEvent>) -> anyhow::Result<Box<dyn AudioOutput>> + Send + 'static,
    {
        let (cmd_tx, cmd_rx) = unbounded();
        let (resp_tx, resp_rx) = unbounded();
        let (ready_tx, ready_rx) = bounded::<Result<(), String>>(1);

        let thread = thread::Builder::new()
            .name("audio-engine".to_string())
            .spawn(move || {
                let (event_tx, event_rx) = unbounded();
                let output = match make_output(event_tx) {
                    Ok(output) => output,
                    Err(e) => {
                        let _ = ready_tx.send(Err(format!("{:#}", e)));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));

                let interval = config.tick_interval;
                let engine = AudioEngine {
                    player: Player::new(output, config),
                    resp_tx,
                    last_snapshot: None,
                };
                engine.run(cmd_rx, event_rx, interval);
            })
            .context("Failed to spawn audio engine thread")?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok((thread, AudioEngineHandle { cmd_tx, resp_rx })),
            Ok(Err(e)) => {
                let _ = thread.join();
                anyhow::bail!("Audio output unavailable: {}", e)
            }
            Err(_) => {
                let _ = thread.join();
                anyhow::bail!("Audio engine thread exited during startup")
            }
        }
    }

    fn run(
        mut self,
        cmd_rx: Receiver<AudioCommand>,
        event_rx: Receiver<OutputEvent>,
        interval: std::time::Duration,
    ) {
        log::info!(
            "Audio engine started on {}",
            self.player.transport().output_name()
        );
        self.publish();

        let ticker = tick(interval);
        let closed = never();
        let mut events_open = true;
        loop {
            let events = if events_open { &event_rx } else { &closed };
            select! {
                recv(cmd_rx) -> msg => match msg {
                    Ok(AudioCommand::Quit) => {
                        log::info!("Audio engine received quit");
                        break;
                    }
                    Ok(cmd) => self.handle_command(cmd),
                    Err(_) => {
                        log::info!("Command channel closed, stopping audio engine");
                        break;
                    }
                },
                recv(events) -> msg => match msg {
                    Ok(event) => self.player.handle_output_event(event),
                    Err(_) => events_open = false,
                },
                recv(ticker) -> _ => self.player.tick(),
            }
            self.publish();
        }

        self.player.shutdown();
        self.publish();
        let _ = self.resp_tx.send(AudioResponse::Shutdown);
    }

    fn handle_command(&mut self, cmd: AudioCommand) {
        let player = &mut self.player;
        let result = match cmd {
            AudioCommand::PlayNow(track) => player.play_now(track),
            AudioCommand::PlayAll(tracks) => player.play_all(tracks),
            AudioCommand::Enqueue(track) => player.enqueue(track).map(|_| ()),
            AudioCommand::PlayQueueIndex(index) => player.play_from_queue(index),
            AudioCommand::RemoveFromQueue(index) => player.remove_from_queue(index).map(|_| ()),
            AudioCommand::ClearQueue => {
                player.clear();
                Ok(())
            }
            AudioCommand::Next => {
                player.next();
                Ok(())
            }
            AudioCommand::Previous => {
                player.previous();
                Ok(())
            }
            AudioCommand::Play => {
                player.play();
                Ok(())
            }
            AudioCommand::Pause => {
                player.pause();
                Ok(())
            }
            AudioCommand::TogglePlay => {
                player.toggle_play();
                Ok(())
            }
            AudioCommand::Seek(seconds) => player.seek(seconds),
            AudioCommand::SetVolume(volume) => player.set_volume(volume),
            AudioCommand::ToggleMute => {
                player.toggle_mute();
                Ok(())
            }
            AudioCommand::ToggleRepeat => {
                player.toggle_repeat();
                Ok(())
            }
            AudioCommand::Reset => {
                player.reset();
                Ok(())
            }
            AudioCommand::Quit => Ok(()),
        };

        if let Err(e) = result {
            log::warn!("Command rejected: {}", e);
            self.send(AudioResponse::Error(e.to_string()));
        }
    }

    /// Forward pending notices and the snapshot if it changed
    fn publish(&mut self) {
        for notice in self.player.take_notices() {
            self.send(AudioResponse::Notice(notice));
        }

        let snapshot = self.player.snapshot();
        if self.last_snapshot.as_ref() != Some(&snapshot) {
            self.send(AudioResponse::StateChanged(Box::new(snapshot.clone())));
            self.last_snapshot = Some(snapshot);
        }
    }

    fn send(&self, response: AudioResponse) {
        if self.resp_tx.send(response).is_err() {
            log::debug!("Response dropped, UI is gone");
        }
    }
}
