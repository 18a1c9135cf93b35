use cadence_core::{
    catalog::LocalLibrary,
    commands::AudioResponse,
    error::{Notice, NoticeLevel},
};

use crate::states::{AudioState, BrowserState, QueueState};

/// Application state for the TUI
pub struct AppState {
    pub audio: AudioState,
    pub browser: BrowserState,
    pub queue: QueueState,
    /// Tracks imported from disk so far
    pub library: LocalLibrary,
    pub engine_running: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            audio: AudioState::new(),
            browser: BrowserState::new(),
            queue: QueueState::new(),
            library: LocalLibrary::new(),
            engine_running: true,
        }
    }

    /// Handle response from the audio engine
    pub fn handle_response(&mut self, response: AudioResponse) {
        match response {
            AudioResponse::StateChanged(snapshot) => {
                self.queue.sync(snapshot.pending.len(), snapshot.focus);
                self.audio.apply_snapshot(*snapshot);
            }
            AudioResponse::Notice(notice) => self.notify(notice),
            AudioResponse::Error(msg) => self.notify(Notice::error(msg)),
            AudioResponse::Shutdown => {
                self.engine_running = false;
                self.audio.status_message = "Engine shutdown".to_string();
            }
        }
    }

    /// Show a message in the status bar
    pub fn notify(&mut self, notice: Notice) {
        if notice.level == NoticeLevel::Error {
            log::error!("{}", notice.message);
        }
        self.audio.notice = Some(notice);
    }

    /// Check if dialog is open (convenience delegate)
    pub fn is_dialog_open(&self) -> bool {
        self.browser.is_dialog_open()
    }
}
