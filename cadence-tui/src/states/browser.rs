use std::path::{Path, PathBuf};

use cadence_core::browser::{self, FileEntry};
use ratatui::widgets::ListState;
use strum::{EnumIter, IntoEnumIterator};

/// Options offered for a selected file
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, strum::Display)]
pub enum DialogChoice {
    #[strum(serialize = "▶ Play Now")]
    PlayNow,
    #[strum(serialize = "+ Add to Queue")]
    AddToQueue,
}

/// Dialog shown when selecting a file in browser
#[derive(Debug, Clone, Default)]
pub enum BrowserFileDialog {
    #[default]
    None,
    Open { path: PathBuf, choice: DialogChoice },
}

/// Browser state for file navigation
#[derive(Debug, Clone)]
pub struct BrowserState {
    pub current_dir: PathBuf,
    pub items: Vec<FileEntry>,
    pub list_state: ListState,
    pub dialog: BrowserFileDialog,
}

impl BrowserState {
    pub fn new() -> Self {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut state = Self {
            current_dir: current_dir.clone(),
            items: Vec::new(),
            list_state: ListState::default(),
            dialog: BrowserFileDialog::None,
        };
        state.open_dir(&current_dir);
        state
    }

    /// Show `dir`. Keeps the current listing when it cannot be read.
    pub fn open_dir(&mut self, dir: &Path) -> bool {
        match browser::get_directory_content(dir) {
            Ok(items) => {
                self.current_dir = dir.to_path_buf();
                self.list_state.select(if items.is_empty() { None } else { Some(0) });
                self.items = items;
                true
            }
            Err(e) => {
                log::warn!("Cannot open {}: {}", dir.display(), e);
                false
            }
        }
    }

    pub fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.items.len() => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn prev(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => self.items.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn selected_entry(&self) -> Option<&FileEntry> {
        self.items.get(self.list_state.selected()?)
    }

    /// Enter selected directory or return PathBuf if it's a file
    pub fn enter(&mut self) -> Option<PathBuf> {
        let item = self.selected_entry()?.clone();
        if item.is_dir {
            self.open_dir(&item.path);
            None
        } else {
            Some(item.path)
        }
    }

    /// Open the browser file dialog for a given path
    pub fn open_dialog(&mut self, path: PathBuf) {
        self.dialog = BrowserFileDialog::Open {
            path,
            choice: DialogChoice::PlayNow,
        };
    }

    /// Move the dialog selection to the other option
    pub fn dialog_toggle(&mut self) {
        if let BrowserFileDialog::Open { choice, .. } = &mut self.dialog {
            let current = *choice;
            *choice = DialogChoice::iter()
                .find(|c| *c != current)
                .unwrap_or(current);
        }
    }

    /// Close the dialog, returning what was chosen
    pub fn close_dialog(&mut self) -> Option<(PathBuf, DialogChoice)> {
        match std::mem::take(&mut self.dialog) {
            BrowserFileDialog::Open { path, choice } => Some((path, choice)),
            BrowserFileDialog::None => None,
        }
    }

    /// Check if dialog is open
    pub fn is_dialog_open(&self) -> bool {
        !matches!(self.dialog, BrowserFileDialog::None)
    }
}
