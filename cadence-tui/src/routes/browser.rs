use cadence_core::{commands::AudioCommand, engine::AudioEngineHandle, error::Notice};
use ratatui::{
    Frame,
    crossterm::event::KeyCode,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use crate::{
    router::{RouteAction, RouteHandler},
    routes::playback::PlaybackRoute,
    state::AppState,
    states::DialogChoice,
};

/// Browser route - handles both browsing and file dialog as internal state
#[derive(Debug, Clone)]
pub struct BrowserRoute;

impl RouteHandler for BrowserRoute {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        draw_browser_panel(frame, area, state);
    }

    fn handle_input(
        &mut self,
        key: KeyCode,
        state: &mut AppState,
        handle: &AudioEngineHandle,
    ) -> anyhow::Result<RouteAction> {
        if state.browser.is_dialog_open() {
            match key {
                KeyCode::Up | KeyCode::Down => state.browser.dialog_toggle(),
                KeyCode::Enter => {
                    let Some((path, choice)) = state.browser.close_dialog() else {
                        return Ok(RouteAction::None);
                    };
                    let track = match state.library.import(&path) {
                        Ok(track) => track,
                        Err(e) => {
                            state.notify(Notice::error(format!("{:#}", e)));
                            return Ok(RouteAction::None);
                        }
                    };
                    match choice {
                        DialogChoice::PlayNow => {
                            handle.cmd_tx.send(AudioCommand::PlayNow(track))?;
                            return Ok(RouteAction::Replace(Box::new(PlaybackRoute)));
                        }
                        DialogChoice::AddToQueue => {
                            handle.cmd_tx.send(AudioCommand::Enqueue(track))?;
                        }
                    }
                }
                KeyCode::Esc => {
                    state.browser.close_dialog();
                }
                _ => {}
            }
            return Ok(RouteAction::None);
        }

        match key {
            KeyCode::Up => state.browser.prev(),
            KeyCode::Down => state.browser.next(),
            KeyCode::Enter => {
                if let Some(path) = state.browser.enter() {
                    state.browser.open_dialog(path);
                }
            }
            KeyCode::Backspace => {
                if let Some(parent) = state.browser.current_dir.parent().map(|p| p.to_path_buf()) {
                    state.browser.open_dir(&parent);
                }
            }
            KeyCode::Char('a') => {
                // the listed folder becomes the playlist
                let dir = state.browser.current_dir.clone();
                let tracks = state.library.import_paths(&[dir]);
                if tracks.is_empty() {
                    state.notify(Notice::warning("No playable files in this folder."));
                } else {
                    handle.cmd_tx.send(AudioCommand::PlayAll(tracks))?;
                    return Ok(RouteAction::Replace(Box::new(PlaybackRoute)));
                }
            }
            _ => {}
        }
        Ok(RouteAction::None)
    }

    fn name(&self) -> &str {
        "Browser"
    }

    fn help_items(&self, state: &AppState) -> Vec<(&str, &str)> {
        if state.browser.is_dialog_open() {
            vec![("↑/↓", "Choose"), ("Enter", "Confirm"), ("Esc", "Cancel")]
        } else {
            vec![
                ("↑/↓", "Nav"),
                ("Enter", "Select"),
                ("Bksp", "Up"),
                ("A", "Play Folder"),
                ("Tab", "Switch Tab"),
            ]
        }
    }
}

pub fn draw_browser_panel(f: &mut Frame, area: Rect, state: &AppState) {
    let title = format!(" Browser: {} ", state.browser.current_dir.to_string_lossy());

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let items: Vec<ListItem> = state
        .browser
        .items
        .iter()
        .map(|item| {
            let icon = if item.is_dir { "📁" } else { "🎵" };
            let color = if item.is_dir {
                Color::Blue
            } else {
                Color::White
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", icon), Style::default().fg(color)),
                Span::raw(&item.name),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    let mut list_state = state.browser.list_state.clone();
    f.render_stateful_widget(list, area, &mut list_state);
}
