use cadence_core::{commands::AudioCommand, engine::AudioEngineHandle};
use ratatui::{
    Frame,
    crossterm::event::KeyCode,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::{
    router::{RouteAction, RouteHandler},
    state::AppState,
};

/// Previously played tracks, most recent first. Pushed on top of the queue tab.
#[derive(Debug, Clone)]
pub struct HistoryRoute;

impl RouteHandler for HistoryRoute {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let history = &state.audio.snapshot.history;
        let block = Block::default()
            .title(format!(" History ({}) ", history.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta));

        if history.is_empty() {
            let empty = Paragraph::new("Nothing played yet.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = history
            .iter()
            .rev()
            .map(|track| ListItem::new(format!("  {}", track)))
            .collect();
        frame.render_widget(List::new(items).block(block), area);
    }

    fn handle_input(
        &mut self,
        key: KeyCode,
        _state: &mut AppState,
        handle: &AudioEngineHandle,
    ) -> anyhow::Result<RouteAction> {
        match key {
            KeyCode::Char('h') | KeyCode::Backspace => return Ok(RouteAction::Pop),
            KeyCode::Enter => {
                handle.cmd_tx.send(AudioCommand::Previous)?;
            }
            _ => {}
        }
        Ok(RouteAction::None)
    }

    fn name(&self) -> &str {
        "History"
    }

    fn help_items(&self, _state: &AppState) -> Vec<(&str, &str)> {
        vec![("Enter", "Play Previous"), ("H", "Back")]
    }
}
