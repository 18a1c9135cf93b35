use cadence_core::{commands::AudioCommand, engine::AudioEngineHandle};
use ratatui::{
    Frame,
    crossterm::event::KeyCode,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::{
    router::{RouteAction, RouteHandler},
    routes::history::HistoryRoute,
    state::AppState,
};

/// Queue route
#[derive(Debug, Clone)]
pub struct QueueRoute;

impl RouteHandler for QueueRoute {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        draw_queue_panel(frame, area, state);
    }

    fn handle_input(
        &mut self,
        key: KeyCode,
        state: &mut AppState,
        handle: &AudioEngineHandle,
    ) -> anyhow::Result<RouteAction> {
        match key {
            KeyCode::Up => state.queue.prev(),
            KeyCode::Down => state.queue.next(),
            KeyCode::Enter => {
                if let Some(idx) = state.queue.selected() {
                    handle.cmd_tx.send(AudioCommand::PlayQueueIndex(idx))?;
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(idx) = state.queue.selected() {
                    handle.cmd_tx.send(AudioCommand::RemoveFromQueue(idx))?;
                }
            }
            KeyCode::Char('c') => {
                handle.cmd_tx.send(AudioCommand::ClearQueue)?;
            }
            KeyCode::Char('h') => {
                return Ok(RouteAction::Push(Box::new(HistoryRoute)));
            }
            _ => {}
        }
        Ok(RouteAction::None)
    }

    fn name(&self) -> &str {
        "Queue"
    }

    fn help_items(&self, _state: &AppState) -> Vec<(&str, &str)> {
        vec![
            ("↑/↓", "Navigate"),
            ("Enter", "Play"),
            ("D", "Remove"),
            ("C", "Clear"),
            ("H", "History"),
            ("Tab", "Switch Tab"),
        ]
    }
}

/// Draw the queue panel
pub fn draw_queue_panel(f: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let snapshot = &state.audio.snapshot;

    let current = match &snapshot.current {
        Some(track) => Line::from(vec![
            Span::styled("▶ ", Style::default().fg(Color::Green)),
            Span::styled(
                track.to_string(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        None => Line::from(Span::styled(
            "Nothing playing",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(
        Paragraph::new(current).block(Block::default().title(" Current ").borders(Borders::ALL)),
        chunks[0],
    );

    let title = format!(" Queue ({} tracks) ", snapshot.pending.len());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let items: Vec<ListItem> = snapshot
        .pending
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let is_focus = snapshot.focus == Some(i);
            let prefix = if is_focus { "● " } else { "  " };
            let style = if is_focus {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!("{}{}", prefix, track)).style(style)
        })
        .collect();

    if items.is_empty() {
        let empty_msg = Paragraph::new("Queue is empty. Add files from Browser.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty_msg, chunks[1]);
    } else {
        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(">> ");

        let mut list_state = state.queue.list_state.clone();
        f.render_stateful_widget(list, chunks[1], &mut list_state);
    }
}
