use cadence_core::engine::AudioEngineHandle;
use ratatui::{
    Frame,
    crossterm::event::KeyCode,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders},
};
use tui_logger::{TuiLoggerWidget, TuiWidgetEvent, TuiWidgetState};

use crate::{
    router::{RouteAction, RouteHandler},
    state::AppState,
};

/// Log route. The widget state keeps its own scroll position.
pub struct LogRoute {
    widget_state: TuiWidgetState,
}

impl std::fmt::Debug for LogRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogRoute").finish_non_exhaustive()
    }
}

impl LogRoute {
    pub fn new() -> Self {
        Self {
            widget_state: TuiWidgetState::new(),
        }
    }
}

impl RouteHandler for LogRoute {
    fn render(&self, frame: &mut Frame, area: Rect, _state: &AppState) {
        let log_widget = TuiLoggerWidget::default()
            .block(
                Block::default()
                    .title(" 📋 Log ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .style(Style::default().fg(Color::White))
            .state(&self.widget_state);

        frame.render_widget(log_widget, area);
    }

    fn handle_input(
        &mut self,
        key: KeyCode,
        _state: &mut AppState,
        _handle: &AudioEngineHandle,
    ) -> anyhow::Result<RouteAction> {
        let event = match key {
            KeyCode::Up | KeyCode::PageUp => Some(TuiWidgetEvent::PrevPageKey),
            KeyCode::Down | KeyCode::PageDown => Some(TuiWidgetEvent::NextPageKey),
            KeyCode::End | KeyCode::Esc => Some(TuiWidgetEvent::EscapeKey),
            _ => None,
        };
        if let Some(event) = event {
            self.widget_state.transition(event);
        }
        Ok(RouteAction::None)
    }

    fn name(&self) -> &str {
        "Log"
    }

    fn help_items(&self, _state: &AppState) -> Vec<(&str, &str)> {
        vec![("↑/↓", "Scroll"), ("End", "Follow"), ("Tab", "Switch Tab")]
    }
}
