use cadence_core::error::NoticeLevel;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use strum::IntoEnumIterator;

use crate::{
    router::{Router, tab_names},
    state::AppState,
    states::{BrowserFileDialog, DialogChoice},
};

/// Draw the TUI interface
pub fn draw(f: &mut Frame, state: &AppState, router: &Router) {
    // Main horizontal split: Sidebar (left) and Main Content (right)
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([
            Constraint::Length(15), // Sidebar navigation
            Constraint::Min(40),    // Main content area
        ])
        .split(f.area());

    draw_sidebar(f, main_chunks[0], router);
    draw_main_content(f, main_chunks[1], state, router);

    if state.is_dialog_open() {
        draw_browser_dialog(f, f.area(), state);
    }
}

/// Draw the sidebar navigation
fn draw_sidebar(f: &mut Frame, area: Rect, router: &Router) {
    let block = Block::default()
        .title(" Navigation ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let active = router.tab_name();
    let nav_text: Vec<Line> = tab_names()
        .iter()
        .map(|tab| {
            let is_active = *tab == active;
            let prefix = if is_active { "▶ " } else { "  " };
            let style = if is_active {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(format!("{}{}", prefix, tab), style))
        })
        .collect();

    f.render_widget(Paragraph::new(nav_text), inner);
}

/// Draw the main content area for the current route
fn draw_main_content(f: &mut Frame, area: Rect, state: &AppState, router: &Router) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Route content
            Constraint::Length(3), // Controls info
            Constraint::Length(3), // Status bar
        ])
        .split(area);

    router.current().render(f, chunks[0], state);
    draw_controls(f, chunks[1], state, router);
    draw_status(f, chunks[2], state);
}

/// Key hints of the current route followed by the global ones
fn draw_controls(f: &mut Frame, area: Rect, state: &AppState, router: &Router) {
    let route = router.current();
    let mut items = route.help_items(state);
    if router.depth() > 1 {
        items.push(("Esc", "Back"));
    }
    items.push(("Q", "Quit"));

    let spans: Vec<Span> = items
        .into_iter()
        .flat_map(|(key, label)| {
            let key_color = match key {
                "Q" => Color::Red,
                "Tab" | "Esc" => Color::Magenta,
                _ => Color::Yellow,
            };
            [
                Span::styled(format!("[{}]", key), Style::default().fg(key_color)),
                Span::raw(format!(" {}  ", label)),
            ]
        })
        .collect();

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Controls "));

    f.render_widget(paragraph, area);
}

/// Draw the status section
fn draw_status(f: &mut Frame, area: Rect, state: &AppState) {
    let audio = &state.audio;

    let status_style = match &audio.notice {
        Some(notice) => Style::default().fg(match notice.level {
            NoticeLevel::Error => Color::Red,
            NoticeLevel::Warning => Color::Yellow,
            NoticeLevel::Success => Color::Green,
            NoticeLevel::Info => Color::Cyan,
        }),
        None if audio.is_playing() => Style::default().fg(Color::Green),
        None => Style::default().fg(Color::Yellow),
    };

    let mut parts: Vec<String> = Vec::new();
    if !state.engine_running {
        parts.push("Engine stopped".to_string());
    }
    if let Some(notice) = &audio.notice {
        parts.push(notice.message.clone());
    }
    parts.push(audio.status_message.clone());
    parts.push(audio.volume_label());
    parts.push(format!("Queue: {}", audio.snapshot.pending.len()));
    parts.push(audio.snapshot.repeat.to_string());
    let status_text = parts.join("  |  ");

    let paragraph = Paragraph::new(status_text)
        .style(status_style)
        .block(Block::default().borders(Borders::ALL).title(" Status "));

    f.render_widget(paragraph, area);
}

/// Draw the browser file dialog overlay
fn draw_browser_dialog(f: &mut Frame, area: Rect, state: &AppState) {
    let BrowserFileDialog::Open { path, choice } = &state.browser.dialog else {
        return;
    };

    // Calculate centered dialog area
    let dialog_width = 40u16.min(area.width);
    let dialog_height = 6u16.min(area.height);
    let x = (area.width.saturating_sub(dialog_width)) / 2;
    let y = (area.height.saturating_sub(dialog_height)) / 2;
    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    // Clear the area behind dialog
    f.render_widget(Clear, dialog_area);

    let filename = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "file".to_string());

    let block = Block::default()
        .title(format!(" {} ", filename))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(dialog_area);
    f.render_widget(block, dialog_area);

    let text: Vec<Line> = DialogChoice::iter()
        .map(|option| {
            let is_selected = option == *choice;
            let style = if is_selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let prefix = if is_selected { "> " } else { "  " };
            Line::from(Span::styled(format!("{}{}", prefix, option), style))
        })
        .collect();

    f.render_widget(Paragraph::new(text), inner);
}
