use cadence_core::{commands::AudioCommand, engine::AudioEngineHandle};
use ratatui::{
    Frame,
    crossterm::event::KeyCode,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use crate::{
    router::{RouteAction, RouteHandler},
    state::AppState,
    states::AudioState,
};

const SEEK_STEP: f32 = 5.0;
const VOLUME_STEP: f32 = 0.05;

#[derive(Debug, Clone)]
pub struct PlaybackRoute;

impl RouteHandler for PlaybackRoute {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        draw_playback_panel(frame, area, state);
    }

    fn handle_input(
        &mut self,
        key: KeyCode,
        state: &mut AppState,
        handle: &AudioEngineHandle,
    ) -> anyhow::Result<RouteAction> {
        match key {
            KeyCode::Up => {
                let volume = state.audio.volume_step(VOLUME_STEP);
                handle.cmd_tx.send(AudioCommand::SetVolume(volume))?;
            }
            KeyCode::Down => {
                let volume = state.audio.volume_step(-VOLUME_STEP);
                handle.cmd_tx.send(AudioCommand::SetVolume(volume))?;
            }
            KeyCode::Right => {
                let target = state.audio.seek_target(SEEK_STEP);
                handle.cmd_tx.send(AudioCommand::Seek(target))?;
            }
            KeyCode::Left => {
                let target = state.audio.seek_target(-SEEK_STEP);
                handle.cmd_tx.send(AudioCommand::Seek(target))?;
            }
            KeyCode::Char('m') => {
                handle.cmd_tx.send(AudioCommand::ToggleMute)?;
            }
            KeyCode::Char('X') => {
                log::info!("Ending session");
                handle.cmd_tx.send(AudioCommand::Reset)?;
            }
            _ => {}
        }
        Ok(RouteAction::None)
    }

    fn name(&self) -> &str {
        "Playback"
    }

    fn help_items(&self, _state: &AppState) -> Vec<(&str, &str)> {
        vec![
            ("Space", "Play/Pause"),
            ("N/P", "Next/Prev"),
            ("R", "Repeat"),
            ("←/→", "Seek"),
            ("↑/↓", "Volume"),
            ("M", "Mute"),
            ("Shift+X", "End Session"),
        ]
    }
}

/// Draw the playback panel
pub fn draw_playback_panel(f: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Now playing info
            Constraint::Length(3), // Progress bar
            Constraint::Min(0),    // Up next
        ])
        .split(area);

    draw_now_playing(f, chunks[0], &state.audio);
    draw_progress(f, chunks[1], &state.audio);
    draw_up_next(f, chunks[2], &state.audio);
}

/// Draw the now playing section
fn draw_now_playing(f: &mut Frame, area: Rect, audio: &AudioState) {
    let block = Block::default()
        .title(" 🎵 Now Playing ")
        .borders(Borders::ALL)
        .border_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(track) = audio.now_playing() else {
        let text = Paragraph::new("Nothing playing").style(Style::default().fg(Color::DarkGray));
        f.render_widget(text, inner);
        return;
    };

    let state_icon = if audio.is_playing() { "▶" } else { "⏸" };
    let text = vec![
        Line::from(vec![
            Span::styled(format!("{} ", state_icon), Style::default().fg(Color::Green)),
            Span::styled(
                track.title(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(track.artist(), Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}  |  {}", audio.snapshot.repeat, audio.volume_label()),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    f.render_widget(Paragraph::new(text), inner);
}

/// Draw the progress bar
fn draw_progress(f: &mut Frame, area: Rect, audio: &AudioState) {
    let progress_pct = (audio.progress() * 100.0) as u16;
    let label = format!(
        "{} / {}",
        AudioState::format_time(audio.snapshot.elapsed),
        AudioState::format_time(audio.duration())
    );

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
        .percent(progress_pct.min(100))
        .label(label);

    f.render_widget(gauge, area);
}

/// The next few pending tracks
fn draw_up_next(f: &mut Frame, area: Rect, audio: &AudioState) {
    let block = Block::default().title(" Up Next ").borders(Borders::ALL);
    let lines: Vec<Line> = audio
        .snapshot
        .pending
        .iter()
        .enumerate()
        .filter(|(i, _)| audio.snapshot.focus.is_none_or(|focus| *i > focus))
        .take(area.height.saturating_sub(2) as usize)
        .map(|(_, track)| Line::from(format!("  {}", track)))
        .collect();

    let paragraph = if lines.is_empty() {
        Paragraph::new("End of queue").style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(lines)
    };
    f.render_widget(paragraph.block(block), area);
}
