use std::time::Duration;
use std::{io, path::PathBuf};

use clap::{Parser, ValueEnum};
use crossbeam_channel::TryRecvError;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    crossterm::{
        event::{self, Event, KeyCode, KeyEventKind},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
};

use cadence_core::{
    commands::AudioCommand,
    config::EngineConfig,
    engine::{AudioEngine, AudioEngineHandle},
};

mod router;
mod routes;
mod state;
mod states;
mod ui;

use router::{Router, next_tab, route_for_name};
use routes::playback::PlaybackRoute;
use state::AppState;

type Backend = CrosstermBackend<io::Stdout>;

/// Terminal music player with a play queue and history
#[derive(Parser, Debug)]
#[command(name = "cadence", version, about)]
struct Args {
    /// Audio files or folders to start playing
    files: Vec<PathBuf>,

    /// Initial volume between 0.0 and 1.0
    #[arg(long, default_value_t = 1.0)]
    volume: f32,

    /// Engine tick in milliseconds
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,

    /// Lowest level shown in the log tab
    #[arg(long, value_enum, default_value_t = LogLevel::Debug)]
    log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if !(0.0..=1.0).contains(&args.volume) {
        anyhow::bail!("--volume must be between 0.0 and 1.0, got {}", args.volume);
    }

    // Initialize tui_logger for TUI log display
    let level = log::LevelFilter::from(args.log_level);
    tui_logger::init_logger(level)
        .map_err(|e| anyhow::anyhow!("Failed to init tui_logger: {:?}", e))?;
    tui_logger::set_default_level(level);

    log::info!("Starting Cadence TUI");

    let config = EngineConfig::default()
        .with_initial_volume(args.volume)
        .with_tick_interval(Duration::from_millis(args.tick_ms));
    let (engine_thread, handle) = AudioEngine::spawn(config)?;

    let result = run_tui(&handle, args.files);

    // Ensure clean shutdown
    let _ = handle.cmd_tx.send(AudioCommand::Quit);
    if engine_thread.join().is_err() {
        log::error!("Audio engine thread panicked");
    }

    result
}

fn run_tui(handle: &AudioEngineHandle, initial_files: Vec<PathBuf>) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, handle, initial_files);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<Backend>,
    handle: &AudioEngineHandle,
    initial_files: Vec<PathBuf>,
) -> anyhow::Result<()> {
    let mut state = AppState::new();
    let mut router = Router::new(Box::new(PlaybackRoute));

    setup_initial_state(&mut state, handle, &initial_files)?;

    loop {
        // Handle audio engine responses
        loop {
            match handle.resp_rx.try_recv() {
                Ok(response) => state.handle_response(response),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    state.engine_running = false;
                    break;
                }
            }
        }

        terminal.draw(|f| ui::draw(f, &state, &router))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && handle_key(key.code, &mut state, handle, &mut router)?
                {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Point the browser at the first argument and start the rest as a playlist
fn setup_initial_state(
    state: &mut AppState,
    handle: &AudioEngineHandle,
    files: &[PathBuf],
) -> anyhow::Result<()> {
    let Some(first) = files.first() else {
        return Ok(());
    };

    let target_dir = if first.is_dir() {
        Some(first.clone())
    } else {
        first.parent().map(|p| p.to_path_buf())
    };
    if let Some(dir) = target_dir.filter(|d| !d.as_os_str().is_empty()) {
        if state.browser.open_dir(&dir) {
            log::info!("Browser context set to: {:?}", state.browser.current_dir);
        }
    }

    let tracks = state.library.import_paths(files);
    log::info!("Playing {} tracks from the command line", tracks.len());
    if !tracks.is_empty() {
        handle.cmd_tx.send(AudioCommand::PlayAll(tracks))?;
    }

    Ok(())
}

/// Handle global keys and delegate the rest to the current route.
/// Returns true when the app should quit.
fn handle_key(
    key: KeyCode,
    state: &mut AppState,
    handle: &AudioEngineHandle,
    router: &mut Router,
) -> anyhow::Result<bool> {
    // The file dialog owns the keyboard while it is open
    if !state.is_dialog_open() {
        let command = match key {
            KeyCode::Char('q') => {
                let _ = handle.cmd_tx.send(AudioCommand::Quit);
                return Ok(true);
            }
            KeyCode::Tab => {
                let next = route_for_name(next_tab(router.tab_name()));
                router.replace(next, state, handle)?;
                return Ok(false);
            }
            KeyCode::Esc if router.depth() > 1 => {
                router.pop(state, handle)?;
                return Ok(false);
            }
            KeyCode::Char(' ') => Some(AudioCommand::TogglePlay),
            KeyCode::Char('n') => Some(AudioCommand::Next),
            KeyCode::Char('p') => Some(AudioCommand::Previous),
            KeyCode::Char('r') => Some(AudioCommand::ToggleRepeat),
            _ => None,
        };
        if let Some(command) = command {
            handle.cmd_tx.send(command)?;
            return Ok(false);
        }
    }

    let action = router.current_mut().handle_input(key, state, handle)?;
    router.execute_action(action, state, handle)?;
    Ok(false)
}
