pub mod browser;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod player;
pub mod queue;
pub mod sink;
pub mod source;
pub mod track;
pub mod transport;
pub mod volume;

/// Route `log` output to stderr, filtered by `RUST_LOG` (default `info`).
/// Front-ends with their own log sink skip this. Safe to call more than once.
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
