pub mod browser;
pub mod history;
pub mod log;
pub mod playback;
pub mod queue;
