pub mod audio;
pub mod browser;
pub mod queue;

pub use audio::AudioState;
pub use browser::{BrowserFileDialog, BrowserState, DialogChoice};
pub use queue::QueueState;
