pub mod headless;
pub mod play;

pub use headless::{EpisodeOutcome, HeadlessMode};
pub use play::PlayMode;
