//! Terminal front-end drawing episode snapshots

pub mod renderer;

pub use renderer::{FrameInfo, Renderer, Screen};
