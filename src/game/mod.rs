//! Core simulation for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! A policy picks relative actions, the [`EpisodeController`] advances one tick per
//! action, and renderers read [`RenderSnapshot`]s between ticks.

pub mod action;
pub mod collision;
pub mod config;
pub mod engine;
pub mod error;
pub mod food;
pub mod movement;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use collision::is_collision;
pub use config::GameConfig;
pub use engine::{EpisodeController, Phase, StepInfo, StepResult, Termination};
pub use error::GameError;
pub use food::FoodPlacer;
pub use state::{Bounds, EpisodeState, Point, RenderSnapshot, Snake};
