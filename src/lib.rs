//! Snake RL - a grid Snake engine driven by pluggable decision policies
//!
//! This library provides:
//! - Core simulation (game module): movement, collisions, food, episode lifecycle
//! - Policies (policy module): observation vector, human, rule-based and Q-network drivers
//! - TUI rendering and keyboard input (render, input modules)
//! - Drivers tying them together (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod policy;
pub mod render;
