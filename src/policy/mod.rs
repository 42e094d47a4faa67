//! Decision policies driving the snake
//!
//! Every driver sees the game through the same [`Observation`] and answers
//! with a relative [`Action`]:
//! - [`HumanPolicy`] - keyboard steering
//! - [`HeuristicPolicy`] - rule-based agent
//! - [`QNetPolicy`] - persisted Q-network loaded once at startup

pub mod heuristic;
pub mod human;
pub mod observation;
pub mod qnet;

pub use heuristic::HeuristicPolicy;
pub use human::HumanPolicy;
pub use observation::{OBSERVATION_SIZE, Observation};
pub use qnet::{InferenceBackend, ModelMetadata, QNetPolicy, QNetwork, QNetworkConfig};

use thiserror::Error;

use crate::game::{Action, Direction};

/// Something that picks the next action from an observation
pub trait Policy {
    fn choose_action(&mut self, observation: &Observation) -> Action;

    /// Short label shown in the UI and logs
    fn name(&self) -> &'static str;

    /// Steering input from a person; autonomous policies ignore it
    fn on_steer(&mut self, _direction: Direction) {}
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn choose_action(&mut self, observation: &Observation) -> Action {
        (**self).choose_action(observation)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn on_steer(&mut self, direction: Direction) {
        (**self).on_steer(direction)
    }
}

/// Failures while building a policy
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("failed to read policy artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse policy artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to load network weights: {0}")]
    Record(String),
    #[error("malformed network: {0}")]
    Shape(String),
}
