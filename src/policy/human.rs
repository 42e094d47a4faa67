use super::{Observation, Policy};
use crate::game::{Action, Direction};

/// Keyboard-driven policy.
///
/// Keys name absolute headings; the latest one is turned into a relative
/// action on the next tick. Asking to reverse keeps the snake going straight.
#[derive(Debug, Default)]
pub struct HumanPolicy {
    pending: Option<Direction>,
}

impl HumanPolicy {
    pub fn new() -> Self {
        Self { pending: None }
    }
}

impl Policy for HumanPolicy {
    fn choose_action(&mut self, observation: &Observation) -> Action {
        self.pending
            .take()
            .and_then(|target| Action::toward(observation.direction(), target))
            .unwrap_or(Action::Straight)
    }

    fn name(&self) -> &'static str {
        "human"
    }

    fn on_steer(&mut self, direction: Direction) {
        self.pending = Some(direction);
    }
}
