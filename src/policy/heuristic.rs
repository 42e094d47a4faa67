use super::{Observation, Policy};
use crate::game::{Action, movement};

/// Greedy rule-based agent working only from the observation flags
#[derive(Debug, Default)]
pub struct HeuristicPolicy;

impl HeuristicPolicy {
    pub fn new() -> Self {
        Self
    }

    fn is_dangerous(observation: &Observation, action: Action) -> bool {
        match action {
            Action::Straight => observation.danger_straight,
            Action::TurnRight => observation.danger_right,
            Action::TurnLeft => observation.danger_left,
        }
    }
}

impl Policy for HeuristicPolicy {
    fn choose_action(&mut self, observation: &Observation) -> Action {
        let heading = observation.direction();
        let safe: Vec<Action> = Action::ALL
            .into_iter()
            .filter(|&action| !Self::is_dangerous(observation, action))
            .collect();

        safe.iter()
            .copied()
            .find(|&action| observation.food_toward(movement::turn(heading, action)))
            .or_else(|| safe.first().copied())
            .unwrap_or(Action::Straight)
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}
