use tracing::{debug, info, warn};

use super::{
    action::{Action, Direction},
    collision::is_collision,
    config::GameConfig,
    error::GameError,
    food::FoodPlacer,
    movement,
    state::{EpisodeState, RenderSnapshot, Snake},
};

/// Length of a freshly spawned snake
pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Snake left the board
    Wall,
    /// Snake ran into its own body
    SelfCollision,
    /// Too many ticks for the current length
    Stall,
}

/// Lifecycle of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Ready,
    Running,
    Terminal,
}

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Set on the tick that ended the episode
    pub termination: Option<Termination>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub reward: f32,
    pub terminal: bool,
    pub score: u32,
    pub info: StepInfo,
}

/// Owns one episode and advances it one tick per `step`.
///
/// Starts in [`Phase::Ready`]; `reset` starts a fresh episode from any phase.
/// Calling `step` before the first `reset` or after the episode ended is an
/// error and leaves the state untouched.
pub struct EpisodeController {
    config: GameConfig,
    food_placer: FoodPlacer,
    state: Option<EpisodeState>,
    episodes: u64,
}

impl EpisodeController {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let food_placer = FoodPlacer::new(config.seed, config.max_food_samples);

        Ok(Self {
            config,
            food_placer,
            state: None,
            episodes: 0,
        })
    }

    /// Discard any running episode and spawn a new one
    pub fn reset(&mut self) -> Result<&EpisodeState, GameError> {
        self.state = None;

        let bounds = self.config.bounds();
        let snake = Snake::spawn(
            bounds.center(),
            Direction::Right,
            INITIAL_SNAKE_LENGTH,
            bounds.block_size,
        );
        let food = self.food_placer.place(&bounds, &snake.body)?;

        self.episodes += 1;
        info!(
            episode = self.episodes,
            head_x = snake.head().x,
            head_y = snake.head().y,
            food_x = food.x,
            food_y = food.y,
            "episode started"
        );

        Ok(self
            .state
            .insert(EpisodeState::new(snake, Direction::Right, food, bounds)))
    }

    /// Advance the running episode by one tick
    pub fn step(&mut self, action: Action) -> Result<StepResult, GameError> {
        let Some(state) = self.state.as_mut() else {
            warn!("step called before reset");
            return Err(GameError::NotStarted);
        };
        if state.terminal {
            warn!(score = state.score, "step called on a finished episode");
            return Err(GameError::EpisodeOver);
        }

        state.frame_iteration += 1;

        let (direction, new_head) =
            movement::resolve(state.direction, state.head(), action, state.bounds.block_size);
        state.direction = direction;
        state.insert_head(new_head);

        let termination = if is_collision(new_head, state.snake.body_segments(), &state.bounds) {
            if state.bounds.contains(new_head) {
                Some(Termination::SelfCollision)
            } else {
                Some(Termination::Wall)
            }
        } else if state.frame_iteration as usize
            > self.config.stall_factor as usize * state.snake.len()
        {
            Some(Termination::Stall)
        } else {
            None
        };

        // The terminating tick keeps the inserted head and never trims the tail
        if let Some(reason) = termination {
            state.terminal = true;
            info!(
                episode = self.episodes,
                score = state.score,
                frames = state.frame_iteration,
                length = state.snake.len(),
                ?reason,
                "episode over"
            );
            return Ok(StepResult {
                reward: self.config.death_penalty,
                terminal: true,
                score: state.score,
                info: StepInfo {
                    ate_food: false,
                    termination: Some(reason),
                },
            });
        }

        let ate_food = state.food == Some(new_head);
        let reward = if ate_food {
            state.increment_score();
            match self.food_placer.place(&state.bounds, &state.snake.body) {
                Ok(food) => state.set_food(food),
                Err(err) => {
                    state.clear_food();
                    state.terminal = true;
                    info!(score = state.score, "snake filled the board");
                    return Err(err);
                }
            }
            self.config.food_reward
        } else {
            state.remove_tail();
            0.0
        };

        debug!(
            frame = state.frame_iteration,
            ?action,
            ?direction,
            head_x = new_head.x,
            head_y = new_head.y,
            ate_food,
            "tick"
        );

        Ok(StepResult {
            reward,
            terminal: false,
            score: state.score,
            info: StepInfo {
                ate_food,
                termination: None,
            },
        })
    }

    pub fn phase(&self) -> Phase {
        match &self.state {
            None => Phase::Ready,
            Some(state) if state.terminal => Phase::Terminal,
            Some(_) => Phase::Running,
        }
    }

    /// Current episode, if `reset` has been called
    pub fn state(&self) -> Option<&EpisodeState> {
        self.state.as_ref()
    }

    pub fn snapshot(&self) -> Option<RenderSnapshot<'_>> {
        self.state.as_ref().map(EpisodeState::snapshot)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Number of episodes started so far
    pub fn episodes(&self) -> u64 {
        self.episodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::Point;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    fn controller(config: GameConfig) -> EpisodeController {
        let mut controller = EpisodeController::new(config).unwrap();
        controller.reset().unwrap();
        controller
    }

    fn state_mut(controller: &mut EpisodeController) -> &mut EpisodeState {
        controller.state.as_mut().unwrap()
    }

    fn has_duplicates(body: &[Point]) -> bool {
        let unique: HashSet<_> = body.iter().collect();
        unique.len() != body.len()
    }

    #[test]
    fn test_reset() {
        let c = controller(GameConfig::default().with_seed(1));
        let state = c.state().unwrap();

        assert_eq!(c.phase(), Phase::Running);
        assert_eq!(
            state.snake.body,
            vec![
                Point::new(500, 400),
                Point::new(480, 400),
                Point::new(460, 400)
            ]
        );
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.score, 0);
        assert_eq!(state.frame_iteration, 0);
        assert!(!state.terminal);
        assert!(state.food.is_some_and(|food| !state.snake.contains(food)));
    }

    #[test]
    fn test_straight_step_on_default_board() {
        let mut c = controller(GameConfig::default().with_seed(1));
        state_mut(&mut c).food = Some(Point::new(0, 0));

        let result = c.step(Action::Straight).unwrap();

        assert_eq!(result.reward, 0.0);
        assert!(!result.terminal);
        assert_eq!(result.score, 0);
        let state = c.state().unwrap();
        assert_eq!(
            state.snake.body,
            vec![
                Point::new(520, 400),
                Point::new(500, 400),
                Point::new(480, 400)
            ]
        );
        assert_eq!(state.frame_iteration, 1);
    }

    #[test]
    fn test_food_consumption() {
        let mut c = controller(GameConfig::small().with_seed(2));
        let head = c.state().unwrap().head();
        state_mut(&mut c).food = Some(head.stepped(Direction::Right, 20));

        let result = c.step(Action::Straight).unwrap();

        assert!(result.info.ate_food);
        assert_eq!(result.reward, 10.0);
        assert_eq!(result.score, 1);
        let state = c.state().unwrap();
        assert_eq!(state.snake.len(), INITIAL_SNAKE_LENGTH + 1);
        assert!(state.food.is_some_and(|food| !state.snake.contains(food)));
    }

    #[test]
    fn test_wall_collision() {
        let mut c = controller(GameConfig::small().with_seed(3));
        {
            let state = state_mut(&mut c);
            state.food = Some(Point::new(0, 0));
            state.snake = Snake::spawn(Point::new(180, 100), Direction::Right, 3, 20);
        }

        let result = c.step(Action::Straight).unwrap();

        assert!(result.terminal);
        assert_eq!(result.reward, -10.0);
        assert_eq!(result.info.termination, Some(Termination::Wall));
        assert_eq!(c.phase(), Phase::Terminal);
        // the terminating tick is not trimmed
        let state = c.state().unwrap();
        assert_eq!(state.snake.len(), 4);
        assert_eq!(state.head(), Point::new(200, 100));
    }

    #[test]
    fn test_self_collision() {
        let mut c = controller(GameConfig::small().with_seed(4));
        {
            let state = state_mut(&mut c);
            state.food = Some(Point::new(0, 0));
            state.snake = Snake::spawn(Point::new(100, 100), Direction::Right, 5, 20);
        }

        // down, left, then up walks back into the body
        c.step(Action::TurnRight).unwrap();
        c.step(Action::TurnRight).unwrap();
        let result = c.step(Action::TurnRight).unwrap();

        assert!(result.terminal);
        assert_eq!(result.info.termination, Some(Termination::SelfCollision));
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_moving_onto_tail_cell_collides() {
        let mut c = controller(GameConfig::small().with_seed(13));
        {
            let state = state_mut(&mut c);
            state.food = Some(Point::new(0, 0));
            // a closed 2x2 square heading up; the tail sits right of the head
            state.snake.body = vec![
                Point::new(100, 100),
                Point::new(100, 120),
                Point::new(120, 120),
                Point::new(120, 100),
            ];
            state.direction = Direction::Up;
        }

        // the tail is checked before it would be trimmed
        let result = c.step(Action::TurnRight).unwrap();

        assert!(result.terminal);
        assert_eq!(result.info.termination, Some(Termination::SelfCollision));
        let state = c.state().unwrap();
        assert_eq!(state.head(), Point::new(120, 100));
        assert_eq!(state.snake.len(), 5);
    }

    #[test]
    fn test_collision_keeps_score() {
        let mut c = controller(GameConfig::small().with_seed(5));
        {
            let state = state_mut(&mut c);
            state.score = 7;
            state.food = Some(Point::new(0, 0));
            state.snake = Snake::spawn(Point::new(0, 100), Direction::Left, 3, 20);
            state.direction = Direction::Left;
        }

        let result = c.step(Action::Straight).unwrap();
        assert!(result.terminal);
        assert_eq!(result.score, 7);
        assert_eq!(result.reward, -10.0);
    }

    #[test]
    fn test_stall_terminates_episode() {
        let mut c = controller(GameConfig::default().with_seed(6));
        state_mut(&mut c).food = Some(Point::new(0, 0));

        // four right turns trace a 2x2 loop that never collides
        let mut last = None;
        for _ in 0..1000 {
            let result = c.step(Action::TurnRight).unwrap();
            if result.terminal {
                last = Some(result);
                break;
            }
        }

        let result = last.expect("stall never triggered");
        assert_eq!(result.info.termination, Some(Termination::Stall));
        assert_eq!(result.reward, -10.0);
        let state = c.state().unwrap();
        assert_eq!(state.snake.len(), 4);
        assert_eq!(state.frame_iteration, 401);
    }

    #[test]
    fn test_step_before_reset_fails() {
        let mut c = EpisodeController::new(GameConfig::small()).unwrap();
        assert_eq!(c.phase(), Phase::Ready);
        assert_eq!(c.step(Action::Straight), Err(GameError::NotStarted));
        assert!(c.state().is_none());
    }

    #[test]
    fn test_step_after_terminal_fails_without_mutation() {
        let mut c = controller(GameConfig::small().with_seed(7));
        {
            let state = state_mut(&mut c);
            state.food = Some(Point::new(0, 0));
            state.snake = Snake::spawn(Point::new(180, 100), Direction::Right, 3, 20);
        }
        assert!(c.step(Action::Straight).unwrap().terminal);
        let before = c.state().unwrap().clone();

        assert_eq!(c.step(Action::Straight), Err(GameError::EpisodeOver));
        assert_eq!(c.state().unwrap(), &before);
    }

    #[test]
    fn test_reset_after_terminal_restarts() {
        let mut c = controller(GameConfig::small().with_seed(8));
        state_mut(&mut c).terminal = true;
        state_mut(&mut c).score = 4;

        c.reset().unwrap();

        assert_eq!(c.phase(), Phase::Running);
        assert_eq!(c.state().unwrap().score, 0);
        assert_eq!(c.episodes(), 2);
        assert!(c.step(Action::Straight).is_ok());
    }

    #[test]
    fn test_full_board_ends_episode() {
        // 4x1 board: the spawned snake leaves exactly one free cell
        let mut c = controller(GameConfig::new(80, 20).with_seed(9));
        assert_eq!(c.state().unwrap().food, Some(Point::new(60, 0)));

        assert_eq!(c.step(Action::Straight), Err(GameError::BoardFull));
        assert_eq!(c.phase(), Phase::Terminal);
        let state = c.state().unwrap();
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), 4);
        // the eaten food is gone and nothing replaced it
        assert_eq!(state.food, None);
        assert!(state.snake.body.iter().all(|p| Some(*p) != state.food));
        assert_eq!(c.snapshot().unwrap().food, None);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(EpisodeController::new(GameConfig::new(1001, 800)).is_err());
    }

    #[test]
    fn test_random_play_preserves_invariants() {
        let mut c = controller(GameConfig::small().with_seed(10));
        let mut chooser = StdRng::seed_from_u64(11);

        for _ in 0..200 {
            loop {
                let before = c.state().unwrap().clone();
                let action = Action::ALL[chooser.gen_range(0..3)];
                let result = c.step(action).unwrap();
                let after = c.state().unwrap();

                if result.terminal {
                    assert_eq!(result.reward, -10.0);
                    assert_eq!(result.score, before.score);
                    assert_eq!(after.snake.len(), before.snake.len() + 1);
                    break;
                }

                assert!(!has_duplicates(&after.snake.body));
                assert!(after.food.is_some_and(|food| !after.snake.contains(food)));
                if result.info.ate_food {
                    assert_eq!(after.score, before.score + 1);
                    assert_eq!(after.snake.len(), before.snake.len() + 1);
                } else {
                    assert_eq!(after.score, before.score);
                    assert_eq!(after.snake.len(), before.snake.len());
                    assert_eq!(result.reward, 0.0);
                }
            }
            c.reset().unwrap();
        }
    }

    #[test]
    fn test_snapshot_mirrors_state() {
        let c = controller(GameConfig::default().with_seed(12));
        let snapshot = c.snapshot().unwrap();
        let state = c.state().unwrap();

        assert_eq!(snapshot.snake, state.snake.body.as_slice());
        assert_eq!(snapshot.food, state.food);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.bounds, c.config().bounds());
        assert_eq!(snapshot.head(), Some(Point::new(500, 400)));
    }
}
