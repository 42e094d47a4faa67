use crate::game::{Direction, EpisodeState, is_collision};

/// Number of features in an [`Observation`]
pub const OBSERVATION_SIZE: usize = 11;

/// Boolean view of an episode handed to policies.
///
/// Layout of [`Observation::to_array`]:
/// - 0..3: danger straight ahead, after a right turn, after a left turn
/// - 3..7: heading is left, right, up, down
/// - 7..11: food is left of, right of, above, below the head
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub danger_straight: bool,
    pub danger_right: bool,
    pub danger_left: bool,
    pub dir_left: bool,
    pub dir_right: bool,
    pub dir_up: bool,
    pub dir_down: bool,
    pub food_left: bool,
    pub food_right: bool,
    pub food_up: bool,
    pub food_down: bool,
}

impl Observation {
    /// Probe the cells around the head and compare the head with the food
    pub fn from_state(state: &EpisodeState) -> Self {
        let head = state.head();
        let body = state.snake.body_segments();
        let block = state.bounds.block_size;
        let direction = state.direction;

        let danger = |heading: Direction| {
            is_collision(head.stepped(heading, block), body, &state.bounds)
        };

        Self {
            danger_straight: danger(direction),
            danger_right: danger(direction.clockwise()),
            danger_left: danger(direction.counter_clockwise()),
            dir_left: direction == Direction::Left,
            dir_right: direction == Direction::Right,
            dir_up: direction == Direction::Up,
            dir_down: direction == Direction::Down,
            food_left: state.food.is_some_and(|food| food.x < head.x),
            food_right: state.food.is_some_and(|food| food.x > head.x),
            food_up: state.food.is_some_and(|food| food.y < head.y),
            food_down: state.food.is_some_and(|food| food.y > head.y),
        }
    }

    pub fn to_array(&self) -> [bool; OBSERVATION_SIZE] {
        [
            self.danger_straight,
            self.danger_right,
            self.danger_left,
            self.dir_left,
            self.dir_right,
            self.dir_up,
            self.dir_down,
            self.food_left,
            self.food_right,
            self.food_up,
            self.food_down,
        ]
    }

    /// Features as 0.0/1.0 for numeric models
    pub fn to_features(&self) -> [f32; OBSERVATION_SIZE] {
        self.to_array().map(|flag| if flag { 1.0 } else { 0.0 })
    }

    /// Heading encoded in the direction flags
    pub fn direction(&self) -> Direction {
        if self.dir_left {
            Direction::Left
        } else if self.dir_up {
            Direction::Up
        } else if self.dir_down {
            Direction::Down
        } else {
            Direction::Right
        }
    }

    /// Whether heading in `direction` would bring the head closer to the food
    pub fn food_toward(&self, direction: Direction) -> bool {
        match direction {
            Direction::Left => self.food_left,
            Direction::Right => self.food_right,
            Direction::Up => self.food_up,
            Direction::Down => self.food_down,
        }
    }
}
