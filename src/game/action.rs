use serde::{Deserialize, Serialize};

/// Heading of the snake on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
}

impl Direction {
    /// Headings in clockwise order, starting from Right
    pub const CLOCKWISE: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    /// Position of this heading in [`Direction::CLOCKWISE`]
    pub fn clockwise_index(&self) -> usize {
        match self {
            Direction::Right => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Up => 3,
        }
    }

    /// One quarter-turn clockwise
    pub fn clockwise(&self) -> Direction {
        Self::CLOCKWISE[(self.clockwise_index() + 1) % 4]
    }

    /// One quarter-turn counter-clockwise
    pub fn counter_clockwise(&self) -> Direction {
        Self::CLOCKWISE[(self.clockwise_index() + 3) % 4]
    }

    /// Unit step (dx, dy) for this heading; y grows downwards
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Turn relative to the current heading.
///
/// `TurnRight` is always a clockwise quarter-turn and `TurnLeft` a
/// counter-clockwise one, whatever the on-screen heading is. Agents trained
/// against this engine depend on that encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Straight,
    TurnRight,
    TurnLeft,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Straight, Action::TurnRight, Action::TurnLeft];

    /// Index of the action in the one-hot layout `[straight, right, left]`
    pub fn index(&self) -> usize {
        match self {
            Action::Straight => 0,
            Action::TurnRight => 1,
            Action::TurnLeft => 2,
        }
    }

    /// Inverse of [`Action::index`]; `None` for anything outside 0..3
    pub fn from_index(idx: usize) -> Option<Action> {
        Self::ALL.get(idx).copied()
    }

    pub fn one_hot(&self) -> [u8; 3] {
        let mut out = [0; 3];
        out[self.index()] = 1;
        out
    }

    /// The relative action that turns `current` into `target`, if one exists.
    ///
    /// A reversal has no relative encoding and yields `None`.
    pub fn toward(current: Direction, target: Direction) -> Option<Action> {
        if target == current {
            Some(Action::Straight)
        } else if target == current.clockwise() {
            Some(Action::TurnRight)
        } else if target == current.counter_clockwise() {
            Some(Action::TurnLeft)
        } else {
            None
        }
    }
}
