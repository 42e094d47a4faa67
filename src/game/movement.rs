use super::action::{Action, Direction};
use super::state::Point;

/// Apply a relative action to the current heading
pub fn turn(current: Direction, action: Action) -> Direction {
    match action {
        Action::Straight => current,
        Action::TurnRight => current.clockwise(),
        Action::TurnLeft => current.counter_clockwise(),
    }
}

/// Resolve an action into the new heading and the cell the head moves to
pub fn resolve(
    current: Direction,
    head: Point,
    action: Action,
    block_size: i32,
) -> (Direction, Point) {
    let direction = turn(current, action);
    (direction, head.stepped(direction, block_size))
}
