use super::state::{Bounds, Point};

/// Check whether `point` is off the board or on the snake.
///
/// `body` is the snake without its moving head (`Snake::body_segments`), so
/// the head is never compared against itself. Pure: policies may probe
/// hypothetical cells with it.
pub fn is_collision(point: Point, body: &[Point], bounds: &Bounds) -> bool {
    if !bounds.contains(point) {
        return true;
    }

    body.contains(&point)
}
