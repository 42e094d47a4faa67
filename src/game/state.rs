use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A cell origin on the board, in pixel units on a fixed grid pitch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move point by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move one cell of `block_size` in a direction
    pub fn stepped(&self, direction: Direction, block_size: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * block_size, dy * block_size)
    }
}

/// Board dimensions. Valid cells satisfy `0 <= x <= width - block_size`
/// and `0 <= y <= height - block_size`, aligned to `block_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
    pub block_size: i32,
}

impl Bounds {
    pub fn new(width: i32, height: i32, block_size: i32) -> Self {
        Self {
            width,
            height,
            block_size,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0
            && point.x <= self.width - self.block_size
            && point.y >= 0
            && point.y <= self.height - self.block_size
    }

    pub fn columns(&self) -> i32 {
        self.width / self.block_size
    }

    pub fn rows(&self) -> i32 {
        self.height / self.block_size
    }

    pub fn cell_count(&self) -> usize {
        (self.columns().max(0) as usize) * (self.rows().max(0) as usize)
    }

    /// Grid-aligned center cell
    pub fn center(&self) -> Point {
        Point::new(
            (self.columns() / 2) * self.block_size,
            (self.rows() / 2) * self.block_size,
        )
    }

    /// Every valid cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.rows()).flat_map(move |row| {
            (0..self.columns())
                .map(move |col| Point::new(col * self.block_size, row * self.block_size))
        })
    }
}

/// The snake body, head first
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    pub body: Vec<Point>,
}

impl Snake {
    /// Spawn a snake of `length` segments trailing behind `head`
    pub fn spawn(head: Point, direction: Direction, length: usize, block_size: i32) -> Self {
        let back = direction.clockwise().clockwise();

        let mut body = Vec::with_capacity(length);
        let mut segment = head;
        for _ in 0..length {
            body.push(segment);
            segment = segment.stepped(back, block_size);
        }

        Self { body }
    }

    pub fn head(&self) -> Point {
        self.body[0]
    }

    /// Body segments excluding the head
    pub fn body_segments(&self) -> &[Point] {
        &self.body[1..]
    }

    pub fn contains(&self, point: Point) -> bool {
        self.body.contains(&point)
    }

    pub fn insert_head(&mut self, point: Point) {
        self.body.insert(0, point);
    }

    pub fn remove_tail(&mut self) -> Option<Point> {
        if self.body.len() > 1 {
            self.body.pop()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Everything one running episode owns
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeState {
    pub snake: Snake,
    pub direction: Direction,
    /// `None` only once the snake has filled the board
    pub food: Option<Point>,
    pub bounds: Bounds,
    pub score: u32,
    pub frame_iteration: u32,
    pub terminal: bool,
}

impl EpisodeState {
    pub fn new(snake: Snake, direction: Direction, food: Point, bounds: Bounds) -> Self {
        Self {
            snake,
            direction,
            food: Some(food),
            bounds,
            score: 0,
            frame_iteration: 0,
            terminal: false,
        }
    }

    pub fn head(&self) -> Point {
        self.snake.head()
    }

    pub(crate) fn insert_head(&mut self, point: Point) {
        self.snake.insert_head(point);
    }

    pub(crate) fn remove_tail(&mut self) {
        self.snake.remove_tail();
    }

    pub(crate) fn set_food(&mut self, point: Point) {
        self.food = Some(point);
    }

    pub(crate) fn clear_food(&mut self) {
        self.food = None;
    }

    pub(crate) fn increment_score(&mut self) {
        self.score += 1;
    }

    /// Read-only view handed to renderers and observers
    pub fn snapshot(&self) -> RenderSnapshot<'_> {
        RenderSnapshot {
            snake: &self.snake.body,
            food: self.food,
            score: self.score,
            bounds: self.bounds,
            direction: self.direction,
            frame_iteration: self.frame_iteration,
            terminal: self.terminal,
        }
    }
}

/// What an observer may read after a completed tick
#[derive(Debug, Clone, Copy)]
pub struct RenderSnapshot<'a> {
    pub snake: &'a [Point],
    pub food: Option<Point>,
    pub score: u32,
    pub bounds: Bounds,
    pub direction: Direction,
    pub frame_iteration: u32,
    pub terminal: bool,
}

impl RenderSnapshot<'_> {
    pub fn head(&self) -> Option<Point> {
        self.snake.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_movement() {
        let p = Point::new(100, 100);
        assert_eq!(p.stepped(Direction::Right, 20), Point::new(120, 100));
        assert_eq!(p.stepped(Direction::Left, 20), Point::new(80, 100));
        assert_eq!(p.stepped(Direction::Down, 20), Point::new(100, 120));
        assert_eq!(p.stepped(Direction::Up, 20), Point::new(100, 80));
    }

    #[test]
    fn test_snake_spawn() {
        let snake = Snake::spawn(Point::new(500, 400), Direction::Right, 3, 20);
        assert_eq!(
            snake.body,
            vec![
                Point::new(500, 400),
                Point::new(480, 400),
                Point::new(460, 400)
            ]
        );
        assert_eq!(snake.body_segments().len(), 2);
    }

    #[test]
    fn test_remove_tail_keeps_head() {
        let mut snake = Snake::spawn(Point::new(40, 0), Direction::Right, 2, 20);
        assert_eq!(snake.remove_tail(), Some(Point::new(20, 0)));
        assert_eq!(snake.remove_tail(), None);
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn test_bounds() {
        let bounds = Bounds::new(1000, 800, 20);
        assert!(bounds.contains(Point::new(0, 0)));
        assert!(bounds.contains(Point::new(980, 780)));
        assert!(!bounds.contains(Point::new(1000, 0)));
        assert!(!bounds.contains(Point::new(0, 800)));
        assert!(!bounds.contains(Point::new(-20, 0)));
        assert_eq!(bounds.center(), Point::new(500, 400));
        assert_eq!(bounds.cell_count(), 50 * 40);
        assert_eq!(bounds.cells().count(), 50 * 40);
    }

    #[test]
    fn test_center_is_grid_aligned_on_odd_boards() {
        let bounds = Bounds::new(100, 60, 20);
        assert_eq!(bounds.center(), Point::new(40, 20));
    }
}
