use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::warn;

use super::error::GameError;
use super::state::{Bounds, Point};

/// Picks food cells uniformly among the cells the snake does not cover
pub struct FoodPlacer {
    rng: StdRng,
    max_samples: usize,
}

impl FoodPlacer {
    pub fn new(seed: Option<u64>, max_samples: usize) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, max_samples }
    }

    /// Choose a free cell for the food.
    ///
    /// Rejection-samples up to `max_samples` times, then draws from the
    /// enumerated free cells so a crowded board still terminates.
    pub fn place(&mut self, bounds: &Bounds, snake: &[Point]) -> Result<Point, GameError> {
        let columns = bounds.columns();
        let rows = bounds.rows();
        if columns <= 0 || rows <= 0 {
            return Err(GameError::BoardFull);
        }

        for _ in 0..self.max_samples {
            let x = self.rng.gen_range(0..columns) * bounds.block_size;
            let y = self.rng.gen_range(0..rows) * bounds.block_size;
            let candidate = Point::new(x, y);

            if !snake.contains(&candidate) {
                return Ok(candidate);
            }
        }

        let free: Vec<Point> = bounds.cells().filter(|cell| !snake.contains(cell)).collect();
        warn!(
            free_cells = free.len(),
            attempts = self.max_samples,
            "food sampling exhausted, drawing from free cells"
        );

        free.choose(&mut self.rng)
            .copied()
            .ok_or(GameError::BoardFull)
    }
}
