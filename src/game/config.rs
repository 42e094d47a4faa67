use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::GameError;
use super::state::Bounds;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board width in pixels
    pub width: i32,
    /// Board height in pixels
    pub height: i32,
    /// Edge length of one cell in pixels
    pub block_size: i32,

    /// Reward for eating food
    pub food_reward: f32,
    /// Reward on the terminating tick
    pub death_penalty: f32,
    /// An episode stalls once `frame_iteration > stall_factor * snake length`
    pub stall_factor: u32,

    /// Seed for food placement; entropy when unset
    pub seed: Option<u64>,
    /// Random draws before food placement enumerates the free cells
    pub max_food_samples: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
            block_size: 20,
            food_reward: 10.0,
            death_penalty: -10.0,
            stall_factor: 100,
            seed: None,
            max_food_samples: 64,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom board size
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Create a small board for testing
    pub fn small() -> Self {
        Self::new(200, 200)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load a JSON config; absent fields keep their defaults.
    ///
    /// Only parses. Callers apply overrides and then call [`GameConfig::validate`].
    pub fn from_json_file(path: &Path) -> Result<Self, GameError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            GameError::InvalidConfig(format!("failed to read {}: {e}", path.display()))
        })?;
        let config: GameConfig = serde_json::from_str(&raw).map_err(|e| {
            GameError::InvalidConfig(format!("failed to parse {}: {e}", path.display()))
        })?;
        Ok(config)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height, self.block_size)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.block_size <= 0 {
            return Err(GameError::InvalidConfig(
                "block_size must be positive".to_string(),
            ));
        }
        if self.width <= 0 || self.height <= 0 {
            return Err(GameError::InvalidConfig(format!(
                "board {}x{} must have positive dimensions",
                self.width, self.height
            )));
        }
        if self.width % self.block_size != 0 || self.height % self.block_size != 0 {
            return Err(GameError::InvalidConfig(format!(
                "board {}x{} is not a multiple of block_size {}",
                self.width, self.height, self.block_size
            )));
        }

        let bounds = self.bounds();
        // the spawned snake trails two cells left of the center column
        if bounds.columns() < 4 {
            return Err(GameError::InvalidConfig(format!(
                "board needs at least 4 columns, got {}",
                bounds.columns()
            )));
        }
        if bounds.cell_count() < 4 {
            return Err(GameError::InvalidConfig(
                "board needs at least 4 cells".to_string(),
            ));
        }
        Ok(())
    }
}
