use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::action::Direction;
use super::state::Position;

/// Largest board the renderer is expected to fit on a terminal
pub const MAX_GRID_SIZE: usize = 100;

/// Configuration for the game
///
/// Every field has a default, so a config file only needs the keys it
/// wants to change:
///
/// ```json
/// { "grid_size": 20, "initial_tick_ms": 120 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square board
    pub grid_size: usize,
    /// Number of segments the snake starts with
    pub initial_snake_length: usize,
    /// Heading at the start of every round
    pub initial_direction: Direction,

    /// Tick interval at the start of a round, in milliseconds
    pub initial_tick_ms: u64,
    /// How much the tick interval shrinks per food eaten
    pub speed_step_ms: u64,
    /// Floor for the tick interval
    pub min_tick_ms: u64,

    /// Points per food eaten
    pub food_score: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 15,
            initial_snake_length: 1,
            initial_direction: Direction::Right,
            initial_tick_ms: 150,
            speed_step_ms: 5,
            min_tick_ms: 50,
            food_score: 10,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom board size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(config)
    }

    /// Cell the head starts on: the middle of the board
    pub fn start_position(&self) -> Position {
        let center = (self.grid_size / 2) as i32;
        Position::new(center, center)
    }

    pub fn initial_tick_interval(&self) -> Duration {
        Duration::from_millis(self.initial_tick_ms)
    }

    pub fn min_tick_interval(&self) -> Duration {
        Duration::from_millis(self.min_tick_ms)
    }

    pub fn speed_step(&self) -> Duration {
        Duration::from_millis(self.speed_step_ms)
    }

    /// Validate configuration values
    ///
    /// Returns `Err` with a human readable message for the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_size < 2 {
            return Err(format!("grid_size must be at least 2, got {}", self.grid_size));
        }

        if self.grid_size > MAX_GRID_SIZE {
            return Err(format!(
                "grid_size must be at most {}, got {}",
                MAX_GRID_SIZE, self.grid_size
            ));
        }

        if self.initial_tick_ms == 0 {
            return Err("initial_tick_ms must be positive".to_string());
        }

        if self.min_tick_ms == 0 {
            return Err("min_tick_ms must be positive".to_string());
        }

        if self.min_tick_ms > self.initial_tick_ms {
            return Err(format!(
                "min_tick_ms ({}) cannot exceed initial_tick_ms ({})",
                self.min_tick_ms, self.initial_tick_ms
            ));
        }

        if self.speed_step_ms == 0 {
            return Err("speed_step_ms must be positive".to_string());
        }

        if self.food_score == 0 {
            return Err("food_score must be at least 1".to_string());
        }

        if self.initial_snake_length == 0 {
            return Err("initial_snake_length must be at least 1".to_string());
        }

        // The body trails behind the head, so it must fit between the
        // start cell and the wall at its back.
        let (dx, dy) = self.initial_direction.delta();
        let back = (self.initial_snake_length - 1) as i32;
        let start = self.start_position();
        let tail = start.moved_by(-dx * back, -dy * back);
        let size = self.grid_size as i32;
        if tail.x < 0 || tail.x >= size || tail.y < 0 || tail.y >= size {
            return Err(format!(
                "initial_snake_length {} does not fit behind the start cell on a {}x{} board",
                self.initial_snake_length, self.grid_size, self.grid_size
            ));
        }

        Ok(())
    }
}
