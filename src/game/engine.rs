use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use super::{
    action::Action,
    config::GameConfig,
    state::{EndReason, GameState, Position, Snake},
};

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Set on the step that ended the round
    pub end_reason: Option<EndReason>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the round is over
    pub terminated: bool,
    pub info: StepInfo,
}

impl StepResult {
    fn running(ate_food: bool) -> Self {
        Self {
            terminated: false,
            info: StepInfo {
                ate_food,
                end_reason: None,
            },
        }
    }

    fn ended(reason: EndReason, ate_food: bool) -> Self {
        Self {
            terminated: true,
            info: StepInfo {
                ate_food,
                end_reason: Some(reason),
            },
        }
    }

    fn frozen() -> Self {
        Self {
            terminated: true,
            info: StepInfo {
                ate_food: false,
                end_reason: None,
            },
        }
    }
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine seeded from the OS
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine with reproducible food placement
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let snake = Snake::new(
            self.config.start_position(),
            self.config.initial_direction,
            self.config.initial_snake_length,
        );

        // A fresh snake never covers a whole valid board.
        let food = self
            .spawn_food(&snake)
            .unwrap_or_else(|| Position::new(0, 0));

        GameState::new(
            snake,
            food,
            self.config.grid_size,
            self.config.initial_tick_interval(),
        )
    }

    /// Execute one tick of the game
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        if !state.is_alive {
            return StepResult::frozen();
        }

        if let Action::Move(new_direction) = action {
            if !state.snake.direction.is_opposite(new_direction) {
                state.snake.direction = new_direction;
            }
        }

        let new_head = state.snake.head().moved_in_direction(state.snake.direction);

        if let Some(reason) = self.check_collision(state, new_head) {
            state.end(reason);
            state.steps += 1;
            info!(score = state.score, steps = state.steps, ?reason, "round over");
            return StepResult::ended(reason, false);
        }

        let ate_food = new_head == state.food;
        state.snake.advance_to(new_head, ate_food);
        state.steps += 1;

        if !ate_food {
            return StepResult::running(false);
        }

        state.score += self.config.food_score;
        let next_interval = self.next_tick_interval(state.tick_interval);
        state.tick_interval = next_interval;
        debug!(
            score = state.score,
            length = state.snake.len(),
            tick_ms = next_interval.as_millis() as u64,
            "food eaten"
        );

        match self.spawn_food(&state.snake) {
            Some(food) => {
                state.food = food;
                StepResult::running(true)
            }
            None => {
                state.end(EndReason::BoardFilled);
                info!(score = state.score, steps = state.steps, "board filled");
                StepResult::ended(EndReason::BoardFilled, true)
            }
        }
    }

    /// Tick interval after one more food, never below the configured floor
    pub fn next_tick_interval(&self, current: Duration) -> Duration {
        current
            .saturating_sub(self.config.speed_step())
            .max(self.config.min_tick_interval())
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<EndReason> {
        if !state.is_in_bounds(pos) {
            return Some(EndReason::Wall);
        }

        if state.snake.collides_with_body(pos) {
            return Some(EndReason::SelfCollision);
        }

        None
    }

    /// Pick a uniformly random cell not covered by the snake
    fn spawn_food(&mut self, snake: &Snake) -> Option<Position> {
        let size = self.config.grid_size as i32;
        let free: Vec<Position> = (0..size)
            .flat_map(|y| (0..size).map(move |x| Position::new(x, y)))
            .filter(|pos| !snake.contains(*pos))
            .collect();

        free.choose(&mut self.rng).copied()
    }
}
