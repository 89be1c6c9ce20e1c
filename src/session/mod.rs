//! Everything between raw input and the engine
//!
//! A [`Session`] owns the round in progress plus the state that survives a
//! restart: the player name and the session high score. It gates play behind
//! the name-entry screen, buffers direction requests between ticks and
//! decides which of them may reach the engine.

pub mod player;

use std::time::Duration;

use tracing::info;

use crate::game::{Direction, EndReason, GameEngine, GameState, StepResult};
use crate::metrics::GameMetrics;

pub use player::{MAX_NAME_LEN, NameInput, PlayerName};

/// Which screen the session is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a name before the first round
    NameEntry,
    Running,
    Paused,
    GameOver(EndReason),
}

pub struct Session {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    player: Option<PlayerName>,
    name_input: NameInput,
    name_error: Option<String>,
    paused: bool,
    /// Accepted direction waiting for the next tick
    pending_direction: Option<Direction>,
}

impl Session {
    pub fn new(mut engine: GameEngine) -> Self {
        let state = engine.reset();

        Self {
            engine,
            state,
            metrics: GameMetrics::new(),
            player: None,
            name_input: NameInput::default(),
            name_error: None,
            paused: false,
            pending_direction: None,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.player.is_none() {
            return Phase::NameEntry;
        }

        match self.state.end_reason {
            Some(reason) => Phase::GameOver(reason),
            None if self.paused => Phase::Paused,
            None => Phase::Running,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut GameMetrics {
        &mut self.metrics
    }

    pub fn player(&self) -> Option<&PlayerName> {
        self.player.as_ref()
    }

    pub fn name_input(&self) -> &str {
        self.name_input.as_str()
    }

    /// Message from the last rejected name submission
    pub fn name_error(&self) -> Option<&str> {
        self.name_error.as_deref()
    }

    pub fn high_score(&self) -> u32 {
        self.metrics.high_score
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    /// Current time between ticks
    pub fn tick_interval(&self) -> Duration {
        self.state.tick_interval
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn type_char(&mut self, c: char) {
        if self.phase() == Phase::NameEntry && self.name_input.push(c) {
            self.name_error = None;
        }
    }

    pub fn erase_char(&mut self) {
        if self.phase() == Phase::NameEntry {
            self.name_input.pop();
            self.name_error = None;
        }
    }

    /// Submit the typed name; on success the first round starts
    pub fn submit_name(&mut self) -> bool {
        if self.phase() != Phase::NameEntry {
            return false;
        }

        match PlayerName::parse(self.name_input.as_str()) {
            Ok(name) => {
                info!(player = %name, "player entered");
                self.player = Some(name);
                self.name_error = None;
                self.start_round();
                true
            }
            Err(message) => {
                self.name_error = Some(message);
                false
            }
        }
    }

    /// Fill in the name field and submit it in one go
    pub fn enter_as(&mut self, name: &str) -> Result<(), String> {
        if self.phase() != Phase::NameEntry {
            return Err("Name already entered".to_string());
        }

        let name = PlayerName::parse(name)?;
        self.name_input.set(name.as_str());
        if self.submit_name() {
            Ok(())
        } else {
            Err(self.name_error.clone().unwrap_or_default())
        }
    }

    /// Buffer a heading change for the next tick
    ///
    /// Requests are checked against the heading of the last move, not
    /// against earlier buffered requests, so two quick turns between ticks
    /// cannot fold the snake back onto itself.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if self.phase() != Phase::Running {
            return false;
        }

        if self.state.snake.direction.is_opposite(direction) {
            return false;
        }

        self.pending_direction = Some(direction);
        true
    }

    /// Pause or resume a round in progress
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase() {
            Phase::Running => {
                self.paused = true;
                self.metrics.pause_clock();
                true
            }
            Phase::Paused => {
                self.paused = false;
                self.metrics.resume_clock();
                true
            }
            Phase::NameEntry | Phase::GameOver(_) => false,
        }
    }

    /// A tap restarts a finished round, otherwise it toggles pause
    pub fn tap(&mut self) {
        match self.phase() {
            Phase::GameOver(_) => {
                self.restart();
            }
            Phase::Running | Phase::Paused => {
                self.toggle_pause();
            }
            Phase::NameEntry => {}
        }
    }

    /// Start a new round once the current one is over
    pub fn restart(&mut self) -> bool {
        if !matches!(self.phase(), Phase::GameOver(_)) {
            return false;
        }

        self.start_round();
        true
    }

    /// Advance the round by one tick
    ///
    /// Returns `None` when the session is not running, so nothing moved.
    pub fn tick(&mut self) -> Option<StepResult> {
        if self.phase() != Phase::Running {
            return None;
        }

        let action = self.pending_direction.take().into();
        let result = self.engine.step(&mut self.state, action);

        if result.info.end_reason.is_some() {
            self.metrics.on_game_over(self.state.score);
        }

        Some(result)
    }

    fn start_round(&mut self) {
        self.state = self.engine.reset();
        self.paused = false;
        self.pending_direction = None;
        self.metrics.on_game_start();
        info!(
            high_score = self.metrics.high_score,
            games_played = self.metrics.games_played,
            "round started"
        );
    }
}
