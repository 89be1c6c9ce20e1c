use anyhow::{Result, anyhow};
use clap::Parser;
use snake_gate::game::{GameConfig, GameEngine};
use snake_gate::input::{GestureTracker, gesture::MIN_SWIPE_DISTANCE};
use snake_gate::logging::init_file_logging;
use snake_gate::modes::HumanMode;
use snake_gate::session::Session;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "snake_gate")]
#[command(version, about = "Snake in the terminal, with a name-entry gate")]
struct Cli {
    /// JSON game config; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Side length of the square board
    #[arg(long)]
    grid_size: Option<usize>,

    /// Tick interval at the start of a round, in milliseconds
    #[arg(long)]
    initial_speed_ms: Option<u64>,

    /// Fastest tick interval, in milliseconds
    #[arg(long)]
    min_speed_ms: Option<u64>,

    /// Tick interval decrease per food eaten, in milliseconds
    #[arg(long)]
    speed_step_ms: Option<u64>,

    /// Skip the name-entry screen and play as this name
    #[arg(long)]
    player: Option<String>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Drag distance, in columns, that counts as a swipe
    #[arg(long, default_value_t = MIN_SWIPE_DISTANCE)]
    swipe_distance: i32,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(ms) = self.initial_speed_ms {
            config.initial_tick_ms = ms;
        }
        if let Some(ms) = self.min_speed_ms {
            config.min_tick_ms = ms;
        }
        if let Some(ms) = self.speed_step_ms {
            config.speed_step_ms = ms;
        }

        config
            .validate()
            .map_err(|msg| anyhow!("Invalid game config: {msg}"))?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_file_logging(path)?;
    }

    let config = cli.game_config()?;
    info!(?config, "starting");

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed),
        None => GameEngine::new(config),
    };

    let mut session = Session::new(engine);
    if let Some(name) = &cli.player {
        session
            .enter_as(name)
            .map_err(|msg| anyhow!("Invalid --player name: {msg}"))?;
    }

    let mut human_mode =
        HumanMode::new(session).with_gestures(GestureTracker::new(cli.swipe_distance));
    human_mode.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{json}").unwrap();
        file
    }

    #[test]
    fn test_flags_override_config_file() {
        let file = config_file(r#"{ "grid_size": 20, "initial_tick_ms": 120, "food_score": 5 }"#);
        let path = file.path().to_str().unwrap();

        let cli = Cli::parse_from(["snake_gate", "--config", path, "--grid-size", "30"]);
        let config = cli.game_config().unwrap();
        assert_eq!(config.grid_size, 30);
        assert_eq!(config.initial_tick_ms, 120);
        assert_eq!(config.food_score, 5);
        assert_eq!(config.min_tick_ms, 50);
    }

    #[test]
    fn test_defaults_without_config_file() {
        let cli = Cli::parse_from(["snake_gate"]);
        assert_eq!(cli.game_config().unwrap(), GameConfig::default());
        assert_eq!(cli.swipe_distance, MIN_SWIPE_DISTANCE);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let cli = Cli::parse_from(["snake_gate", "--speed-step-ms", "0"]);
        let err = cli.game_config().unwrap_err();
        assert!(err.to_string().contains("speed_step_ms must be positive"));

        // The file alone is fine; the flag pushes the floor above the start.
        let file = config_file(r#"{ "initial_tick_ms": 100 }"#);
        let path = file.path().to_str().unwrap();
        let cli = Cli::parse_from(["snake_gate", "--config", path, "--min-speed-ms", "120"]);
        assert!(cli.game_config().is_err());
    }
}
