//! Snake Gate - a terminal Snake game with a name-entry gate
//!
//! This library provides:
//! - Core game logic: grid, movement, collisions, food, speed ramp (game module)
//! - Session flow: name gate, pause, restart, input arbitration (session module)
//! - Keyboard and pointer input mapping (input module)
//! - TUI rendering (render module)
//! - The interactive terminal runtime (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod session;
