//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One call to `step` per frame
//! - Injected, seeded RNG only
//! - Pipes kept in spawn order
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod config;
pub mod state;
pub mod tick;

pub use collision::{Rect, character_box, character_hitbox, hits_obstacle, pipe_segments};
pub use config::{ConfigError, SimConfig};
pub use state::{GamePhase, GameState, Obstacle, reset};
pub use tick::{TickInput, step};
