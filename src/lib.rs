//! Flappy Pig - a side-scrolling arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, pipes, collisions, game state)
//! - `game`: Session driver (input coalescing, fixed timestep, retry)
//! - `renderer`: WebGPU rendering pipeline

pub mod game;
pub mod renderer;
pub mod sim;

pub use game::Game;
pub use sim::{ConfigError, GamePhase, GameState, Obstacle, SimConfig, TickInput, step};

/// Game configuration constants
///
/// Distances are in playfield pixels (origin top-left, y grows downward),
/// velocities in pixels per simulation frame.
pub mod consts {
    /// Fixed simulation timestep (one display frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Playfield dimensions
    pub const GAME_WIDTH: f32 = 384.0;
    pub const GAME_HEIGHT: f32 = 600.0;
    pub const GROUND_HEIGHT: f32 = 80.0;

    /// Pig size; the pig stays fixed horizontally
    pub const PIG_WIDTH: f32 = 50.0;
    pub const PIG_HEIGHT: f32 = 40.0;
    pub const PIG_X: f32 = GAME_WIDTH / 4.0;
    /// Hitbox is this fraction of the nominal pig size, centered
    pub const HITBOX_SCALE: f32 = 0.8;

    /// Downward acceleration per frame
    pub const GRAVITY: f32 = 0.4;
    /// Upward velocity applied on the first flap
    pub const FLAP_VELOCITY: f32 = -8.0;
    /// Fraction of FLAP_VELOCITY added by a flap while already flying
    pub const FLAP_BOOST: f32 = 0.2;
    /// Terminal velocity (downwards)
    pub const MAX_VELOCITY: f32 = 10.0;
    /// Max upward velocity
    pub const MIN_VELOCITY: f32 = -10.0;

    /// Rotation is velocity * ROTATION_FACTOR, clamped (degrees)
    pub const ROTATION_FACTOR: f32 = 5.0;
    pub const MIN_ROTATION: f32 = -30.0;
    pub const MAX_ROTATION: f32 = 90.0;

    /// Pipe defaults
    pub const PIPE_WIDTH: f32 = 70.0;
    pub const PIPE_GAP_HEIGHT: f32 = 150.0;
    pub const PIPE_SPAWN_X: f32 = GAME_WIDTH;
    /// Horizontal distance between pipes
    pub const PIPE_SPACING: f32 = 220.0;
    /// Keeps gaps away from the ceiling and the ground
    pub const GAP_MARGIN: f32 = 30.0;

    pub const INITIAL_SPEED: f32 = 2.5;
    /// Speed increase per score point
    pub const SPEED_INCREMENT: f32 = 0.05;

    /// Frames the wing stays raised after a flap (~100ms)
    pub const WING_FLAP_TICKS: u64 = 6;
}
