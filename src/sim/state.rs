//! Game state and core simulation types
//!
//! Everything the stepper reads or writes between frames lives here.

use serde::{Deserialize, Serialize};

use super::config::SimConfig;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Pig hovering at the start position, waiting for the first flap
    Ready,
    /// Active gameplay
    Playing,
    /// Run ended; only a reset continues
    GameOver,
}

/// A pipe pair scrolling right to left
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    /// Vertical center of the gap
    pub gap_center_y: f32,
    /// Set once when the pig clears the pipe
    pub scored: bool,
}

impl Obstacle {
    #[inline]
    pub fn right_edge(&self, pipe_width: f32) -> f32 {
        self.x + pipe_width
    }

    /// True once the pipe has left the playfield on the left side
    #[inline]
    pub fn is_offscreen(&self, pipe_width: f32) -> bool {
        self.right_edge(pipe_width) <= 0.0
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Current phase
    pub phase: GamePhase,
    /// Top edge of the pig
    pub character_y: f32,
    /// Vertical velocity (positive = downward)
    pub velocity: f32,
    /// Tilt in degrees, derived from velocity
    pub rotation: f32,
    /// Active pipes in spawn order (left to right)
    pub obstacles: Vec<Obstacle>,
    /// Pipes passed
    pub score: u32,
    /// Pipe scroll speed per frame
    pub speed: f32,
    /// Frames stepped while playing
    pub time_ticks: u64,
    /// Frame of the most recent flap (presentation only)
    pub last_flap_tick: Option<u64>,
    /// Next obstacle ID
    next_id: u32,
}

impl GameState {
    /// Fresh state waiting for the first flap
    pub fn new(config: &SimConfig) -> Self {
        Self {
            phase: GamePhase::Ready,
            character_y: config.start_y(),
            velocity: 0.0,
            rotation: 0.0,
            obstacles: Vec::new(),
            score: 0,
            speed: config.initial_speed,
            time_ticks: 0,
            last_flap_tick: None,
            next_id: 1,
        }
    }

    /// Allocate a new obstacle ID
    pub fn next_obstacle_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Most recently spawned pipe
    pub fn rightmost_obstacle(&self) -> Option<&Obstacle> {
        self.obstacles.last()
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Whether the wing should be drawn raised (within `window` frames of a flap)
    pub fn wing_raised(&self, window: u64) -> bool {
        self.last_flap_tick
            .is_some_and(|tick| self.time_ticks.saturating_sub(tick) < window)
    }
}

/// Discard everything and start over
pub fn reset(config: &SimConfig) -> GameState {
    GameState::new(config)
}
