//! Per-frame simulation step
//!
//! Core game loop that advances the simulation deterministically: the only
//! source of randomness is the RNG handed in by the caller.

use rand::Rng;

use super::collision::hits_obstacle;
use super::config::SimConfig;
use super::state::{GamePhase, GameState, Obstacle};

/// Input commands for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Flap (click/tap/space); several presses within a frame count once
    pub flap: bool,
}

impl TickInput {
    pub const FLAP: TickInput = TickInput { flap: true };
}

/// Produce the state one frame after `state`
///
/// `state` itself is left untouched.
pub fn step<R: Rng>(
    state: &GameState,
    input: &TickInput,
    config: &SimConfig,
    rng: &mut R,
) -> GameState {
    debug_assert!(config.validate().is_ok(), "stepping with an invalid SimConfig");

    let mut next = state.clone();
    match next.phase {
        GamePhase::Ready => {
            if input.flap {
                next.phase = GamePhase::Playing;
                next.velocity = config.flap_velocity;
                next.last_flap_tick = Some(next.time_ticks);
                log::debug!("Ready -> Playing");
            }
        }
        GamePhase::Playing => play_frame(&mut next, input, config, rng),
        GamePhase::GameOver => {}
    }
    next
}

fn play_frame<R: Rng>(state: &mut GameState, input: &TickInput, config: &SimConfig, rng: &mut R) {
    state.time_ticks += 1;

    if input.flap {
        // Repeated flaps give diminishing returns once already rising
        let boosted = state.velocity + config.flap_velocity * config.flap_boost;
        state.velocity = config.flap_velocity.max(boosted);
        state.last_flap_tick = Some(state.time_ticks);
    }

    state.velocity =
        (state.velocity + config.gravity).clamp(config.min_velocity, config.max_velocity);
    state.character_y += state.velocity;
    state.rotation = (state.velocity * config.rotation_factor)
        .clamp(config.min_rotation, config.max_rotation);

    let max_y = config.max_character_y();
    if state.character_y <= 0.0 || state.character_y >= max_y {
        state.character_y = state.character_y.clamp(0.0, max_y);
        end_run(state, "hit the boundary");
        return;
    }

    // Collision and scoring both look at the pipes as they stood when the
    // frame began; the freshly spawned pipe is not part of this frame.
    let frame_start = state.obstacles.clone();

    scroll_obstacles(state, config);
    if needs_spawn(state, config) {
        spawn_obstacle(state, config, rng);
    }

    if frame_start
        .iter()
        .any(|obstacle| hits_obstacle(state.character_y, obstacle, config))
    {
        end_run(state, "hit a pipe");
        return;
    }

    score_passed(state, &frame_start, config);
}

/// Shift pipes left and drop the ones that left the playfield
fn scroll_obstacles(state: &mut GameState, config: &SimConfig) {
    let speed = state.speed;
    for obstacle in &mut state.obstacles {
        obstacle.x -= speed;
    }
    state
        .obstacles
        .retain(|obstacle| !obstacle.is_offscreen(config.pipe_width));
}

fn needs_spawn(state: &GameState, config: &SimConfig) -> bool {
    match state.rightmost_obstacle() {
        None => true,
        Some(last) => last.x < config.spawn_threshold(),
    }
}

/// Spawn a pipe at the right edge with a random gap inside the safe band
fn spawn_obstacle<R: Rng>(state: &mut GameState, config: &SimConfig, rng: &mut R) {
    let (min_gap, max_gap) = config.gap_band();
    let gap_center_y = rng.random_range(min_gap..=max_gap);
    let id = state.next_obstacle_id();
    log::trace!("Spawn pipe {} at gap {:.1}", id, gap_center_y);
    state.obstacles.push(Obstacle {
        id,
        x: config.pipe_spawn_x,
        gap_center_y,
        scored: false,
    });
}

fn score_passed(state: &mut GameState, frame_start: &[Obstacle], config: &SimConfig) {
    for passed in frame_start
        .iter()
        .filter(|o| !o.scored && o.right_edge(config.pipe_width) < config.pig_x)
    {
        // A pipe dropped this very frame still counts, it just has no flag to set
        if let Some(obstacle) = state.obstacles.iter_mut().find(|o| o.id == passed.id) {
            obstacle.scored = true;
        }
        state.score += 1;
        state.speed += config.speed_increment;
        log::debug!("Passed pipe {} (score {})", passed.id, state.score);
    }
}

fn end_run(state: &mut GameState, reason: &str) {
    state.phase = GamePhase::GameOver;
    log::debug!("Playing -> GameOver: {} (score {})", reason, state.score);
}
