//! Demo controller
//!
//! Decides from a state snapshot whether to flap this frame. Used for the
//! idle/demo mode and the headless runner.

use super::collision::character_hitbox;
use super::config::SimConfig;
use super::state::{GamePhase, GameState};

/// Hover this far below the gap center
const AIM_OFFSET: f32 = 12.0;
/// How far toward the upcoming gap the pig may drift while inside a pipe
const LOOKAHEAD_SLACK: f32 = 40.0;

pub fn wants_flap(state: &GameState, config: &SimConfig) -> bool {
    match state.phase {
        GamePhase::Ready => true,
        GamePhase::GameOver => false,
        GamePhase::Playing => {
            projected_height(state, config) > target_height(state, config) + AIM_OFFSET
        }
    }
}

/// Height the pig's center should be steered toward
pub fn target_height(state: &GameState, config: &SimConfig) -> f32 {
    let hitbox = character_hitbox(state.character_y, config);
    let mut ahead = state
        .obstacles
        .iter()
        .filter(|o| o.right_edge(config.pipe_width) >= hitbox.min.x);

    let Some(current) = ahead.next() else {
        return config.floor_y() / 2.0;
    };
    match ahead.next() {
        // Already between the pipes: lean toward the next gap without leaving this one
        Some(upcoming) if hitbox.max().x >= current.x => upcoming.gap_center_y.clamp(
            current.gap_center_y - LOOKAHEAD_SLACK,
            current.gap_center_y + LOOKAHEAD_SLACK,
        ),
        _ => current.gap_center_y,
    }
}

/// Where the pig's center ends up once its current motion is braked
///
/// Rising is braked by gravity alone, falling by flapping every frame.
fn projected_height(state: &GameState, config: &SimConfig) -> f32 {
    let center = state.character_y + config.pig_height / 2.0;
    let velocity = state.velocity + config.gravity;
    if velocity > 0.0 {
        let brake = (-config.flap_velocity * config.flap_boost - config.gravity).max(0.1);
        center + velocity * velocity / (2.0 * brake)
    } else {
        center - velocity * velocity / (2.0 * config.gravity.max(0.1))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::sim::{Obstacle, TickInput, step};

    #[test]
    fn test_phases() {
        let config = SimConfig::default();
        let mut state = GameState::new(&config);
        assert!(wants_flap(&state, &config));
        state.phase = GamePhase::GameOver;
        assert!(!wants_flap(&state, &config));
    }

    #[test]
    fn test_steers_toward_gap() {
        let config = SimConfig::default();
        let mut state = GameState::new(&config);
        state.phase = GamePhase::Playing;
        state.obstacles.push(Obstacle {
            id: 1,
            x: 300.0,
            gap_center_y: 200.0,
            scored: false,
        });
        assert_eq!(target_height(&state, &config), 200.0);

        // Well below the gap and falling: flap
        state.character_y = 380.0;
        state.velocity = 2.0;
        assert!(wants_flap(&state, &config));

        // Well above it: let gravity work
        state.character_y = 60.0;
        state.velocity = 0.0;
        assert!(!wants_flap(&state, &config));
    }

    #[test]
    fn test_leans_toward_upcoming_gap() {
        let config = SimConfig::default();
        let mut state = GameState::new(&config);
        state.phase = GamePhase::Playing;
        state.obstacles.push(Obstacle {
            id: 1,
            x: 100.0,
            gap_center_y: 200.0,
            scored: false,
        });
        state.obstacles.push(Obstacle {
            id: 2,
            x: 320.0,
            gap_center_y: 400.0,
            scored: false,
        });
        assert_eq!(target_height(&state, &config), 200.0 + LOOKAHEAD_SLACK);
    }

    #[test]
    fn test_survives_several_pipes() {
        let config = SimConfig::default();
        for seed in 0..8 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut state = GameState::new(&config);
            for _ in 0..3000 {
                let input = TickInput {
                    flap: wants_flap(&state, &config),
                };
                state = step(&state, &input, &config, &mut rng);
                if state.is_over() {
                    break;
                }
            }
            assert!(state.score >= 10, "seed {} only scored {}", seed, state.score);
        }
    }
}
