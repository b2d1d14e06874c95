//! Session driver
//!
//! Owns the game state between frames together with the seeded RNG and the
//! pending input. Platform code only talks to [`Game`]: input handlers call
//! [`Game::request_flap`], the frame loop calls [`Game::advance`].

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::sim::{ConfigError, GamePhase, GameState, SimConfig, TickInput, autopilot, step};

/// A running game session
#[derive(Debug, Clone)]
pub struct Game {
    config: SimConfig,
    state: GameState,
    rng: Pcg32,
    seed: u64,
    /// Input collected since the last step
    pending: TickInput,
    accumulator: f32,
    autopilot: bool,
}

impl Game {
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        log::info!("New game with seed: {}", seed);
        Ok(Self {
            state: GameState::new(&config),
            config,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            pending: TickInput::default(),
            accumulator: 0.0,
            autopilot: false,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
        log::info!("Autopilot: {}", enabled);
    }

    /// Queue a flap for the next step; presses within one frame coalesce
    pub fn request_flap(&mut self) {
        if !self.state.is_over() {
            self.pending.flap = true;
        }
    }

    /// Run exactly one simulation step with the pending input
    pub fn step_once(&mut self) {
        let mut input = std::mem::take(&mut self.pending);
        if self.autopilot {
            input.flap |= autopilot::wants_flap(&self.state, &self.config);
        }

        let before = self.state.phase;
        self.state = step(&self.state, &input, &self.config, &mut self.rng);

        match (before, self.state.phase) {
            (GamePhase::Ready, GamePhase::Playing) => log::info!("Run started"),
            (GamePhase::Playing, GamePhase::GameOver) => log::info!(
                "Game over - score {} after {} frames",
                self.state.score,
                self.state.time_ticks
            ),
            _ => {}
        }
    }

    /// Feed elapsed wall time; runs fixed steps and returns how many ran
    pub fn advance(&mut self, dt: f32) -> u32 {
        let dt = dt.clamp(0.0, 0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            if self.state.is_over() {
                self.accumulator = 0.0;
                break;
            }
            self.step_once();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        // Too far behind: drop the backlog instead of fast-forwarding
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Throw the run away and start over from Ready
    pub fn retry(&mut self, seed: u64) {
        self.state = GameState::new(&self.config);
        self.rng = Pcg32::seed_from_u64(seed);
        self.seed = seed;
        self.pending = TickInput::default();
        self.accumulator = 0.0;
        log::info!("Game restarted with seed: {}", seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn game() -> Game {
        Game::new(SimConfig::default(), 42).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimConfig {
            pipe_gap_height: -1.0,
            ..Default::default()
        };
        assert!(Game::new(config, 1).is_err());
    }

    #[test]
    fn test_flaps_coalesce() {
        let mut game = game();
        game.request_flap();
        game.request_flap();
        game.request_flap();
        game.step_once();
        assert_eq!(game.state().phase, GamePhase::Playing);
        assert_eq!(game.state().velocity, FLAP_VELOCITY);

        // The flag was consumed: this step is gravity only
        game.step_once();
        assert!((game.state().velocity - (FLAP_VELOCITY + GRAVITY)).abs() < 1e-6);
        assert_eq!(game.state().last_flap_tick, Some(0));
    }

    #[test]
    fn test_fixed_timestep() {
        let mut game = game();
        game.request_flap();
        assert_eq!(game.advance(SIM_DT * 2.5), 2);
        assert_eq!(game.state().time_ticks, 1);
        assert_eq!(game.advance(SIM_DT * 0.6), 1);
        assert_eq!(game.state().time_ticks, 2);
        // Long hitches are clamped and capped
        assert_eq!(game.advance(1.0), MAX_SUBSTEPS);
    }

    #[test]
    fn test_stops_stepping_after_game_over() {
        let mut game = game();
        game.request_flap();
        for _ in 0..200 {
            game.advance(0.1);
        }
        assert!(game.state().is_over());
        let ticks = game.state().time_ticks;

        game.request_flap();
        assert_eq!(game.advance(0.1), 0);
        assert_eq!(game.state().time_ticks, ticks);
    }

    #[test]
    fn test_retry_resets() {
        let mut game = game();
        game.request_flap();
        for _ in 0..200 {
            game.advance(0.1);
        }
        assert!(game.state().is_over());

        game.retry(7);
        assert_eq!(game.seed(), 7);
        assert_eq!(game.state(), &GameState::new(game.config()));
    }

    #[test]
    fn test_autopilot_sessions_are_reproducible() {
        let mut a = game();
        let mut b = game();
        a.set_autopilot(true);
        b.set_autopilot(true);
        for _ in 0..600 {
            a.advance(SIM_DT);
            b.advance(SIM_DT);
        }
        assert_eq!(a.state(), b.state());
        assert!(a.state().score > 0);
    }
}
