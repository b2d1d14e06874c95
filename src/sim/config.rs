//! Simulation tuning
//!
//! Every number the stepper reads lives in [`SimConfig`]. The defaults
//! reproduce the fixed game; overrides are only meant for tooling.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config is not valid JSON: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Numeric tuning of the playfield, the pig, physics and pipes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub game_width: f32,
    pub game_height: f32,
    pub ground_height: f32,

    pub pig_x: f32,
    pub pig_width: f32,
    pub pig_height: f32,
    pub hitbox_scale: f32,

    pub gravity: f32,
    pub flap_velocity: f32,
    pub flap_boost: f32,
    pub min_velocity: f32,
    pub max_velocity: f32,

    /// Tilt in degrees per unit of velocity, clamped to the rotation range
    pub rotation_factor: f32,
    pub min_rotation: f32,
    pub max_rotation: f32,

    pub pipe_width: f32,
    pub pipe_gap_height: f32,
    pub pipe_spawn_x: f32,
    pub pipe_spacing: f32,
    pub gap_margin: f32,

    pub initial_speed: f32,
    pub speed_increment: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            game_width: GAME_WIDTH,
            game_height: GAME_HEIGHT,
            ground_height: GROUND_HEIGHT,

            pig_x: PIG_X,
            pig_width: PIG_WIDTH,
            pig_height: PIG_HEIGHT,
            hitbox_scale: HITBOX_SCALE,

            gravity: GRAVITY,
            flap_velocity: FLAP_VELOCITY,
            flap_boost: FLAP_BOOST,
            min_velocity: MIN_VELOCITY,
            max_velocity: MAX_VELOCITY,

            rotation_factor: ROTATION_FACTOR,
            min_rotation: MIN_ROTATION,
            max_rotation: MAX_ROTATION,

            pipe_width: PIPE_WIDTH,
            pipe_gap_height: PIPE_GAP_HEIGHT,
            pipe_spawn_x: PIPE_SPAWN_X,
            pipe_spacing: PIPE_SPACING,
            gap_margin: GAP_MARGIN,

            initial_speed: INITIAL_SPEED,
            speed_increment: SPEED_INCREMENT,
        }
    }
}

impl SimConfig {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Top of the ground strip; the pig dies when its bottom reaches it
    #[inline]
    pub fn floor_y(&self) -> f32 {
        self.game_height - self.ground_height
    }

    /// Lowest legal value of `character_y`
    #[inline]
    pub fn max_character_y(&self) -> f32 {
        self.floor_y() - self.pig_height
    }

    /// Vertically centered start position
    #[inline]
    pub fn start_y(&self) -> f32 {
        (self.game_height - self.pig_height) / 2.0
    }

    /// Inclusive range a gap center may be placed in
    pub fn gap_band(&self) -> (f32, f32) {
        let half_gap = self.pipe_gap_height / 2.0;
        (
            half_gap + self.gap_margin,
            self.floor_y() - half_gap - self.gap_margin,
        )
    }

    /// A new pipe spawns once the rightmost one is left of this x
    #[inline]
    pub fn spawn_threshold(&self) -> f32 {
        self.game_width - self.pipe_spacing
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        }

        let fields = [
            ("game_width", self.game_width),
            ("game_height", self.game_height),
            ("ground_height", self.ground_height),
            ("pig_x", self.pig_x),
            ("pig_width", self.pig_width),
            ("pig_height", self.pig_height),
            ("hitbox_scale", self.hitbox_scale),
            ("gravity", self.gravity),
            ("flap_velocity", self.flap_velocity),
            ("flap_boost", self.flap_boost),
            ("min_velocity", self.min_velocity),
            ("max_velocity", self.max_velocity),
            ("rotation_factor", self.rotation_factor),
            ("min_rotation", self.min_rotation),
            ("max_rotation", self.max_rotation),
            ("pipe_width", self.pipe_width),
            ("pipe_gap_height", self.pipe_gap_height),
            ("pipe_spawn_x", self.pipe_spawn_x),
            ("pipe_spacing", self.pipe_spacing),
            ("gap_margin", self.gap_margin),
            ("initial_speed", self.initial_speed),
            ("speed_increment", self.speed_increment),
        ];
        if let Some(&(field, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return invalid(field, "must be a finite number");
        }

        let positive = [
            ("game_width", self.game_width),
            ("game_height", self.game_height),
            ("pig_width", self.pig_width),
            ("pig_height", self.pig_height),
            ("pipe_width", self.pipe_width),
            ("pipe_gap_height", self.pipe_gap_height),
            ("pipe_spacing", self.pipe_spacing),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return invalid(field, "must be a positive number");
            }
        }

        if !(self.ground_height >= 0.0 && self.floor_y() > self.pig_height) {
            return invalid("ground_height", "leaves no room for the pig");
        }
        if !(self.start_y() >= 0.0 && self.start_y() <= self.max_character_y()) {
            return invalid("ground_height", "start position is inside the ground");
        }
        if !(self.hitbox_scale > 0.0 && self.hitbox_scale <= 1.0) {
            return invalid("hitbox_scale", "must be in (0, 1]");
        }
        if self.gap_margin < 0.0 {
            return invalid("gap_margin", "must not be negative");
        }
        let (min_gap, max_gap) = self.gap_band();
        if min_gap > max_gap {
            return invalid("pipe_gap_height", "gap does not fit between the margins");
        }
        if self.gravity < 0.0 {
            return invalid("gravity", "must not be negative");
        }
        if self.flap_velocity >= 0.0 {
            return invalid("flap_velocity", "must point upward (negative)");
        }
        if self.min_velocity >= self.max_velocity {
            return invalid("min_velocity", "must be below max_velocity");
        }
        if self.flap_velocity < self.min_velocity {
            return invalid("flap_velocity", "exceeds min_velocity");
        }
        if self.min_rotation > self.max_rotation {
            return invalid("min_rotation", "must not exceed max_rotation");
        }
        if self.initial_speed < 0.0 || self.speed_increment < 0.0 {
            return invalid("initial_speed", "speeds must not be negative");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.floor_y(), 520.0);
        assert_eq!(config.max_character_y(), 480.0);
        assert_eq!(config.start_y(), 280.0);
        assert_eq!(config.gap_band(), (105.0, 415.0));
        assert_eq!(config.spawn_threshold(), 164.0);
    }

    #[test]
    fn test_negative_gap_rejected() {
        let config = SimConfig {
            pipe_gap_height: -10.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "pipe_gap_height",
                ..
            })
        ));
    }

    #[test]
    fn test_gap_too_tall_rejected() {
        let config = SimConfig {
            pipe_gap_height: 500.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_velocity_bounds_rejected() {
        let config = SimConfig {
            min_velocity: 10.0,
            max_velocity: -10.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SimConfig {
            flap_velocity: 3.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_start_inside_ground_rejected() {
        // Floor at 300 leaves the centered start (280) below the lowest legal y (260)
        let config = SimConfig {
            ground_height: 300.0,
            ..Default::default()
        };
        assert!(config.start_y() > config.max_character_y());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "ground_height",
                ..
            })
        ));
    }

    #[test]
    fn test_non_finite_fields_rejected() {
        for config in [
            SimConfig {
                min_velocity: f32::NAN,
                ..Default::default()
            },
            SimConfig {
                max_velocity: f32::NAN,
                ..Default::default()
            },
            SimConfig {
                flap_velocity: f32::NAN,
                ..Default::default()
            },
            SimConfig {
                gravity: f32::INFINITY,
                ..Default::default()
            },
            SimConfig {
                max_rotation: f32::NAN,
                ..Default::default()
            },
        ] {
            assert!(matches!(
                config.validate(),
                Err(ConfigError::Invalid {
                    reason: "must be a finite number",
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_rotation_range_rejected() {
        let config = SimConfig {
            min_rotation: 45.0,
            max_rotation: -45.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "min_rotation",
                ..
            })
        ));
    }

    #[test]
    fn test_partial_json_override() {
        let config = SimConfig::from_json(r#"{ "pipe_spacing": 250.0 }"#).unwrap();
        assert_eq!(config.pipe_spacing, 250.0);
        assert_eq!(config.gravity, GRAVITY);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            SimConfig::from_json("{ not json"),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            SimConfig::from_json(r#"{ "pig_width": 0.0 }"#),
            Err(ConfigError::Invalid { field: "pig_width", .. })
        ));
    }
}
