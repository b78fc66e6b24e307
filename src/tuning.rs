//! Data-driven game balance
//!
//! Every constant the loop, spawner and collision scan consult lives here so a
//! host can ship a JSON override without rebuilding.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// When a score milestone raises the difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTrigger {
    /// Only when a scoring tick lands exactly on a multiple of the step.
    /// A tick that jumps over the multiple skips that increase.
    ExactMultiple,
    /// Once for every multiple of the step crossed by a tick
    #[default]
    CrossThreshold,
}

/// Game balance values
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Orbit radii in pixels, inner to outer
    pub orbit_radii: [f32; 3],
    /// Ship speed at session start (radians/ms)
    pub ship_start_speed: f32,
    pub obstacle_rate_ms: f64,
    pub power_up_rate_ms: f64,
    pub min_obstacle_rate_ms: f64,
    pub spawn_clearance: f32,
    pub collision_threshold: f32,
    pub shield_probability: f64,
    pub slowdown_factor: f64,
    pub slowdown_duration_ms: f64,
    pub shield_flash_ms: f64,
    pub difficulty_step: u64,
    pub difficulty_trigger: DifficultyTrigger,
    pub speed_factor: f32,
    pub rate_factor: f64,
    pub ms_per_point: f64,
    /// `KeyboardEvent.code` that shifts orbit
    pub action_key: String,
    /// Frame cadence of the virtual clock (headless drivers only)
    pub frame_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            orbit_radii: [INNER_ORBIT_RADIUS, MIDDLE_ORBIT_RADIUS, OUTER_ORBIT_RADIUS],
            ship_start_speed: SHIP_START_SPEED,
            obstacle_rate_ms: OBSTACLE_RATE_MS,
            power_up_rate_ms: POWER_UP_RATE_MS,
            min_obstacle_rate_ms: MIN_OBSTACLE_RATE_MS,
            spawn_clearance: SPAWN_CLEARANCE,
            collision_threshold: COLLISION_THRESHOLD,
            shield_probability: SHIELD_PROBABILITY,
            slowdown_factor: SLOWDOWN_FACTOR,
            slowdown_duration_ms: SLOWDOWN_DURATION_MS,
            shield_flash_ms: SHIELD_FLASH_MS,
            difficulty_step: DIFFICULTY_STEP,
            difficulty_trigger: DifficultyTrigger::default(),
            speed_factor: SPEED_FACTOR,
            rate_factor: RATE_FACTOR,
            ms_per_point: MS_PER_POINT,
            action_key: "Space".to_string(),
            frame_ms: FRAME_MS,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the loop cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let [inner, middle, outer] = self.orbit_radii;
        if !(inner > 0.0 && inner < middle && middle < outer) {
            return Err(invalid(
                "orbit_radii",
                format!("must be positive and strictly increasing, got {:?}", self.orbit_radii),
            ));
        }
        if !(self.ship_start_speed.is_finite() && self.ship_start_speed >= 0.0) {
            return Err(invalid("ship_start_speed", "must be finite and non-negative"));
        }
        for (field, rate) in [
            ("obstacle_rate_ms", self.obstacle_rate_ms),
            ("power_up_rate_ms", self.power_up_rate_ms),
            ("min_obstacle_rate_ms", self.min_obstacle_rate_ms),
            ("ms_per_point", self.ms_per_point),
            ("frame_ms", self.frame_ms),
            ("slowdown_duration_ms", self.slowdown_duration_ms),
            ("shield_flash_ms", self.shield_flash_ms),
            ("rate_factor", self.rate_factor),
        ] {
            if !(rate.is_finite() && rate > 0.0) {
                return Err(invalid(field, format!("must be positive, got {rate}")));
            }
        }
        for (field, value) in [
            ("collision_threshold", self.collision_threshold),
            ("speed_factor", self.speed_factor),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, format!("must be positive, got {value}")));
            }
        }
        if !(0.0..=1.0).contains(&self.shield_probability) {
            return Err(invalid("shield_probability", "must be within [0, 1]"));
        }
        if !(self.slowdown_factor.is_finite() && self.slowdown_factor > 0.0) {
            return Err(invalid("slowdown_factor", "must be positive"));
        }
        if !(0.0..std::f32::consts::PI).contains(&self.spawn_clearance) {
            return Err(invalid("spawn_clearance", "must be within [0, π)"));
        }
        if self.difficulty_step == 0 {
            return Err(invalid("difficulty_step", "must be non-zero"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning =
            Tuning::from_json(r#"{"obstacle_rate_ms": 1500, "difficulty_trigger": "exact_multiple"}"#)
                .unwrap();
        assert_eq!(tuning.obstacle_rate_ms, 1500.0);
        assert_eq!(tuning.difficulty_trigger, DifficultyTrigger::ExactMultiple);
        assert_eq!(tuning.power_up_rate_ms, POWER_UP_RATE_MS);
        assert_eq!(tuning.action_key, "Space");
    }

    #[test]
    fn test_rejects_unordered_radii() {
        let err = Tuning::from_json(r#"{"orbit_radii": [200, 175, 225]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "orbit_radii", .. }));
    }

    #[test]
    fn test_rejects_non_positive_factors() {
        let cases = [
            Tuning {
                collision_threshold: f32::NAN,
                ..Tuning::default()
            },
            Tuning {
                speed_factor: -1.05,
                ..Tuning::default()
            },
            Tuning {
                rate_factor: f64::NAN,
                ..Tuning::default()
            },
            Tuning {
                slowdown_duration_ms: -5000.0,
                ..Tuning::default()
            },
            Tuning {
                shield_flash_ms: 0.0,
                ..Tuning::default()
            },
        ];
        for tuning in cases {
            assert!(matches!(tuning.validate(), Err(ConfigError::Invalid { .. })));
        }

        let err = Tuning::from_json(r#"{"collision_threshold": -0.2}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "collision_threshold", .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(Tuning::from_json("{oops"), Err(ConfigError::Parse(_))));
    }
}
