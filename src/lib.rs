//! Orbit Shift - An orbital dodge arcade game
//!
//! Core modules:
//! - `sim`: Game state, spawning, collisions and the per-frame tick
//! - `session`: Start/game-over lifecycle, timers and persistence glue
//! - `scheduler`: Cooperative timer queue (intervals, one-shots, frames)
//! - `renderer`: Render directives emitted by the core
//! - `persistence`: Key-value storage behind high scores and settings
//! - `tuning`: Data-driven game balance
//! - `platform`: Browser bindings (wasm32 only)

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use error::{ConfigError, StorageError};
pub use highscores::{HighScoreEntry, HighScores};
pub use session::{GameOverSummary, Session};
pub use settings::Settings;
pub use tuning::{DifficultyTrigger, Tuning};

use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// Game configuration constants
pub mod consts {
    /// Orbit radii in pixels (half the width of each orbit ring)
    pub const INNER_ORBIT_RADIUS: f32 = 125.0;
    pub const MIDDLE_ORBIT_RADIUS: f32 = 175.0;
    pub const OUTER_ORBIT_RADIUS: f32 = 225.0;

    /// Ship angular speed at session start (radians per millisecond);
    /// about 0.03 rad per 60 Hz frame
    pub const SHIP_START_SPEED: f32 = 0.002;

    /// Spawn intervals at session start (ms)
    pub const OBSTACLE_RATE_MS: f64 = 2000.0;
    pub const POWER_UP_RATE_MS: f64 = 7000.0;
    /// Difficulty never pushes the obstacle interval below this
    pub const MIN_OBSTACLE_RATE_MS: f64 = 500.0;

    /// Spawns never land this close (radians) to the ship
    pub const SPAWN_CLEARANCE: f32 = 0.5;
    /// Angular hit radius shared by obstacles and power-ups
    pub const COLLISION_THRESHOLD: f32 = 0.2;

    pub const SHIELD_PROBABILITY: f64 = 0.7;
    pub const SLOWDOWN_FACTOR: f64 = 1.5;
    pub const SLOWDOWN_DURATION_MS: f64 = 5000.0;
    pub const SHIELD_FLASH_MS: f64 = 300.0;

    /// Score milestones that raise the difficulty
    pub const DIFFICULTY_STEP: u64 = 500;
    pub const SPEED_FACTOR: f32 = 1.05;
    pub const RATE_FACTOR: f64 = 0.95;

    /// Milliseconds survived per point
    pub const MS_PER_POINT: f64 = 100.0;

    /// Virtual frame cadence used by headless drivers (~60 Hz)
    pub const FRAME_MS: f64 = 16.0;

    pub const MAX_HIGH_SCORES: usize = 10;
}

/// Normalize an angle to (-π, π]
///
/// Used for angular deltas only; stored angles use [`wrap_angle`].
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let r = PI - (PI - angle).rem_euclid(TAU);
    // rem_euclid may round up to TAU for tiny negative inputs
    if r <= -PI { r + TAU } else { r }
}

/// Wrap an angle into a single winding [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let r = angle.rem_euclid(TAU);
    if r >= TAU { 0.0 } else { r }
}

/// Absolute angular distance between two angles, in [0, π]
#[inline]
pub fn angular_distance(a: f32, b: f32) -> f32 {
    normalize_angle(a - b).abs()
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_angle_fixed_points() {
        assert!((normalize_angle(0.0)).abs() < 1e-6);
        assert!((normalize_angle(PI) - PI).abs() < 1e-6);
        assert!((normalize_angle(-PI) - PI).abs() < 1e-6);
        assert!((normalize_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
        assert!((normalize_angle(0.1 - 0.0) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(TAU + 0.25) - 0.25).abs() < 1e-5);
        assert!((wrap_angle(-0.25) - (TAU - 0.25)).abs() < 1e-5);
        assert_eq!(wrap_angle(0.0), 0.0);
    }

    #[test]
    fn test_angular_distance_wraps() {
        // 0.1 rad either side of the seam
        assert!((angular_distance(TAU - 0.05, 0.05) - 0.1).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn normalize_angle_in_half_open_range(theta in -1.0e4f32..1.0e4f32) {
            let n = normalize_angle(theta);
            prop_assert!(n > -PI && n <= PI, "normalize_angle({theta}) = {n}");
        }

        #[test]
        fn wrap_angle_in_single_winding(theta in -1.0e4f32..1.0e4f32) {
            let w = wrap_angle(theta);
            prop_assert!((0.0..TAU).contains(&w), "wrap_angle({theta}) = {w}");
        }
    }
}
