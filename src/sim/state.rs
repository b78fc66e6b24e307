//! Game state and core simulation types
//!
//! Everything a running session mutates lives in [`GameState`]; timers,
//! rendering and storage stay outside so the loop runs headless.

use serde::{Deserialize, Serialize};

use super::orbit::Orbit;
use crate::tuning::Tuning;

/// Entity identifier, unique within a session; doubles as the render handle
pub type EntityId = u32;

/// Loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Frames advance the ship, spawners fire
    Running,
    /// Menu, game over, or navigated away
    Stopped,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUpKind {
    /// Absorbs one otherwise-fatal obstacle hit
    Shield,
    /// Temporarily stretches the obstacle spawn interval
    Slowdown,
}

impl PowerUpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Shield => "shield",
            PowerUpKind::Slowdown => "slowdown",
        }
    }
}

/// An obstacle parked on an orbit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: EntityId,
    pub orbit: Orbit,
    pub angle: f32,
}

/// A collectable parked on an orbit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: EntityId,
    pub orbit: Orbit,
    pub angle: f32,
    pub kind: PowerUpKind,
}

/// Things that happened during a tick that the session must act on
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Shield soaked up an obstacle, which is gone
    ShieldAbsorbed { obstacle: EntityId },
    /// Unshielded hit; the run is over
    ShipDestroyed { obstacle: EntityId },
    /// Power-up picked up and removed
    PowerUpCollected { id: EntityId, kind: PowerUpKind },
    /// Obstacle interval was stretched by the slowdown factor
    SlowdownStarted { rate_ms: f64 },
    /// Score milestone reached; ship faster, obstacles more frequent
    DifficultyIncreased { ship_speed: f32, rate_ms: f64 },
}

/// Complete per-session game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub score: u64,
    /// Survived milliseconds not yet converted into points
    pub score_carry_ms: f64,
    pub orbit: Orbit,
    /// Ship angle, always within [0, 2π)
    pub ship_angle: f32,
    /// Radians per millisecond
    pub ship_speed: f32,
    pub has_shield: bool,
    pub obstacle_rate_ms: f64,
    pub power_up_rate_ms: f64,
    pub obstacles: Vec<Obstacle>,
    pub power_ups: Vec<PowerUp>,
    pub phase: GamePhase,
    next_id: EntityId,
}

impl GameState {
    /// Fresh state for a new session (stopped until the session starts it)
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            score_carry_ms: 0.0,
            orbit: Orbit::Middle,
            ship_angle: 0.0,
            ship_speed: tuning.ship_start_speed,
            has_shield: false,
            obstacle_rate_ms: tuning.obstacle_rate_ms,
            power_up_rate_ms: tuning.power_up_rate_ms,
            obstacles: Vec::new(),
            power_ups: Vec::new(),
            phase: GamePhase::Stopped,
            next_id: 1,
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Cycle to the next orbit; ignored unless the loop is running
    pub fn change_orbit(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.orbit = self.orbit.next();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let tuning = Tuning::default();
        let state = GameState::new(&tuning);
        assert_eq!(state.score, 0);
        assert_eq!(state.orbit, Orbit::Middle);
        assert_eq!(state.ship_angle, 0.0);
        assert!(!state.has_shield);
        assert!(state.obstacles.is_empty() && state.power_ups.is_empty());
        assert_eq!(state.phase, GamePhase::Stopped);
    }

    #[test]
    fn test_change_orbit_cycles_only_while_running() {
        let mut state = GameState::new(&Tuning::default());
        assert!(!state.change_orbit());
        assert_eq!(state.orbit, Orbit::Middle);

        state.phase = GamePhase::Running;
        state.orbit = Orbit::Inner;
        let seen: Vec<Orbit> = (0..3)
            .map(|_| {
                state.change_orbit();
                state.orbit
            })
            .collect();
        assert_eq!(seen, vec![Orbit::Middle, Orbit::Outer, Orbit::Inner]);
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = GameState::new(&Tuning::default());
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }
}
