//! Obstacle and power-up generation
//!
//! Entities land on a random orbit at a random angle, never right on top of
//! the ship. The caller owns the timers and the rendering.

use rand::Rng;
use std::f32::consts::{PI, TAU};

use super::orbit::Orbit;
use super::state::{GameState, Obstacle, PowerUp, PowerUpKind};
use crate::tuning::Tuning;
use crate::{angular_distance, wrap_angle};

/// Rejection draws before falling back to the far side of the planet
const MAX_ANGLE_DRAWS: usize = 64;

/// Uniformly random orbit
pub fn random_orbit<R: Rng>(rng: &mut R) -> Orbit {
    Orbit::ALL[rng.random_range(0..Orbit::ALL.len())]
}

/// Uniform angle in [0, 2π) at least `clearance` away from `ship_angle`
pub fn clear_angle<R: Rng>(rng: &mut R, ship_angle: f32, clearance: f32) -> f32 {
    for _ in 0..MAX_ANGLE_DRAWS {
        let angle = rng.random_range(0.0..TAU);
        if angular_distance(angle, ship_angle) >= clearance {
            return angle;
        }
    }
    wrap_angle(ship_angle + PI)
}

/// Place a new obstacle and return a copy for rendering
pub fn spawn_obstacle<R: Rng>(
    state: &mut GameState,
    rng: &mut R,
    tuning: &Tuning,
) -> Obstacle {
    let orbit = random_orbit(rng);
    let angle = clear_angle(rng, state.ship_angle, tuning.spawn_clearance);
    let obstacle = Obstacle {
        id: state.next_entity_id(),
        orbit,
        angle,
    };
    state.obstacles.push(obstacle.clone());
    obstacle
}

/// Place a new power-up (shield or slowdown) and return a copy for rendering
pub fn spawn_power_up<R: Rng>(
    state: &mut GameState,
    rng: &mut R,
    tuning: &Tuning,
) -> PowerUp {
    let orbit = random_orbit(rng);
    let angle = clear_angle(rng, state.ship_angle, tuning.spawn_clearance);
    let kind = if rng.random_bool(tuning.shield_probability) {
        PowerUpKind::Shield
    } else {
        PowerUpKind::Slowdown
    };
    let power_up = PowerUp {
        id: state.next_entity_id(),
        orbit,
        angle,
        kind,
    };
    state.power_ups.push(power_up.clone());
    power_up
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_appends_with_fresh_ids() {
        let tuning = Tuning::default();
        let mut state = GameState::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(7);

        let a = spawn_obstacle(&mut state, &mut rng, &tuning);
        let b = spawn_power_up(&mut state, &mut rng, &tuning);
        assert_ne!(a.id, b.id);
        assert_eq!(state.obstacles, vec![a]);
        assert_eq!(state.power_ups, vec![b]);
    }

    #[test]
    fn test_power_up_mix_roughly_seventy_percent_shield() {
        let tuning = Tuning::default();
        let mut state = GameState::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(2024);
        for _ in 0..2000 {
            spawn_power_up(&mut state, &mut rng, &tuning);
        }
        let shields = state
            .power_ups
            .iter()
            .filter(|p| p.kind == PowerUpKind::Shield)
            .count();
        assert!((1250..1550).contains(&shields), "shields = {shields}");
    }

    #[test]
    fn test_every_orbit_gets_used() {
        let tuning = Tuning::default();
        let mut state = GameState::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..200 {
            spawn_obstacle(&mut state, &mut rng, &tuning);
        }
        for orbit in Orbit::ALL {
            assert!(state.obstacles.iter().any(|o| o.orbit == orbit));
        }
    }

    #[test]
    fn test_clear_angle_fallback_is_opposite_ship() {
        // Clearance of almost π leaves a sliver no draw will realistically hit
        let mut rng = Pcg32::seed_from_u64(3);
        let angle = clear_angle(&mut rng, 1.0, PI - 1e-6);
        assert!(angular_distance(angle, 1.0) >= PI - 1e-3);
    }

    proptest! {
        #[test]
        fn spawns_keep_clear_of_ship(seed in any::<u64>(), ship_angle in 0.0f32..TAU) {
            let tuning = Tuning::default();
            let mut state = GameState::new(&tuning);
            state.ship_angle = ship_angle;
            let mut rng = Pcg32::seed_from_u64(seed);
            for _ in 0..50 {
                let o = spawn_obstacle(&mut state, &mut rng, &tuning);
                prop_assert!(angular_distance(o.angle, ship_angle) >= tuning.spawn_clearance);
                prop_assert!((0.0..TAU).contains(&o.angle));
                let p = spawn_power_up(&mut state, &mut rng, &tuning);
                prop_assert!(angular_distance(p.angle, ship_angle) >= tuning.spawn_clearance);
            }
        }
    }
}
