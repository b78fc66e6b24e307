//! Angular collision detection between the ship and orbit entities
//!
//! Everything sits on one of three rings, so a hit is simply "same orbit and
//! angular gap under the threshold". The scan marks hits first and compacts the
//! lists afterwards so a removal never shifts an unvisited neighbour.

use super::orbit::Orbit;
use super::state::{EntityId, GameEvent, GameState, PowerUpKind};
use crate::angular_distance;
use crate::tuning::Tuning;

/// Whether an entity at (`orbit`, `angle`) touches the ship
#[inline]
pub fn touches_ship(state: &GameState, orbit: Orbit, angle: f32, threshold: f32) -> bool {
    orbit == state.orbit && angular_distance(angle, state.ship_angle) < threshold
}

/// Resolve every hit for the current ship position
///
/// Obstacles are scanned first, in spawn order. A shielded hit consumes the
/// shield and the obstacle; an unshielded hit is fatal and ends the scan, so
/// nothing after it (obstacles or power-ups) is touched this frame. Events
/// are appended in the order they happened.
pub fn check_collisions(state: &mut GameState, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    let threshold = tuning.collision_threshold;

    let mut absorbed: Vec<EntityId> = Vec::new();
    let mut fatal = None;
    for obstacle in &state.obstacles {
        if !touches_ship(state, obstacle.orbit, obstacle.angle, threshold) {
            continue;
        }
        if state.has_shield {
            state.has_shield = false;
            absorbed.push(obstacle.id);
            events.push(GameEvent::ShieldAbsorbed {
                obstacle: obstacle.id,
            });
        } else {
            fatal = Some(obstacle.id);
            break;
        }
    }
    if !absorbed.is_empty() {
        state.obstacles.retain(|o| !absorbed.contains(&o.id));
    }
    if let Some(obstacle) = fatal {
        events.push(GameEvent::ShipDestroyed { obstacle });
        return;
    }

    let mut collected: Vec<EntityId> = Vec::new();
    for power_up in &state.power_ups {
        if !touches_ship(state, power_up.orbit, power_up.angle, threshold) {
            continue;
        }
        collected.push(power_up.id);
        events.push(GameEvent::PowerUpCollected {
            id: power_up.id,
            kind: power_up.kind,
        });
        match power_up.kind {
            PowerUpKind::Shield => state.has_shield = true,
            PowerUpKind::Slowdown => {
                state.obstacle_rate_ms *= tuning.slowdown_factor;
                events.push(GameEvent::SlowdownStarted {
                    rate_ms: state.obstacle_rate_ms,
                });
            }
        }
    }
    if !collected.is_empty() {
        state.power_ups.retain(|p| !collected.contains(&p.id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{GamePhase, Obstacle, PowerUp};
    use std::f32::consts::TAU;

    fn running_state(tuning: &Tuning) -> GameState {
        let mut state = GameState::new(tuning);
        state.phase = GamePhase::Running;
        state
    }

    fn add_obstacle(state: &mut GameState, orbit: Orbit, angle: f32) -> EntityId {
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle { id, orbit, angle });
        id
    }

    fn add_power_up(state: &mut GameState, orbit: Orbit, angle: f32, kind: PowerUpKind) -> EntityId {
        let id = state.next_entity_id();
        state.power_ups.push(PowerUp {
            id,
            orbit,
            angle,
            kind,
        });
        id
    }

    #[test]
    fn test_unshielded_hit_is_fatal() {
        let tuning = Tuning::default();
        let mut state = running_state(&tuning);
        let id = add_obstacle(&mut state, Orbit::Middle, 0.1);

        let mut events = Vec::new();
        check_collisions(&mut state, &tuning, &mut events);
        assert_eq!(events, vec![GameEvent::ShipDestroyed { obstacle: id }]);
    }

    #[test]
    fn test_shield_absorbs_hit() {
        let tuning = Tuning::default();
        let mut state = running_state(&tuning);
        state.has_shield = true;
        let id = add_obstacle(&mut state, Orbit::Middle, 0.1);

        let mut events = Vec::new();
        check_collisions(&mut state, &tuning, &mut events);
        assert_eq!(events, vec![GameEvent::ShieldAbsorbed { obstacle: id }]);
        assert!(!state.has_shield);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_shield_only_covers_one_hit() {
        let tuning = Tuning::default();
        let mut state = running_state(&tuning);
        state.has_shield = true;
        let first = add_obstacle(&mut state, Orbit::Middle, 0.05);
        let second = add_obstacle(&mut state, Orbit::Middle, -0.05 + TAU);

        let mut events = Vec::new();
        check_collisions(&mut state, &tuning, &mut events);
        assert_eq!(
            events,
            vec![
                GameEvent::ShieldAbsorbed { obstacle: first },
                GameEvent::ShipDestroyed { obstacle: second },
            ]
        );
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].id, second);
    }

    #[test]
    fn test_other_orbits_and_far_angles_are_ignored() {
        let tuning = Tuning::default();
        let mut state = running_state(&tuning);
        add_obstacle(&mut state, Orbit::Inner, 0.0);
        add_obstacle(&mut state, Orbit::Outer, 0.0);
        add_obstacle(&mut state, Orbit::Middle, 0.25);

        let mut events = Vec::new();
        check_collisions(&mut state, &tuning, &mut events);
        assert!(events.is_empty());
        assert_eq!(state.obstacles.len(), 3);
    }

    #[test]
    fn test_hit_across_the_seam() {
        let tuning = Tuning::default();
        let mut state = running_state(&tuning);
        state.ship_angle = TAU - 0.05;
        let id = add_obstacle(&mut state, Orbit::Middle, 0.05);

        let mut events = Vec::new();
        check_collisions(&mut state, &tuning, &mut events);
        assert_eq!(events, vec![GameEvent::ShipDestroyed { obstacle: id }]);
    }

    #[test]
    fn test_fatal_hit_stops_power_up_processing() {
        let tuning = Tuning::default();
        let mut state = running_state(&tuning);
        add_obstacle(&mut state, Orbit::Middle, 0.0);
        add_power_up(&mut state, Orbit::Middle, 0.0, PowerUpKind::Shield);

        let mut events = Vec::new();
        check_collisions(&mut state, &tuning, &mut events);
        assert_eq!(events.len(), 1);
        assert_eq!(state.power_ups.len(), 1);
        assert!(!state.has_shield);
    }

    #[test]
    fn test_shield_power_up_pickup() {
        let tuning = Tuning::default();
        let mut state = running_state(&tuning);
        let id = add_power_up(&mut state, Orbit::Middle, 0.0, PowerUpKind::Shield);

        let mut events = Vec::new();
        check_collisions(&mut state, &tuning, &mut events);
        assert!(state.has_shield);
        assert!(state.power_ups.is_empty());
        assert_eq!(
            events,
            vec![GameEvent::PowerUpCollected {
                id,
                kind: PowerUpKind::Shield
            }]
        );
    }

    #[test]
    fn test_slowdown_pickup_stretches_rate() {
        let tuning = Tuning::default();
        let mut state = running_state(&tuning);
        add_power_up(&mut state, Orbit::Middle, 0.1, PowerUpKind::Slowdown);

        let mut events = Vec::new();
        check_collisions(&mut state, &tuning, &mut events);
        assert_eq!(state.obstacle_rate_ms, 3000.0);
        assert!(events.contains(&GameEvent::SlowdownStarted { rate_ms: 3000.0 }));
    }

    #[test]
    fn test_adjacent_pickups_are_all_processed_once() {
        let tuning = Tuning::default();
        let mut state = running_state(&tuning);
        let a = add_power_up(&mut state, Orbit::Middle, 0.0, PowerUpKind::Shield);
        let b = add_power_up(&mut state, Orbit::Middle, 0.1, PowerUpKind::Slowdown);
        let far = add_power_up(&mut state, Orbit::Middle, 2.0, PowerUpKind::Shield);

        let mut events = Vec::new();
        check_collisions(&mut state, &tuning, &mut events);
        let collected: Vec<EntityId> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::PowerUpCollected { id, .. } => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(collected, vec![a, b]);
        assert_eq!(state.power_ups.len(), 1);
        assert_eq!(state.power_ups[0].id, far);
    }
}
