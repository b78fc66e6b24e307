//! Variable timestep game tick
//!
//! One call per rendered frame: move the ship, resolve collisions, accrue
//! score and step the difficulty. Timers and rendering are the session's job;
//! the tick only reports what happened through [`GameEvent`]s.

use super::collision::check_collisions;
use super::state::{GameEvent, GamePhase, GameState};
use crate::tuning::{DifficultyTrigger, Tuning};
use crate::wrap_angle;

/// What a tick did
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub events: Vec<GameEvent>,
    /// Points added this tick
    pub points: u64,
}

impl TickReport {
    /// True when the ship hit an obstacle without a shield
    pub fn ship_destroyed(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, GameEvent::ShipDestroyed { .. }))
    }
}

/// Advance the game by `dt_ms` milliseconds
///
/// No-op unless the state is [`GamePhase::Running`]. A fatal collision
/// switches the phase to [`GamePhase::Stopped`] and skips scoring.
pub fn tick(state: &mut GameState, tuning: &Tuning, dt_ms: f64) -> TickReport {
    let mut report = TickReport::default();
    if state.phase != GamePhase::Running {
        return report;
    }
    let dt_ms = dt_ms.max(0.0);

    state.ship_angle = wrap_angle(state.ship_angle + state.ship_speed * dt_ms as f32);

    check_collisions(state, tuning, &mut report.events);
    if report.ship_destroyed() {
        state.phase = GamePhase::Stopped;
        return report;
    }

    let before = state.score;
    report.points = accrue_score(state, tuning, dt_ms);
    if report.points > 0 {
        step_difficulty(state, tuning, before, &mut report.events);
    }

    report
}

/// Convert survived time into points, one per `ms_per_point`
///
/// Leftover milliseconds carry into the next tick, so from an empty carry a
/// single tick adds exactly `floor(dt / ms_per_point)`.
fn accrue_score(state: &mut GameState, tuning: &Tuning, dt_ms: f64) -> u64 {
    state.score_carry_ms += dt_ms;
    let points = (state.score_carry_ms / tuning.ms_per_point).floor();
    state.score_carry_ms -= points * tuning.ms_per_point;
    let points = points as u64;
    state.score += points;
    points
}

/// Number of difficulty increases earned by moving from `before` to `after`
pub fn difficulty_steps(trigger: DifficultyTrigger, step: u64, before: u64, after: u64) -> u64 {
    if after <= before {
        return 0;
    }
    match trigger {
        DifficultyTrigger::ExactMultiple => u64::from(after % step == 0),
        DifficultyTrigger::CrossThreshold => after / step - before / step,
    }
}

fn step_difficulty(state: &mut GameState, tuning: &Tuning, before: u64, events: &mut Vec<GameEvent>) {
    let steps = difficulty_steps(
        tuning.difficulty_trigger,
        tuning.difficulty_step,
        before,
        state.score,
    );
    if steps == 0 {
        return;
    }
    for _ in 0..steps {
        state.ship_speed *= tuning.speed_factor;
        state.obstacle_rate_ms =
            (state.obstacle_rate_ms * tuning.rate_factor).max(tuning.min_obstacle_rate_ms);
    }
    log::debug!(
        "Difficulty up at score {}: speed {:.4} rad/ms, obstacles every {:.0} ms",
        state.score,
        state.ship_speed,
        state.obstacle_rate_ms
    );
    events.push(GameEvent::DifficultyIncreased {
        ship_speed: state.ship_speed,
        rate_ms: state.obstacle_rate_ms,
    });
}
