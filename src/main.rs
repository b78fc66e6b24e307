//! Orbit Shift entry point
//!
//! In the browser this mounts the game on the page. Natively it plays one
//! headless run with a simple autopilot and reports the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    if let Err(e) = orbit_shift::platform::web::run() {
        log::error!("Failed to start Orbit Shift: {e:?}");
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Give up on a native run after this long (ms of game time)
#[cfg(not(target_arch = "wasm32"))]
const MAX_RUN_MS: f64 = 5.0 * 60.0 * 1000.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use orbit_shift::Session;
    use orbit_shift::Tuning;
    use orbit_shift::persistence::MemoryStorage;
    use orbit_shift::renderer::RecordingRenderer;
    use orbit_shift::scheduler::TimerQueue;
    use orbit_shift::ui::{Button, InputEvent};

    env_logger::init();
    log::info!("Orbit Shift (native) starting headless autopilot run...");

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1);
    let mut session = Session::new(
        TimerQueue::new(),
        RecordingRenderer::new(),
        MemoryStorage::new(),
        Tuning::default(),
        seed,
    );
    session.press(Button::Start);

    let frame_ms = session.tuning().frame_ms;
    let shift = InputEvent::Key(session.tuning().action_key.clone());
    let mut elapsed = 0.0;
    while session.is_playing() && elapsed < MAX_RUN_MS {
        for _ in 0..autopilot::shifts_needed(session.state(), session.tuning()) {
            session.handle_input(&shift);
        }
        session.advance(frame_ms);
        elapsed += frame_ms;
    }

    let directives = session.renderer().log.len();
    match session.last_summary() {
        Some(summary) => println!(
            "Game over after {:.1}s: score {} (seed {seed}, {directives} render directives)",
            elapsed / 1000.0,
            summary.score
        ),
        None => println!(
            "Autopilot survived {:.0}s with score {} (seed {seed})",
            elapsed / 1000.0,
            session.state().score
        ),
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use orbit_shift::Tuning;
    use orbit_shift::sim::{GameState, Orbit};
    use orbit_shift::wrap_angle;

    /// Frames of warning the autopilot wants before reaching an obstacle
    const LOOKAHEAD_FRAMES: f32 = 3.0;

    fn blocked(state: &GameState, tuning: &Tuning, orbit: Orbit) -> bool {
        let reach = state.ship_speed * tuning.frame_ms as f32 * LOOKAHEAD_FRAMES
            + tuning.collision_threshold;
        state.obstacles.iter().filter(|o| o.orbit == orbit).any(|o| {
            let ahead = wrap_angle(o.angle - state.ship_angle + tuning.collision_threshold);
            ahead <= reach
        })
    }

    /// How many orbit shifts (0-2) dodge the nearest threat
    pub fn shifts_needed(state: &GameState, tuning: &Tuning) -> usize {
        if !blocked(state, tuning, state.orbit) {
            return 0;
        }
        let next = state.orbit.next();
        if !blocked(state, tuning, next) {
            1
        } else if !blocked(state, tuning, next.next()) {
            2
        } else {
            0
        }
    }
}
