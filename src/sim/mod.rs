//! Game simulation module
//!
//! All gameplay logic lives here and stays headless:
//! - Seeded RNG only (callers own the generator)
//! - Stable iteration order (spawn order)
//! - No timers, rendering or platform dependencies

pub mod collision;
pub mod orbit;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{check_collisions, touches_ship};
pub use orbit::{Orbit, heading_degrees, position_on_orbit};
pub use spawn::{spawn_obstacle, spawn_power_up};
pub use state::{EntityId, GameEvent, GamePhase, GameState, Obstacle, PowerUp, PowerUpKind};
pub use tick::{TickReport, tick};
