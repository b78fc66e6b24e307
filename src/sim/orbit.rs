//! The three orbit rings around the planet
//!
//! An orbit is identified by its radius; positions on a ring are plain polar
//! coordinates centred on the planet.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::polar_to_cartesian;
use crate::tuning::Tuning;

/// One of the three fixed rings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orbit {
    Inner,
    Middle,
    Outer,
}

impl Orbit {
    /// All orbits, inner to outer
    pub const ALL: [Orbit; 3] = [Orbit::Inner, Orbit::Middle, Orbit::Outer];

    /// Index into the radius table
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Orbit::Inner => 0,
            Orbit::Middle => 1,
            Orbit::Outer => 2,
        }
    }

    /// Ring radius in pixels
    #[inline]
    pub fn radius(self, tuning: &Tuning) -> f32 {
        tuning.orbit_radii[self.index()]
    }

    /// Next ring outward, wrapping from outer back to inner
    pub fn next(self) -> Self {
        match self {
            Orbit::Inner => Orbit::Middle,
            Orbit::Middle => Orbit::Outer,
            Orbit::Outer => Orbit::Inner,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orbit::Inner => "inner",
            Orbit::Middle => "middle",
            Orbit::Outer => "outer",
        }
    }
}

/// Position of an angle on a ring, relative to the planet centre
#[inline]
pub fn position_on_orbit(orbit: Orbit, angle: f32, tuning: &Tuning) -> Vec2 {
    polar_to_cartesian(orbit.radius(tuning), angle)
}

/// Rotation cue for a sprite heading along its orbit (degrees)
///
/// Purely cosmetic: the sprite faces the direction of travel.
#[inline]
pub fn heading_degrees(angle: f32) -> f32 {
    angle.to_degrees() + 90.0
}
