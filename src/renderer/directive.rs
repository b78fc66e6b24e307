//! Render directives
//!
//! The core never touches a display. It describes what the screen should show
//! as a stream of small commands and a [`RenderSink`] applies them.

use glam::Vec2;

use crate::highscores::HighScoreEntry;
use crate::sim::{EntityId, PowerUpKind};
use crate::ui::Screen;

/// Which visual element a directive targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    Ship,
    Obstacle(EntityId),
    PowerUp(EntityId),
}

/// What kind of sprite to create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Obstacle,
    PowerUp(PowerUpKind),
}

/// Ship halo state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Glow {
    #[default]
    None,
    /// Shield held
    Shielded,
    /// Shield just absorbed a hit
    ShieldBreak,
}

/// A single change to the rendering surface
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Create { handle: Handle, kind: SpriteKind },
    /// Offset from the planet centre, in pixels
    Position { handle: Handle, pos: Vec2 },
    /// Rotation cue in degrees, cosmetic only
    Rotate { handle: Handle, degrees: f32 },
    Glow { handle: Handle, glow: Glow },
    Destroy { handle: Handle },
    ShowScreen(Screen),
    HideScreen(Screen),
    /// Live score in the HUD
    Score(u64),
    /// Best score in the HUD
    HighScore(u64),
    /// Final score on the game-over screen
    FinalScore { score: u64, new_high_score: bool },
    HighScoreList(Vec<HighScoreEntry>),
}

/// Anything that can apply render directives
pub trait RenderSink {
    fn apply(&mut self, directive: Directive);
}

impl<T: RenderSink + ?Sized> RenderSink for &mut T {
    fn apply(&mut self, directive: Directive) {
        (**self).apply(directive);
    }
}
