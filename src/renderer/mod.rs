//! Rendering surface
//!
//! The game emits [`Directive`]s; the browser build turns them into DOM
//! updates, headless builds record them.

pub mod directive;
pub mod recording;

pub use directive::{Directive, Glow, Handle, RenderSink, SpriteKind};
pub use recording::RecordingRenderer;
