//! In-memory render sink for headless runs and tests

use std::collections::HashMap;

use glam::Vec2;

use super::directive::{Directive, Handle, RenderSink};
use crate::ui::Screen;

/// Records every directive and keeps a cheap model of what is on screen
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub log: Vec<Directive>,
    /// Live sprites and their last position
    pub sprites: HashMap<Handle, Vec2>,
    pub visible_screen: Option<Screen>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the directive log but keep the screen model
    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Number of live sprites besides the ship
    pub fn entity_count(&self) -> usize {
        self.sprites.keys().filter(|h| **h != Handle::Ship).count()
    }
}

impl RenderSink for RecordingRenderer {
    fn apply(&mut self, directive: Directive) {
        match &directive {
            Directive::Create { handle, .. } => {
                self.sprites.insert(*handle, Vec2::ZERO);
            }
            Directive::Position { handle, pos } => {
                self.sprites.insert(*handle, *pos);
            }
            Directive::Destroy { handle } => {
                self.sprites.remove(handle);
            }
            Directive::ShowScreen(screen) => self.visible_screen = Some(*screen),
            Directive::HideScreen(screen) => {
                if self.visible_screen == Some(*screen) {
                    self.visible_screen = None;
                }
            }
            _ => {}
        }
        self.log.push(directive);
    }
}
