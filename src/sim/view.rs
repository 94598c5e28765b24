//! Render-facing contracts
//!
//! The simulation never owns a renderer. Each tick it asks a [`Surface`] for
//! the current play-area size and hands it a [`Frame`] to draw.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GamePhase, PowerupKind};

/// Visible play-area dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

impl PlayArea {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Zero-size or non-finite areas cannot host a game
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Words strictly below this line are missed
    pub fn miss_boundary(&self, margin: f32) -> f32 {
        self.height - margin
    }
}

/// A falling word as the renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordSprite {
    pub id: u32,
    pub word: String,
    pub pos: Vec2,
    /// Currently slowed by the slowdown effect
    pub slowed: bool,
}

/// A power-up as the renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerupSprite {
    pub id: u32,
    pub kind: PowerupKind,
    pub pos: Vec2,
}

/// Everything a renderer needs for one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub tick: u64,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub max_lives: u8,
    pub wpm: u32,
    pub slowdown_active: bool,
    pub words: Vec<WordSprite>,
    pub powerups: Vec<PowerupSprite>,
}

/// Render sink and play-area source
pub trait Surface {
    /// `None` when the play area is not mounted
    fn play_area(&self) -> Option<PlayArea>;

    fn present(&mut self, frame: &Frame);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usable_area_requires_positive_size() {
        assert!(PlayArea::new(800.0, 600.0).is_usable());
        assert!(!PlayArea::new(0.0, 600.0).is_usable());
        assert!(!PlayArea::new(800.0, f32::NAN).is_usable());
    }

    #[test]
    fn miss_boundary_sits_above_bottom_edge() {
        assert_eq!(PlayArea::new(800.0, 600.0).miss_boundary(30.0), 570.0);
    }
}
