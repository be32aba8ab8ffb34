//! Short-lived flash indicators.
//!
//! A flash highlights one part of the UI for [`FLASH_DURATION`] seconds.
//! Re-flashing a target restarts it with the new colour.

use bazaar_types::{ColorClass, FlashIndicator, FlashTarget};

use crate::rules::FLASH_DURATION;

/// The set of currently lit flash indicators.
#[derive(Debug, Clone, Default)]
pub struct FlashBoard {
    flashes: Vec<FlashIndicator>,
}

impl FlashBoard {
    /// An empty board.
    pub const fn new() -> Self {
        Self {
            flashes: Vec::new(),
        }
    }

    /// Light `target` in `color`, replacing any flash already on it.
    pub fn flash(&mut self, target: FlashTarget, color: ColorClass) {
        self.flashes.retain(|f| f.target != target);
        self.flashes.push(FlashIndicator {
            target,
            color,
            remaining: FLASH_DURATION,
        });
    }

    /// Run every flash down by `dt` and drop the expired ones.
    pub fn decay(&mut self, dt: f64) {
        for flash in &mut self.flashes {
            flash.remaining -= dt;
        }
        self.flashes.retain(|f| f.remaining > 0.0);
    }

    /// The lit flashes.
    pub fn active(&self) -> &[FlashIndicator] {
        &self.flashes
    }

    /// The colour `target` is flashing, if any.
    pub fn color_of(&self, target: FlashTarget) -> Option<ColorClass> {
        self.flashes
            .iter()
            .find(|f| f.target == target)
            .map(|f| f.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflash_replaces_colour() {
        let mut board = FlashBoard::new();
        board.flash(FlashTarget::Reputation, ColorClass::Green);
        board.flash(FlashTarget::Reputation, ColorClass::Red);
        assert_eq!(board.active().len(), 1);
        assert_eq!(board.color_of(FlashTarget::Reputation), Some(ColorClass::Red));
    }

    #[test]
    fn flashes_expire() {
        let mut board = FlashBoard::new();
        board.flash(FlashTarget::Screen, ColorClass::Red);
        board.decay(0.3);
        assert_eq!(board.color_of(FlashTarget::Screen), Some(ColorClass::Red));
        board.decay(0.3);
        assert!(board.active().is_empty());
    }
}
