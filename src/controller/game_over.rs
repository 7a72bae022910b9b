//! One-shot game-over latch.

use crate::rules::outcome::GameOutcome;
use crate::rules::position::Position;

#[derive(Debug, Clone, Default)]
pub struct GameOverDetector {
    notified: bool,
}

impl GameOverDetector {
    /// Returns the outcome the first time a terminal position is observed
    /// for the current game, and `None` on every later call until `reset`.
    pub fn observe(&mut self, position: &Position) -> Option<GameOutcome> {
        if self.notified {
            return None;
        }
        let outcome = position.outcome()?;
        self.notified = true;
        Some(outcome)
    }

    #[inline]
    pub fn reset(&mut self) {
        self.notified = false;
    }

    #[inline]
    pub fn notified(&self) -> bool {
        self.notified
    }
}
