//! Input events accepted by the controller and the notices it emits.

use crate::rules::outcome::GameOutcome;
use crate::rules::square::Square;

/// One variant per user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    CellClicked { row: u8, col: u8 },
    Reset,
    Exit,
    ToggleBot,
    ToggleAssistant,
    LoadPosition(String),
    PassTurn,
}

/// Transient feedback for the user, drained by the frontend after a redraw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    WrongTurn { square: Square },
    IllegalMove { square: Square },
    InvalidPosition { reason: String },
    PassRejected { reason: String },
    GameOver { outcome: GameOutcome, opponent_label: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}
