//! Frame description handed to the frontend on each redraw: what must be
//! shown, not how.

use crate::controller::color_resolution::SquareColor;
use crate::rules::chess_types::{Piece, Side};
use crate::rules::square::Square;

pub const PLAYER_ONE_LABEL: &str = "PLAYER 1";
pub const PLAYER_TWO_LABEL: &str = "PLAYER 2";
pub const BOT_LABEL: &str = "BOT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellView {
    pub square: Square,
    pub piece: Option<Piece>,
    pub color: SquareColor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlsView {
    pub player_one_label: &'static str,
    pub player_two_label: &'static str,
    pub side_to_move: Side,
    pub reset_armed: bool,
    pub exit_armed: bool,
    pub toggle_bot_armed: bool,
    pub bot_enabled: bool,
    pub assistant_enabled: bool,
    pub pass_enabled: bool,
    pub bot_thinking: bool,
    pub assistant_thinking: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    /// Indexed by `Square::index`.
    pub cells: Vec<CellView>,
    pub controls: ControlsView,
    pub fen: String,
}

impl BoardView {
    #[inline]
    pub fn cell(&self, square: Square) -> &CellView {
        &self.cells[usize::from(square.index())]
    }
}
