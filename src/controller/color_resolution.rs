//! Display color of each board square.
//!
//! `resolve` is a pure function of the square and the controller state. Rules
//! are checked in a fixed order and the first match wins:
//!
//! 1. selected origin
//! 2. capture destination
//! 3. castling / en passant destination
//! 4. assistant suggestion endpoint (not on the bot's turn)
//! 5. plain destination
//! 6. checkerboard base

use crate::controller::selection::Selection;
use crate::rules::chess_move::Move;
use crate::rules::chess_types::Side;
use crate::rules::position::Position;
use crate::rules::square::Square;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SquareColor {
    Light,
    Dark,
    Selected,
    ValidLight,
    ValidDark,
    Capture,
    Special,
    SuggestedWhite,
    SuggestedBlack,
    Error,
}

impl SquareColor {
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            SquareColor::Light => (0xFF, 0xFF, 0xFF),
            SquareColor::Dark => (0x75, 0x75, 0x75),
            SquareColor::Selected => (0x00, 0xBC, 0xD4),
            SquareColor::ValidLight => (0x66, 0xBB, 0x6A),
            SquareColor::ValidDark => (0x2E, 0x7D, 0x32),
            SquareColor::Capture => (0xFF, 0xFF, 0x00),
            SquareColor::Special => (0xFF, 0x00, 0xFF),
            SquareColor::SuggestedWhite => (0x00, 0xFF, 0xFF),
            SquareColor::SuggestedBlack => (0xAA, 0x00, 0xFF),
            SquareColor::Error => (0xFF, 0x00, 0x00),
        }
    }

    #[inline]
    pub const fn base(square: Square) -> Self {
        if square.is_dark() {
            SquareColor::Dark
        } else {
            SquareColor::Light
        }
    }

    #[inline]
    pub const fn suggestion_for(side: Side) -> Self {
        match side {
            Side::White => SquareColor::SuggestedWhite,
            Side::Black => SquareColor::SuggestedBlack,
        }
    }
}

/// Everything color resolution reads.
#[derive(Debug, Clone, Copy)]
pub struct ColorContext<'a> {
    pub position: &'a Position,
    pub selection: &'a Selection,
    pub suggestion: Option<&'a Move>,
    pub assistant_enabled: bool,
    /// Bot mode is on and the bot is the side to move.
    pub bot_to_move: bool,
}

impl ColorContext<'_> {
    /// The suggestion if it may be shown right now. Legality is checked
    /// against the live position, never cached.
    pub fn visible_suggestion(&self) -> Option<Move> {
        if !self.assistant_enabled || self.bot_to_move {
            return None;
        }
        self.suggestion
            .copied()
            .filter(|mv| self.position.is_legal(mv))
    }
}

pub fn resolve(square: Square, ctx: &ColorContext<'_>) -> SquareColor {
    resolve_with(square, ctx, ctx.visible_suggestion())
}

/// Colors for all 64 squares, indexed by `Square::index`.
pub fn resolve_board(ctx: &ColorContext<'_>) -> [SquareColor; 64] {
    let suggestion = ctx.visible_suggestion();
    let mut colors = [SquareColor::Light; 64];
    for square in Square::all() {
        colors[usize::from(square.index())] = resolve_with(square, ctx, suggestion);
    }
    colors
}

fn resolve_with(square: Square, ctx: &ColorContext<'_>, suggestion: Option<Move>) -> SquareColor {
    if ctx.selection.origin() == Some(square) {
        return SquareColor::Selected;
    }

    let destination = ctx.selection.destination(square);
    if let Some(candidate) = destination {
        if candidate.is_capture() {
            return SquareColor::Capture;
        }
        if candidate.is_special() {
            return SquareColor::Special;
        }
    }

    if suggestion.is_some_and(|mv| mv.touches(square)) {
        return SquareColor::suggestion_for(ctx.position.side_to_move());
    }

    if destination.is_some() {
        return if square.is_dark() {
            SquareColor::ValidDark
        } else {
            SquareColor::ValidLight
        };
    }

    SquareColor::base(square)
}
