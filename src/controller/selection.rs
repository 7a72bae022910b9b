//! Click-driven selection state machine.
//!
//! `Idle --click--> OriginSelected --click--> Idle`. The machine never mutates
//! the position itself: a completed selection yields the `Move` to apply and
//! the controller commits it.

use std::collections::BTreeMap;

use crate::rules::chess_move::{CandidateMove, Move};
use crate::rules::chess_types::PieceKind;
use crate::rules::position::Position;
use crate::rules::square::Square;

#[derive(Debug, Clone, Default)]
pub enum Selection {
    #[default]
    Idle,
    OriginSelected {
        origin: Square,
        destinations: BTreeMap<Square, CandidateMove>,
    },
}

/// What a click did to the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Selected(Square),
    Deselected,
    /// A destination was chosen; the move must now be applied.
    Moved(Move),
    /// The clicked piece belongs to the side not on move.
    WrongTurn(Square),
    /// The clicked square is not a destination of the selected piece.
    IllegalMove(Square),
    /// Empty square clicked with nothing selected.
    Ignored,
}

impl Selection {
    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, Selection::Idle)
    }

    #[inline]
    pub fn origin(&self) -> Option<Square> {
        match self {
            Selection::Idle => None,
            Selection::OriginSelected { origin, .. } => Some(*origin),
        }
    }

    #[inline]
    pub fn destination(&self, square: Square) -> Option<&CandidateMove> {
        match self {
            Selection::Idle => None,
            Selection::OriginSelected { destinations, .. } => destinations.get(&square),
        }
    }

    pub fn destination_count(&self) -> usize {
        match self {
            Selection::Idle => 0,
            Selection::OriginSelected { destinations, .. } => destinations.len(),
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        *self = Selection::Idle;
    }

    pub fn click(&mut self, square: Square, position: &Position) -> ClickOutcome {
        match std::mem::take(self) {
            Selection::Idle => self.click_from_idle(square, position),
            Selection::OriginSelected {
                origin,
                destinations,
            } => {
                if square == origin {
                    return ClickOutcome::Deselected;
                }
                match destinations.get(&square) {
                    Some(candidate) => ClickOutcome::Moved(resolve_promotion(candidate)),
                    None => ClickOutcome::IllegalMove(square),
                }
            }
        }
    }

    fn click_from_idle(&mut self, square: Square, position: &Position) -> ClickOutcome {
        let Some(piece) = position.piece_at(square) else {
            return ClickOutcome::Ignored;
        };

        if piece.side != position.side_to_move() {
            return ClickOutcome::WrongTurn(square);
        }

        *self = Selection::OriginSelected {
            origin: square,
            destinations: destinations_from(position, square),
        };
        ClickOutcome::Selected(square)
    }
}

/// Legal destinations from `origin`, one move per destination. When several
/// promotions reach the same square the most valuable one is kept.
fn destinations_from(position: &Position, origin: Square) -> BTreeMap<Square, CandidateMove> {
    let mut destinations = BTreeMap::<Square, CandidateMove>::new();
    for candidate in position.legal_moves_from(origin) {
        let replace = match destinations.get(&candidate.mv.to) {
            Some(existing) => promotion_value(&candidate) > promotion_value(existing),
            None => true,
        };
        if replace {
            destinations.insert(candidate.mv.to, candidate);
        }
    }
    destinations
}

fn promotion_value(candidate: &CandidateMove) -> i32 {
    candidate.mv.promotion.map(PieceKind::value).unwrap_or(0)
}

fn resolve_promotion(candidate: &CandidateMove) -> Move {
    let mv = candidate.mv;
    if candidate.moved == PieceKind::Pawn && mv.to.is_last_rank() && mv.promotion.is_none() {
        mv.with_promotion(PieceKind::HIGHEST_PROMOTION)
    } else {
        mv
    }
}
