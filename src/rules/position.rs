//! Authoritative game position backed by the `shakmaty` rules engine.
//!
//! `Position` is a value type: every mutation returns a new position, so a
//! clone handed to a background task is an immutable snapshot by
//! construction. Repetition history travels with the position so terminal
//! detection can see fivefold repetition.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, EnPassantMode, FromSetup, Position as _, PositionError};

use crate::errors::RulesError;
use crate::rules::chess_move::{CandidateMove, Move};
use crate::rules::chess_rules::{FIVEFOLD_REPETITION_COUNT, SEVENTY_FIVE_MOVE_HALFMOVES};
use crate::rules::chess_types::{Piece, PieceKind, Side};
use crate::rules::outcome::{GameOutcome, Termination};
use crate::rules::square::Square;

#[derive(Debug, Clone)]
pub struct Position {
    chess: Chess,
    repetition_history: Vec<u64>,
}

impl Default for Position {
    fn default() -> Self {
        Self::new_game()
    }
}

impl Position {
    pub fn new_game() -> Self {
        Self::from_chess(Chess::default())
    }

    /// Load a position from FEN text. Castling rights and en passant squares
    /// that cannot apply to the placement are dropped rather than rejected.
    pub fn from_fen(text: &str) -> Result<Self, RulesError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(RulesError::InvalidPositionFormat("empty FEN".to_owned()));
        }

        let fen: Fen = trimmed
            .parse()
            .map_err(|e| RulesError::InvalidPositionFormat(format!("{e}")))?;
        let chess: Chess = fen
            .into_position(CastlingMode::Standard)
            .or_else(PositionError::ignore_invalid_castling_rights)
            .or_else(PositionError::ignore_invalid_ep_square)
            .map_err(|e| RulesError::InvalidPositionFormat(format!("{e}")))?;

        Ok(Self::from_chess(chess))
    }

    fn from_chess(chess: Chess) -> Self {
        let mut position = Self {
            chess,
            repetition_history: Vec::new(),
        };
        position.record_repetition();
        position
    }

    pub fn fen(&self) -> String {
        Fen::from_position(self.chess.clone(), EnPassantMode::Legal).to_string()
    }

    #[inline]
    pub fn side_to_move(&self) -> Side {
        Side::from_shakmaty(self.chess.turn())
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.chess.board().piece_at(square.to_shakmaty()).map(|p| Piece {
            side: Side::from_shakmaty(p.color),
            kind: PieceKind::from_role(p.role),
        })
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.chess.fullmoves().get()
    }

    #[inline]
    pub fn is_check(&self) -> bool {
        self.chess.is_check()
    }

    pub fn legal_moves(&self) -> Vec<CandidateMove> {
        self.chess
            .legal_moves()
            .iter()
            .filter_map(CandidateMove::from_shakmaty)
            .collect()
    }

    pub fn legal_moves_from(&self, origin: Square) -> Vec<CandidateMove> {
        self.legal_moves()
            .into_iter()
            .filter(|c| c.mv.from == origin)
            .collect()
    }

    /// The legal move matching `mv` exactly, promotion included.
    pub fn find_legal(&self, mv: &Move) -> Option<CandidateMove> {
        self.legal_moves().into_iter().find(|c| c.mv == *mv)
    }

    #[inline]
    pub fn is_legal(&self, mv: &Move) -> bool {
        self.find_legal(mv).is_some()
    }

    /// Apply a legal move, returning the resulting position.
    pub fn play(&self, mv: &Move) -> Result<Position, RulesError> {
        let candidate = self.find_legal(mv).ok_or(RulesError::IllegalMove(*mv))?;
        let mut next = self.successor(&candidate);
        next.record_repetition();
        Ok(next)
    }

    /// Apply a candidate generated from this position without touching the
    /// repetition history. Used by search, where history is irrelevant.
    pub fn successor(&self, candidate: &CandidateMove) -> Position {
        let mut next = self.clone();
        next.chess.play_unchecked(&candidate.raw);
        next
    }

    /// Pass the turn: the side to move flips, en passant rights lapse, and
    /// the move counters advance as if a quiet move had been played.
    pub fn pass_turn(&self) -> Result<Position, RulesError> {
        if self.chess.is_check() {
            return Err(RulesError::PassRejected(
                "the side to move is in check".to_owned(),
            ));
        }

        let mut setup = self.chess.clone().into_setup(EnPassantMode::Legal);
        let mover = setup.turn;
        setup.turn = !mover;
        setup.ep_square = None;
        setup.halfmoves = setup.halfmoves.saturating_add(1);
        if mover == shakmaty::Color::Black {
            setup.fullmoves = setup.fullmoves.saturating_add(1);
        }

        let chess = Chess::from_setup(setup, CastlingMode::Standard)
            .map_err(|e| RulesError::PassRejected(format!("{e}")))?;

        let mut next = Self {
            chess,
            repetition_history: self.repetition_history.clone(),
        };
        next.record_repetition();
        Ok(next)
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        if self.chess.is_checkmate() {
            return Some(GameOutcome {
                winner: Some(self.side_to_move().opposite()),
                termination: Termination::Checkmate,
            });
        }

        let termination = if self.chess.is_stalemate() {
            Termination::Stalemate
        } else if self.chess.is_insufficient_material() {
            Termination::InsufficientMaterial
        } else if self.chess.halfmoves() >= SEVENTY_FIVE_MOVE_HALFMOVES {
            Termination::SeventyFiveMoves
        } else if self.repetition_count() >= FIVEFOLD_REPETITION_COUNT {
            Termination::FivefoldRepetition
        } else {
            return None;
        };

        Some(GameOutcome {
            winner: None,
            termination,
        })
    }

    /// Material balance in centipawns from `side`'s point of view.
    pub fn material_balance(&self, side: Side) -> i32 {
        let board = self.chess.board();
        let mut score = 0i32;
        for kind in [
            PieceKind::Pawn,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
        ] {
            let role = board.by_role(kind.to_role());
            let ours = (role & board.by_color(side.to_shakmaty())).count() as i32;
            let theirs = (role & board.by_color(side.opposite().to_shakmaty())).count() as i32;
            score += (ours - theirs) * kind.value();
        }
        score
    }

    /// How many times the current placement, turn, and rights have occurred.
    pub fn repetition_count(&self) -> usize {
        match self.repetition_history.last() {
            Some(current) => self
                .repetition_history
                .iter()
                .filter(|key| *key == current)
                .count(),
            None => 0,
        }
    }

    fn record_repetition(&mut self) {
        let fen = self.fen();
        // Placement, turn, castling, and en passant; counters excluded.
        let key_fields: Vec<&str> = fen.split_whitespace().take(4).collect();
        let mut hasher = DefaultHasher::new();
        key_fields.hash(&mut hasher);
        self.repetition_history.push(hasher.finish());
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.fen() == other.fen()
    }
}

impl Eq for Position {}

#[cfg(test)]
mod tests {
    use super::Position;
    use crate::errors::RulesError;
    use crate::rules::chess_move::Move;
    use crate::rules::chess_rules::STARTING_POSITION_FEN;
    use crate::rules::chess_types::{PieceKind, Side};
    use crate::rules::outcome::Termination;

    fn mv(text: &str) -> Move {
        text.parse().expect("test move should parse")
    }

    #[test]
    fn new_game_matches_starting_fen() {
        let position = Position::new_game();
        assert_eq!(position.fen(), STARTING_POSITION_FEN);
        assert_eq!(position.legal_moves().len(), 20);
        assert_eq!(position.side_to_move(), Side::White);
    }

    #[test]
    fn play_returns_new_position_and_leaves_original_untouched() {
        let start = Position::new_game();
        let next = start.play(&mv("e2e4")).expect("e2e4 should be legal");
        assert_eq!(start.fen(), STARTING_POSITION_FEN);
        assert_eq!(next.side_to_move(), Side::Black);
        assert_eq!(
            next.piece_at("e4".parse().expect("square")).map(|p| p.kind),
            Some(PieceKind::Pawn)
        );
    }

    #[test]
    fn illegal_move_is_reported() {
        let start = Position::new_game();
        assert_eq!(
            start.play(&mv("e2e5")),
            Err(RulesError::IllegalMove(mv("e2e5")))
        );
    }

    #[test]
    fn invalid_fen_is_rejected() {
        assert!(matches!(
            Position::from_fen("not a fen"),
            Err(RulesError::InvalidPositionFormat(_))
        ));
        assert!(matches!(
            Position::from_fen("   "),
            Err(RulesError::InvalidPositionFormat(_))
        ));
    }

    #[test]
    fn inapplicable_castling_rights_are_dropped() {
        let bare = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w KQkq - 0 1")
            .expect("kings-only fen should load");
        assert_eq!(bare.fen(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");

        let partial = Position::from_fen("r3k3/8/8/8/8/8/8/4K2R w KQkq - 0 1")
            .expect("fen with partial rights should load");
        assert_eq!(partial.fen(), "r3k3/8/8/8/8/8/8/4K2R w Kq - 0 1");
        assert!(partial.is_legal(&mv("e1g1")));
    }

    #[test]
    fn impossible_en_passant_square_is_dropped() {
        let position = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - e6 0 1")
            .expect("fen with a stray en passant square should load");
        assert_eq!(position.fen(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    }

    #[test]
    fn missing_king_is_still_rejected() {
        assert!(matches!(
            Position::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(RulesError::InvalidPositionFormat(_))
        ));
    }

    #[test]
    fn castling_is_expressed_as_king_step() {
        let position = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1")
            .expect("castling fen should parse");
        let castles: Vec<_> = position
            .legal_moves_from("e1".parse().expect("square"))
            .into_iter()
            .filter(|c| c.is_castle)
            .map(|c| c.mv.to_string())
            .collect();
        assert!(castles.contains(&"e1g1".to_owned()));
        assert!(castles.contains(&"e1c1".to_owned()));
    }

    #[test]
    fn en_passant_is_both_capture_and_special() {
        let position = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2")
            .expect("en passant fen should parse");
        let ep = position
            .find_legal(&mv("e5d6"))
            .expect("en passant should be legal");
        assert!(ep.is_en_passant);
        assert!(ep.is_capture());
        assert!(ep.is_special());
    }

    #[test]
    fn checkmate_reports_winner() {
        let position = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1")
            .expect("fen should parse");
        assert!(!position.is_terminal());
        let mated = position.play(&mv("a1a8")).expect("back rank mate is legal");
        let outcome = mated.outcome().expect("position should be terminal");
        assert_eq!(outcome.winner, Some(Side::White));
        assert_eq!(outcome.termination, Termination::Checkmate);
    }

    #[test]
    fn stalemate_is_a_draw() {
        let position =
            Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").expect("fen should parse");
        let outcome = position.outcome().expect("stalemate should be terminal");
        assert_eq!(outcome.winner, None);
        assert_eq!(outcome.termination, Termination::Stalemate);
    }

    #[test]
    fn pass_turn_flips_side_and_clears_en_passant() {
        let position = Position::new_game()
            .play(&mv("e2e4"))
            .expect("e2e4 should be legal");
        let passed = position.pass_turn().expect("pass should be allowed");
        assert_eq!(passed.side_to_move(), Side::White);
        assert_eq!(passed.fullmove_number(), 2);
        assert!(!passed.fen().contains("e3"));
    }

    #[test]
    fn pass_turn_is_rejected_in_check() {
        let position = Position::from_fen("4k3/8/8/8/8/8/4r3/4K3 w - - 0 1")
            .expect("fen should parse");
        assert!(matches!(
            position.pass_turn(),
            Err(RulesError::PassRejected(_))
        ));
    }

    #[test]
    fn fivefold_repetition_ends_the_game() {
        let mut position = Position::new_game();
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
        for _ in 0..4 {
            assert!(!position.is_terminal());
            for step in shuffle {
                position = position.play(&mv(step)).expect("knight shuffle is legal");
            }
        }
        assert_eq!(position.repetition_count(), 5);
        assert_eq!(
            position.outcome().map(|o| o.termination),
            Some(Termination::FivefoldRepetition)
        );
    }

    #[test]
    fn material_balance_counts_from_requested_side() {
        let position =
            Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").expect("fen should parse");
        assert_eq!(position.material_balance(Side::White), 500);
        assert_eq!(position.material_balance(Side::Black), -500);
    }
}
