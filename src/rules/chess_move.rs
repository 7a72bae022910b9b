//! Move values exchanged between the controller, the oracle, and the rules
//! adapter.

use std::fmt;
use std::str::FromStr;

use crate::rules::chess_types::PieceKind;
use crate::rules::square::Square;

/// A move as the user interface sees it: origin, destination, and optional
/// promotion. Castling is expressed as the king's two-square step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    #[inline]
    pub const fn with_promotion(mut self, promotion: PieceKind) -> Self {
        self.promotion = Some(promotion);
        self
    }

    #[inline]
    pub fn touches(&self, square: Square) -> bool {
        self.from == square || self.to == square
    }
}

/// Long algebraic (UCI) form, e.g. `e2e4` or `e7e8q`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.to_char())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_ascii() || (s.len() != 4 && s.len() != 5) {
            return Err(format!("invalid long algebraic move: {s}"));
        }

        let from: Square = s[0..2].parse()?;
        let to: Square = s[2..4].parse()?;
        let mut mv = Move::new(from, to);

        if let Some(ch) = s[4..].chars().next() {
            let kind = PieceKind::from_promotion_char(ch)
                .ok_or_else(|| format!("invalid promotion piece '{ch}' in {s}"))?;
            mv = mv.with_promotion(kind);
        }

        Ok(mv)
    }
}

/// A legal move annotated with what the display and engines need to know.
#[derive(Debug, Clone)]
pub struct CandidateMove {
    pub mv: Move,
    pub moved: PieceKind,
    /// Piece removed by the move; `Some(Pawn)` for en passant.
    pub captured: Option<PieceKind>,
    pub is_castle: bool,
    pub is_en_passant: bool,
    pub(crate) raw: shakmaty::Move,
}

impl CandidateMove {
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Castling and en passant.
    #[inline]
    pub fn is_special(&self) -> bool {
        self.is_castle || self.is_en_passant
    }

    pub(crate) fn from_shakmaty(raw: &shakmaty::Move) -> Option<Self> {
        let from = Square::from_shakmaty(raw.from()?);
        let to = match *raw {
            shakmaty::Move::Castle { king, rook } => {
                let file = if rook.file() > king.file() {
                    shakmaty::File::G
                } else {
                    shakmaty::File::C
                };
                Square::from_shakmaty(shakmaty::Square::from_coords(file, king.rank()))
            }
            _ => Square::from_shakmaty(raw.to()),
        };

        let mut mv = Move::new(from, to);
        if let Some(role) = raw.promotion() {
            mv = mv.with_promotion(PieceKind::from_role(role));
        }

        Some(Self {
            mv,
            moved: PieceKind::from_role(raw.role()),
            captured: raw.capture().map(PieceKind::from_role),
            is_castle: raw.is_castle(),
            is_en_passant: raw.is_en_passant(),
            raw: raw.clone(),
        })
    }
}
