//! Board square addressing.
//!
//! Squares are indexed `rank * 8 + file`, so `0 == a1`, `7 == h1`, and
//! `63 == h8`. Grid rows map directly to ranks (row 0 is rank 1).

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    #[inline]
    pub const fn new(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Self(index))
        } else {
            None
        }
    }

    #[inline]
    pub const fn from_rank_file(rank: u8, file: u8) -> Option<Self> {
        if rank < 8 && file < 8 {
            Some(Self(rank * 8 + file))
        } else {
            None
        }
    }

    /// Grid cell `(row, column)` as addressed by click events.
    #[inline]
    pub const fn from_row_col(row: u8, col: u8) -> Option<Self> {
        Self::from_rank_file(row, col)
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 / 8
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    /// Checkerboard parity; a1 is dark.
    #[inline]
    pub const fn is_dark(self) -> bool {
        (self.rank() + self.file()) % 2 == 0
    }

    #[inline]
    pub const fn is_last_rank(self) -> bool {
        self.rank() == 0 || self.rank() == 7
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0u8..64).map(Square)
    }

    #[inline]
    pub(crate) fn to_shakmaty(self) -> shakmaty::Square {
        shakmaty::Square::new(u32::from(self.0))
    }

    #[inline]
    pub(crate) fn from_shakmaty(square: shakmaty::Square) -> Self {
        // shakmaty squares share the a1 = 0 indexing and never exceed 63.
        Self(u32::from(square) as u8)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = char::from(b'a' + self.file());
        let rank = char::from(b'1' + self.rank());
        write!(f, "{file}{rank}")
    }
}

impl FromStr for Square {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(format!("invalid square '{s}'"));
        }

        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(format!("invalid square '{s}'"));
        }

        Self::from_rank_file(rank - b'1', file - b'a').ok_or_else(|| format!("invalid square '{s}'"))
    }
}
