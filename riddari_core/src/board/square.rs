use std::{
    fmt::{Debug, Display, Write},
    str::FromStr,
};

use paste::paste;
use seq_macro::seq;
use thiserror::Error;

/// Represents a square on the chessboard.
///
/// Internally, represents a square in the 0x88 encoding: the rank (0-7, with
/// 0 being rank 1) occupies bits 4-6 and the file (0-7, with 0 being file A)
/// occupies bits 0-2. Bits 3 and 7 are always clear for a valid square, so
/// any index with the mask `0x88` set is off the board. This makes off-board
/// detection a single bitwise test and lets the difference between two
/// squares encode both direction and distance.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

/// Bit pattern that is set on every value which does not denote a board
/// square.
pub const OFF_BOARD: u8 = 0x88;

impl Square {
    /// Construct a [`Square`] from the provided rank and file.
    ///
    /// Ranks are numbered 0-7 with 0 being rank 1 and 7 being rank 8.
    ///
    /// Files are numbered 0-7 with 0 being file A and 7 being file H.
    ///
    /// Returns [`None`] if either `rank` or `file` are greater than 7.
    pub const fn new(rank: u8, file: u8) -> Option<Self> {
        if rank >= 8 || file >= 8 {
            None
        } else {
            Some(Self(rank << 4 | file))
        }
    }

    /// Construct a [`Square`] from the provided rank and file, without
    /// checking that they are in range. Out-of-range values are truncated to
    /// 0-7, so the result is always a valid square (though likely not the one
    /// you wanted).
    pub const fn new_unchecked(rank: u8, file: u8) -> Self {
        Self((rank & 7) << 4 | (file & 7))
    }

    /// Construct a [`Square`] from a raw 0x88 index.
    ///
    /// Returns [`None`] for indices with the [`OFF_BOARD`] mask set.
    pub const fn from_raw(raw: u8) -> Option<Self> {
        if raw & OFF_BOARD != 0 {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// Returns the raw 0x88 index of this square (0x00..=0x77).
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Returns the raw 0x88 index of this square as a [`usize`], for indexing
    /// the 128-slot board grid.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the rank of this square.
    ///
    /// Ranks are numbered 0-7 with 0 being rank 1 and 7 being rank 8.
    pub const fn rank(self) -> u8 {
        self.0 >> 4
    }

    /// Returns the file of this square.
    ///
    /// Files are numbered 0-7 with 0 being file A and 7 being file H.
    pub const fn file(self) -> u8 {
        self.0 & 0x0F
    }

    /// Steps this square by a 0x88 delta, returning [`None`] if the result
    /// leaves the board.
    pub const fn offset(self, delta: i8) -> Option<Self> {
        Self::from_raw((self.0 as i8).wrapping_add(delta) as u8)
    }

    /// Returns this square reflected to the other side of the board (the same
    /// file, rank 1 becomes rank 8 and so on). Used to share piece-square
    /// tables between the two sides.
    pub const fn rank_mirrored(self) -> Self {
        Self(self.0 ^ 0x70)
    }

    /// Returns true if this square belongs to the light color class.
    pub const fn is_light(self) -> bool {
        (self.0 ^ (self.0 >> 4)) & 1 != 0
    }

    /// Returns an iterator over every square, in increasing rank-then-file
    /// order starting from A1.
    pub fn all() -> impl Iterator<Item = Square> {
        (0u8..64).map(|i| Square((i >> 3) << 4 | (i & 7)))
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char((self.file() + b'a') as _)?;
        f.write_char((self.rank() + b'1') as _)
    }
}

impl Debug for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "{}{}",
            (self.file() + b'A') as char,
            (self.rank() + b'1') as char
        ))
    }
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("invalid square")]
pub struct ParseSquareError;

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut char_iter = s.chars();
        let file = char_iter.next().ok_or(ParseSquareError)?;
        let rank = char_iter.next().ok_or(ParseSquareError)?;
        if char_iter.next().is_some() {
            return Err(ParseSquareError);
        }

        if ('a'..='h').contains(&file) && ('1'..='8').contains(&rank) {
            Ok(Square::new_unchecked(rank as u8 - b'1', file as u8 - b'a'))
        } else {
            Err(ParseSquareError)
        }
    }
}

/// Board square aliases
#[allow(clippy::eq_op, clippy::char_lit_as_u8)]
impl Square {
    seq!(RANK in 1..=8 {
        seq!(FILE in 'A'..='H' {
            paste! {
                pub const [<FILE RANK>]: Square = Square::new_unchecked(RANK - 1, FILE as u8 - b'A');
            }
        });
    });
}
