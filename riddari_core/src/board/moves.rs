use std::{
    fmt::{Display, Write},
    str::FromStr,
};

use thiserror::Error;

use super::{PieceKind, Square};

/// A move in Coordinate Algebraic Notation terms: source square, destination
/// square, and the piece kind a pawn promotes to if it reaches the back rank.
///
/// This is also the wire format used by the protocol in both directions.
/// Examples:
///
/// * `e2e4`
/// * `e1g1` (white short castling)
/// * `e7e8q` (promotion; the letter is lowercase and one of `q r b n`)
///
/// ```
/// # use riddari_core::board::{Move, Square};
/// assert_eq!(
///     "e2e4".parse(),
///     Ok(Move::new(Square::E2, Square::E4))
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub const fn new_promotion(from: Square, to: Square, promotion: PieceKind) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
        }
    }
}

impl Default for Move {
    fn default() -> Self {
        Self::new(Square::A1, Square::A1)
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.from.fmt(f)?;
        self.to.fmt(f)?;
        if let Some(promotion) = self.promotion {
            f.write_char(promotion.as_lowercase_char())?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseMoveError {
    #[error("expected 4 or 5 characters")]
    IncorrectLength,
    #[error("invalid square {0:?}")]
    InvalidSquare(String),
    #[error("invalid promotion letter {0:?}")]
    InvalidPromotion(char),
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 4 && chars.len() != 5 {
            return Err(ParseMoveError::IncorrectLength);
        }

        let from_str = String::from_iter(&chars[0..2]);
        let from = from_str
            .parse()
            .map_err(|_| ParseMoveError::InvalidSquare(from_str))?;

        let to_str = String::from_iter(&chars[2..4]);
        let to = to_str
            .parse()
            .map_err(|_| ParseMoveError::InvalidSquare(to_str))?;

        // Only the lowercase letters of the four promotable kinds are part of
        // the notation; `e7e8K` and `e7e8P` are not moves.
        let promotion = match chars.get(4) {
            Some(&c) => Some(match c {
                'q' => PieceKind::Queen,
                'r' => PieceKind::Rook,
                'b' => PieceKind::Bishop,
                'n' => PieceKind::Knight,
                _ => return Err(ParseMoveError::InvalidPromotion(c)),
            }),
            None => None,
        };

        Ok(Self {
            from,
            to,
            promotion,
        })
    }
}
