use bitflags::bitflags;

use super::{Side, Square};

/// The two flanks of the board a king may castle towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wing {
    KingSide,
    QueenSide,
}

impl Wing {
    pub const ALL: [Wing; 2] = [Wing::KingSide, Wing::QueenSide];

    pub const fn index(self) -> usize {
        match self {
            Wing::KingSide => 0,
            Wing::QueenSide => 1,
        }
    }

    /// The starting square of the rook on this wing for the given side.
    pub const fn rook_home(self, side: Side) -> Square {
        match (side, self) {
            (Side::White, Wing::KingSide) => Square::H1,
            (Side::White, Wing::QueenSide) => Square::A1,
            (Side::Black, Wing::KingSide) => Square::H8,
            (Side::Black, Wing::QueenSide) => Square::A8,
        }
    }
}

bitflags! {
    /// Tracks, for each castling participant, whether it has moved or been
    /// captured away from its starting square.
    ///
    /// The flags do *not* mean "castling is currently legal" -- that is
    /// re-derived during move generation and validation from the position
    /// itself (pieces between king and rook, checks along the king's path).
    /// A flag, once set, never clears for the rest of the game; only a new
    /// game or a position load resets them.
    ///
    /// Capturing an enemy rook on its starting corner also sets that rook's
    /// flag. Without this, a promoted rook wandering back to the corner could
    /// smuggle the castling right back into existence.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Castling: u8 {
        const WHITE_KING_MOVED           = 0b000001;
        const BLACK_KING_MOVED           = 0b000010;
        const WHITE_KINGSIDE_ROOK_MOVED  = 0b000100;
        const WHITE_QUEENSIDE_ROOK_MOVED = 0b001000;
        const BLACK_KINGSIDE_ROOK_MOVED  = 0b010000;
        const BLACK_QUEENSIDE_ROOK_MOVED = 0b100000;

        const WHITE_KINGSIDE  = Self::WHITE_KING_MOVED.bits() | Self::WHITE_KINGSIDE_ROOK_MOVED.bits();
        const WHITE_QUEENSIDE = Self::WHITE_KING_MOVED.bits() | Self::WHITE_QUEENSIDE_ROOK_MOVED.bits();
        const BLACK_KINGSIDE  = Self::BLACK_KING_MOVED.bits() | Self::BLACK_KINGSIDE_ROOK_MOVED.bits();
        const BLACK_QUEENSIDE = Self::BLACK_KING_MOVED.bits() | Self::BLACK_QUEENSIDE_ROOK_MOVED.bits();
    }
}

impl Castling {
    /// The flag recording that `side`'s king has moved.
    pub const fn king_moved(side: Side) -> Self {
        match side {
            Side::White => Self::WHITE_KING_MOVED,
            Side::Black => Self::BLACK_KING_MOVED,
        }
    }

    /// The flag recording that `side`'s rook on `wing` has moved or been
    /// captured.
    pub const fn rook_moved(side: Side, wing: Wing) -> Self {
        match (side, wing) {
            (Side::White, Wing::KingSide) => Self::WHITE_KINGSIDE_ROOK_MOVED,
            (Side::White, Wing::QueenSide) => Self::WHITE_QUEENSIDE_ROOK_MOVED,
            (Side::Black, Wing::KingSide) => Self::BLACK_KINGSIDE_ROOK_MOVED,
            (Side::Black, Wing::QueenSide) => Self::BLACK_QUEENSIDE_ROOK_MOVED,
        }
    }

    /// The combined king + rook mask for one side and wing.
    pub const fn wing_mask(side: Side, wing: Wing) -> Self {
        match (side, wing) {
            (Side::White, Wing::KingSide) => Self::WHITE_KINGSIDE,
            (Side::White, Wing::QueenSide) => Self::WHITE_QUEENSIDE,
            (Side::Black, Wing::KingSide) => Self::BLACK_KINGSIDE,
            (Side::Black, Wing::QueenSide) => Self::BLACK_QUEENSIDE,
        }
    }

    /// Whether neither the king nor the rook of the given wing has moved, so
    /// that castling there remains possible (subject to the positional checks
    /// done at move time).
    pub const fn can_castle(self, side: Side, wing: Wing) -> bool {
        !self.intersects(Self::wing_mask(side, wing))
    }
}
