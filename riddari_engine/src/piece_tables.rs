//! Piece-square tables, indexed by the raw 0x88 square.
//!
//! Each table is laid out 128 wide so the square's raw index addresses it
//! directly; the high half of every rank row (the off-board nibble) is
//! zero padding. Values are from White's point of view; Black indexes the
//! pawn and middlegame king tables through the rank mirror.

/// Centralization bonus shared by knights and bishops. Symmetric, so both
/// sides index it directly.
#[rustfmt::skip]
pub const MINOR_PIECE_TABLE: [i32; 128] = [
    -10, -10, -10, -10, -10, -10, -10, -10,  0, 0, 0, 0, 0, 0, 0, 0,
    -10,   0,   0,   0,   0,   0,   0, -10,  0, 0, 0, 0, 0, 0, 0, 0,
    -10,   0,   5,   5,   5,   5,   0, -10,  0, 0, 0, 0, 0, 0, 0, 0,
    -10,   0,   5,  10,  10,   5,   0, -10,  0, 0, 0, 0, 0, 0, 0, 0,
    -10,   0,   5,  10,  10,   5,   0, -10,  0, 0, 0, 0, 0, 0, 0, 0,
    -10,   0,   5,   5,   5,   5,   0, -10,  0, 0, 0, 0, 0, 0, 0, 0,
    -10,   0,   0,   0,   0,   0,   0, -10,  0, 0, 0, 0, 0, 0, 0, 0,
    -10, -10, -10, -10, -10, -10, -10, -10,  0, 0, 0, 0, 0, 0, 0, 0,
];

/// Pawn advancement bonus, with the central files discouraged from sitting
/// still on ranks 2 and 3.
#[rustfmt::skip]
pub const PAWN_TABLE: [i32; 128] = [
      0,   0,   0,   0,   0,   0,   0,   0,  0, 0, 0, 0, 0, 0, 0, 0,
      0,   0,   0, -40, -40,   0,   0,   0,  0, 0, 0, 0, 0, 0, 0, 0,
      1,   2,   3, -10, -10,   3,   2,   1,  0, 0, 0, 0, 0, 0, 0, 0,
      2,   4,   6,   8,   8,   6,   4,   2,  0, 0, 0, 0, 0, 0, 0, 0,
      3,   6,   9,  12,  12,   9,   6,   3,  0, 0, 0, 0, 0, 0, 0, 0,
      4,   8,  12,  16,  16,  12,   8,   4,  0, 0, 0, 0, 0, 0, 0, 0,
      5,  10,  15,  20,  20,  15,  10,   5,  0, 0, 0, 0, 0, 0, 0, 0,
      0,   0,   0,   0,   0,   0,   0,   0,  0, 0, 0, 0, 0, 0, 0, 0,
];

/// Opening and middlegame king table: reward the castled corners, punish
/// wandering forward.
#[rustfmt::skip]
pub const KING_TABLE: [i32; 128] = [
      0,  20,  40, -20,   0, -20,  40,  20,  0, 0, 0, 0, 0, 0, 0, 0,
    -20, -20, -20, -20, -20, -20, -20, -20,  0, 0, 0, 0, 0, 0, 0, 0,
    -40, -40, -40, -40, -40, -40, -40, -40,  0, 0, 0, 0, 0, 0, 0, 0,
    -40, -40, -40, -40, -40, -40, -40, -40,  0, 0, 0, 0, 0, 0, 0, 0,
    -40, -40, -40, -40, -40, -40, -40, -40,  0, 0, 0, 0, 0, 0, 0, 0,
    -40, -40, -40, -40, -40, -40, -40, -40,  0, 0, 0, 0, 0, 0, 0, 0,
    -40, -40, -40, -40, -40, -40, -40, -40,  0, 0, 0, 0, 0, 0, 0, 0,
    -40, -40, -40, -40, -40, -40, -40, -40,  0, 0, 0, 0, 0, 0, 0, 0,
];

/// Endgame king table: centralize. Symmetric, so both sides index it
/// directly.
#[rustfmt::skip]
pub const KING_ENDGAME_TABLE: [i32; 128] = [
      0,  10,  20,  30,  30,  20,  10,   0,  0, 0, 0, 0, 0, 0, 0, 0,
     10,  20,  30,  40,  40,  30,  20,  10,  0, 0, 0, 0, 0, 0, 0, 0,
     20,  30,  40,  50,  50,  40,  30,  20,  0, 0, 0, 0, 0, 0, 0, 0,
     30,  40,  50,  60,  60,  50,  40,  30,  0, 0, 0, 0, 0, 0, 0, 0,
     30,  40,  50,  60,  60,  50,  40,  30,  0, 0, 0, 0, 0, 0, 0, 0,
     20,  30,  40,  50,  50,  40,  30,  20,  0, 0, 0, 0, 0, 0, 0, 0,
     10,  20,  30,  40,  40,  30,  20,  10,  0, 0, 0, 0, 0, 0, 0, 0,
      0,  10,  20,  30,  30,  20,  10,   0,  0, 0, 0, 0, 0, 0, 0, 0,
];
