//! Pseudo-legal move generation.
//!
//! "Pseudo-legal" honors geometry, destination occupancy and path blocking,
//! but not king safety; moves that leave the mover's king attacked are
//! weeded out when they are applied (see [`crate::rules`]).

pub mod deltas;

use std::ops::Range;

use arrayvec::ArrayVec;

use crate::board::{self, Board, Move, PieceKind, Side, Square, Wing};

/// Upper bound on the number of pseudo-legal moves any reachable position
/// can produce, used to size one ply's slice of the move stack and the
/// fixed scratch buffers.
pub const PLY_CAPACITY: usize = 323;

/// A fixed-capacity buffer of generated moves.
pub type MoveBuf = ArrayVec<Move, PLY_CAPACITY>;

/// Invokes `emit` with every pseudo-legal move for the side to move,
/// together with whether the move captures. Capture status matters to the
/// caller because captures are tried first during search.
pub(crate) fn for_each_pseudo_legal(board: &Board, mut emit: impl FnMut(Move, bool)) {
    let us = board.to_move();

    for id in board.pieces().side_ids(us) {
        let piece = *board.pieces().get(id);
        if piece.captured {
            continue;
        }

        match piece.kind {
            PieceKind::Pawn => gen_pawn_moves(board, piece.square, us, &mut emit),
            PieceKind::Knight | PieceKind::King => {
                for &delta in deltas::step_deltas(piece.kind) {
                    if let Some(to) = piece.square.offset(delta) {
                        match board.piece_at(to) {
                            Some(other) if other.side == us => {}
                            Some(_) => emit(Move::new(piece.square, to), true),
                            None => emit(Move::new(piece.square, to), false),
                        }
                    }
                }
            }
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                for &delta in deltas::slide_deltas(piece.kind) {
                    let mut square = piece.square;
                    while let Some(to) = square.offset(delta) {
                        match board.piece_at(to) {
                            Some(other) => {
                                if other.side != us {
                                    emit(Move::new(piece.square, to), true);
                                }
                                break;
                            }
                            None => {
                                emit(Move::new(piece.square, to), false);
                                square = to;
                            }
                        }
                    }
                }
            }
        }
    }

    gen_castling(board, us, &mut emit);
    gen_en_passant(board, us, &mut emit);
}

/// Emits a pawn arrival, fanning out into the four promotion moves when the
/// destination is the back rank.
fn emit_pawn_arrival(
    from: Square,
    to: Square,
    is_capture: bool,
    us: Side,
    emit: &mut impl FnMut(Move, bool),
) {
    let back_rank = if us.is_white() { 7 } else { 0 };
    if to.rank() == back_rank {
        for kind in PieceKind::PROMOTIONS {
            emit(Move::new_promotion(from, to, kind), is_capture);
        }
    } else {
        emit(Move::new(from, to), is_capture);
    }
}

fn gen_pawn_moves(board: &Board, from: Square, us: Side, emit: &mut impl FnMut(Move, bool)) {
    let forward: i8 = if us.is_white() { 0x10 } else { -0x10 };
    let start_rank = if us.is_white() { 1 } else { 6 };

    if let Some(to) = from.offset(forward) {
        if board.piece_at(to).is_none() {
            emit_pawn_arrival(from, to, false, us, emit);

            // The double step needs both squares free.
            if from.rank() == start_rank {
                if let Some(two) = to.offset(forward) {
                    if board.piece_at(two).is_none() {
                        emit(Move::new(from, two), false);
                    }
                }
            }
        }
    }

    for capture_delta in [forward - 1, forward + 1] {
        if let Some(to) = from.offset(capture_delta) {
            if let Some(other) = board.piece_at(to) {
                if other.side != us {
                    emit_pawn_arrival(from, to, true, us, emit);
                }
            }
        }
    }
}

fn gen_castling(board: &Board, us: Side, emit: &mut impl FnMut(Move, bool)) {
    let (king_home, king_to, transit): (Square, [Square; 2], [&[Square]; 2]) = match us {
        Side::White => (
            Square::E1,
            [Square::G1, Square::C1],
            [&[Square::F1, Square::G1], &[Square::D1, Square::C1, Square::B1]],
        ),
        Side::Black => (
            Square::E8,
            [Square::G8, Square::C8],
            [&[Square::F8, Square::G8], &[Square::D8, Square::C8, Square::B8]],
        ),
    };

    for wing in Wing::ALL {
        if !board.castling().can_castle(us, wing) {
            continue;
        }
        let rook_ok = board
            .piece_at(wing.rook_home(us))
            .is_some_and(|rook| rook.kind == PieceKind::Rook && rook.side == us);
        if !rook_ok {
            continue;
        }
        if transit[wing.index()]
            .iter()
            .any(|&square| board.piece_at(square).is_some())
        {
            continue;
        }

        // Check legality (king not in or passing through check) is deferred
        // to the validator, like for every other move.
        emit(Move::new(king_home, king_to[wing.index()]), false);
    }
}

fn gen_en_passant(board: &Board, us: Side, emit: &mut impl FnMut(Move, bool)) {
    let Some(pawn_square) = board.en_passant() else {
        return;
    };
    let parts = board::en_passant_parts(pawn_square);

    for neighbor in [parts.left, parts.right].into_iter().flatten() {
        let can_capture = board
            .piece_at(neighbor)
            .is_some_and(|piece| piece.kind == PieceKind::Pawn && piece.side == us);
        if can_capture {
            emit(Move::new(neighbor, parts.destination), true);
        }
    }
}

/// Collects every pseudo-legal move for the side to move into a fixed
/// buffer, in plain generation order.
pub fn pseudo_legal_moves(board: &Board) -> MoveBuf {
    let mut moves = MoveBuf::new();
    for_each_pseudo_legal(board, |mv, _| moves.push(mv));
    moves
}

/// Whether the generator would produce exactly this move in the current
/// position. Used to screen externally entered moves before applying them.
pub fn is_pseudo_legal(board: &Board, mv: Move) -> bool {
    let mut found = false;
    for_each_pseudo_legal(board, |candidate, _| found |= candidate == mv);
    found
}

/// The two runs of moves generated for one ply, as index ranges into the
/// owning [`MoveStack`]. Iterating [`PlyMoves::indices`] yields all captures
/// before any non-capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlyMoves {
    pub captures: Range<usize>,
    pub non_captures: Range<usize>,
}

impl PlyMoves {
    pub fn indices(&self) -> impl Iterator<Item = usize> {
        self.captures.clone().chain(self.non_captures.clone())
    }

    pub fn len(&self) -> usize {
        self.captures.len() + self.non_captures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Flat arena of generated moves, one fixed-size slice per search ply.
///
/// Within a ply's slice, capturing moves fill upward from the low end and
/// non-captures downward from the high end. The two runs stay contiguous
/// and disjoint, so traversing captures first costs nothing extra -- a
/// cheap move-ordering gain for alpha-beta.
#[derive(Debug, Default)]
pub struct MoveStack {
    moves: Vec<Move>,
}

impl MoveStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of whole plies the arena currently has room for.
    pub fn ply_capacity(&self) -> usize {
        self.moves.len() / PLY_CAPACITY
    }

    /// Sizes the arena for a search of the given depth. Only for use between
    /// searches: a search in flight may grow the arena (see
    /// [`Self::generate`]) but must never see it shrink, because shallower
    /// plies still hold live ranges.
    pub fn resize_for_depth(&mut self, plies: usize) {
        self.moves.resize(plies.max(1) * PLY_CAPACITY, Move::default());
    }

    /// The move at an index previously handed out inside a [`PlyMoves`].
    pub fn get(&self, index: usize) -> Move {
        self.moves[index]
    }

    /// Generates all pseudo-legal moves for the side to move into the slice
    /// belonging to `ply` and returns the capture/non-capture ranges.
    pub fn generate(&mut self, board: &Board, ply: usize) -> PlyMoves {
        let base = ply * PLY_CAPACITY;
        if self.moves.len() < base + PLY_CAPACITY {
            self.moves.resize(base + PLY_CAPACITY, Move::default());
        }

        let slice = &mut self.moves[base..base + PLY_CAPACITY];
        let mut low = 0;
        let mut high = slice.len();
        for_each_pseudo_legal(board, |mv, is_capture| {
            debug_assert!(low < high, "per-ply move capacity exceeded");
            if is_capture {
                slice[low] = mv;
                low += 1;
            } else {
                high -= 1;
                slice[high] = mv;
            }
        });

        PlyMoves {
            captures: base..base + low,
            non_captures: base + high..base + PLY_CAPACITY,
        }
    }
}
