//! Full legality checking and game-over classification.
//!
//! The move generator only promises geometry (see
//! [`crate::move_gen`]); everything touching king safety lives here and runs
//! after a move has tentatively been applied.

use crate::board::{Board, CastleParts, GameResult, Move, PieceKind, Side, Square, Wing};
use crate::move_gen::{self, deltas};

/// Whether any living piece of `by` attacks `target`, honoring geometry,
/// path blocking and pawn capture direction.
pub fn is_square_attacked(board: &Board, target: Square, by: Side) -> bool {
    for id in board.pieces().side_ids(by) {
        let piece = board.pieces().get(id);
        if piece.captured || piece.square == target {
            continue;
        }

        let delta = target.raw() as i16 - piece.square.raw() as i16;
        let attacks = match piece.kind {
            PieceKind::Pawn => {
                let (left, right) = match piece.side {
                    Side::White => (0x0F, 0x11),
                    Side::Black => (-0x11, -0x0F),
                };
                delta == left || delta == right
            }
            PieceKind::Knight | PieceKind::King => deltas::reaches(piece.kind, delta),
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                deltas::reaches(piece.kind, delta) && path_is_clear(board, piece.square, target)
            }
        };

        if attacks {
            return true;
        }
    }

    false
}

/// Whether the squares strictly between two ray-connected squares are all
/// empty.
fn path_is_clear(board: &Board, from: Square, to: Square) -> bool {
    let delta = to.raw() as i16 - from.raw() as i16;
    let step = deltas::unit_step(delta);
    if step as i16 == delta {
        // Adjacent squares have nothing in between.
        return true;
    }

    let mut square = from.offset(step);
    while let Some(current) = square {
        if current == to {
            return true;
        }
        if board.piece_at(current).is_some() {
            return false;
        }
        square = current.offset(step);
    }

    true
}

/// Whether the given side's king is currently attacked.
pub fn is_king_in_check(board: &Board, side: Side) -> bool {
    is_square_attacked(board, board.pieces().king(side).square, side.flip())
}

/// Judges the move that was just applied (the side to move has already been
/// switched). The mover's king must be safe; a castle additionally requires
/// that neither the king's origin nor its transit square was attacked, that
/// the wing's flags were still clear before the move, and for the queenside
/// that the rook's b-file neighbor square is empty.
///
/// The caller still holds the pre-move castling flags in the board at this
/// point; they are updated only after this check passes.
pub(crate) fn last_move_was_legal(board: &Board, mv: Move, castle: Option<CastleParts>) -> bool {
    let mover = board.to_move().flip();
    if is_king_in_check(board, mover) {
        return false;
    }

    if let Some(castle) = castle {
        if !board.castling().can_castle(mover, castle.wing) {
            return false;
        }
        // Castling out of check. The destination square is covered by the
        // king-safety test above, and the transit square equals the rook's
        // destination.
        if is_square_attacked(board, mv.from, board.to_move()) {
            return false;
        }
        if is_square_attacked(board, castle.rook_to, board.to_move()) {
            return false;
        }
        if castle.wing == Wing::QueenSide {
            let b_file = Square::new_unchecked(mv.from.rank(), 1);
            if board.piece_at(b_file).is_some() {
                return false;
            }
        }
    }

    true
}

/// Whether `side` has at least one legal move available.
///
/// Probes by generating into a scratch buffer and applying each candidate
/// until one sticks. The shared move stack of a search in progress is never
/// touched, so this is safe to call from inside the search.
pub fn can_make_any_move(board: &mut Board, side: Side) -> bool {
    let original = board.to_move();
    board.set_side_to_move(side);

    let moves = move_gen::pseudo_legal_moves(board);
    let mut found = false;
    for mv in moves {
        if board.make_move(mv) {
            board.unmake_move();
            found = true;
            break;
        }
    }

    board.set_side_to_move(original);
    found
}

/// Draw by insufficient material. True iff neither side has any pawn, rook
/// or queen, and one of:
///
/// 1. neither side has knights or bishops;
/// 2. one side has a bare king and the other exactly one knight or one
///    bishop;
/// 3. neither side has knights, both sides have bishops, each side's
///    bishops stand on a single color class and both sides share that
///    class.
pub fn insufficient_material(board: &Board) -> bool {
    let mut knights = [0u32; 2];
    let mut light_bishops = [0u32; 2];
    let mut dark_bishops = [0u32; 2];

    for piece in board.pieces().alive() {
        let side = piece.side.index();
        match piece.kind {
            PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
            PieceKind::Knight => knights[side] += 1,
            PieceKind::Bishop => {
                if piece.square.is_light() {
                    light_bishops[side] += 1;
                } else {
                    dark_bishops[side] += 1;
                }
            }
            PieceKind::King => {}
        }
    }

    let minors = |side: usize| knights[side] + light_bishops[side] + dark_bishops[side];

    if minors(0) == 0 && minors(1) == 0 {
        return true;
    }

    for side in 0..2 {
        if minors(side) == 1 && minors(side ^ 1) == 0 {
            return true;
        }
    }

    if knights == [0, 0] {
        let single_class_each =
            (0..2).all(|side| (light_bishops[side] > 0) != (dark_bishops[side] > 0));
        if single_class_each && (light_bishops[0] > 0) == (light_bishops[1] > 0) {
            return true;
        }
    }

    false
}

/// Classifies the current position: an insufficient-material draw, a mate or
/// stalemate against the side to move, or still in play (`None`).
pub(crate) fn compute_result(board: &mut Board) -> Option<GameResult> {
    if insufficient_material(board) {
        return Some(GameResult::DrawByInsufficientMaterial);
    }
    if can_make_any_move(board, board.to_move()) {
        return None;
    }

    Some(if is_king_in_check(board, board.to_move()) {
        match board.to_move() {
            Side::White => GameResult::CheckmateByBlack,
            Side::Black => GameResult::CheckmateByWhite,
        }
    } else {
        GameResult::DrawByStalemate
    })
}

/// A loaded position is rejected when both sides are simultaneously
/// checkmated or simultaneously stalemated. No sequence of legal moves
/// produces either, and the rules cannot say whose result it would be.
pub(crate) fn setup_is_playable(board: &mut Board) -> bool {
    let white_stuck = !can_make_any_move(board, Side::White);
    let black_stuck = !can_make_any_move(board, Side::Black);
    if !(white_stuck && black_stuck) {
        return true;
    }

    is_king_in_check(board, Side::White) != is_king_in_check(board, Side::Black)
}
