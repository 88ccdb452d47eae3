//! Static evaluation: material plus piece-square bonuses, from the side to
//! move's perspective.

use riddari_core::board::{Board, PieceKind, Side, Wing};

use crate::{
    piece_tables::{KING_ENDGAME_TABLE, KING_TABLE, MINOR_PIECE_TABLE, PAWN_TABLE},
    score::Score,
};

/// A side whose material (king excluded) has dropped to this or below is
/// considered to be in the endgame; its king then wants the center rather
/// than a bolt-hole.
pub const ENDGAME_MATERIAL: i32 = 1200;

/// Penalty per flank on which castling was forfeited without ever castling.
const CASTLING_WASTED: i32 = 20;

/// Plain material worth. The king carries none; material balance is about
/// what can be traded.
pub const fn material(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 300,
        PieceKind::Bishop => 300,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 0,
    }
}

/// Evaluates the position statically and returns the score from the side to
/// move's perspective (positive means the side to move stands better).
pub fn evaluate(board: &Board) -> Score {
    // Material first; it also decides which game stage each side's king
    // table reflects. The stages are judged per side, so one king may be
    // centralizing while the other still hides.
    let mut scores = [0i32; 2];
    for piece in board.pieces().alive() {
        scores[piece.side.index()] += material(piece.kind);
    }
    let endgame = [
        scores[0] <= ENDGAME_MATERIAL,
        scores[1] <= ENDGAME_MATERIAL,
    ];

    for piece in board.pieces().alive() {
        let side = piece.side.index();
        // The pawn and middlegame king tables read from White's side of the
        // board; Black sees them through the rank mirror.
        let oriented = match piece.side {
            Side::White => piece.square,
            Side::Black => piece.square.rank_mirrored(),
        };

        scores[side] += match piece.kind {
            PieceKind::Pawn => PAWN_TABLE[oriented.index()],
            PieceKind::Knight | PieceKind::Bishop => MINOR_PIECE_TABLE[piece.square.index()],
            PieceKind::King => {
                if endgame[side] {
                    KING_ENDGAME_TABLE[piece.square.index()]
                } else {
                    KING_TABLE[oriented.index()]
                }
            }
            PieceKind::Rook | PieceKind::Queen => 0,
        };
    }

    // Losing a castling flank without having castled wasted a tempo and a
    // safe king plan; charge each wasted flank.
    for side in [Side::White, Side::Black] {
        if !board.has_castled(side) {
            for wing in Wing::ALL {
                if !board.castling().can_castle(side, wing) {
                    scores[side.index()] -= CASTLING_WASTED;
                }
            }
        }
    }

    let us = board.to_move().index();
    Score(scores[us] - scores[us ^ 1])
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use riddari_core::board::{parse_fen, Board};

    #[test]
    fn the_starting_position_is_balanced() {
        let board = Board::starting_position();
        assert_eq!(evaluate(&board), Score(0));

        // Symmetry: the same zero from Black's point of view.
        let black_to_move =
            parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1").unwrap();
        assert_eq!(evaluate(&black_to_move), Score(0));
    }

    #[test]
    fn material_is_counted_from_the_movers_perspective() {
        // White is a rook up; kings mirrored so the king tables cancel.
        let board = parse_fen("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        let white_view = evaluate(&board);

        let board = parse_fen("4k3/8/8/8/8/8/8/R3K3 b Q - 0 1").unwrap();
        let black_view = evaluate(&board);

        assert_eq!(white_view, -black_view);
        assert!(white_view > Score(400));
    }

    #[test]
    fn advanced_central_pawns_outscore_home_pawns() {
        // Identical material; White's d-pawn reached d5, Black's h-pawn sits
        // at home next to its neighbors' start squares.
        let advanced = parse_fen("4k3/8/8/3P4/8/8/8/4K3 w - - 0 1").unwrap();
        let home = parse_fen("4k3/8/8/8/8/8/7P/4K3 w - - 0 1").unwrap();

        assert!(evaluate(&advanced) > evaluate(&home));
    }

    #[test]
    fn knights_prefer_the_center() {
        let centered = parse_fen("4k3/8/8/8/3N4/8/8/4K3 w - - 0 1").unwrap();
        let cornered = parse_fen("4k3/8/8/8/8/8/8/N3K3 w - - 0 1").unwrap();

        assert_eq!(
            evaluate(&centered) - evaluate(&cornered),
            Score(10 - (-10))
        );
    }

    #[test]
    fn wasted_castling_flanks_are_charged() {
        // Both kings still at home with all rights: no penalty either way.
        let intact = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert_eq!(evaluate(&intact), Score(0));

        // White lost both rights without castling (king moved earlier),
        // Black keeps everything: two wasted flanks, 40 down.
        let wasted = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w kq - 0 1").unwrap();
        assert_eq!(evaluate(&wasted), Score(-40));
    }

    #[test]
    fn endgame_kings_want_the_center() {
        // Bare kings: both sides are in the endgame, and the centralized
        // king collects the table bonus.
        let centered = parse_fen("4k3/8/8/8/4K3/8/8/8 w - - 0 1").unwrap();
        let cornered = parse_fen("4k3/8/8/8/8/8/8/K7 w - - 0 1").unwrap();

        // e4 scores 60, a1 scores 0; e8 scores 30 for black in both.
        assert_eq!(evaluate(&centered) - evaluate(&cornered), Score(60));
    }

    #[test]
    fn middlegame_kings_prefer_the_castled_corners() {
        // Enough material around (queens and rooks) to stay out of the
        // endgame stage.
        let castled = parse_fen("1k1r3r/8/8/8/8/8/8/QR4K1 w - - 0 1").unwrap();
        let exposed = parse_fen("1k1r3r/8/8/8/8/8/6K1/QR6 w - - 0 1").unwrap();

        // g1 gives +40, g2 gives -20.
        assert_eq!(evaluate(&castled) - evaluate(&exposed), Score(60));
    }
}
