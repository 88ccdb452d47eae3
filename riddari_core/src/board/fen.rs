//! Parsing and generation of Forsyth-Edwards position descriptors.
//!
//! The emitted form is canonical: parsing a canonical descriptor and
//! re-emitting it reproduces the input byte for byte.

use thiserror::Error;

use super::{Board, Castling, Piece, PieceKind, Side, Square, Wing};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenParseError {
    #[error("expected 6 whitespace-separated fields, found {0}")]
    WrongFieldCount(usize),
    #[error("malformed piece placement field")]
    BadPlacement,
    #[error("side to move must be 'w' or 'b'")]
    BadSideToMove,
    #[error("malformed castling availability field")]
    BadCastling,
    #[error("malformed en-passant field")]
    BadEnPassant,
    #[error("malformed halfmove clock")]
    BadHalfmoveClock,
    #[error("malformed fullmove number")]
    BadFullmoveNumber,
    #[error("each side must have exactly one king")]
    BadKingCount,
    #[error("no pawn matches the en-passant square")]
    MissingEnPassantPawn,
    #[error("castling availability contradicts the piece placement")]
    CastlingMismatch,
    #[error("too many pieces for one side")]
    TooManyPieces,
    #[error("the position is unplayable")]
    UnplayablePosition,
}

/// Castling letters in their mandatory order, with the participant each one
/// stands for.
const CASTLING_LETTERS: [(char, Side, Wing); 4] = [
    ('K', Side::White, Wing::KingSide),
    ('Q', Side::White, Wing::QueenSide),
    ('k', Side::Black, Wing::KingSide),
    ('q', Side::Black, Wing::QueenSide),
];

type Placement = [[Option<(PieceKind, Side)>; 8]; 8];

fn parse_placement(field: &str) -> Result<Placement, FenParseError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenParseError::BadPlacement);
    }

    let mut placement: Placement = [[None; 8]; 8];
    for (i, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - i;
        let mut file = 0usize;

        for c in rank_str.chars() {
            if let Some(run) = c.to_digit(10) {
                if !(1..=8).contains(&run) {
                    return Err(FenParseError::BadPlacement);
                }
                file += run as usize;
            } else {
                let kind = PieceKind::from_fen_char(c).ok_or(FenParseError::BadPlacement)?;
                let side = if c.is_ascii_uppercase() {
                    Side::White
                } else {
                    Side::Black
                };
                if file >= 8 {
                    return Err(FenParseError::BadPlacement);
                }
                placement[rank][file] = Some((kind, side));
                file += 1;
            }
            if file > 8 {
                return Err(FenParseError::BadPlacement);
            }
        }

        if file != 8 {
            return Err(FenParseError::BadPlacement);
        }
    }

    Ok(placement)
}

/// Parses the castling field into per-side, per-wing availability. The
/// letters must appear in `KQkq` order and must not repeat.
fn parse_castling(field: &str) -> Result<[[bool; 2]; 2], FenParseError> {
    let mut rights = [[false; 2]; 2];
    if field == "-" {
        return Ok(rights);
    }
    if field.is_empty() {
        return Err(FenParseError::BadCastling);
    }

    let mut next_allowed = 0;
    for c in field.chars() {
        let position = CASTLING_LETTERS
            .iter()
            .position(|&(letter, _, _)| letter == c)
            .ok_or(FenParseError::BadCastling)?;
        if position < next_allowed {
            return Err(FenParseError::BadCastling);
        }
        let (_, side, wing) = CASTLING_LETTERS[position];
        rights[side.index()][wing.index()] = true;
        next_allowed = position + 1;
    }

    Ok(rights)
}

fn piece_on(placement: &Placement, square: Square) -> Option<(PieceKind, Side)> {
    placement[square.rank() as usize][square.file() as usize]
}

/// Parses a position descriptor into a [`Board`].
///
/// Beyond the syntax, the descriptor must describe a structurally sound
/// position: exactly one king per side, a pawn actually standing in front of
/// a declared en-passant square, and the king plus matching rook still on
/// their home squares for every declared castling availability.
pub fn parse_fen(fen: &str) -> Result<Board, FenParseError> {
    let fields: Vec<&str> = fen.split_ascii_whitespace().collect();
    if fields.len() != 6 {
        return Err(FenParseError::WrongFieldCount(fields.len()));
    }

    let placement = parse_placement(fields[0])?;

    let to_move = match fields[1] {
        "w" => Side::White,
        "b" => Side::Black,
        _ => return Err(FenParseError::BadSideToMove),
    };

    let rights = parse_castling(fields[2])?;

    let en_passant = if fields[3] == "-" {
        None
    } else {
        let behind: Square = fields[3].parse().map_err(|_| FenParseError::BadEnPassant)?;
        // The field names the square *behind* the double-stepped pawn, which
        // is always on rank 3 or rank 6; we store the pawn's own square.
        let pawn_square = match behind.rank() {
            2 => behind.offset(0x10),
            5 => behind.offset(-0x10),
            _ => return Err(FenParseError::BadEnPassant),
        }
        .ok_or(FenParseError::BadEnPassant)?;
        Some(pawn_square)
    };

    let halfmove_clock: u32 = fields[4]
        .parse()
        .map_err(|_| FenParseError::BadHalfmoveClock)?;
    let fullmoves: u32 = fields[5]
        .parse()
        .map_err(|_| FenParseError::BadFullmoveNumber)?;
    if fullmoves == 0 {
        return Err(FenParseError::BadFullmoveNumber);
    }

    let mut kings = [0u32; 2];
    for rank in &placement {
        for piece in rank.iter().flatten() {
            if piece.0 == PieceKind::King {
                kings[piece.1.index()] += 1;
            }
        }
    }
    if kings != [1, 1] {
        return Err(FenParseError::BadKingCount);
    }

    if let Some(pawn_square) = en_passant {
        let expected_side = if pawn_square.rank() == 3 {
            Side::White
        } else {
            Side::Black
        };
        if piece_on(&placement, pawn_square) != Some((PieceKind::Pawn, expected_side)) {
            return Err(FenParseError::MissingEnPassantPawn);
        }
        // The pawn supposedly just passed through the named square, so it
        // cannot be occupied; a capturer must be able to land there.
        let behind = Square::new_unchecked(
            if expected_side.is_white() { 2 } else { 5 },
            pawn_square.file(),
        );
        if piece_on(&placement, behind).is_some() {
            return Err(FenParseError::BadEnPassant);
        }
    }

    for side in [Side::White, Side::Black] {
        let king_home = match side {
            Side::White => Square::E1,
            Side::Black => Square::E8,
        };
        let claims_any = rights[side.index()].iter().any(|&r| r);
        if claims_any && piece_on(&placement, king_home) != Some((PieceKind::King, side)) {
            return Err(FenParseError::CastlingMismatch);
        }
        for wing in Wing::ALL {
            if rights[side.index()][wing.index()]
                && piece_on(&placement, wing.rook_home(side)) != Some((PieceKind::Rook, side))
            {
                return Err(FenParseError::CastlingMismatch);
            }
        }
    }

    let mut board = Board::empty();
    for side in [Side::White, Side::Black] {
        // The king goes first so it lands in its side's reserved slot.
        for square in Square::all() {
            if piece_on(&placement, square) == Some((PieceKind::King, side)) {
                board
                    .place_piece(Piece::new(PieceKind::King, side, square))
                    .ok_or(FenParseError::TooManyPieces)?;
            }
        }
        for square in Square::all() {
            match piece_on(&placement, square) {
                Some((kind, s)) if s == side && kind != PieceKind::King => {
                    board
                        .place_piece(Piece::new(kind, side, square))
                        .ok_or(FenParseError::TooManyPieces)?;
                }
                _ => {}
            }
        }
    }

    board.to_move = to_move;
    board.en_passant = en_passant;
    board.halfmove_clock = halfmove_clock;
    board.fullmoves = fullmoves;

    // The descriptor cannot tell whether the kings have moved; a missing
    // availability is recorded against the rook alone, which impairs the
    // wing just the same.
    for (_, side, wing) in CASTLING_LETTERS {
        if !rights[side.index()][wing.index()] {
            board.castling |= Castling::rook_moved(side, wing);
        }
    }

    Ok(board)
}

pub(super) fn board_to_fen(board: &Board) -> String {
    let mut out = String::new();

    for rank in (0..8).rev() {
        let mut empty_run = 0u8;
        for file in 0..8 {
            match board.piece_at(Square::new_unchecked(rank, file)) {
                None => empty_run += 1,
                Some(piece) => {
                    if empty_run > 0 {
                        out.push((b'0' + empty_run) as char);
                        empty_run = 0;
                    }
                    out.push(piece.as_fen_char());
                }
            }
        }
        if empty_run > 0 {
            out.push((b'0' + empty_run) as char);
        }
        if rank > 0 {
            out.push('/');
        }
    }

    out.push(' ');
    out.push(if board.to_move.is_white() { 'w' } else { 'b' });

    out.push(' ');
    let mut any_castling = false;
    for (letter, side, wing) in CASTLING_LETTERS {
        if board.castling.can_castle(side, wing) {
            out.push(letter);
            any_castling = true;
        }
    }
    if !any_castling {
        out.push('-');
    }

    out.push(' ');
    match board.en_passant {
        None => out.push('-'),
        Some(pawn_square) => {
            let delta: i8 = if pawn_square.rank() == 3 { -0x10 } else { 0x10 };
            let behind = pawn_square
                .offset(delta)
                .expect("en-passant pawn on an impossible rank");
            out.push_str(&behind.to_string());
        }
    }

    out.push(' ');
    out.push_str(&board.halfmove_clock.to_string());
    out.push(' ');
    out.push_str(&board.fullmoves.to_string());

    out
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assert_round_trips(fen: &str) {
        let board = parse_fen(fen).unwrap_or_else(|e| panic!("{fen:?} failed to parse: {e}"));
        assert_eq!(board.fen(), fen);
    }

    #[test]
    fn canonical_descriptors_round_trip() {
        assert_round_trips("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_round_trips("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
        assert_round_trips("rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2");
        assert_round_trips("rnbqkbnr/pp1ppppp/8/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2");
        assert_round_trips("rnbqkbnr/pp1ppppp/8/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R b k - 1 2");
        assert_round_trips("rnbqkbnr/pp1ppppp/8/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R b q - 1 2");
        assert_round_trips("4k3/8/8/8/8/8/4P3/4K3 w - - 5 39");
        assert_round_trips("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    }

    #[test]
    fn parsed_fields_land_in_the_board() {
        let board =
            parse_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();

        assert_eq!(board.to_move(), Side::Black);
        // The en-passant target is the pawn's square, not the square behind.
        assert_eq!(board.en_passant(), Some(Square::E4));
        assert_eq!(board.halfmove_clock(), 0);
        assert_eq!(board.fullmoves(), 1);
        assert_eq!(board.piece_at(Square::E4).unwrap().kind, PieceKind::Pawn);
    }

    #[test]
    fn missing_rights_impair_the_rooks() {
        let board =
            parse_fen("rnbqkbnr/pp1ppppp/8/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R b q - 1 2").unwrap();

        assert!(!board.castling().can_castle(Side::White, Wing::KingSide));
        assert!(!board.castling().can_castle(Side::White, Wing::QueenSide));
        assert!(!board.castling().can_castle(Side::Black, Wing::KingSide));
        assert!(board.castling().can_castle(Side::Black, Wing::QueenSide));
    }

    #[test]
    fn field_count_is_checked() {
        assert_eq!(parse_fen(""), Err(FenParseError::WrongFieldCount(0)));
        assert_eq!(
            parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"),
            Err(FenParseError::WrongFieldCount(5))
        );
    }

    #[test]
    fn bad_placements_are_rejected() {
        // Some ranks are missing.
        assert_eq!(parse_fen("4k3/8 w - - 5 39"), Err(FenParseError::BadPlacement));
        // Invalid empty-run digit.
        assert_eq!(
            parse_fen("4k3/8/8/9/8/8/4P3/4K3 w - - 5 39"),
            Err(FenParseError::BadPlacement)
        );
        // 4 + 1 + 4 squares overruns the rank.
        assert_eq!(
            parse_fen("4k4/8/8/8/8/8/4P3/4K3 w - - 5 39"),
            Err(FenParseError::BadPlacement)
        );
        // Unknown piece letter.
        assert_eq!(
            parse_fen("4x3/8/8/8/8/8/4P3/4K3 w - - 5 39"),
            Err(FenParseError::BadPlacement)
        );
    }

    #[test]
    fn bad_side_to_move_is_rejected() {
        assert_eq!(
            parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR a KQkq - 0 1"),
            Err(FenParseError::BadSideToMove)
        );
    }

    #[test]
    fn castling_letters_must_be_ordered_and_unique() {
        assert_eq!(
            parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w kqKQ - 0 1"),
            Err(FenParseError::BadCastling)
        );
        assert_eq!(
            parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w QKkq - 0 1"),
            Err(FenParseError::BadCastling)
        );
        assert_eq!(
            parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KKkq - 0 1"),
            Err(FenParseError::BadCastling)
        );
        assert_eq!(
            parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w qq - 0 1"),
            Err(FenParseError::BadCastling)
        );
    }

    #[test]
    fn claimed_rights_must_match_the_placement() {
        // No rook on h1.
        assert_eq!(
            parse_fen("4k3/8/8/8/8/8/8/4K3 w K - 0 1"),
            Err(FenParseError::CastlingMismatch)
        );
        // King not on its home square.
        assert_eq!(
            parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQ1KNR w K - 0 1"),
            Err(FenParseError::CastlingMismatch)
        );
    }

    #[test]
    fn en_passant_square_must_be_on_rank_3_or_6() {
        assert_eq!(
            parse_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e4 0 1"),
            Err(FenParseError::BadEnPassant)
        );
        assert_eq!(
            parse_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq x3 0 1"),
            Err(FenParseError::BadEnPassant)
        );
    }

    #[test]
    fn en_passant_square_needs_its_pawn() {
        assert_eq!(
            parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq e3 0 1"),
            Err(FenParseError::MissingEnPassantPawn)
        );
        // A white piece that is not a pawn does not count.
        assert_eq!(
            parse_fen("rnbqkbnr/pppppppp/8/8/4N3/8/PPPPPPPP/RNBQKB1R b KQk e3 0 1"),
            Err(FenParseError::MissingEnPassantPawn)
        );
    }

    #[test]
    fn en_passant_transit_square_must_be_empty() {
        // A knight sits on e3, where an en-passant capturer would land;
        // the pawn cannot just have passed through it.
        assert_eq!(
            parse_fen("rnbqkb1r/pppppppp/8/8/4P3/4n3/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"),
            Err(FenParseError::BadEnPassant)
        );
    }

    #[test]
    fn numeric_fields_are_validated() {
        assert_eq!(
            parse_fen("4k3/8/8/8/8/8/4P3/4K3 w - - x 39"),
            Err(FenParseError::BadHalfmoveClock)
        );
        assert_eq!(
            parse_fen("4k3/8/8/8/8/8/4P3/4K3 w - - -1 39"),
            Err(FenParseError::BadHalfmoveClock)
        );
        assert_eq!(
            parse_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 0"),
            Err(FenParseError::BadFullmoveNumber)
        );
    }

    #[test]
    fn king_counts_are_enforced() {
        assert_eq!(
            parse_fen("8/8/4k3/8/8/8/8/8 w - - 0 1"),
            Err(FenParseError::BadKingCount)
        );
        assert_eq!(
            parse_fen("KK6/8/4k3/8/8/8/8/8 w - - 0 1"),
            Err(FenParseError::BadKingCount)
        );
    }
}
