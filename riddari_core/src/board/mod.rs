//! Board state: square grid, piece list, make/unmake and game results.

mod castling;
mod fen;
mod moves;
mod piece;
mod square;

pub use castling::{Castling, Wing};
pub use fen::{parse_fen, FenParseError};
pub use moves::{Move, ParseMoveError};
pub use piece::{Piece, PieceId, PieceKind, PieceList, Side};
pub use square::{ParseSquareError, Square, OFF_BOARD};

use crate::rules;

pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Matches the original allocation of the undo stack; it doubles from here
/// whenever a game outgrows it.
const HISTORY_INITIAL_CAPACITY: usize = 200;

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameResult {
    DrawByStalemate,
    DrawByInsufficientMaterial,
    CheckmateByWhite,
    CheckmateByBlack,
    ResignationByWhite,
    ResignationByBlack,
}

/// Holds everything needed to reverse one applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct UnmakeData {
    mv: Move,
    captured: Option<PieceId>,
    castling: Castling,
    en_passant: Option<Square>,
    halfmove_clock: u32,
}

/// The rook leg of a castling move, derived from the king's from/to squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CastleParts {
    pub wing: Wing,
    pub rook_from: Square,
    pub rook_to: Square,
}

/// Recognizes a castling move from the moving piece's kind and the king's
/// two-square hop, yielding the matching rook relocation.
pub(crate) fn castle_parts(kind: PieceKind, from: Square, to: Square) -> Option<CastleParts> {
    if kind != PieceKind::King {
        return None;
    }

    let (wing, rook_from, rook_to) = match (from, to) {
        (Square::E1, Square::G1) => (Wing::KingSide, Square::H1, Square::F1),
        (Square::E1, Square::C1) => (Wing::QueenSide, Square::A1, Square::D1),
        (Square::E8, Square::G8) => (Wing::KingSide, Square::H8, Square::F8),
        (Square::E8, Square::C8) => (Wing::QueenSide, Square::A8, Square::D8),
        _ => return None,
    };

    Some(CastleParts {
        wing,
        rook_from,
        rook_to,
    })
}

/// The squares involved in capturing a double-stepped pawn en passant: where
/// the capturer lands, and the two files from which it may come.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EnPassantParts {
    pub destination: Square,
    pub left: Option<Square>,
    pub right: Option<Square>,
}

pub(crate) fn en_passant_parts(pawn_square: Square) -> EnPassantParts {
    // A double-stepped pawn stands on rank 4 (white) or rank 5 (black); the
    // capturer always lands on the square directly behind it.
    let behind: i8 = if pawn_square.rank() == 4 { 0x10 } else { -0x10 };
    let destination = pawn_square
        .offset(behind)
        .expect("en-passant pawn on an impossible rank");

    EnPassantParts {
        destination,
        left: pawn_square.offset(-0x01),
        right: pawn_square.offset(0x01),
    }
}

/// If `mv` is an en-passant capture given the current target, returns the
/// square of the pawn being captured (which is *not* the move destination).
fn en_passant_victim(en_passant: Option<Square>, kind: PieceKind, mv: Move) -> Option<Square> {
    let target = en_passant?;
    if kind != PieceKind::Pawn {
        return None;
    }

    let parts = en_passant_parts(target);
    if (Some(mv.from) == parts.left || Some(mv.from) == parts.right)
        && mv.to == parts.destination
    {
        Some(target)
    } else {
        None
    }
}

/// The complete game state.
///
/// The 128-slot grid holds, for each 0x88 square, a reference into the piece
/// list; a living piece is referenced by exactly the slot of its current
/// square and a captured piece by none. The undo stack grows with
/// [`Board::make_move`] and shrinks with [`Board::unmake_move`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: [Option<PieceId>; 128],
    pieces: PieceList,
    to_move: Side,
    castling: Castling,
    en_passant: Option<Square>,
    has_castled: [bool; 2],
    halfmove_clock: u32,
    fullmoves: u32,
    history: Vec<UnmakeData>,
    result: Option<GameResult>,
}

impl Default for Board {
    fn default() -> Self {
        Self::starting_position()
    }
}

impl Board {
    /// Returns a [`Board`] holding the starting position of a standard chess
    /// game.
    pub fn starting_position() -> Self {
        parse_fen(STARTING_POSITION_FEN).expect("the starting position must parse")
    }

    /// An entirely empty board, used by the FEN parser as a base to place
    /// pieces on.
    pub(crate) fn empty() -> Self {
        Self {
            grid: [None; 128],
            pieces: PieceList::default(),
            to_move: Side::White,
            castling: Castling::empty(),
            en_passant: None,
            has_castled: [false; 2],
            halfmove_clock: 0,
            fullmoves: 1,
            history: Vec::with_capacity(HISTORY_INITIAL_CAPACITY),
            result: None,
        }
    }

    pub(crate) fn place_piece(&mut self, piece: Piece) -> Option<PieceId> {
        debug_assert!(self.grid[piece.square.index()].is_none());
        let id = self.pieces.add(piece)?;
        self.grid[piece.square.index()] = Some(id);
        Some(id)
    }

    /// The side whose turn it is.
    pub fn to_move(&self) -> Side {
        self.to_move
    }

    /// The castling impairment flags; see [`Castling`].
    pub fn castling(&self) -> Castling {
        self.castling
    }

    /// The square of the pawn that just made a double step, if any. Note this
    /// is the pawn's own square, not the square a capturer would land on.
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Whether the given side has actually castled in this game.
    pub fn has_castled(&self, side: Side) -> bool {
        self.has_castled[side.index()]
    }

    /// Plies since the last capture or pawn move.
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Full move counter, starting at 1 and incremented after each black
    /// move.
    pub fn fullmoves(&self) -> u32 {
        self.fullmoves
    }

    /// Number of moves currently on the undo stack.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// The piece standing on `square`, if any.
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.grid[square.index()].map(|id| self.pieces.get(id))
    }

    /// The piece records of both sides.
    pub fn pieces(&self) -> &PieceList {
        &self.pieces
    }

    pub(crate) fn set_side_to_move(&mut self, side: Side) {
        self.to_move = side;
    }

    /// Applies a move that is geometrically sound (one the generator would
    /// produce), then verifies king safety and the castling path conditions.
    /// If the move turns out to be illegal the board is restored exactly and
    /// `false` is returned.
    ///
    /// A pawn arriving on the back rank must carry a promotion kind, and no
    /// other move may carry one.
    pub fn make_move(&mut self, mv: Move) -> bool {
        let Some(piece_id) = self.grid[mv.from.index()] else {
            return false;
        };
        let piece = *self.pieces.get(piece_id);
        if piece.side != self.to_move {
            return false;
        }
        if let Some(id) = self.grid[mv.to.index()] {
            if self.pieces.get(id).side == piece.side {
                return false;
            }
        }

        let back_rank = match piece.side {
            Side::White => 7,
            Side::Black => 0,
        };
        let promotes = piece.kind == PieceKind::Pawn && mv.to.rank() == back_rank;
        if promotes != mv.promotion.is_some() {
            return false;
        }

        let victim_square = en_passant_victim(self.en_passant, piece.kind, mv).unwrap_or(mv.to);
        let captured = self.grid[victim_square.index()];

        let castle = castle_parts(piece.kind, mv.from, mv.to);
        if let Some(castle) = castle {
            // A hand-entered castle may be junk; refuse it before touching
            // anything. Generated castles always satisfy these.
            if captured.is_some()
                || self.grid[castle.rook_to.index()].is_some()
                || !self
                    .piece_at(castle.rook_from)
                    .is_some_and(|rook| rook.kind == PieceKind::Rook && rook.side == piece.side)
            {
                return false;
            }
        }

        self.history.push(UnmakeData {
            mv,
            captured,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
        });

        if let Some(captured) = captured {
            self.pieces.get_mut(captured).captured = true;
            self.grid[victim_square.index()] = None;
        }
        self.grid[mv.from.index()] = None;
        self.grid[mv.to.index()] = Some(piece_id);
        self.pieces.get_mut(piece_id).square = mv.to;

        if let Some(castle) = castle {
            let rook_id = self.grid[castle.rook_from.index()]
                .take()
                .expect("castling rook vanished");
            self.grid[castle.rook_to.index()] = Some(rook_id);
            self.pieces.get_mut(rook_id).square = castle.rook_to;
            self.has_castled[piece.side.index()] = true;
        }

        if let Some(promotion) = mv.promotion {
            self.pieces.get_mut(piece_id).kind = promotion;
        }

        if captured.is_some() || piece.kind == PieceKind::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if piece.side == Side::Black {
            self.fullmoves += 1;
        }
        self.to_move = self.to_move.flip();

        if !rules::last_move_was_legal(self, mv, castle) {
            self.unmake_move();
            return false;
        }

        // Only now update the castling flags; the validator above needed the
        // pre-move flags to judge a castle.
        match piece.kind {
            PieceKind::King => self.castling |= Castling::king_moved(piece.side),
            PieceKind::Rook => {
                for wing in Wing::ALL {
                    if mv.from == wing.rook_home(piece.side) {
                        self.castling |= Castling::rook_moved(piece.side, wing);
                    }
                }
            }
            _ => {}
        }
        // Capturing an enemy rook on its home corner forfeits that rook's
        // castling as well; without this, a rook promoted later and walked
        // back to the corner would smuggle the right back.
        if let Some(captured) = captured {
            let victim = *self.pieces.get(captured);
            if victim.kind == PieceKind::Rook {
                for wing in Wing::ALL {
                    if victim_square == wing.rook_home(victim.side) {
                        self.castling |= Castling::rook_moved(victim.side, wing);
                    }
                }
            }
        }

        let double_step = piece.kind == PieceKind::Pawn
            && (mv.to.raw() as i16 - mv.from.raw() as i16).abs() == 0x20;
        self.en_passant = double_step.then_some(mv.to);

        true
    }

    /// Reverses the most recently applied move exactly, restoring castling
    /// flags and the en-passant target from the undo record rather than
    /// re-deriving them. Returns `false` when there is nothing to undo.
    pub fn unmake_move(&mut self) -> bool {
        let Some(data) = self.history.pop() else {
            return false;
        };
        // If a move can be taken back, the game is not over.
        self.result = None;

        let mv = data.mv;
        let piece_id = self.grid[mv.to.index()]
            .take()
            .expect("no piece on the destination of the move being unmade");

        {
            let piece = self.pieces.get_mut(piece_id);
            piece.square = mv.from;
            if mv.promotion.is_some() {
                piece.kind = PieceKind::Pawn;
            }
        }
        let piece = *self.pieces.get(piece_id);

        let victim_square = en_passant_victim(data.en_passant, piece.kind, mv).unwrap_or(mv.to);
        self.grid[mv.from.index()] = Some(piece_id);
        self.grid[victim_square.index()] = data.captured;
        if let Some(captured) = data.captured {
            self.pieces.get_mut(captured).captured = false;
            debug_assert_eq!(self.pieces.get(captured).square, victim_square);
        }

        if let Some(castle) = castle_parts(piece.kind, mv.from, mv.to) {
            let rook_id = self.grid[castle.rook_to.index()]
                .take()
                .expect("castling rook vanished while unmaking");
            self.grid[castle.rook_from.index()] = Some(rook_id);
            self.pieces.get_mut(rook_id).square = castle.rook_from;
            self.has_castled[piece.side.index()] = false;
        }

        self.castling = data.castling;
        self.en_passant = data.en_passant;
        self.halfmove_clock = data.halfmove_clock;
        if piece.side == Side::Black {
            self.fullmoves -= 1;
        }
        self.to_move = self.to_move.flip();

        true
    }

    /// Applies a move entered from the outside. On top of
    /// [`Self::make_move`] this insists the move matches one the generator
    /// would produce for the current position, so a geometrically impossible
    /// move is reported as illegal instead of smuggled onto the board.
    ///
    /// A successful move refreshes the cached game result, and no further
    /// moves are accepted once a result is recorded.
    pub fn make_user_move(&mut self, mv: Move) -> bool {
        if self.result.is_some() {
            return false;
        }
        if !crate::move_gen::is_pseudo_legal(self, mv) {
            return false;
        }
        if !self.make_move(mv) {
            return false;
        }
        self.result = rules::compute_result(self);
        true
    }

    /// The result of the game in the current position, if it has ended.
    ///
    /// An externally recorded result (a resignation, or one detected on the
    /// public move path) takes priority over re-deriving the position state.
    pub fn game_result(&mut self) -> Option<GameResult> {
        if self.result.is_some() {
            return self.result;
        }
        rules::compute_result(self)
    }

    /// Records a resignation by the side to move.
    pub fn resign(&mut self) {
        self.result = Some(match self.to_move {
            Side::White => GameResult::ResignationByWhite,
            Side::Black => GameResult::ResignationByBlack,
        });
    }

    /// Rejects loaded positions where both sides are simultaneously
    /// checkmated or simultaneously stalemated; such positions cannot arise
    /// from play and mean nothing to the rules.
    pub fn setup_is_playable(&mut self) -> bool {
        rules::setup_is_playable(self)
    }

    /// The canonical descriptor of the current position.
    pub fn fen(&self) -> String {
        fen::board_to_fen(self)
    }

    /// Renders the board as eight lines of text, pieces as FEN letters and
    /// empty squares as dots, files running a to h from the left. The side to
    /// move sits at the bottom, so its opponent's back rank forms the top
    /// row.
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity(8 * 16);

        let mut render_rank = |out: &mut String, rank: u8| {
            for file in 0..8 {
                let square = Square::new_unchecked(rank, file);
                if file > 0 {
                    out.push(' ');
                }
                out.push(self.piece_at(square).map_or('.', |piece| piece.as_fen_char()));
            }
            out.push('\n');
        };

        match self.to_move {
            Side::White => (0..8).rev().for_each(|rank| render_rank(&mut out, rank)),
            Side::Black => (0..8).for_each(|rank| render_rank(&mut out, rank)),
        }

        out
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn board_from(fen: &str) -> Board {
        parse_fen(fen).unwrap()
    }

    fn mv(s: &str) -> Move {
        s.parse().unwrap()
    }

    #[test]
    fn starting_position_state() {
        let board = Board::starting_position();

        assert_eq!(board.to_move(), Side::White);
        assert_eq!(board.castling(), Castling::empty());
        assert_eq!(board.en_passant(), None);
        assert_eq!(board.halfmove_clock(), 0);
        assert_eq!(board.fullmoves(), 1);
        assert_eq!(board.history_len(), 0);
        assert_eq!(board.piece_at(Square::E1).unwrap().kind, PieceKind::King);
        assert_eq!(board.piece_at(Square::D8).unwrap().kind, PieceKind::Queen);
        assert_eq!(board.piece_at(Square::E4), None);
        assert_eq!(board.pieces().alive().count(), 32);
    }

    #[test]
    fn make_then_unmake_restores_the_board_exactly() {
        let cases = [
            // quiet move
            (STARTING_POSITION_FEN, vec!["g1f3"]),
            // capture
            (
                "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3",
                vec!["e4d5"],
            ),
            // castling both wings
            (
                "r3k2r/pppqpppp/2npbn2/8/8/2NPBN2/PPPQPPPP/R3K2R w KQkq - 0 1",
                vec!["e1g1"],
            ),
            (
                "r3k2r/pppqpppp/2npbn2/8/8/2NPBN2/PPPQPPPP/R3K2R b KQkq - 0 1",
                vec!["e8c8"],
            ),
            // promotion
            ("8/P7/8/8/8/8/8/k6K w - - 0 1", vec!["a7a8q"]),
            // en passant
            (
                "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3",
                vec!["e5d6"],
            ),
        ];

        for (fen, moves) in cases {
            let mut board = board_from(fen);
            let snapshot = board.clone();

            for m in &moves {
                assert!(board.make_move(mv(m)), "move {m} rejected in {fen}");
            }
            for _ in &moves {
                assert!(board.unmake_move());
            }

            assert_eq!(board, snapshot, "round-trip failed for {fen}");
        }
    }

    #[test]
    fn unmake_on_empty_history_is_a_no_op() {
        let mut board = Board::starting_position();
        assert!(!board.unmake_move());
        assert_eq!(board, Board::starting_position());
    }

    #[test]
    fn illegal_move_leaves_board_untouched() {
        // The e2 bishop is pinned by the e8 rook; stepping off the file
        // exposes the white king.
        let mut board = board_from("4r2k/8/8/8/8/8/4B3/4K3 w - - 0 1");
        let snapshot = board.clone();

        assert!(!board.make_move(mv("e2d3")));
        assert_eq!(board, snapshot);
    }

    #[test]
    fn en_passant_capture_removes_the_double_stepped_pawn() {
        let mut board = board_from(
            "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3",
        );

        assert!(board.make_move(mv("e5d6")));
        assert_eq!(board.piece_at(Square::D5), None);
        assert_eq!(board.piece_at(Square::D6).unwrap().kind, PieceKind::Pawn);
        assert_eq!(board.piece_at(Square::D6).unwrap().side, Side::White);
        assert_eq!(board.en_passant(), None);
    }

    #[test]
    fn undoing_an_en_passant_exchange_restores_the_earlier_position() {
        let mut board = Board::starting_position();
        for m in ["e2e4", "a7a6", "e4e5", "d7d5", "e5d6"] {
            assert!(board.make_user_move(mv(m)), "move {m} rejected");
        }
        for _ in 0..3 {
            assert!(board.unmake_move());
        }

        let mut replay = Board::starting_position();
        assert!(replay.make_user_move(mv("e2e4")));
        assert!(replay.make_user_move(mv("a7a6")));

        assert_eq!(board, replay);
    }

    #[test]
    fn double_step_sets_en_passant_target_to_the_pawn_square() {
        let mut board = Board::starting_position();

        assert!(board.make_move(mv("e2e4")));
        assert_eq!(board.en_passant(), Some(Square::E4));

        assert!(board.make_move(mv("g8f6")));
        assert_eq!(board.en_passant(), None);
    }

    #[test]
    fn castling_moves_the_rook_and_sets_flags() {
        let mut board = board_from("r3k2r/pppqpppp/2npbn2/8/8/2NPBN2/PPPQPPPP/R3K2R w KQkq - 0 1");

        assert!(board.make_move(mv("e1g1")));
        assert_eq!(board.piece_at(Square::G1).unwrap().kind, PieceKind::King);
        assert_eq!(board.piece_at(Square::F1).unwrap().kind, PieceKind::Rook);
        assert_eq!(board.piece_at(Square::H1), None);
        assert_eq!(board.piece_at(Square::E1), None);
        assert!(board.has_castled(Side::White));
        assert!(board.castling().contains(Castling::WHITE_KING_MOVED));
        assert!(!board.castling().can_castle(Side::White, Wing::KingSide));
        assert!(!board.castling().can_castle(Side::White, Wing::QueenSide));
        assert!(board.castling().can_castle(Side::Black, Wing::KingSide));
    }

    #[test]
    fn castling_through_an_occupied_square_is_rejected() {
        let mut board = board_from("r3k2r/pppqpppp/2np1n2/8/8/2NP1N2/PPPQPPPP/R1B1KB1R w KQkq - 0 1");
        let snapshot = board.clone();

        assert!(!board.make_move(mv("e1g1")));
        assert!(!board.make_move(mv("e1c1")));
        assert_eq!(board, snapshot);
    }

    #[test]
    fn queenside_castling_needs_the_b_file_square_empty() {
        // Only b1 is occupied; c1 and d1 are clear.
        let mut board = board_from("r3k2r/pppqpppp/2npbn2/8/8/2NPBN2/PPPQPPPP/RN2K2R w KQkq - 0 1");

        assert!(!board.make_move(mv("e1c1")));
    }

    #[test]
    fn castling_out_of_or_through_check_is_rejected() {
        // A black rook on e8 gives check; one on f8 covers the transit
        // square f1.
        let mut out_of_check = board_from("4r1k1/8/8/8/8/8/PPPP4/R3K2R w KQ - 0 1");
        assert!(!out_of_check.make_move(mv("e1g1")));

        let mut through_check = board_from("5rk1/8/8/8/8/8/PPPP4/R3K2R w KQ - 0 1");
        assert!(!through_check.make_move(mv("e1g1")));
    }

    #[test]
    fn rook_moves_impair_their_own_wing_only() {
        let mut board = board_from("r3k2r/pppqpppp/2npbn2/8/8/2NPBN2/PPPQPPPP/R3K2R w KQkq - 0 1");

        assert!(board.make_move(mv("h1g1")));
        assert!(!board.castling().can_castle(Side::White, Wing::KingSide));
        assert!(board.castling().can_castle(Side::White, Wing::QueenSide));
    }

    #[test]
    fn capturing_a_rook_on_its_corner_impairs_that_rook() {
        // The g7 bishop takes the h8 rook on its home corner.
        let mut board = board_from("r3k2r/ppp1ppBp/2np1n2/8/8/2NP1N2/PPPQPPP1/R3K2R w KQkq - 0 1");

        assert!(board.make_move(mv("g7h8")));
        assert!(!board.castling().can_castle(Side::Black, Wing::KingSide));
        assert!(board.castling().can_castle(Side::Black, Wing::QueenSide));
    }

    #[test]
    fn promotion_swaps_the_pawn_kind_and_unmake_restores_it() {
        let mut board = board_from("8/P7/8/8/8/8/8/k6K w - - 0 1");

        assert!(board.make_move(mv("a7a8q")));
        assert_eq!(board.piece_at(Square::A8).unwrap().kind, PieceKind::Queen);
        assert_eq!(board.piece_at(Square::A7), None);

        assert!(board.unmake_move());
        assert_eq!(board.piece_at(Square::A7).unwrap().kind, PieceKind::Pawn);
        assert_eq!(board.piece_at(Square::A8), None);
    }

    #[test]
    fn back_rank_pawn_moves_require_a_promotion_kind() {
        let mut board = board_from("8/P7/8/8/8/8/8/k6K w - - 0 1");
        assert!(!board.make_move(mv("a7a8")));

        // And ordinary moves must not carry one.
        let mut board = Board::starting_position();
        assert!(!board.make_move(mv("e2e4q")));
    }

    #[test]
    fn moving_the_opponents_piece_is_rejected() {
        let mut board = Board::starting_position();
        assert!(!board.make_move(mv("e7e5")));
    }

    #[test]
    fn user_moves_must_be_geometrically_possible() {
        let mut board = Board::starting_position();

        // A rook cannot hop over its own pawn, even though the destination
        // is empty and the king stays safe.
        assert!(!board.make_user_move(mv("a1a5")));
        // Sliding through the knight's square is equally impossible.
        assert!(!board.make_user_move(mv("d1g4")));
        // While a knight jump is fine.
        assert!(board.make_user_move(mv("g1f3")));
    }

    #[test]
    fn user_moves_are_rejected_once_a_result_is_recorded() {
        let mut board = Board::starting_position();
        board.resign();

        assert_eq!(board.game_result(), Some(GameResult::ResignationByWhite));
        assert!(!board.make_user_move(mv("e2e4")));
    }

    #[test]
    fn fools_mate_is_detected_on_the_user_move_path() {
        let mut board = Board::starting_position();

        for m in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            assert!(board.make_user_move(mv(m)), "move {m} rejected");
        }

        assert_eq!(board.game_result(), Some(GameResult::CheckmateByBlack));
        // The mate dissolves when the queen move is taken back.
        assert!(board.unmake_move());
        assert_eq!(board.game_result(), None);
    }

    #[test]
    fn render_ascii_orients_the_board_towards_the_side_to_move() {
        let board = Board::starting_position();
        let board_ascii = board.render_ascii();
        let rows: Vec<&str> = board_ascii.lines().collect();

        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0], "r n b q k b n r");
        assert_eq!(rows[7], "R N B Q K B N R");

        let black_to_move = board_from("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
        let black_ascii = black_to_move.render_ascii();
        let rows: Vec<&str> = black_ascii.lines().collect();

        assert_eq!(rows[0], "R N B Q K B N R");
        assert_eq!(rows[3], ". . . . P . . .");
        assert_eq!(rows[7], "r n b q k b n r");
    }
}
