//! The engine proper: evaluation, search and a self-contained engine
//! context.
//!
//! Nothing here performs I/O; the protocol driver owns the terminal. Each
//! [`Engine`] value is fully independent, so tests (and any embedding) can
//! run as many as they like side by side.

use riddari_core::board::{Board, FenParseError, GameResult, Move};
use riddari_core::move_gen::MoveStack;

pub mod eval;
pub mod piece_tables;
pub mod score;
pub mod search;
pub mod search_limits;

pub use score::Score;
pub use search::{InterruptHandler, NeverInterrupt, SearchOutcome, INTERRUPT_NODE_INTERVAL};
pub use search_limits::{SearchLimits, DEPTH_MAX, TIME_DEFAULT};

/// A complete engine instance: the game position, the search's scratch
/// memory and the current search limits.
pub struct Engine {
    board: Board,
    move_stack: MoveStack,
    limits: SearchLimits,
    resignation_sensible: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// A fresh engine holding the starting position and default limits.
    pub fn new() -> Self {
        Self {
            board: Board::starting_position(),
            move_stack: MoveStack::new(),
            limits: SearchLimits::default(),
            resignation_sensible: false,
        }
    }

    /// Starts a new game: initial position, default depth and time budget,
    /// cleared resignation verdict.
    pub fn new_game(&mut self) {
        self.board = Board::starting_position();
        self.limits = SearchLimits::default();
        self.resignation_sensible = false;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn limits(&self) -> &SearchLimits {
        &self.limits
    }

    /// Replaces the position with one parsed from a descriptor. On any
    /// failure -- syntax, structure or an unplayable position -- the engine
    /// falls back to the starting position: the caller has already seen an
    /// error, and a clean slate beats a half-loaded board.
    pub fn set_board_from_fen(&mut self, fen: &str) -> Result<(), FenParseError> {
        let result = riddari_core::board::parse_fen(fen).and_then(|mut board| {
            if board.setup_is_playable() {
                Ok(board)
            } else {
                Err(FenParseError::UnplayablePosition)
            }
        });

        match result {
            Ok(board) => {
                self.board = board;
                Ok(())
            }
            Err(e) => {
                self.board = Board::starting_position();
                Err(e)
            }
        }
    }

    /// Plays an externally entered move, with full validation.
    pub fn make_user_move(&mut self, mv: Move) -> bool {
        self.board.make_user_move(mv)
    }

    /// Takes back one ply. A no-op (returning `false`) at the start of the
    /// game.
    pub fn undo_move(&mut self) -> bool {
        self.board.unmake_move()
    }

    pub fn game_result(&mut self) -> Option<GameResult> {
        self.board.game_result()
    }

    /// Resigns on behalf of the side to move.
    pub fn resign(&mut self) {
        self.board.resign();
    }

    pub fn set_search_depth(&mut self, plies: i64) {
        self.limits.set_depth(plies);
    }

    pub fn set_search_time(&mut self, seconds: i64) {
        self.limits.set_time(seconds);
    }

    /// Searches the current position for the best move, polling `interrupt`
    /// every [`INTERRUPT_NODE_INTERVAL`] nodes so the caller can process
    /// input and request an abort.
    ///
    /// Returns `None` only when the position offers no legal move, which a
    /// caller that checks for game over beforehand never sees.
    pub fn find_move(&mut self, interrupt: &mut dyn InterruptHandler) -> Option<Move> {
        let outcome = search::find_move(
            &mut self.board,
            &mut self.move_stack,
            &self.limits,
            interrupt,
        );
        self.resignation_sensible = outcome.resignation_sensible;
        outcome.best_move
    }

    /// Whether the last search concluded that losing is unavoidable.
    pub fn is_resignation_sensible(&self) -> bool {
        self.resignation_sensible
    }
}
