//! Negamax search with alpha-beta pruning.
//!
//! The search runs on the caller's thread and stays responsive by polling
//! an [`InterruptHandler`] every [`INTERRUPT_NODE_INTERVAL`] nodes; the
//! handler can read protocol input and ask for an abort. An aborted search
//! unwinds immediately, each level undoing its move, and reports the best
//! root move found so far.

use std::time::Instant;

use riddari_core::{
    board::{Board, Move},
    move_gen::MoveStack,
    rules,
};

use crate::{eval, score::Score, search_limits::SearchLimits};

/// How many nodes pass between time checks and interrupt polls.
pub const INTERRUPT_NODE_INTERVAL: u32 = 10_000;

/// Periodic hook out of the search, polled every
/// [`INTERRUPT_NODE_INTERVAL`] nodes. The protocol driver uses it to keep
/// reading input during a search; anyone else can pass a no-op.
pub trait InterruptHandler {
    /// Returns true to request an abort.
    fn poll(&mut self) -> bool;
}

/// An [`InterruptHandler`] that never aborts.
pub struct NeverInterrupt;

impl InterruptHandler for NeverInterrupt {
    fn poll(&mut self) -> bool {
        false
    }
}

/// What a search produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    /// The chosen move. `None` only if the root position has no legal move
    /// at all (the game was already over) or an abort arrived before the
    /// first root move was visited.
    pub best_move: Option<Move>,
    pub score: Score,
    /// True when the score shows an unavoidable loss within the horizon.
    pub resignation_sensible: bool,
}

struct SearchContext<'a> {
    board: &'a mut Board,
    stack: &'a mut MoveStack,
    limits: &'a SearchLimits,
    interrupt: &'a mut dyn InterruptHandler,
    started: Instant,
    interrupt_counter: u32,
    abort: bool,
    best_root_move: Option<Move>,
}

impl SearchContext<'_> {
    fn negamax(&mut self, height: usize, mut alpha: Score, beta: Score) -> Score {
        if height == 0 {
            self.interrupt_counter = 0;
            self.started = Instant::now();
        } else {
            self.interrupt_counter += 1;
        }

        if self.interrupt_counter == INTERRUPT_NODE_INTERVAL {
            self.interrupt_counter = 0;
            if self.started.elapsed() >= self.limits.max_time {
                self.abort = true;
            }
            if self.interrupt.poll() {
                self.abort = true;
            }
        }
        if self.abort {
            return alpha;
        }

        // `>=` rather than `==`: the limit may legitimately sit below the
        // height we were called at.
        if height >= self.limits.max_depth {
            return eval::evaluate(self.board);
        }
        if rules::insufficient_material(self.board) {
            return Score::DRAW;
        }

        let moves = self.stack.generate(self.board, height);
        let mut any_legal = false;

        for index in moves.indices() {
            let mv = self.stack.get(index);
            if !self.board.make_move(mv) {
                // Pseudo-legal but leaves the king hanging.
                continue;
            }
            any_legal = true;

            let value = -self.negamax(height + 1, -beta, -alpha);
            self.board.unmake_move();

            if self.abort {
                // Nothing fully scored at the root yet: adopt the move we
                // were examining. Any move beats no move when we must play.
                if height == 0 && self.best_root_move.is_none() {
                    self.best_root_move = Some(mv);
                }
                return alpha;
            }

            if value > alpha {
                alpha = value;
                if height == 0 {
                    self.best_root_move = Some(mv);
                }
            }
            if beta <= alpha {
                break;
            }
        }

        if !any_legal {
            return if rules::is_king_in_check(self.board, self.board.to_move()) {
                Score::mated_at(height)
            } else {
                Score::DRAW
            };
        }

        alpha
    }
}

/// Searches the position over the full window up to the configured depth
/// and time budget, and reports the best root move.
pub fn find_move(
    board: &mut Board,
    stack: &mut MoveStack,
    limits: &SearchLimits,
    interrupt: &mut dyn InterruptHandler,
) -> SearchOutcome {
    // Between searches is the one safe moment to resize the move stack;
    // mid-search the shallower plies hold live ranges into it.
    stack.resize_for_depth(limits.max_depth);

    let mut ctx = SearchContext {
        board,
        stack,
        limits,
        interrupt,
        started: Instant::now(),
        interrupt_counter: 0,
        abort: false,
        best_root_move: None,
    };

    let score = ctx.negamax(0, -Score::INF, Score::INF);

    SearchOutcome {
        best_move: ctx.best_root_move,
        score,
        resignation_sensible: score <= Score::RESIGNATION_THRESHOLD,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use riddari_core::board::parse_fen;

    fn search(fen: &str, depth: i64) -> SearchOutcome {
        let mut board = parse_fen(fen).unwrap();
        let mut stack = MoveStack::new();
        let mut limits = SearchLimits::default();
        limits.set_depth(depth);
        find_move(&mut board, &mut stack, &limits, &mut NeverInterrupt)
    }

    #[test]
    fn finds_mate_in_one() {
        let outcome = search("7k/8/6K1/8/8/8/8/R7 w - - 0 1", 3);

        assert_eq!(outcome.best_move.unwrap().to_string(), "a1a8");
        assert_eq!(outcome.score, -Score::mated_at(1));
        assert!(!outcome.resignation_sensible);
    }

    #[test]
    fn prefers_the_faster_mate() {
        // Queen and rook against the bare king: mate in one exists (Qg7);
        // slower mates abound at depth 5.
        let outcome = search("7k/8/5K2/8/8/8/6Q1/R7 w - - 0 1", 5);

        assert_eq!(outcome.score, -Score::mated_at(1));
    }

    #[test]
    fn grabs_the_hanging_pawn_at_depth_one() {
        let outcome = search("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1", 1);

        assert_eq!(outcome.best_move.unwrap().to_string(), "e4d5");
        assert!(outcome.score > Score(50));
    }

    #[test]
    fn mated_root_reports_no_move_and_suggests_resigning() {
        let outcome = search("R5k1/5ppp/8/8/8/8/8/4K3 b - - 0 1", 3);

        assert_eq!(outcome.best_move, None);
        assert_eq!(outcome.score, Score::mated_at(0));
        assert!(outcome.resignation_sensible);
    }

    #[test]
    fn stalemate_root_scores_zero() {
        let outcome = search("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", 3);

        assert_eq!(outcome.best_move, None);
        assert_eq!(outcome.score, Score::DRAW);
        assert!(!outcome.resignation_sensible);
    }

    #[test]
    fn insufficient_material_scores_zero_without_searching() {
        let outcome = search("8/8/4k3/8/8/4K3/8/8 w - - 0 1", 3);

        assert_eq!(outcome.best_move, None);
        assert_eq!(outcome.score, Score::DRAW);
    }

    #[test]
    fn search_leaves_the_board_as_it_found_it() {
        let mut board = parse_fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3")
            .unwrap();
        let snapshot = board.clone();

        let mut stack = MoveStack::new();
        let mut limits = SearchLimits::default();
        limits.set_depth(3);
        find_move(&mut board, &mut stack, &limits, &mut NeverInterrupt);

        assert_eq!(board, snapshot);
    }

    struct AbortImmediately {
        polled: u32,
    }

    impl InterruptHandler for AbortImmediately {
        fn poll(&mut self) -> bool {
            self.polled += 1;
            true
        }
    }

    #[test]
    fn an_interrupt_abort_still_yields_a_move() {
        let mut board = riddari_core::board::Board::starting_position();
        let mut stack = MoveStack::new();
        // Unbounded depth: only the abort can end this search.
        let limits = SearchLimits::default();

        let mut interrupt = AbortImmediately { polled: 0 };
        let outcome = find_move(&mut board, &mut stack, &limits, &mut interrupt);

        assert_eq!(interrupt.polled, 1);
        assert!(outcome.best_move.is_some());
    }
}
