//! The protocol dispatch loop.
//!
//! A single thread runs both the command loop and the search: the search
//! polls back into [`ProtocolState::process_input_while_searching`] every
//! few thousand nodes, which lets "?", `force` and `quit` take effect
//! promptly. Commands that would mutate engine state mid-search are queued
//! and replayed once the search has unwound, so their effects always apply
//! to post-search state.
//!
//! Error messages are never written to the standard error stream; the
//! protocol communicates solely through standard input and output.

use std::collections::VecDeque;
use std::io::Write;
use std::time::Duration;

use riddari_core::board::{GameResult, Move};
use riddari_engine::{Engine, InterruptHandler};

use crate::command::{parse_command_line, CecpCommand, ParseLineError};
use crate::input::{InputSource, LineReader, ReadOutcome};

const ENGINE_NAME: &str = "Riddari";

const HELP_TEXT: &str = "\
?                       If calculating, ask engine to move immediately.
d                       Display the board.
force                   Don't automatically move, wait for the user to ask the
                        engine to move.
go                      Ask engine to move.
help                    Display this information.
new                     Start a new game.
ping INTEGER            Answer 'pong INTEGER' once all pending input is done.
protover VERSION        Display the features this engine supports.
quit                    Quit the program.
remove                  Undo last move (two plies).
result RESULT COMMENT   Record the final result of the game.
sd DEPTH                Set the maximum search depth to DEPTH plies.
setboard FEN            Set the board to the state expressed by the FEN string.
st TIME                 Set the maximum search time to TIME seconds.
undo                    Undo last half-move (one ply).
xboard                  Put engine in CECP mode if not already.
                        (CECP = Chess Engine Communication Protocol)";

/// Tunable driver behavior.
#[derive(Debug, Clone, Default)]
pub struct DriverOptions {
    /// Resign instead of moving once a search concludes the game cannot be
    /// saved. Off by default; most interfaces prefer to adjudicate
    /// themselves.
    pub resign_when_hopeless: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct UserResult {
    tag: String,
    comment: String,
}

/// Everything the driver owns besides the engine, split out so the search
/// interrupt can keep reading input while the engine itself is mutably
/// borrowed by the search.
struct ProtocolState<S, W> {
    reader: LineReader<S>,
    out: W,
    options: DriverOptions,
    /// Strict protocol mode, entered by `xboard` and never left: responses
    /// use the literal strings the interface expects. Outside it, output is
    /// phrased for a human at a terminal.
    strict: bool,
    force: bool,
    searching: bool,
    /// Whether the move of an aborted search should still be played and
    /// announced once it unwinds. "?" wants the move now; `force` and
    /// `quit` want silence.
    move_after_abort: bool,
    abort_requested: bool,
    pong_queued: Option<i64>,
    user_result: Option<UserResult>,
    /// Lines received during a search that must act on post-search state,
    /// replayed in arrival order after the search returns.
    deferred: VecDeque<String>,
    quit: bool,
}

impl<S: InputSource, W: Write> ProtocolState<S, W> {
    fn send(&mut self, line: &str) {
        // The interface reads line by line; flush every one.
        let _ = writeln!(self.out, "{line}");
        let _ = self.out.flush();
    }

    /// For output that carries its own newlines (the board dump).
    fn send_raw(&mut self, text: &str) {
        let _ = write!(self.out, "{text}");
        let _ = self.out.flush();
    }

    fn enable_strict_mode(&mut self) {
        self.strict = true;
        // A bare newline marks the start of protocol output for frontends
        // that wait for it.
        self.send("");
    }

    fn send_features(&mut self) {
        self.send("feature ping=1 setboard=1 playother=1 nps=0");
        self.send("feature time=1 draw=1");
        self.send("feature sigint=0 sigterm=0");
        self.send("feature reuse=1 analyze=0");
        self.send(&format!("feature name=1 myname=\"{ENGINE_NAME}\""));
        self.send("feature variants=\"normal\"");
        self.send("feature colors=0");
        self.send("feature done=1");
    }

    fn send_help(&mut self) {
        self.send(HELP_TEXT);
    }

    fn report_arity_error(&mut self, error: &ParseLineError, line: &str) {
        match error {
            ParseLineError::TooFewArguments { command, argument } => {
                if self.strict {
                    self.send(&format!("Error (too few parameters): {line}"));
                } else {
                    self.send(&format!(
                        "Missing argument '{argument}' to command '{command}'."
                    ));
                }
            }
            ParseLineError::TooManyArguments {
                command,
                first_excess,
            } => {
                if self.strict {
                    self.send(&format!("Error (too many parameters): {line}"));
                } else {
                    self.send(&format!(
                        "One or more unexpected arguments to command '{command}', first was '{first_excess}'."
                    ));
                }
            }
            ParseLineError::Empty | ParseLineError::Unknown { .. } => {}
        }
    }

    fn msg_unknown_command(&mut self, token: &str) {
        if self.strict {
            self.send(&format!("Error (unknown command): {token}"));
        } else {
            self.send(&format!("Unrecognized command, '{token}'."));
        }
    }

    fn user_result_line(&self) -> Option<String> {
        self.user_result
            .as_ref()
            .map(|result| format!("{} {{{}}}", result.tag, result.comment))
    }

    fn handle_result_command(&mut self, tag: &str, comment: &str) {
        if self.user_result.is_some() {
            self.send("Cannot overwrite existing result (a result was already received earlier).");
            return;
        }

        if !matches!(tag, "1/2-1/2" | "1-0" | "0-1" | "*") {
            self.send(&format!(
                "Invalid value '{tag}' for RESULT argument to command 'result'."
            ));
            return;
        }

        // The comment must be a single brace group with no nested braces;
        // anything fancier has no defined meaning here.
        let interior = comment
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'));
        let interior = match interior {
            Some(text) if !text.contains('{') && !text.contains('}') => text,
            _ => {
                self.send(&format!(
                    "Invalid value '{comment}' for COMMENT argument to command 'result'."
                ));
                return;
            }
        };

        self.user_result = Some(UserResult {
            tag: tag.to_string(),
            comment: interior.to_string(),
        });

        // Repeating the result confirms it was understood, in both modes.
        let line = self
            .user_result_line()
            .expect("user result was just stored");
        self.send(&line);
    }

    fn request_abort(&mut self, move_after: bool) {
        self.abort_requested = true;
        self.move_after_abort = move_after;
    }

    /// Reads and handles at most one line while the search is running.
    /// Returns whether the search should abort.
    ///
    /// Only commands that touch driver-local state act here. Everything
    /// that reads or mutates the engine is deferred: the search owns the
    /// engine right now, and the protocol promises such commands take
    /// effect against post-search state anyway.
    fn process_input_while_searching(&mut self) -> bool {
        match self.reader.poll_line() {
            ReadOutcome::Empty => {}
            ReadOutcome::Eof => {
                self.quit = true;
                self.request_abort(false);
            }
            ReadOutcome::Line(line) => self.dispatch_while_searching(line),
        }

        self.abort_requested || self.quit
    }

    fn dispatch_while_searching(&mut self, line: String) {
        match parse_command_line(&line) {
            Err(ParseLineError::Empty) => {}
            // Moves and junk both need the game result to decide their
            // response; queue the whole line.
            Err(ParseLineError::Unknown { .. }) => self.deferred.push_back(line),
            Err(error) => self.report_arity_error(&error, &line),
            Ok(command) => match command {
                CecpCommand::MoveNow => self.request_abort(true),
                CecpCommand::Force => {
                    self.force = true;
                    self.request_abort(false);
                }
                CecpCommand::Quit => {
                    self.quit = true;
                    self.request_abort(false);
                }
                CecpCommand::Ping(value) => self.pong_queued = Some(value),
                CecpCommand::Xboard => self.enable_strict_mode(),
                CecpCommand::Protover => self.send_features(),
                CecpCommand::Help => self.send_help(),
                CecpCommand::Result { tag, comment } => {
                    self.handle_result_command(&tag, &comment)
                }
                CecpCommand::Go => {
                    tracing::warn!("search requested while already searching");
                }
                CecpCommand::Undo | CecpCommand::Remove => {
                    // The retraction itself waits for the board; the abort
                    // must not.
                    self.request_abort(true);
                    self.deferred.push_back(line);
                }
                CecpCommand::New
                | CecpCommand::SetBoard(_)
                | CecpCommand::SetDepth(_)
                | CecpCommand::SetTime(_)
                | CecpCommand::ShowBoard
                | CecpCommand::UserMove(_) => self.deferred.push_back(line),
            },
        }
    }
}

/// Adapts the protocol state to the search's interrupt hook.
struct SearchBridge<'a, S, W> {
    proto: &'a mut ProtocolState<S, W>,
}

impl<S: InputSource, W: Write> InterruptHandler for SearchBridge<'_, S, W> {
    fn poll(&mut self) -> bool {
        self.proto.process_input_while_searching()
    }
}

/// The protocol driver: reads commands, drives the [`Engine`], writes
/// responses.
pub struct Driver<S, W> {
    engine: Engine,
    proto: ProtocolState<S, W>,
}

impl<S: InputSource, W: Write> Driver<S, W> {
    pub fn new(engine: Engine, source: S, out: W, options: DriverOptions) -> Self {
        Self {
            engine,
            proto: ProtocolState {
                reader: LineReader::new(source),
                out,
                options,
                strict: false,
                force: false,
                searching: false,
                move_after_abort: true,
                abort_requested: false,
                pong_queued: None,
                user_result: None,
                deferred: VecDeque::new(),
                quit: false,
            },
        }
    }

    /// Runs until `quit` or end of input, sleeping briefly whenever the
    /// input runs dry so an idle engine does not spin.
    pub fn run(&mut self) {
        while !self.proto.quit {
            if !self.process_input() {
                std::thread::sleep(Duration::from_millis(1));
            }
        }
    }

    /// Processes at most one pending input line; returns whether one was
    /// consumed.
    pub fn process_input(&mut self) -> bool {
        let processed = match self.proto.reader.poll_line() {
            ReadOutcome::Empty => false,
            ReadOutcome::Eof => {
                self.proto.quit = true;
                false
            }
            ReadOutcome::Line(line) => {
                self.dispatch_line(&line);
                true
            }
        };

        self.flush_pong();
        processed
    }

    /// A pong may only go out once the engine is idle and every line that
    /// arrived before the ping has fully taken effect.
    fn flush_pong(&mut self) {
        if !self.proto.searching && self.proto.deferred.is_empty() {
            if let Some(value) = self.proto.pong_queued.take() {
                self.proto.send(&format!("pong {value}"));
            }
        }
    }

    fn dispatch_line(&mut self, line: &str) {
        tracing::debug!(line, "processing");

        match parse_command_line(line) {
            Err(ParseLineError::Empty) => {}
            Err(ParseLineError::Unknown { token }) => {
                // Once the game has a result, unparseable input only earns
                // the result again.
                if self.have_result() {
                    self.send_result();
                } else {
                    self.proto.msg_unknown_command(&token);
                }
            }
            Err(error) => self.proto.report_arity_error(&error, line),
            Ok(command) => self.dispatch_command(command),
        }
    }

    fn dispatch_command(&mut self, command: CecpCommand) {
        match command {
            CecpCommand::Xboard => self.proto.enable_strict_mode(),
            CecpCommand::Protover => self.proto.send_features(),
            CecpCommand::New => self.new_game(),
            CecpCommand::Quit => self.proto.quit = true,
            CecpCommand::Force => self.proto.force = true,
            CecpCommand::Go => self.calculate_and_move(),
            // "?" outside a search has nothing to hurry along.
            CecpCommand::MoveNow => {}
            CecpCommand::Ping(value) => self.proto.pong_queued = Some(value),
            CecpCommand::SetDepth(plies) => self.engine.set_search_depth(plies),
            CecpCommand::SetTime(seconds) => self.engine.set_search_time(seconds),
            CecpCommand::Undo => self.undo(),
            CecpCommand::Remove => {
                // Two plies: the engine's reply and the move before it.
                self.undo();
                self.undo();
            }
            CecpCommand::SetBoard(fen) => self.setboard(&fen),
            CecpCommand::Result { tag, comment } => {
                self.proto.handle_result_command(&tag, &comment)
            }
            CecpCommand::ShowBoard => {
                let text = self.engine.board().render_ascii();
                self.proto.send_raw(&text);
            }
            CecpCommand::Help => self.proto.send_help(),
            CecpCommand::UserMove(mv) => self.user_move(mv),
        }
    }

    fn have_result(&mut self) -> bool {
        self.proto.user_result.is_some() || self.engine.game_result().is_some()
    }

    fn send_result(&mut self) {
        if let Some(line) = self.proto.user_result_line() {
            self.proto.send(&line);
            return;
        }

        let Some(result) = self.engine.game_result() else {
            panic!("expected a game result but there was none");
        };
        self.proto.send(match result {
            GameResult::CheckmateByWhite => "1-0 {white mates}",
            GameResult::CheckmateByBlack => "0-1 {black mates}",
            GameResult::DrawByStalemate => "1/2-1/2 {draw by stalemate}",
            GameResult::DrawByInsufficientMaterial => "1/2-1/2 {draw by insufficient material}",
            GameResult::ResignationByWhite => "0-1 {white resigns}",
            GameResult::ResignationByBlack => "1-0 {black resigns}",
        });
    }

    fn new_game(&mut self) {
        // The protocol mandates leaving force mode and resetting the search
        // limits on `new`; the engine handles the rest.
        self.proto.force = false;
        self.proto.user_result = None;
        self.engine.new_game();
    }

    fn undo(&mut self) {
        // Taking a move back reopens an adjudicated game.
        self.proto.user_result = None;
        self.engine.undo_move();
    }

    fn setboard(&mut self, fen: &str) {
        match self.engine.set_board_from_fen(fen) {
            Ok(()) => {
                // Loading an already-finished position announces its result
                // immediately.
                if self.have_result() {
                    self.send_result();
                }
            }
            Err(error) => {
                tracing::debug!(%error, "setboard rejected");
                // The engine already fell back to the initial position;
                // give this the full new-game treatment so nothing stale
                // survives the botched load.
                self.new_game();
                if self.proto.strict {
                    self.proto.send("tellusererror Illegal position");
                } else {
                    self.proto.send(&format!("Invalid position, '{fen}'."));
                }
            }
        }
    }

    fn user_move(&mut self, mv: Move) {
        if self.have_result() {
            self.send_result();
            return;
        }

        if !self.engine.make_user_move(mv) {
            self.proto.send(&format!("Illegal move: {mv}"));
            return;
        }

        if self.engine.game_result().is_some() {
            self.send_result();
        } else if !self.proto.force {
            self.calculate_and_move();
        }
    }

    fn calculate_and_move(&mut self) {
        if self.proto.searching {
            tracing::warn!("search requested while already searching");
            return;
        }
        if self.have_result() {
            self.send_result();
            return;
        }

        // Whatever asked the engine to move also means leaving force mode.
        self.proto.force = false;

        self.proto.searching = true;
        self.proto.abort_requested = false;
        self.proto.move_after_abort = true;
        let best = {
            let mut bridge = SearchBridge {
                proto: &mut self.proto,
            };
            self.engine.find_move(&mut bridge)
        };
        self.proto.searching = false;

        // A quit mid-search wants silence and a fast exit.
        if self.proto.quit {
            return;
        }

        if !self.proto.move_after_abort {
            self.proto.move_after_abort = true;
        } else if self.proto.options.resign_when_hopeless && self.engine.is_resignation_sensible()
        {
            self.engine.resign();
            self.send_result();
        } else {
            let Some(mv) = best else {
                panic!("search produced no move");
            };
            if !self.engine.make_user_move(mv) {
                panic!("search produced an illegal move: {mv}");
            }

            if self.proto.strict {
                self.proto.send(&format!("move {mv}"));
            } else {
                self.proto.send(&format!("Engine move: {mv}"));
            }

            if self.engine.game_result().is_some() {
                self.send_result();
            }
            if !self.proto.strict {
                let text = self.engine.board().render_ascii();
                self.proto.send_raw(&text);
            }
        }

        self.replay_deferred();
    }

    /// Applies, in arrival order, the lines that came in during the search.
    fn replay_deferred(&mut self) {
        while !self.proto.quit {
            let Some(line) = self.proto.deferred.pop_front() else {
                break;
            };
            self.dispatch_line(&line);
        }
    }
}
