//! Parsing of inbound protocol lines.
//!
//! Each line is a command word followed by whitespace-separated arguments.
//! A first word that matches no known command is tried as a Coordinate
//! Algebraic move before being declared unrecognized.

use nom::{
    bytes::complete::take_till1, character::complete::multispace0, multi::many0,
    sequence::preceded, IResult,
};
use thiserror::Error;

use riddari_core::board::Move;

/// A fully parsed inbound line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CecpCommand {
    /// `xboard`: enter strict mode.
    Xboard,
    /// `protover N`: advertise features. The version argument is accepted
    /// and ignored; newer protocol versions are compatible with what we
    /// send.
    Protover,
    /// `new`: start a fresh game.
    New,
    /// `quit`: leave the protocol loop.
    Quit,
    /// `force`: stop searching, accept moves for both sides.
    Force,
    /// `go`: start searching for the side to move.
    Go,
    /// `?`: move now if searching.
    MoveNow,
    /// `ping N`: schedule `pong N`.
    Ping(i64),
    /// `sd N`: limit the search depth.
    SetDepth(i64),
    /// `st N`: limit the search time.
    SetTime(i64),
    /// `undo`: take back one ply.
    Undo,
    /// `remove`: take back two plies.
    Remove,
    /// `setboard FEN...`: load a position descriptor.
    SetBoard(String),
    /// `result R {comment}`: record an externally adjudicated result.
    Result { tag: String, comment: String },
    /// `d`: print the board.
    ShowBoard,
    /// `help`: print the command summary.
    Help,
    /// A bare move token.
    UserMove(Move),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseLineError {
    #[error("empty line")]
    Empty,
    #[error("missing argument {argument} to command '{command}'")]
    TooFewArguments {
        command: &'static str,
        argument: &'static str,
    },
    #[error("unexpected argument {first_excess:?} to command '{command}'")]
    TooManyArguments {
        command: &'static str,
        first_excess: String,
    },
    #[error("unrecognized input {token:?}")]
    Unknown { token: String },
}

/// Eats leading whitespace, then one whitespace-delimited token.
fn token(input: &str) -> IResult<&str, &str> {
    preceded(multispace0, take_till1(|c: char| c.is_ascii_whitespace()))(input)
}

fn tokens(input: &str) -> Vec<&str> {
    many0(token)(input).map(|(_, words)| words).unwrap_or_default()
}

/// Integer argument with `atoi` tolerance: a leading integer parses and
/// anything non-numeric counts as 0, which every numeric command treats as
/// "use the default".
fn lenient_integer(arg: &str) -> i64 {
    nom::character::complete::i64::<_, nom::error::Error<&str>>(arg)
        .map(|(_, value)| value)
        .unwrap_or(0)
}

fn expect_no_args(command: &'static str, args: &[&str]) -> Result<(), ParseLineError> {
    match args.first() {
        None => Ok(()),
        Some(first) => Err(ParseLineError::TooManyArguments {
            command,
            first_excess: first.to_string(),
        }),
    }
}

fn expect_one_arg<'a>(
    command: &'static str,
    argument: &'static str,
    args: &[&'a str],
) -> Result<&'a str, ParseLineError> {
    match args {
        [] => Err(ParseLineError::TooFewArguments { command, argument }),
        [value] => Ok(value),
        [_, excess, ..] => Err(ParseLineError::TooManyArguments {
            command,
            first_excess: excess.to_string(),
        }),
    }
}

/// Parses one inbound line. Empty (or all-whitespace) lines report
/// [`ParseLineError::Empty`] and are ignored by the caller.
pub fn parse_command_line(line: &str) -> Result<CecpCommand, ParseLineError> {
    let Ok((rest, word)) = token(line) else {
        return Err(ParseLineError::Empty);
    };
    let args = tokens(rest);

    match word {
        "xboard" => expect_no_args("xboard", &args).map(|()| CecpCommand::Xboard),
        "protover" => {
            expect_one_arg("protover", "VERSION", &args).map(|_| CecpCommand::Protover)
        }
        "new" => expect_no_args("new", &args).map(|()| CecpCommand::New),
        "quit" => expect_no_args("quit", &args).map(|()| CecpCommand::Quit),
        "force" => expect_no_args("force", &args).map(|()| CecpCommand::Force),
        "go" => expect_no_args("go", &args).map(|()| CecpCommand::Go),
        "?" => expect_no_args("?", &args).map(|()| CecpCommand::MoveNow),
        "ping" => expect_one_arg("ping", "INTEGER", &args)
            .map(|value| CecpCommand::Ping(lenient_integer(value))),
        "sd" => expect_one_arg("sd", "DEPTH", &args)
            .map(|value| CecpCommand::SetDepth(lenient_integer(value))),
        "st" => expect_one_arg("st", "TIME", &args)
            .map(|value| CecpCommand::SetTime(lenient_integer(value))),
        "undo" => expect_no_args("undo", &args).map(|()| CecpCommand::Undo),
        "remove" => expect_no_args("remove", &args).map(|()| CecpCommand::Remove),
        "setboard" => match args.as_slice() {
            [] => Err(ParseLineError::TooFewArguments {
                command: "setboard",
                argument: "FEN",
            }),
            fields => Ok(CecpCommand::SetBoard(fields.join(" "))),
        },
        "result" => match args.as_slice() {
            [] => Err(ParseLineError::TooFewArguments {
                command: "result",
                argument: "RESULT",
            }),
            [_] => Err(ParseLineError::TooFewArguments {
                command: "result",
                argument: "COMMENT",
            }),
            [tag, comment @ ..] => Ok(CecpCommand::Result {
                tag: tag.to_string(),
                comment: comment.join(" "),
            }),
        },
        "d" => expect_no_args("d", &args).map(|()| CecpCommand::ShowBoard),
        "help" => expect_no_args("help", &args).map(|()| CecpCommand::Help),
        _ => match word.parse::<Move>() {
            // Anything after the move token is ignored, like the original
            // interfaces do.
            Ok(mv) => Ok(CecpCommand::UserMove(mv)),
            Err(_) => Err(ParseLineError::Unknown {
                token: word.to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use riddari_core::board::Square;

    #[test]
    fn bare_commands() {
        assert_eq!(parse_command_line("xboard"), Ok(CecpCommand::Xboard));
        assert_eq!(parse_command_line("new"), Ok(CecpCommand::New));
        assert_eq!(parse_command_line("quit"), Ok(CecpCommand::Quit));
        assert_eq!(parse_command_line("force"), Ok(CecpCommand::Force));
        assert_eq!(parse_command_line("go"), Ok(CecpCommand::Go));
        assert_eq!(parse_command_line("?"), Ok(CecpCommand::MoveNow));
        assert_eq!(parse_command_line("undo"), Ok(CecpCommand::Undo));
        assert_eq!(parse_command_line("remove"), Ok(CecpCommand::Remove));
        assert_eq!(parse_command_line("d"), Ok(CecpCommand::ShowBoard));
        assert_eq!(parse_command_line("help"), Ok(CecpCommand::Help));
    }

    #[test]
    fn whitespace_is_forgiven() {
        assert_eq!(parse_command_line("  xboard  "), Ok(CecpCommand::Xboard));
        assert_eq!(parse_command_line("ping    7"), Ok(CecpCommand::Ping(7)));
    }

    #[test]
    fn empty_lines() {
        assert_eq!(parse_command_line(""), Err(ParseLineError::Empty));
        assert_eq!(parse_command_line("   "), Err(ParseLineError::Empty));
    }

    #[test]
    fn numeric_arguments() {
        assert_eq!(parse_command_line("ping 42"), Ok(CecpCommand::Ping(42)));
        assert_eq!(parse_command_line("sd 8"), Ok(CecpCommand::SetDepth(8)));
        assert_eq!(parse_command_line("st 30"), Ok(CecpCommand::SetTime(30)));
        assert_eq!(parse_command_line("sd -3"), Ok(CecpCommand::SetDepth(-3)));

        // atoi leniency: junk reads as zero, which means "default".
        assert_eq!(parse_command_line("sd x"), Ok(CecpCommand::SetDepth(0)));
        assert_eq!(parse_command_line("ping x"), Ok(CecpCommand::Ping(0)));
    }

    #[test]
    fn protover_takes_exactly_one_ignored_argument() {
        assert_eq!(parse_command_line("protover 2"), Ok(CecpCommand::Protover));
        assert_eq!(parse_command_line("protover banana"), Ok(CecpCommand::Protover));
        assert_eq!(
            parse_command_line("protover"),
            Err(ParseLineError::TooFewArguments {
                command: "protover",
                argument: "VERSION",
            })
        );
    }

    #[test]
    fn arity_violations() {
        assert_eq!(
            parse_command_line("sd"),
            Err(ParseLineError::TooFewArguments {
                command: "sd",
                argument: "DEPTH",
            })
        );
        assert_eq!(
            parse_command_line("ping 1 2"),
            Err(ParseLineError::TooManyArguments {
                command: "ping",
                first_excess: "2".to_string(),
            })
        );
        assert_eq!(
            parse_command_line("go now"),
            Err(ParseLineError::TooManyArguments {
                command: "go",
                first_excess: "now".to_string(),
            })
        );
    }

    #[test]
    fn setboard_joins_its_fields() {
        assert_eq!(
            parse_command_line("setboard 4k3/8/8/8/8/8/8/4K3 w - - 0 1"),
            Ok(CecpCommand::SetBoard("4k3/8/8/8/8/8/8/4K3 w - - 0 1".into()))
        );
        assert_eq!(
            parse_command_line("setboard"),
            Err(ParseLineError::TooFewArguments {
                command: "setboard",
                argument: "FEN",
            })
        );
    }

    #[test]
    fn result_takes_a_tag_and_a_comment() {
        assert_eq!(
            parse_command_line("result 1-0 {White mates}"),
            Ok(CecpCommand::Result {
                tag: "1-0".into(),
                comment: "{White mates}".into(),
            })
        );
        assert_eq!(
            parse_command_line("result *"),
            Err(ParseLineError::TooFewArguments {
                command: "result",
                argument: "COMMENT",
            })
        );
        assert_eq!(
            parse_command_line("result"),
            Err(ParseLineError::TooFewArguments {
                command: "result",
                argument: "RESULT",
            })
        );
    }

    #[test]
    fn moves_parse_as_moves() {
        assert_eq!(
            parse_command_line("e2e4"),
            Ok(CecpCommand::UserMove(Move::new(Square::E2, Square::E4)))
        );
        assert_eq!(
            parse_command_line("a7a8q"),
            Ok(CecpCommand::UserMove(
                "a7a8q".parse().unwrap()
            ))
        );
    }

    #[test]
    fn junk_is_unknown() {
        assert_eq!(
            parse_command_line("frobnicate"),
            Err(ParseLineError::Unknown {
                token: "frobnicate".to_string(),
            })
        );
        // Nearly a move, but not one.
        assert_eq!(
            parse_command_line("e2e9"),
            Err(ParseLineError::Unknown {
                token: "e2e9".to_string(),
            })
        );
    }
}
