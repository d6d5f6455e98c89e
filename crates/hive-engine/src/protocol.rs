//! UHP command parsing.
//!
//! One line of client input becomes one [`Command`]. Verbs are matched
//! case-insensitively; arguments keep their case because move strings and
//! game strings are case-sensitive.

use hive_core::{GameError, SearchBudget};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// A parsed UHP command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Protocol handshake
    U1,
    /// Engine id and capabilities
    Info,
    /// Engine options (none are supported)
    Options,
    /// Start a new game, optionally from a game type or full game string
    NewGame(Option<String>),
    /// Apply one move string
    Play(String),
    /// Apply the pass pseudo-move
    Pass,
    /// List the legal moves
    ValidMoves,
    /// Ask the strategy for a move
    BestMove(SearchBudget),
    /// Undo this many plies
    Undo(u32),
    /// End the session
    Exit,
}

/// Errors raised while handling one command line
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unrecognized command: {0}")]
    MalformedCommand(String),

    #[error("{0} needs an argument")]
    MissingArgument(&'static str),

    #[error("invalid argument for {command}: {value}")]
    InvalidArgument { command: &'static str, value: String },

    #[error(transparent)]
    Game(#[from] GameError),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let arg = (!rest.is_empty()).then(|| rest.to_string());

        match verb.to_ascii_lowercase().as_str() {
            "u1" => Ok(Command::U1),
            "info" => Ok(Command::Info),
            "options" => Ok(Command::Options),
            "newgame" => Ok(Command::NewGame(arg)),
            "play" => arg
                .map(Command::Play)
                .ok_or(CommandError::MissingArgument("play")),
            "pass" => Ok(Command::Pass),
            "validmoves" => Ok(Command::ValidMoves),
            "bestmove" => parse_budget(rest).map(Command::BestMove),
            "undo" => parse_undo(rest).map(Command::Undo),
            "exit" | "quit" => Ok(Command::Exit),
            _ => Err(CommandError::MalformedCommand(line.to_string())),
        }
    }
}

fn parse_undo(rest: &str) -> Result<u32, CommandError> {
    if rest.is_empty() {
        return Ok(1);
    }
    match rest.parse() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::InvalidArgument {
            command: "undo",
            value: rest.to_string(),
        }),
    }
}

/// `time <seconds>`, `time hh:mm:ss` or `depth <n>`; nothing means the default
fn parse_budget(rest: &str) -> Result<SearchBudget, CommandError> {
    let invalid = || CommandError::InvalidArgument {
        command: "bestmove",
        value: rest.to_string(),
    };

    let mut words = rest.split_whitespace();
    let kind = match words.next() {
        Some(kind) => kind.to_ascii_lowercase(),
        None => return Ok(SearchBudget::default()),
    };
    let value = words.next().ok_or(CommandError::MissingArgument("bestmove"))?;
    if words.next().is_some() {
        return Err(invalid());
    }

    match kind.as_str() {
        "time" => parse_duration(value).map(SearchBudget::Time).ok_or_else(invalid),
        "depth" => value.parse().map(SearchBudget::Depth).map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

fn parse_duration(value: &str) -> Option<Duration> {
    if !value.contains(':') {
        return value
            .parse::<f64>()
            .ok()
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok());
    }

    let parts: Vec<u64> = value
        .split(':')
        .map(|p| p.parse().ok())
        .collect::<Option<_>>()?;
    match parts.as_slice() {
        [h, m, s] if *m < 60 && *s < 60 => {
            let secs = h.checked_mul(3600)?.checked_add(m * 60 + s)?;
            Some(Duration::from_secs(secs))
        }
        _ => None,
    }
}
