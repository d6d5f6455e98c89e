//! Universal Hive Protocol codec.
//!
//! Move strings name the piece that moves, followed by where it ends up
//! relative to a piece already on the board:
//!
//! | token  | meaning              |
//! |--------|----------------------|
//! | `wQ-`  | east of wQ           |
//! | `-wQ`  | west of wQ           |
//! | `wQ\`  | south-east of wQ     |
//! | `\wQ`  | north-west of wQ     |
//! | `wQ/`  | north-east of wQ     |
//! | `/wQ`  | south-west of wQ     |
//! | `wQ`   | on top of wQ         |
//!
//! The first placement of a game has no reference and is the bare piece.
//! Game strings are `<GameType>;<Status>;<Color>[<Turn>];<move>;<move>...`.

use crate::board::Board;
use crate::error::GameError;
use crate::game::Move;
use crate::hex::{Direction, HexCoord};
use crate::piece::{Bug, Color, Piece};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Move string of the pseudo-move used when nothing else is legal
pub const PASS: &str = "pass";

/// Which side of the reference piece the symbol is written on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

const SYMBOLS: [char; 3] = ['-', '\\', '/'];

/// Symbol and side that encode a direction
pub fn direction_symbol(direction: Direction) -> (char, Side) {
    match direction {
        Direction::East => ('-', Side::Right),
        Direction::West => ('-', Side::Left),
        Direction::SouthEast => ('\\', Side::Right),
        Direction::NorthWest => ('\\', Side::Left),
        Direction::NorthEast => ('/', Side::Right),
        Direction::SouthWest => ('/', Side::Left),
    }
}

/// Direction encoded by a symbol written on `side` of the reference
pub fn symbol_direction(symbol: char, side: Side) -> Option<Direction> {
    Direction::ALL
        .into_iter()
        .find(|d| direction_symbol(*d) == (symbol, side))
}

/// Where a move string says the piece ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    /// First placement of the game
    Origin,
    /// Climbing onto the reference piece
    OnTop(Piece),
    /// Next to the reference piece
    Beside { reference: Piece, direction: Direction },
}

impl Target {
    /// Resolve against the current board.
    ///
    /// Fails with `IllegalMove` when the reference piece is not on the board.
    pub fn resolve(&self, board: &Board) -> Result<HexCoord, GameError> {
        let locate = |reference: Piece| {
            board
                .position_of(reference)
                .ok_or_else(|| GameError::IllegalMove(format!("{reference} is not on the board")))
        };
        match *self {
            Target::Origin => Ok(HexCoord::ORIGIN),
            Target::OnTop(reference) => locate(reference),
            Target::Beside {
                reference,
                direction,
            } => Ok(locate(reference)?.neighbor(direction)),
        }
    }
}

/// Syntactic form of a move string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveString {
    Pass,
    Piece { piece: Piece, target: Target },
}

impl FromStr for MoveString {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(PASS) {
            return Ok(MoveString::Pass);
        }

        let mut tokens = s.split_whitespace();
        let piece: Piece = tokens
            .next()
            .ok_or_else(|| GameError::MalformedMoveString(s.to_string()))?
            .parse()?;
        let target = match tokens.next() {
            None => Target::Origin,
            Some(token) => parse_relative(token)?,
        };
        if tokens.next().is_some() {
            return Err(GameError::MalformedMoveString(s.to_string()));
        }

        Ok(MoveString::Piece { piece, target })
    }
}

fn parse_relative(token: &str) -> Result<Target, GameError> {
    let malformed = || GameError::MalformedMoveString(token.to_string());

    let (symbol, side, reference) = match (token.chars().next(), token.chars().last()) {
        (Some(first), _) if SYMBOLS.contains(&first) => {
            (Some(first), Side::Left, &token[first.len_utf8()..])
        }
        (_, Some(last)) if SYMBOLS.contains(&last) => {
            (Some(last), Side::Right, &token[..token.len() - last.len_utf8()])
        }
        _ => (None, Side::Right, token),
    };
    if reference.chars().any(|c| SYMBOLS.contains(&c)) {
        return Err(malformed());
    }

    let reference: Piece = reference.parse()?;
    Ok(match symbol {
        None => Target::OnTop(reference),
        Some(symbol) => Target::Beside {
            reference,
            direction: symbol_direction(symbol, side).ok_or_else(malformed)?,
        },
    })
}

/// Render `mv` as a move string against the board it will be played on.
///
/// The reference is the top piece of the first occupied neighbor of the
/// destination in clockwise order, never the moving piece itself.
pub fn format_move(board: &Board, mv: &Move) -> String {
    let (piece, to, from) = match *mv {
        Move::Pass => return PASS.to_string(),
        Move::Place { piece, to } => (piece, to, None),
        Move::Movement { piece, from, to } => (piece, to, Some(from)),
    };

    if board.is_empty() {
        return piece.to_string();
    }
    if let Some(top) = board.top(to).filter(|top| *top != piece) {
        return format!("{piece} {top}");
    }

    for dir in Direction::ALL {
        let neighbor = to.neighbor(dir);
        let reference = if Some(neighbor) == from {
            // The piece underneath once the mover has left
            let stack = board.stack(neighbor);
            stack.len().checked_sub(2).map(|i| stack[i])
        } else {
            board.top(neighbor)
        };
        if let Some(reference) = reference {
            let (symbol, side) = direction_symbol(dir.opposite());
            return match side {
                Side::Left => format!("{piece} {symbol}{reference}"),
                Side::Right => format!("{piece} {reference}{symbol}"),
            };
        }
    }

    piece.to_string()
}

/// Which expansion pieces are in play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameType {
    pub mosquito: bool,
    pub ladybug: bool,
    pub pillbug: bool,
}

impl GameType {
    /// Base game without expansions
    pub const BASE: GameType = GameType {
        mosquito: false,
        ladybug: false,
        pillbug: false,
    };

    /// Whether pieces of `bug` take part in this game
    pub fn includes(&self, bug: Bug) -> bool {
        match bug {
            Bug::Mosquito => self.mosquito,
            Bug::Ladybug => self.ladybug,
            Bug::Pillbug => self.pillbug,
            _ => true,
        }
    }

    /// Starting pieces of one side
    pub fn roster(&self, color: Color) -> impl Iterator<Item = Piece> + '_ {
        Piece::full_set(color).filter(|p| self.includes(p.bug))
    }
}

impl Default for GameType {
    fn default() -> Self {
        Self {
            mosquito: true,
            ladybug: true,
            pillbug: true,
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Base")?;
        if *self != GameType::BASE {
            f.write_str("+")?;
            for bug in [Bug::Mosquito, Bug::Ladybug, Bug::Pillbug] {
                if self.includes(bug) {
                    write!(f, "{}", bug.letter())?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for GameType {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GameError::InvalidGameString(format!("unknown game type {s}"));
        let (base, expansions) = match s.split_once('+') {
            Some((base, expansions)) if !expansions.is_empty() => (base, expansions),
            Some(_) => return Err(invalid()),
            None => (s, ""),
        };
        if base != "Base" {
            return Err(invalid());
        }

        let mut game_type = GameType::BASE;
        for letter in expansions.chars() {
            let flag = match letter {
                'M' => &mut game_type.mosquito,
                'L' => &mut game_type.ladybug,
                'P' => &mut game_type.pillbug,
                _ => return Err(invalid()),
            };
            if *flag {
                return Err(invalid());
            }
            *flag = true;
        }
        Ok(game_type)
    }
}

/// Game progress as reported in game strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    NotStarted,
    InProgress,
    Draw,
    WhiteWins,
    BlackWins,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        matches!(
            self,
            GameStatus::Draw | GameStatus::WhiteWins | GameStatus::BlackWins
        )
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameStatus::NotStarted => "NotStarted",
            GameStatus::InProgress => "InProgress",
            GameStatus::Draw => "Draw",
            GameStatus::WhiteWins => "WhiteWins",
            GameStatus::BlackWins => "BlackWins",
        };
        f.write_str(s)
    }
}

impl FromStr for GameStatus {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NotStarted" => Ok(GameStatus::NotStarted),
            "InProgress" => Ok(GameStatus::InProgress),
            "Draw" => Ok(GameStatus::Draw),
            "WhiteWins" => Ok(GameStatus::WhiteWins),
            "BlackWins" => Ok(GameStatus::BlackWins),
            _ => Err(GameError::InvalidGameString(format!("unknown status {s}"))),
        }
    }
}

/// A full game transcript: header fields plus the move strings in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameString {
    pub game_type: GameType,
    pub status: GameStatus,
    pub turn_color: Color,
    pub turn_number: u32,
    pub moves: Vec<String>,
}

impl fmt::Display for GameString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{};{};{}[{}]",
            self.game_type, self.status, self.turn_color, self.turn_number
        )?;
        for mv in &self.moves {
            write!(f, ";{mv}")?;
        }
        Ok(())
    }
}

impl FromStr for GameString {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |what: &str| GameError::InvalidGameString(format!("{what} in {s}"));
        let mut fields = s.trim().split(';');

        let game_type: GameType = fields.next().unwrap_or_default().parse()?;
        let status: GameStatus = fields.next().ok_or_else(|| invalid("missing status"))?.parse()?;
        let turn = fields.next().ok_or_else(|| invalid("missing turn"))?;

        let (color, number) = turn
            .strip_suffix(']')
            .and_then(|t| t.split_once('['))
            .ok_or_else(|| invalid("malformed turn"))?;
        let turn_color = match color {
            "White" => Color::White,
            "Black" => Color::Black,
            _ => return Err(invalid("malformed turn color")),
        };
        let turn_number = number
            .parse()
            .map_err(|_| invalid("malformed turn number"))?;

        let moves = fields
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(String::from)
            .collect();

        Ok(GameString {
            game_type,
            status,
            turn_color,
            turn_number,
            moves,
        })
    }
}
