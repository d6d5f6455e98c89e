//! Piece identities.
//!
//! A piece is identified by its color, its bug type and, for bugs that come
//! in multiples, an instance number. Identities are fixed for the whole game.

use crate::error::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    /// The other side
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Single-letter prefix used in piece tokens
    pub fn prefix(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    fn from_prefix(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => f.write_str("White"),
            Color::Black => f.write_str("Black"),
        }
    }
}

/// Bug type. The declaration order is the canonical hand order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Bug {
    Queen,
    Spider,
    Beetle,
    Grasshopper,
    Ant,
    Mosquito,
    Ladybug,
    Pillbug,
}

impl Bug {
    pub const ALL: [Bug; 8] = [
        Bug::Queen,
        Bug::Spider,
        Bug::Beetle,
        Bug::Grasshopper,
        Bug::Ant,
        Bug::Mosquito,
        Bug::Ladybug,
        Bug::Pillbug,
    ];

    /// How many pieces of this bug each side owns
    pub fn count(self) -> u8 {
        match self {
            Bug::Queen | Bug::Mosquito | Bug::Ladybug | Bug::Pillbug => 1,
            Bug::Spider | Bug::Beetle => 2,
            Bug::Grasshopper | Bug::Ant => 3,
        }
    }

    /// UHP letter for this bug
    pub fn letter(self) -> char {
        match self {
            Bug::Queen => 'Q',
            Bug::Spider => 'S',
            Bug::Beetle => 'B',
            Bug::Grasshopper => 'G',
            Bug::Ant => 'A',
            Bug::Mosquito => 'M',
            Bug::Ladybug => 'L',
            Bug::Pillbug => 'P',
        }
    }

    fn from_letter(c: char) -> Option<Bug> {
        Bug::ALL.into_iter().find(|b| b.letter() == c)
    }

    /// Whether the bug is part of an expansion rather than the base set
    pub fn is_expansion(self) -> bool {
        matches!(self, Bug::Mosquito | Bug::Ladybug | Bug::Pillbug)
    }
}

/// A single piece identity, e.g. `wS1` or `bQ`.
///
/// `index` is 1-based; bugs with a single instance always use 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub bug: Bug,
    pub index: u8,
}

impl Piece {
    pub const fn new(color: Color, bug: Bug, index: u8) -> Self {
        Self { color, bug, index }
    }

    /// Every instance of every bug for one side, in canonical order
    pub fn full_set(color: Color) -> impl Iterator<Item = Piece> {
        Bug::ALL
            .into_iter()
            .flat_map(move |bug| (1..=bug.count()).map(move |i| Piece::new(color, bug, i)))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.color.prefix(), self.bug.letter())?;
        if self.bug.count() > 1 {
            write!(f, "{}", self.index)?;
        }
        Ok(())
    }
}

impl FromStr for Piece {
    type Err = GameError;

    /// Parse a UHP piece token `<w|b><Q|S|B|G|A|M|L|P><digit?>`.
    ///
    /// Tokens that break the grammar are `MalformedMoveString`; tokens that fit
    /// the grammar but name no real piece (`wQ2`, `bA4`, `wS`) are `UnknownPiece`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || GameError::MalformedMoveString(s.to_string());
        let mut chars = s.chars();

        let color = chars.next().and_then(Color::from_prefix).ok_or_else(malformed)?;
        let bug = chars.next().and_then(Bug::from_letter).ok_or_else(malformed)?;
        let index = match chars.next() {
            None => None,
            Some(d) => Some(d.to_digit(10).ok_or_else(malformed)? as u8),
        };
        if chars.next().is_some() {
            return Err(malformed());
        }

        let index = match (bug.count(), index) {
            (1, None) => 1,
            (n, Some(i)) if n > 1 && (1..=n).contains(&i) => i,
            _ => return Err(GameError::UnknownPiece(s.to_string())),
        };
        Ok(Piece::new(color, bug, index))
    }
}
