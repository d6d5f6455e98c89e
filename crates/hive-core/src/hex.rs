//! Hex coordinate system using axial coordinates (q, r).
//!
//! The Hive board is unbounded: any `(q, r)` pair is a valid cell. Every cell
//! has exactly six neighbors, visited in the fixed clockwise order
//! East, SouthEast, SouthWest, West, NorthWest, NorthEast.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six directions from a hex to an adjacent hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Right
    East,
    /// Bottom-right
    SouthEast,
    /// Bottom-left
    SouthWest,
    /// Left
    West,
    /// Top-left
    NorthWest,
    /// Top-right
    NorthEast,
}

impl Direction {
    /// All directions in clockwise order starting from East
    pub const ALL: [Direction; 6] = [
        Direction::East,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
        Direction::NorthEast,
    ];

    /// Axial offset `(dq, dr)` of this direction
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::SouthEast => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (0, -1),
            Direction::NorthEast => (1, -1),
        }
    }

    /// Direction matching an axial offset, if it is a unit step
    pub fn from_offset(dq: i32, dr: i32) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| d.offset() == (dq, dr))
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Next direction clockwise
    pub fn clockwise(self) -> Direction {
        Direction::ALL[(self.index() + 1) % 6]
    }

    /// Next direction counter-clockwise
    pub fn counter_clockwise(self) -> Direction {
        Direction::ALL[(self.index() + 5) % 6]
    }

    /// The direction pointing the other way
    pub fn opposite(self) -> Direction {
        Direction::ALL[(self.index() + 3) % 6]
    }
}

/// Axial coordinate for hex grid.
///
/// In axial coordinates:
/// - `q` increases going east (right)
/// - `r` increases going southeast
/// - The third coordinate `s` (not stored) satisfies: q + r + s = 0
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct HexCoord {
    /// Column (increases going east)
    pub q: i32,
    /// Row (increases going southeast)
    pub r: i32,
}

impl HexCoord {
    /// The anchor cell of the first placement
    pub const ORIGIN: HexCoord = HexCoord::new(0, 0);

    /// Create a new hex coordinate
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The implicit third coordinate (s = -q - r)
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// The six neighboring hexes in clockwise order starting from East
    pub fn neighbors(&self) -> [HexCoord; 6] {
        Direction::ALL.map(|dir| self.neighbor(dir))
    }

    /// Get the neighbor in a specific direction
    pub fn neighbor(&self, direction: Direction) -> HexCoord {
        let (dq, dr) = direction.offset();
        HexCoord::new(self.q + dq, self.r + dr)
    }

    /// Direction from `self` to `other`, if they are adjacent
    pub fn direction_to(&self, other: &HexCoord) -> Option<Direction> {
        Direction::from_offset(other.q - self.q, other.r - self.r)
    }

    /// Whether `other` is one of the six neighbors
    pub fn is_adjacent(&self, other: &HexCoord) -> bool {
        self.direction_to(other).is_some()
    }

    /// The two hexes adjacent to both `self` and `other`.
    ///
    /// Returns `None` when the two hexes are not neighbors.
    pub fn shared_neighbors(&self, other: &HexCoord) -> Option<[HexCoord; 2]> {
        let dir = self.direction_to(other)?;
        Some([
            self.neighbor(dir.counter_clockwise()),
            self.neighbor(dir.clockwise()),
        ])
    }

    /// Distance to another hex (in hex steps)
    pub fn distance_to(&self, other: &HexCoord) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        ((dq + dr + ds) / 2) as u32
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}
