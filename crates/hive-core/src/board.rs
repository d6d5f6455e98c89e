//! Board representation.
//!
//! The board maps each occupied coordinate to a stack of pieces, bottom to
//! top. Only the top piece of a stack is active. This module also holds the
//! two physical rules every movement generator relies on:
//! - the gate rule (`can_slide`): a flat slide between adjacent cells is
//!   blocked when both cells adjacent to the pair are occupied
//! - the One Hive Rule (`is_connected`): occupied cells form one component

use crate::error::GameError;
use crate::hex::HexCoord;
use crate::piece::{Color, Piece};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// Stacks of pieces keyed by coordinate, plus a reverse index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Non-empty stacks, bottom to top
    stacks: HashMap<HexCoord, Vec<Piece>>,
    /// Where each placed piece currently sits
    positions: HashMap<Piece, HexCoord>,
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no piece has been placed
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.stacks.len()
    }

    /// All occupied cells, in no particular order
    pub fn occupied_coords(&self) -> impl Iterator<Item = HexCoord> + '_ {
        self.stacks.keys().copied()
    }

    pub fn occupied(&self, coord: HexCoord) -> bool {
        self.stacks.contains_key(&coord)
    }

    /// Number of pieces stacked at `coord` (0 when empty)
    pub fn stack_height(&self, coord: HexCoord) -> usize {
        self.stacks.get(&coord).map_or(0, Vec::len)
    }

    /// Pieces at `coord`, bottom to top
    pub fn stack(&self, coord: HexCoord) -> &[Piece] {
        self.stacks.get(&coord).map_or(&[], Vec::as_slice)
    }

    /// The active piece at `coord`
    pub fn top_piece(&self, coord: HexCoord) -> Result<Piece, GameError> {
        self.top(coord).ok_or(GameError::NotOccupied(coord))
    }

    /// The active piece at `coord`, if any
    pub fn top(&self, coord: HexCoord) -> Option<Piece> {
        self.stacks.get(&coord).and_then(|s| s.last().copied())
    }

    /// Where a piece sits, if it has been placed
    pub fn position_of(&self, piece: Piece) -> Option<HexCoord> {
        self.positions.get(&piece).copied()
    }

    pub fn contains(&self, piece: Piece) -> bool {
        self.positions.contains_key(&piece)
    }

    /// Number of pieces of `color` on the board, buried ones included
    pub fn count_color(&self, color: Color) -> usize {
        self.positions.keys().filter(|p| p.color == color).count()
    }

    /// Whether `piece` is on the board and not covered by another piece
    pub fn is_on_top(&self, piece: Piece) -> bool {
        self.position_of(piece)
            .is_some_and(|coord| self.top(coord) == Some(piece))
    }

    /// Count occupied neighbors of `coord`, skipping `excluding`.
    pub fn count_occupied_neighbors(&self, coord: HexCoord, excluding: Option<HexCoord>) -> usize {
        coord
            .neighbors()
            .into_iter()
            .filter(|n| Some(*n) != excluding && self.occupied(*n))
            .count()
    }

    /// Whether any neighbor of `coord` has a piece of `color` on top
    pub fn touches_color(&self, coord: HexCoord, color: Color) -> bool {
        coord
            .neighbors()
            .into_iter()
            .any(|n| self.top(n).is_some_and(|p| p.color == color))
    }

    /// Gate rule for a flat slide between two adjacent cells.
    ///
    /// Returns false when both cells adjacent to the pair are occupied, or
    /// when `from` and `to` are not neighbors.
    pub fn can_slide(&self, from: HexCoord, to: HexCoord) -> bool {
        match from.shared_neighbors(&to) {
            Some([a, b]) => !(self.occupied(a) && self.occupied(b)),
            None => false,
        }
    }

    /// Gate rule for movement above ground level.
    ///
    /// A piece travelling between `from` and `to` at `height` (1 = ground)
    /// is blocked when both shared neighbors are stacks at least that tall.
    pub fn can_pass_at_height(&self, from: HexCoord, to: HexCoord, height: usize) -> bool {
        match from.shared_neighbors(&to) {
            Some([a, b]) => !(self.stack_height(a) >= height && self.stack_height(b) >= height),
            None => false,
        }
    }

    /// One Hive check: are all occupied cells except `excluding` one
    /// connected component?
    ///
    /// Removing a piece from a stack taller than one never disconnects
    /// anything, so that case is answered without a search.
    pub fn is_connected(&self, excluding: Option<HexCoord>) -> bool {
        if self.stacks.is_empty() {
            return true;
        }
        if let Some(ex) = excluding {
            if self.stack_height(ex) > 1 {
                return true;
            }
        }

        let remaining = self
            .stacks
            .keys()
            .filter(|c| Some(**c) != excluding)
            .count();
        let Some(start) = self.stacks.keys().copied().find(|c| Some(*c) != excluding) else {
            return true;
        };

        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            for n in current.neighbors() {
                if Some(n) != excluding && self.occupied(n) && visited.insert(n) {
                    queue.push_back(n);
                }
            }
        }

        visited.len() == remaining
    }

    /// Put `piece` on top of the stack at `coord`
    pub fn place(&mut self, piece: Piece, coord: HexCoord) {
        self.stacks.entry(coord).or_default().push(piece);
        self.positions.insert(piece, coord);
    }

    /// Take the top piece off the stack at `coord`
    pub fn remove_top(&mut self, coord: HexCoord) -> Result<Piece, GameError> {
        let stack = self
            .stacks
            .get_mut(&coord)
            .ok_or(GameError::NotOccupied(coord))?;
        let piece = stack.pop().ok_or(GameError::NotOccupied(coord))?;
        if stack.is_empty() {
            self.stacks.remove(&coord);
        }
        self.positions.remove(&piece);
        Ok(piece)
    }

    /// Move the top piece of `from` onto the stack at `to`
    pub fn move_top(&mut self, from: HexCoord, to: HexCoord) -> Result<Piece, GameError> {
        let piece = self.remove_top(from)?;
        self.place(piece, to);
        Ok(piece)
    }

    /// A copy of the board with the top piece at `coord` lifted off.
    ///
    /// Movement generators search on this view so the moving piece never
    /// blocks a gate or counts as contact for itself.
    pub fn lifted(&self, coord: HexCoord) -> Board {
        let mut board = self.clone();
        if let Some(stack) = board.stacks.get_mut(&coord) {
            if let Some(piece) = stack.pop() {
                board.positions.remove(&piece);
            }
            if stack.is_empty() {
                board.stacks.remove(&coord);
            }
        }
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Bug;

    fn piece(color: Color, bug: Bug, index: u8) -> Piece {
        Piece::new(color, bug, index)
    }

    fn board_with(cells: &[(i32, i32)]) -> Board {
        let mut board = Board::new();
        for (i, (q, r)) in cells.iter().enumerate() {
            let p = piece(Color::White, Bug::Ant, (i % 3 + 1) as u8);
            let color = if i < 3 { Color::White } else { Color::Black };
            board.place(Piece { color, ..p }, HexCoord::new(*q, *r));
        }
        board
    }

    #[test]
    fn test_top_piece_on_empty_cell() {
        let board = Board::new();
        assert_eq!(
            board.top_piece(HexCoord::ORIGIN),
            Err(GameError::NotOccupied(HexCoord::ORIGIN))
        );
        assert_eq!(board.stack_height(HexCoord::ORIGIN), 0);
    }

    #[test]
    fn test_stacking_keeps_order() {
        let mut board = Board::new();
        let queen = piece(Color::White, Bug::Queen, 1);
        let beetle = piece(Color::Black, Bug::Beetle, 1);
        board.place(queen, HexCoord::ORIGIN);
        board.place(beetle, HexCoord::ORIGIN);

        assert_eq!(board.stack_height(HexCoord::ORIGIN), 2);
        assert_eq!(board.top_piece(HexCoord::ORIGIN), Ok(beetle));
        assert_eq!(board.stack(HexCoord::ORIGIN), &[queen, beetle]);
        assert!(!board.is_on_top(queen));

        let to = HexCoord::new(1, 0);
        assert_eq!(board.move_top(HexCoord::ORIGIN, to), Ok(beetle));
        assert_eq!(board.top_piece(HexCoord::ORIGIN), Ok(queen));
        assert_eq!(board.position_of(beetle), Some(to));
    }

    #[test]
    fn test_remove_last_piece_clears_cell() {
        let mut board = board_with(&[(0, 0)]);
        board.remove_top(HexCoord::ORIGIN).unwrap();
        assert!(board.is_empty());
        assert!(board.remove_top(HexCoord::ORIGIN).is_err());
    }

    #[test]
    fn test_can_slide_blocked_by_gate() {
        // Both shared neighbors of (0,0)->(1,0) are (1,-1) and (0,1)
        let board = board_with(&[(1, -1), (0, 1)]);
        assert!(!board.can_slide(HexCoord::ORIGIN, HexCoord::new(1, 0)));

        let board = board_with(&[(1, -1)]);
        assert!(board.can_slide(HexCoord::ORIGIN, HexCoord::new(1, 0)));
    }

    #[test]
    fn test_can_slide_is_symmetric() {
        let board = board_with(&[(0, 0), (1, -1), (0, 1), (-1, 1), (2, -1)]);
        for q in -3..=3 {
            for r in -3..=3 {
                let a = HexCoord::new(q, r);
                for b in a.neighbors() {
                    assert_eq!(board.can_slide(a, b), board.can_slide(b, a));
                }
            }
        }
    }

    #[test]
    fn test_can_slide_requires_adjacency() {
        let board = Board::new();
        assert!(!board.can_slide(HexCoord::ORIGIN, HexCoord::new(2, 0)));
    }

    #[test]
    fn test_connectivity_of_a_line() {
        let board = board_with(&[(0, 0), (1, 0), (2, 0)]);
        assert!(board.is_connected(None));
        // Removing the middle splits the line
        assert!(!board.is_connected(Some(HexCoord::new(1, 0))));
        // Removing an end does not
        assert!(board.is_connected(Some(HexCoord::new(2, 0))));
    }

    #[test]
    fn test_connectivity_of_a_ring() {
        let ring = HexCoord::ORIGIN.neighbors().map(|c| (c.q, c.r));
        let board = board_with(&ring);
        for c in HexCoord::ORIGIN.neighbors() {
            assert!(board.is_connected(Some(c)));
        }
    }

    #[test]
    fn test_connectivity_ignores_stacked_cells() {
        let mut board = board_with(&[(0, 0), (1, 0), (2, 0)]);
        board.place(piece(Color::Black, Bug::Beetle, 1), HexCoord::new(1, 0));
        assert!(board.is_connected(Some(HexCoord::new(1, 0))));
    }

    #[test]
    fn test_disconnected_board() {
        let board = board_with(&[(0, 0), (3, 0)]);
        assert!(!board.is_connected(None));
    }

    #[test]
    fn test_count_occupied_neighbors_excluding() {
        let board = board_with(&[(1, 0), (0, 1), (5, 5)]);
        assert_eq!(board.count_occupied_neighbors(HexCoord::ORIGIN, None), 2);
        assert_eq!(
            board.count_occupied_neighbors(HexCoord::ORIGIN, Some(HexCoord::new(1, 0))),
            1
        );
    }

    #[test]
    fn test_lifted_view() {
        let board = board_with(&[(0, 0), (1, 0)]);
        let lifted = board.lifted(HexCoord::ORIGIN);
        assert!(!lifted.occupied(HexCoord::ORIGIN));
        assert!(board.occupied(HexCoord::ORIGIN));
    }

    #[test]
    fn test_lifted_leaves_lower_pieces_and_ignores_empty_cells() {
        let mut board = Board::new();
        board.place(piece(Color::White, Bug::Queen, 1), HexCoord::ORIGIN);
        board.place(piece(Color::Black, Bug::Beetle, 1), HexCoord::ORIGIN);

        let lifted = board.lifted(HexCoord::ORIGIN);
        assert_eq!(lifted.stack(HexCoord::ORIGIN), &[piece(Color::White, Bug::Queen, 1)]);
        assert!(!lifted.contains(piece(Color::Black, Bug::Beetle, 1)));

        assert_eq!(board.lifted(HexCoord::new(4, 4)), board);
        assert!(Board::new().lifted(HexCoord::ORIGIN).is_empty());
    }
}
