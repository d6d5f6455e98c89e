//! Placement generator: which hand pieces may enter the hive, and where.

use crate::board::Board;
use crate::hand::Hand;
use crate::hex::HexCoord;
use crate::piece::{Bug, Piece};
use std::collections::BTreeSet;

/// Number of placements a side makes before its queen becomes mandatory
const QUEEN_DEADLINE: usize = 3;

/// Cells where the side owning `hand` may place a piece.
///
/// - empty board: only the origin
/// - the side's first placement: any empty cell touching the hive
/// - afterwards: empty cells touching a friendly piece and no enemy piece
pub fn placement_cells(board: &Board, hand: &Hand) -> BTreeSet<HexCoord> {
    if board.is_empty() {
        return BTreeSet::from([HexCoord::ORIGIN]);
    }

    let color = hand.color;
    let frontier = board
        .occupied_coords()
        .flat_map(|c| c.neighbors())
        .filter(|n| !board.occupied(*n));

    if board.count_color(color) == 0 {
        return frontier.collect();
    }

    frontier
        .filter(|c| board.touches_color(*c, color) && !board.touches_color(*c, color.opponent()))
        .collect()
}

/// Pieces from `hand` that may be placed this ply.
///
/// A side that has placed three pieces without its queen must place the
/// queen with its fourth.
pub fn placeable_pieces(board: &Board, hand: &Hand) -> Vec<Piece> {
    let mut pieces = hand.placeable();
    if board.count_color(hand.color) == QUEEN_DEADLINE && hand.has_bug(Bug::Queen) {
        pieces.retain(|p| p.bug == Bug::Queen);
    }
    pieces
}

/// Every legal `(piece, cell)` placement for the side owning `hand`
pub fn placements(board: &Board, hand: &Hand) -> Vec<(Piece, HexCoord)> {
    if hand.is_empty() {
        return Vec::new();
    }
    let cells = placement_cells(board, hand);
    placeable_pieces(board, hand)
        .into_iter()
        .flat_map(|piece| cells.iter().map(move |cell| (piece, *cell)))
        .collect()
}
