//! Movement generators, one per bug type.
//!
//! Every generator works on a board from which the moving piece has already
//! been lifted (see [`Board::lifted`]), so the piece never blocks its own
//! path or counts as contact for itself. The shared preconditions (the piece
//! is on top of its stack, and lifting it keeps the hive connected) are
//! checked once in [`piece_destinations`].

use crate::board::Board;
use crate::hex::{Direction, HexCoord};
use crate::piece::{Bug, Piece};
use std::collections::{BTreeSet, HashSet, VecDeque};

/// A piece lifted by a Pillbug (or a Mosquito copying one) and dropped on
/// the other side of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relocation {
    pub piece: Piece,
    pub from: HexCoord,
    pub to: HexCoord,
}

/// Destinations for the piece on top of `origin`.
///
/// Empty when the cell is empty or when lifting the piece would split the
/// hive. Never contains `origin` itself.
pub fn piece_destinations(board: &Board, origin: HexCoord) -> BTreeSet<HexCoord> {
    let Some(piece) = board.top(origin) else {
        return BTreeSet::new();
    };
    if !board.is_connected(Some(origin)) {
        return BTreeSet::new();
    }

    let lifted = board.lifted(origin);
    let mut targets = bug_destinations(piece.bug, &lifted, origin);
    targets.remove(&origin);
    targets
}

/// Destinations for a piece moving as `bug` from `origin` on a lifted board.
pub fn bug_destinations(bug: Bug, lifted: &Board, origin: HexCoord) -> BTreeSet<HexCoord> {
    match bug {
        Bug::Queen | Bug::Pillbug => queen_moves(lifted, origin),
        Bug::Beetle => beetle_moves(lifted, origin),
        Bug::Grasshopper => grasshopper_moves(lifted, origin),
        Bug::Spider => spider_moves(lifted, origin),
        Bug::Ant => ant_moves(lifted, origin),
        Bug::Ladybug => ladybug_moves(lifted, origin),
        Bug::Mosquito => mosquito_moves(lifted, origin),
    }
}

/// Contact rule: the destination must touch the hive through something
/// other than the cell being left, unless part of a stack stays behind.
fn keeps_contact(board: &Board, from: HexCoord, to: HexCoord) -> bool {
    board.occupied(from) || board.count_occupied_neighbors(to, Some(from)) > 0
}

/// Single ground-level steps from `from` that pass the gate and contact rules
fn slide_steps(board: &Board, from: HexCoord) -> impl Iterator<Item = HexCoord> + '_ {
    from.neighbors().into_iter().filter(move |to| {
        !board.occupied(*to) && board.can_slide(from, *to) && keeps_contact(board, from, *to)
    })
}

fn queen_moves(board: &Board, origin: HexCoord) -> BTreeSet<HexCoord> {
    slide_steps(board, origin).collect()
}

fn beetle_moves(board: &Board, origin: HexCoord) -> BTreeSet<HexCoord> {
    // Climbing onto a stack is never gated
    let climbs = origin.neighbors().into_iter().filter(|n| board.occupied(*n));
    climbs.chain(slide_steps(board, origin)).collect()
}

fn grasshopper_moves(board: &Board, origin: HexCoord) -> BTreeSet<HexCoord> {
    let mut targets = BTreeSet::new();
    for dir in Direction::ALL {
        let mut current = origin.neighbor(dir);
        if !board.occupied(current) {
            continue;
        }
        while board.occupied(current) {
            current = current.neighbor(dir);
        }
        targets.insert(current);
    }
    targets
}

fn spider_moves(board: &Board, origin: HexCoord) -> BTreeSet<HexCoord> {
    let mut targets = BTreeSet::new();
    let mut queue = VecDeque::from([vec![origin]]);

    while let Some(path) = queue.pop_front() {
        let Some(&last) = path.last() else { continue };
        if path.len() == 4 {
            targets.insert(last);
            continue;
        }
        for next in slide_steps(board, last) {
            if !path.contains(&next) {
                let mut extended = path.clone();
                extended.push(next);
                queue.push_back(extended);
            }
        }
    }

    targets
}

fn ant_moves(board: &Board, origin: HexCoord) -> BTreeSet<HexCoord> {
    let mut visited = HashSet::from([origin]);
    let mut queue = VecDeque::from([origin]);
    let mut targets = BTreeSet::new();

    while let Some(current) = queue.pop_front() {
        for next in slide_steps(board, current) {
            if visited.insert(next) {
                targets.insert(next);
                queue.push_back(next);
            }
        }
    }

    targets
}

fn ladybug_moves(board: &Board, origin: HexCoord) -> BTreeSet<HexCoord> {
    let mut targets = BTreeSet::new();
    let on_hive = |c: &HexCoord| *c != origin && board.occupied(*c);

    for first in origin.neighbors().into_iter().filter(on_hive) {
        for second in first.neighbors().into_iter().filter(on_hive) {
            for last in second.neighbors() {
                if last != origin && !board.occupied(last) {
                    targets.insert(last);
                }
            }
        }
    }

    targets
}

fn mosquito_moves(board: &Board, origin: HexCoord) -> BTreeSet<HexCoord> {
    // Something left underneath means the Mosquito is up on the hive
    if board.occupied(origin) {
        return beetle_moves(board, origin);
    }

    let copied: BTreeSet<Bug> = origin
        .neighbors()
        .into_iter()
        .filter_map(|n| board.top(n))
        .map(|p| p.bug)
        .filter(|bug| *bug != Bug::Mosquito)
        .collect();

    copied
        .into_iter()
        .flat_map(|bug| bug_destinations(bug, board, origin))
        .collect()
}

/// Whether the piece on top of `actor` may use the Pillbug's special ability
fn has_pillbug_power(board: &Board, actor: HexCoord) -> bool {
    if board.stack_height(actor) != 1 {
        return false;
    }
    match board.top(actor).map(|p| p.bug) {
        Some(Bug::Pillbug) => true,
        Some(Bug::Mosquito) => actor
            .neighbors()
            .into_iter()
            .any(|n| board.top(n).is_some_and(|p| p.bug == Bug::Pillbug)),
        _ => false,
    }
}

/// Pieces the Pillbug-powered piece at `actor` can move over itself.
///
/// The target must be a single piece next to `actor` that can leave without
/// splitting the hive and is not `frozen` (the piece moved last ply). It
/// climbs onto `actor` and drops to an empty neighbor of `actor`; neither
/// hop may squeeze between two stacks of height two or more.
pub fn pillbug_relocations(
    board: &Board,
    actor: HexCoord,
    frozen: Option<Piece>,
) -> Vec<Relocation> {
    let mut relocations = Vec::new();
    if !has_pillbug_power(board, actor) || board.top(actor) == frozen {
        return relocations;
    }

    for from in actor.neighbors() {
        let Some(piece) = board.top(from) else { continue };
        if board.stack_height(from) != 1
            || Some(piece) == frozen
            || !board.is_connected(Some(from))
            || !board.can_pass_at_height(from, actor, 2)
        {
            continue;
        }

        let lifted = board.lifted(from);
        for to in actor.neighbors() {
            if to != from && !lifted.occupied(to) && lifted.can_pass_at_height(actor, to, 2) {
                relocations.push(Relocation { piece, from, to });
            }
        }
    }

    relocations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Color;

    fn h(q: i32, r: i32) -> HexCoord {
        HexCoord::new(q, r)
    }

    /// Build a board from `(q, r, token)` triples, placed in order
    fn board_from(cells: &[(i32, i32, &str)]) -> Board {
        let mut board = Board::new();
        for (q, r, token) in cells {
            board.place(token.parse().unwrap(), h(*q, *r));
        }
        board
    }

    fn set(coords: &[(i32, i32)]) -> BTreeSet<HexCoord> {
        coords.iter().map(|(q, r)| h(*q, *r)).collect()
    }

    #[test]
    fn test_queen_slides_around_neighbor() {
        let board = board_from(&[(0, 0, "wQ"), (1, 0, "bQ")]);
        // Only the two cells sharing an edge with bQ keep contact
        assert_eq!(piece_destinations(&board, h(0, 0)), set(&[(0, 1), (1, -1)]));
    }

    #[test]
    fn test_queen_blocked_by_gate() {
        // wQ sits in a pocket whose only opening is gated
        let board = board_from(&[
            (0, 0, "wQ"),
            (1, 0, "wA1"),
            (0, 1, "wA2"),
            (1, -1, "wA3"),
            (-1, 1, "bA1"),
            (0, -1, "bA2"),
        ]);
        // (-1,0) has shared neighbors (-1,1) and (0,-1), both occupied
        assert!(piece_destinations(&board, h(0, 0)).is_empty());
    }

    #[test]
    fn test_pinned_piece_has_no_moves() {
        // wA1 sits between two pieces; lifting it splits the hive
        let board = board_from(&[(0, 0, "wQ"), (1, 0, "wA1"), (2, 0, "bQ")]);
        assert!(!board.is_connected(Some(h(1, 0))));
        assert!(piece_destinations(&board, h(1, 0)).is_empty());
    }

    #[test]
    fn test_empty_cell_has_no_moves() {
        let board = board_from(&[(0, 0, "wQ")]);
        assert!(piece_destinations(&board, h(5, 5)).is_empty());
    }

    #[test]
    fn test_beetle_climbs_and_slides() {
        let board = board_from(&[(0, 0, "wB1"), (1, 0, "bQ")]);
        assert_eq!(
            piece_destinations(&board, h(0, 0)),
            set(&[(1, 0), (0, 1), (1, -1)])
        );
    }

    #[test]
    fn test_beetle_on_stack_can_step_down_anywhere() {
        let board = board_from(&[(0, 0, "wQ"), (1, 0, "bQ"), (0, 0, "bB1")]);
        let targets = piece_destinations(&board, h(0, 0));
        // Every neighbor: five ground cells plus climbing onto bQ
        assert_eq!(targets.len(), 6);
        assert!(targets.contains(&h(1, 0)));
        assert!(targets.contains(&h(-1, 0)));
    }

    #[test]
    fn test_grasshopper_jumps_over_line() {
        let board = board_from(&[(0, 0, "wG1"), (1, 0, "wQ"), (2, 0, "bQ"), (0, 1, "bA1")]);
        let targets = piece_destinations(&board, h(0, 0));
        assert_eq!(targets, set(&[(3, 0), (0, 2)]));
        for t in &targets {
            // Never the immediate neighbor
            assert!(h(0, 0).distance_to(t) >= 2);
        }
    }

    #[test]
    fn test_spider_moves_exactly_three() {
        // Straight line: spider at one end of wQ - bQ
        let board = board_from(&[(-1, 0, "wS1"), (0, 0, "wQ"), (1, 0, "bQ")]);
        let targets = piece_destinations(&board, h(-1, 0));
        assert_eq!(targets, set(&[(2, -1), (1, 1)]));
    }

    #[test]
    fn test_ant_floods_the_perimeter() {
        let board = board_from(&[(-1, 0, "wA1"), (0, 0, "wQ"), (1, 0, "bQ")]);
        let targets = piece_destinations(&board, h(-1, 0));
        // Perimeter of a two-cell hive has 8 cells, one of them the origin
        assert_eq!(targets.len(), 7);
        assert!(!targets.contains(&h(-1, 0)));
    }

    #[test]
    fn test_ant_cannot_enter_closed_pocket() {
        // Ring around (0,0) with one gap that is gated
        let board = board_from(&[
            (1, 0, "wQ"),
            (0, 1, "bQ"),
            (-1, 1, "wA2"),
            (-1, 0, "bA1"),
            (0, -1, "bA2"),
            (3, 0, "wA1"),
            (2, 0, "wS1"),
        ]);
        // (0,0) is enclosed on five sides; the gap at (1,-1) leads in,
        // but entering (0,0) from (1,-1) passes between (1,0) and (0,-1)
        let targets = piece_destinations(&board, h(3, 0));
        assert!(!targets.contains(&h(0, 0)));
    }

    #[test]
    fn test_ladybug_climbs_twice_then_descends() {
        let board = board_from(&[(0, 0, "wL"), (1, 0, "wQ"), (2, 0, "bQ")]);
        let targets = piece_destinations(&board, h(0, 0));
        // Over wQ then bQ, then down to any empty neighbor of bQ
        assert!(targets.contains(&h(3, 0)));
        assert!(targets.contains(&h(2, -1)));
        assert!(targets.contains(&h(1, 1)));
        assert!(!targets.contains(&h(0, 0)));
        for t in &targets {
            assert!(!board.occupied(*t));
        }
    }

    #[test]
    fn test_ladybug_needs_two_pieces_to_walk_on() {
        let board = board_from(&[(0, 0, "wL"), (1, 0, "wQ")]);
        assert!(piece_destinations(&board, h(0, 0)).is_empty());
    }

    #[test]
    fn test_mosquito_copies_neighbors() {
        let board = board_from(&[(0, 0, "wM"), (1, 0, "bG1"), (0, 1, "bQ")]);
        let targets = piece_destinations(&board, h(0, 0));
        // Grasshopper jumps
        assert!(targets.contains(&h(2, 0)));
        assert!(targets.contains(&h(0, 2)));
        // Queen slides
        assert!(targets.contains(&h(1, -1)));
        assert!(targets.contains(&h(-1, 1)));
    }

    #[test]
    fn test_mosquito_next_to_mosquito_only_is_stuck() {
        let board = board_from(&[(0, 0, "wM"), (1, 0, "bM")]);
        assert!(piece_destinations(&board, h(0, 0)).is_empty());
    }

    #[test]
    fn test_mosquito_on_stack_moves_as_beetle() {
        let board = board_from(&[(0, 0, "wQ"), (1, 0, "bQ"), (0, 0, "wM")]);
        assert_eq!(piece_destinations(&board, h(0, 0)).len(), 6);
    }

    #[test]
    fn test_pillbug_moves_like_queen() {
        let board = board_from(&[(0, 0, "wP"), (1, 0, "bQ")]);
        assert_eq!(piece_destinations(&board, h(0, 0)), set(&[(0, 1), (1, -1)]));
    }

    #[test]
    fn test_pillbug_relocates_neighbor() {
        let board = board_from(&[(0, 0, "wP"), (1, 0, "bQ"), (-1, 0, "bA1"), (2, 0, "wQ")]);
        let relocations = pillbug_relocations(&board, h(0, 0), None);
        // bA1 is free to go to any of the four empty neighbors of wP
        let moved: Vec<_> = relocations
            .iter()
            .filter(|r| r.piece.to_string() == "bA1")
            .map(|r| r.to)
            .collect();
        assert_eq!(moved.len(), 4);
        assert!(!moved.contains(&h(-1, 0)));
        // bQ pins wQ to the hive, so it cannot be lifted
        assert!(relocations.iter().all(|r| r.piece.to_string() != "bQ"));
    }

    #[test]
    fn test_pillbug_cannot_move_frozen_piece() {
        let board = board_from(&[(0, 0, "wP"), (-1, 0, "bA1")]);
        let frozen: Piece = "bA1".parse().unwrap();
        assert!(pillbug_relocations(&board, h(0, 0), Some(frozen)).is_empty());
        assert!(!pillbug_relocations(&board, h(0, 0), None).is_empty());
    }

    #[test]
    fn test_mosquito_borrows_pillbug_power() {
        let board = board_from(&[(0, 0, "wM"), (1, 0, "wP"), (-1, 0, "bA1")]);
        let relocations = pillbug_relocations(&board, h(0, 0), None);
        assert!(relocations.iter().any(|r| r.piece.to_string() == "bA1"));
        // Plain pieces have no such power
        let board = board_from(&[(0, 0, "wQ"), (-1, 0, "bA1")]);
        assert!(pillbug_relocations(&board, h(0, 0), None).is_empty());
    }

    #[test]
    fn test_pillbug_cannot_lift_stacked_piece() {
        let mut board = board_from(&[(0, 0, "wP"), (-1, 0, "bA1")]);
        board.place(Piece::new(Color::Black, Bug::Beetle, 1), h(-1, 0));
        assert!(pillbug_relocations(&board, h(0, 0), None).is_empty());
    }

    #[test]
    fn test_pillbug_cannot_squeeze_between_tall_stacks() {
        // (0,-1) and (-1,1) are the two cells shared by wP and bA1
        let mut board = board_from(&[(0, 0, "wP"), (-1, 0, "bA1"), (0, -1, "wQ"), (-1, 1, "bQ")]);
        let ant: Piece = "bA1".parse().unwrap();
        assert!(pillbug_relocations(&board, h(0, 0), None)
            .iter()
            .any(|r| r.piece == ant));

        board.place("bB1".parse().unwrap(), h(0, -1));
        board.place("wB1".parse().unwrap(), h(-1, 1));
        assert!(pillbug_relocations(&board, h(0, 0), None)
            .iter()
            .all(|r| r.piece != ant));
    }
}
