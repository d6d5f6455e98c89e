//! A side's pool of pieces not yet placed.

use crate::piece::{Bug, Color, Piece};
use serde::{Deserialize, Serialize};

/// Pieces still in hand, kept in canonical order so that taking a piece and
/// giving it back restores an identical hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    pub color: Color,
    pieces: Vec<Piece>,
}

impl Hand {
    /// Create a hand holding `pieces`
    pub fn new(color: Color, pieces: impl IntoIterator<Item = Piece>) -> Self {
        let mut pieces: Vec<Piece> = pieces.into_iter().collect();
        pieces.sort();
        pieces.dedup();
        Self { color, pieces }
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn contains(&self, piece: Piece) -> bool {
        self.pieces.binary_search(&piece).is_ok()
    }

    pub fn has_bug(&self, bug: Bug) -> bool {
        self.pieces.iter().any(|p| p.bug == bug)
    }

    /// Take `piece` out of the hand. Returns false if it was not there.
    pub fn take(&mut self, piece: Piece) -> bool {
        match self.pieces.binary_search(&piece) {
            Ok(i) => {
                self.pieces.remove(i);
                true
            }
            Err(_) => false,
        }
    }

    /// Put `piece` back in its canonical slot
    pub fn give_back(&mut self, piece: Piece) {
        if let Err(i) = self.pieces.binary_search(&piece) {
            self.pieces.insert(i, piece);
        }
    }

    /// The lowest-numbered piece of each bug still in hand.
    ///
    /// Pieces of one bug are placed in numeric order, so these are the only
    /// candidates for a placement.
    pub fn placeable(&self) -> Vec<Piece> {
        let mut result: Vec<Piece> = Vec::new();
        for piece in &self.pieces {
            if result.last().map_or(true, |p| p.bug != piece.bug) {
                result.push(*piece);
            }
        }
        result
    }
}
