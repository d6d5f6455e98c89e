//! Move selection.
//!
//! The engine asks a [`Strategy`] for a move whenever the client sends
//! `bestmove`. Strategies only see the public game state and choose among
//! [`GameState::legal_moves`], so a stronger search can replace the random
//! placeholder without touching move generation.

use crate::game::{GameState, Move};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long a strategy may think
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchBudget {
    /// Wall-clock limit. The best move found so far is returned when it runs out.
    Time(Duration),
    /// Search depth in plies
    Depth(u32),
}

impl Default for SearchBudget {
    fn default() -> Self {
        SearchBudget::Time(Duration::from_secs(5))
    }
}

/// Something that can pick a move for the side to move
pub trait Strategy: Send {
    /// Short name reported in logs
    fn name(&self) -> &'static str;

    /// Choose one of the legal moves, or `None` once the game is over
    fn best_move(&mut self, game: &GameState, budget: SearchBudget) -> Option<Move>;
}

/// Picks uniformly among the legal moves
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn best_move(&mut self, game: &GameState, _budget: SearchBudget) -> Option<Move> {
        game.legal_moves().choose(&mut self.rng).copied()
    }
}
