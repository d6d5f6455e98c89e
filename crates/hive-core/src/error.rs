use crate::hex::HexCoord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the rules engine and the UHP codec.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    /// The token does not match the UHP move grammar
    #[error("Malformed move string: {0}")]
    MalformedMoveString(String),

    /// Well-formed piece token naming a piece that is not part of the game
    #[error("Unknown piece: {0}")]
    UnknownPiece(String),

    /// Syntactically valid move that breaks a placement or movement rule
    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Nothing to undo")]
    UndoOnEmptyHistory,

    #[error("No piece at {0}")]
    NotOccupied(HexCoord),

    #[error("Invalid game string: {0}")]
    InvalidGameString(String),

    #[error("Game is over")]
    GameOver,
}
