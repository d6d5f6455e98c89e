//! Hive rules engine
//!
//! This crate provides the core rules of the board game Hive and the
//! Universal Hive Protocol (UHP) text formats:
//! - Axial hex coordinates and adjacency
//! - Board stacks with slide and one-hive connectivity checks
//! - Placement and per-bug movement generators, including the Mosquito,
//!   Ladybug and Pillbug expansions
//! - Game state machine with apply and undo
//! - UHP move strings and game strings
//!
//! # Architecture
//!
//! The core performs no I/O. A front end (see the `hive-engine` binary)
//! owns one [`GameState`] per session and calls into it line by line.
//!
//! # Modules
//!
//! - [`hex`]: Coordinate system and directions
//! - [`piece`]: Colors, bug types and piece identities
//! - [`board`]: Stacks, slide rule and connectivity
//! - [`hand`]: Pieces not yet placed
//! - [`placement`]: Where pieces may enter the hive
//! - [`movegen`]: Where pieces on the board may go
//! - [`uhp`]: Move string and game string codec
//! - [`game`]: Game state machine
//! - [`bot`]: Move selection strategies

pub mod board;
pub mod bot;
pub mod error;
pub mod game;
pub mod hand;
pub mod hex;
pub mod movegen;
pub mod piece;
pub mod placement;
pub mod uhp;

// Re-export commonly used types
pub use board::Board;
pub use bot::{RandomStrategy, SearchBudget, Strategy};
pub use error::GameError;
pub use game::{GameState, Move};
pub use hand::Hand;
pub use hex::{Direction, HexCoord};
pub use piece::{Bug, Color, Piece};
pub use uhp::{GameStatus, GameString, GameType};
