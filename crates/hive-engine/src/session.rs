//! One UHP session: a game, a strategy and the command dispatcher.

use crate::protocol::{Command, CommandError};
use hive_core::{GameError, GameState, RandomStrategy, SearchBudget, Strategy};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Engine id reported by `info`
pub const ENGINE_ID: &str = concat!("id hive-engine v", env!("CARGO_PKG_VERSION"));
/// Expansion pieces this engine understands
pub const CAPABILITIES: &str = "Mosquito;Ladybug;Pillbug";

/// Owns the state of one client connection
pub struct Session {
    pub id: Uuid,
    game: GameState,
    strategy: Box<dyn Strategy>,
    closed: bool,
}

impl Session {
    pub fn new(strategy: Box<dyn Strategy>) -> Self {
        Self {
            id: Uuid::new_v4(),
            game: GameState::default(),
            strategy,
            closed: false,
        }
    }

    /// Session with a random strategy, seeded when `seed` is given
    pub fn with_seed(seed: Option<u64>) -> Self {
        let strategy = match seed {
            Some(seed) => RandomStrategy::with_seed(seed),
            None => RandomStrategy::new(),
        };
        Self::new(Box::new(strategy))
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Whether `exit` has been received
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Handle one line of input and return the response lines.
    ///
    /// Errors never escape: they are reported on the wire and the session
    /// keeps going.
    pub fn handle_line(&mut self, line: &str) -> Vec<String> {
        if line.trim().is_empty() {
            return Vec::new();
        }
        debug!(session = %self.id, command = line.trim(), "command");

        match line.parse::<Command>().and_then(|cmd| self.execute(cmd)) {
            Ok(lines) => lines,
            Err(CommandError::Game(GameError::UndoOnEmptyHistory)) => Vec::new(),
            Err(e) => {
                warn!(session = %self.id, command = line.trim(), error = %e, "command failed");
                let prefix = match &e {
                    CommandError::Game(GameError::IllegalMove(_)) => "invalidmove",
                    _ => "err",
                };
                vec![format!("{prefix} {e}"), "ok".to_string()]
            }
        }
    }

    fn execute(&mut self, command: Command) -> Result<Vec<String>, CommandError> {
        let lines = match command {
            Command::U1 | Command::Options => vec!["ok".to_string()],
            Command::Info => vec![
                ENGINE_ID.to_string(),
                CAPABILITIES.to_string(),
                "ok".to_string(),
            ],
            Command::NewGame(game_string) => {
                self.game = GameState::from_game_string(game_string.as_deref().unwrap_or(""))?;
                info!(session = %self.id, game = %self.game.game_string(), "new game");
                vec![self.game.game_string().to_string(), "ok".to_string()]
            }
            Command::Play(move_string) => {
                let mv = self.game.decode(&move_string)?;
                let canonical = self.game.move_string(&mv);
                self.game.apply(mv)?;
                self.log_if_finished();
                vec![canonical, "ok".to_string()]
            }
            Command::Pass => {
                let mv = self.game.play(hive_core::uhp::PASS)?;
                vec![self.game.move_string(&mv), "ok".to_string()]
            }
            Command::ValidMoves => {
                let moves = self.game.valid_move_strings();
                if moves.is_empty() {
                    vec![hive_core::uhp::PASS.to_string()]
                } else {
                    vec![moves.join(";")]
                }
            }
            Command::BestMove(budget) => vec![self.best_move(budget)?],
            Command::Undo(count) => {
                self.game.undo()?;
                for _ in 1..count {
                    if self.game.undo().is_err() {
                        break;
                    }
                }
                vec!["ok".to_string()]
            }
            Command::Exit => {
                info!(session = %self.id, "session closed by client");
                self.closed = true;
                Vec::new()
            }
        };
        Ok(lines)
    }

    fn best_move(&mut self, budget: SearchBudget) -> Result<String, CommandError> {
        let mv = self
            .strategy
            .best_move(&self.game, budget)
            .ok_or(GameError::GameOver)?;
        debug!(session = %self.id, strategy = self.strategy.name(), ?budget, ?mv, "best move");
        Ok(self.game.move_string(&mv))
    }

    fn log_if_finished(&self) {
        if self.game.is_finished() {
            info!(session = %self.id, status = %self.game.status, "game over");
        }
    }
}
