//! Core game state machine.
//!
//! `GameState` owns the board, both hands, the ply counter and the move
//! history. It merges the placement and movement generators into the legal
//! move set, applies moves after checking them against that set, and undoes
//! them by inverting the last history entry.

use crate::board::Board;
use crate::error::GameError;
use crate::hand::Hand;
use crate::hex::HexCoord;
use crate::movegen::{piece_destinations, pillbug_relocations};
use crate::piece::{Bug, Color, Piece};
use crate::placement::placements;
use crate::uhp::{format_move, GameStatus, GameString, GameType, MoveString, Target};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One committed ply. The history is a list of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// A piece leaves the hand and enters the hive
    Place { piece: Piece, to: HexCoord },
    /// A piece already in the hive changes cell
    Movement {
        piece: Piece,
        from: HexCoord,
        to: HexCoord,
    },
    /// Nothing else was legal
    Pass,
}

impl Move {
    /// The piece this move puts somewhere, if any
    pub fn piece(&self) -> Option<Piece> {
        match self {
            Move::Place { piece, .. } | Move::Movement { piece, .. } => Some(*piece),
            Move::Pass => None,
        }
    }
}

/// The complete game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Which expansion pieces are in play
    pub game_type: GameType,
    /// The hive
    pub board: Board,
    pub white_hand: Hand,
    pub black_hand: Hand,
    /// Ply about to be played (starts at 1)
    pub ply: u32,
    /// Side to move
    pub active: Color,
    /// Derived from the board after every committed move
    pub status: GameStatus,
    history: Vec<Move>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameType::default())
    }
}

impl GameState {
    /// Create a new game with full hands
    pub fn new(game_type: GameType) -> Self {
        Self {
            game_type,
            board: Board::new(),
            white_hand: Hand::new(Color::White, game_type.roster(Color::White)),
            black_hand: Hand::new(Color::Black, game_type.roster(Color::Black)),
            ply: 1,
            active: Color::White,
            status: GameStatus::NotStarted,
            history: Vec::new(),
        }
    }

    /// Rebuild a game by replaying a UHP game string.
    ///
    /// An empty string, or a bare game type, gives a fresh game. The status
    /// and turn in the header must agree with the replayed moves.
    pub fn from_game_string(s: &str) -> Result<Self, GameError> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::default());
        }
        if !s.contains(';') {
            return Ok(Self::new(s.parse()?));
        }

        let header: GameString = s.parse()?;
        let mut game = Self::new(header.game_type);
        for mv in &header.moves {
            game.play(mv)?;
        }

        let replayed = game.game_string();
        if (replayed.status, replayed.turn_color, replayed.turn_number)
            != (header.status, header.turn_color, header.turn_number)
        {
            return Err(GameError::InvalidGameString(format!(
                "header says {};{}[{}] but moves give {};{}[{}]",
                header.status,
                header.turn_color,
                header.turn_number,
                replayed.status,
                replayed.turn_color,
                replayed.turn_number
            )));
        }
        Ok(game)
    }

    /// Canonical game string for the current state
    pub fn game_string(&self) -> GameString {
        GameString {
            game_type: self.game_type,
            status: self.status,
            turn_color: self.active,
            turn_number: self.turn_number(),
            moves: self.move_strings(),
        }
    }

    /// Full-move number shown in game strings
    pub fn turn_number(&self) -> u32 {
        (self.ply + 1) / 2
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn hand(&self, color: Color) -> &Hand {
        match color {
            Color::White => &self.white_hand,
            Color::Black => &self.black_hand,
        }
    }

    fn hand_mut(&mut self, color: Color) -> &mut Hand {
        match color {
            Color::White => &mut self.white_hand,
            Color::Black => &mut self.black_hand,
        }
    }

    /// Check if the game is finished
    pub fn is_finished(&self) -> bool {
        self.status.is_over()
    }

    pub fn queen_placed(&self, color: Color) -> bool {
        self.board.contains(Piece::new(color, Bug::Queen, 1))
    }

    /// The piece moved on the previous ply; it may not move this ply
    pub fn frozen_piece(&self) -> Option<Piece> {
        match self.history.last() {
            Some(Move::Movement { piece, .. }) => Some(*piece),
            _ => None,
        }
    }

    /// All legal moves for the side to move.
    ///
    /// When the game is running but nothing else is legal the result is the
    /// single pseudo-move `Pass`. A finished game has no legal moves.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_finished() {
            return Vec::new();
        }

        let mut moves: Vec<Move> = placements(&self.board, self.hand(self.active))
            .into_iter()
            .map(|(piece, to)| Move::Place { piece, to })
            .collect();

        if self.queen_placed(self.active) {
            let mut seen = HashSet::new();
            let frozen = self.frozen_piece();

            for piece in self.game_type.roster(self.active) {
                if Some(piece) == frozen || !self.board.is_on_top(piece) {
                    continue;
                }
                let Some(from) = self.board.position_of(piece) else {
                    continue;
                };

                let own = piece_destinations(&self.board, from)
                    .into_iter()
                    .map(|to| Move::Movement { piece, from, to });
                let relocated = pillbug_relocations(&self.board, from, frozen)
                    .into_iter()
                    .map(|r| Move::Movement {
                        piece: r.piece,
                        from: r.from,
                        to: r.to,
                    });

                for mv in own.chain(relocated) {
                    if seen.insert(mv) {
                        moves.push(mv);
                    }
                }
            }
        }

        if moves.is_empty() {
            moves.push(Move::Pass);
        }
        moves
    }

    /// Legal moves rendered as UHP move strings
    pub fn valid_move_strings(&self) -> Vec<String> {
        self.legal_moves()
            .iter()
            .map(|mv| format_move(&self.board, mv))
            .collect()
    }

    /// Render a move against the current board
    pub fn move_string(&self, mv: &Move) -> String {
        format_move(&self.board, mv)
    }

    /// Turn a UHP move string into a move for the current position.
    ///
    /// Only checks that the string is well formed and refers to real pieces;
    /// rule checking happens in [`GameState::apply`].
    pub fn decode(&self, move_string: &str) -> Result<Move, GameError> {
        let (piece, target) = match move_string.parse::<MoveString>()? {
            MoveString::Pass => return Ok(Move::Pass),
            MoveString::Piece { piece, target } => (piece, target),
        };
        if !self.game_type.includes(piece.bug) {
            return Err(GameError::UnknownPiece(piece.to_string()));
        }
        if let Some(reference) = target_reference(&target) {
            if !self.game_type.includes(reference.bug) {
                return Err(GameError::UnknownPiece(reference.to_string()));
            }
        }

        if target == Target::Origin && !self.board.is_empty() {
            return Err(GameError::IllegalMove(format!(
                "{move_string}: only the first placement may omit a reference"
            )));
        }
        let to = target.resolve(&self.board)?;

        Ok(match self.board.position_of(piece) {
            Some(from) => Move::Movement { piece, from, to },
            None => Move::Place { piece, to },
        })
    }

    /// Decode and apply a UHP move string
    pub fn play(&mut self, move_string: &str) -> Result<Move, GameError> {
        let mv = self.decode(move_string)?;
        self.apply(mv)?;
        Ok(mv)
    }

    /// Apply a move after checking it against the legal move set
    pub fn apply(&mut self, mv: Move) -> Result<(), GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }
        if !self.legal_moves().contains(&mv) {
            return Err(GameError::IllegalMove(self.move_string(&mv)));
        }
        self.commit(mv)
    }

    fn commit(&mut self, mv: Move) -> Result<(), GameError> {
        match mv {
            Move::Place { piece, to } => {
                if !self.hand_mut(piece.color).take(piece) {
                    return Err(GameError::IllegalMove(format!("{piece} is not in hand")));
                }
                self.board.place(piece, to);
            }
            Move::Movement { from, to, .. } => {
                self.board.move_top(from, to)?;
            }
            Move::Pass => {}
        }

        self.history.push(mv);
        self.ply += 1;
        self.active = self.active.opponent();
        self.status = self.compute_status();
        Ok(())
    }

    /// Undo the last committed move.
    ///
    /// Fails with `UndoOnEmptyHistory`, leaving the state untouched, when
    /// nothing has been played.
    pub fn undo(&mut self) -> Result<Move, GameError> {
        let mv = *self.history.last().ok_or(GameError::UndoOnEmptyHistory)?;

        match mv {
            Move::Place { to, .. } => {
                let piece = self.board.remove_top(to)?;
                self.hand_mut(piece.color).give_back(piece);
            }
            Move::Movement { from, to, .. } => {
                self.board.move_top(to, from)?;
            }
            Move::Pass => {}
        }

        self.history.pop();
        self.ply -= 1;
        self.active = self.active.opponent();
        self.status = self.compute_status();
        Ok(mv)
    }

    fn queen_surrounded(&self, color: Color) -> bool {
        self.board
            .position_of(Piece::new(color, Bug::Queen, 1))
            .is_some_and(|c| self.board.count_occupied_neighbors(c, None) == 6)
    }

    fn compute_status(&self) -> GameStatus {
        if self.history.is_empty() {
            return GameStatus::NotStarted;
        }
        match (
            self.queen_surrounded(Color::White),
            self.queen_surrounded(Color::Black),
        ) {
            (true, true) => GameStatus::Draw,
            (true, false) => GameStatus::BlackWins,
            (false, true) => GameStatus::WhiteWins,
            (false, false) => GameStatus::InProgress,
        }
    }

    /// History as move strings, each rendered against the board it was
    /// played on
    fn move_strings(&self) -> Vec<String> {
        let mut board = Board::new();
        let mut strings = Vec::with_capacity(self.history.len());
        for mv in &self.history {
            strings.push(format_move(&board, mv));
            match *mv {
                Move::Place { piece, to } => board.place(piece, to),
                Move::Movement { from, to, .. } => {
                    if board.move_top(from, to).is_err() {
                        break;
                    }
                }
                Move::Pass => {}
            }
        }
        strings
    }
}

fn target_reference(target: &Target) -> Option<Piece> {
    match target {
        Target::Origin => None,
        Target::OnTop(reference) | Target::Beside { reference, .. } => Some(*reference),
    }
}
