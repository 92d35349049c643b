//! A single game between the player and the engine opponent.
//!
//! The session owns the authoritative position and the Move Record Log. Any
//! board shown to the user is a projection of [`GameSession::position`].

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use shakmaty::{Chess, Position};
use tracing::debug;

use crate::error::CoreError;
use crate::game_data::{GameExport, MoveRecord, Side};
use crate::pgn;
use crate::rules;

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    SeventyfiveMoves,
    FivefoldRepetition,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Termination::Checkmate => "Checkmate",
            Termination::Stalemate => "Stalemate",
            Termination::InsufficientMaterial => "Insufficient Material",
            Termination::SeventyfiveMoves => "Seventyfive Moves",
            Termination::FivefoldRepetition => "Fivefold Repetition",
        };
        f.write_str(name)
    }
}

pub struct GameSession {
    position: Chess,
    player_side: Side,
    history: Vec<MoveRecord>,
    repetitions: HashMap<String, u32>,
    started: bool,
}

impl GameSession {
    /// Create a session; no moves are accepted until [`GameSession::new_game`].
    pub fn new(player_side: Side) -> Self {
        Self {
            position: Chess::default(),
            player_side,
            history: Vec::new(),
            repetitions: HashMap::new(),
            started: false,
        }
    }

    /// Reset board and history for a fresh game.
    pub fn new_game(&mut self) {
        self.position = Chess::default();
        self.history.clear();
        self.repetitions.clear();
        self.repetitions
            .insert(rules::repetition_key(&rules::to_fen(&self.position)), 1);
        self.started = true;
    }

    pub fn player_side(&self) -> Side {
        self.player_side
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    pub fn fen(&self) -> String {
        rules::to_fen(&self.position)
    }

    pub fn turn(&self) -> Side {
        self.position.turn().into()
    }

    pub fn is_player_turn(&self) -> bool {
        self.turn() == self.player_side
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.history.last()
    }

    pub fn legal_moves_uci(&self) -> Vec<String> {
        rules::legal_moves_uci(&self.position)
    }

    pub fn termination(&self) -> Option<Termination> {
        let pos = &self.position;
        if pos.is_checkmate() {
            Some(Termination::Checkmate)
        } else if pos.is_stalemate() {
            Some(Termination::Stalemate)
        } else if pos.is_insufficient_material() {
            Some(Termination::InsufficientMaterial)
        } else if pos.halfmoves() >= 150 {
            Some(Termination::SeventyfiveMoves)
        } else if self.current_repetitions() >= 5 {
            Some(Termination::FivefoldRepetition)
        } else {
            None
        }
    }

    pub fn is_over(&self) -> bool {
        self.termination().is_some()
    }

    /// Human-readable result, e.g. `White wins — Checkmate`.
    pub fn outcome_description(&self) -> String {
        match self.termination() {
            None => "Game in progress".to_string(),
            Some(Termination::Checkmate) => {
                let winner = match self.turn().opposite() {
                    Side::White => "White",
                    Side::Black => "Black",
                };
                format!("{winner} wins — {}", Termination::Checkmate)
            }
            Some(draw) => format!("Draw — {draw}"),
        }
    }

    /// Apply the human player's move given in UCI notation.
    pub fn apply_player_move(&mut self, uci: &str) -> Result<&MoveRecord, CoreError> {
        self.commit(uci, self.player_side)
    }

    /// Apply the engine opponent's move given in UCI notation.
    pub fn apply_engine_move(&mut self, uci: &str) -> Result<&MoveRecord, CoreError> {
        self.commit(uci, self.player_side.opposite())
    }

    pub fn to_pgn_string(&self) -> String {
        pgn::to_movetext(&self.history)
    }

    pub fn export(&self) -> GameExport {
        GameExport {
            outcome: self.outcome_description(),
            moves: self.history.clone(),
        }
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), CoreError> {
        self.export().save(path)
    }

    fn current_repetitions(&self) -> u32 {
        let key = rules::repetition_key(&self.fen());
        self.repetitions.get(&key).copied().unwrap_or(0)
    }

    /// Validate and play a move. On any error the session is left untouched.
    fn commit(&mut self, uci: &str, mover: Side) -> Result<&MoveRecord, CoreError> {
        if !self.started {
            return Err(CoreError::NotStarted);
        }
        if self.is_over() {
            return Err(CoreError::GameOver);
        }
        if self.turn() != mover {
            return Err(CoreError::NotYourTurn(mover));
        }

        let mv = rules::parse_uci_move(&self.position, uci)?;
        let fen_before = rules::to_fen(&self.position);
        let move_number = self.position.fullmoves().get();
        let san = rules::san_plus(&self.position, &mv);

        self.position = rules::apply(&self.position, &mv);
        let fen_after = rules::to_fen(&self.position);
        *self
            .repetitions
            .entry(rules::repetition_key(&fen_after))
            .or_insert(0) += 1;

        debug!(move_number, side = %mover, san = %san, "Move committed");

        self.history.push(MoveRecord::new(
            move_number,
            mover,
            san,
            rules::to_uci(&mv),
            fen_before,
            fen_after,
        ));
        Ok(&self.history[self.history.len() - 1])
    }
}
