//! Post-game phase heuristic from material on the board.

use std::fmt;

use coach_core::rules;
use serde::{Deserialize, Serialize};
use shakmaty::{Board, Position, Role};

/// 28+ pieces still on the board
const OPENING_MIN_PIECES: usize = 28;
const ENDGAME_MAX_PIECES: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    Opening,
    Middlegame,
    Endgame,
}

impl GamePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            GamePhase::Opening => "Opening",
            GamePhase::Middlegame => "Middlegame",
            GamePhase::Endgame => "Endgame",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase of a board: Opening at 28+ pieces, Endgame at 12 or fewer pieces or
/// once both queens are gone, Middlegame otherwise.
pub fn phase_of_board(board: &Board) -> GamePhase {
    let pieces = board.occupied().count();
    let queens = board.by_role(Role::Queen).count();

    if pieces >= OPENING_MIN_PIECES {
        GamePhase::Opening
    } else if pieces <= ENDGAME_MAX_PIECES || queens == 0 {
        GamePhase::Endgame
    } else {
        GamePhase::Middlegame
    }
}

/// Phase of a FEN position, `None` when the FEN does not parse.
pub fn infer_game_phase(fen: &str) -> Option<GamePhase> {
    rules::parse_fen(fen).ok().map(|pos| phase_of_board(pos.board()))
}
