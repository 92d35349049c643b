//! Core error types

use thiserror::Error;

use crate::game_data::Side;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("Malformed move: {0}")]
    MalformedMove(String),

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Unknown side: {0}")]
    UnknownSide(String),

    #[error("Game has not been started")]
    NotStarted,

    #[error("Game is already over")]
    GameOver,

    #[error("It is not {0}'s turn")]
    NotYourTurn(Side),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
