//! Thin facade over shakmaty. All FEN/SAN/UCI handling goes through here.

use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Move, Position};

use crate::error::CoreError;
use crate::game_data::Side;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub fn parse_fen(fen: &str) -> Result<Chess, CoreError> {
    let parsed: Fen = fen
        .trim()
        .parse()
        .map_err(|e| CoreError::InvalidFen(format!("{fen}: {e}")))?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| CoreError::InvalidFen(format!("{fen}: {e}")))
}

pub fn side_to_move(fen: &str) -> Result<Side, CoreError> {
    Ok(parse_fen(fen)?.turn().into())
}

pub fn to_fen(pos: &Chess) -> String {
    Fen::from_position(pos, EnPassantMode::Legal).to_string()
}

/// Resolve a UCI string (e.g. `e2e4`, `e7e8q`) to a legal move in `pos`.
pub fn parse_uci_move(pos: &Chess, uci: &str) -> Result<Move, CoreError> {
    let parsed: UciMove = uci
        .trim()
        .parse()
        .map_err(|_| CoreError::MalformedMove(uci.to_string()))?;
    parsed
        .to_move(pos)
        .map_err(|_| CoreError::IllegalMove(uci.to_string()))
}

pub fn to_uci(mv: &Move) -> String {
    mv.to_uci(CastlingMode::Standard).to_string()
}

pub fn apply(pos: &Chess, mv: &Move) -> Chess {
    let mut next = pos.clone();
    next.play_unchecked(mv.clone());
    next
}

/// SAN with the `+`/`#` suffix, e.g. `Qxf7#`.
pub fn san_plus(pos: &Chess, mv: &Move) -> String {
    let mut san = San::from_move(pos, mv.clone()).to_string();
    let after = apply(pos, mv);
    if after.is_checkmate() {
        san.push('#');
    } else if after.is_check() {
        san.push('+');
    }
    san
}

/// Convert an engine's UCI move for the position given as FEN into SAN.
pub fn uci_to_san(fen: &str, uci: &str) -> Result<String, CoreError> {
    let pos = parse_fen(fen)?;
    let mv = parse_uci_move(&pos, uci)?;
    Ok(san_plus(&pos, &mv))
}

/// FEN without the move clocks: positions equal under this key count as repetitions.
pub fn repetition_key(fen: &str) -> String {
    fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
}

pub fn legal_moves_uci(pos: &Chess) -> Vec<String> {
    pos.legal_moves().iter().map(to_uci).collect()
}
