use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shakmaty::Color;

use crate::error::CoreError;

/// One of the two sides of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::White => "white",
            Side::Black => "black",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" | "w" => Ok(Side::White),
            "black" | "b" => Ok(Side::Black),
            _ => Err(CoreError::UnknownSide(s.to_string())),
        }
    }
}

impl From<Color> for Side {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

/// A single half-move as it was committed to the board. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub move_number: u32, // full-move number of the position before the move
    pub played_by: Side,
    pub san: String,
    pub uci: String,
    pub fen_before: String,
    pub fen_after: String,
    pub timestamp: DateTime<Utc>,
}

impl MoveRecord {
    pub fn new(
        move_number: u32,
        played_by: Side,
        san: String,
        uci: String,
        fen_before: String,
        fen_after: String,
    ) -> Self {
        Self {
            move_number,
            played_by,
            san,
            uci,
            fen_before,
            fen_after,
            timestamp: Utc::now(),
        }
    }
}

/// Index of the first record whose `fen_before` does not match the previous
/// record's `fen_after`, if the chain is broken anywhere.
pub fn broken_link(moves: &[MoveRecord]) -> Option<usize> {
    moves
        .windows(2)
        .position(|pair| pair[0].fen_after != pair[1].fen_before)
        .map(|i| i + 1)
}

/// Persisted form of a finished (or abandoned) game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameExport {
    pub outcome: String,
    pub moves: Vec<MoveRecord>,
}

impl GameExport {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CoreError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fen_before: &str, fen_after: &str) -> MoveRecord {
        MoveRecord::new(
            1,
            Side::White,
            "e4".into(),
            "e2e4".into(),
            fen_before.into(),
            fen_after.into(),
        )
    }

    #[test]
    fn test_side_parsing() {
        assert_eq!("White".parse::<Side>().unwrap(), Side::White);
        assert_eq!(" black ".parse::<Side>().unwrap(), Side::Black);
        assert!("red".parse::<Side>().is_err());
        assert_eq!(Side::White.opposite(), Side::Black);
    }

    #[test]
    fn test_side_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Side::Black).unwrap(), "\"black\"");
    }

    #[test]
    fn test_broken_link() {
        let chain = vec![record("a", "b"), record("b", "c"), record("c", "d")];
        assert_eq!(broken_link(&chain), None);

        let broken = vec![record("a", "b"), record("x", "c")];
        assert_eq!(broken_link(&broken), Some(1));
        assert_eq!(broken_link(&[]), None);
    }

    #[test]
    fn test_export_keys() {
        let export = GameExport {
            outcome: "Game in progress".into(),
            moves: vec![record("a", "b")],
        };
        let value = serde_json::to_value(&export).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["outcome"], "Game in progress");

        let mv = value["moves"][0].as_object().unwrap();
        let mut keys: Vec<&str> = mv.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["fen_after", "fen_before", "move_number", "played_by", "san", "timestamp", "uci"]
        );
        assert_eq!(mv["played_by"], "white");
    }
}
