//! Move classification and the score-delta sign convention.
//! Pure functions only, no engine or board access.

use std::fmt;

use coach_core::Side;
use serde::{Deserialize, Serialize};

/// Best-move placeholder when the evaluator had nothing to suggest
pub const UNKNOWN_MOVE: &str = "?";

/// Classification thresholds (absolute centipawn change)
const THRESHOLD_BEST: u32 = 10;
const THRESHOLD_GOOD: u32 = 50;
const THRESHOLD_INACCURACY: u32 = 100;
const THRESHOLD_MISTAKE: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveClass {
    Best,
    Good,
    Inaccuracy,
    Mistake,
    Blunder,
}

impl MoveClass {
    pub fn as_str(self) -> &'static str {
        match self {
            MoveClass::Best => "Best",
            MoveClass::Good => "Good",
            MoveClass::Inaccuracy => "Inaccuracy",
            MoveClass::Mistake => "Mistake",
            MoveClass::Blunder => "Blunder",
        }
    }

    /// Counts toward accuracy.
    pub fn is_accurate(self) -> bool {
        matches!(self, MoveClass::Best | MoveClass::Good)
    }

    /// Eligible as a critical moment.
    pub fn is_critical(self) -> bool {
        matches!(self, MoveClass::Mistake | MoveClass::Blunder)
    }
}

impl fmt::Display for MoveClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify_move(score_delta: i32) -> MoveClass {
    let loss = score_delta.unsigned_abs();
    if loss < THRESHOLD_BEST {
        MoveClass::Best
    } else if loss < THRESHOLD_GOOD {
        MoveClass::Good
    } else if loss < THRESHOLD_INACCURACY {
        MoveClass::Inaccuracy
    } else if loss < THRESHOLD_MISTAKE {
        MoveClass::Mistake
    } else {
        MoveClass::Blunder
    }
}

/// Evaluation change from the mover's point of view. Both evals are White-relative;
/// a positive result is always good for `mover`.
pub fn score_delta(eval_before: i32, eval_after: i32, mover: Side) -> i32 {
    let raw = eval_after.saturating_sub(eval_before);
    match mover {
        Side::White => raw,
        Side::Black => raw.saturating_neg(),
    }
}

/// Round to one decimal place, ties to even (`6.25` -> `6.2`, `18.75` -> `18.8`).
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Engine verdict on one played move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveEvaluation {
    pub move_san: String,
    pub fen_before: String,
    pub fen_after: String,
    /// White-relative centipawns before the move
    pub eval_before: i32,
    /// White-relative centipawns after the move
    pub eval_after: i32,
    pub best_move_san: String,
    /// Mover-relative change, positive = good for the mover
    pub score_delta: i32,
    pub played_by: Side,
}

impl MoveEvaluation {
    pub fn classification(&self) -> MoveClass {
        classify_move(self.score_delta)
    }

    pub fn centipawn_loss(&self) -> u32 {
        self.score_delta.unsigned_abs()
    }
}
