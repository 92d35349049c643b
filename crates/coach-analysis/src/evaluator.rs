//! The Position Evaluator seam: anything that can score a position and
//! suggest a move. The UCI engine is one implementation; tests script others.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Magnitude every mate score collapses to.
pub const MATE_SCORE: i32 = 10_000;

/// A position score, always from White's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Centipawns, positive = White is better. Mates are `±MATE_SCORE`.
    pub centipawns: i32,
    pub is_mate: bool,
    /// Moves to mate, positive = White mates.
    pub mate_distance: Option<i32>,
}

impl Evaluation {
    pub fn from_centipawns(cp: i32) -> Self {
        Self {
            centipawns: cp,
            is_mate: false,
            mate_distance: None,
        }
    }

    /// Mate in `distance` moves for White (`distance > 0`) or Black (`distance < 0`).
    pub fn from_mate(distance: i32) -> Self {
        Self {
            centipawns: if distance > 0 { MATE_SCORE } else { -MATE_SCORE },
            is_mate: true,
            mate_distance: Some(distance),
        }
    }

    /// Convert a UCI score, which is relative to the side to move.
    /// `mate 0` means the side to move is already mated.
    pub fn from_side_to_move(
        cp: Option<i32>,
        mate: Option<i32>,
        white_to_move: bool,
    ) -> Option<Self> {
        if let Some(m) = mate {
            let mover_wins = m > 0;
            let white_wins = mover_wins == white_to_move;
            Some(Self {
                centipawns: if white_wins { MATE_SCORE } else { -MATE_SCORE },
                is_mate: true,
                mate_distance: Some(if white_to_move { m } else { -m }),
            })
        } else {
            cp.map(|c| Self::from_centipawns(if white_to_move { c } else { -c }))
        }
    }
}

#[async_trait]
pub trait PositionEvaluator: Send {
    /// Score the position (FEN) searched to `depth`.
    async fn evaluate(&mut self, fen: &str, depth: u32) -> Result<Evaluation, AnalysisError>;

    /// Preferred move in SAN, `None` when the position has no legal moves.
    async fn best_move(&mut self, fen: &str, depth: u32) -> Result<Option<String>, AnalysisError>;
}
