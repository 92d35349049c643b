//! Game report: per-player aggregation over evaluated moves.

use coach_core::Side;
use serde::{Deserialize, Serialize};

use crate::analysis::{round_to_tenth, MoveClass, MoveEvaluation};

/// Fixed-key summary of the player's performance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_player_moves: usize,
    pub blunders: usize,
    pub mistakes: usize,
    pub inaccuracies: usize,
    /// Formatted percentage, e.g. `"66.7%"`
    pub accuracy: String,
}

/// Complete analysis of one finished game. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameReport {
    pub evaluated_moves: Vec<MoveEvaluation>,
    pub total_moves: usize,
    pub player_side: Side,
}

impl GameReport {
    pub fn new(evaluated_moves: Vec<MoveEvaluation>, total_moves: usize, player_side: Side) -> Self {
        Self {
            evaluated_moves,
            total_moves,
            player_side,
        }
    }

    /// Moves made by the designated player, in game order.
    pub fn player_moves(&self) -> Vec<&MoveEvaluation> {
        self.evaluated_moves
            .iter()
            .filter(|m| m.played_by == self.player_side)
            .collect()
    }

    fn player_moves_classified(&self, class: MoveClass) -> Vec<&MoveEvaluation> {
        self.evaluated_moves
            .iter()
            .filter(|m| m.played_by == self.player_side && m.classification() == class)
            .collect()
    }

    pub fn blunders(&self) -> Vec<&MoveEvaluation> {
        self.player_moves_classified(MoveClass::Blunder)
    }

    pub fn mistakes(&self) -> Vec<&MoveEvaluation> {
        self.player_moves_classified(MoveClass::Mistake)
    }

    pub fn inaccuracies(&self) -> Vec<&MoveEvaluation> {
        self.player_moves_classified(MoveClass::Inaccuracy)
    }

    /// Share of player moves classified Best or Good, 0.0 with no player moves.
    pub fn accuracy_percentage(&self) -> f64 {
        let player_moves = self.player_moves();
        if player_moves.is_empty() {
            return 0.0;
        }
        let accurate = player_moves
            .iter()
            .filter(|m| m.classification().is_accurate())
            .count();
        round_to_tenth(accurate as f64 / player_moves.len() as f64 * 100.0)
    }

    pub fn summary_stats(&self) -> SummaryStats {
        SummaryStats {
            total_player_moves: self.player_moves().len(),
            blunders: self.blunders().len(),
            mistakes: self.mistakes().len(),
            inaccuracies: self.inaccuracies().len(),
            accuracy: format!("{:.1}%", self.accuracy_percentage()),
        }
    }

    /// The player's `n` worst Mistakes/Blunders, largest loss first.
    /// Equal losses keep game order.
    pub fn critical_moments(&self, n: usize) -> Vec<&MoveEvaluation> {
        let mut bad_moves: Vec<&MoveEvaluation> = self
            .player_moves()
            .into_iter()
            .filter(|m| m.classification().is_critical())
            .collect();
        // sort_by is stable
        bad_moves.sort_by(|a, b| b.centipawn_loss().cmp(&a.centipawn_loss()));
        bad_moves.truncate(n);
        bad_moves
    }
}
