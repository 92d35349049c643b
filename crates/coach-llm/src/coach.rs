//! High-level coaching interface: generated text when the backend delivers,
//! rule-based text otherwise.

use coach_analysis::{GameReport, MoveClass, MoveEvaluation};
use serde::Serialize;
use tracing::warn;

use crate::backend::{Backend, LlmConfig, TextGenerator};
use crate::error::GenerationError;
use crate::fallback;
use crate::phase::GamePhase;
use crate::prompts::{build_game_summary_prompt, build_move_feedback_prompt};

const MOVE_FEEDBACK_TOKENS: u32 = 512;
const SUMMARY_TOKENS: u32 = 800;
/// Critical moments explained after a game
pub const EXPLAINED_MOMENTS: usize = 3;

/// Explanation of one critical moment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MomentFeedback {
    #[serde(rename = "move")]
    pub move_san: String,
    pub classification: MoveClass,
    pub best_move: String,
    pub centipawn_loss: u32,
    pub phase: GamePhase,
    pub explanation: String,
}

pub struct ChessCoach<G = Backend> {
    generator: G,
    player_elo: u32,
}

impl ChessCoach<Backend> {
    pub fn from_config(config: &LlmConfig) -> Result<Self, GenerationError> {
        Ok(Self::new(Backend::from_config(config)?, config.player_elo))
    }
}

impl<G: TextGenerator> ChessCoach<G> {
    pub fn new(generator: G, player_elo: u32) -> Self {
        Self {
            generator,
            player_elo,
        }
    }

    pub fn player_elo(&self) -> u32 {
        self.player_elo
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    async fn generate_or_log(&self, prompt: &str, max_tokens: u32) -> Option<String> {
        match self.generator.generate(prompt, max_tokens).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(backend = self.generator.name(), error = %e, "Falling back to rule-based coaching");
                None
            }
        }
    }

    /// Coaching feedback for one move. Never fails.
    pub async fn explain_move(&self, mv: &MoveEvaluation, phase: GamePhase) -> String {
        let prompt = build_move_feedback_prompt(mv, phase, self.player_elo);
        match self.generate_or_log(&prompt, MOVE_FEEDBACK_TOKENS).await {
            Some(text) => text,
            None => fallback::explain_move(mv, phase),
        }
    }

    /// Post-game summary. Never fails.
    pub async fn generate_summary(&self, report: &GameReport, outcome: &str) -> String {
        let prompt = build_game_summary_prompt(report, self.player_elo, outcome);
        match self.generate_or_log(&prompt, SUMMARY_TOKENS).await {
            Some(text) => text,
            None => fallback::game_summary(report, outcome),
        }
    }

    /// Feedback for the player's worst moments, worst first.
    pub async fn explain_critical_moments(&self, report: &GameReport) -> Vec<MomentFeedback> {
        let mut results = Vec::new();
        for mv in report.critical_moments(EXPLAINED_MOMENTS) {
            let phase = fallback::phase_or_default(&mv.fen_before);
            let explanation = self.explain_move(mv, phase).await;
            results.push(MomentFeedback {
                move_san: mv.move_san.clone(),
                classification: mv.classification(),
                best_move: mv.best_move_san.clone(),
                centipawn_loss: mv.centipawn_loss(),
                phase,
                explanation,
            });
        }
        results
    }
}
