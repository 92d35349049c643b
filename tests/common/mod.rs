//! Shared helpers for integration tests: scripted stand-ins for the engine
//! and the text-generation backend.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use coach_analysis::{AnalysisError, Evaluation, PositionEvaluator};
use coach_core::{GameSession, MoveRecord, Side};
use coach_llm::{GenerationError, TextGenerator};

/// Evaluator that answers from a FEN -> centipawn table.
#[derive(Clone, Default)]
pub struct ScriptedEvaluator {
    scores: HashMap<String, i32>,
    best_moves: HashMap<String, String>,
    default_score: Option<i32>,
}

impl ScriptedEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score unknown positions with `cp` instead of failing.
    pub fn with_default(mut self, cp: i32) -> Self {
        self.default_score = Some(cp);
        self
    }

    pub fn score(mut self, fen: &str, cp: i32) -> Self {
        self.scores.insert(fen.to_string(), cp);
        self
    }

    pub fn best(mut self, fen: &str, san: &str) -> Self {
        self.best_moves.insert(fen.to_string(), san.to_string());
        self
    }
}

#[async_trait]
impl PositionEvaluator for ScriptedEvaluator {
    async fn evaluate(&mut self, fen: &str, _depth: u32) -> Result<Evaluation, AnalysisError> {
        self.scores
            .get(fen)
            .copied()
            .or(self.default_score)
            .map(Evaluation::from_centipawns)
            .ok_or_else(|| AnalysisError::EvaluatorUnavailable(format!("no score for {fen}")))
    }

    async fn best_move(&mut self, fen: &str, _depth: u32) -> Result<Option<String>, AnalysisError> {
        Ok(self.best_moves.get(fen).cloned())
    }
}

/// Generator that returns a fixed reply (or is offline) and keeps the prompts.
pub struct ScriptedGenerator {
    reply: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn offline() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn generate(&self, prompt: &str, _max_tokens: u32) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply
            .clone()
            .ok_or_else(|| GenerationError::Unavailable("offline".into()))
    }
}

/// Play a list of UCI moves from the start, alternating sides, and return the log.
pub fn play_moves(player_side: Side, moves: &[&str]) -> GameSession {
    let mut session = GameSession::new(player_side);
    session.new_game();
    for uci in moves {
        let result = if session.is_player_turn() {
            session.apply_player_move(uci).map(|_| ())
        } else {
            session.apply_engine_move(uci).map(|_| ())
        };
        result.unwrap_or_else(|e| panic!("move {uci} rejected: {e}"));
    }
    session
}

pub fn history(session: &GameSession) -> Vec<MoveRecord> {
    session.history().to_vec()
}
