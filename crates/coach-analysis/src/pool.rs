//! Evaluator sessions shared across concurrent analysis work, and the
//! background entry points used by the interactive game loop.
//!
//! A session is never used by two searches at once: each one sits behind its
//! own mutex, and work is assigned round-robin by move index.

use std::sync::Arc;

use coach_core::{MoveRecord, Side};
use futures::future::try_join_all;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::analyzer::{analyze_game, evaluate_move};
use crate::error::AnalysisError;
use crate::evaluator::PositionEvaluator;
use crate::report::GameReport;
use crate::stockfish::StockfishEngine;

pub struct EnginePool<E> {
    sessions: Vec<Arc<Mutex<E>>>,
}

impl<E: PositionEvaluator> EnginePool<E> {
    pub fn new(sessions: Vec<E>) -> Self {
        Self {
            sessions: sessions
                .into_iter()
                .map(|s| Arc::new(Mutex::new(s)))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Session that handles move `index`.
    pub fn session(&self, index: usize) -> Option<Arc<Mutex<E>>> {
        if self.sessions.is_empty() {
            return None;
        }
        Some(self.sessions[index % self.sessions.len()].clone())
    }
}

impl EnginePool<StockfishEngine> {
    /// Start `size` engine processes (at least one).
    pub async fn spawn(path: &str, size: usize) -> Result<Self, AnalysisError> {
        let size = size.max(1);
        info!(size, "Creating Stockfish engine pool");
        let mut engines = Vec::with_capacity(size);
        for engine_id in 0..size {
            let engine = StockfishEngine::new(path).await?;
            info!(engine_id, "Stockfish engine ready");
            engines.push(engine);
        }
        Ok(Self::new(engines))
    }

    pub async fn shutdown(self) {
        for session in self.sessions {
            session.lock().await.quit().await;
        }
    }
}

/// Analyze a game with every session of the pool working at once.
/// Results come back in move order; the first failure fails the analysis.
pub async fn analyze_parallel<E: PositionEvaluator>(
    pool: &EnginePool<E>,
    moves: &[MoveRecord],
    player_side: Side,
    depth: u32,
) -> Result<GameReport, AnalysisError> {
    info!(moves = moves.len(), sessions = pool.len(), depth, "Starting parallel analysis");

    let jobs = moves.iter().enumerate().map(|(i, record)| {
        let session = pool.session(i);
        async move {
            let session = session.ok_or_else(|| {
                AnalysisError::EvaluatorUnavailable("engine pool has no sessions".into())
            })?;
            let mut engine = session.lock().await;
            evaluate_move(&mut *engine, record, depth).await
        }
    });
    let evaluated = try_join_all(jobs).await?;

    Ok(GameReport::new(evaluated, moves.len(), player_side))
}

/// Run the sequential analysis on a background task that owns its evaluator.
/// The move log is moved in, so nothing outside can observe it half-read.
pub fn spawn_analysis<E>(
    mut evaluator: E,
    moves: Vec<MoveRecord>,
    player_side: Side,
    depth: u32,
) -> JoinHandle<Result<GameReport, AnalysisError>>
where
    E: PositionEvaluator + 'static,
{
    tokio::spawn(async move { analyze_game(&mut evaluator, &moves, player_side, depth).await })
}

/// Await a background analysis, folding a panicked or cancelled task into
/// [`AnalysisError::Task`].
pub async fn join_analysis(
    handle: JoinHandle<Result<GameReport, AnalysisError>>,
) -> Result<GameReport, AnalysisError> {
    match handle.await {
        Ok(result) => result,
        Err(e) => {
            warn!(error = %e, "Background analysis did not finish");
            Err(AnalysisError::Task(e.to_string()))
        }
    }
}
