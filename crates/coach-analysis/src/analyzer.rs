//! Core game analysis logic
//!
//! Walks the move log in order and asks the evaluator for three things per
//! move: the score before, the score after, and the preferred move before.

use coach_core::{MoveRecord, Side};
use tracing::{debug, info};

use crate::analysis::{score_delta, MoveEvaluation, UNKNOWN_MOVE};
use crate::error::AnalysisError;
use crate::evaluator::PositionEvaluator;
use crate::report::GameReport;

/// Search depth used when the caller has no preference
pub const DEFAULT_ANALYSIS_DEPTH: u32 = 18;

/// Evaluate a single played move.
pub async fn evaluate_move<E>(
    evaluator: &mut E,
    record: &MoveRecord,
    depth: u32,
) -> Result<MoveEvaluation, AnalysisError>
where
    E: PositionEvaluator + ?Sized,
{
    let before = evaluator.evaluate(&record.fen_before, depth).await?;
    let after = evaluator.evaluate(&record.fen_after, depth).await?;
    let best_move_san = evaluator
        .best_move(&record.fen_before, depth)
        .await?
        .unwrap_or_else(|| UNKNOWN_MOVE.to_string());

    let delta = score_delta(before.centipawns, after.centipawns, record.played_by);
    debug!(
        move_number = record.move_number,
        san = %record.san,
        eval_before = before.centipawns,
        eval_after = after.centipawns,
        delta,
        "Evaluated move"
    );

    Ok(MoveEvaluation {
        move_san: record.san.clone(),
        fen_before: record.fen_before.clone(),
        fen_after: record.fen_after.clone(),
        eval_before: before.centipawns,
        eval_after: after.centipawns,
        best_move_san,
        score_delta: delta,
        played_by: record.played_by,
    })
}

/// Analyze a whole game sequentially. Any evaluator failure fails the analysis.
pub async fn analyze_game<E>(
    evaluator: &mut E,
    moves: &[MoveRecord],
    player_side: Side,
    depth: u32,
) -> Result<GameReport, AnalysisError>
where
    E: PositionEvaluator + ?Sized,
{
    info!(moves = moves.len(), player = %player_side, depth, "Starting analysis");

    let mut evaluated = Vec::with_capacity(moves.len());
    for record in moves {
        evaluated.push(evaluate_move(evaluator, record, depth).await?);
    }

    let report = GameReport::new(evaluated, moves.len(), player_side);
    info!(
        accuracy = report.accuracy_percentage(),
        blunders = report.blunders().len(),
        "Analysis complete"
    );
    Ok(report)
}

/// Owns one evaluator session and a fixed search depth.
pub struct Analyzer<E> {
    evaluator: E,
    depth: u32,
}

impl<E: PositionEvaluator> Analyzer<E> {
    pub fn new(evaluator: E, depth: u32) -> Self {
        Self { evaluator, depth }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub async fn analyze(
        &mut self,
        moves: &[MoveRecord],
        player_side: Side,
    ) -> Result<GameReport, AnalysisError> {
        analyze_game(&mut self.evaluator, moves, player_side, self.depth).await
    }

    pub fn into_inner(self) -> E {
        self.evaluator
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::analysis::MoveClass;
    use crate::evaluator::Evaluation;

    const FEN_A: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    const FEN_B: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
    const FEN_C: &str = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2";

    /// Scores looked up by FEN; unknown FENs fail like a dead engine.
    struct ScriptedEvaluator {
        scores: HashMap<&'static str, i32>,
        best: Option<&'static str>,
        calls: usize,
    }

    #[async_trait]
    impl PositionEvaluator for ScriptedEvaluator {
        async fn evaluate(&mut self, fen: &str, _depth: u32) -> Result<Evaluation, AnalysisError> {
            self.calls += 1;
            self.scores
                .get(fen)
                .map(|&cp| Evaluation::from_centipawns(cp))
                .ok_or_else(|| AnalysisError::EvaluatorUnavailable("engine gone".into()))
        }

        async fn best_move(
            &mut self,
            _fen: &str,
            _depth: u32,
        ) -> Result<Option<String>, AnalysisError> {
            self.calls += 1;
            Ok(self.best.map(str::to_string))
        }
    }

    fn record(n: u32, side: Side, san: &str, before: &str, after: &str) -> MoveRecord {
        MoveRecord::new(n, side, san.into(), String::new(), before.into(), after.into())
    }

    fn two_move_game() -> Vec<MoveRecord> {
        vec![
            record(1, Side::White, "e4", FEN_A, FEN_B),
            record(1, Side::Black, "e5", FEN_B, FEN_C),
        ]
    }

    fn scripted(best: Option<&'static str>) -> ScriptedEvaluator {
        ScriptedEvaluator {
            scores: HashMap::from([(FEN_A, 0), (FEN_B, -250), (FEN_C, -255)]),
            best,
            calls: 0,
        }
    }

    #[tokio::test]
    async fn test_blunder_scenario() {
        let mut evaluator = scripted(Some("d4"));
        let report = analyze_game(&mut evaluator, &two_move_game(), Side::White, 12)
            .await
            .unwrap();

        assert_eq!(report.total_moves, 2);
        assert_eq!(report.evaluated_moves[0].score_delta, -250);
        assert_eq!(report.evaluated_moves[1].score_delta, 5);
        assert_eq!(report.blunders().len(), 1);
        assert!(report.mistakes().is_empty());
        assert!(report.inaccuracies().is_empty());
        assert_eq!(report.accuracy_percentage(), 0.0);

        let critical = report.critical_moments(3);
        assert_eq!(critical.len(), 1);
        assert_eq!(critical[0].move_san, "e4");
        assert_eq!(critical[0].classification(), MoveClass::Blunder);
        assert_eq!(critical[0].best_move_san, "d4");

        // two evaluations and one best-move query per move
        assert_eq!(evaluator.calls, 6);
    }

    #[tokio::test]
    async fn test_missing_best_move_uses_sentinel() {
        let mut evaluator = scripted(None);
        let report = analyze_game(&mut evaluator, &two_move_game(), Side::Black, 12)
            .await
            .unwrap();
        assert!(report.evaluated_moves.iter().all(|m| m.best_move_san == UNKNOWN_MOVE));
        assert_eq!(report.player_moves().len(), 1);
        assert_eq!(report.accuracy_percentage(), 100.0);
    }

    #[tokio::test]
    async fn test_evaluator_failure_fails_analysis() {
        let mut evaluator = scripted(Some("d4"));
        evaluator.scores.remove(FEN_C);
        let result = analyze_game(&mut evaluator, &two_move_game(), Side::White, 12).await;
        assert!(matches!(result, Err(AnalysisError::EvaluatorUnavailable(_))));
    }

    #[tokio::test]
    async fn test_empty_game() {
        let mut analyzer = Analyzer::new(scripted(Some("d4")), DEFAULT_ANALYSIS_DEPTH);
        let report = analyzer.analyze(&[], Side::White).await.unwrap();
        assert_eq!(report.total_moves, 0);
        assert_eq!(report.accuracy_percentage(), 0.0);
        assert!(report.critical_moments(3).is_empty());
        assert_eq!(analyzer.into_inner().calls, 0);
    }

    #[tokio::test]
    async fn test_order_preserved() {
        let mut analyzer = Analyzer::new(scripted(Some("d4")), 8);
        let report = analyzer.analyze(&two_move_game(), Side::White).await.unwrap();
        let sans: Vec<&str> = report.evaluated_moves.iter().map(|m| m.move_san.as_str()).collect();
        assert_eq!(sans, vec!["e4", "e5"]);
        assert_eq!(analyzer.depth(), 8);
    }
}
