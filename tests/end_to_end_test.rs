//! Integration tests: a game played through the session, exported, analyzed
//! by a scripted evaluator and summarized.

mod common;

use coach_analysis::{
    analyze_game, analyze_parallel, join_analysis, spawn_analysis, AnalysisError, EnginePool,
    MoveClass, UNKNOWN_MOVE,
};
use coach_core::{GameExport, Side};
use common::{history, play_moves, ScriptedEvaluator};

// ---------------------------------------------------------------------------
// Blunder scenario
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_white_blunder_scenario() {
    let session = play_moves(Side::White, &["f2f3", "e7e5"]);
    let moves = history(&session);

    let mut evaluator = ScriptedEvaluator::new()
        .score(&moves[0].fen_before, 0)
        .score(&moves[0].fen_after, -250)
        .score(&moves[1].fen_after, -255)
        .best(&moves[0].fen_before, "e4");

    let report = analyze_game(&mut evaluator, &moves, Side::White, 18).await.unwrap();

    assert_eq!(report.evaluated_moves[0].score_delta, -250);
    assert_eq!(report.evaluated_moves[1].score_delta, 5);
    assert_eq!(report.blunders().len(), 1);
    assert_eq!(report.mistakes().len(), 0);
    assert_eq!(report.inaccuracies().len(), 0);
    assert_eq!(report.accuracy_percentage(), 0.0);

    let critical = report.critical_moments(3);
    assert_eq!(critical.len(), 1);
    assert_eq!(critical[0].move_san, "f3");
    assert_eq!(critical[0].best_move_san, "e4");
    // No best move scripted for black's position
    assert_eq!(report.evaluated_moves[1].best_move_san, UNKNOWN_MOVE);

    let stats = report.summary_stats();
    assert_eq!(stats.total_player_moves, 1);
    assert_eq!(stats.accuracy, "0.0%");
}

#[tokio::test]
async fn test_same_evals_opposite_sides() {
    // +100 for White after the move: good for a white mover, bad for black
    let session = play_moves(Side::Black, &["e2e4", "e7e5"]);
    let moves = history(&session);
    let mut evaluator = ScriptedEvaluator::new()
        .score(&moves[0].fen_before, 0)
        .score(&moves[0].fen_after, 0)
        .score(&moves[1].fen_before, 0)
        .score(&moves[1].fen_after, 100);

    let report = analyze_game(&mut evaluator, &moves, Side::Black, 10).await.unwrap();
    assert_eq!(report.evaluated_moves[1].score_delta, -100);
    assert_eq!(report.evaluated_moves[1].classification(), MoveClass::Mistake);
    assert_eq!(report.mistakes().len(), 1);
}

#[tokio::test]
async fn test_unavailable_evaluator_fails_whole_analysis() {
    let session = play_moves(Side::White, &["e2e4", "e7e5", "g1f3"]);
    let moves = history(&session);
    // Only the first two positions are known
    let mut evaluator = ScriptedEvaluator::new()
        .score(&moves[0].fen_before, 0)
        .score(&moves[0].fen_after, 20);

    let result = analyze_game(&mut evaluator, &moves, Side::White, 10).await;
    assert!(matches!(result, Err(AnalysisError::EvaluatorUnavailable(_))));
}

// ---------------------------------------------------------------------------
// Export and re-analysis
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_exported_game_reanalyzes_identically() {
    let session = play_moves(Side::Black, &["f2f3", "e7e5", "g2g4", "d8h4"]);
    assert_eq!(session.outcome_description(), "Black wins — Checkmate");

    let path = std::env::temp_dir().join(format!("coach_export_{}.json", std::process::id()));
    session.save_json(&path).unwrap();
    let loaded = GameExport::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded.outcome, "Black wins — Checkmate");
    assert_eq!(loaded.moves, session.history());

    let evaluator = ScriptedEvaluator::new().with_default(0);
    let direct = analyze_game(&mut evaluator.clone(), session.history(), Side::Black, 8)
        .await
        .unwrap();
    let from_file = analyze_game(&mut evaluator.clone(), &loaded.moves, Side::Black, 8)
        .await
        .unwrap();
    assert_eq!(direct, from_file);
    assert_eq!(direct.accuracy_percentage(), 100.0);
}

#[test]
fn test_export_document_shape() {
    let session = play_moves(Side::White, &["e2e4"]);
    let value = serde_json::to_value(session.export()).unwrap();
    assert_eq!(value["outcome"], "Game in progress");

    let first = &value["moves"][0];
    for key in ["move_number", "played_by", "san", "uci", "fen_before", "fen_after", "timestamp"] {
        assert!(first.get(key).is_some(), "missing {key}");
    }
    assert_eq!(first["played_by"], "white");
    assert_eq!(first["san"], "e4");
    assert_eq!(first["uci"], "e2e4");
    assert_eq!(first["move_number"], 1);
}

// ---------------------------------------------------------------------------
// Background and parallel analysis
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_parallel_matches_sequential() {
    let session = play_moves(
        Side::White,
        &["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "a7a6", "b5a4", "g8f6"],
    );
    let moves = history(&session);

    let mut evaluator = ScriptedEvaluator::new().with_default(0);
    for (i, m) in moves.iter().enumerate() {
        // Alternating swings so every move gets a different delta
        evaluator = evaluator.score(&m.fen_after, (i as i32 + 1) * 37 * if i % 3 == 0 { -1 } else { 1 });
    }

    let sequential = analyze_game(&mut evaluator.clone(), &moves, Side::White, 10)
        .await
        .unwrap();
    let pool = EnginePool::new(vec![evaluator.clone(), evaluator.clone(), evaluator.clone()]);
    let parallel = analyze_parallel(&pool, &moves, Side::White, 10).await.unwrap();

    assert_eq!(sequential, parallel);
}

#[tokio::test]
async fn test_spawned_analysis() {
    let session = play_moves(Side::White, &["e2e4", "e7e5"]);
    let handle = spawn_analysis(
        ScriptedEvaluator::new().with_default(15),
        history(&session),
        Side::White,
        10,
    );
    let report = join_analysis(handle).await.unwrap();
    assert_eq!(report.total_moves, 2);
    assert_eq!(report.player_moves().len(), 1);
}

#[tokio::test]
async fn test_empty_history_report() {
    let session = play_moves(Side::White, &[]);
    let mut evaluator = ScriptedEvaluator::new();
    let report = analyze_game(&mut evaluator, session.history(), Side::White, 10)
        .await
        .unwrap();
    assert_eq!(report.accuracy_percentage(), 0.0);
    assert!(report.critical_moments(3).is_empty());
    assert_eq!(report.summary_stats().total_player_moves, 0);
}
