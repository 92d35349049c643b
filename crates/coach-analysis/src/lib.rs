//! Post-game analysis: engine evaluation of every played move, move
//! classification and the game report built from them.

pub mod analysis;
pub mod analyzer;
pub mod error;
pub mod evaluator;
pub mod pool;
pub mod report;
pub mod stockfish;

pub use analysis::{classify_move, score_delta, MoveClass, MoveEvaluation, UNKNOWN_MOVE};
pub use analyzer::{analyze_game, evaluate_move, Analyzer, DEFAULT_ANALYSIS_DEPTH};
pub use error::AnalysisError;
pub use evaluator::{Evaluation, PositionEvaluator, MATE_SCORE};
pub use pool::{analyze_parallel, join_analysis, spawn_analysis, EnginePool};
pub use report::{GameReport, SummaryStats};
pub use stockfish::StockfishEngine;
