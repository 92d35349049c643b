//! `analyze` command: coach a game saved by `play --save`.

use std::path::Path;

use anyhow::Context;
use coach_analysis::{analyze_parallel, Analyzer, EnginePool, StockfishEngine};
use coach_core::{game_data, GameExport, Side};
use coach_llm::ChessCoach;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::output;

pub async fn run(config: &AppConfig, path: &Path, side: Side) -> anyhow::Result<()> {
    let game = GameExport::load(path)
        .with_context(|| format!("Failed to load game from {}", path.display()))?;
    info!(path = %path.display(), moves = game.moves.len(), outcome = %game.outcome, "Loaded game");

    if let Some(index) = game_data::broken_link(&game.moves) {
        warn!(index, "Move log positions do not chain; analyzing records as given");
    }

    let depth = config.engine.analysis_depth;
    let report = if config.engine.pool_size > 1 {
        let pool = EnginePool::spawn(&config.engine.stockfish_path, config.engine.pool_size).await?;
        let result = analyze_parallel(&pool, &game.moves, side, depth).await;
        pool.shutdown().await;
        result?
    } else {
        let engine = StockfishEngine::new(&config.engine.stockfish_path).await?;
        let mut analyzer = Analyzer::new(engine, depth);
        let result = analyzer.analyze(&game.moves, side).await;
        analyzer.into_inner().quit().await;
        result?
    };

    let coach = ChessCoach::from_config(&config.llm)?;
    output::print_coaching(&coach, &report, &game.outcome).await
}
