//! Stockfish engine wrapper using UCI protocol (async I/O)

use std::path::Path;

use async_trait::async_trait;
use coach_core::{rules, Side};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info};

use crate::error::AnalysisError;
use crate::evaluator::{Evaluation, PositionEvaluator};

/// Weakest and strongest `UCI_Elo` Stockfish accepts.
pub const ELO_MIN: u32 = 1320;
pub const ELO_MAX: u32 = 3190;

/// Result of a single search
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// Centipawn score (from engine's perspective, i.e., side to move)
    pub cp: Option<i32>,
    /// Mate in N moves (positive = side to move wins)
    pub mate: Option<i32>,
    /// Best move in UCI notation, `None` for `bestmove (none)`
    pub best_move: Option<String>,
}

/// Stockfish engine instance
pub struct StockfishEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    skill_level: u8,
    elo: Option<u32>,
}

impl StockfishEngine {
    /// Spawn a new Stockfish process and initialize UCI
    pub async fn new(path: &str) -> Result<Self, AnalysisError> {
        let looks_like_path = path.contains('/') || path.contains('\\');
        if looks_like_path && !Path::new(path).is_file() {
            return Err(AnalysisError::EvaluatorUnavailable(format!(
                "Stockfish binary not found at: {path} (set STOCKFISH_PATH)"
            )));
        }

        let mut process = Command::new(path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                AnalysisError::EvaluatorUnavailable(format!("Failed to spawn Stockfish: {e}"))
            })?;

        let stdin = process.stdin.take().ok_or_else(|| {
            AnalysisError::EvaluatorUnavailable("Stockfish stdin not captured".into())
        })?;
        let stdout = process.stdout.take().ok_or_else(|| {
            AnalysisError::EvaluatorUnavailable("Stockfish stdout not captured".into())
        })?;

        let mut engine = Self {
            process,
            stdin,
            stdout: BufReader::new(stdout),
            skill_level: 20,
            elo: None,
        };

        engine.send("uci").await?;
        engine.wait_for("uciok").await?;

        engine.send("setoption name Threads value 1").await?;
        engine.send("setoption name Hash value 128").await?;
        engine.ready().await?;

        info!(path, "Stockfish engine ready");
        Ok(engine)
    }

    /// Send a command to Stockfish
    async fn send(&mut self, cmd: &str) -> Result<(), AnalysisError> {
        debug!(cmd, "SF <");
        self.stdin
            .write_all(format!("{cmd}\n").as_bytes())
            .await
            .map_err(|e| {
                AnalysisError::EvaluatorUnavailable(format!("Failed to write to Stockfish: {e}"))
            })?;
        self.stdin.flush().await.map_err(|e| {
            AnalysisError::EvaluatorUnavailable(format!("Failed to flush stdin: {e}"))
        })?;
        Ok(())
    }

    /// Read one line; EOF means the process went away.
    async fn read_line(&mut self, line: &mut String) -> Result<(), AnalysisError> {
        line.clear();
        let n = self.stdout.read_line(line).await.map_err(|e| {
            AnalysisError::EvaluatorUnavailable(format!("Failed to read from Stockfish: {e}"))
        })?;
        if n == 0 {
            return Err(AnalysisError::EvaluatorUnavailable(
                "Stockfish closed its output".into(),
            ));
        }
        Ok(())
    }

    /// Wait for a specific response line
    async fn wait_for(&mut self, expected: &str) -> Result<(), AnalysisError> {
        let mut line = String::new();
        loop {
            self.read_line(&mut line).await?;
            let trimmed = line.trim();
            debug!(line = trimmed, "SF >");
            if trimmed == expected {
                return Ok(());
            }
        }
    }

    async fn ready(&mut self) -> Result<(), AnalysisError> {
        self.send("isready").await?;
        self.wait_for("readyok").await
    }

    /// Run a search with the given `go` arguments and collect the final score and best move
    async fn go(&mut self, fen: &str, limit: &str) -> Result<SearchResult, AnalysisError> {
        self.send(&format!("position fen {fen}")).await?;
        self.send(&format!("go {limit}")).await?;

        let mut result = SearchResult::default();
        let mut line = String::new();
        loop {
            self.read_line(&mut line).await?;
            let trimmed = line.trim();

            if trimmed.starts_with("info") && trimmed.contains(" score ") {
                if let Some(cp) = parse_cp(trimmed) {
                    result.cp = Some(cp);
                    result.mate = None;
                }
                if let Some(mate) = parse_mate(trimmed) {
                    result.mate = Some(mate);
                    result.cp = None;
                }
            } else if trimmed.starts_with("bestmove") {
                debug!(line = trimmed, "SF >");
                result.best_move = parse_bestmove(trimmed);
                break;
            }
        }

        Ok(result)
    }

    /// Search a position to a fixed depth
    pub async fn search(&mut self, fen: &str, depth: u32) -> Result<SearchResult, AnalysisError> {
        self.go(fen, &format!("depth {depth}")).await
    }

    /// Pick the engine's move for play, within `movetime_ms`. Strength settings apply.
    pub async fn play(&mut self, fen: &str, movetime_ms: u64) -> Result<Option<String>, AnalysisError> {
        let result = self.go(fen, &format!("movetime {movetime_ms}")).await?;
        Ok(result.best_move)
    }

    pub async fn new_game(&mut self) -> Result<(), AnalysisError> {
        self.send("ucinewgame").await?;
        self.ready().await
    }

    /// Set `Skill Level`, clamped to 1..=20.
    pub async fn set_skill_level(&mut self, level: u8) -> Result<(), AnalysisError> {
        self.skill_level = level.clamp(1, 20);
        self.send(&format!("setoption name Skill Level value {}", self.skill_level))
            .await?;
        self.ready().await
    }

    /// Limit playing strength to a rating. The engine's supported range is
    /// applied only on the wire.
    pub async fn set_elo(&mut self, elo: u32) -> Result<(), AnalysisError> {
        self.elo = Some(elo);
        self.send("setoption name UCI_LimitStrength value true").await?;
        self.send(&format!(
            "setoption name UCI_Elo value {}",
            elo.clamp(ELO_MIN, ELO_MAX)
        ))
        .await?;
        self.ready().await
    }

    /// Drop any strength limit, for analysis-grade searches.
    pub async fn set_full_strength(&mut self) -> Result<(), AnalysisError> {
        self.elo = None;
        self.skill_level = 20;
        self.send("setoption name UCI_LimitStrength value false").await?;
        self.send("setoption name Skill Level value 20").await?;
        self.ready().await
    }

    pub fn skill_level(&self) -> u8 {
        self.skill_level
    }

    pub fn elo(&self) -> Option<u32> {
        self.elo
    }

    /// Send quit command and wait for process to exit
    pub async fn quit(&mut self) {
        let _ = self.send("quit").await;
        let _ = self.process.wait().await;
    }
}

impl Drop for StockfishEngine {
    fn drop(&mut self) {
        // Best-effort synchronous kill in drop
        let _ = self.process.start_kill();
    }
}

#[async_trait]
impl PositionEvaluator for StockfishEngine {
    async fn evaluate(&mut self, fen: &str, depth: u32) -> Result<Evaluation, AnalysisError> {
        let white_to_move = side_to_move_is_white(fen)?;
        let result = self.search(fen, depth).await?;
        Evaluation::from_side_to_move(result.cp, result.mate, white_to_move).ok_or_else(|| {
            AnalysisError::EvaluatorUnavailable(format!("No score reported for {fen}"))
        })
    }

    async fn best_move(&mut self, fen: &str, depth: u32) -> Result<Option<String>, AnalysisError> {
        let result = self.search(fen, depth).await?;
        match result.best_move {
            Some(uci) => Ok(Some(rules::uci_to_san(fen, &uci)?)),
            None => Ok(None),
        }
    }
}

fn side_to_move_is_white(fen: &str) -> Result<bool, AnalysisError> {
    Ok(rules::side_to_move(fen)? == Side::White)
}

/// Parse centipawn score from info line
fn parse_cp(line: &str) -> Option<i32> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == "cp" && i + 1 < parts.len() {
            return parts[i + 1].parse().ok();
        }
    }
    None
}

/// Parse mate score from info line
fn parse_mate(line: &str) -> Option<i32> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == "mate" && i + 1 < parts.len() {
            return parts[i + 1].parse().ok();
        }
    }
    None
}

/// Parse the move from a `bestmove` line
fn parse_bestmove(line: &str) -> Option<String> {
    match line.split_whitespace().nth(1) {
        Some("(none)") | Some("0000") | None => None,
        Some(mv) => Some(mv.to_string()),
    }
}
