//! Chess coach
//!
//! Play against Stockfish in the terminal, then get the game analyzed and
//! explained. Exported games can be analyzed again on their own.

mod analyze;
mod config;
mod output;
mod play;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use coach_core::Side;
use coach_llm::LiveCoach;
use tracing::info;

use crate::config::AppConfig;

#[derive(Parser)]
#[command(author, version, about = "Play Stockfish and get coached on your mistakes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a game in the terminal against the engine
    Play {
        /// Side you play
        #[arg(long, default_value = "white")]
        side: Side,

        /// Save the finished game as JSON
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Analyze a saved game
    Analyze {
        /// Game exported by `play --save`
        game: PathBuf,

        /// Side to coach
        #[arg(long, default_value = "white")]
        side: Side,

        /// Search depth (default: ANALYSIS_DEPTH)
        #[arg(long)]
        depth: Option<u32>,

        /// Engine sessions to run in parallel (default: ENGINE_POOL_SIZE)
        #[arg(long)]
        pool: Option<usize>,
    },

    /// Print the live tip for a position
    Tip {
        /// Position in FEN
        #[arg(long)]
        fen: String,

        /// Half-moves played so far
        #[arg(long, default_value_t = 0)]
        move_count: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file for local dev
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();

    match cli.command {
        Command::Play { side, save } => {
            info!(side = %side, elo = config.engine.bot_elo, "Starting game");
            play::run(&config, side, save).await
        }
        Command::Analyze {
            game,
            side,
            depth,
            pool,
        } => {
            if let Some(depth) = depth {
                config.engine.analysis_depth = depth;
            }
            if let Some(pool) = pool {
                config.engine.pool_size = pool.max(1);
            }
            analyze::run(&config, &game, side).await
        }
        Command::Tip { fen, move_count } => {
            println!("{}", LiveCoach::tip_for_fen(&fen, move_count)?);
            Ok(())
        }
    }
}
