//! Interactive terminal game against the engine.
//!
//! The session's move log is the only source of truth. Live tips and the
//! evaluation bar run on background tasks and report back over a channel;
//! the input loop never waits for them.

use std::path::PathBuf;
use std::sync::Arc;

use coach_analysis::{join_analysis, spawn_analysis, PositionEvaluator, StockfishEngine};
use coach_core::{GameSession, Side};
use coach_llm::{ChessCoach, LiveCoach};
use shakmaty::Position;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::output;

/// Depth for the evaluation shown during play
const LIVE_EVAL_DEPTH: u32 = 12;

/// Results from background work, printed before the next prompt.
enum Notice {
    Tip(String),
    Eval(String),
}

pub async fn run(config: &AppConfig, side: Side, save: Option<PathBuf>) -> anyhow::Result<()> {
    let path = &config.engine.stockfish_path;

    let mut bot = StockfishEngine::new(path).await?;
    bot.set_elo(config.engine.bot_elo).await?;
    bot.new_game().await?;

    // Separate session so evaluations never interleave with the bot's search
    let live_eval = Arc::new(Mutex::new(StockfishEngine::new(path).await?));

    let (tx, mut rx) = mpsc::unbounded_channel::<Notice>();
    let mut session = GameSession::new(side);
    session.new_game();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("You play {side}. Enter moves in UCI (e2e4, e7e8q). Commands: moves, fen, pgn, quit");

    loop {
        while let Ok(notice) = rx.try_recv() {
            match notice {
                Notice::Tip(tip) => println!("Coach: {tip}"),
                Notice::Eval(eval) => println!("Eval: {eval}"),
            }
        }

        if session.is_over() {
            break;
        }

        if !session.is_player_turn() {
            let fen = session.fen();
            match bot.play(&fen, config.engine.bot_move_time_ms).await? {
                Some(uci) => {
                    let record = session.apply_engine_move(&uci)?;
                    println!("Engine plays {}", record.san);
                }
                None => {
                    warn!(fen = %fen, "Engine returned no move");
                    break;
                }
            }
            continue;
        }

        println!("\n{}", output::render_board(session.position().board()));
        print!("{}> ", session.turn());
        flush_stdout();

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            "" => continue,
            "quit" | "resign" => break,
            "moves" => println!("{}", session.legal_moves_uci().join(" ")),
            "fen" => println!("{}", session.fen()),
            "pgn" => println!("{}", session.to_pgn_string()),
            input => match session.apply_player_move(input) {
                Ok(record) => {
                    debug!(san = %record.san, "Player move");
                    dispatch_live_work(&session, &live_eval, &tx);
                }
                Err(e) => println!("{e}"),
            },
        }
    }

    let outcome = session.outcome_description();
    println!("\n{}", output::render_board(session.position().board()));
    println!("Result: {outcome}");
    println!("{}", session.to_pgn_string());
    bot.quit().await;
    live_eval.lock().await.quit().await;

    if let Some(save_path) = save {
        session.save_json(&save_path)?;
        info!(path = %save_path.display(), "Game saved");
    }

    if session.history().is_empty() {
        return Ok(());
    }

    println!("\nAnalyzing your game...");
    let analysis_engine = StockfishEngine::new(path).await?;
    let handle = spawn_analysis(
        analysis_engine,
        session.history().to_vec(),
        side,
        config.engine.analysis_depth,
    );
    let report = join_analysis(handle).await?;

    let coach = ChessCoach::from_config(&config.llm)?;
    output::print_coaching(&coach, &report, &outcome).await
}

/// Start the live tip and the evaluation for the current position. Results
/// arrive on `tx`; failures are logged and dropped.
fn dispatch_live_work(
    session: &GameSession,
    live_eval: &Arc<Mutex<StockfishEngine>>,
    tx: &mpsc::UnboundedSender<Notice>,
) {
    let position = session.position().clone();
    let move_count = session.history().len();
    let last = session.last_move().cloned();
    let tip_tx = tx.clone();
    tokio::task::spawn_blocking(move || {
        let tip = LiveCoach::tip(&position, move_count, last.as_ref());
        let _ = tip_tx.send(Notice::Tip(tip));
    });

    let fen = session.fen();
    let engine = live_eval.clone();
    let eval_tx = tx.clone();
    tokio::spawn(async move {
        let mut engine = engine.lock().await;
        match engine.evaluate(&fen, LIVE_EVAL_DEPTH).await {
            Ok(eval) => {
                let _ = eval_tx.send(Notice::Eval(output::format_eval(&eval)));
            }
            Err(e) => error!(error = %e, "Live evaluation failed"),
        }
    });
}

fn flush_stdout() {
    use std::io::Write;
    let _ = std::io::stdout().flush();
}
