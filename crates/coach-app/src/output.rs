//! Terminal rendering of boards, evaluations and coaching.

use coach_analysis::{Evaluation, GameReport};
use coach_llm::{ChessCoach, TextGenerator};
use shakmaty::{Board, File, Rank, Square};

pub fn render_board(board: &Board) -> String {
    let mut out = String::new();
    for rank in Rank::ALL.iter().rev() {
        out.push_str(&format!("{} ", rank.char()));
        for file in File::ALL {
            let c = board
                .piece_at(Square::from_coords(file, *rank))
                .map(|p| p.char())
                .unwrap_or('.');
            out.push(' ');
            out.push(c);
        }
        out.push('\n');
    }
    out.push_str("   a b c d e f g h");
    out
}

/// `+0.35`, `-1.20`, `#3` / `#-2` for mates. White's point of view.
pub fn format_eval(eval: &Evaluation) -> String {
    match eval.mate_distance {
        Some(n) if eval.is_mate => format!("#{n}"),
        _ => format!("{:+.2}", eval.centipawns as f64 / 100.0),
    }
}

/// Print stats, the game summary and critical moment explanations.
pub async fn print_coaching<G: TextGenerator>(
    coach: &ChessCoach<G>,
    report: &GameReport,
    outcome: &str,
) -> anyhow::Result<()> {
    let stats = report.summary_stats();
    println!("\n=== Game report ({} side) ===", report.player_side);
    println!("{}", serde_json::to_string_pretty(&stats)?);

    println!("\n=== Coach summary ===");
    println!("{}", coach.generate_summary(report, outcome).await);

    let moments = coach.explain_critical_moments(report).await;
    if !moments.is_empty() {
        println!("\n=== Critical moments ===");
    }
    for (i, m) in moments.iter().enumerate() {
        println!(
            "{}. {} ({}, {}): lost {} cp, best was {}",
            i + 1,
            m.move_san,
            m.classification,
            m.phase,
            m.centipawn_loss,
            m.best_move
        );
        println!("   {}", m.explanation);
    }
    Ok(())
}
