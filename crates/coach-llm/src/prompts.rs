//! Prompt builders for the text-generation backend.

use coach_analysis::{GameReport, MoveEvaluation};

use crate::phase::GamePhase;

/// Critical moments listed in a game-summary prompt
pub const SUMMARY_MOMENTS: usize = 3;

pub fn build_move_feedback_prompt(
    mv: &MoveEvaluation,
    phase: GamePhase,
    player_elo: u32,
) -> String {
    let class = mv.classification();
    format!(
        "You are an expert chess coach giving feedback to a {player_elo}-ELO player.\n\
         \n\
         Game phase: {phase}\n\
         Move played: {san} ({class})\n\
         Best move was: {best}\n\
         Evaluation before: {before} centipawns (White's perspective)\n\
         Evaluation after: {after} centipawns\n\
         Centipawn loss: {loss}\n\
         \n\
         Explain in 2-4 clear sentences why this move was a {class_lower}, what threat \
         or tactic was missed, and what the player should have considered instead. \
         Be encouraging but educational. Do not use chess jargon without a brief explanation.\n",
        san = mv.move_san,
        best = mv.best_move_san,
        before = mv.eval_before,
        after = mv.eval_after,
        loss = mv.centipawn_loss(),
        class_lower = class.as_str().to_lowercase(),
    )
}

pub fn build_game_summary_prompt(report: &GameReport, player_elo: u32, outcome: &str) -> String {
    let stats = report.summary_stats();
    let critical = report.critical_moments(SUMMARY_MOMENTS);

    let critical_detail = critical
        .iter()
        .map(|m| {
            format!(
                "  - Move {} (lost ~{} cp, best was {})",
                m.move_san,
                m.centipawn_loss(),
                m.best_move_san
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an expert chess coach. A {player_elo}-ELO player just finished a game.\n\
         \n\
         Outcome: {outcome}\n\
         Player accuracy: {accuracy}\n\
         Blunders: {blunders}, Mistakes: {mistakes}, Inaccuracies: {inaccuracies}\n\
         \n\
         Top {count} critical moments:\n\
         {critical_detail}\n\
         \n\
         Write a warm, encouraging post-game summary (5-8 sentences) that:\n\
         1. Acknowledges the outcome and overall performance.\n\
         2. Highlights the most important lesson from the biggest mistake.\n\
         3. Gives 1-2 concrete strategic tips to improve.\n\
         Keep the language accessible for a {player_elo}-ELO player.\n",
        accuracy = stats.accuracy,
        blunders = stats.blunders,
        mistakes = stats.mistakes,
        inaccuracies = stats.inaccuracies,
        count = critical.len(),
    )
}
