//! Rule-based coaching text. Pure functions of their inputs; used whenever the
//! text-generation backend has nothing to say.

use coach_analysis::{GameReport, MoveEvaluation};

use crate::phase::{infer_game_phase, GamePhase};

const BLUNDER_TIP_MIN: usize = 3;
const MISTAKE_TIP_MIN: usize = 3;
const CONVERT_TIP_ACCURACY: f64 = 70.0;

pub const TIP_HANGING_PIECES: &str = "Before every move, check which of your pieces are attacked \
    and whether they are defended. Most blunders at club level are simply hanging pieces.";
pub const TIP_CALCULATE: &str = "Calculate one move further: before committing, ask what your \
    opponent's strongest reply is and whether your move still holds up.";
pub const TIP_CONVERT: &str = "You played accurately. Work on converting advantages: trade \
    pieces when you are ahead and push your passed pawns.";
pub const TIP_REVIEW: &str = "Replay the critical moments of this game and look for the \
    tactical idea you missed. Patterns you find yourself stick best.";

/// Phase for a move's starting position; unreadable positions count as Middlegame.
pub fn phase_or_default(fen: &str) -> GamePhase {
    infer_game_phase(fen).unwrap_or(GamePhase::Middlegame)
}

pub fn explain_move(mv: &MoveEvaluation, phase: GamePhase) -> String {
    format!(
        "{san} was classified as {article} {class} in the {phase_lower}. It lost about \
         {loss} centipawns; the engine preferred {best}.",
        san = mv.move_san,
        article = article(mv.classification().as_str()),
        class = mv.classification().as_str().to_lowercase(),
        phase_lower = phase.as_str().to_lowercase(),
        loss = mv.centipawn_loss(),
        best = mv.best_move_san,
    )
}

/// One of four canned tips, by blunder count, mistake count, then accuracy.
pub fn strategic_tip(report: &GameReport) -> &'static str {
    if report.blunders().len() >= BLUNDER_TIP_MIN {
        TIP_HANGING_PIECES
    } else if report.mistakes().len() >= MISTAKE_TIP_MIN {
        TIP_CALCULATE
    } else if report.accuracy_percentage() >= CONVERT_TIP_ACCURACY {
        TIP_CONVERT
    } else {
        TIP_REVIEW
    }
}

pub fn game_summary(report: &GameReport, outcome: &str) -> String {
    let stats = report.summary_stats();
    let mut lines = vec![
        format!("Result: {outcome}"),
        format!(
            "Accuracy: {} over {} moves",
            stats.accuracy, stats.total_player_moves
        ),
        format!(
            "Blunders: {}, Mistakes: {}, Inaccuracies: {}",
            stats.blunders, stats.mistakes, stats.inaccuracies
        ),
    ];

    match report.critical_moments(1).first() {
        Some(worst) => lines.push(format!(
            "Biggest turning point: {} ({}, {}) lost {} centipawns. {} was the stronger choice.",
            worst.move_san,
            worst.classification(),
            phase_or_default(&worst.fen_before),
            worst.centipawn_loss(),
            worst.best_move_san,
        )),
        None => lines.push("No mistakes or blunders this game. Well played!".to_string()),
    }

    lines.push(format!("Tip: {}", strategic_tip(report)));
    lines.join("\n")
}

fn article(word: &str) -> &'static str {
    match word.chars().next() {
        Some('A' | 'E' | 'I' | 'O' | 'U' | 'a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

#[cfg(test)]
mod tests {
    use coach_core::{rules, Side};

    use super::*;

    fn eval(delta: i32, san: &str) -> MoveEvaluation {
        MoveEvaluation {
            move_san: san.to_string(),
            fen_before: rules::STARTING_FEN.to_string(),
            fen_after: rules::STARTING_FEN.to_string(),
            eval_before: 0,
            eval_after: delta,
            best_move_san: "Nf3".to_string(),
            score_delta: delta,
            played_by: Side::White,
        }
    }

    fn report(deltas: &[i32]) -> GameReport {
        let evals: Vec<_> = deltas.iter().map(|&d| eval(d, "e4")).collect();
        let n = evals.len();
        GameReport::new(evals, n, Side::White)
    }

    #[test]
    fn test_explain_move_template() {
        let text = explain_move(&eval(-75, "h4"), GamePhase::Opening);
        assert_eq!(
            text,
            "h4 was classified as an inaccuracy in the opening. It lost about 75 centipawns; \
             the engine preferred Nf3."
        );
        let text = explain_move(&eval(-300, "Qxb7"), GamePhase::Endgame);
        assert!(text.contains("a blunder in the endgame"));
    }

    #[test]
    fn test_tip_thresholds() {
        assert_eq!(strategic_tip(&report(&[-300, -300, -300])), TIP_HANGING_PIECES);
        assert_eq!(strategic_tip(&report(&[-150, -150, -150, -300])), TIP_CALCULATE);
        assert_eq!(strategic_tip(&report(&[0, 0, 0, -60])), TIP_CONVERT);
        assert_eq!(strategic_tip(&report(&[0, -60, -60])), TIP_REVIEW);
        assert_eq!(strategic_tip(&report(&[])), TIP_REVIEW);
    }

    #[test]
    fn test_blunder_tip_wins_over_mistake_tip() {
        let r = report(&[-300, -300, -300, -150, -150, -150]);
        assert_eq!(strategic_tip(&r), TIP_HANGING_PIECES);
    }

    #[test]
    fn test_summary_mentions_worst_moment() {
        let evals = vec![eval(-150, "Bb5"), eval(-400, "Qh5"), eval(5, "O-O")];
        let r = GameReport::new(evals, 3, Side::White);
        let text = game_summary(&r, "Black wins — Checkmate");
        assert!(text.starts_with("Result: Black wins — Checkmate"));
        assert!(text.contains("Accuracy: 33.3% over 3 moves"));
        assert!(text.contains("Blunders: 1, Mistakes: 1, Inaccuracies: 0"));
        assert!(text.contains("Qh5 (Blunder, Opening) lost 400 centipawns"));
        assert!(text.contains("Nf3 was the stronger choice"));
        assert!(text.ends_with(TIP_REVIEW));
    }

    #[test]
    fn test_summary_without_mistakes() {
        let text = game_summary(&report(&[]), "Game in progress");
        assert!(text.contains("Accuracy: 0.0% over 0 moves"));
        assert!(text.contains("No mistakes or blunders"));
    }

    #[test]
    fn test_summary_is_deterministic() {
        let r = report(&[-300, 5]);
        assert_eq!(game_summary(&r, "Draw — Stalemate"), game_summary(&r, "Draw — Stalemate"));
    }

    #[test]
    fn test_phase_default() {
        assert_eq!(phase_or_default("garbage"), GamePhase::Middlegame);
        assert_eq!(phase_or_default(rules::STARTING_FEN), GamePhase::Opening);
    }
}
