//! PGN-style movetext export.

use crate::game_data::{MoveRecord, Side};

/// Render the recorded moves as movetext, e.g. `1. e4 e5 2. Nf3`.
/// A game whose first recorded move is Black's starts with `1... e5`.
pub fn to_movetext(moves: &[MoveRecord]) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(moves.len() * 2);
    let mut prev: Option<&MoveRecord> = None;

    for record in moves {
        match record.played_by {
            Side::White => parts.push(format!("{}. {}", record.move_number, record.san)),
            Side::Black => {
                let follows_white = prev.is_some_and(|p| {
                    p.played_by == Side::White && p.move_number == record.move_number
                });
                if follows_white {
                    parts.push(record.san.clone());
                } else {
                    parts.push(format!("{}... {}", record.move_number, record.san));
                }
            }
        }
        prev = Some(record);
    }

    parts.join(" ")
}
