//! Instant in-game tips. Rule-based only: no engine, no network.

use coach_core::{rules, CoreError, MoveRecord, Side};
use shakmaty::{Chess, Color, Position, Role, Square};

use crate::phase::GamePhase;

/// The live rule stays in the opening longer than the post-game one.
const OPENING_MIN_PIECES: usize = 26;
const OPENING_MAX_MOVES: usize = 14;
const ENDGAME_MAX_PIECES: usize = 12;

const OPENING_TIPS: &[&str] = &[
    "Develop your knights and bishops before moving the same piece twice.",
    "Fight for the center with pawns and pieces.",
    "Castle early to get your king to safety.",
    "Avoid bringing your queen out too early; it becomes a target.",
    "Connect your rooks by clearing the back rank.",
];

const MIDDLEGAME_TIPS: &[&str] = &[
    "Look for forcing moves first: checks, captures and threats.",
    "Improve your worst-placed piece.",
    "Before each move, ask what your opponent is threatening.",
    "Put your rooks on open or half-open files.",
    "Trade pieces when you are ahead in material.",
];

const ENDGAME_TIPS: &[&str] = &[
    "Activate your king; it is a strong piece in the endgame.",
    "Passed pawns must be pushed.",
    "Rooks belong behind passed pawns.",
    "Count tempi carefully in pawn races.",
    "With fewer pieces left, every pawn counts. Avoid needless trades of pawns when behind.",
];

const CHECK_WARNING: &str = "You are in check! Move the king, block, or capture the attacker.";
const CHECK_AVAILABLE: &str =
    "Your opponent has a check available. Make sure you have an answer ready.";

pub struct LiveCoach;

impl LiveCoach {
    /// Phase during play: Opening with 26+ pieces or within the first 14
    /// half-moves, Endgame at 12 pieces or fewer, Middlegame otherwise.
    pub fn phase(pos: &Chess, move_count: usize) -> GamePhase {
        let pieces = pos.board().occupied().count();
        if pieces >= OPENING_MIN_PIECES || move_count <= OPENING_MAX_MOVES {
            GamePhase::Opening
        } else if pieces <= ENDGAME_MAX_PIECES {
            GamePhase::Endgame
        } else {
            GamePhase::Middlegame
        }
    }

    /// Base tip for the position plus at most one threat annotation.
    /// Identical inputs always give identical text.
    pub fn tip(pos: &Chess, move_count: usize, last_move: Option<&MoveRecord>) -> String {
        let phase = Self::phase(pos, move_count);
        let tips = match phase {
            GamePhase::Opening => OPENING_TIPS,
            GamePhase::Middlegame => MIDDLEGAME_TIPS,
            GamePhase::Endgame => ENDGAME_TIPS,
        };
        let base = tips[tip_index(move_count, tips.len())];

        let mut text = format!("{phase}: {base}");
        if let Some(note) = threat_note(pos, last_move) {
            text.push(' ');
            text.push_str(&note);
        }
        text
    }

    /// Tip for a FEN position with no last move known.
    pub fn tip_for_fen(fen: &str, move_count: usize) -> Result<String, CoreError> {
        let pos = rules::parse_fen(fen)?;
        Ok(Self::tip(&pos, move_count, None))
    }
}

/// Stable index into a tip list of length `len` (non-zero).
fn tip_index(move_count: usize, len: usize) -> usize {
    (mix(move_count as u64) % len as u64) as usize
}

/// SplitMix64 finalizer
fn mix(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn threat_note(pos: &Chess, last_move: Option<&MoveRecord>) -> Option<String> {
    if pos.is_check() {
        return Some(CHECK_WARNING.to_string());
    }
    if has_checking_move(pos) {
        return Some(CHECK_AVAILABLE.to_string());
    }
    match last_move {
        Some(mv) if mv.played_by == Side::White => first_hanging_white_piece(pos)
            .map(|(role, sq)| format!("Your {} on {sq} may be undefended.", role_name(role))),
        _ => None,
    }
}

fn has_checking_move(pos: &Chess) -> bool {
    pos.legal_moves()
        .iter()
        .any(|mv| rules::apply(pos, mv).is_check())
}

/// First white piece, in square order a1..h8, attacked by black and not
/// defended by white.
fn first_hanging_white_piece(pos: &Chess) -> Option<(Role, Square)> {
    let board = pos.board();
    let occupied = board.occupied();
    board.by_color(Color::White).into_iter().find_map(|sq| {
        let attacked = !board.attacks_to(sq, Color::Black, occupied).is_empty();
        let defended = !board.attacks_to(sq, Color::White, occupied).is_empty();
        if attacked && !defended {
            board.role_at(sq).map(|role| (role, sq))
        } else {
            None
        }
    })
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::Pawn => "pawn",
        Role::Knight => "knight",
        Role::Bishop => "bishop",
        Role::Rook => "rook",
        Role::Queen => "queen",
        Role::King => "king",
    }
}
