//! Coaching text for analyzed games and live tips during play.
//!
//! Generated text comes from a pluggable [`TextGenerator`]; whenever it cannot
//! deliver, the deterministic rules in [`fallback`] take over, so coaching
//! output is always produced.

pub mod backend;
pub mod coach;
pub mod error;
pub mod fallback;
pub mod live_tips;
pub mod phase;
pub mod prompts;

pub use backend::{Backend, LlmConfig, OllamaBackend, OpenAiBackend, TextGenerator};
pub use coach::{ChessCoach, MomentFeedback};
pub use error::GenerationError;
pub use live_tips::LiveCoach;
pub use phase::{infer_game_phase, GamePhase};
