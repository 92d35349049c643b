//! Game records and the rules-authority facade shared by analysis and coaching.
//!
//! Every chess rule (legality, SAN/UCI conversion, terminal states) is delegated
//! to shakmaty through [`rules`]; this crate only records what was played.

pub mod error;
pub mod game_data;
pub mod pgn;
pub mod rules;
pub mod session;

pub use error::CoreError;
pub use game_data::{GameExport, MoveRecord, Side};
pub use session::{GameSession, Termination};
