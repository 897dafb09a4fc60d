//! PUBG match telemetry analysis.
//!
//! Turns a decoded telemetry stream into per-player combat, movement,
//! healing and timeline stats, a match summary, and rule-based insights.
//! Only fetching is async; everything after it is pure and synchronous.

pub mod analyzer;
pub mod career;
pub mod error;
pub mod export;
pub mod healing;
pub mod insights;
pub mod reducer;
pub mod state;
pub mod summary;
pub mod testing;
pub mod traits;
pub mod types;
pub mod validation;
pub mod weapons;

pub use analyzer::{Analyzer, Stage};
pub use error::{AnalysisError, Result, ValidationError};
pub use export::{export_match_analysis, export_player_stats};
pub use reducer::{reduce_player, PlayerReducer};
pub use state::PlayerReport;
pub use traits::{MatchSource, Reducer};
pub use types::*;
