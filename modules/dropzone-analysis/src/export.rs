//! JSON export for download and debugging. Pretty-printed, two-space indent.

use serde::Serialize;

use crate::types::{MatchAnalysis, PlayerStats};

pub fn export_match_analysis(analysis: &MatchAnalysis) -> serde_json::Result<String> {
    to_pretty_json(analysis)
}

pub fn export_player_stats(stats: &PlayerStats) -> serde_json::Result<String> {
    to_pretty_json(stats)
}

pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}
