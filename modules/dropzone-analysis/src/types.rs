//! Output records of an analysis run.
//!
//! Everything here is plain data: built once by the pipeline, never mutated
//! afterwards, serialized with camelCase keys for export.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dropzone_telemetry::geometry::UNITS_PER_METER;
use dropzone_telemetry::Location;

// --- Root ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAnalysis {
    pub match_id: String,
    pub analysis_date: DateTime<Utc>,
    pub players: Vec<PlayerAnalysis>,
    pub match_summary: MatchSummary,
    pub insights: AnalysisInsights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAnalysis {
    pub name: String,
    /// Account id, or the player name when no account id was seen.
    pub id: String,
    pub stats: PlayerMatchStats,
    pub insights: PlayerInsights,
    /// Sorted ascending by `time`.
    pub timeline: Vec<PlayerTimeline>,
}

// --- Per-player stats ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMatchStats {
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub damage_dealt: f64,
    pub damage_taken: f64,
    /// Seconds.
    pub survival_time: f64,
    /// 1 = winner.
    pub placement: u32,
    pub weapons: BTreeMap<String, WeaponStats>,
    pub movement: MovementStats,
    pub healing: HealingStats,
    pub combat: CombatStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponStats {
    pub kills: u32,
    pub damage: f64,
    pub hits: u32,
    pub headshots: u32,
    /// hits / shots fired, 0 when nothing was fired.
    pub accuracy: f64,
}

/// Distances in metres, times in seconds, speed in metres per minute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementStats {
    pub total_distance: f64,
    pub vehicle_distance: f64,
    pub swim_distance: f64,
    pub foot_distance: f64,
    pub avg_speed: f64,
    pub time_in_vehicle: f64,
    pub time_in_blue_zone: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealingStats {
    pub health_used: f64,
    pub boost_used: u32,
    pub healing_items: BTreeMap<String, HealingItemStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealingItemStats {
    pub used: u32,
    /// Total seconds spent using the item.
    pub time: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatStats {
    pub shots_fired: u32,
    pub shots_hit: u32,
    pub headshot_percentage: f64,
    /// Metres.
    pub longest_kill: f64,
    /// Metres.
    pub avg_kill_distance: f64,
    pub damage_per_kill: f64,
}

// --- Timeline ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerTimeline {
    /// Epoch milliseconds; 0 when the source event had no usable timestamp.
    pub time: i64,
    pub event: TimelineEvent,
    pub position: Option<Position>,
    pub details: Option<TimelineDetails>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEvent {
    Kill,
    Death,
    DamageTaken,
    Heal,
    ItemUse,
    VehicleEnter,
    VehicleExit,
    SwimEnd,
    Revive,
    Revived,
}

impl std::fmt::Display for TimelineEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimelineEvent::Kill => write!(f, "kill"),
            TimelineEvent::Death => write!(f, "death"),
            TimelineEvent::DamageTaken => write!(f, "damage_taken"),
            TimelineEvent::Heal => write!(f, "heal"),
            TimelineEvent::ItemUse => write!(f, "item_use"),
            TimelineEvent::VehicleEnter => write!(f, "vehicle_enter"),
            TimelineEvent::VehicleExit => write!(f, "vehicle_exit"),
            TimelineEvent::SwimEnd => write!(f, "swim_end"),
            TimelineEvent::Revive => write!(f, "revive"),
            TimelineEvent::Revived => write!(f, "revived"),
        }
    }
}

/// Event-specific detail. Distances in metres, durations in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimelineDetails {
    Kill {
        victim: String,
        weapon: String,
        distance: f64,
        headshot: bool,
    },
    Death {
        killer: Option<String>,
        weapon: String,
        distance: f64,
        placement: Option<u32>,
    },
    DamageTaken {
        attacker: Option<String>,
        weapon: String,
        damage: f64,
        reason: Option<String>,
    },
    Heal {
        item: String,
        amount: f64,
    },
    ItemUse {
        item: String,
        boost: bool,
    },
    Vehicle {
        vehicle: String,
        distance: Option<f64>,
        duration: Option<f64>,
    },
    Swim {
        distance: f64,
        duration: f64,
    },
    Revive {
        other: String,
    },
}

/// A point in metres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<&Location> for Position {
    fn from(loc: &Location) -> Self {
        Self {
            x: loc.x / UNITS_PER_METER,
            y: loc.y / UNITS_PER_METER,
            z: loc.z / UNITS_PER_METER,
        }
    }
}

// --- Insights ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInsights {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    /// 1 (poor) to 5 (excellent).
    pub performance_rating: u8,
    pub improvement_areas: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInsights {
    pub overall_match_quality: f64,
    pub key_moments: Vec<KeyMoment>,
    pub team_performance: TeamPerformance,
    pub strategic_insights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMoment {
    /// Epoch milliseconds, 0 when unknown.
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub moment_type: MomentType,
    pub description: String,
    pub impact: u8,
    pub players: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MomentType {
    Kill,
    Death,
    Revive,
    Escape,
    ZoneClose,
}

/// Team scores, each in [0, 5].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPerformance {
    pub coordination: f64,
    pub communication: f64,
    pub strategy: f64,
    pub overall_rating: f64,
}

// --- Match summary ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub total_players: u32,
    /// Seconds.
    pub match_duration: f64,
    pub map: String,
    pub game_mode: String,
    pub timeline: Vec<TimelinePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePoint {
    /// Seconds since match start.
    pub time: f64,
    pub players_alive: u32,
    pub zone: ZoneSnapshot,
}

/// Safe zone circle in metres.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneSnapshot {
    pub radius: f64,
    pub center: ZoneCenter,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneCenter {
    pub x: f64,
    pub y: f64,
}

// --- Career ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub player_name: String,
    pub player_id: String,
    pub overall_stats: OverallStats,
    pub recent_matches: Vec<RecentMatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub matches_played: u32,
    pub wins: u32,
    pub kills: u32,
    pub deaths: u32,
    pub kd_ratio: f64,
    /// Percent.
    pub win_rate: f64,
    pub avg_damage: f64,
    /// Seconds.
    pub avg_survival_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentMatch {
    pub match_id: String,
    pub map_name: String,
    pub game_mode: String,
    pub kills: u32,
    pub placement: u32,
    pub damage_dealt: f64,
    pub survival_time: f64,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchHistory {
    pub match_id: String,
    pub player_name: String,
    pub map_name: String,
    pub game_mode: String,
    pub kills: u32,
    pub placement: u32,
    pub damage_dealt: f64,
    pub survival_time: f64,
    pub date: String,
}
