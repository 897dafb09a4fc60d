//! Payload value types shared by several event kinds.
//!
//! Every field is optional on the wire: schemas drift between game patches and
//! a missing field must never fail the whole event. Scalars that have a
//! natural zero use `nullable` so both `null` and absence decode to default.

use serde::{Deserialize, Deserializer, Serialize};

use crate::geometry::planar_distance_units;

/// Decode `null` the same way as an absent field.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A point in engine space, centimetres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, deserialize_with = "nullable")]
    pub x: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub y: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub z: f64,
}

/// A player character snapshot as embedded in most events.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default)]
    pub team_id: Option<i64>,
    #[serde(default)]
    pub health: Option<f64>,
    #[serde(default)]
    pub location: Option<Location>,
    /// Final ranking; only meaningful on match-end snapshots.
    #[serde(default)]
    pub ranking: Option<i64>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub is_in_blue_zone: Option<bool>,
    #[serde(default)]
    pub is_in_red_zone: Option<bool>,
    #[serde(default)]
    pub primary_weapon_first: Option<String>,
    #[serde(default)]
    pub primary_weapon_second: Option<String>,
}

impl Character {
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// Account id if present and non-empty.
    pub fn account(&self) -> Option<&str> {
        self.account_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Match start/end rosters list characters either bare or wrapped with
/// loadout metadata, depending on the telemetry version.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CharacterEntry {
    Wrapped { character: Character },
    Bare(Character),
}

impl CharacterEntry {
    pub fn character(&self) -> &Character {
        match self {
            CharacterEntry::Wrapped { character } => character,
            CharacterEntry::Bare(character) => character,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default, deserialize_with = "nullable")]
    pub item_id: String,
    #[serde(default)]
    pub stack_count: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sub_category: Option<String>,
}

impl Item {
    pub fn is_boost(&self) -> bool {
        self.sub_category.as_deref() == Some("Boost") || self.item_id.starts_with("Item_Boost_")
    }

    pub fn is_heal(&self) -> bool {
        self.sub_category.as_deref() == Some("Heal") || self.item_id.starts_with("Item_Heal_")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub vehicle_id: Option<String>,
    /// Numeric in current telemetry, a string in some older dumps.
    #[serde(default)]
    pub vehicle_unique_id: Option<serde_json::Value>,
}

impl Vehicle {
    /// Best available identity for this vehicle instance: unique id, then
    /// vehicle id, then vehicle type.
    pub fn instance_key(&self) -> Option<String> {
        let unique = match &self.vehicle_unique_id {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        unique
            .or_else(|| self.vehicle_id.clone().filter(|s| !s.is_empty()))
            .or_else(|| self.vehicle_type.clone().filter(|s| !s.is_empty()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResultStats {
    #[serde(default)]
    pub kill_count: Option<i64>,
    #[serde(default)]
    pub distance_on_foot: Option<f64>,
    #[serde(default)]
    pub distance_on_swim: Option<f64>,
    #[serde(default)]
    pub distance_on_vehicle: Option<f64>,
    #[serde(default)]
    pub win_place: Option<i64>,
}

/// The victim's result block attached to kill events.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    #[serde(default)]
    pub rank: Option<i64>,
    #[serde(default)]
    pub game_result: Option<String>,
    #[serde(default)]
    pub team_id: Option<i64>,
    #[serde(default)]
    pub win_place: Option<i64>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub stats: Option<GameResultStats>,
}

impl GameResult {
    /// Positive rank, falling back to `winPlace` (top level, then stats).
    pub fn placement(&self) -> Option<u32> {
        let positive = |v: Option<i64>| v.filter(|n| *n > 0);
        positive(self.rank)
            .or_else(|| positive(self.win_place))
            .or_else(|| positive(self.stats.as_ref().and_then(|s| s.win_place)))
            .and_then(|n| u32::try_from(n).ok())
    }
}

/// Per-hit damage detail used by the v2 kill event.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageInfo {
    #[serde(default)]
    pub damage_reason: Option<String>,
    #[serde(default)]
    pub damage_type_category: Option<String>,
    #[serde(default)]
    pub damage_causer_name: Option<String>,
    #[serde(default)]
    pub distance: Option<f64>,
}

/// Periodic snapshot of the zone and player counts.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    #[serde(default)]
    pub elapsed_time: Option<f64>,
    #[serde(default)]
    pub num_alive_teams: Option<u32>,
    #[serde(default)]
    pub num_join_players: Option<u32>,
    #[serde(default)]
    pub num_start_players: Option<u32>,
    #[serde(default)]
    pub num_alive_players: Option<u32>,
    #[serde(default)]
    pub safety_zone_position: Option<Location>,
    #[serde(default)]
    pub safety_zone_radius: Option<f64>,
    #[serde(default)]
    pub poison_gas_warning_position: Option<Location>,
    #[serde(default)]
    pub poison_gas_warning_radius: Option<f64>,
}

impl GameState {
    /// Whether `point` lies outside the current safe circle. `None` when the
    /// snapshot carries no usable safe zone.
    pub fn outside_safe_zone(&self, point: &Location) -> Option<bool> {
        let center = self.safety_zone_position?;
        let radius = self.safety_zone_radius.filter(|r| *r > 0.0)?;
        Some(planar_distance_units(&center, point) > radius)
    }
}
