//! The closed set of telemetry event kinds the analysis understands.
//!
//! Wire records carry their kind in `_T` (e.g. `LogPlayerKill`) and their
//! timestamp in `_D`. Kinds outside this set, and known kinds whose payload
//! does not decode, become [`EventKind::Ignored`] rather than failing the
//! stream.

use serde::Deserialize;
use serde_json::Value;

use crate::geometry::parse_timestamp;
use crate::values::{
    nullable, Character, CharacterEntry, DamageInfo, GameResult, GameState, Item, Vehicle,
};

/// One decoded telemetry record.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryEvent {
    /// Epoch milliseconds parsed from `_D`. `None` when absent or unparseable.
    pub timestamp: Option<i64>,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    MatchStart(MatchStart),
    MatchEnd(MatchEnd),
    PlayerPosition(PlayerPosition),
    PlayerKill(PlayerKill),
    PlayerKillV2(PlayerKillV2),
    PlayerTakeDamage(PlayerTakeDamage),
    WeaponFireCount(WeaponFireCount),
    Heal(Heal),
    ItemUse(ItemUse),
    VehicleRide(VehicleRide),
    VehicleLeave(VehicleLeave),
    SwimStart(SwimStart),
    SwimEnd(SwimEnd),
    PlayerRevive(PlayerRevive),
    GameStatePeriodic(GameStatePeriodic),
    /// Any other discriminator, kept only for diagnostics.
    Ignored { kind: String },
}

impl EventKind {
    /// The wire discriminator for this kind.
    pub fn wire_name(&self) -> &str {
        match self {
            EventKind::MatchStart(_) => "LogMatchStart",
            EventKind::MatchEnd(_) => "LogMatchEnd",
            EventKind::PlayerPosition(_) => "LogPlayerPosition",
            EventKind::PlayerKill(_) => "LogPlayerKill",
            EventKind::PlayerKillV2(_) => "LogPlayerKillV2",
            EventKind::PlayerTakeDamage(_) => "LogPlayerTakeDamage",
            EventKind::WeaponFireCount(_) => "LogWeaponFireCount",
            EventKind::Heal(_) => "LogHeal",
            EventKind::ItemUse(_) => "LogItemUse",
            EventKind::VehicleRide(_) => "LogVehicleRide",
            EventKind::VehicleLeave(_) => "LogVehicleLeave",
            EventKind::SwimStart(_) => "LogSwimStart",
            EventKind::SwimEnd(_) => "LogSwimEnd",
            EventKind::PlayerRevive(_) => "LogPlayerRevive",
            EventKind::GameStatePeriodic(_) => "LogGameStatePeriodic",
            EventKind::Ignored { kind } => kind,
        }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, EventKind::Ignored { .. })
    }
}

impl TelemetryEvent {
    /// Decode one wire record. The caller has already checked that `_T` is a
    /// string; anything else about the record may be missing or malformed.
    pub fn from_wire(record: Value) -> Self {
        let kind_name = record
            .get("_T")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let timestamp = parse_timestamp(record.get("_D").and_then(Value::as_str));

        let kind = match serde_json::from_value::<WireKind>(record) {
            Ok(wire) => wire.into_kind(kind_name),
            Err(e) => {
                tracing::debug!(kind = %kind_name, error = %e, "Undecodable telemetry payload, ignoring");
                EventKind::Ignored { kind: kind_name }
            }
        };

        Self { timestamp, kind }
    }
}

#[derive(Deserialize)]
#[serde(tag = "_T")]
enum WireKind {
    #[serde(rename = "LogMatchStart")]
    MatchStart(MatchStart),
    #[serde(rename = "LogMatchEnd")]
    MatchEnd(MatchEnd),
    #[serde(rename = "LogPlayerPosition")]
    PlayerPosition(PlayerPosition),
    #[serde(rename = "LogPlayerKill")]
    PlayerKill(PlayerKill),
    #[serde(rename = "LogPlayerKillV2")]
    PlayerKillV2(PlayerKillV2),
    #[serde(rename = "LogPlayerTakeDamage")]
    PlayerTakeDamage(PlayerTakeDamage),
    #[serde(rename = "LogWeaponFireCount")]
    WeaponFireCount(WeaponFireCount),
    #[serde(rename = "LogHeal")]
    Heal(Heal),
    #[serde(rename = "LogItemUse")]
    ItemUse(ItemUse),
    #[serde(rename = "LogVehicleRide")]
    VehicleRide(VehicleRide),
    #[serde(rename = "LogVehicleLeave")]
    VehicleLeave(VehicleLeave),
    #[serde(rename = "LogSwimStart")]
    SwimStart(SwimStart),
    #[serde(rename = "LogSwimEnd")]
    SwimEnd(SwimEnd),
    #[serde(rename = "LogPlayerRevive")]
    PlayerRevive(PlayerRevive),
    #[serde(rename = "LogGameStatePeriodic")]
    GameStatePeriodic(GameStatePeriodic),
    #[serde(other)]
    Other,
}

impl WireKind {
    fn into_kind(self, kind_name: String) -> EventKind {
        match self {
            WireKind::MatchStart(e) => EventKind::MatchStart(e),
            WireKind::MatchEnd(e) => EventKind::MatchEnd(e),
            WireKind::PlayerPosition(e) => EventKind::PlayerPosition(e),
            WireKind::PlayerKill(e) => EventKind::PlayerKill(e),
            WireKind::PlayerKillV2(e) => EventKind::PlayerKillV2(e),
            WireKind::PlayerTakeDamage(e) => EventKind::PlayerTakeDamage(e),
            WireKind::WeaponFireCount(e) => EventKind::WeaponFireCount(e),
            WireKind::Heal(e) => EventKind::Heal(e),
            WireKind::ItemUse(e) => EventKind::ItemUse(e),
            WireKind::VehicleRide(e) => EventKind::VehicleRide(e),
            WireKind::VehicleLeave(e) => EventKind::VehicleLeave(e),
            WireKind::SwimStart(e) => EventKind::SwimStart(e),
            WireKind::SwimEnd(e) => EventKind::SwimEnd(e),
            WireKind::PlayerRevive(e) => EventKind::PlayerRevive(e),
            WireKind::GameStatePeriodic(e) => EventKind::GameStatePeriodic(e),
            WireKind::Other => EventKind::Ignored { kind: kind_name },
        }
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStart {
    #[serde(default)]
    pub map_name: Option<String>,
    #[serde(default)]
    pub weather_id: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub characters: Vec<CharacterEntry>,
    #[serde(default)]
    pub is_custom_game: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchEnd {
    #[serde(default, deserialize_with = "nullable")]
    pub characters: Vec<CharacterEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPosition {
    #[serde(default)]
    pub character: Option<Character>,
    #[serde(default)]
    pub elapsed_time: Option<f64>,
    #[serde(default)]
    pub num_alive_players: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerKill {
    #[serde(default)]
    pub killer: Option<Character>,
    #[serde(default)]
    pub victim: Option<Character>,
    #[serde(default)]
    pub assistant: Option<Character>,
    #[serde(default)]
    pub damage_reason: Option<String>,
    #[serde(default)]
    pub damage_type_category: Option<String>,
    #[serde(default)]
    pub damage_causer_name: Option<String>,
    /// Engine units (cm).
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub victim_game_result: Option<GameResult>,
}

/// Kill event introduced with the knock/finish split. Assists are reported
/// as account ids rather than a single assistant character.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerKillV2 {
    #[serde(default)]
    pub killer: Option<Character>,
    #[serde(default)]
    pub victim: Option<Character>,
    #[serde(default)]
    pub finisher: Option<Character>,
    #[serde(default)]
    pub killer_damage_info: Option<DamageInfo>,
    #[serde(default)]
    pub finish_damage_info: Option<DamageInfo>,
    #[serde(default)]
    pub victim_game_result: Option<GameResult>,
    #[serde(default, rename = "assists_AccountId", deserialize_with = "nullable")]
    pub assists_account_id: Vec<String>,
    #[serde(default)]
    pub is_suicide: Option<bool>,
}

impl PlayerKillV2 {
    /// Damage detail of the killing blow: killer info, else finisher info.
    pub fn damage_info(&self) -> Option<&DamageInfo> {
        self.killer_damage_info
            .as_ref()
            .or(self.finish_damage_info.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerTakeDamage {
    #[serde(default)]
    pub attacker: Option<Character>,
    #[serde(default)]
    pub victim: Option<Character>,
    #[serde(default)]
    pub damage_type_category: Option<String>,
    #[serde(default)]
    pub damage_reason: Option<String>,
    #[serde(default)]
    pub damage: Option<f64>,
    #[serde(default)]
    pub damage_causer_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponFireCount {
    #[serde(default)]
    pub character: Option<Character>,
    #[serde(default)]
    pub weapon_id: Option<String>,
    #[serde(default)]
    pub fire_count: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Heal {
    #[serde(default)]
    pub character: Option<Character>,
    #[serde(default)]
    pub item: Option<Item>,
    #[serde(default)]
    pub heal_amount: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUse {
    #[serde(default)]
    pub character: Option<Character>,
    #[serde(default)]
    pub item: Option<Item>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRide {
    #[serde(default)]
    pub character: Option<Character>,
    #[serde(default)]
    pub vehicle: Option<Vehicle>,
    #[serde(default)]
    pub seat_index: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleLeave {
    #[serde(default)]
    pub character: Option<Character>,
    #[serde(default)]
    pub vehicle: Option<Vehicle>,
    /// Engine units (cm).
    #[serde(default)]
    pub ride_distance: Option<f64>,
    #[serde(default)]
    pub seat_index: Option<i64>,
    #[serde(default)]
    pub max_speed: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwimStart {
    #[serde(default)]
    pub character: Option<Character>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwimEnd {
    #[serde(default)]
    pub character: Option<Character>,
    /// Engine units (cm).
    #[serde(default)]
    pub swim_distance: Option<f64>,
    #[serde(default)]
    pub max_swim_depth_of_water: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRevive {
    #[serde(default)]
    pub reviver: Option<Character>,
    #[serde(default)]
    pub victim: Option<Character>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatePeriodic {
    #[serde(default)]
    pub game_state: Option<GameState>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_kill_with_timestamp() {
        let event = TelemetryEvent::from_wire(json!({
            "_T": "LogPlayerKill",
            "_D": "2024-03-01T12:00:00Z",
            "killer": { "name": "A", "accountId": "account.a" },
            "victim": { "name": "B" },
            "damageReason": "HeadShot",
            "damageCauserName": "Item_Weapon_M416_C",
            "distance": 5000
        }));
        assert!(event.timestamp.is_some());
        let EventKind::PlayerKill(kill) = event.kind else {
            panic!("expected PlayerKill, got {:?}", event.kind);
        };
        assert_eq!(kill.killer.unwrap().name, "A");
        assert_eq!(kill.distance, Some(5000.0));
    }

    #[test]
    fn unknown_kind_is_ignored_with_its_name() {
        let event = TelemetryEvent::from_wire(json!({ "_T": "LogCarePackageLand", "_D": null }));
        assert_eq!(event.timestamp, None);
        assert_eq!(
            event.kind,
            EventKind::Ignored {
                kind: "LogCarePackageLand".into()
            }
        );
    }

    #[test]
    fn malformed_known_payload_degrades_to_ignored() {
        let event = TelemetryEvent::from_wire(json!({
            "_T": "LogPlayerTakeDamage",
            "damage": "a lot"
        }));
        assert!(event.kind.is_ignored());
        assert_eq!(event.kind.wire_name(), "LogPlayerTakeDamage");
    }

    #[test]
    fn v2_kill_reads_assist_account_ids() {
        let event = TelemetryEvent::from_wire(json!({
            "_T": "LogPlayerKillV2",
            "killer": { "name": "A" },
            "victim": { "name": "B" },
            "killerDamageInfo": { "damageReason": "TorsoShot", "damageCauserName": "WeapAK47_C", "distance": 1200.5 },
            "assists_AccountId": ["account.c"]
        }));
        let EventKind::PlayerKillV2(kill) = event.kind else {
            panic!("expected PlayerKillV2");
        };
        assert_eq!(kill.assists_account_id, vec!["account.c".to_string()]);
        assert_eq!(
            kill.damage_info().and_then(|d| d.damage_causer_name.as_deref()),
            Some("WeapAK47_C")
        );
    }

    #[test]
    fn wire_name_round_trips_for_known_kinds() {
        let event = TelemetryEvent::from_wire(json!({ "_T": "LogSwimStart", "character": { "name": "A" } }));
        assert_eq!(event.kind.wire_name(), "LogSwimStart");
    }
}
