//! Typed PUBG match telemetry.
//!
//! Raw telemetry arrives as a JSON array of loosely-typed records keyed by a
//! `_T` discriminator. This crate decodes that array once, defensively, into
//! a closed set of event kinds. Everything downstream works on typed data.

pub mod events;
pub mod geometry;
pub mod payload;
pub mod values;

pub use events::{
    EventKind, GameStatePeriodic, Heal, ItemUse, MatchEnd, MatchStart, PlayerKill, PlayerKillV2,
    PlayerPosition, PlayerRevive, PlayerTakeDamage, SwimEnd, SwimStart, TelemetryEvent,
    VehicleLeave, VehicleRide, WeaponFireCount,
};
pub use geometry::{distance_meters, parse_timestamp, to_meters};
pub use payload::{decode_payload, MalformedTelemetry};
pub use values::{
    Character, CharacterEntry, DamageInfo, GameResult, GameResultStats, GameState, Item, Location,
    Vehicle,
};
