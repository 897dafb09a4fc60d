use chrono::{DateTime, NaiveDateTime};

use crate::values::Location;

/// Engine units per metre. Telemetry coordinates and distances are in cm.
pub const UNITS_PER_METER: f64 = 100.0;

/// Euclidean distance between two engine-space points, in metres.
pub fn distance_meters(a: &Location, b: &Location) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let dz = b.z - a.z;
    (dx * dx + dy * dy + dz * dz).sqrt() / UNITS_PER_METER
}

/// Planar (x/y) distance in engine units. Used for zone containment checks.
pub fn planar_distance_units(a: &Location, b: &Location) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Convert a raw engine-unit value to metres. Missing values count as zero.
pub fn to_meters(raw: Option<f64>) -> f64 {
    raw.unwrap_or(0.0) / UNITS_PER_METER
}

/// Parse a telemetry timestamp to epoch milliseconds.
///
/// Accepts RFC 3339 (`2024-03-01T12:00:00.123Z`) and offset-less ISO-8601,
/// which is read as UTC. Returns `None` for absent or unparseable input.
pub fn parse_timestamp(iso: Option<&str>) -> Option<i64> {
    let raw = iso?.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc().timestamp_millis())
}
