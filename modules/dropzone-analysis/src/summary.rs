//! Match-level summary: map, mode, duration, and the zone/alive timeline.

use dropzone_telemetry::{to_meters, EventKind, TelemetryEvent};
use pubg_client::MatchResponse;

use crate::types::{MatchSummary, TimelinePoint, ZoneCenter, ZoneSnapshot};

const UNKNOWN: &str = "Unknown";

/// Build the summary from the decoded stream and, when available, the match
/// metadata. Metadata wins for duration, map and mode.
pub fn build_summary(events: &[TelemetryEvent], meta: Option<&MatchResponse>) -> MatchSummary {
    let start = events.iter().find_map(|e| match &e.kind {
        EventKind::MatchStart(s) => Some((e.timestamp, s)),
        _ => None,
    });
    let end_time = events.iter().find_map(|e| match &e.kind {
        EventKind::MatchEnd(_) => Some(e.timestamp),
        _ => None,
    });

    let start_time = start.and_then(|(ts, _)| ts);
    let roster_size = start
        .map(|(_, s)| s.characters.len() as u32)
        .filter(|n| *n > 0);

    let mut timeline: Vec<TimelinePoint> = events
        .iter()
        .filter_map(|e| match &e.kind {
            EventKind::GameStatePeriodic(p) => p.game_state.as_ref().map(|gs| (e.timestamp, gs)),
            _ => None,
        })
        .map(|(ts, gs)| {
            let time = match (ts, start_time) {
                (Some(ts), Some(start)) => (ts - start) as f64 / 1000.0,
                _ => gs.elapsed_time.unwrap_or(0.0),
            };
            let center = gs.safety_zone_position.unwrap_or_default();
            TimelinePoint {
                time,
                players_alive: gs.num_alive_players.or(roster_size).unwrap_or(0),
                zone: ZoneSnapshot {
                    radius: to_meters(gs.safety_zone_radius),
                    center: ZoneCenter {
                        x: to_meters(Some(center.x)),
                        y: to_meters(Some(center.y)),
                    },
                },
            }
        })
        .collect();
    timeline.sort_by(|a, b| a.time.total_cmp(&b.time));

    let attributes = meta.map(|m| &m.data.attributes);

    let total_players = roster_size
        .or_else(|| {
            meta.map(|m| m.participants().count() as u32)
                .filter(|n| *n > 0)
        })
        .unwrap_or(0);

    let match_duration = attributes
        .and_then(|a| a.duration)
        .filter(|d| *d > 0.0)
        .or_else(|| match (start_time, end_time.flatten()) {
            (Some(start), Some(end)) if end > start => Some((end - start) as f64 / 1000.0),
            _ => None,
        })
        .or_else(|| timeline.last().map(|p| p.time))
        .unwrap_or(0.0);

    let map = attributes
        .and_then(|a| a.map_name.clone())
        .or_else(|| start.and_then(|(_, s)| s.map_name.clone()))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string());

    let game_mode = attributes
        .and_then(|a| a.game_mode.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string());

    MatchSummary {
        total_players,
        match_duration,
        map,
        game_mode,
        timeline,
    }
}
