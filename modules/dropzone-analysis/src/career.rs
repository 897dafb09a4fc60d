//! Career stats from a player's recent match documents.

use pubg_client::{MatchResponse, ParticipantStats, Player};

use crate::insights::kd_ratio;
use crate::types::{MatchHistory, OverallStats, PlayerStats, RecentMatch};

/// How many of the player's most recent matches are loaded.
pub const MAX_RECENT_MATCHES: usize = 10;

const UNKNOWN: &str = "Unknown";

/// The player's row in one match, matched by account id, then by name.
pub fn recent_match(player: &Player, doc: &MatchResponse) -> Option<RecentMatch> {
    let participant: &ParticipantStats = doc.participant_for(&player.id).or_else(|| {
        doc.participants()
            .find(|p| !p.name.is_empty() && p.name == player.attributes.name)
    })?;

    let attributes = &doc.data.attributes;
    Some(RecentMatch {
        match_id: doc.id().to_string(),
        map_name: attributes
            .map_name
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string()),
        game_mode: attributes
            .game_mode
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string()),
        kills: participant.kills,
        placement: participant.win_place,
        damage_dealt: participant.damage_dealt,
        survival_time: participant.time_survived,
        date: attributes.created_at.clone().unwrap_or_default(),
    })
}

/// Aggregate over the loaded matches. A match not won counts as one death.
pub fn overall_stats(matches: &[RecentMatch]) -> OverallStats {
    let played = matches.len() as u32;
    if played == 0 {
        return OverallStats::default();
    }

    let wins = matches.iter().filter(|m| m.placement == 1).count() as u32;
    let kills: u32 = matches.iter().map(|m| m.kills).sum();
    let deaths = played - wins;
    let total_damage: f64 = matches.iter().map(|m| m.damage_dealt).sum();
    let total_survival: f64 = matches.iter().map(|m| m.survival_time).sum();

    OverallStats {
        matches_played: played,
        wins,
        kills,
        deaths,
        kd_ratio: kd_ratio(kills, deaths),
        win_rate: wins as f64 / played as f64 * 100.0,
        avg_damage: total_damage / played as f64,
        avg_survival_time: total_survival / played as f64,
    }
}

pub fn player_stats(player: &Player, docs: &[MatchResponse]) -> PlayerStats {
    let recent_matches: Vec<RecentMatch> = docs
        .iter()
        .filter_map(|doc| recent_match(player, doc))
        .collect();

    PlayerStats {
        player_name: player.attributes.name.clone(),
        player_id: player.id.clone(),
        overall_stats: overall_stats(&recent_matches),
        recent_matches,
    }
}

pub fn history(stats: &PlayerStats) -> Vec<MatchHistory> {
    stats
        .recent_matches
        .iter()
        .map(|m| MatchHistory {
            match_id: m.match_id.clone(),
            player_name: stats.player_name.clone(),
            map_name: m.map_name.clone(),
            game_mode: m.game_mode.clone(),
            kills: m.kills,
            placement: m.placement,
            damage_dealt: m.damage_dealt,
            survival_time: m.survival_time,
            date: m.date.clone(),
        })
        .collect()
}
