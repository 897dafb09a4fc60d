//! Rule-based insights. Thresholds are fixed, not configurable.

use dropzone_telemetry::{EventKind, TelemetryEvent};

use crate::types::{
    AnalysisInsights, KeyMoment, MatchSummary, MomentType, PlayerAnalysis, PlayerInsights,
    PlayerMatchStats, TeamPerformance,
};

const MAX_KEY_MOMENTS: usize = 10;
const KILL_IMPACT: u8 = 5;

/// Kills per death; kills alone when the player never died.
pub fn kd_ratio(kills: u32, deaths: u32) -> f64 {
    if deaths == 0 {
        kills as f64
    } else {
        kills as f64 / deaths as f64
    }
}

pub fn performance_rating(kd: f64) -> u8 {
    match kd {
        kd if kd >= 3.0 => 5,
        kd if kd >= 2.0 => 4,
        kd if kd >= 1.2 => 3,
        kd if kd >= 0.8 => 2,
        _ => 1,
    }
}

pub fn player_insights(stats: &PlayerMatchStats) -> PlayerInsights {
    let kd = kd_ratio(stats.kills, stats.deaths);
    let headshots = stats.combat.headshot_percentage;
    let distance = stats.movement.total_distance;

    let mut strengths = Vec::new();
    if stats.kills >= 5 {
        strengths.push("High kill count".to_string());
    }
    if stats.damage_dealt > 1200.0 {
        strengths.push("High damage output".to_string());
    }
    if headshots > 0.35 {
        strengths.push("Excellent headshot accuracy".to_string());
    }
    if distance > 6000.0 {
        strengths.push("Strong map rotation".to_string());
    }

    let mut weaknesses = Vec::new();
    if stats.deaths > stats.kills {
        weaknesses.push("More deaths than kills".to_string());
    }
    if stats.movement.time_in_blue_zone > 90.0 {
        weaknesses.push("Too much time in the blue zone".to_string());
    }
    if stats.healing.boost_used < 2 {
        weaknesses.push("Rarely uses boost items".to_string());
    }

    let mut recommendations = Vec::new();
    if kd < 1.0 {
        recommendations.push("Focus on survival and positioning".to_string());
    }
    if headshots < 0.2 {
        recommendations.push("Improve aim and accuracy".to_string());
    }
    if distance < 4000.0 {
        recommendations.push("Increase map awareness and rotation".to_string());
    }
    if stats.healing.boost_used < 2 {
        recommendations.push("Use boosts before fights to keep health regenerating".to_string());
    }

    PlayerInsights {
        strengths,
        weaknesses,
        improvement_areas: recommendations.clone(),
        recommendations,
        performance_rating: performance_rating(kd),
    }
}

/// Match-level insights across all analysed players.
pub fn match_insights(
    players: &[PlayerAnalysis],
    events: &[TelemetryEvent],
    summary: &MatchSummary,
) -> AnalysisInsights {
    let n = players.len();
    let mean = |f: &dyn Fn(&PlayerAnalysis) -> f64| {
        if n == 0 {
            0.0
        } else {
            players.iter().map(f).sum::<f64>() / n as f64
        }
    };

    let overall_match_quality = mean(&|p| p.insights.performance_rating as f64);
    let avg_survival = mean(&|p| p.stats.survival_time);
    let avg_damage = mean(&|p| p.stats.damage_dealt);
    let avg_blue_zone = mean(&|p| p.stats.movement.time_in_blue_zone);
    let total_assists: u32 = players.iter().map(|p| p.stats.assists).sum();

    let coordination = if n == 0 {
        0.0
    } else {
        (total_assists as f64 / n as f64).clamp(0.0, 5.0)
    };
    let communication = if summary.match_duration > 0.0 {
        (avg_survival / summary.match_duration * 5.0).clamp(0.0, 5.0)
    } else {
        0.0
    };
    let strategy = (avg_damage / 300.0).clamp(0.0, 5.0);

    let mut strategic_insights = Vec::new();
    if n > 0 {
        if avg_survival < 600.0 {
            strategic_insights
                .push("Team eliminated early - focus on better landing strategy".to_string());
        }
        if avg_damage < 500.0 {
            strategic_insights
                .push("Low damage output - improve engagement and positioning".to_string());
        }
        if avg_blue_zone > 120.0 {
            strategic_insights
                .push("Excessive blue zone exposure - rotate earlier".to_string());
        }
    }

    AnalysisInsights {
        overall_match_quality,
        key_moments: key_moments(events),
        team_performance: TeamPerformance {
            coordination,
            communication,
            strategy,
            overall_rating: overall_match_quality,
        },
        strategic_insights,
    }
}

/// The first kills in stream order.
pub fn key_moments(events: &[TelemetryEvent]) -> Vec<KeyMoment> {
    events
        .iter()
        .filter_map(|e| {
            let (killer, victim) = match &e.kind {
                EventKind::PlayerKill(k) => (k.killer.as_ref(), k.victim.as_ref()),
                EventKind::PlayerKillV2(k) => (k.killer.as_ref(), k.victim.as_ref()),
                _ => return None,
            };
            let killer = killer.map(|c| c.name.clone()).unwrap_or_default();
            let victim = victim.map(|c| c.name.clone()).unwrap_or_default();
            Some(KeyMoment {
                timestamp: e.timestamp.unwrap_or(0),
                moment_type: MomentType::Kill,
                description: format!("{killer} eliminated {victim}"),
                impact: KILL_IMPACT,
                players: vec![killer, victim],
            })
        })
        .take(MAX_KEY_MOMENTS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropzone_telemetry::decode_payload;
    use serde_json::{json, Value};

    fn player(assists: u32, damage: f64, survival: f64, blue_zone: f64) -> PlayerAnalysis {
        let mut stats = PlayerMatchStats {
            assists,
            damage_dealt: damage,
            survival_time: survival,
            ..Default::default()
        };
        stats.movement.time_in_blue_zone = blue_zone;
        PlayerAnalysis {
            name: "p".into(),
            id: "p".into(),
            insights: player_insights(&stats),
            stats,
            timeline: Vec::new(),
        }
    }

    fn lasting(secs: f64) -> MatchSummary {
        MatchSummary {
            match_duration: secs,
            ..Default::default()
        }
    }

    #[test]
    fn rating_breakpoints() {
        assert_eq!(performance_rating(3.0), 5);
        assert_eq!(performance_rating(2.5), 4);
        assert_eq!(performance_rating(1.2), 3);
        assert_eq!(performance_rating(0.8), 2);
        assert_eq!(performance_rating(0.79), 1);
        assert_eq!(kd_ratio(4, 0), 4.0);
        assert_eq!(kd_ratio(3, 2), 1.5);
    }

    #[test]
    fn empty_stats_get_the_floor_rating_and_basic_advice() {
        let insights = player_insights(&PlayerMatchStats::default());
        assert_eq!(insights.performance_rating, 1);
        assert!(insights.strengths.is_empty());
        assert_eq!(insights.weaknesses, vec!["Rarely uses boost items"]);
        assert_eq!(insights.recommendations.len(), 4);
        assert_eq!(insights.improvement_areas, insights.recommendations);
    }

    #[test]
    fn strong_player_collects_strengths() {
        let mut stats = PlayerMatchStats {
            kills: 6,
            deaths: 1,
            damage_dealt: 1500.0,
            ..Default::default()
        };
        stats.combat.headshot_percentage = 0.5;
        stats.movement.total_distance = 7000.0;
        stats.healing.boost_used = 3;

        let insights = player_insights(&stats);
        assert_eq!(insights.performance_rating, 5);
        assert_eq!(insights.strengths.len(), 4);
        assert!(insights.weaknesses.is_empty());
        assert!(insights.recommendations.is_empty());
    }

    #[test]
    fn no_players_means_neutral_team_scores() {
        let insights = match_insights(&[], &[], &MatchSummary::default());
        assert_eq!(insights.overall_match_quality, 0.0);
        assert_eq!(insights.team_performance, TeamPerformance::default());
        assert!(insights.strategic_insights.is_empty());
        assert!(insights.key_moments.is_empty());
    }

    #[test]
    fn team_scores_follow_assists_survival_and_damage() {
        let players = [player(3, 450.0, 900.0, 130.0), player(1, 150.0, 300.0, 150.0)];
        let insights = match_insights(&players, &[], &lasting(1200.0));

        let team = &insights.team_performance;
        assert_eq!(team.coordination, 2.0);
        assert_eq!(team.communication, 2.5);
        assert_eq!(team.strategy, 1.0);
        // Average survival of exactly 600 s is not an early exit.
        assert_eq!(
            insights.strategic_insights,
            vec![
                "Low damage output - improve engagement and positioning",
                "Excessive blue zone exposure - rotate earlier",
            ]
        );
    }

    #[test]
    fn team_scores_clamp_at_five() {
        let players = [player(12, 3000.0, 2000.0, 0.0)];

        let insights = match_insights(&players, &[], &lasting(1000.0));
        let team = &insights.team_performance;
        assert_eq!(team.coordination, 5.0);
        assert_eq!(team.communication, 5.0);
        assert_eq!(team.strategy, 5.0);
        assert!(insights.strategic_insights.is_empty());

        let untimed = match_insights(&players, &[], &lasting(0.0));
        assert_eq!(untimed.team_performance.communication, 0.0);
    }

    #[test]
    fn early_elimination_is_called_out() {
        let insights = match_insights(&[player(0, 800.0, 120.0, 0.0)], &[], &lasting(1800.0));
        assert_eq!(
            insights.strategic_insights,
            vec!["Team eliminated early - focus on better landing strategy"]
        );
    }

    #[test]
    fn key_moments_keep_the_first_ten_kills() {
        let mut records: Vec<Value> = (0..12)
            .map(|i| {
                json!({ "_T": "LogPlayerKill", "_D": format!("2024-03-01T12:00:{i:02}Z"),
                        "killer": { "name": format!("K{i}") }, "victim": { "name": format!("V{i}") } })
            })
            .collect();
        records.insert(3, json!({ "_T": "LogHeal", "character": { "name": "K1" } }));
        records.insert(
            5,
            json!({ "_T": "LogPlayerKillV2", "_D": "2024-03-01T12:01:00Z",
                    "killer": { "name": "X" }, "victim": { "name": "Y" } }),
        );
        let events = decode_payload(Value::Array(records)).unwrap();

        let moments = key_moments(&events);
        assert_eq!(moments.len(), 10);
        assert_eq!(moments[0].description, "K0 eliminated V0");
        assert_eq!(moments[0].players, vec!["K0", "V0"]);
        assert_eq!(moments[4].description, "X eliminated Y");
        assert_eq!(moments[9].description, "K8 eliminated V8");
        assert!(moments
            .iter()
            .all(|m| m.impact == 5 && m.moment_type == MomentType::Kill));

        let insights = match_insights(&[], &events, &lasting(0.0));
        assert_eq!(insights.key_moments, moments);
    }
}
