//! End-to-end analyzer tests against `MockSource`.
//!
//! No network: every match, telemetry file and player is registered on the
//! mock up front. Assertions cover the pipeline result, the error taxonomy,
//! and that validation failures never reach the source.

use std::sync::Arc;

use dropzone_analysis::testing::{career_match_doc, match_doc, player_doc, MockSource};
use dropzone_analysis::{
    export_match_analysis, export_player_stats, AnalysisError, Analyzer, MatchAnalysis,
    MomentType, PlayerStats, ValidationError,
};
use dropzone_telemetry::MalformedTelemetry;
use pubg_client::PubgError;
use serde_json::{json, Value};

const MATCH_ID: &str = "0b5e7cbc-5bd1-4b5e-9b1e-2b6f3f8b8a41";
const TELEMETRY_URL: &str = "https://telemetry-cdn.pubg.com/bluehole-pubg/steam/2024/03/01/telemetry.json";

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn telemetry() -> Value {
    json!([
        { "_T": "LogMatchStart", "_D": "2024-03-01T12:00:00Z", "mapName": "Baltic_Main",
          "characters": [
              { "character": { "name": "Alpha", "accountId": "account.alpha", "teamId": 1 } },
              { "character": { "name": "Bravo", "accountId": "account.bravo", "teamId": 2 } },
              { "character": { "name": "Charlie", "accountId": "account.charlie", "teamId": 3 } }
          ] },
        { "_T": "LogGameStatePeriodic", "_D": "2024-03-01T12:02:00Z", "gameState": {
            "numAlivePlayers": 3, "safetyZoneRadius": 400000.0,
            "safetyZonePosition": { "x": 400000.0, "y": 400000.0, "z": 0.0 } } },
        { "_T": "LogPlayerPosition", "_D": "2024-03-01T12:01:00Z",
          "character": { "name": "Alpha", "location": { "x": 0.0, "y": 0.0, "z": 0.0 } } },
        { "_T": "LogPlayerPosition", "_D": "2024-03-01T12:08:00Z",
          "character": { "name": "Alpha", "location": { "x": 300000.0, "y": 400000.0, "z": 0.0 } } },
        { "_T": "LogPlayerTakeDamage", "_D": "2024-03-01T12:09:00Z",
          "attacker": { "name": "Alpha" }, "victim": { "name": "Bravo" },
          "damage": 100.0, "damageCauserName": "Item_Weapon_Kar98k_C", "damageReason": "HeadShot" },
        { "_T": "LogPlayerKillV2", "_D": "2024-03-01T12:09:01Z",
          "killer": { "name": "Alpha", "accountId": "account.alpha" },
          "victim": { "name": "Bravo", "accountId": "account.bravo" },
          "killerDamageInfo": { "damageCauserName": "Item_Weapon_Kar98k_C", "damageReason": "HeadShot", "distance": 21000.0 },
          "victimGameResult": { "rank": 2 },
          "assists_AccountId": [] },
        { "_T": "LogPlayerKill", "_D": "2024-03-01T12:04:00Z",
          "killer": { "name": "Bravo" }, "victim": { "name": "Charlie" },
          "damageCauserName": "WeapUMP_C", "distance": 800.0,
          "victimGameResult": { "rank": 3 } },
        { "_T": "LogMatchEnd", "_D": "2024-03-01T12:10:00Z",
          "characters": [{ "character": { "name": "Alpha", "ranking": 1 } }] }
    ])
}

fn source() -> MockSource {
    MockSource::new()
        .on_match(MATCH_ID, match_doc(MATCH_ID, TELEMETRY_URL))
        .on_telemetry(TELEMETRY_URL, telemetry())
}

async fn analyze(source: MockSource, players: &[&str]) -> Result<MatchAnalysis, AnalysisError> {
    Analyzer::new(Arc::new(source))
        .analyze_match(MATCH_ID, &names(players))
        .await
}

// ---------------------------------------------------------------------------
// Match analysis
// ---------------------------------------------------------------------------

#[tokio::test]
async fn analyzes_a_match_end_to_end() {
    let analysis = analyze(source(), &["Alpha", "Bravo"]).await.unwrap();

    assert_eq!(analysis.match_id, MATCH_ID);
    assert_eq!(analysis.players.len(), 2);

    let alpha = &analysis.players[0];
    assert_eq!(alpha.id, "account.alpha");
    assert_eq!(alpha.stats.kills, 1);
    assert_eq!(alpha.stats.placement, 1);
    assert_eq!(alpha.stats.combat.longest_kill, 210.0);
    assert_eq!(alpha.stats.weapons["Kar98k_C"].headshots, 1);
    assert_eq!(alpha.stats.movement.total_distance, 5000.0);
    assert_eq!(alpha.insights.performance_rating, 2);

    let bravo = &analysis.players[1];
    assert_eq!(bravo.id, "account.bravo");
    assert_eq!(bravo.stats.deaths, 1);
    assert_eq!(bravo.stats.placement, 2);

    let summary = &analysis.match_summary;
    assert_eq!(summary.map, "Baltic_Main");
    assert_eq!(summary.game_mode, "squad-fpp");
    assert_eq!(summary.match_duration, 1800.0);
    assert_eq!(summary.total_players, 3);
    assert_eq!(summary.timeline.len(), 1);
    assert_eq!(summary.timeline[0].time, 120.0);
    assert_eq!(summary.timeline[0].zone.radius, 4000.0);

    let moments = &analysis.insights.key_moments;
    assert_eq!(moments.len(), 2);
    assert_eq!(moments[0].description, "Alpha eliminated Bravo");
    assert_eq!(moments[0].moment_type, MomentType::Kill);
    assert_eq!(moments[1].players, vec!["Bravo", "Charlie"]);
    assert!(moments.iter().all(|m| m.impact == 5));
}

#[tokio::test]
async fn unknown_player_gets_default_stats_and_name_as_id() {
    let analysis = analyze(source(), &["Nobody"]).await.unwrap();
    let nobody = &analysis.players[0];

    assert_eq!(nobody.id, "Nobody");
    assert_eq!(nobody.stats.kills, 0);
    assert_eq!(nobody.stats.placement, 1);
    assert!(nobody.timeline.is_empty());
}

#[tokio::test]
async fn team_metrics_are_clamped() {
    let analysis = analyze(source(), &["Alpha", "Bravo"]).await.unwrap();
    let team = &analysis.insights.team_performance;

    for score in [team.coordination, team.communication, team.strategy, team.overall_rating] {
        assert!((0.0..=5.0).contains(&score), "score out of range: {score}");
    }
    assert_eq!(team.overall_rating, analysis.insights.overall_match_quality);
    assert!(analysis
        .insights
        .strategic_insights
        .iter()
        .any(|s| s.contains("eliminated early")));
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_match_id_is_rejected_before_any_fetch() {
    let mock = Arc::new(source());
    let err = Analyzer::new(mock.clone())
        .analyze_match("not-a-guid", &names(&["Alpha"]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AnalysisError::Validation(ValidationError::InvalidMatchId(_))
    ));
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn empty_or_blank_player_lists_are_rejected() {
    let mock = Arc::new(source());
    let analyzer = Analyzer::new(mock.clone());

    let err = analyzer.analyze_match(MATCH_ID, &[]).await.unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Validation(ValidationError::NoPlayers)
    ));

    let err = analyzer
        .analyze_match(MATCH_ID, &names(&["Alpha", " "]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Validation(ValidationError::BlankPlayerName)
    ));
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn html_telemetry_is_malformed_not_a_fetch_error() {
    let mock = MockSource::new()
        .on_match(MATCH_ID, match_doc(MATCH_ID, TELEMETRY_URL))
        .on_telemetry(TELEMETRY_URL, json!("<!doctype html><html><body>Error</body></html>"));

    let err = analyze(mock, &["Alpha"]).await.unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::MalformedTelemetry(MalformedTelemetry::HtmlResponse)
    ));
}

#[tokio::test]
async fn telemetry_download_failure_is_a_fetch_error() {
    let mock = MockSource::new().on_match(MATCH_ID, match_doc(MATCH_ID, TELEMETRY_URL));

    let err = analyze(mock, &["Alpha"]).await.unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::TelemetryFetch(PubgError::NotFound { .. })
    ));
}

#[tokio::test]
async fn missing_match_and_missing_asset_are_distinct() {
    let err = analyze(MockSource::new(), &["Alpha"]).await.unwrap_err();
    match &err {
        AnalysisError::MatchFetch { match_id, source } => {
            assert_eq!(match_id, MATCH_ID);
            assert!(matches!(source, PubgError::NotFound { .. }));
        }
        other => panic!("expected MatchFetch, got {other:?}"),
    }
    assert!(err.to_string().contains(MATCH_ID));

    let no_assets = MockSource::new().on_match(MATCH_ID, json!({ "data": { "id": MATCH_ID } }));
    let err = analyze(no_assets, &["Alpha"]).await.unwrap_err();
    assert!(matches!(err, AnalysisError::MissingTelemetryUrl(_)));
}

// ---------------------------------------------------------------------------
// Career
// ---------------------------------------------------------------------------

fn career_source() -> MockSource {
    MockSource::new()
        .on_player(
            "Alpha",
            player_doc("account.alpha", "Alpha", &["m-1", "m-2", "m-missing"]),
        )
        .on_player("Bravo", player_doc("account.bravo", "Bravo", &["m-1"]))
        .on_match(
            "m-1",
            career_match_doc(
                "m-1",
                "2024-03-01T12:00:00Z",
                json!({ "name": "Alpha", "playerId": "account.alpha", "kills": 4,
                        "damageDealt": 420.0, "timeSurvived": 1700.0, "winPlace": 1 }),
            ),
        )
        .on_match(
            "m-2",
            career_match_doc(
                "m-2",
                "2024-03-02T12:00:00Z",
                json!({ "name": "Alpha", "playerId": "account.alpha", "kills": 2,
                        "damageDealt": 180.0, "timeSurvived": 700.0, "winPlace": 18 }),
            ),
        )
}

#[tokio::test]
async fn player_stats_skip_matches_that_fail_to_load() {
    let stats = Analyzer::new(Arc::new(career_source()))
        .player_stats("Alpha")
        .await
        .unwrap();

    assert_eq!(stats.player_id, "account.alpha");
    assert_eq!(stats.recent_matches.len(), 2);
    let overall = &stats.overall_stats;
    assert_eq!(overall.matches_played, 2);
    assert_eq!(overall.wins, 1);
    assert_eq!(overall.deaths, 1);
    assert_eq!(overall.kills, 6);
    assert_eq!(overall.kd_ratio, 6.0);
    assert_eq!(overall.win_rate, 50.0);
    assert_eq!(overall.avg_damage, 300.0);
    assert_eq!(overall.avg_survival_time, 1200.0);
}

#[tokio::test]
async fn player_history_flattens_recent_matches() {
    let history = Analyzer::new(Arc::new(career_source()))
        .player_history("Alpha")
        .await
        .unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].match_id, "m-1");
    assert_eq!(history[0].player_name, "Alpha");
    assert_eq!(history[0].map_name, "Desert_Main");
    assert_eq!(history[1].placement, 18);
}

#[tokio::test]
async fn unknown_player_is_a_player_fetch_error() {
    let err = Analyzer::new(Arc::new(career_source()))
        .player_stats("Zulu")
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::PlayerFetch { ref name, .. } if name == "Zulu"));
}

#[tokio::test]
async fn comparison_needs_two_players() {
    let mock = Arc::new(career_source());
    let analyzer = Analyzer::new(mock.clone());

    let err = analyzer
        .compare_players(&names(&["Alpha"]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Validation(ValidationError::TooFewPlayers { required: 2, got: 1 })
    ));
    assert!(mock.calls().is_empty());

    let compared = analyzer
        .compare_players(&names(&["Alpha", "Bravo"]))
        .await
        .unwrap();
    assert_eq!(compared.len(), 2);
    assert_eq!(compared[1].player_name, "Bravo");
    // Bravo has no participant row in m-1.
    assert_eq!(compared[1].overall_stats.matches_played, 0);
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[tokio::test]
async fn match_export_round_trips() {
    let analysis = analyze(source(), &["Alpha", "Bravo"]).await.unwrap();
    let json = export_match_analysis(&analysis).unwrap();

    assert!(json.contains("\n  \"matchId\""));
    assert!(json.contains("\"matchSummary\""));
    assert!(json.contains("\"kind\": \"kill\""));

    let back: MatchAnalysis = serde_json::from_str(&json).unwrap();
    assert_eq!(back, analysis);
}

#[tokio::test]
async fn player_stats_export_round_trips() {
    let stats = Analyzer::new(Arc::new(career_source()))
        .player_stats("Alpha")
        .await
        .unwrap();
    let json = export_player_stats(&stats).unwrap();

    assert!(json.contains("\"overallStats\""));
    let back: PlayerStats = serde_json::from_str(&json).unwrap();
    assert_eq!(back, stats);
}
