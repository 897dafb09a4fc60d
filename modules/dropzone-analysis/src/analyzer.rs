//! Analysis orchestrator.
//!
//! `analyze_match` runs a linear pipeline: validate, fetch the match, find
//! the telemetry asset, fetch and decode it, then the synchronous stages
//! (per-player reduction, summary, insights). Any failure aborts the run;
//! nothing partial is returned.

use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use pubg_client::MatchResponse;

use dropzone_telemetry::decode_payload;

use crate::career;
use crate::error::{AnalysisError, Result};
use crate::insights::{match_insights, player_insights};
use crate::reducer::PlayerReducer;
use crate::summary::build_summary;
use crate::traits::MatchSource;
use crate::types::{MatchAnalysis, MatchHistory, PlayerAnalysis, PlayerStats};
use crate::validation::{validate_match_id, validate_player_names};

/// Stages of a match analysis, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchMatch,
    ExtractTelemetryUrl,
    FetchTelemetry,
    DecodeTelemetry,
    ReducePerPlayer,
    BuildSummary,
    GenerateInsights,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::FetchMatch => "fetch_match",
            Stage::ExtractTelemetryUrl => "extract_telemetry_url",
            Stage::FetchTelemetry => "fetch_telemetry",
            Stage::DecodeTelemetry => "decode_telemetry",
            Stage::ReducePerPlayer => "reduce_per_player",
            Stage::BuildSummary => "build_summary",
            Stage::GenerateInsights => "generate_insights",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

pub struct Analyzer {
    source: Arc<dyn MatchSource>,
}

impl Analyzer {
    pub fn new(source: Arc<dyn MatchSource>) -> Self {
        Self { source }
    }

    pub async fn analyze_match(
        &self,
        match_id: &str,
        player_names: &[String],
    ) -> Result<MatchAnalysis> {
        validate_match_id(match_id)?;
        validate_player_names(player_names, 1)?;

        tracing::info!(
            match_id,
            stage = %Stage::FetchMatch,
            players = player_names.len(),
            "Analyzing match"
        );
        let doc = self
            .source
            .fetch_match(match_id)
            .await
            .map_err(|source| AnalysisError::MatchFetch {
                match_id: match_id.to_string(),
                source,
            })?;

        tracing::info!(match_id, stage = %Stage::ExtractTelemetryUrl, "Match loaded");
        let url = doc
            .telemetry_url()
            .ok_or_else(|| AnalysisError::MissingTelemetryUrl(match_id.to_string()))?;

        tracing::info!(match_id, stage = %Stage::FetchTelemetry, url, "Fetching telemetry");
        let payload = self
            .source
            .fetch_telemetry(url)
            .await
            .map_err(AnalysisError::TelemetryFetch)?;

        tracing::info!(match_id, stage = %Stage::DecodeTelemetry, "Decoding telemetry");
        let events = decode_payload(payload)?;

        tracing::info!(
            match_id,
            stage = %Stage::ReducePerPlayer,
            events = events.len(),
            "Reducing telemetry"
        );
        let analysis_date = chrono::Utc::now();
        let now = analysis_date.timestamp_millis();
        let players: Vec<PlayerAnalysis> = player_names
            .iter()
            .map(|name| {
                let report = PlayerReducer::new(name.as_str()).run(&events, now);
                PlayerAnalysis {
                    name: name.clone(),
                    id: report.account_id.unwrap_or_else(|| name.clone()),
                    insights: player_insights(&report.stats),
                    stats: report.stats,
                    timeline: report.timeline,
                }
            })
            .collect();

        tracing::info!(match_id, stage = %Stage::BuildSummary, "Building match summary");
        let match_summary = build_summary(&events, Some(&doc));

        tracing::info!(match_id, stage = %Stage::GenerateInsights, "Generating insights");
        let insights = match_insights(&players, &events, &match_summary);

        tracing::info!(
            match_id,
            stage = %Stage::Done,
            map = %match_summary.map,
            quality = insights.overall_match_quality,
            "Match analysis complete"
        );

        Ok(MatchAnalysis {
            match_id: match_id.to_string(),
            analysis_date,
            players,
            match_summary,
            insights,
        })
    }

    /// Career stats over the player's most recent matches. Matches that fail
    /// to load are skipped.
    pub async fn player_stats(&self, name: &str) -> Result<PlayerStats> {
        validate_player_names(&[name.to_string()], 1)?;

        let player = self
            .source
            .fetch_player_by_name(name)
            .await
            .map_err(|source| AnalysisError::PlayerFetch {
                name: name.to_string(),
                source,
            })?;

        let match_ids: Vec<&str> = player
            .match_ids()
            .take(career::MAX_RECENT_MATCHES)
            .collect();
        tracing::info!(player = name, matches = match_ids.len(), "Loading recent matches");

        let results = join_all(match_ids.iter().map(|id| self.source.fetch_match(id))).await;

        let docs: Vec<MatchResponse> = match_ids
            .iter()
            .zip(results)
            .filter_map(|(id, result)| match result {
                Ok(doc) => Some(doc),
                Err(e) => {
                    tracing::warn!(
                        player = name,
                        match_id = *id,
                        error = %e,
                        "Skipping match that failed to load"
                    );
                    None
                }
            })
            .collect();

        let mut stats = career::player_stats(&player, &docs);
        if stats.player_name.is_empty() {
            stats.player_name = name.to_string();
        }

        tracing::info!(
            player = name,
            matches = stats.overall_stats.matches_played,
            kd = stats.overall_stats.kd_ratio,
            "Player stats ready"
        );
        Ok(stats)
    }

    pub async fn player_history(&self, name: &str) -> Result<Vec<MatchHistory>> {
        let stats = self.player_stats(name).await?;
        Ok(career::history(&stats))
    }

    /// Stats for two or more players, fetched concurrently. The first
    /// failure aborts the comparison.
    pub async fn compare_players(&self, names: &[String]) -> Result<Vec<PlayerStats>> {
        validate_player_names(names, 2)?;

        tracing::info!(players = names.len(), "Comparing players");
        join_all(names.iter().map(|name| self.player_stats(name)))
            .await
            .into_iter()
            .collect()
    }
}
