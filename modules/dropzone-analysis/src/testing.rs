// Test double for the analyzer's upstream.
//
// MockSource (MatchSource) is HashMap-based: match id -> document, telemetry
// URL -> raw payload, player name -> player. Unregistered keys return
// `PubgError::NotFound`. Every call is recorded so tests can assert that
// nothing was fetched.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use pubg_client::{MatchResponse, Player, PubgError};
use serde_json::{json, Value};

use crate::traits::MatchSource;

// ---------------------------------------------------------------------------
// MockSource
// ---------------------------------------------------------------------------

/// Builder pattern: `.on_match()`, `.on_telemetry()`, `.on_player()`.
pub struct MockSource {
    matches: HashMap<String, MatchResponse>,
    telemetry: HashMap<String, Value>,
    players: HashMap<String, Player>,
    calls: Mutex<Vec<String>>,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            matches: HashMap::new(),
            telemetry: HashMap::new(),
            players: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on_match(mut self, match_id: &str, doc: Value) -> Self {
        let parsed: MatchResponse =
            serde_json::from_value(doc).expect("MockSource: invalid match document");
        self.matches.insert(match_id.to_string(), parsed);
        self
    }

    pub fn on_telemetry(mut self, url: &str, payload: Value) -> Self {
        self.telemetry.insert(url.to_string(), payload);
        self
    }

    pub fn on_player(mut self, name: &str, doc: Value) -> Self {
        let parsed: Player = serde_json::from_value(doc).expect("MockSource: invalid player");
        self.players.insert(name.to_string(), parsed);
        self
    }

    /// Calls made so far, as `"<method> <key>"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MatchSource for MockSource {
    async fn fetch_match(&self, match_id: &str) -> Result<MatchResponse, PubgError> {
        self.record(format!("match {match_id}"));
        self.matches
            .get(match_id)
            .cloned()
            .ok_or_else(|| PubgError::NotFound {
                resource: format!("Match '{match_id}'"),
            })
    }

    async fn fetch_telemetry(&self, url: &str) -> Result<Value, PubgError> {
        self.record(format!("telemetry {url}"));
        self.telemetry
            .get(url)
            .cloned()
            .ok_or_else(|| PubgError::NotFound {
                resource: "Telemetry data".to_string(),
            })
    }

    async fn fetch_player_by_name(&self, name: &str) -> Result<Player, PubgError> {
        self.record(format!("player {name}"));
        self.players
            .get(name)
            .cloned()
            .ok_or_else(|| PubgError::NotFound {
                resource: format!("Player '{name}'"),
            })
    }
}

// ---------------------------------------------------------------------------
// Fixture builders
// ---------------------------------------------------------------------------

/// A match document whose telemetry lives at `telemetry_url`.
pub fn match_doc(match_id: &str, telemetry_url: &str) -> Value {
    json!({
        "data": {
            "type": "match",
            "id": match_id,
            "attributes": {
                "createdAt": "2024-03-01T12:00:00Z",
                "duration": 1800,
                "gameMode": "squad-fpp",
                "mapName": "Baltic_Main",
                "shardId": "steam"
            },
            "relationships": {
                "assets": { "data": [{ "type": "asset", "id": "asset-1" }] }
            }
        },
        "included": [
            { "type": "asset", "id": "asset-1", "attributes": { "name": "telemetry", "URL": telemetry_url } }
        ]
    })
}

/// A match document carrying one participant's end-of-match stats.
pub fn career_match_doc(match_id: &str, created_at: &str, participant: Value) -> Value {
    json!({
        "data": {
            "type": "match",
            "id": match_id,
            "attributes": {
                "createdAt": created_at,
                "duration": 1800,
                "gameMode": "solo",
                "mapName": "Desert_Main"
            }
        },
        "included": [
            { "type": "participant", "id": format!("p-{match_id}"), "attributes": { "stats": participant } }
        ]
    })
}

/// A player document listing `match_ids` as recent matches.
pub fn player_doc(account_id: &str, name: &str, match_ids: &[&str]) -> Value {
    let matches: Vec<Value> = match_ids
        .iter()
        .map(|id| json!({ "type": "match", "id": id }))
        .collect();
    json!({
        "type": "player",
        "id": account_id,
        "attributes": { "name": name, "shardId": "steam" },
        "relationships": { "matches": { "data": matches } }
    })
}
