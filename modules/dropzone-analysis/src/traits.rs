//! Seams of the analysis pipeline.

use async_trait::async_trait;
use pubg_client::{MatchResponse, Player, PubgClient, PubgError};

/// Pure state updates. No I/O, no side effects.
///
/// Called once per event, in stream order.
pub trait Reducer<E, S>: Send + Sync {
    fn reduce(&self, state: &mut S, event: &E);
}

/// Upstream data the analyzer depends on.
///
/// Implemented by `PubgClient`; tests use `testing::MockSource`.
#[async_trait]
pub trait MatchSource: Send + Sync {
    async fn fetch_match(&self, match_id: &str) -> Result<MatchResponse, PubgError>;

    /// Raw telemetry payload. Bodies that are not JSON come back as a JSON
    /// string.
    async fn fetch_telemetry(&self, url: &str) -> Result<serde_json::Value, PubgError>;

    async fn fetch_player_by_name(&self, name: &str) -> Result<Player, PubgError>;
}

#[async_trait]
impl MatchSource for PubgClient {
    async fn fetch_match(&self, match_id: &str) -> Result<MatchResponse, PubgError> {
        self.get_match(match_id).await
    }

    async fn fetch_telemetry(&self, url: &str) -> Result<serde_json::Value, PubgError> {
        self.get_telemetry(url).await
    }

    async fn fetch_player_by_name(&self, name: &str) -> Result<Player, PubgError> {
        self.get_player_by_name(name).await
    }
}
