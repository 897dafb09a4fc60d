pub mod error;
pub mod types;

pub use error::{PubgError, Result};
pub use types::{
    AssetAttributes, IncludedResource, MatchAttributes, MatchData, MatchRelationships,
    MatchResponse, ParticipantAttributes, ParticipantStats, Player, PlayerAttributes,
    PlayerRelationships, PlayersResponse, RelationshipList, ResourceRef,
};

use std::time::Duration;

use serde::de::DeserializeOwned;

pub const DEFAULT_BASE_URL: &str = "https://api.pubg.com";

/// JSON:API media type required by the PUBG API.
const ACCEPT: &str = "application/vnd.api+json";

pub struct PubgClient {
    client: reqwest::Client,
    base_url: String,
    shard: String,
    api_key: String,
}

impl PubgClient {
    pub fn new(api_key: &str, shard: &str) -> Result<Self> {
        Self::with_options(api_key, shard, DEFAULT_BASE_URL, Duration::from_secs(30))
    }

    pub fn with_options(
        api_key: &str,
        shard: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            shard: shard.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Fetch match metadata, including side-loaded assets and participants.
    pub async fn get_match(&self, match_id: &str) -> Result<MatchResponse> {
        let url = format!("{}/shards/{}/matches/{}", self.base_url, self.shard, match_id);
        self.get_api(&url, &format!("Match '{match_id}'")).await
    }

    /// Look up a player by exact in-game name.
    pub async fn get_player_by_name(&self, name: &str) -> Result<Player> {
        let url = format!("{}/shards/{}/players", self.base_url, self.shard);
        let resource = format!("Player '{name}'");
        let resp: PlayersResponse = self
            .get_api_with_query(&url, &[("filter[playerNames]", name)], &resource)
            .await?;

        resp.data
            .into_iter()
            .next()
            .ok_or(PubgError::NotFound { resource })
    }

    /// Download a telemetry file from the CDN.
    ///
    /// Returns the raw JSON. A body that is not JSON at all (an HTML error
    /// page, a plain-text denial) comes back as a JSON string so the caller
    /// can classify it instead of seeing a generic parse error.
    pub async fn get_telemetry(&self, telemetry_url: &str) -> Result<serde_json::Value> {
        tracing::debug!(url = telemetry_url, "Fetching telemetry");

        let resp = self
            .client
            .get(telemetry_url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PubgError::from_status(
                status.as_u16(),
                "Telemetry data",
                body,
            ));
        }

        let body = resp.text().await?;
        tracing::debug!(bytes = body.len(), "Telemetry downloaded");
        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
    }

    async fn get_api<T: DeserializeOwned>(&self, url: &str, resource: &str) -> Result<T> {
        self.get_api_with_query(url, &[], resource).await
    }

    async fn get_api_with_query<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        resource: &str,
    ) -> Result<T> {
        if self.api_key.is_empty() {
            return Err(PubgError::MissingApiKey);
        }

        let resp = self
            .client
            .get(url)
            .query(query)
            .bearer_auth(&self.api_key)
            .header("Accept", ACCEPT)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(url, status = status.as_u16(), "PUBG API request failed");
            return Err(PubgError::from_status(status.as_u16(), resource, body));
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
