use serde::{Deserialize, Serialize};

// --- JSON:API envelope pieces ---

/// A `{ "type": ..., "id": ... }` relationship pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRef {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipList {
    #[serde(default)]
    pub data: Vec<ResourceRef>,
}

// --- Matches ---

/// Response of `GET /shards/{shard}/matches/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub data: MatchData,
    #[serde(default)]
    pub included: Vec<IncludedResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchData {
    pub id: String,
    #[serde(default)]
    pub attributes: MatchAttributes,
    #[serde(default)]
    pub relationships: MatchRelationships,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAttributes {
    #[serde(default)]
    pub created_at: Option<String>,
    /// Seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub game_mode: Option<String>,
    #[serde(default)]
    pub map_name: Option<String>,
    #[serde(default)]
    pub patch_version: Option<String>,
    #[serde(default)]
    pub shard_id: Option<String>,
    #[serde(default)]
    pub title_id: Option<String>,
    #[serde(default)]
    pub is_custom_match: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchRelationships {
    #[serde(default)]
    pub assets: RelationshipList,
    #[serde(default)]
    pub rosters: RelationshipList,
    #[serde(default)]
    pub participants: RelationshipList,
}

/// Side-loaded resources in a match document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IncludedResource {
    Asset {
        id: String,
        #[serde(default)]
        attributes: AssetAttributes,
    },
    Participant {
        id: String,
        #[serde(default)]
        attributes: ParticipantAttributes,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAttributes {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "URL")]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantAttributes {
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub shard_id: Option<String>,
    #[serde(default)]
    pub stats: ParticipantStats,
}

/// End-of-match stats for one participant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantStats {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub player_id: String,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub headshot_kills: u32,
    #[serde(default)]
    pub damage_dealt: f64,
    /// Seconds.
    #[serde(default)]
    pub time_survived: f64,
    #[serde(default)]
    pub win_place: u32,
    #[serde(default)]
    pub death_type: Option<String>,
}

impl MatchResponse {
    pub fn id(&self) -> &str {
        &self.data.id
    }

    /// URL of the telemetry asset.
    ///
    /// Follows the asset pointers in `relationships` first; if none resolve,
    /// takes any side-loaded asset carrying a URL.
    pub fn telemetry_url(&self) -> Option<&str> {
        let assets = || {
            self.included.iter().filter_map(|r| match r {
                IncludedResource::Asset { id, attributes } => attributes
                    .url
                    .as_deref()
                    .filter(|u| !u.is_empty())
                    .map(|u| (id.as_str(), u)),
                _ => None,
            })
        };

        self.data
            .relationships
            .assets
            .data
            .iter()
            .find_map(|r| assets().find(|(id, _)| *id == r.id).map(|(_, url)| url))
            .or_else(|| assets().next().map(|(_, url)| url))
    }

    pub fn participants(&self) -> impl Iterator<Item = &ParticipantStats> {
        self.included.iter().filter_map(|r| match r {
            IncludedResource::Participant { attributes, .. } => Some(&attributes.stats),
            _ => None,
        })
    }

    /// Stats for a player, matched by account id.
    pub fn participant_for(&self, player_id: &str) -> Option<&ParticipantStats> {
        self.participants().find(|p| p.player_id == player_id)
    }
}

// --- Players ---

/// Response of `GET /shards/{shard}/players?filter[playerNames]=...`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayersResponse {
    #[serde(default)]
    pub data: Vec<Player>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    #[serde(default)]
    pub attributes: PlayerAttributes,
    #[serde(default)]
    pub relationships: PlayerRelationships,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAttributes {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub shard_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub patch_version: Option<String>,
    #[serde(default)]
    pub title_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerRelationships {
    #[serde(default)]
    pub matches: RelationshipList,
}

impl Player {
    /// Recent match ids, most recent first as returned by the API.
    pub fn match_ids(&self) -> impl Iterator<Item = &str> {
        self.relationships.matches.data.iter().map(|r| r.id.as_str())
    }
}
