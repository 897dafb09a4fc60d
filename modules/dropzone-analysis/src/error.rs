use dropzone_telemetry::MalformedTelemetry;
use pubg_client::PubgError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Input rejected before anything is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid match ID format: '{0}'")]
    InvalidMatchId(String),

    #[error("At least one player name is required")]
    NoPlayers,

    #[error("Player names must not be blank")]
    BlankPlayerName,

    #[error("At least {required} player names are required, got {got}")]
    TooFewPlayers { required: usize, got: usize },
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to fetch match {match_id}: {source}")]
    MatchFetch {
        match_id: String,
        #[source]
        source: PubgError,
    },

    #[error("No telemetry URL found for match {0}")]
    MissingTelemetryUrl(String),

    #[error("Failed to fetch telemetry: {0}")]
    TelemetryFetch(#[source] PubgError),

    #[error("Malformed telemetry: {0}")]
    MalformedTelemetry(#[from] MalformedTelemetry),

    #[error("Failed to fetch player {name}: {source}")]
    PlayerFetch {
        name: String,
        #[source]
        source: PubgError,
    },
}
