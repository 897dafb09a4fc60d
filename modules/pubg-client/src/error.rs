use thiserror::Error;

pub type Result<T> = std::result::Result<T, PubgError>;

#[derive(Debug, Error)]
pub enum PubgError {
    #[error("PUBG API key not configured. Please set the PUBG_API_KEY environment variable")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("PUBG API authentication failed. Please check your API key")]
    Unauthorized,

    #[error("Access forbidden. Your API key may not have the required permissions")]
    Forbidden,

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("PUBG API rate limit exceeded. Please wait before retrying")]
    RateLimited,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl PubgError {
    /// Map a non-success status to the matching error. `resource` names what
    /// was requested, for not-found messages.
    pub(crate) fn from_status(status: u16, resource: &str, body: String) -> Self {
        match status {
            401 => PubgError::Unauthorized,
            403 => PubgError::Forbidden,
            404 => PubgError::NotFound {
                resource: resource.to_string(),
            },
            429 => PubgError::RateLimited,
            _ => PubgError::Api {
                status,
                message: body,
            },
        }
    }
}

impl From<reqwest::Error> for PubgError {
    fn from(err: reqwest::Error) -> Self {
        PubgError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for PubgError {
    fn from(err: serde_json::Error) -> Self {
        PubgError::Parse(err.to_string())
    }
}
