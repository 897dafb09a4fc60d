use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;

/// Match ids are RFC 4122 GUIDs (versions 1-5).
static RE_MATCH_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .unwrap()
});

pub fn validate_match_id(match_id: &str) -> Result<(), ValidationError> {
    if RE_MATCH_ID.is_match(match_id) {
        Ok(())
    } else {
        Err(ValidationError::InvalidMatchId(match_id.to_string()))
    }
}

/// At least `required` names, none of them blank.
pub fn validate_player_names(names: &[String], required: usize) -> Result<(), ValidationError> {
    if names.is_empty() {
        return Err(ValidationError::NoPlayers);
    }
    if names.len() < required {
        return Err(ValidationError::TooFewPlayers {
            required,
            got: names.len(),
        });
    }
    if names.iter().any(|n| n.trim().is_empty()) {
        return Err(ValidationError::BlankPlayerName);
    }
    Ok(())
}
