use serde_json::Value;
use thiserror::Error;

use crate::events::TelemetryEvent;

/// The telemetry payload violates the upstream contract. Distinct from a
/// fetch failure: the request succeeded but returned something unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedTelemetry {
    #[error("Received HTML error response instead of telemetry data")]
    HtmlResponse,

    #[error("Invalid telemetry data format. Expected array, got string")]
    UnexpectedString,

    #[error("Invalid telemetry data format. Expected array, got: {found}")]
    NotAnArray { found: &'static str },

    #[error("Invalid telemetry event format. Event {index} has no '_T' discriminator")]
    MissingDiscriminator { index: usize },
}

/// Validate a raw telemetry payload and decode it into typed events.
///
/// The whole payload is checked before any event is decoded, so a contract
/// violation never yields a partially decoded stream.
pub fn decode_payload(payload: Value) -> Result<Vec<TelemetryEvent>, MalformedTelemetry> {
    let records = match payload {
        Value::Array(records) => records,
        Value::String(body) => {
            let head = body.trim_start().to_ascii_lowercase();
            return Err(if head.starts_with("<!doctype html") || head.starts_with("<html") {
                MalformedTelemetry::HtmlResponse
            } else {
                MalformedTelemetry::UnexpectedString
            });
        }
        other => {
            return Err(MalformedTelemetry::NotAnArray {
                found: json_type_name(&other),
            })
        }
    };

    if let Some(index) = records
        .iter()
        .position(|r| r.get("_T").and_then(Value::as_str).is_none())
    {
        return Err(MalformedTelemetry::MissingDiscriminator { index });
    }

    if records.is_empty() {
        tracing::warn!("Telemetry payload is empty");
    }

    let events: Vec<TelemetryEvent> = records.into_iter().map(TelemetryEvent::from_wire).collect();
    let ignored = events.iter().filter(|e| e.kind.is_ignored()).count();
    tracing::debug!(total = events.len(), ignored, "Decoded telemetry payload");

    Ok(events)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
