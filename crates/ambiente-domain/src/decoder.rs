use crate::error::{DomainError, DomainResult};
use crate::types::Reading;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Wire shape of a queued sensor message.
///
/// `captured_at` is optional; readings from devices without a clock carry
/// only the three measurements.
#[derive(Debug, Deserialize)]
struct ReadingPayload {
    luminosity: f64,
    temperature: f64,
    humidity: f64,
    #[serde(default)]
    captured_at: Option<DateTime<Utc>>,
}

/// Decode a raw queue payload into a validated [`Reading`].
///
/// Uses the current time when the payload carries no timestamp.
pub fn decode_reading(payload: &[u8]) -> DomainResult<Reading> {
    decode_reading_at(payload, Utc::now())
}

/// Decode a raw queue payload, substituting `fallback` for a missing
/// timestamp. Pure and deterministic for a given payload and fallback.
pub fn decode_reading_at(payload: &[u8], fallback: DateTime<Utc>) -> DomainResult<Reading> {
    let parsed: ReadingPayload = serde_json::from_slice(payload)
        .map_err(|e| DomainError::MalformedPayload(e.to_string()))?;

    for (field, value) in [
        ("luminosity", parsed.luminosity),
        ("temperature", parsed.temperature),
        ("humidity", parsed.humidity),
    ] {
        if !value.is_finite() {
            return Err(DomainError::MalformedPayload(format!(
                "field '{}' is not a finite number",
                field
            )));
        }
    }

    Ok(Reading {
        lumen: parsed.luminosity,
        temperature: parsed.temperature,
        humidity: parsed.humidity,
        captured_at: parsed.captured_at.unwrap_or(fallback),
    })
}
