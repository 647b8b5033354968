use crate::types::Reading;
use serde::Deserialize;

/// Safe operating range for temperature. Boundary values are out of range.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TemperatureRange {
    pub min: f64,
    pub max: f64,
}

/// Outcome of evaluating a reading against the configured thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDecision {
    pub triggered: bool,
    pub message: String,
}

/// Evaluates readings against a safe temperature range.
///
/// Only temperature is alerted today; the evaluator takes the whole reading
/// so additional dimensions can be added without touching the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdEvaluator {
    range: TemperatureRange,
}

impl ThresholdEvaluator {
    pub fn new(range: TemperatureRange) -> Self {
        Self { range }
    }

    /// Triggered iff `temperature <= min || temperature >= max`; the open
    /// interval between the bounds is safe.
    pub fn evaluate(&self, reading: &Reading) -> AlertDecision {
        let triggered =
            reading.temperature <= self.range.min || reading.temperature >= self.range.max;

        let message = if triggered {
            format!(
                "The temperature is not within range. The temperature is {} degrees",
                reading.temperature
            )
        } else {
            String::new()
        };

        AlertDecision { triggered, message }
    }
}
