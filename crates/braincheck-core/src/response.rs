//! Interpretation of prediction service responses.
//!
//! The service response is a trust boundary. [`interpret`] turns an HTTP
//! status and raw body into either a validated [`PredictionResult`] or a
//! classified [`WorkflowError`], and never panics on unexpected input.
//!
//! | status  | body                                    | outcome                     |
//! |---------|-----------------------------------------|-----------------------------|
//! | non-2xx | `{ "error": "..." }`                    | `Transport` with message    |
//! | non-2xx | anything else                           | `Transport` without message |
//! | 2xx     | not JSON                                | `Transport` without message |
//! | 2xx     | `success` not `true`                    | `ServiceDecline`            |
//! | 2xx     | `success: true`, bad `prediction`       | `MalformedResponse`         |
//! | 2xx     | `success: true`, valid `prediction`     | `Ok`                        |

use serde::Deserialize;
use serde_json::Value;

use crate::error::WorkflowError;
use crate::types::PredictionResult;

/// Allowed disagreement between `confidence` and the predicted class's
/// entry in `probabilities`.
pub const CONFIDENCE_TOLERANCE: f64 = 1e-6;

/// Allowed deviation of the probability sum from 1.0 before a warning is
/// logged.
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-3;

/// Classify a `/predict` response.
///
/// # Errors
///
/// Returns [`WorkflowError::Transport`] for non-2xx statuses and non-JSON
/// bodies, [`WorkflowError::ServiceDecline`] when the service does not
/// report `success: true`, and [`WorkflowError::MalformedResponse`] when
/// it does but the `prediction` object is missing or ill-shaped.
pub fn interpret(status: u16, body: &[u8]) -> Result<PredictionResult, WorkflowError> {
    let parsed = serde_json::from_slice::<Value>(body);

    if !is_success_status(status) {
        let message = parsed.ok().as_ref().and_then(error_field);
        tracing::warn!(status, ?message, "prediction request failed");
        return Err(WorkflowError::Transport {
            status: Some(status),
            message,
        });
    }

    let value = parsed.map_err(|e| {
        tracing::warn!(status, error = %e, "prediction response is not JSON");
        WorkflowError::Transport {
            status: Some(status),
            message: None,
        }
    })?;

    if value.get("success") != Some(&Value::Bool(true)) {
        let message = error_field(&value);
        tracing::info!(?message, "prediction service declined the image");
        return Err(WorkflowError::ServiceDecline { message });
    }

    let prediction = value
        .get("prediction")
        .ok_or_else(|| WorkflowError::MalformedResponse("missing `prediction`".to_owned()))?;

    let result = PredictionResult::deserialize(prediction)
        .map_err(|e| WorkflowError::MalformedResponse(e.to_string()))?;

    validate(&result)?;
    Ok(result)
}

/// Check value ranges and log inconsistencies that are tolerated.
fn validate(result: &PredictionResult) -> Result<(), WorkflowError> {
    if !is_probability(result.confidence) {
        return Err(WorkflowError::MalformedResponse(format!(
            "confidence {} is outside [0, 1]",
            result.confidence
        )));
    }

    if let Some((label, value)) = result
        .probabilities
        .iter()
        .find(|(_, value)| !is_probability(**value))
    {
        return Err(WorkflowError::MalformedResponse(format!(
            "probability for `{label}` is {value}, outside [0, 1]"
        )));
    }

    match result.probabilities.get(result.predicted_class.label()) {
        Some(p) if (p - result.confidence).abs() > CONFIDENCE_TOLERANCE => {
            tracing::warn!(
                class = %result.predicted_class,
                confidence = result.confidence,
                probability = p,
                "confidence disagrees with probability of predicted class"
            );
        }
        None => {
            tracing::warn!(
                class = %result.predicted_class,
                "probabilities have no entry for predicted class"
            );
        }
        Some(_) => {}
    }

    let sum: f64 = result.probabilities.values().sum();
    if (sum - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
        tracing::debug!(sum, "probabilities do not sum to 1");
    }

    Ok(())
}

fn is_probability(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

fn error_field(value: &Value) -> Option<String> {
    value
        .get("error")
        .and_then(Value::as_str)
        .map(str::to_owned)
}

/// Reported state of the prediction service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    /// `"healthy"` or `"unhealthy"`.
    pub status: String,

    /// `"loaded"` or `"not loaded"`, when reported.
    #[serde(default)]
    pub model: Option<String>,
}

impl HealthStatus {
    /// Whether the service reports itself ready to classify.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// Classify a `/health` response.
///
/// The service answers `503` with a JSON body when its model is not
/// loaded, so a well-formed body is accepted regardless of status.
///
/// # Errors
///
/// Returns [`WorkflowError::Transport`] when the body is not a health
/// report.
pub fn interpret_health(status: u16, body: &[u8]) -> Result<HealthStatus, WorkflowError> {
    serde_json::from_slice::<HealthStatus>(body).map_err(|e| {
        tracing::warn!(status, error = %e, "health response is not a health report");
        WorkflowError::Transport {
            status: Some(status),
            message: None,
        }
    })
}
