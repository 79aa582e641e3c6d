//! Error taxonomy for the prediction workflow.
//!
//! Every failure the controller can observe is one [`WorkflowError`].
//! None of them propagate past the controller: each is converted to a
//! single user-facing string by [`WorkflowError::user_message`] and shown
//! in the error slot.

/// Message shown when a submission is attempted with no file selected.
pub const NO_FILE_SELECTED_MESSAGE: &str = "Please select an image first";

/// Fallback when the service declines without saying why.
pub const PREDICTION_FAILED_MESSAGE: &str = "Prediction failed";

/// Fallback when a transport failure carries no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// Shown when the service claims success but the payload is unusable.
pub const MALFORMED_RESPONSE_MESSAGE: &str =
    "Received an invalid response from the prediction service";

/// Precondition failures detected before any network activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// `submit` was called with no file selected.
    #[error("no file selected")]
    NoFileSelected,
}

/// Errors surfaced by a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    /// A local precondition was not met; the network was never touched.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The service was reachable and explicitly declined to classify.
    #[error("prediction service declined: {}", .message.as_deref().unwrap_or("no reason given"))]
    ServiceDecline {
        /// Message from the service's `error` field, if any.
        message: Option<String>,
    },

    /// The request failed in transit or the response was not usable JSON.
    #[error("transport error{}: {}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default(), .message.as_deref().unwrap_or("no details"))]
    Transport {
        /// HTTP status, when a response was received.
        status: Option<u16>,
        /// The most specific message available: the service's `error`
        /// body, or the transport library's error text.
        message: Option<String>,
    },

    /// The service reported success but `prediction` was missing or
    /// ill-shaped.
    #[error("malformed prediction response: {0}")]
    MalformedResponse(String),
}

impl WorkflowError {
    /// The string shown to the user for this error.
    ///
    /// Prefers the most specific message available and falls back to a
    /// fixed generic string per error kind.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(ValidationError::NoFileSelected) => NO_FILE_SELECTED_MESSAGE.to_owned(),
            Self::ServiceDecline { message } => non_blank(message.as_deref())
                .unwrap_or(PREDICTION_FAILED_MESSAGE)
                .to_owned(),
            Self::Transport { message, .. } => non_blank(message.as_deref())
                .unwrap_or(GENERIC_ERROR_MESSAGE)
                .to_owned(),
            Self::MalformedResponse(_) => MALFORMED_RESPONSE_MESSAGE.to_owned(),
        }
    }
}

fn non_blank(message: Option<&str>) -> Option<&str> {
    message.filter(|m| !m.trim().is_empty())
}

/// Errors from the local preview generator.
///
/// Preview failures are non-fatal: the workflow stays usable without a
/// preview and the error slot is not touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreviewError {
    /// The file contained no bytes.
    #[error("file is empty")]
    EmptyFile,

    /// Reading the file from the browser failed.
    #[error("failed to read file: {0}")]
    Read(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message() {
        let err = WorkflowError::from(ValidationError::NoFileSelected);
        assert_eq!(err.user_message(), "Please select an image first");
    }

    #[test]
    fn decline_prefers_service_message() {
        let err = WorkflowError::ServiceDecline {
            message: Some("Invalid image".to_owned()),
        };
        assert_eq!(err.user_message(), "Invalid image");
    }

    #[test]
    fn decline_without_message_uses_fallback() {
        let err = WorkflowError::ServiceDecline { message: None };
        assert_eq!(err.user_message(), PREDICTION_FAILED_MESSAGE);

        let err = WorkflowError::ServiceDecline {
            message: Some("   ".to_owned()),
        };
        assert_eq!(err.user_message(), PREDICTION_FAILED_MESSAGE);
    }

    #[test]
    fn transport_without_message_uses_generic() {
        let err = WorkflowError::Transport {
            status: Some(500),
            message: None,
        };
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn transport_with_message_passes_through() {
        let err = WorkflowError::Transport {
            status: None,
            message: Some("error sending request".to_owned()),
        };
        assert_eq!(err.user_message(), "error sending request");
    }

    #[test]
    fn malformed_hides_details_from_user() {
        let err = WorkflowError::MalformedResponse("missing field `class`".to_owned());
        assert_eq!(err.user_message(), MALFORMED_RESPONSE_MESSAGE);
        assert!(err.to_string().contains("missing field `class`"));
    }

    #[test]
    fn transport_display_includes_status() {
        let err = WorkflowError::Transport {
            status: Some(503),
            message: Some("unavailable".to_owned()),
        };
        assert_eq!(err.to_string(), "transport error (HTTP 503): unavailable");
    }
}
