//! braincheck-client: HTTP client for the prediction service.
//!
//! [`PredictionClient`] sends a [`SelectedFile`] to `POST /predict` as a
//! multipart form and hands the raw status and body to
//! [`braincheck_core::interpret`] for classification. It works on native
//! targets and on `wasm32-unknown-unknown`, where `reqwest` is backed by
//! the browser's `fetch`.

use braincheck_core::{
    ClientConfig, HealthStatus, PredictionResult, SelectedFile, WorkflowError, interpret,
    interpret_health,
};
use reqwest::multipart::{Form, Part};

/// Client for the prediction service.
///
/// Create one at app startup and reuse it for every submission. Cloning
/// is cheap and shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl PredictionClient {
    /// Create a client for the service described by `config`.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// The configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Submit `file` for classification.
    ///
    /// Issues exactly one request. The image is sent as the multipart
    /// part named by [`ClientConfig::image_field`], carrying the file name
    /// and MIME type.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Transport`] if the request cannot be sent
    /// or the response body cannot be read. Otherwise returns whatever
    /// [`interpret`] makes of the response.
    #[allow(clippy::future_not_send)] // WASM is single-threaded; fetch futures are !Send
    pub async fn predict(&self, file: &SelectedFile) -> Result<PredictionResult, WorkflowError> {
        let url = self.config.predict_url();
        let form = Form::new().part(self.config.image_field.clone(), image_part(file)?);

        tracing::debug!(%url, ?file, "sending prediction request");
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| WorkflowError::Transport {
            status: Some(status),
            message: Some(e.to_string()),
        })?;
        tracing::debug!(status, len = body.len(), "prediction response received");

        interpret(status, &body)
    }

    /// Ask the service whether its model is loaded.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Transport`] if the request fails or the
    /// response is not a health report.
    #[allow(clippy::future_not_send)] // WASM is single-threaded; fetch futures are !Send
    pub async fn health(&self) -> Result<HealthStatus, WorkflowError> {
        let url = self.config.health_url();
        let response = self.http.get(&url).send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_error)?;
        interpret_health(status, &body)
    }
}

/// Build the multipart part for `file`.
fn image_part(file: &SelectedFile) -> Result<Part, WorkflowError> {
    Part::bytes(file.bytes().to_vec())
        .file_name(file.name().to_owned())
        .mime_str(file.mime_type())
        .map_err(|e| WorkflowError::Transport {
            status: None,
            message: Some(format!("invalid MIME type `{}`: {e}", file.mime_type())),
        })
}

fn transport_error(err: reqwest::Error) -> WorkflowError {
    tracing::warn!(error = %err, "request to prediction service failed");
    WorkflowError::Transport {
        status: err.status().map(|s| s.as_u16()),
        message: Some(err.to_string()),
    }
}
