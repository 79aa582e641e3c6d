//! Prediction service client configuration.

use serde::Deserialize;

/// Default base URL of the prediction service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Where and how to reach the prediction service.
///
/// All parameters have defaults matching the reference service. Upload
/// limits here are hints for the UI only; the service enforces its own.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme, host and port of the service, without a trailing slash.
    pub base_url: String,

    /// Path of the classification endpoint.
    pub predict_path: String,

    /// Path of the health probe endpoint.
    pub health_path: String,

    /// Multipart field name the image is sent under.
    pub image_field: String,

    /// Informational upload size limit shown next to the file picker.
    pub max_upload_bytes: u64,

    /// Extensions advertised by the file picker, lowercase, no dot.
    pub accepted_extensions: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            predict_path: "/predict".to_owned(),
            health_path: "/health".to_owned(),
            image_field: "image".to_owned(),
            max_upload_bytes: 10 * 1024 * 1024,
            accepted_extensions: ["png", "jpg", "jpeg", "gif", "bmp"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }
}

impl ClientConfig {
    /// Default configuration pointed at a different service.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Full URL of the classification endpoint.
    #[must_use]
    pub fn predict_url(&self) -> String {
        join_url(&self.base_url, &self.predict_path)
    }

    /// Full URL of the health probe endpoint.
    #[must_use]
    pub fn health_url(&self) -> String {
        join_url(&self.base_url, &self.health_path)
    }

    /// Value for the file input's `accept` attribute, e.g. `.png,.jpg`.
    #[must_use]
    pub fn accept_attribute(&self) -> String {
        self.accepted_extensions
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Human-readable upload hint, e.g. `PNG, JPG, JPEG up to 10MB`.
    #[must_use]
    pub fn upload_hint(&self) -> String {
        let types = self
            .accepted_extensions
            .iter()
            .map(|ext| ext.to_ascii_uppercase())
            .collect::<Vec<_>>()
            .join(", ");
        let megabytes = self.max_upload_bytes / (1024 * 1024);
        format!("{types} up to {megabytes}MB")
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
