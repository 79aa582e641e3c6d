//! Shared types for the braincheck prediction workflow.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

/// MIME type used when neither the browser nor the file extension
/// identifies the content.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// A file chosen by the user, held entirely in memory.
///
/// Cloning is cheap: the byte buffer is shared.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    mime_type: String,
    bytes: Arc<[u8]>,
}

impl SelectedFile {
    /// Create a selected file, inferring the MIME type from the file
    /// extension.
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let name = name.into();
        let mime_type = mime_type_for_name(&name).to_owned();
        Self {
            name,
            mime_type,
            bytes: bytes.into(),
        }
    }

    /// Override the inferred MIME type with one reported by the browser.
    ///
    /// Empty strings are ignored so the inferred type is kept.
    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        let mime_type = mime_type.into();
        if !mime_type.trim().is_empty() {
            self.mime_type = mime_type;
        }
        self
    }

    /// The file name as reported by the file picker.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size of the file in bytes.
    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// MIME type of the file contents.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The raw file contents.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// A shared handle to the raw file contents.
    #[must_use]
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }
}

// Bytes are left out so that logging a selection does not dump the image.
impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("size_bytes", &self.size_bytes())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

/// Infer a MIME type from a file name's extension.
///
/// Returns [`FALLBACK_MIME_TYPE`] for unknown or missing extensions.
#[must_use]
pub fn mime_type_for_name(name: &str) -> &'static str {
    let Some((_, ext)) = name.rsplit_once('.') else {
        return FALLBACK_MIME_TYPE;
    };
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        _ => FALLBACK_MIME_TYPE,
    }
}

/// A locally generated, renderable representation of a [`SelectedFile`].
///
/// Holds a `data:` URI suitable for an `<img src>` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage(String);

impl PreviewImage {
    /// Wrap an already-encoded `data:` URI.
    #[must_use]
    pub const fn from_data_uri(uri: String) -> Self {
        Self(uri)
    }

    /// The `data:` URI.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The two classes the service can predict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionClass {
    /// A tumor is present.
    Yes,
    /// No tumor is present.
    No,
}

impl PredictionClass {
    /// The wire label for this class.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

impl fmt::Display for PredictionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated classification returned by the prediction service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionResult {
    /// The top predicted class.
    #[serde(rename = "class")]
    pub predicted_class: PredictionClass,

    /// Probability mass assigned to `predicted_class`, in `[0, 1]`.
    pub confidence: f64,

    /// Probability per class label, each in `[0, 1]`.
    ///
    /// Labels are kept as strings so that a service reporting extra
    /// classes still renders them.
    pub probabilities: BTreeMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_inferred_from_extension() {
        assert_eq!(mime_type_for_name("scan.PNG"), "image/png");
        assert_eq!(mime_type_for_name("scan.jpeg"), "image/jpeg");
        assert_eq!(mime_type_for_name("scan.jpg"), "image/jpeg");
        assert_eq!(mime_type_for_name("scan.bmp"), "image/bmp");
        assert_eq!(mime_type_for_name("notes.txt"), FALLBACK_MIME_TYPE);
        assert_eq!(mime_type_for_name("no_extension"), FALLBACK_MIME_TYPE);
    }

    #[test]
    fn browser_mime_type_overrides_inferred() {
        let file = SelectedFile::new("scan", vec![1, 2, 3]).with_mime_type("image/png");
        assert_eq!(file.mime_type(), "image/png");

        let file = SelectedFile::new("scan.jpg", vec![1]).with_mime_type("  ");
        assert_eq!(file.mime_type(), "image/jpeg");
    }

    #[test]
    fn selected_file_reports_size() {
        let file = SelectedFile::new("scan.png", vec![0u8; 2048]);
        assert_eq!(file.size_bytes(), 2048);
        assert_eq!(file.name(), "scan.png");
    }

    #[test]
    fn debug_omits_bytes() {
        let file = SelectedFile::new("scan.png", vec![0xAB; 4]);
        let debug = format!("{file:?}");
        assert!(debug.contains("scan.png"));
        assert!(!debug.contains("171"));
    }

    #[test]
    fn prediction_class_labels() {
        assert_eq!(PredictionClass::Yes.label(), "yes");
        assert_eq!(PredictionClass::No.to_string(), "no");
    }
}
