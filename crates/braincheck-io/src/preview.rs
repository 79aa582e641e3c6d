//! Local preview generation.
//!
//! Encodes a selected file as a `data:` URI so it can be shown in an
//! `<img>` without any network access. The image is not decoded; the
//! browser does that when it renders the URI.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use braincheck_core::{PreviewError, PreviewImage, SelectedFile};

/// Encode `file` as a `data:<mime>;base64,<payload>` URI.
///
/// # Errors
///
/// Returns [`PreviewError::EmptyFile`] if the file has no bytes.
pub fn encode_data_uri(file: &SelectedFile) -> Result<PreviewImage, PreviewError> {
    if file.bytes().is_empty() {
        return Err(PreviewError::EmptyFile);
    }
    let payload = STANDARD.encode(file.bytes());
    Ok(PreviewImage::from_data_uri(format!(
        "data:{};base64,{payload}",
        file.mime_type()
    )))
}

/// Generate a preview for `file` off the current event-loop turn.
///
/// Yields to the browser first so the cleared state from the new
/// selection paints before a large file is encoded.
///
/// # Errors
///
/// Same as [`encode_data_uri`].
#[allow(clippy::future_not_send)] // WASM is single-threaded; timers are !Send
pub async fn generate_preview(file: SelectedFile) -> Result<PreviewImage, PreviewError> {
    gloo_timers::future::TimeoutFuture::new(0).await;
    let outcome = encode_data_uri(&file);
    if let Ok(ref preview) = outcome {
        tracing::debug!(file = file.name(), len = preview.as_str().len(), "preview generated");
    }
    outcome
}
