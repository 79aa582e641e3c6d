//! Local image preview.

use braincheck_core::PreviewImage;
use dioxus::prelude::*;

/// Props for the [`ScanPreview`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ScanPreviewProps {
    /// The preview for the current selection.
    preview: PreviewImage,
}

/// Shows the selected scan from its `data:` URI.
#[component]
pub fn ScanPreview(props: ScanPreviewProps) -> Element {
    rsx! {
        div { class: "preview-section",
            h3 { class: "section-title", "Image Preview" }
            div { class: "image-container",
                img {
                    src: "{props.preview.as_str()}",
                    alt: "MRI Preview",
                    class: "preview-image",
                }
            }
        }
    }
}
