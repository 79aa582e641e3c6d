//! File upload component with drag-and-drop and file picker.

use braincheck_core::{PreviewError, SelectedFile, format_file_size};
use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::LdUpload;

/// DOM id of the hidden file input.
const INPUT_ID: &str = "scan-input";

/// Props for the [`FileUpload`] component.
#[derive(Props, Clone, PartialEq)]
pub struct FileUploadProps {
    /// The file currently held by the workflow, shown in the drop zone.
    selected: Option<SelectedFile>,
    /// Value for the input's `accept` attribute.
    accept: String,
    /// Informational hint on accepted types and sizes.
    hint: String,
    /// Called with the file once its bytes have been read.
    on_select: EventHandler<SelectedFile>,
    /// Called when the browser fails to read the chosen file.
    on_read_error: EventHandler<PreviewError>,
}

/// A drag-and-drop zone with a file picker.
///
/// Any file type is accepted; the `accept` attribute and hint are only
/// advisory. When a file is chosen, reads its bytes and fires
/// `on_select`. If the user picks again before a slow read finishes, the
/// earlier read is discarded so only the latest choice is forwarded.
///
/// A failed read keeps the previous selection and shows a notice in the
/// zone until the next successful read.
#[component]
pub fn FileUpload(props: FileUploadProps) -> Element {
    let mut dragging = use_signal(|| false);
    let mut read_generation = use_signal(|| 0u64);
    let mut notice = use_signal(|| Option::<String>::None);

    // Shared by the picker and drop paths.
    let process_files = move |files: Vec<FileData>| async move {
        let Some(file) = files.first() else {
            return;
        };

        read_generation += 1;
        let my_generation = *read_generation.peek();

        let name = file.name();
        let content_type = file.content_type();
        let outcome = file.read_bytes().await;

        // The input keeps its value otherwise, and picking the same file
        // again would not fire `onchange`.
        document::eval(&reset_input_script(INPUT_ID));

        if *read_generation.peek() != my_generation {
            tracing::debug!(file = %name, "discarding superseded file read");
            return;
        }

        match outcome {
            Ok(bytes) => {
                notice.set(None);
                props
                    .on_select
                    .call(selected_file(name, content_type, bytes.to_vec()));
            }
            Err(e) => {
                let error = PreviewError::Read(e.to_string());
                notice.set(Some(read_failure_notice(&name, &error)));
                props.on_read_error.call(error);
            }
        }
    };

    let handle_files = move |evt: FormEvent| async move {
        process_files(evt.files()).await;
    };

    let handle_drop = move |evt: DragEvent| async move {
        evt.prevent_default();
        dragging.set(false);
        process_files(evt.files()).await;
    };

    let zone_class = if dragging() {
        "upload-zone upload-zone-active"
    } else {
        "upload-zone"
    };

    rsx! {
        label {
            class: "{zone_class}",
            ondragover: move |evt| {
                evt.prevent_default();
                dragging.set(true);
            },
            ondragleave: move |_| {
                dragging.set(false);
            },
            ondrop: handle_drop,

            Icon { width: 32, height: 32, icon: LdUpload }

            div { class: "upload-text",
                if let Some(ref file) = props.selected {
                    strong { "{file.name()}" }
                    span { class: "file-size", " ({format_file_size(file.size_bytes())})" }
                } else {
                    strong { "Click to upload" }
                    " or drag and drop"
                    span { class: "file-hint", "{props.hint}" }
                }
            }

            if let Some(ref message) = notice() {
                p { class: "upload-notice", "{message}" }
            }

            input {
                id: INPUT_ID,
                r#type: "file",
                accept: "{props.accept}",
                class: "file-input",
                onchange: handle_files,
            }
        }
    }
}

/// Build the selection from a completed read.
///
/// The browser-reported type wins over the extension guess, so an
/// extensionless `image/jpeg` still previews and uploads as JPEG.
fn selected_file(name: String, content_type: Option<String>, bytes: Vec<u8>) -> SelectedFile {
    SelectedFile::new(name, bytes).with_mime_type(content_type.unwrap_or_default())
}

/// Text shown in the drop zone when a chosen file could not be read.
fn read_failure_notice(name: &str, error: &PreviewError) -> String {
    format!("Could not read {name} ({error}). The previous selection is kept.")
}

/// Script that empties the file input's value.
fn reset_input_script(id: &str) -> String {
    format!("document.getElementById({id:?}).value = '';")
}
