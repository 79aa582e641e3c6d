//! braincheck-io: Browser I/O and Dioxus component library.
//!
//! Handles file reading, local preview generation, and provides the
//! reusable UI components for the braincheck web application.

pub mod components;
pub mod preview;

pub use components::{
    AnalyzeButton, ErrorCard, FileUpload, HealthBadge, ProbabilityList, ResultCard, ScanPreview,
};
pub use preview::{encode_data_uri, generate_preview};
