//! braincheck-core: Prediction workflow state machine (sans-IO).
//!
//! Models the client side of submitting a brain MRI scan for
//! classification: file selection, local preview, submission, and
//! result or error rendering.
//!
//! This crate has **no I/O dependencies**. It interprets raw HTTP
//! status codes and bodies handed to it and tells the host what
//! asynchronous work to start. The HTTP client lives in
//! `braincheck-client`, and browser interaction lives in `braincheck-io`.

pub mod config;
pub mod display;
pub mod error;
pub mod response;
pub mod types;
pub mod workflow;

pub use config::ClientConfig;
pub use display::{RankedProbability, format_file_size, format_percent};
pub use error::{PreviewError, ValidationError, WorkflowError};
pub use response::{HealthStatus, interpret, interpret_health};
pub use types::{PredictionClass, PredictionResult, PreviewImage, SelectedFile};
pub use workflow::{
    Effect, Event, Phase, PreviewRequest, SelectionId, SubmissionRequest, SubmissionTicket,
    SubmitRejected, Workflow,
};
