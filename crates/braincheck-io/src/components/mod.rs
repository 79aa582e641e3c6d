//! Dioxus UI components for braincheck.
//!
//! Provides the upload zone, scan preview, analyze button, result and
//! error cards, and the service status badge.

mod analyze;
mod error;
mod health;
mod preview;
mod result;
mod upload;

pub use analyze::AnalyzeButton;
pub use error::ErrorCard;
pub use health::HealthBadge;
pub use preview::ScanPreview;
pub use result::{ProbabilityList, ResultCard};
pub use upload::FileUpload;
