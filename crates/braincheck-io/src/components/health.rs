//! Prediction service status badge.

use braincheck_core::{HealthStatus, WorkflowError};
use dioxus::prelude::*;

/// Props for the [`HealthBadge`] component.
#[derive(Props, Clone, PartialEq)]
pub struct HealthBadgeProps {
    /// Latest health probe outcome, or `None` while the probe runs.
    report: Option<Result<HealthStatus, WorkflowError>>,
}

/// Small indicator of whether the prediction service is ready.
#[component]
pub fn HealthBadge(props: HealthBadgeProps) -> Element {
    let (class, text) = match &props.report {
        None => ("health-badge checking", "Checking service...".to_owned()),
        Some(Ok(report)) if report.is_healthy() => ("health-badge healthy", "Service ready".to_owned()),
        Some(Ok(report)) => (
            "health-badge unhealthy",
            format!(
                "Service unavailable (model {})",
                report.model.as_deref().unwrap_or("unknown")
            ),
        ),
        Some(Err(_)) => ("health-badge unreachable", "Service unreachable".to_owned()),
    };

    rsx! {
        span { class: "{class}", "{text}" }
    }
}
