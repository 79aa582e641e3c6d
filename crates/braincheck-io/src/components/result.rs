//! Prediction result card and ranked probability list.

use braincheck_core::display::DISCLAIMER;
use braincheck_core::{PredictionResult, RankedProbability};
use dioxus::prelude::*;

/// Props for the [`ResultCard`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ResultCardProps {
    /// The prediction to render.
    result: PredictionResult,
}

/// Renders a prediction: headline, confidence bar, per-class breakdown,
/// and the medical disclaimer.
#[component]
pub fn ResultCard(props: ResultCardProps) -> Element {
    let result = &props.result;
    let positive = result.is_positive();
    let tone = if positive { "tumor-detected" } else { "no-tumor" };
    let bar = if positive { "tumor-bar" } else { "healthy-bar" };
    let headline = result.headline();
    let subtitle = result.subtitle();
    let confidence = result.confidence_percent();
    let ranked = result.ranked_probabilities();

    rsx! {
        div { class: "result-card {tone}",
            div { class: "result-header",
                h2 { class: "result-title", "{headline}" }
                p { class: "result-subtitle", "{subtitle}" }
            }

            div { class: "confidence-section",
                div { class: "confidence-label", "Confidence Level" }
                div { class: "confidence-bar-container",
                    div {
                        class: "confidence-bar {bar}",
                        style: "width: {confidence}%",
                        span { class: "confidence-text", "{confidence}%" }
                    }
                }
            }

            ProbabilityList { rows: ranked }

            div { class: "result-footer",
                p { class: "disclaimer",
                    strong { "Disclaimer: " }
                    "{DISCLAIMER}"
                }
            }
        }
    }
}

/// Props for the [`ProbabilityList`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ProbabilityListProps {
    /// Rows in display order.
    rows: Vec<RankedProbability>,
}

/// Per-class probabilities, highest first, with the predicted class
/// highlighted.
#[component]
pub fn ProbabilityList(props: ProbabilityListProps) -> Element {
    rsx! {
        div { class: "probabilities-section",
            h3 { class: "probabilities-title", "Detailed Analysis" }
            div { class: "probabilities-grid",
                for row in props.rows {
                    div {
                        key: "{row.label}",
                        class: if row.is_predicted { "probability-item highlighted" } else { "probability-item" },
                        div { class: "probability-header",
                            span { class: "probability-label", "{row.display_name}" }
                            span { class: "probability-value", "{row.percent}%" }
                        }
                        div { class: "probability-bar-wrapper",
                            div {
                                class: if row.label == "yes" { "probability-bar tumor-prob" } else { "probability-bar healthy-prob" },
                                style: "width: {row.percent}%",
                            }
                        }
                    }
                }
            }
        }
    }
}
