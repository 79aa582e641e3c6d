//! Presentation values derived from a [`PredictionResult`].
//!
//! Everything here is a pure function of workflow state. Nothing is
//! stored separately, so the display can never drift from the data.

use std::cmp::Ordering;

use crate::types::{PredictionClass, PredictionResult};

/// Advisory shown under every result.
pub const DISCLAIMER: &str = "This is an AI-assisted tool. Always consult with a qualified medical professional for diagnosis.";

/// One row of the ranked probability list.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedProbability {
    /// Wire label, e.g. `"yes"`.
    pub label: String,
    /// Human-readable name for the label.
    pub display_name: String,
    /// Probability in `[0, 1]`.
    pub value: f64,
    /// `value` as a percentage with two decimals, without the `%` sign.
    pub percent: String,
    /// Whether this row is the predicted class.
    pub is_predicted: bool,
}

/// Format a probability in `[0, 1]` as a percentage with two decimals.
///
/// `0.8234567` formats as `"82.35"`. Halfway cases round up, so
/// `0.50125` formats as `"50.13"`.
#[must_use]
pub fn format_percent(value: f64) -> String {
    let percent = value * 100.0;
    format!("{:.2}", (percent * 100.0).round() / 100.0)
}

/// Format a byte count as megabytes with two decimals, e.g. `"1.50 MB"`.
#[must_use]
#[allow(clippy::cast_precision_loss)] // display only
pub fn format_file_size(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

/// Human-readable name for a class label.
#[must_use]
pub fn class_display_name(label: &str) -> &str {
    match label {
        "yes" => "Tumor Present",
        "no" => "No Tumor",
        other => other,
    }
}

impl PredictionResult {
    /// Whether the service predicted a tumor.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.predicted_class == PredictionClass::Yes
    }

    /// Confidence as a percentage with two decimals, e.g. `"82.35"`.
    #[must_use]
    pub fn confidence_percent(&self) -> String {
        format_percent(self.confidence)
    }

    /// Result heading.
    #[must_use]
    pub fn headline(&self) -> &'static str {
        if self.is_positive() {
            "Tumor Detected"
        } else {
            "No Tumor Detected"
        }
    }

    /// Short guidance shown under the heading.
    #[must_use]
    pub fn subtitle(&self) -> &'static str {
        if self.is_positive() {
            "Medical attention recommended"
        } else {
            "Brain scan appears normal"
        }
    }

    /// Probabilities sorted by descending value.
    ///
    /// Equal values are ordered lexicographically by label so the list is
    /// deterministic regardless of how the service ordered its keys.
    #[must_use]
    pub fn ranked_probabilities(&self) -> Vec<RankedProbability> {
        let predicted = self.predicted_class.label();
        let mut rows: Vec<RankedProbability> = self
            .probabilities
            .iter()
            .map(|(label, &value)| RankedProbability {
                label: label.clone(),
                display_name: class_display_name(label).to_owned(),
                value,
                percent: format_percent(value),
                is_predicted: label == predicted,
            })
            .collect();

        rows.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.label.cmp(&b.label))
        });
        rows
    }
}
