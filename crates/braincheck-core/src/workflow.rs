//! The prediction workflow state machine.
//!
//! [`Workflow`] owns every piece of state the UI renders: the selected
//! file, its preview, the last result or error, and whether a submission
//! is in flight. It performs no I/O. Each transition returns the
//! asynchronous work the host must start, as a [`PreviewRequest`] or a
//! [`SubmissionRequest`], and the host feeds the outcome back in with
//! [`Workflow::preview_ready`] or [`Workflow::settle`].
//!
//! ```rust
//! # use braincheck_core::{SelectedFile, Workflow, Phase};
//! let mut workflow = Workflow::new();
//! let preview = workflow.select_file(SelectedFile::new("scan.png", vec![1, 2, 3]));
//! assert_eq!(workflow.phase(), Phase::Ready);
//!
//! let submission = workflow.begin_submit().ok();
//! assert!(submission.is_some());
//! assert_eq!(workflow.phase(), Phase::Pending);
//! # let _ = preview;
//! ```
//!
//! # Re-entry
//!
//! Every selection is tagged with a monotonically increasing
//! [`SelectionId`]. A preview or submission outcome is applied only if the
//! selection it was started for is still current, so a slow resolution
//! for an earlier file can never overwrite state belonging to a later
//! one. At most one submission is in flight; further submits are rejected
//! with [`SubmitRejected::AlreadyPending`] without touching state.

use std::fmt;

use crate::error::{PreviewError, ValidationError, WorkflowError};
use crate::types::{PredictionResult, PreviewImage, SelectedFile};

/// Identifies one file selection. Later selections compare greater.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectionId(u64);

impl SelectionId {
    const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SelectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle for an in-flight submission.
///
/// Bound to the selection that was current when the submission started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionTicket {
    id: u64,
    selection: SelectionId,
}

impl SubmissionTicket {
    /// The selection this submission was issued for.
    #[must_use]
    pub const fn selection(self) -> SelectionId {
        self.selection
    }
}

/// Work the host must perform after a file is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRequest {
    /// Pass back to [`Workflow::preview_ready`].
    pub selection: SelectionId,
    /// The file to render.
    pub file: SelectedFile,
}

/// Work the host must perform after a submission is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    /// Pass back to [`Workflow::settle`].
    pub ticket: SubmissionTicket,
    /// The file to send to the prediction service.
    pub file: SelectedFile,
}

/// Why a submit request did not start a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejected {
    /// No file is selected. The validation message is now in the error slot.
    #[error("no file selected")]
    NoFileSelected,

    /// A submission is already in flight. State is unchanged.
    #[error("a submission is already in flight")]
    AlreadyPending,
}

/// Coarse workflow phase, derived from state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No file selected and nothing in flight.
    Idle,
    /// A file is selected; no result, error, or submission.
    Ready,
    /// A submission is in flight.
    Pending,
    /// The last submission produced a result or an error.
    Settled,
}

impl Phase {
    /// Display label for the phase.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Ready => "Ready",
            Self::Pending => "Pending",
            Self::Settled => "Settled",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inputs to the state machine, for hosts that prefer a single
/// transition function over the individual methods.
#[derive(Debug, Clone)]
pub enum Event {
    /// The user chose a file.
    FileSelected(SelectedFile),
    /// The user cleared the file input.
    SelectionCleared,
    /// A preview requested by [`Effect::GeneratePreview`] finished.
    PreviewResolved {
        /// Selection the preview was generated for.
        selection: SelectionId,
        /// The generated preview, or why it could not be generated.
        outcome: Result<PreviewImage, PreviewError>,
    },
    /// The user triggered a submission.
    SubmitRequested,
    /// A submission requested by [`Effect::SendPrediction`] finished.
    SubmissionSettled {
        /// Ticket of the finished submission.
        ticket: SubmissionTicket,
        /// The service's answer, or why there was none.
        outcome: Result<PredictionResult, WorkflowError>,
    },
}

/// Asynchronous work requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Generate a preview for the selected file.
    GeneratePreview(PreviewRequest),
    /// Send the selected file to the prediction service.
    SendPrediction(SubmissionRequest),
}

/// State of one prediction workflow.
#[derive(Debug, Clone, Default)]
pub struct Workflow {
    selected_file: Option<SelectedFile>,
    preview: Option<PreviewImage>,
    result: Option<PredictionResult>,
    error: Option<String>,
    selection: SelectionId,
    in_flight: Option<SubmissionTicket>,
    next_ticket: u64,
}

impl Workflow {
    /// A workflow in the [`Phase::Idle`] state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event and return the work it requests, if any.
    pub fn apply(&mut self, event: Event) -> Option<Effect> {
        match event {
            Event::FileSelected(file) => Some(Effect::GeneratePreview(self.select_file(file))),
            Event::SelectionCleared => {
                self.clear_selection();
                None
            }
            Event::PreviewResolved { selection, outcome } => {
                self.preview_ready(selection, outcome);
                None
            }
            Event::SubmitRequested => self.begin_submit().ok().map(Effect::SendPrediction),
            Event::SubmissionSettled { ticket, outcome } => {
                self.settle(ticket, outcome);
                None
            }
        }
    }

    /// Make `file` the current selection.
    ///
    /// Clears the preview, result, and error immediately, and invalidates
    /// any preview or submission outcome still pending for an earlier
    /// selection. The returned request must be fulfilled with
    /// [`preview_ready`](Self::preview_ready).
    pub fn select_file(&mut self, file: SelectedFile) -> PreviewRequest {
        self.selection = self.selection.next();
        tracing::debug!(selection = %self.selection, ?file, "file selected");

        self.selected_file = Some(file.clone());
        self.preview = None;
        self.result = None;
        self.error = None;

        PreviewRequest {
            selection: self.selection,
            file,
        }
    }

    /// Drop the current selection and return to [`Phase::Idle`].
    ///
    /// A submission in flight keeps the workflow pending until it
    /// settles, but its outcome will be discarded.
    pub fn clear_selection(&mut self) {
        self.selection = self.selection.next();
        tracing::debug!(selection = %self.selection, "selection cleared");

        self.selected_file = None;
        self.preview = None;
        self.result = None;
        self.error = None;
    }

    /// Record the outcome of preview generation.
    ///
    /// Returns `true` if the outcome belonged to the current selection and
    /// was applied. Failures leave the preview empty and do not touch the
    /// error slot.
    pub fn preview_ready(
        &mut self,
        selection: SelectionId,
        outcome: Result<PreviewImage, PreviewError>,
    ) -> bool {
        if selection != self.selection {
            tracing::debug!(
                stale = %selection,
                current = %self.selection,
                "discarding preview for superseded selection"
            );
            return false;
        }

        match outcome {
            Ok(preview) => self.preview = Some(preview),
            Err(e) => {
                tracing::warn!(%selection, error = %e, "preview generation failed");
                self.preview = None;
            }
        }
        true
    }

    /// Start a submission of the current file.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitRejected::AlreadyPending`] while another submission
    /// is in flight, leaving state untouched. Returns
    /// [`SubmitRejected::NoFileSelected`] when there is nothing to send,
    /// after putting the validation message in the error slot.
    pub fn begin_submit(&mut self) -> Result<SubmissionRequest, SubmitRejected> {
        if let Some(ticket) = self.in_flight {
            tracing::debug!(ticket = ticket.id, "submit ignored, already pending");
            return Err(SubmitRejected::AlreadyPending);
        }

        let Some(file) = self.selected_file.clone() else {
            let err = WorkflowError::from(ValidationError::NoFileSelected);
            tracing::debug!(error = %err, "submit rejected");
            self.result = None;
            self.error = Some(err.user_message());
            return Err(SubmitRejected::NoFileSelected);
        };

        self.next_ticket += 1;
        let ticket = SubmissionTicket {
            id: self.next_ticket,
            selection: self.selection,
        };
        tracing::info!(ticket = ticket.id, file = file.name(), "submitting for prediction");

        self.in_flight = Some(ticket);
        self.result = None;
        self.error = None;

        Ok(SubmissionRequest { ticket, file })
    }

    /// Record the outcome of a submission.
    ///
    /// Always clears the loading flag for the in-flight ticket. The
    /// outcome is stored only if the selection it was submitted for is
    /// still current. Returns `true` if the outcome was stored.
    pub fn settle(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<PredictionResult, WorkflowError>,
    ) -> bool {
        if self.in_flight != Some(ticket) {
            tracing::warn!(ticket = ticket.id, "ignoring settlement for unknown submission");
            return false;
        }
        self.in_flight = None;

        if ticket.selection != self.selection {
            tracing::debug!(
                ticket = ticket.id,
                "discarding outcome for superseded selection"
            );
            return false;
        }

        match outcome {
            Ok(result) => {
                tracing::info!(
                    ticket = ticket.id,
                    class = %result.predicted_class,
                    confidence = result.confidence,
                    "prediction received"
                );
                self.result = Some(result);
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(ticket = ticket.id, error = %e, "prediction failed");
                self.result = None;
                self.error = Some(e.user_message());
            }
        }
        true
    }

    /// The current coarse phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        if self.in_flight.is_some() {
            Phase::Pending
        } else if self.selected_file.is_none() {
            Phase::Idle
        } else if self.result.is_some() || self.error.is_some() {
            Phase::Settled
        } else {
            Phase::Ready
        }
    }

    /// The currently selected file.
    #[must_use]
    pub const fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    /// Preview for the current selection, once generated.
    #[must_use]
    pub const fn preview(&self) -> Option<&PreviewImage> {
        self.preview.as_ref()
    }

    /// The last successful prediction.
    #[must_use]
    pub const fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    /// The last user-facing error message.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a submission is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether a submit trigger should be enabled.
    #[must_use]
    pub const fn can_submit(&self) -> bool {
        self.selected_file.is_some() && self.in_flight.is_none()
    }

    /// Identifier of the current selection.
    #[must_use]
    pub const fn current_selection(&self) -> SelectionId {
        self.selection
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::response::interpret;
    use crate::types::PredictionClass;

    fn file(name: &str) -> SelectedFile {
        SelectedFile::new(name, name.as_bytes().to_vec())
    }

    fn preview(tag: &str) -> PreviewImage {
        PreviewImage::from_data_uri(format!("data:image/png;base64,{tag}"))
    }

    fn no_tumor() -> PredictionResult {
        PredictionResult {
            predicted_class: PredictionClass::No,
            confidence: 0.91,
            probabilities: BTreeMap::from([("yes".to_owned(), 0.09), ("no".to_owned(), 0.91)]),
        }
    }

    #[test]
    fn initial_state_is_idle() {
        let workflow = Workflow::new();
        assert_eq!(workflow.phase(), Phase::Idle);
        assert!(workflow.selected_file().is_none());
        assert!(workflow.preview().is_none());
        assert!(workflow.result().is_none());
        assert!(workflow.error().is_none());
        assert!(!workflow.is_loading());
        assert!(!workflow.can_submit());
    }

    #[test]
    fn select_then_preview_reaches_ready() {
        let mut workflow = Workflow::new();
        let request = workflow.select_file(file("a.png"));
        assert_eq!(request.file.name(), "a.png");
        assert_eq!(workflow.phase(), Phase::Ready);

        assert!(workflow.preview_ready(request.selection, Ok(preview("a"))));
        assert_eq!(workflow.preview(), Some(&preview("a")));
        assert!(workflow.can_submit());
    }

    #[test]
    fn only_latest_selection_preview_is_applied() {
        let mut workflow = Workflow::new();
        let first = workflow.select_file(file("a.png"));
        let second = workflow.select_file(file("b.png"));

        // The newer preview resolves first, then the stale one arrives.
        assert!(workflow.preview_ready(second.selection, Ok(preview("b"))));
        assert!(!workflow.preview_ready(first.selection, Ok(preview("a"))));

        assert_eq!(workflow.preview(), Some(&preview("b")));
        assert_eq!(workflow.selected_file().unwrap().name(), "b.png");
    }

    #[test]
    fn stale_preview_before_fresh_one_is_also_dropped() {
        let mut workflow = Workflow::new();
        let first = workflow.select_file(file("a.png"));
        let second = workflow.select_file(file("b.png"));

        assert!(!workflow.preview_ready(first.selection, Ok(preview("a"))));
        assert!(workflow.preview().is_none());

        assert!(workflow.preview_ready(second.selection, Ok(preview("b"))));
        assert_eq!(workflow.preview(), Some(&preview("b")));
    }

    #[test]
    fn reselection_invalidates_existing_preview() {
        let mut workflow = Workflow::new();
        let first = workflow.select_file(file("a.png"));
        workflow.preview_ready(first.selection, Ok(preview("a")));

        workflow.select_file(file("b.png"));
        assert!(workflow.preview().is_none());
    }

    #[test]
    fn failed_preview_is_not_an_error() {
        let mut workflow = Workflow::new();
        let request = workflow.select_file(file("a.png"));
        assert!(workflow.preview_ready(request.selection, Err(PreviewError::EmptyFile)));
        assert!(workflow.preview().is_none());
        assert!(workflow.error().is_none());
        assert_eq!(workflow.phase(), Phase::Ready);
    }

    #[test]
    fn submit_without_file_sets_validation_error() {
        let mut workflow = Workflow::new();
        let rejected = workflow.begin_submit().unwrap_err();
        assert_eq!(rejected, SubmitRejected::NoFileSelected);
        assert_eq!(workflow.error(), Some("Please select an image first"));
        assert!(!workflow.is_loading());
        assert!(workflow.apply(Event::SubmitRequested).is_none());
    }

    #[test]
    fn submit_sets_loading_and_clears_error() {
        let mut workflow = Workflow::new();
        workflow.begin_submit().unwrap_err();
        workflow.select_file(file("a.png"));

        let request = workflow.begin_submit().unwrap();
        assert_eq!(request.file.name(), "a.png");
        assert!(workflow.is_loading());
        assert!(workflow.error().is_none());
        assert_eq!(workflow.phase(), Phase::Pending);
        assert!(!workflow.can_submit());
    }

    #[test]
    fn second_submit_while_pending_is_noop() {
        let mut workflow = Workflow::new();
        workflow.select_file(file("a.png"));
        let request = workflow.begin_submit().unwrap();

        let before = format!("{workflow:?}");
        assert_eq!(
            workflow.begin_submit().unwrap_err(),
            SubmitRejected::AlreadyPending
        );
        assert_eq!(format!("{workflow:?}"), before);

        assert!(workflow.settle(request.ticket, Ok(no_tumor())));
    }

    #[test]
    fn success_stores_result_and_clears_loading() {
        let mut workflow = Workflow::new();
        workflow.select_file(file("a.png"));
        let request = workflow.begin_submit().unwrap();

        assert!(workflow.settle(request.ticket, Ok(no_tumor())));
        assert!(!workflow.is_loading());
        assert_eq!(workflow.result(), Some(&no_tumor()));
        assert!(workflow.error().is_none());
        assert_eq!(workflow.phase(), Phase::Settled);
    }

    #[test]
    fn decline_stores_service_message() {
        let mut workflow = Workflow::new();
        workflow.select_file(file("a.png"));
        let request = workflow.begin_submit().unwrap();

        let outcome = interpret(200, br#"{"success":false,"error":"Invalid image"}"#);
        workflow.settle(request.ticket, outcome);

        assert_eq!(workflow.error(), Some("Invalid image"));
        assert!(workflow.result().is_none());
        assert!(!workflow.is_loading());
    }

    #[test]
    fn every_failure_kind_clears_loading() {
        let bodies: [(u16, &[u8]); 5] = [
            (200, br#"{"success":false}"#),
            (200, br#"{"success":true}"#),
            (200, b"garbage"),
            (500, b""),
            (400, br#"{"error":"No file selected"}"#),
        ];
        for (status, body) in bodies {
            let mut workflow = Workflow::new();
            workflow.select_file(file("a.png"));
            let request = workflow.begin_submit().unwrap();
            workflow.settle(request.ticket, interpret(status, body));

            assert!(!workflow.is_loading(), "loading stuck for {status}");
            assert!(workflow.error().is_some(), "no error for {status}");
            assert!(workflow.result().is_none());
        }
    }

    #[test]
    fn transport_failure_without_body_uses_generic_message() {
        let mut workflow = Workflow::new();
        workflow.select_file(file("a.png"));
        let request = workflow.begin_submit().unwrap();
        workflow.settle(request.ticket, interpret(503, b""));
        assert_eq!(workflow.error(), Some("An error occurred"));
    }

    #[test]
    fn new_selection_clears_displayed_error() {
        let mut workflow = Workflow::new();
        workflow.select_file(file("a.png"));
        let request = workflow.begin_submit().unwrap();
        workflow.settle(
            request.ticket,
            Err(WorkflowError::ServiceDecline { message: None }),
        );
        assert_eq!(workflow.phase(), Phase::Settled);

        workflow.select_file(file("b.png"));
        assert!(workflow.error().is_none());
        assert_eq!(workflow.phase(), Phase::Ready);
    }

    #[test]
    fn retry_goes_straight_to_pending() {
        let mut workflow = Workflow::new();
        workflow.select_file(file("a.png"));
        let first = workflow.begin_submit().unwrap();
        workflow.settle(first.ticket, Err(WorkflowError::ServiceDecline { message: None }));

        let retry = workflow.begin_submit().unwrap();
        assert_eq!(workflow.phase(), Phase::Pending);
        assert!(workflow.error().is_none());
        assert_eq!(retry.file.name(), "a.png");
        assert_ne!(retry.ticket, first.ticket);
    }

    #[test]
    fn outcome_for_replaced_file_is_discarded() {
        let mut workflow = Workflow::new();
        workflow.select_file(file("a.png"));
        let request = workflow.begin_submit().unwrap();

        workflow.select_file(file("b.png"));
        assert!(workflow.is_loading());

        assert!(!workflow.settle(request.ticket, Ok(no_tumor())));
        assert!(!workflow.is_loading());
        assert!(workflow.result().is_none());
        assert_eq!(workflow.phase(), Phase::Ready);
    }

    #[test]
    fn unknown_ticket_is_ignored() {
        let mut workflow = Workflow::new();
        workflow.select_file(file("a.png"));
        let first = workflow.begin_submit().unwrap();
        workflow.settle(first.ticket, Ok(no_tumor()));

        let second = workflow.begin_submit().unwrap();
        assert!(!workflow.settle(first.ticket, Err(WorkflowError::MalformedResponse(String::new()))));
        assert!(workflow.is_loading());

        assert!(workflow.settle(second.ticket, Ok(no_tumor())));
    }

    #[test]
    fn clear_selection_returns_to_idle() {
        let mut workflow = Workflow::new();
        let request = workflow.select_file(file("a.png"));
        workflow.clear_selection();

        assert_eq!(workflow.phase(), Phase::Idle);
        assert!(!workflow.preview_ready(request.selection, Ok(preview("a"))));
        assert!(workflow.preview().is_none());
    }

    #[test]
    fn apply_drives_full_cycle() {
        let mut workflow = Workflow::new();

        let Some(Effect::GeneratePreview(preview_request)) =
            workflow.apply(Event::FileSelected(file("a.png")))
        else {
            unreachable!("selecting a file requests a preview");
        };
        assert!(
            workflow
                .apply(Event::PreviewResolved {
                    selection: preview_request.selection,
                    outcome: Ok(preview("a")),
                })
                .is_none()
        );

        let Some(Effect::SendPrediction(submission)) = workflow.apply(Event::SubmitRequested)
        else {
            unreachable!("submitting a selected file sends a prediction");
        };
        assert!(workflow.apply(Event::SubmitRequested).is_none());

        workflow.apply(Event::SubmissionSettled {
            ticket: submission.ticket,
            outcome: Ok(no_tumor()),
        });
        assert_eq!(workflow.phase(), Phase::Settled);
        assert_eq!(workflow.preview(), Some(&preview("a")));

        workflow.apply(Event::SelectionCleared);
        assert_eq!(workflow.phase(), Phase::Idle);
    }
}
