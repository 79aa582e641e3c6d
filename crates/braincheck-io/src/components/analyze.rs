//! Submit trigger.

use dioxus::prelude::*;

/// Props for the [`AnalyzeButton`] component.
#[derive(Props, Clone, PartialEq)]
pub struct AnalyzeButtonProps {
    /// Whether a submission is in flight.
    loading: bool,
    /// Whether a submission may start now.
    enabled: bool,
    /// Fired when the button is clicked.
    on_click: EventHandler<()>,
}

/// Button that submits the selected scan for analysis.
///
/// Disabling is cosmetic; the workflow rejects overlapping submissions
/// on its own.
#[component]
pub fn AnalyzeButton(props: AnalyzeButtonProps) -> Element {
    let class = match (props.loading, props.enabled) {
        (true, _) => "predict-button loading",
        (false, false) => "predict-button disabled",
        (false, true) => "predict-button",
    };

    rsx! {
        button {
            class: "{class}",
            disabled: !props.enabled,
            onclick: move |_| props.on_click.call(()),

            if props.loading {
                span { class: "spinner" }
                "Analyzing..."
            } else {
                "Analyze Image"
            }
        }
    }
}
