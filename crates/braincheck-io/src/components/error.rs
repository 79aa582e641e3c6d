//! Error display card.

use dioxus::prelude::*;

/// Props for the [`ErrorCard`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ErrorCardProps {
    /// User-facing error message.
    message: String,
}

/// Shows the workflow's current error message.
#[component]
pub fn ErrorCard(props: ErrorCardProps) -> Element {
    rsx! {
        div { class: "error-card", role: "alert",
            div { class: "error-content",
                strong { "Error" }
                p { "{props.message}" }
            }
        }
    }
}
