use braincheck_client::PredictionClient;
use braincheck_core::{ClientConfig, Effect, Event, PreviewError, SelectedFile, Workflow};
use braincheck_io::{
    AnalyzeButton, ErrorCard, FileUpload, HealthBadge, ResultCard, ScanPreview, generate_preview,
};
use dioxus::logger::tracing::{self, Level};
use dioxus::prelude::*;

fn main() {
    if let Err(e) = dioxus::logger::init(Level::INFO) {
        eprintln!("failed to initialize logger: {e}");
    }
    dioxus::launch(app);
}

/// Service configuration, with the base URL overridable at build time
/// through `BRAINCHECK_API_URL`.
fn client_config() -> ClientConfig {
    option_env!("BRAINCHECK_API_URL").map_or_else(ClientConfig::default, ClientConfig::with_base_url)
}

/// Feed `event` to the workflow and start whatever work it requests.
///
/// Completions are fed back through this same function, so every state
/// change goes through [`Workflow::apply`].
fn dispatch(mut workflow: Signal<Workflow>, client: PredictionClient, event: Event) {
    let Some(effect) = workflow.write().apply(event) else {
        return;
    };

    match effect {
        Effect::GeneratePreview(request) => {
            spawn(async move {
                let outcome = generate_preview(request.file).await;
                dispatch(
                    workflow,
                    client,
                    Event::PreviewResolved {
                        selection: request.selection,
                        outcome,
                    },
                );
            });
        }
        Effect::SendPrediction(request) => {
            spawn(async move {
                let outcome = client.predict(&request.file).await;
                dispatch(
                    workflow,
                    client,
                    Event::SubmissionSettled {
                        ticket: request.ticket,
                        outcome,
                    },
                );
            });
        }
    }
}

/// Root application component.
///
/// Owns the prediction workflow in a signal and wires the upload zone,
/// preview, analyze button, and result/error display to it.
fn app() -> Element {
    // --- Application state ---
    let workflow = use_signal(Workflow::new);
    let client = use_hook(|| PredictionClient::new(client_config()));

    // --- Service health probe (runs once) ---
    let health = {
        let client = client.clone();
        use_resource(move || {
            let client = client.clone();
            async move { client.health().await }
        })
    };

    // --- Handlers ---
    let on_select = {
        let client = client.clone();
        move |file: SelectedFile| dispatch(workflow, client.clone(), Event::FileSelected(file))
    };

    let on_read_error = |e: PreviewError| {
        tracing::warn!(error = %e, "could not read selected file");
    };

    let on_submit = {
        let client = client.clone();
        move |()| dispatch(workflow, client.clone(), Event::SubmitRequested)
    };

    let on_clear = {
        let client = client.clone();
        move |_| dispatch(workflow, client.clone(), Event::SelectionCleared)
    };

    // --- Snapshot for rendering ---
    let state = workflow.read();
    let selected = state.selected_file().cloned();
    let preview = state.preview().cloned();
    let result = state.result().cloned();
    let error = state.error().map(str::to_owned);
    let loading = state.is_loading();
    let can_submit = state.can_submit();
    drop(state);

    let report = (*health.read()).clone();
    let config = client.config();
    let accept = config.accept_attribute();
    let hint = config.upload_hint();
    let has_selection = selected.is_some();

    // --- Layout ---
    rsx! {
        style { dangerous_inner_html: include_str!("../assets/style.css") }

        div { class: "app-container",
            div { class: "main-card",
                header { class: "header",
                    h1 { class: "title", "Brain Tumor Detection" }
                    p { class: "subtitle", "AI-Powered MRI Analysis System" }
                    HealthBadge { report: report }
                }

                div { class: "upload-section",
                    FileUpload {
                        selected: selected,
                        accept: accept,
                        hint: hint,
                        on_select: on_select,
                        on_read_error: on_read_error,
                    }
                    if has_selection && !loading {
                        button { class: "clear-button", onclick: on_clear, "Clear" }
                    }
                }

                if let Some(preview) = preview {
                    ScanPreview { preview: preview }
                }

                AnalyzeButton {
                    loading: loading,
                    enabled: can_submit,
                    on_click: on_submit,
                }

                if let Some(message) = error {
                    ErrorCard { message: message }
                }

                if let Some(result) = result {
                    ResultCard { result: result }
                }
            }
        }
    }
}
