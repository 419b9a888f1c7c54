use highlight_engine::{LoadCompletion, UploadOutcome};
use scene_graph::{AssetLoader, LoadCause};
use tracing::{debug, warn};

use crate::bridge_state::{BridgeError, BridgeState};
use crate::messages::{UiToViewer, ViewerToUi};
use crate::sidebar::{highlight_request, HoverEvent};

/// Dispatch a UI message to the viewer and return a response.
///
/// Loads are performed through `loader` only when the host sends
/// `CompleteLoad` for a ticket the viewer handed out.
pub fn dispatch(state: &mut BridgeState, msg: UiToViewer, loader: &mut dyn AssetLoader) -> ViewerToUi {
    match handle_message(state, msg, loader) {
        Ok(response) => response,
        Err(e) => ViewerToUi::Error {
            message: e.to_string(),
        },
    }
}

/// Parse a JSON message, dispatch it, and serialize the response.
pub fn dispatch_json(state: &mut BridgeState, json_input: &str, loader: &mut dyn AssetLoader) -> String {
    let response = match serde_json::from_str::<UiToViewer>(json_input) {
        Ok(msg) => dispatch(state, msg, loader),
        Err(e) => ViewerToUi::Error {
            message: format!("Failed to parse message: {e}"),
        },
    };
    encode(&response).unwrap_or_else(|e| {
        format!(r#"{{"type":"Error","message":{:?}}}"#, e.to_string())
    })
}

pub fn encode(response: &ViewerToUi) -> Result<String, BridgeError> {
    serde_json::to_string(response).map_err(|e| BridgeError::Serialization {
        reason: e.to_string(),
    })
}

pub fn handle_message(
    state: &mut BridgeState,
    msg: UiToViewer,
    loader: &mut dyn AssetLoader,
) -> Result<ViewerToUi, BridgeError> {
    match msg {
        // -- Upload --
        UiToViewer::UploadSucceeded { response } => {
            let outcome = state.accept_upload(response);
            Ok(upload_response(state, outcome))
        }

        UiToViewer::UploadFailed { message } => {
            warn!(%message, "upload failed, keeping current model");
            Ok(ViewerToUi::UploadRejected {
                message,
                view: state.snapshot(),
            })
        }

        // -- Hover --
        UiToViewer::HoverEnter { feature_id } => {
            Ok(hover(state, HoverEvent::Enter(feature_id)))
        }

        UiToViewer::HoverLeave { feature_id } => {
            Ok(hover(state, HoverEvent::Leave(feature_id)))
        }

        UiToViewer::SetHighlight { feature_id } => {
            state.session.set_highlight(feature_id);
            Ok(view_updated(state))
        }

        // -- Asset loading --
        UiToViewer::CompleteLoad { ticket } => {
            let ticket = state.redeem(&ticket)?;
            let result = loader.load(&ticket.url);
            if let Err(LoadCause::MissingBytes { url }) = &result {
                if state.session.loading_url() == Some(ticket.url.as_str()) {
                    debug!(ticket = %ticket.id, %url, "load waiting on host bytes");
                    let url = url.clone();
                    state.requeue(ticket.clone());
                    return Ok(ViewerToUi::BytesRequested {
                        ticket,
                        url,
                        view: state.snapshot(),
                    });
                }
            }
            let completion = state
                .session
                .complete_load(&ticket, result, &mut state.cache);
            match completion {
                LoadCompletion::Attached(outcome) => {
                    debug!(url = %ticket.url, ?outcome, "load attached");
                    Ok(view_updated(state))
                }
                LoadCompletion::Discarded => Ok(ViewerToUi::LoadDiscarded { url: ticket.url }),
                LoadCompletion::Failed(err) => {
                    warn!(error = %err, "asset load failed");
                    Ok(view_updated(state))
                }
            }
        }

        // -- Viewer lifecycle --
        UiToViewer::Unmount => {
            state.session.unmount();
            Ok(view_updated(state))
        }

        UiToViewer::Remount => {
            let outcome = state.remount()?;
            Ok(upload_response(state, outcome))
        }

        UiToViewer::GetView => Ok(view_updated(state)),
    }
}

fn hover(state: &mut BridgeState, event: HoverEvent) -> ViewerToUi {
    if let Some(next) = highlight_request(&event, state.session.active_feature()) {
        state.session.set_highlight(next);
    }
    view_updated(state)
}

fn upload_response(state: &BridgeState, outcome: UploadOutcome) -> ViewerToUi {
    match outcome {
        UploadOutcome::Load(ticket) => ViewerToUi::LoadRequested {
            ticket,
            view: state.snapshot(),
        },
        UploadOutcome::Ready | UploadOutcome::AwaitingInFlight => view_updated(state),
    }
}

fn view_updated(state: &BridgeState) -> ViewerToUi {
    ViewerToUi::ViewUpdated {
        view: state.snapshot(),
    }
}
