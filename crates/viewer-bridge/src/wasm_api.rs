//! WASM entry points for the browser host.
//!
//! This module is only compiled for the `wasm32` target. The host fetches
//! asset bytes itself (there is no blocking HTTP in the browser), hands them
//! over with [`provide_asset_bytes`] and then sends `CompleteLoad`. Buffers a
//! glTF file references are asked for one at a time through `BytesRequested`.

use std::cell::RefCell;

use scene_graph::{GltfLoader, SchemeSource};
use wasm_bindgen::prelude::*;

use crate::bridge_state::BridgeState;
use crate::dispatch;
use crate::messages::{UiToViewer, ViewerToUi};

// Global viewer state, single-threaded in the browser.
thread_local! {
    static VIEWER: RefCell<Option<WasmViewer>> = const { RefCell::new(None) };
}

struct WasmViewer {
    state: BridgeState,
    loader: GltfLoader<SchemeSource>,
}

const NOT_INITIALIZED: &str = r#"{"type":"Error","message":"Viewer not initialized. Call init() first."}"#;

/// Initialize the viewer. Calling it again discards all state, cache included.
#[wasm_bindgen]
pub fn init() {
    console_error_panic_hook::set_once();

    VIEWER.with(|cell| {
        *cell.borrow_mut() = Some(WasmViewer {
            state: BridgeState::default(),
            loader: GltfLoader::new(SchemeSource::new()),
        });
    });
    web_sys::console::debug_1(&"feature viewer initialized".into());
}

/// Process a JSON `UiToViewer` message and return a JSON `ViewerToUi`
/// response.
///
/// Staged bytes are dropped once a load finishes, whatever its outcome, and
/// kept while the load is still asking for more.
#[wasm_bindgen]
pub fn process_message(json_input: &str) -> String {
    let msg: UiToViewer = match serde_json::from_str(json_input) {
        Ok(msg) => msg,
        Err(e) => {
            return encode_or_report(&ViewerToUi::Error {
                message: format!("Failed to parse message: {e}"),
            })
        }
    };
    let completes_load = matches!(msg, UiToViewer::CompleteLoad { .. });

    VIEWER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(viewer) => {
            let response = dispatch::dispatch(&mut viewer.state, msg, &mut viewer.loader);
            if completes_load && !matches!(response, ViewerToUi::BytesRequested { .. }) {
                viewer.loader.source_mut().prefetched.clear();
            }
            encode_or_report(&response)
        }
        None => NOT_INITIALIZED.to_string(),
    })
}

/// Stage fetched bytes for `url`; the next load of that URL consumes them.
/// Returns `false` when the viewer is not initialized.
#[wasm_bindgen]
pub fn provide_asset_bytes(url: &str, bytes: &[u8]) -> bool {
    VIEWER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(viewer) => {
            viewer
                .loader
                .source_mut()
                .prefetched
                .insert(url, bytes.to_vec());
            true
        }
        None => false,
    })
}

/// Current view as JSON, without sending a message.
#[wasm_bindgen]
pub fn get_view() -> String {
    VIEWER.with(|cell| match cell.borrow().as_ref() {
        Some(viewer) => serde_json::to_string(&viewer.state.snapshot())
            .unwrap_or_else(|e| error_json(&e.to_string())),
        None => NOT_INITIALIZED.to_string(),
    })
}

fn encode_or_report(response: &ViewerToUi) -> String {
    dispatch::encode(response).unwrap_or_else(|e| error_json(&e.to_string()))
}

fn error_json(message: &str) -> String {
    format!(r#"{{"type":"Error","message":{message:?}}}"#)
}
