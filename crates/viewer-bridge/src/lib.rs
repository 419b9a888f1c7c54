//! Message bridge between a UI host and the feature viewer.
//!
//! The host sends [`UiToViewer`] messages and renders the [`ViewSnapshot`]
//! carried by each [`ViewerToUi`] response.

pub mod bridge_state;
pub mod dispatch;
pub mod messages;
pub mod sidebar;
pub mod view;

#[cfg(target_arch = "wasm32")]
pub mod wasm_api;

pub use bridge_state::{BridgeError, BridgeState};
pub use dispatch::{dispatch, dispatch_json, handle_message};
pub use messages::{UiToViewer, ViewerToUi};
pub use sidebar::{highlight_request, sidebar_rows, HoverEvent, SidebarRow};
pub use view::{MeshView, ViewSnapshot};
