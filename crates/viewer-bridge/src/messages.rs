use highlight_engine::LoadTicket;
use serde::{Deserialize, Serialize};
use viewer_types::{FeatureId, UploadResponse};

use crate::view::ViewSnapshot;

/// Messages from the UI to the viewer.
/// Serialized as JSON, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiToViewer {
    // -- Upload --
    /// The analysis service accepted a file.
    UploadSucceeded { response: UploadResponse },
    /// The upload failed; the current model stays as it is.
    UploadFailed { message: String },

    // -- Hover --
    /// Pointer entered a feature row.
    HoverEnter { feature_id: FeatureId },
    /// Pointer left a feature row.
    HoverLeave { feature_id: FeatureId },
    /// Set or clear the highlight directly.
    SetHighlight {
        #[serde(default)]
        feature_id: Option<FeatureId>,
    },

    // -- Asset loading --
    /// Perform the load for a previously requested ticket.
    CompleteLoad { ticket: LoadTicket },

    // -- Viewer lifecycle --
    Unmount,
    Remount,
    GetView,
}

/// Messages from the viewer to the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ViewerToUi {
    /// The view changed (or was requested).
    ViewUpdated { view: ViewSnapshot },

    /// The asset is not cached; the host should fetch it and send
    /// `CompleteLoad` with this ticket.
    LoadRequested { ticket: LoadTicket, view: ViewSnapshot },

    /// The load for `ticket` needs bytes for `url` (the asset itself or a
    /// buffer it references). Supply them with `provide_asset_bytes` and
    /// send `CompleteLoad` with the same ticket again.
    BytesRequested {
        ticket: LoadTicket,
        url: String,
        view: ViewSnapshot,
    },

    /// A finished load belonged to a model that is no longer shown.
    LoadDiscarded { url: String },

    /// An upload failed. The view is unchanged.
    UploadRejected { message: String, view: ViewSnapshot },

    /// The message could not be handled.
    Error { message: String },
}
