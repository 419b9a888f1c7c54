use highlight_engine::{ViewerSession, Viewport, ViewportStatus};
use serde::{Deserialize, Serialize};
use viewer_types::FeatureId;

use crate::sidebar::{sidebar_rows, SidebarRow};

/// Material state of one mesh node, as the renderer needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshView {
    /// Node index within the scene instance.
    pub node: usize,
    pub name: Option<String>,
    pub material: Option<String>,
    /// `#rrggbb`.
    pub color: String,
}

/// Everything the UI renders, derived from the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub asset_url: Option<String>,
    pub status: ViewportStatus,
    /// Load failure text when `status` is `failed`.
    pub error: Option<String>,
    pub rows: Vec<SidebarRow>,
    pub active_feature: Option<FeatureId>,
    pub meshes: Vec<MeshView>,
    /// Note sent by the analysis service with the last upload.
    pub message: Option<String>,
}

impl ViewSnapshot {
    pub fn capture(session: &ViewerSession, message: Option<&str>) -> Self {
        let mut meshes = Vec::new();
        if let Some(scene) = session.scene() {
            scene.for_each_mesh_node(|index, mesh| {
                meshes.push(MeshView {
                    node: index.0,
                    name: scene.graph().node(index).and_then(|n| n.name.clone()),
                    material: mesh.material.name.clone(),
                    color: mesh.material.base_color.to_hex(),
                });
            });
        }
        let error = match session.viewport() {
            Viewport::Failed(err) => Some(err.to_string()),
            _ => None,
        };
        Self {
            asset_url: session.asset_url().map(str::to_string),
            status: session.viewport().status(),
            error,
            rows: sidebar_rows(session.catalog(), session.active_feature()),
            active_feature: session.active_feature().cloned(),
            meshes,
            message: message.map(str::to_string),
        }
    }
}
