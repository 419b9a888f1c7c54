use std::sync::Arc;

use scene_graph::MaterialRef;
use serde::{Deserialize, Serialize};
use tracing::debug;
use viewer_types::{FeatureCatalog, FeatureId};

use crate::instance::SceneInstance;
use crate::palette::MaterialPalette;

/// What a highlight application resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "feature_id")]
pub enum HighlightOutcome {
    /// No feature requested; default materials only.
    Cleared,
    /// The feature was found and the model is highlighted.
    Highlighted(FeatureId),
    /// The requested id is not in the current catalog; treated as unset.
    Unresolved(FeatureId),
}

impl HighlightOutcome {
    pub fn is_highlighted(&self) -> bool {
        matches!(self, HighlightOutcome::Highlighted(_))
    }
}

/// Assigns materials to a scene instance from the selection state.
///
/// The asset pipeline emits one merged mesh per model and no face-to-feature
/// index, so a resolved feature highlights the whole model. Per-feature
/// geometry isolation is not implemented.
#[derive(Debug, Clone, Default)]
pub struct HighlightController {
    palette: MaterialPalette,
}

impl HighlightController {
    pub fn new(palette: MaterialPalette) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &MaterialPalette {
        &self.palette
    }

    /// Run the reset pass and, if `active` resolves in `catalog`, the
    /// highlight pass. Always runs to completion; never fails.
    pub fn apply(
        &self,
        scene: &mut SceneInstance,
        catalog: &FeatureCatalog,
        active: Option<&FeatureId>,
    ) -> HighlightOutcome {
        assign_all(scene, self.palette.default_material());

        let outcome = match active {
            None => HighlightOutcome::Cleared,
            Some(id) => match catalog.lookup(id) {
                Some(feature) => {
                    assign_all(scene, self.palette.highlight_material());
                    debug!(feature = %feature.id, name = %feature.name, "feature highlighted");
                    HighlightOutcome::Highlighted(feature.id.clone())
                }
                None => {
                    debug!(feature = %id, "highlight id not in catalog, ignoring");
                    HighlightOutcome::Unresolved(id.clone())
                }
            },
        };
        debug!(scene = %scene.id(), meshes = scene.mesh_count(), ?outcome, "materials applied");
        outcome
    }
}

fn assign_all(scene: &mut SceneInstance, material: &MaterialRef) {
    scene.for_each_mesh_node_mut(|_, mesh| mesh.material = Arc::clone(material));
}
