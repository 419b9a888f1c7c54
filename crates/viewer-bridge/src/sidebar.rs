use serde::{Deserialize, Serialize};
use viewer_types::{FeatureCatalog, FeatureId};

/// One entry of the feature list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarRow {
    pub id: FeatureId,
    /// `"{name} ({type})"`.
    pub label: String,
    /// Whether this row is the highlighted feature.
    pub active: bool,
}

/// Rows in catalog order, marking the one matching `active`.
pub fn sidebar_rows(catalog: &FeatureCatalog, active: Option<&FeatureId>) -> Vec<SidebarRow> {
    catalog
        .iter()
        .map(|feature| SidebarRow {
            id: feature.id.clone(),
            label: feature.label(),
            active: active == Some(&feature.id),
        })
        .collect()
}

/// Pointer events on a feature row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverEvent {
    Enter(FeatureId),
    Leave(FeatureId),
}

/// The highlight change a hover event asks for, or `None` for no change.
///
/// Leaving a row only clears the highlight if that row is still the active
/// one; when the pointer has already entered the next row the leave is
/// ignored, so the highlight moves directly between features.
pub fn highlight_request(event: &HoverEvent, active: Option<&FeatureId>) -> Option<Option<FeatureId>> {
    match event {
        HoverEvent::Enter(id) => Some(Some(id.clone())),
        HoverEvent::Leave(id) if active == Some(id) => Some(None),
        HoverEvent::Leave(_) => None,
    }
}
