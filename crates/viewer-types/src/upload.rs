use serde::{Deserialize, Serialize};

use crate::catalog::FeatureCatalog;

/// Body returned by the analysis service after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Absolute or relative URL of the generated scene asset.
    pub mesh_url: String,
    /// Features identified on the model, in display order.
    #[serde(default)]
    pub features: FeatureCatalog,
    /// Processing status reported by the service (`"success"`, `"mock_success"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Free-form note from the service, shown to the user as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UploadResponse {
    pub fn new(mesh_url: impl Into<String>, features: FeatureCatalog) -> Self {
        Self {
            mesh_url: mesh_url.into(),
            features,
            status: None,
            message: None,
        }
    }
}
