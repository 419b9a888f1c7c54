//! MockGateway: deterministic test double implementing UploadGateway.

use std::collections::VecDeque;

use viewer_types::{Feature, FeatureCatalog, UploadResponse};

use crate::errors::UploadError;
use crate::gateway::{UploadFile, UploadGateway};

/// Public sample asset the analysis service falls back to when it has no
/// CAD library available.
pub const SAMPLE_MESH_URL: &str =
    "https://raw.githubusercontent.com/KhronosGroup/glTF-Sample-Models/master/2.0/Box/glTF/Box.gltf";

/// The response the analysis service sends in mock mode.
pub fn sample_response() -> UploadResponse {
    let mut hole = Feature::new("feat_1", "Hole 1", "Hole");
    hole.face_ids = vec![4, 5];
    let mut top = Feature::new("feat_2", "Top Face", "Plane");
    top.face_ids = vec![1];

    let features = FeatureCatalog::new(vec![hole, top]).unwrap_or_default();
    UploadResponse {
        mesh_url: SAMPLE_MESH_URL.to_string(),
        features,
        status: Some("mock_success".to_string()),
        message: Some("CAD library not found or error, returning mock data.".to_string()),
    }
}

/// Replays queued outcomes in order; once the queue is empty every upload
/// succeeds with [`sample_response`].
#[derive(Debug, Default)]
pub struct MockGateway {
    queued: VecDeque<Result<UploadResponse, UploadError>>,
    uploads: Vec<String>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_success(&mut self, response: UploadResponse) {
        self.queued.push_back(Ok(response));
    }

    pub fn push_failure(&mut self, error: UploadError) {
        self.queued.push_back(Err(error));
    }

    /// File names received so far, in order.
    pub fn uploads(&self) -> &[String] {
        &self.uploads
    }
}

impl UploadGateway for MockGateway {
    fn upload(&mut self, file: &UploadFile) -> Result<UploadResponse, UploadError> {
        self.uploads.push(file.file_name.clone());
        self.queued
            .pop_front()
            .unwrap_or_else(|| Ok(sample_response()))
    }
}
