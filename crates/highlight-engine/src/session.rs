use std::sync::Arc;

use scene_graph::{LoadCause, SceneGraph};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;
use viewer_types::{FeatureCatalog, FeatureId, UploadResponse};

use crate::cache::{AssetCache, AssetLoadError};
use crate::controller::{HighlightController, HighlightOutcome};
use crate::instance::SceneInstance;

/// A load the driver must perform and report back through
/// [`ViewerSession::complete_load`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadTicket {
    pub id: Uuid,
    pub url: String,
}

/// What the session's viewport currently shows.
#[derive(Debug)]
pub enum Viewport {
    /// No model uploaded yet, or the viewer is unmounted.
    Empty,
    /// Waiting for the asset at `url`.
    Loading { url: String },
    Ready(SceneInstance),
    /// The asset failed to load; nothing is rendered for it.
    Failed(AssetLoadError),
}

impl Viewport {
    pub fn status(&self) -> ViewportStatus {
        match self {
            Viewport::Empty => ViewportStatus::Empty,
            Viewport::Loading { .. } => ViewportStatus::Loading,
            Viewport::Ready(_) => ViewportStatus::Ready,
            Viewport::Failed(_) => ViewportStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportStatus {
    Empty,
    Loading,
    Ready,
    Failed,
}

/// Result of attaching a new asset URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The asset was cached; a fresh scene instance is attached.
    Ready,
    /// The driver must load the asset and call `complete_load`.
    Load(LoadTicket),
    /// Another load for the same URL is already running; its completion
    /// will attach.
    AwaitingInFlight,
}

/// Result of reporting a finished load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadCompletion {
    /// A fresh scene instance was attached and materials applied.
    Attached(HighlightOutcome),
    /// The session moved on to another asset; the result was only cached.
    Discarded,
    /// The load for the current asset failed.
    Failed(AssetLoadError),
}

/// Top-level viewer state: asset URL, feature catalog and active highlight.
///
/// Every setter performs its full transition, including the resets it
/// implies, and re-runs the highlight controller when a scene is attached.
#[derive(Debug)]
pub struct ViewerSession {
    asset_url: Option<String>,
    catalog: Arc<FeatureCatalog>,
    active_feature: Option<FeatureId>,
    viewport: Viewport,
    controller: HighlightController,
}

impl ViewerSession {
    pub fn new(controller: HighlightController) -> Self {
        Self {
            asset_url: None,
            catalog: Arc::new(FeatureCatalog::empty()),
            active_feature: None,
            viewport: Viewport::Empty,
            controller,
        }
    }

    /// Replace asset URL and catalog together and clear the highlight.
    /// The previous scene instance is dropped. A load still pending for a
    /// different URL is released, so the host may abandon its ticket.
    pub fn set_upload(
        &mut self,
        mesh_url: impl Into<String>,
        catalog: FeatureCatalog,
        cache: &mut AssetCache,
    ) -> UploadOutcome {
        let mesh_url = mesh_url.into();
        info!(url = %mesh_url, features = catalog.len(), "new upload");
        if let Viewport::Loading { url } = &self.viewport {
            if *url != mesh_url {
                cache.cancel_load(url);
            }
        }
        self.asset_url = Some(mesh_url.clone());
        self.catalog = Arc::new(catalog);
        self.active_feature = None;
        self.viewport = Viewport::Empty;
        self.attach_or_request(mesh_url, cache)
    }

    /// [`ViewerSession::set_upload`] from a decoded service response.
    pub fn apply_upload(&mut self, response: UploadResponse, cache: &mut AssetCache) -> UploadOutcome {
        self.set_upload(response.mesh_url, response.features, cache)
    }

    /// Replace the active feature id and re-apply materials in place.
    ///
    /// Returns `None` when no scene is attached; the id is kept and applied
    /// once a load attaches.
    pub fn set_highlight(&mut self, id: Option<FeatureId>) -> Option<HighlightOutcome> {
        self.active_feature = id;
        self.reapply()
    }

    /// Report the result of the load described by `ticket`.
    ///
    /// The result always reaches the cache. It becomes the active scene only
    /// if the session is still loading that same URL.
    pub fn complete_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<SceneGraph, LoadCause>,
        cache: &mut AssetCache,
    ) -> LoadCompletion {
        let cached = cache.finish_load(&ticket.url, result);
        let current = matches!(&self.viewport, Viewport::Loading { url } if *url == ticket.url);
        if !current {
            debug!(ticket = %ticket.id, url = %ticket.url, "discarding superseded load");
            return LoadCompletion::Discarded;
        }
        match cached {
            Ok(graph) => LoadCompletion::Attached(self.attach(&ticket.url, &graph)),
            Err(err) => {
                self.viewport = Viewport::Failed(err.clone());
                LoadCompletion::Failed(err)
            }
        }
    }

    /// Destroy the scene instance, keeping URL, catalog and highlight.
    pub fn unmount(&mut self) {
        if matches!(self.viewport, Viewport::Ready(_)) {
            debug!("viewer unmounted");
        }
        self.viewport = Viewport::Empty;
    }

    /// Recreate the scene instance for the current URL after `unmount`
    /// or a failed load. Returns `None` when no asset URL is set.
    pub fn remount(&mut self, cache: &mut AssetCache) -> Option<UploadOutcome> {
        let url = self.asset_url.clone()?;
        let outcome = match self.viewport {
            Viewport::Ready(_) => UploadOutcome::Ready,
            Viewport::Loading { .. } => UploadOutcome::AwaitingInFlight,
            Viewport::Empty | Viewport::Failed(_) => self.attach_or_request(url, cache),
        };
        Some(outcome)
    }

    pub fn asset_url(&self) -> Option<&str> {
        self.asset_url.as_deref()
    }

    pub fn catalog(&self) -> &Arc<FeatureCatalog> {
        &self.catalog
    }

    pub fn active_feature(&self) -> Option<&FeatureId> {
        self.active_feature.as_ref()
    }

    pub fn is_active(&self, id: &FeatureId) -> bool {
        self.active_feature.as_ref() == Some(id)
    }

    /// URL of the load the session is waiting for, if any.
    pub fn loading_url(&self) -> Option<&str> {
        match &self.viewport {
            Viewport::Loading { url } => Some(url),
            _ => None,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn scene(&self) -> Option<&SceneInstance> {
        match &self.viewport {
            Viewport::Ready(scene) => Some(scene),
            _ => None,
        }
    }

    pub fn controller(&self) -> &HighlightController {
        &self.controller
    }

    fn attach_or_request(&mut self, url: String, cache: &mut AssetCache) -> UploadOutcome {
        if let Some(graph) = cache.lookup(&url) {
            self.attach(&url, &graph);
            return UploadOutcome::Ready;
        }
        let must_load = cache.begin_load(&url);
        self.viewport = Viewport::Loading { url: url.clone() };
        if must_load {
            let ticket = LoadTicket {
                id: Uuid::new_v4(),
                url,
            };
            debug!(ticket = %ticket.id, url = %ticket.url, "load requested");
            UploadOutcome::Load(ticket)
        } else {
            debug!(url = %url, "load already in flight");
            UploadOutcome::AwaitingInFlight
        }
    }

    fn attach(&mut self, url: &str, graph: &SceneGraph) -> HighlightOutcome {
        let mut scene = SceneInstance::from_graph(graph).with_source_url(url);
        let outcome = self
            .controller
            .apply(&mut scene, &self.catalog, self.active_feature.as_ref());
        info!(scene = %scene.id(), url, meshes = scene.mesh_count(), "scene attached");
        self.viewport = Viewport::Ready(scene);
        outcome
    }

    fn reapply(&mut self) -> Option<HighlightOutcome> {
        let Viewport::Ready(scene) = &mut self.viewport else {
            if let Some(id) = &self.active_feature {
                debug!(feature = %id, "no scene attached, highlight deferred");
            }
            return None;
        };
        Some(
            self.controller
                .apply(scene, &self.catalog, self.active_feature.as_ref()),
        )
    }
}

impl Default for ViewerSession {
    fn default() -> Self {
        Self::new(HighlightController::default())
    }
}
