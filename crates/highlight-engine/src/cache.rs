use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use scene_graph::{AssetLoader, LoadCause, SceneGraph};
use tracing::{debug, info, instrument, warn};

/// URL-keyed memo of loaded scene graphs.
///
/// Entries are write-once: a stored graph is never replaced or mutated, and
/// callers only ever receive shared read-only handles. Failed loads are not
/// stored, so the next request for the URL loads again.
#[derive(Debug, Default)]
pub struct AssetCache {
    entries: HashMap<String, Arc<SceneGraph>>,
    in_flight: HashSet<String>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached graph for `url`, loading it through `loader` on first use.
    #[instrument(skip(self, loader))]
    pub fn resolve(
        &mut self,
        url: &str,
        loader: &mut dyn AssetLoader,
    ) -> Result<Arc<SceneGraph>, AssetLoadError> {
        if let Some(graph) = self.lookup(url) {
            debug!("asset cache hit");
            return Ok(graph);
        }
        self.begin_load(url);
        let result = loader.load(url);
        self.finish_load(url, result)
    }

    pub fn lookup(&self, url: &str) -> Option<Arc<SceneGraph>> {
        self.entries.get(url).cloned()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// Mark `url` as loading. Returns false when a load for it is already
    /// in flight, in which case the caller must not start another.
    pub fn begin_load(&mut self, url: &str) -> bool {
        self.in_flight.insert(url.to_string())
    }

    /// Drop the in-flight mark for `url` without recording a result, so the
    /// next request starts a fresh load. A result that still arrives through
    /// [`AssetCache::finish_load`] is cached as usual.
    pub fn cancel_load(&mut self, url: &str) -> bool {
        let cancelled = self.in_flight.remove(url);
        if cancelled {
            debug!(url, "in-flight load released");
        }
        cancelled
    }

    pub fn is_loading(&self, url: &str) -> bool {
        self.in_flight.contains(url)
    }

    /// Record the outcome of a load started with [`AssetCache::begin_load`].
    ///
    /// Success stores the graph unless one is already cached, in which case
    /// the existing entry wins and the new graph is dropped.
    pub fn finish_load(
        &mut self,
        url: &str,
        result: Result<SceneGraph, LoadCause>,
    ) -> Result<Arc<SceneGraph>, AssetLoadError> {
        self.in_flight.remove(url);
        match result {
            Ok(graph) => {
                let entry = self
                    .entries
                    .entry(url.to_string())
                    .or_insert_with(|| Arc::new(graph));
                info!(url, meshes = entry.mesh_count(), "asset cached");
                Ok(Arc::clone(entry))
            }
            Err(cause) => {
                warn!(url, %cause, "asset load failed");
                Err(AssetLoadError {
                    url: url.to_string(),
                    cause,
                })
            }
        }
    }

    /// Drop the entry for `url`. Handles already given out stay valid.
    pub fn evict(&mut self, url: &str) -> bool {
        self.entries.remove(url).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A scene asset could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to load asset {url}: {cause}")]
pub struct AssetLoadError {
    pub url: String,
    pub cause: LoadCause,
}
