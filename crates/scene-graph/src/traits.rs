use crate::graph::SceneGraph;
use crate::types::LoadCause;

/// Turns an asset URL into a scene graph.
/// Implemented by GltfLoader (real decoding) and MockLoader (deterministic test double).
pub trait AssetLoader {
    /// Fetch and decode the asset at `url`.
    fn load(&mut self, url: &str) -> Result<SceneGraph, LoadCause>;
}

/// Byte transport used by decoding loaders.
pub trait AssetSource {
    /// Fetch the raw bytes behind `url`.
    fn fetch(&mut self, url: &str) -> Result<Vec<u8>, LoadCause>;
}

impl<T: AssetLoader + ?Sized> AssetLoader for &mut T {
    fn load(&mut self, url: &str) -> Result<SceneGraph, LoadCause> {
        (**self).load(url)
    }
}

impl<T: AssetSource + ?Sized> AssetSource for &mut T {
    fn fetch(&mut self, url: &str) -> Result<Vec<u8>, LoadCause> {
        (**self).fetch(url)
    }
}
