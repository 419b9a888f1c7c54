//! MockLoader: deterministic test double implementing AssetLoader.
//!
//! Produces a synthetic scene per URL: one root group with a fixed number of
//! unit-cube mesh nodes. Records how often each URL was loaded.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::graph::SceneGraph;
use crate::traits::AssetLoader;
use crate::types::{Color, LoadCause, Material, MeshGeometry, SceneNode};

/// Name given to the material baked into every mock mesh.
pub const MOCK_MATERIAL_NAME: &str = "mock-asset-material";

pub struct MockLoader {
    meshes_per_scene: usize,
    loads: HashMap<String, usize>,
    failing: HashSet<String>,
    geometry: Arc<MeshGeometry>,
}

impl MockLoader {
    pub fn new() -> Self {
        Self::with_meshes(1)
    }

    /// Loader whose scenes contain `count` mesh nodes.
    pub fn with_meshes(count: usize) -> Self {
        Self {
            meshes_per_scene: count,
            loads: HashMap::new(),
            failing: HashSet::new(),
            geometry: Arc::new(unit_cube()),
        }
    }

    /// Make every later load of `url` fail.
    pub fn fail_url(&mut self, url: impl Into<String>) {
        self.failing.insert(url.into());
    }

    /// Let `url` load successfully again.
    pub fn heal_url(&mut self, url: &str) {
        self.failing.remove(url);
    }

    /// Number of load attempts made for `url`, failures included.
    pub fn load_count(&self, url: &str) -> usize {
        self.loads.get(url).copied().unwrap_or(0)
    }

    pub fn total_loads(&self) -> usize {
        self.loads.values().sum()
    }

    /// Build the scene this loader returns, without recording a load.
    pub fn build_scene(&self, url: &str) -> SceneGraph {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(SceneNode::group(Some(url.to_string())));
        for i in 0..self.meshes_per_scene {
            let material = Arc::new(Material {
                name: Some(MOCK_MATERIAL_NAME.to_string()),
                base_color: Color::rgba(0.8, 0.8, 0.8, 1.0),
                metallic: 0.5,
                roughness: 0.5,
            });
            graph.add_child(
                root,
                SceneNode::mesh(Some(format!("Mesh{i}")), Arc::clone(&self.geometry), material),
            );
        }
        graph
    }
}

impl Default for MockLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetLoader for MockLoader {
    fn load(&mut self, url: &str) -> Result<SceneGraph, LoadCause> {
        *self.loads.entry(url.to_string()).or_insert(0) += 1;
        if self.failing.contains(url) {
            return Err(LoadCause::Fetch {
                reason: format!("mock failure for {url}"),
            });
        }
        Ok(self.build_scene(url))
    }
}

/// Axis-aligned cube from (0,0,0) to (1,1,1): 8 vertices, 12 triangles.
fn unit_cube() -> MeshGeometry {
    let positions = vec![
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
        [0.0, 1.0, 1.0],
    ];
    let indices = vec![
        0, 2, 1, 0, 3, 2, // bottom
        4, 5, 6, 4, 6, 7, // top
        0, 1, 5, 0, 5, 4, // front
        2, 3, 7, 2, 7, 6, // back
        1, 2, 6, 1, 6, 5, // right
        3, 0, 4, 3, 4, 7, // left
    ];
    MeshGeometry {
        positions,
        normals: Vec::new(),
        indices,
    }
}
