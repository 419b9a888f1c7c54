use scene_graph::{MaterialRef, MeshNode, NodeIndex, SceneGraph};
use uuid::Uuid;

/// A viewer's private, mutable copy of a cached scene graph.
///
/// Built by deep copy, so material changes here never reach the cache or
/// any other instance. Recreated for every new asset; reused in place
/// across highlight changes.
#[derive(Debug)]
pub struct SceneInstance {
    id: Uuid,
    source_url: Option<String>,
    graph: SceneGraph,
}

impl SceneInstance {
    pub fn from_graph(graph: &SceneGraph) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_url: None,
            graph: graph.deep_copy(),
        }
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    /// Identity of this instance; a new instance always has a new id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn mesh_count(&self) -> usize {
        self.graph.mesh_count()
    }

    pub fn for_each_mesh_node(&self, visitor: impl FnMut(NodeIndex, &MeshNode)) {
        self.graph.for_each_mesh_node(visitor);
    }

    pub fn for_each_mesh_node_mut(&mut self, visitor: impl FnMut(NodeIndex, &mut MeshNode)) {
        self.graph.for_each_mesh_node_mut(visitor);
    }

    /// Current material assignment, one entry per mesh node in traversal order.
    pub fn materials(&self) -> Vec<MaterialRef> {
        self.graph.materials()
    }
}
