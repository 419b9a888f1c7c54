use std::sync::Arc;

use crate::types::{MaterialRef, MeshNode, NodeIndex, SceneNode};

/// A loaded scene hierarchy stored as a node arena.
///
/// Deliberately not `Clone`: a derived clone would alias every material slot.
/// Use [`SceneGraph::deep_copy`] to obtain an independently owned copy.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    roots: Vec<NodeIndex>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a top-level node.
    pub fn add_root(&mut self, node: SceneNode) -> NodeIndex {
        let index = self.push(node);
        self.roots.push(index);
        index
    }

    /// Append a node under `parent`. Returns `None` if `parent` does not exist.
    pub fn add_child(&mut self, parent: NodeIndex, node: SceneNode) -> Option<NodeIndex> {
        if parent.0 >= self.nodes.len() {
            return None;
        }
        let index = self.push(node);
        self.nodes[parent.0].children.push(index);
        Some(index)
    }

    fn push(&mut self, node: SceneNode) -> NodeIndex {
        self.nodes.push(node);
        NodeIndex(self.nodes.len() - 1)
    }

    pub fn node(&self, index: NodeIndex) -> Option<&SceneNode> {
        self.nodes.get(index.0)
    }

    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn mesh_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.mesh.is_some()).count()
    }

    /// Depth-first pre-order over the hierarchy, roots in insertion order.
    /// Nodes unreachable from a root are not visited.
    pub fn traversal_order(&self) -> Vec<NodeIndex> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeIndex> = self.roots.iter().rev().copied().collect();
        while let Some(index) = stack.pop() {
            let Some(node) = self.nodes.get(index.0) else {
                continue;
            };
            order.push(index);
            stack.extend(node.children.iter().rev().copied());
        }
        order
    }

    /// Visit every mesh node in traversal order.
    pub fn for_each_mesh_node(&self, mut visitor: impl FnMut(NodeIndex, &MeshNode)) {
        for index in self.traversal_order() {
            if let Some(mesh) = self.nodes[index.0].mesh.as_ref() {
                visitor(index, mesh);
            }
        }
    }

    /// Visit every mesh node in traversal order with mutable access.
    pub fn for_each_mesh_node_mut(&mut self, mut visitor: impl FnMut(NodeIndex, &mut MeshNode)) {
        for index in self.traversal_order() {
            if let Some(mesh) = self.nodes[index.0].mesh.as_mut() {
                visitor(index, mesh);
            }
        }
    }

    /// Current material of each mesh node, in traversal order.
    pub fn materials(&self) -> Vec<MaterialRef> {
        let mut out = Vec::new();
        self.for_each_mesh_node(|_, mesh| out.push(Arc::clone(&mesh.material)));
        out
    }

    /// Structurally independent copy: new node objects and new material
    /// slots. Geometry buffers are immutable and stay shared.
    pub fn deep_copy(&self) -> SceneGraph {
        let nodes = self
            .nodes
            .iter()
            .map(|node| SceneNode {
                name: node.name.clone(),
                transform: node.transform,
                children: node.children.clone(),
                mesh: node.mesh.as_ref().map(|mesh| MeshNode {
                    geometry: Arc::clone(&mesh.geometry),
                    material: Arc::new(mesh.material.as_ref().clone()),
                }),
            })
            .collect();
        SceneGraph {
            nodes,
            roots: self.roots.clone(),
        }
    }
}
