//! glTF 2.0 / GLB decoding into a [`SceneGraph`].
//!
//! Supports embedded GLB blobs, `data:` buffer URIs and external buffers
//! resolved relative to the asset URL. Each glTF node becomes one scene node;
//! each mesh primitive becomes one mesh node (nested under the glTF node when
//! a mesh has several primitives).

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::graph::SceneGraph;
use crate::source::{decode_data_uri, resolve_relative};
use crate::traits::{AssetLoader, AssetSource};
use crate::types::{Color, LoadCause, Material, MeshGeometry, MeshNode, NodeIndex, SceneNode};

/// Loader that fetches bytes through `S` and decodes them as glTF.
pub struct GltfLoader<S> {
    source: S,
}

impl<S: AssetSource> GltfLoader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Decode already-fetched bytes. `base_url` resolves external buffers.
    pub fn decode(&mut self, base_url: &str, bytes: &[u8]) -> Result<SceneGraph, LoadCause> {
        let gltf = gltf::Gltf::from_slice(bytes).map_err(|e| LoadCause::Decode {
            reason: e.to_string(),
        })?;
        let buffers = self.load_buffers(base_url, &gltf)?;

        let scene = gltf
            .document
            .default_scene()
            .or_else(|| gltf.document.scenes().next())
            .ok_or_else(|| LoadCause::Decode {
                reason: "glTF contains no scenes".to_string(),
            })?;

        let mut graph = SceneGraph::new();
        let mut walk = NodeWalk::default();
        for node in scene.nodes() {
            add_node(&mut graph, None, &node, &buffers, &mut walk)?;
        }
        info!(
            nodes = graph.node_count(),
            meshes = graph.mesh_count(),
            "decoded glTF scene"
        );
        Ok(graph)
    }

    fn load_buffers(&mut self, base_url: &str, gltf: &gltf::Gltf) -> Result<Vec<Vec<u8>>, LoadCause> {
        let mut out = Vec::new();
        for buffer in gltf.document.buffers() {
            let data = match buffer.source() {
                gltf::buffer::Source::Bin => gltf.blob.clone().ok_or_else(|| LoadCause::Decode {
                    reason: "GLB binary chunk missing".to_string(),
                })?,
                gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => decode_data_uri(uri)?,
                gltf::buffer::Source::Uri(uri) => {
                    let resolved = resolve_relative(base_url, uri);
                    debug!(buffer = buffer.index(), url = %resolved, "fetching external buffer");
                    self.source.fetch(&resolved)?
                }
            };
            if data.len() < buffer.length() {
                return Err(LoadCause::Decode {
                    reason: format!(
                        "buffer {} holds {} bytes, expected {}",
                        buffer.index(),
                        data.len(),
                        buffer.length()
                    ),
                });
            }
            out.push(data);
        }
        Ok(out)
    }
}

impl<S: AssetSource> AssetLoader for GltfLoader<S> {
    #[instrument(skip(self))]
    fn load(&mut self, url: &str) -> Result<SceneGraph, LoadCause> {
        let bytes = self.source.fetch(url)?;
        self.decode(url, &bytes)
    }
}

/// glTF node indices seen so far, and the chain from the scene root to the
/// node being added.
#[derive(Default)]
struct NodeWalk {
    seen: HashSet<usize>,
    path: Vec<usize>,
}

impl NodeWalk {
    fn enter(&mut self, index: usize) -> Result<(), LoadCause> {
        if self.path.contains(&index) {
            return Err(LoadCause::Decode {
                reason: format!("cyclic node hierarchy at node {index}"),
            });
        }
        if !self.seen.insert(index) {
            return Err(LoadCause::Decode {
                reason: format!("node {index} has more than one parent"),
            });
        }
        self.path.push(index);
        Ok(())
    }

    fn leave(&mut self) {
        self.path.pop();
    }
}

fn add_node(
    graph: &mut SceneGraph,
    parent: Option<NodeIndex>,
    node: &gltf::Node<'_>,
    buffers: &[Vec<u8>],
    walk: &mut NodeWalk,
) -> Result<(), LoadCause> {
    walk.enter(node.index())?;
    let mut scene_node = SceneNode::group(node.name().map(str::to_string));
    scene_node.transform = node.transform().matrix();

    let primitives: Vec<(Arc<MeshGeometry>, Material)> = match node.mesh() {
        Some(mesh) => mesh
            .primitives()
            .filter_map(|primitive| read_primitive(&primitive, buffers))
            .collect(),
        None => Vec::new(),
    };

    let mut primitives = primitives.into_iter();
    let nested = if primitives.len() == 1 {
        if let Some((geometry, material)) = primitives.next() {
            scene_node.mesh = Some(MeshNode {
                geometry,
                material: Arc::new(material),
            });
        }
        Vec::new()
    } else {
        primitives.collect()
    };

    let index = match parent {
        Some(parent) => graph
            .add_child(parent, scene_node)
            .ok_or_else(|| LoadCause::Decode {
                reason: format!("dangling parent node {}", parent.0),
            })?,
        None => graph.add_root(scene_node),
    };

    for (geometry, material) in nested {
        graph.add_child(index, SceneNode::mesh(None, geometry, Arc::new(material)));
    }

    for child in node.children() {
        add_node(graph, Some(index), &child, buffers, walk)?;
    }
    walk.leave();
    Ok(())
}

fn read_primitive(
    primitive: &gltf::Primitive<'_>,
    buffers: &[Vec<u8>],
) -> Option<(Arc<MeshGeometry>, Material)> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
    let Some(positions) = reader.read_positions() else {
        warn!(primitive = primitive.index(), "skipping primitive without positions");
        return None;
    };
    let geometry = MeshGeometry {
        positions: positions.collect(),
        normals: reader
            .read_normals()
            .map(|normals| normals.collect())
            .unwrap_or_default(),
        indices: reader
            .read_indices()
            .map(|indices| indices.into_u32().collect())
            .unwrap_or_default(),
    };

    let source = primitive.material();
    let pbr = source.pbr_metallic_roughness();
    let material = Material {
        name: source.name().map(str::to_string),
        base_color: Color(pbr.base_color_factor()),
        metallic: pbr.metallic_factor(),
        roughness: pbr.roughness_factor(),
    };
    Some((Arc::new(geometry), material))
}
