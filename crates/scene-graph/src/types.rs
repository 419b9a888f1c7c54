use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Shared, immutable material. Mesh nodes hold one of these in a slot that
/// may be reassigned; the material itself is never edited.
pub type MaterialRef = Arc<Material>;

/// Index of a node within its owning [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIndex(pub usize);

/// Linear RGBA colour, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r, g, b, a])
    }

    /// Opaque colour from 8-bit sRGB-style channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self([
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            1.0,
        ])
    }

    /// Parse `#rrggbb` or `rrggbb` into an opaque colour.
    pub fn parse_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// `#rrggbb` representation, alpha dropped.
    pub fn to_hex(&self) -> String {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.0[0]),
            channel(self.0[1]),
            channel(self.0[2])
        )
    }
}

/// Physically-based surface description for one mesh node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: Option<String>,
    pub base_color: Color,
    pub metallic: f32,
    pub roughness: f32,
}

impl Material {
    /// Opaque, non-metallic, fully rough material of the given colour.
    pub fn standard(name: impl Into<String>, base_color: Color) -> Self {
        Self {
            name: Some(name.into()),
            base_color,
            metallic: 0.0,
            roughness: 1.0,
        }
    }
}

/// Triangle geometry. Immutable once loaded, so it may be shared between
/// a cached graph and the copies made from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshGeometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshGeometry {
    pub fn triangle_count(&self) -> usize {
        if self.indices.is_empty() {
            self.positions.len() / 3
        } else {
            self.indices.len() / 3
        }
    }
}

/// The renderable part of a scene node.
#[derive(Debug)]
pub struct MeshNode {
    pub geometry: Arc<MeshGeometry>,
    /// Currently assigned material.
    pub material: MaterialRef,
}

/// A node in the scene hierarchy.
#[derive(Debug)]
pub struct SceneNode {
    pub name: Option<String>,
    /// Column-major local transform.
    pub transform: [[f32; 4]; 4],
    pub children: Vec<NodeIndex>,
    pub mesh: Option<MeshNode>,
}

pub const IDENTITY: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

impl SceneNode {
    /// An empty grouping node.
    pub fn group(name: Option<String>) -> Self {
        Self {
            name,
            transform: IDENTITY,
            children: Vec::new(),
            mesh: None,
        }
    }

    /// A node carrying geometry and a material.
    pub fn mesh(name: Option<String>, geometry: Arc<MeshGeometry>, material: MaterialRef) -> Self {
        Self {
            name,
            transform: IDENTITY,
            children: Vec::new(),
            mesh: Some(MeshNode { geometry, material }),
        }
    }
}

/// Errors produced while fetching or decoding a scene asset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadCause {
    #[error("fetch failed: {reason}")]
    Fetch { reason: String },

    /// Bytes for `url` must be supplied by the host before the load can
    /// finish. Raised for remote URLs when no HTTP client is available.
    #[error("bytes for {url} were not provided")]
    MissingBytes { url: String },

    #[error("unsupported URL scheme: {scheme}")]
    UnsupportedScheme { scheme: String },

    #[error("malformed data URI: {reason}")]
    InvalidDataUri { reason: String },

    #[error("asset decode failed: {reason}")]
    Decode { reason: String },
}
