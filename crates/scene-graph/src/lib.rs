pub mod gltf_loader;
pub mod graph;
pub mod mock_loader;
pub mod source;
pub mod traits;
pub mod types;

pub use gltf_loader::GltfLoader;
pub use graph::SceneGraph;
pub use mock_loader::MockLoader;
pub use source::*;
pub use traits::*;
pub use types::*;
