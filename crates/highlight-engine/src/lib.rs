//! Scene/feature binding and highlight state machine.
//!
//! [`AssetCache`] owns immutable master copies of loaded scenes,
//! [`SceneInstance`] is a viewer's private deep copy, [`HighlightController`]
//! assigns materials from the selection state and [`ViewerSession`] wires the
//! three together.

pub mod cache;
pub mod controller;
pub mod instance;
pub mod palette;
pub mod session;

pub use cache::{AssetCache, AssetLoadError};
pub use controller::{HighlightController, HighlightOutcome};
pub use instance::SceneInstance;
pub use palette::{ConfigError, MaterialPalette, PaletteConfig};
pub use session::{
    LoadCompletion, LoadTicket, UploadOutcome, ViewerSession, Viewport, ViewportStatus,
};
