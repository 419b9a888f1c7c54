use std::sync::Arc;

use scene_graph::{Color, Material, MaterialRef};
use serde::{Deserialize, Serialize};

/// Colour of every mesh node when nothing is highlighted (`lightgray`).
pub const DEFAULT_COLOR: &str = "#d3d3d3";
/// Colour of every mesh node while a feature is highlighted (`orange`).
pub const HIGHLIGHT_COLOR: &str = "#ffa500";

pub const DEFAULT_MATERIAL_NAME: &str = "viewer-default";
pub const HIGHLIGHT_MATERIAL_NAME: &str = "viewer-highlight";

/// User-facing palette settings, as hex colour strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub default_color: String,
    pub highlight_color: String,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            default_color: DEFAULT_COLOR.to_string(),
            highlight_color: HIGHLIGHT_COLOR.to_string(),
        }
    }
}

/// The two fixed materials the highlight controller assigns.
///
/// Both are shared `Arc`s so repeated applications assign the very same
/// material references.
#[derive(Debug, Clone)]
pub struct MaterialPalette {
    default: MaterialRef,
    highlight: MaterialRef,
}

impl MaterialPalette {
    /// Rejects palettes whose two materials render the same; names are
    /// not part of the appearance.
    pub fn new(default: Material, highlight: Material) -> Result<Self, ConfigError> {
        if same_appearance(&default, &highlight) {
            return Err(ConfigError::IndistinctPalette);
        }
        Ok(Self {
            default: Arc::new(default),
            highlight: Arc::new(highlight),
        })
    }

    pub fn from_config(config: &PaletteConfig) -> Result<Self, ConfigError> {
        let default = parse_color(&config.default_color)?;
        let highlight = parse_color(&config.highlight_color)?;
        Self::new(
            Material::standard(DEFAULT_MATERIAL_NAME, default),
            Material::standard(HIGHLIGHT_MATERIAL_NAME, highlight),
        )
    }

    pub fn default_material(&self) -> &MaterialRef {
        &self.default
    }

    pub fn highlight_material(&self) -> &MaterialRef {
        &self.highlight
    }
}

impl Default for MaterialPalette {
    fn default() -> Self {
        Self {
            default: Arc::new(Material::standard(
                DEFAULT_MATERIAL_NAME,
                Color::from_rgb8(0xd3, 0xd3, 0xd3),
            )),
            highlight: Arc::new(Material::standard(
                HIGHLIGHT_MATERIAL_NAME,
                Color::from_rgb8(0xff, 0xa5, 0x00),
            )),
        }
    }
}

fn same_appearance(a: &Material, b: &Material) -> bool {
    a.base_color == b.base_color && a.metallic == b.metallic && a.roughness == b.roughness
}

fn parse_color(hex: &str) -> Result<Color, ConfigError> {
    Color::parse_hex(hex).ok_or_else(|| ConfigError::InvalidColor {
        value: hex.to_string(),
    })
}

/// Errors in viewer configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid colour {value:?}, expected #rrggbb")]
    InvalidColor { value: String },

    #[error("default and highlight materials must differ")]
    IndistinctPalette,
}
