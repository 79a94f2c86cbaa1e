//! Configuration type definitions.

use super::enums::ColorSpec;
use crate::palette::{DEFAULT_RESOLUTION, Palette, PaletteError, PaletteSlot};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Rendering settings.
///
/// Controls the supersampled canvas, the final image size and where the
/// document lands on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RenderConfig {
    /// Side of the square canvas documents are rasterized onto, in pixels
    /// (valid range: 1 - 16384)
    #[serde(default = "default_render_size")]
    pub render_size: u32,

    /// Side of the final image after downsampling (valid range: 1 - render_size)
    #[serde(default = "default_output_size")]
    pub output_size: u32,

    /// Share of the canvas width and height the document occupies
    /// (valid range: 0.01 - 1.0)
    #[serde(default = "default_document_fraction")]
    pub document_fraction: f64,

    /// Anchor of the document inside the canvas: L/M/R followed by T/M/B
    /// (e.g. "MM" for centered, "LT" for top-left)
    #[serde(default = "default_alignment")]
    pub alignment: String,

    /// Fail on undecodable colors instead of painting them transparent
    #[serde(default)]
    pub strict_colors: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            render_size: default_render_size(),
            output_size: default_output_size(),
            document_fraction: default_document_fraction(),
            alignment: default_alignment(),
            strict_colors: false,
        }
    }
}

/// Background disc settings.
///
/// The disc is only painted when a palette is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BackgroundConfig {
    /// Paint a gradient disc beneath the document
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Disc diameter as a share of the canvas size (valid range: 0.01 - 1.0)
    #[serde(default = "default_disc_fraction")]
    pub disc_fraction: f64,

    /// Gradient direction in degrees, 0 running left to right
    #[serde(default = "default_angle")]
    pub angle_degrees: f64,

    /// Number of precomputed gradient steps (valid range: 1 - 4096)
    #[serde(default = "default_resolution")]
    pub resolution: usize,

    /// Palette color the gradient starts with
    #[serde(default = "default_start_slot")]
    pub start: PaletteSlot,

    /// Palette color the gradient ends with
    #[serde(default = "default_end_slot")]
    pub end: PaletteSlot,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            disc_fraction: default_disc_fraction(),
            angle_degrees: default_angle(),
            resolution: default_resolution(),
            start: default_start_slot(),
            end: default_end_slot(),
        }
    }
}

/// A user-defined palette.
///
/// Grays in the source art blend from `primary` (black) to `secondary`
/// (white); pure red, lime and blue become `extra1`, `extra2` and `extra3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PaletteConfig {
    pub primary: ColorSpec,
    pub secondary: ColorSpec,
    pub extra1: ColorSpec,
    pub extra2: ColorSpec,
    pub extra3: ColorSpec,
}

impl PaletteConfig {
    pub fn to_palette(&self, name: &str) -> Result<Palette, PaletteError> {
        let decode = |spec: &ColorSpec| {
            spec.to_color().map_err(|source| PaletteError::Color {
                palette: name.to_string(),
                source,
            })
        };

        Ok(Palette {
            primary: decode(&self.primary)?,
            secondary: decode(&self.secondary)?,
            extra1: decode(&self.extra1)?,
            extra2: decode(&self.extra2)?,
            extra3: decode(&self.extra3)?,
        })
    }
}

fn default_render_size() -> u32 {
    1200
}

fn default_output_size() -> u32 {
    400
}

fn default_document_fraction() -> f64 {
    0.5
}

fn default_alignment() -> String {
    "MM".to_string()
}

fn default_true() -> bool {
    true
}

fn default_disc_fraction() -> f64 {
    0.8
}

fn default_angle() -> f64 {
    45.0
}

fn default_resolution() -> usize {
    DEFAULT_RESOLUTION
}

fn default_start_slot() -> PaletteSlot {
    PaletteSlot::Primary
}

fn default_end_slot() -> PaletteSlot {
    PaletteSlot::Extra1
}
