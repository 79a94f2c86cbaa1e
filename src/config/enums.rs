//! Configuration enum types.

use crate::draw::{Color, ColorDecodeError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Color specification - either a color string or RGB values.
///
/// # Examples
/// ```toml
/// # Named color or hex code
/// primary = "black"
/// secondary = "#f5f5f5"
///
/// # Custom RGB color (0-255 per component)
/// extra1 = [255, 128, 0]  # Orange
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Named color (black, white, red, lime, green, blue) or `#rgb` / `#rrggbb` hex code
    Name(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
}

impl ColorSpec {
    /// Converts the color specification to an opaque [`Color`].
    pub fn to_color(&self) -> Result<Color, ColorDecodeError> {
        match self {
            ColorSpec::Name(name) => Color::parse(name, 255),
            ColorSpec::Rgb(rgb) => Ok(Color::from(*rgb)),
        }
    }
}
