//! Palettes and the color remapping policy applied while rendering.
//!
//! A [`Palette`] names five colors. Rendering never consults global state: the
//! caller resolves a palette (see [`PaletteResolver`]) and passes it, as a
//! [`ColorRemap`], into the render call.

pub mod gradient;

pub use gradient::{BakedGradient, DEFAULT_RESOLUTION, LinearGradient};

use crate::draw::Color;
use crate::draw::color::{BLUE, LIME, RED};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("unknown palette '{0}'")]
    Unknown(String),

    #[error("palette '{palette}': {source}")]
    Color {
        palette: String,
        #[source]
        source: crate::draw::color::ColorDecodeError,
    },
}

/// Maps a drawn color to the color actually painted.
pub trait ColorRemap {
    fn remap(&self, color: Color) -> Color;
}

impl<F> ColorRemap for F
where
    F: Fn(Color) -> Color,
{
    fn remap(&self, color: Color) -> Color {
        self(color)
    }
}

/// Remap that paints every color as-is.
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl ColorRemap for Identity {
    fn remap(&self, color: Color) -> Color {
        color
    }
}

/// Named color slot of a palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum PaletteSlot {
    Primary,
    Secondary,
    Extra1,
    Extra2,
    Extra3,
}

/// Five named colors that source art is re-styled into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub primary: Color,
    pub secondary: Color,
    pub extra1: Color,
    pub extra2: Color,
    pub extra3: Color,
}

impl Palette {
    pub fn slot(&self, slot: PaletteSlot) -> Color {
        match slot {
            PaletteSlot::Primary => self.primary,
            PaletteSlot::Secondary => self.secondary,
            PaletteSlot::Extra1 => self.extra1,
            PaletteSlot::Extra2 => self.extra2,
            PaletteSlot::Extra3 => self.extra3,
        }
    }
}

/// Reference icon policy:
/// - transparent colors are left alone
/// - grays blend from `primary` (black) to `secondary` (white), keeping alpha
/// - pure red, green and blue become `extra1`, `extra2` and `extra3`
/// - anything else passes through
impl ColorRemap for Palette {
    fn remap(&self, color: Color) -> Color {
        if color.is_transparent() {
            return color;
        }

        if color.is_gray() {
            let factor = color.r as f64 / 255.0;
            return Color::blend(self.secondary, self.primary, factor).with_alpha(color.a);
        }

        let opaque = color.with_alpha(255);
        let replacement = if opaque == RED {
            self.extra1
        } else if opaque == LIME {
            self.extra2
        } else if opaque == BLUE {
            self.extra3
        } else {
            return color;
        };
        replacement.with_alpha(color.a)
    }
}

/// Resolves palette names to palettes.
pub trait PaletteResolver {
    fn resolve(&self, name: &str) -> Option<Palette>;
}

/// Name → palette table, seeded with the built-in palettes.
#[derive(Clone, Debug)]
pub struct PaletteTable {
    palettes: HashMap<String, Palette>,
}

impl Default for PaletteTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PaletteTable {
    pub fn empty() -> Self {
        Self {
            palettes: HashMap::new(),
        }
    }

    pub fn builtin() -> Self {
        let mut table = Self::empty();
        table.insert(
            "ruby",
            Palette {
                primary: Color::rgb(239, 83, 80),
                secondary: Color::rgb(255, 255, 255),
                extra1: Color::rgb(255, 207, 0),
                extra2: Color::rgb(102, 187, 106),
                extra3: Color::rgb(66, 165, 245),
            },
        );
        table.insert(
            "ocean",
            Palette {
                primary: Color::rgb(30, 136, 229),
                secondary: Color::rgb(255, 255, 255),
                extra1: Color::rgb(255, 202, 40),
                extra2: Color::rgb(38, 166, 154),
                extra3: Color::rgb(171, 71, 188),
            },
        );
        table.insert(
            "graphite",
            Palette {
                primary: Color::rgb(55, 71, 79),
                secondary: Color::rgb(236, 239, 241),
                extra1: Color::rgb(255, 112, 67),
                extra2: Color::rgb(156, 204, 101),
                extra3: Color::rgb(79, 195, 247),
            },
        );
        table
    }

    /// Adds or replaces a palette.
    pub fn insert(&mut self, name: &str, palette: Palette) {
        self.palettes.insert(name.to_ascii_lowercase(), palette);
    }

    /// Sorted palette names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.palettes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Like [`PaletteResolver::resolve`] but failing with [`PaletteError::Unknown`].
    pub fn require(&self, name: &str) -> Result<Palette, PaletteError> {
        self.resolve(name)
            .ok_or_else(|| PaletteError::Unknown(name.to_string()))
    }
}

impl PaletteResolver for PaletteTable {
    fn resolve(&self, name: &str) -> Option<Palette> {
        self.palettes.get(&name.to_ascii_lowercase()).copied()
    }
}
