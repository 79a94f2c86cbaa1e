//! RGBA color type, textual decoding and predefined color constants.

use std::fmt;
use thiserror::Error;

/// A color encoding that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot decode color '{0}'")]
pub struct ColorDecodeError(pub String);

/// Represents a straight (non-premultiplied) RGBA color with 8-bit channels.
///
/// # Examples
///
/// ```
/// use svgicon::draw::Color;
/// let red = Color::new(255, 0, 0, 255);
/// let teal = Color::parse("#08a", 255).unwrap();
/// assert_eq!(teal.to_hex(), "#0088aa");
/// assert_eq!(red.to_hex(), "#ff0000");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Alpha (0 = fully transparent, 255 = fully opaque)
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from three channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Gray color with the given intensity and alpha.
    pub const fn gray(intensity: u8, a: u8) -> Self {
        Self {
            r: intensity,
            g: intensity,
            b: intensity,
            a,
        }
    }

    /// Decodes a textual color.
    ///
    /// Supported encodings (case-insensitive):
    /// - names: `black`, `white`, `red`, `lime`, `green`, `blue`, `transparent`, `none`
    /// - hex: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`
    ///
    /// `alpha` is used when the encoding carries no alpha of its own.
    /// `transparent` and `none` always decode to alpha 0.
    pub fn parse(text: &str, alpha: u8) -> Result<Self, ColorDecodeError> {
        let lower = text.trim().to_ascii_lowercase();

        if let Some(hex) = lower.strip_prefix('#') {
            return parse_hex(hex, alpha).ok_or_else(|| ColorDecodeError(text.to_string()));
        }

        let named = match lower.as_str() {
            "black" => BLACK,
            "white" => WHITE,
            "red" => RED,
            "lime" => LIME,
            "green" => GREEN,
            "blue" => BLUE,
            "transparent" | "none" => return Ok(TRANSPARENT),
            _ => return Err(ColorDecodeError(text.to_string())),
        };
        Ok(named.with_alpha(alpha))
    }

    /// Returns the same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Multiplies the alpha by `factor` (clamped to 0.0..=1.0).
    pub fn fade(self, factor: f64) -> Self {
        self.with_alpha((self.a as f64 * factor.clamp(0.0, 1.0)).round() as u8)
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// True when all three color channels are equal (black, white and grays).
    pub fn is_gray(&self) -> bool {
        self.r == self.g && self.g == self.b
    }

    /// Linear blend: `factor` of `first` plus `1 - factor` of `second`, per channel.
    pub fn blend(first: Color, second: Color, factor: f64) -> Color {
        let factor = factor.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 * factor + b as f64 * (1.0 - factor)).round() as u8;
        Color {
            r: mix(first.r, second.r),
            g: mix(first.g, second.g),
            b: mix(first.b, second.b),
            a: mix(first.a, second.a),
        }
    }

    /// Six-digit lowercase hex of the RGB channels (alpha omitted).
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels as 0.0-1.0 floats, in the order cairo expects.
    pub fn components(&self) -> (f64, f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
            self.a as f64 / 255.0,
        )
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Color::rgb(r, g, b)
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Color::new(r, g, b, a)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} alpha:{}", self.to_hex(), self.a)
    }
}

fn parse_hex(hex: &str, alpha: u8) -> Option<Color> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    // single digit channels are doubled: "a" -> "aa"
    let short = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let long = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Color::new(short(0)?, short(1)?, short(2)?, alpha)),
        4 => Some(Color::new(short(0)?, short(1)?, short(2)?, short(3)?)),
        6 => Some(Color::new(long(0)?, long(2)?, long(4)?, alpha)),
        8 => Some(Color::new(long(0)?, long(2)?, long(4)?, long(6)?)),
        _ => None,
    }
}

// ============================================================================
// Predefined Color Constants
// ============================================================================

/// Predefined red color (255, 0, 0)
pub const RED: Color = Color::rgb(255, 0, 0);

/// Predefined lime color (0, 255, 0), the pure green channel
pub const LIME: Color = Color::rgb(0, 255, 0);

/// Predefined green color (0, 128, 0)
pub const GREEN: Color = Color::rgb(0, 128, 0);

/// Predefined blue color (0, 0, 255)
pub const BLUE: Color = Color::rgb(0, 0, 255);

/// Predefined white color (255, 255, 255)
pub const WHITE: Color = Color::rgb(255, 255, 255);

/// Predefined black color (0, 0, 0)
pub const BLACK: Color = Color::rgb(0, 0, 0);

/// Fully transparent color
pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);
