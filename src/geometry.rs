//! Geometry kernel: points, scale/translate transforms and bounding boxes.
//!
//! This module provides:
//! - [`Point`]: immutable 2D coordinate with translation arithmetic
//! - [`Transform`]: per-axis scale followed by a translation (no rotation/shear)
//! - [`BoundingBox`]: left/top/width/height box with anchored sub-box extraction

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;
use thiserror::Error;

/// Contract violations raised by geometry operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("sub-box fraction ({0}, {1}) must lie within 0.0..=1.0")]
    FractionOutOfRange(f64, f64),

    #[error("invalid alignment '{0}' (expected two letters: L/M/R then T/M/B)")]
    InvalidAlignment(String),
}

/// A 2D point in document or pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns a copy of this point with the transform applied.
    pub fn transform(self, transform: &Transform) -> Point {
        Point {
            x: self.x * transform.scale.0 + transform.translate.0,
            y: self.y * transform.scale.1 + transform.translate.1,
        }
    }

    /// Applies only the scale part; used for radii and other extents.
    pub fn scale(self, transform: &Transform) -> Point {
        Point {
            x: self.x * transform.scale.0,
            y: self.y * transform.scale.1,
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Coordinate transform: scale each axis, then translate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translate: (f64, f64),
    pub scale: (f64, f64),
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn new(translate: (f64, f64), scale: (f64, f64)) -> Self {
        Self { translate, scale }
    }

    pub fn identity() -> Self {
        Self {
            translate: (0.0, 0.0),
            scale: (1.0, 1.0),
        }
    }

    /// Builds the transform mapping a native canvas onto `destination`.
    ///
    /// Each axis is scaled independently, so the aspect ratio is only kept
    /// when the destination has the same proportions as the canvas.
    pub fn fit(canvas_size: (f64, f64), destination: &BoundingBox) -> Self {
        Self {
            translate: destination.offset(),
            scale: (
                destination.width / canvas_size.0,
                destination.height / canvas_size.1,
            ),
        }
    }

    /// Mean of the two scale factors, used to scale stroke widths.
    pub fn mean_scale(&self) -> f64 {
        (self.scale.0.abs() + self.scale.1.abs()) / 2.0
    }
}

/// Horizontal anchor of a sub-box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HorizontalAlign {
    Left,
    Mid,
    Right,
}

/// Vertical anchor of a sub-box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerticalAlign {
    Top,
    Mid,
    Bottom,
}

/// One of the nine anchor positions, written as two letters ("LT", "MM", "RB", ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Alignment {
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
}

impl Alignment {
    pub const CENTER: Alignment = Alignment {
        horizontal: HorizontalAlign::Mid,
        vertical: VerticalAlign::Mid,
    };

    fn factors(self) -> (f64, f64) {
        let h = match self.horizontal {
            HorizontalAlign::Left => 0.0,
            HorizontalAlign::Mid => 0.5,
            HorizontalAlign::Right => 1.0,
        };
        let v = match self.vertical {
            VerticalAlign::Top => 0.0,
            VerticalAlign::Mid => 0.5,
            VerticalAlign::Bottom => 1.0,
        };
        (h, v)
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::CENTER
    }
}

impl FromStr for Alignment {
    type Err = GeometryError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let upper = code.trim().to_ascii_uppercase();
        let mut chars = upper.chars();
        let (Some(h), Some(v), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(GeometryError::InvalidAlignment(code.to_string()));
        };

        let horizontal = match h {
            'L' => HorizontalAlign::Left,
            'M' => HorizontalAlign::Mid,
            'R' => HorizontalAlign::Right,
            _ => return Err(GeometryError::InvalidAlignment(code.to_string())),
        };
        let vertical = match v {
            'T' => VerticalAlign::Top,
            'M' => VerticalAlign::Mid,
            'B' => VerticalAlign::Bottom,
            _ => return Err(GeometryError::InvalidAlignment(code.to_string())),
        };

        Ok(Self {
            horizontal,
            vertical,
        })
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = match self.horizontal {
            HorizontalAlign::Left => 'L',
            HorizontalAlign::Mid => 'M',
            HorizontalAlign::Right => 'R',
        };
        let v = match self.vertical {
            VerticalAlign::Top => 'T',
            VerticalAlign::Mid => 'M',
            VerticalAlign::Bottom => 'B',
        };
        write!(f, "{h}{v}")
    }
}

/// Axis-aligned box in floating-point coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Box of the given size anchored at the origin.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn offset(&self) -> (f64, f64) {
        (self.left, self.top)
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Returns a smaller box covering `fraction` of this box's width and height,
    /// positioned inside it according to `alignment`.
    ///
    /// # Errors
    /// Returns [`GeometryError::FractionOutOfRange`] when either fraction exceeds
    /// 1.0 (or is negative / not finite). Values are never clamped.
    pub fn sub_bbox(
        &self,
        fraction: (f64, f64),
        alignment: Alignment,
    ) -> Result<BoundingBox, GeometryError> {
        let valid = |f: f64| f.is_finite() && (0.0..=1.0).contains(&f);
        if !valid(fraction.0) || !valid(fraction.1) {
            return Err(GeometryError::FractionOutOfRange(fraction.0, fraction.1));
        }

        let width = self.width * fraction.0;
        let height = self.height * fraction.1;
        let (h, v) = alignment.factors();

        Ok(BoundingBox {
            left: self.left + (self.width - width) * h,
            top: self.top + (self.height - height) * v,
            width,
            height,
        })
    }
}
