//! Linear gradients evaluated through a precomputed lookup table.

use crate::draw::Color;

/// Default number of lookup buckets along the gradient axis.
pub const DEFAULT_RESOLUTION: usize = 100;

/// Two-color gradient along a direction given in degrees (0 = left to right).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearGradient {
    pub start: Color,
    pub end: Color,
    pub angle_degrees: f64,
}

impl LinearGradient {
    pub fn new(start: Color, end: Color, angle_degrees: f64) -> Self {
        Self {
            start,
            end,
            angle_degrees,
        }
    }

    /// Precomputes colors for a `width` × `height` area.
    ///
    /// Colors follow a smooth sigmoid across the projected axis; `sharpness`
    /// steepens it (1.0 is the usual soft blend). `resolution` is the number
    /// of buckets, clamped to at least 1.
    pub fn bake(&self, width: f64, height: f64, sharpness: f64, resolution: usize) -> BakedGradient {
        let resolution = resolution.max(1);
        let (sin, cos) = self.angle_degrees.to_radians().sin_cos();
        let extent = width * cos + height * sin;

        if extent.abs() < f64::EPSILON {
            return BakedGradient {
                cos,
                sin,
                extent: 0.0,
                table: vec![Color::blend(self.start, self.end, 0.5)],
            };
        }

        let k = 2.0 * sharpness / extent;
        let table = (0..=resolution)
            .map(|i| {
                let r = i as f64 * extent / resolution as f64;
                let adjusted = k * (r - extent / 2.0);
                let factor = (1.0 + adjusted / (1.0 + adjusted * adjusted).sqrt()) / 2.0;
                Color::blend(self.end, self.start, factor)
            })
            .collect();

        BakedGradient {
            cos,
            sin,
            extent,
            table,
        }
    }
}

/// Gradient with its lookup table filled in.
#[derive(Clone, Debug)]
pub struct BakedGradient {
    cos: f64,
    sin: f64,
    extent: f64,
    table: Vec<Color>,
}

impl BakedGradient {
    /// Direction of the gradient axis in radians.
    pub fn angle(&self) -> f64 {
        self.sin.atan2(self.cos)
    }

    /// Stretches of the gradient axis that share one table color, as
    /// `(from, to, color)` distances along the axis.
    ///
    /// A point takes the color of the bucket its projection rounds to. The
    /// first and last stretches run out to `reach` so that everything beyond
    /// the baked area takes the end colors.
    pub fn bands(&self, reach: f64) -> Vec<(f64, f64, Color)> {
        let last = self.table.len() - 1;
        if last == 0 {
            return vec![(-reach, reach, self.table[0])];
        }

        let step = self.extent / last as f64;
        let outward = reach * step.signum();
        self.table
            .iter()
            .enumerate()
            .map(|(i, &color)| {
                let from = if i == 0 { -outward } else { (i as f64 - 0.5) * step };
                let to = if i == last { outward } else { (i as f64 + 0.5) * step };
                (from, to, color)
            })
            .collect()
    }

    pub fn resolution(&self) -> usize {
        self.table.len() - 1
    }
}
