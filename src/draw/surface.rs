//! Pixel surface that drawables are rasterized onto.
//!
//! A [`RenderSurface`] wraps a Cairo ARGB32 image together with the color
//! remap applied to everything drawn on it. Drawing runs without Cairo
//! antialiasing: smooth edges come from rendering large and calling
//! [`RenderSurface::downsample`].

use super::color::{Color, TRANSPARENT};
use super::render::{render_drawable, render_store, set_source};
use super::shape::Drawable;
use super::store::ObjectStore;
use crate::geometry::{BoundingBox, Point, Transform};
use crate::palette::{BakedGradient, ColorRemap, Identity};
use log::debug;
use std::f64::consts::TAU;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid surface size {0}x{1}")]
    InvalidSize(u32, u32),

    #[error("cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("pixel buffer unavailable: {0}")]
    Borrow(#[from] cairo::BorrowError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("PNG encoding failed: {0}")]
    Png(#[from] cairo::IoError),
}

/// Cairo image plus the color policy used when drawing on it.
pub struct RenderSurface {
    surface: cairo::ImageSurface,
    remap: Rc<dyn ColorRemap>,
}

impl std::fmt::Debug for RenderSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSurface")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

impl RenderSurface {
    /// Creates a fully transparent surface.
    pub fn new(width: u32, height: u32, remap: impl ColorRemap + 'static) -> Result<Self, RenderError> {
        Self::with_shared_remap(width, height, Rc::new(remap))
    }

    /// Surface that paints colors unchanged.
    pub fn unmapped(width: u32, height: u32) -> Result<Self, RenderError> {
        Self::new(width, height, Identity)
    }

    fn with_shared_remap(width: u32, height: u32, remap: Rc<dyn ColorRemap>) -> Result<Self, RenderError> {
        let (w, h) = match (i32::try_from(width), i32::try_from(height)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
            _ => return Err(RenderError::InvalidSize(width, height)),
        };
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, w, h)?;
        Ok(Self { surface, remap })
    }

    pub fn width(&self) -> u32 {
        self.surface.width() as u32
    }

    pub fn height(&self) -> u32 {
        self.surface.height() as u32
    }

    /// The whole surface as a box at the origin.
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_size(self.width() as f64, self.height() as f64)
    }

    fn context(&self) -> Result<cairo::Context, RenderError> {
        let ctx = cairo::Context::new(&self.surface)?;
        ctx.set_antialias(cairo::Antialias::None);
        Ok(ctx)
    }

    /// Draws one object.
    pub fn draw(&self, drawable: &Drawable, transform: &Transform) -> Result<(), RenderError> {
        let ctx = self.context()?;
        render_drawable(&ctx, drawable, transform, self.remap.as_ref());
        ctx.status()?;
        Ok(())
    }

    /// Draws every renderable object of `store` in render order.
    pub fn draw_store(&self, store: &ObjectStore, transform: &Transform) -> Result<(), RenderError> {
        let ctx = self.context()?;
        render_store(&ctx, store, transform, self.remap.as_ref());
        ctx.status()?;
        debug!("Rendered {} objects onto {}x{} surface", store.len(), self.width(), self.height());
        Ok(())
    }

    /// Composites a gradient-filled disc over the current content.
    ///
    /// `gradient` is laid out over the disc's bounding square, so it should be
    /// baked for a `2 * radius` square. Pixels are inside the disc when their
    /// center is.
    pub fn fill_disc(&self, center: Point, radius: f64, gradient: &BakedGradient) -> Result<(), RenderError> {
        if radius <= 0.0 {
            return Ok(());
        }

        let ctx = self.context()?;
        ctx.arc(center.x, center.y, radius, 0.0, TAU);
        ctx.clip();

        // the group is the disc's bounding square with x running along the gradient axis
        ctx.push_group();
        ctx.set_operator(cairo::Operator::Source);
        ctx.translate(center.x - radius, center.y - radius);
        ctx.rotate(gradient.angle());
        let reach = 4.0 * radius;
        for (from, to, color) in gradient.bands(reach) {
            set_source(&ctx, color);
            ctx.rectangle(from, -reach, to - from, 2.0 * reach);
            ctx.fill()?;
        }
        ctx.pop_group_to_source()?;

        ctx.paint()?;
        Ok(())
    }

    /// Straight (non-premultiplied) color at a pixel, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.surface.flush();
        let offset = y as usize * self.surface.stride() as usize + x as usize * 4;
        let mut raw = [0u8; 4];
        self.surface
            .with_data(|data| raw.copy_from_slice(&data[offset..offset + 4]))
            .ok()?;
        Some(unpremultiply(u32::from_ne_bytes(raw)))
    }

    /// Straight RGBA bytes, row-major without padding.
    pub fn to_rgba(&self) -> Result<Vec<u8>, RenderError> {
        Ok(self
            .pixels()?
            .into_iter()
            .flat_map(|p| {
                let c = unpremultiply(p);
                [c.r, c.g, c.b, c.a]
            })
            .collect())
    }

    /// Smoothly scaled-down copy, sharing this surface's remap.
    ///
    /// Cairo's `Good` filter averages every source pixel under the footprint
    /// of a destination pixel, so uniform regions keep their exact color.
    pub fn downsample(&self, width: u32, height: u32) -> Result<RenderSurface, RenderError> {
        if width > self.width() || height > self.height() {
            return Err(RenderError::InvalidSize(width, height));
        }
        let target = Self::with_shared_remap(width, height, Rc::clone(&self.remap))?;

        let pattern = cairo::SurfacePattern::create(&self.surface);
        pattern.set_filter(cairo::Filter::Good);
        pattern.set_extend(cairo::Extend::Pad);

        let ctx = cairo::Context::new(&target.surface)?;
        ctx.scale(
            width as f64 / self.width() as f64,
            height as f64 / self.height() as f64,
        );
        ctx.set_source(&pattern)?;
        ctx.set_operator(cairo::Operator::Source);
        ctx.paint()?;
        ctx.status()?;

        Ok(target)
    }

    /// Writes the surface as PNG, downsampled to `size` first when given.
    pub fn save(&self, path: &Path, size: Option<(u32, u32)>) -> Result<(), RenderError> {
        if let Some((w, h)) = size.filter(|&s| s != (self.width(), self.height())) {
            return self.downsample(w, h)?.save(path, None);
        }

        let file = File::create(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        self.surface.write_to_png(&mut writer)?;
        debug!("Wrote {}x{} PNG to {}", self.width(), self.height(), path.display());
        Ok(())
    }

    /// Premultiplied ARGB pixels, tightly packed.
    fn pixels(&self) -> Result<Vec<u32>, RenderError> {
        self.surface.flush();
        let (width, height) = (self.width() as usize, self.height() as usize);
        let stride = self.surface.stride() as usize;
        let mut pixels = Vec::with_capacity(width * height);

        self.surface.with_data(|data| {
            for row in data.chunks(stride).take(height) {
                pixels.extend(
                    row[..width * 4]
                        .chunks_exact(4)
                        .map(|b| u32::from_ne_bytes([b[0], b[1], b[2], b[3]])),
                );
            }
        })?;

        Ok(pixels)
    }
}

fn unpremultiply(pixel: u32) -> Color {
    let a = pixel >> 24;
    if a == 0 {
        return TRANSPARENT;
    }
    let channel = |shift: u32| {
        let c = (pixel >> shift) & 0xff;
        ((c * 255 + a / 2) / a).min(255) as u8
    };
    Color::new(channel(16), channel(8), channel(0), a as u8)
}
