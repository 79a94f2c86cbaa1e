//! Icon rendering: parse a document, fit it into a square canvas and
//! rasterize it, optionally re-styled with a palette over a gradient disc.

use crate::document::{self, ParseError, ParseOptions};
use crate::draw::{ObjectStore, RenderError, RenderSurface};
use crate::geometry::{Alignment, GeometryError};
use crate::palette::{DEFAULT_RESOLUTION, LinearGradient, Palette, PaletteSlot};
use log::{debug, info, warn};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IconError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Gradient disc painted beneath the document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackgroundOptions {
    /// Disc diameter as a fraction of the canvas size
    pub disc_fraction: f64,
    pub angle_degrees: f64,
    /// Lookup table buckets
    pub resolution: usize,
    pub start: PaletteSlot,
    pub end: PaletteSlot,
}

impl Default for BackgroundOptions {
    fn default() -> Self {
        Self {
            disc_fraction: 0.8,
            angle_degrees: 45.0,
            resolution: DEFAULT_RESOLUTION,
            start: PaletteSlot::Primary,
            end: PaletteSlot::Extra1,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderOptions {
    /// Side of the square supersampled canvas
    pub render_size: u32,
    /// Side of the final, downsampled image
    pub output_size: u32,
    /// Share of the canvas the document occupies on each axis
    pub document_fraction: f64,
    /// Placement of the document inside the canvas
    pub alignment: Alignment,
    pub parse: ParseOptions,
    /// Only painted when a palette is given
    pub background: Option<BackgroundOptions>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            render_size: 1200,
            output_size: 400,
            document_fraction: 0.5,
            alignment: Alignment::CENTER,
            parse: ParseOptions::default(),
            background: Some(BackgroundOptions::default()),
        }
    }
}

/// Parses `path` and renders it at the final output size.
pub fn render_icon(
    path: &Path,
    options: &RenderOptions,
    palette: Option<&Palette>,
) -> Result<RenderSurface, IconError> {
    let document = document::parse_file(path, &options.parse)?;
    if !document.warnings.is_empty() {
        warn!(
            "{}: {} path problem(s) skipped",
            path.display(),
            document.warnings.len()
        );
    }

    let supersampled = render_document(&document.store, options, palette)?;
    let size = options.output_size.min(supersampled.width());
    let surface = supersampled.downsample(size, size)?;

    info!("Rendered {} at {}x{}", path.display(), size, size);
    Ok(surface)
}

/// Rasterizes a parsed store onto a fresh supersampled canvas.
///
/// Without a palette colors are painted unchanged and no background is drawn.
pub fn render_document(
    store: &ObjectStore,
    options: &RenderOptions,
    palette: Option<&Palette>,
) -> Result<RenderSurface, IconError> {
    let size = options.render_size.max(options.output_size);

    let surface = match palette {
        Some(palette) => RenderSurface::new(size, size, *palette)?,
        None => RenderSurface::unmapped(size, size)?,
    };
    let canvas = surface.bounds();

    if let (Some(palette), Some(background)) = (palette, options.background) {
        let radius = size as f64 * background.disc_fraction / 2.0;
        let gradient = LinearGradient::new(
            palette.slot(background.start),
            palette.slot(background.end),
            background.angle_degrees,
        )
        .bake(radius * 2.0, radius * 2.0, 1.0, background.resolution);
        surface.fill_disc(canvas.center(), radius, &gradient)?;
        debug!(
            "Painted background disc with radius {radius:.1} over {} gradient buckets",
            gradient.resolution()
        );
    }

    let fraction = options.document_fraction;
    let destination = canvas.sub_bbox((fraction, fraction), options.alignment)?;
    let transform = store.fitting_transform(&destination);
    debug!(
        "Fitting {:?} canvas into {:?}",
        store.canvas_size(),
        destination
    );

    surface.draw_store(store, &transform)?;
    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_str;
    use crate::draw::color::{BLACK, TRANSPARENT};
    use crate::palette::PaletteTable;

    const SQUARE: &str = r#"<svg version="1.1" viewBox="0 0 10 10"><path d="M0 0 H10 V10 H0 Z"/></svg>"#;

    fn store() -> ObjectStore {
        parse_str(SQUARE, &ParseOptions::default()).unwrap().store
    }

    fn options(render_size: u32) -> RenderOptions {
        RenderOptions {
            render_size,
            output_size: render_size,
            ..RenderOptions::default()
        }
    }

    #[test]
    fn document_is_centered_at_requested_fraction() {
        let surface = render_document(&store(), &options(100), None).unwrap();
        assert_eq!(surface.pixel(50, 50), Some(BLACK));
        assert_eq!(surface.pixel(26, 50), Some(BLACK));
        assert_eq!(surface.pixel(23, 50), Some(TRANSPARENT));
        assert_eq!(surface.pixel(77, 50), Some(TRANSPARENT));
    }

    #[test]
    fn palette_remaps_and_adds_disc() {
        let palette = PaletteTable::builtin().require("ocean").unwrap();
        let surface = render_document(&store(), &options(100), Some(&palette)).unwrap();
        assert_eq!(surface.pixel(50, 50), Some(palette.primary));
        // inside the disc but outside the document
        let ring = surface.pixel(50, 15).unwrap();
        assert_eq!(ring.a, 255);
        // outside the disc
        assert_eq!(surface.pixel(2, 2), Some(TRANSPARENT));
    }

    #[test]
    fn background_can_be_disabled() {
        let palette = PaletteTable::builtin().require("ocean").unwrap();
        let opts = RenderOptions {
            background: None,
            ..options(100)
        };
        let surface = render_document(&store(), &opts, Some(&palette)).unwrap();
        assert_eq!(surface.pixel(50, 15), Some(TRANSPARENT));
    }

    #[test]
    fn oversized_fraction_is_a_contract_violation() {
        let opts = RenderOptions {
            document_fraction: 1.5,
            ..options(50)
        };
        assert!(matches!(
            render_document(&store(), &opts, None),
            Err(IconError::Geometry(GeometryError::FractionOutOfRange(..)))
        ));
    }

    #[test]
    fn render_icon_downsamples_to_output_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("square.svg");
        std::fs::write(&path, SQUARE).unwrap();

        let opts = RenderOptions {
            render_size: 200,
            output_size: 40,
            ..RenderOptions::default()
        };
        let surface = render_icon(&path, &opts, None).unwrap();
        assert_eq!((surface.width(), surface.height()), (40, 40));
        assert_eq!(surface.pixel(20, 20), Some(BLACK));
        assert_eq!(surface.pixel(0, 0), Some(TRANSPARENT));
    }

    #[test]
    fn missing_file_is_a_parse_error() {
        let err = render_icon(Path::new("/nonexistent/x.svg"), &options(10), None).unwrap_err();
        assert!(matches!(err, IconError::Parse(ParseError::Io { .. })));
    }
}
