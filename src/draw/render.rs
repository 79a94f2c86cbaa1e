//! Cairo-based rendering functions for drawables.

use super::color::Color;
use super::shape::{Drawable, Shape};
use super::store::ObjectStore;
use super::style::FillRule;
use crate::geometry::{Point, Transform};
use crate::palette::ColorRemap;

/// Renders every renderable object of a store, in order.
///
/// Objects are drawn in registration order (first object = bottom layer).
pub fn render_store(
    ctx: &cairo::Context,
    store: &ObjectStore,
    transform: &Transform,
    remap: &dyn ColorRemap,
) {
    for drawable in store.iter() {
        render_drawable(ctx, drawable, transform, remap);
    }
}

/// Renders a single drawable to a Cairo context.
///
/// Paint colors are passed through `remap` first. Nothing is drawn when both
/// the remapped fill and stroke are fully transparent.
///
/// # Arguments
/// * `ctx` - Cairo drawing context to render to
/// * `drawable` - The object to render
/// * `transform` - Document to surface coordinate mapping
/// * `remap` - Color policy applied to fill and stroke
pub fn render_drawable(
    ctx: &cairo::Context,
    drawable: &Drawable,
    transform: &Transform,
    remap: &dyn ColorRemap,
) {
    let paint = drawable.style.resolve(remap);
    if paint.is_invisible() {
        return;
    }

    let _ = ctx.save();
    ctx.new_path();

    let traced = match &drawable.shape {
        Shape::Path { subpaths } => trace_path(ctx, subpaths, transform),
        Shape::Ellipse { center, radius } => trace_ellipse(ctx, *center, *radius, transform),
    };

    if traced {
        ctx.set_fill_rule(match drawable.style.fill_rule() {
            FillRule::NonZero => cairo::FillRule::Winding,
            FillRule::EvenOdd => cairo::FillRule::EvenOdd,
        });

        if !paint.fill.is_transparent() {
            set_source(ctx, paint.fill);
            let _ = ctx.fill_preserve();
        }

        let line_width = drawable.style.stroke_width() * transform.mean_scale();
        if !paint.stroke.is_transparent() && line_width > 0.0 {
            set_source(ctx, paint.stroke);
            ctx.set_line_width(line_width);
            ctx.set_line_join(cairo::LineJoin::Miter);
            let _ = ctx.stroke_preserve();
        }
    }

    ctx.new_path();
    let _ = ctx.restore();
}

pub(crate) fn set_source(ctx: &cairo::Context, color: Color) {
    let (r, g, b, a) = color.components();
    ctx.set_source_rgba(r, g, b, a);
}

/// Adds each subpath as a closed polygon. Subpaths with fewer than two
/// vertices are skipped. Returns whether anything was added.
fn trace_path(ctx: &cairo::Context, subpaths: &[Vec<Point>], transform: &Transform) -> bool {
    let mut traced = false;

    for subpath in subpaths.iter().filter(|sp| sp.len() >= 2) {
        let start = subpath[0].transform(transform);
        ctx.move_to(start.x, start.y);
        for point in &subpath[1..] {
            let p = point.transform(transform);
            ctx.line_to(p.x, p.y);
        }
        ctx.close_path();
        traced = true;
    }

    traced
}

/// Adds an ellipse using Cairo's arc with scaling.
fn trace_ellipse(ctx: &cairo::Context, center: Point, radius: Point, transform: &Transform) -> bool {
    let center = center.transform(transform);
    let radius = radius.scale(transform);
    if radius.x <= 0.0 || radius.y <= 0.0 {
        return false;
    }

    ctx.save().ok();
    ctx.translate(center.x, center.y);
    ctx.scale(radius.x, radius.y);
    ctx.arc(0.0, 0.0, 1.0, 0.0, 2.0 * std::f64::consts::PI);
    ctx.restore().ok();
    true
}
