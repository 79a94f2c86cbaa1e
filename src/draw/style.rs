//! Paint style with cascading attribute merges.

use super::color::{BLACK, Color, ColorDecodeError, TRANSPARENT};
use crate::palette::ColorRemap;
use log::warn;
use thiserror::Error;

/// A style declaration that could not be applied.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StyleError {
    #[error(transparent)]
    Color(#[from] ColorDecodeError),

    #[error("invalid value '{value}' for '{property}'")]
    Number { property: String, value: String },
}

/// How undecodable declarations are handled while merging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Bad colors become transparent and bad numbers are ignored, with a warning.
    #[default]
    Lenient,
    /// Any bad declaration fails the merge.
    Strict,
}

/// Polygon fill rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// Style-related declarations found on one node.
///
/// Only explicitly present declarations are `Some`; everything else is inherited.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Declarations {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub opacity: Option<String>,
    pub fill_opacity: Option<String>,
    pub stroke_opacity: Option<String>,
    pub stroke_width: Option<String>,
    pub fill_rule: Option<String>,
}

impl Declarations {
    /// Collects declarations from attribute pairs.
    ///
    /// An inline `style="fill:#fff;stroke:none"` attribute is applied after the
    /// presentation attributes, so its declarations win.
    pub fn from_attributes<'a>(attributes: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut decls = Self::default();
        let mut inline = None;

        for (name, value) in attributes {
            if name == "style" {
                inline = Some(value);
            } else {
                decls.set(name, value);
            }
        }

        if let Some(inline) = inline {
            for declaration in inline.split(';') {
                if let Some((name, value)) = declaration.split_once(':') {
                    decls.set(name.trim(), value.trim());
                }
            }
        }

        decls
    }

    fn set(&mut self, name: &str, value: &str) {
        let slot = match name {
            "fill" => &mut self.fill,
            "stroke" => &mut self.stroke,
            "opacity" => &mut self.opacity,
            "fill-opacity" => &mut self.fill_opacity,
            "stroke-opacity" => &mut self.stroke_opacity,
            "stroke-width" => &mut self.stroke_width,
            "fill-rule" => &mut self.fill_rule,
            _ => return,
        };
        *slot = Some(value.to_string());
    }
}

/// Fill and stroke paint after opacity resolution and color remapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paint {
    pub fill: Color,
    pub stroke: Color,
}

impl Paint {
    pub fn is_invisible(&self) -> bool {
        self.fill.is_transparent() && self.stroke.is_transparent()
    }
}

/// Inherited drawing style.
///
/// Paint colors, per-paint opacities, stroke width and fill rule are inherited
/// verbatim unless a node overrides them. Group `opacity` multiplies down the
/// inheritance chain.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    fill_paint: Color,
    fill_opacity: f64,
    stroke_paint: Color,
    stroke_opacity: f64,
    opacity: f64,
    stroke_width: f64,
    fill_rule: FillRule,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill_paint: BLACK,
            fill_opacity: 1.0,
            stroke_paint: TRANSPARENT,
            stroke_opacity: 1.0,
            opacity: 1.0,
            stroke_width: 1.0,
            fill_rule: FillRule::NonZero,
        }
    }
}

impl Style {
    /// Style with explicit fill and stroke colors and default everything else.
    pub fn with_colors(fill: Color, stroke: Color) -> Self {
        Self {
            fill_paint: fill,
            stroke_paint: stroke,
            ..Self::default()
        }
    }

    /// Effective fill color, opacities applied.
    pub fn fill(&self) -> Color {
        self.fill_paint.fade(self.fill_opacity * self.opacity)
    }

    /// Effective stroke color, opacities applied.
    pub fn stroke(&self) -> Color {
        self.stroke_paint.fade(self.stroke_opacity * self.opacity)
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    /// Returns a copy of this style with `decls` merged on top.
    pub fn merged(&self, decls: &Declarations, policy: DecodePolicy) -> Result<Style, StyleError> {
        let mut next = self.clone();

        if let Some(value) = &decls.opacity {
            next.opacity *= parse_unit(value, "opacity", policy)?.unwrap_or(1.0);
        }
        if let Some(value) = &decls.fill_opacity {
            if let Some(o) = parse_unit(value, "fill-opacity", policy)? {
                next.fill_opacity = o;
            }
        }
        if let Some(value) = &decls.stroke_opacity {
            if let Some(o) = parse_unit(value, "stroke-opacity", policy)? {
                next.stroke_opacity = o;
            }
        }
        if let Some(value) = &decls.fill {
            next.fill_paint = parse_paint(value, policy)?;
        }
        if let Some(value) = &decls.stroke {
            next.stroke_paint = parse_paint(value, policy)?;
        }
        if let Some(value) = &decls.stroke_width {
            match leading_number(value).filter(|w| *w >= 0.0) {
                Some(width) => next.stroke_width = width,
                None => reject("stroke-width", value, policy)?,
            }
        }
        if let Some(value) = &decls.fill_rule {
            match value.trim() {
                "nonzero" => next.fill_rule = FillRule::NonZero,
                "evenodd" => next.fill_rule = FillRule::EvenOdd,
                _ => reject("fill-rule", value, policy)?,
            }
        }

        Ok(next)
    }

    /// Resolves both paints through a color remap. The style itself is untouched.
    pub fn resolve(&self, remap: &dyn ColorRemap) -> Paint {
        Paint {
            fill: remap.remap(self.fill()),
            stroke: remap.remap(self.stroke()),
        }
    }
}

fn parse_paint(value: &str, policy: DecodePolicy) -> Result<Color, StyleError> {
    match Color::parse(value, 255) {
        Ok(color) => Ok(color),
        Err(err) if policy == DecodePolicy::Lenient => {
            warn!("{err}, using transparent");
            Ok(TRANSPARENT)
        }
        Err(err) => Err(err.into()),
    }
}

fn parse_unit(value: &str, property: &str, policy: DecodePolicy) -> Result<Option<f64>, StyleError> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v.clamp(0.0, 1.0))),
        _ => reject(property, value, policy).map(|_| None),
    }
}

fn reject(property: &str, value: &str, policy: DecodePolicy) -> Result<(), StyleError> {
    match policy {
        DecodePolicy::Lenient => {
            warn!("Ignoring invalid {property} '{value}'");
            Ok(())
        }
        DecodePolicy::Strict => Err(StyleError::Number {
            property: property.to_string(),
            value: value.to_string(),
        }),
    }
}

/// First number of a length value, ignoring any unit suffix ("2px" -> 2.0).
fn leading_number(value: &str) -> Option<f64> {
    crate::document::path::parse_coords(value).first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{RED, WHITE};
    use crate::palette::Identity;

    fn decls(pairs: &[(&str, &str)]) -> Declarations {
        Declarations::from_attributes(pairs.iter().copied())
    }

    #[test]
    fn defaults_fill_black_without_stroke() {
        let style = Style::default();
        assert_eq!(style.fill(), BLACK);
        assert!(style.stroke().is_transparent());
    }

    #[test]
    fn child_overrides_only_what_it_declares() {
        let parent = Style::default()
            .merged(&decls(&[("fill", "#fff"), ("stroke", "red")]), DecodePolicy::Strict)
            .unwrap();
        let child = parent
            .merged(&decls(&[("stroke", "#000")]), DecodePolicy::Strict)
            .unwrap();
        assert_eq!(child.fill(), WHITE);
        assert_eq!(child.stroke(), BLACK);
        assert_eq!(parent.stroke(), RED);
    }

    #[test]
    fn opacity_multiplies_down_the_chain() {
        let group = Style::default()
            .merged(&decls(&[("opacity", "0.5")]), DecodePolicy::Strict)
            .unwrap();
        let nested = group
            .merged(&decls(&[("opacity", "0.5"), ("fill", "white")]), DecodePolicy::Strict)
            .unwrap();
        assert_eq!(group.fill().a, 128);
        assert_eq!(nested.fill(), WHITE.with_alpha(64));
    }

    #[test]
    fn fill_opacity_is_inherited() {
        let parent = Style::default()
            .merged(&decls(&[("fill-opacity", "0.2")]), DecodePolicy::Strict)
            .unwrap();
        let child = parent
            .merged(&decls(&[("fill", "#ff0000")]), DecodePolicy::Strict)
            .unwrap();
        assert_eq!(child.fill(), RED.with_alpha(51));
    }

    #[test]
    fn inline_style_wins_over_attributes() {
        let d = decls(&[("style", "fill: #00f; stroke-width:3"), ("fill", "red")]);
        assert_eq!(d.fill.as_deref(), Some("#00f"));
        assert_eq!(d.stroke_width.as_deref(), Some("3"));
    }

    #[test]
    fn bad_color_is_transparent_when_lenient_and_fails_when_strict() {
        let d = decls(&[("fill", "url(#grad)")]);
        let lenient = Style::default().merged(&d, DecodePolicy::Lenient).unwrap();
        assert!(lenient.fill().is_transparent());
        assert!(matches!(
            Style::default().merged(&d, DecodePolicy::Strict),
            Err(StyleError::Color(_))
        ));
    }

    #[test]
    fn stroke_width_and_fill_rule_are_parsed() {
        let style = Style::default()
            .merged(
                &decls(&[("stroke-width", "2.5px"), ("fill-rule", "evenodd")]),
                DecodePolicy::Strict,
            )
            .unwrap();
        assert_eq!(style.stroke_width(), 2.5);
        assert_eq!(style.fill_rule(), FillRule::EvenOdd);
    }

    #[test]
    fn resolve_does_not_touch_style() {
        let style = Style::with_colors(RED, BLACK);
        let paint = style.resolve(&|_c: Color| WHITE);
        assert_eq!(paint.fill, WHITE);
        assert_eq!(style.fill(), RED);
        assert_eq!(style.resolve(&Identity).fill, RED);
    }
}
