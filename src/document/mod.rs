//! SVG-subset document parsing into an [`ObjectStore`].
//!
//! Recognized elements: `svg`, `g`, `defs`, `path`, `ellipse`, `circle`,
//! `rect` and `use`. Anything else is skipped along with its subtree.
//! Presentation attributes and inline `style` declarations cascade from
//! containers to their children; children of `defs` are registered for
//! `use` lookups but never rendered.

pub mod path;
mod walk;

use crate::draw::shape::{Drawable, PathBuilder, Shape};
use crate::draw::store::{ObjectStore, StoreError};
use crate::draw::style::{DecodePolicy, Declarations, Style, StyleError};
use crate::geometry::Point;
use log::{debug, warn};
use path::PathWarning;
use roxmltree::Node;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walk::{Event, Visit};

/// Only document version the parser was written against.
pub const SUPPORTED_VERSION: &str = "1.1";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed document: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("malformed document: root element is <{0}>, expected <svg>")]
    NotSvg(String),

    #[error("malformed document: root <svg> has no viewBox")]
    MissingCanvasSize,

    #[error("malformed document: invalid viewBox '{0}'")]
    InvalidCanvasSize(String),

    #[error("<use> element without href")]
    MissingReference,

    #[error("<use> references unknown id '{0}'")]
    UnknownReference(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("<{element}>: invalid {attribute} '{value}'")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
    },

    #[error("<{element}>: {source}")]
    Style {
        element: String,
        #[source]
        source: StyleError,
    },
}

/// Parser settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Handling of colors and numbers that fail to decode
    pub policy: DecodePolicy,
}

/// Result of a successful parse.
#[derive(Debug)]
pub struct Document {
    pub store: ObjectStore,
    /// Path data problems that were skipped over
    pub warnings: Vec<PathWarning>,
}

/// Reads and parses the document at `path`.
pub fn parse_file(path: &Path, options: &ParseOptions) -> Result<Document, ParseError> {
    let text = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Parsing {}", path.display());
    parse_str(&text, options)
}

/// Parses a document held in memory.
pub fn parse_str(text: &str, options: &ParseOptions) -> Result<Document, ParseError> {
    let xml = roxmltree::Document::parse_with_options(
        text,
        roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        },
    )?;

    let root = xml.root_element();
    let tag = root.tag_name().name();
    if tag != "svg" {
        return Err(ParseError::NotSvg(tag.to_string()));
    }

    match root.attribute("version") {
        Some(SUPPORTED_VERSION) => {}
        Some(other) => warn!("Document version {other} may not parse as expected (expected {SUPPORTED_VERSION})"),
        None => warn!("Document has no version attribute (expected {SUPPORTED_VERSION})"),
    }

    let canvas_size = canvas_size(root)?;
    let mut builder = DocumentBuilder {
        store: ObjectStore::new(canvas_size),
        frames: Vec::new(),
        warnings: Vec::new(),
        policy: options.policy,
    };

    walk::walk(root, |event| builder.handle(event))?;

    debug!(
        "Parsed {}x{} canvas with {} renderable objects",
        canvas_size.0,
        canvas_size.1,
        builder.store.len()
    );

    Ok(Document {
        store: builder.store,
        warnings: builder.warnings,
    })
}

/// Canvas size from the root `viewBox` (`min-x min-y width height`).
fn canvas_size(root: Node) -> Result<(u32, u32), ParseError> {
    let raw = root
        .attribute("viewBox")
        .ok_or(ParseError::MissingCanvasSize)?;
    let invalid = || ParseError::InvalidCanvasSize(raw.to_string());

    let parts: Vec<&str> = raw
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .collect();
    if parts.len() != 4 {
        return Err(invalid());
    }

    let dimension = |s: &str| -> Result<u32, ParseError> {
        let value: f64 = s.parse().map_err(|_| invalid())?;
        if !value.is_finite() || value < 1.0 || value > u32::MAX as f64 {
            return Err(invalid());
        }
        Ok(value.round() as u32)
    };

    Ok((dimension(parts[2])?, dimension(parts[3])?))
}

/// Style context of one open container.
struct Frame {
    style: Style,
    /// False inside `defs`
    rendering: bool,
}

struct DocumentBuilder {
    store: ObjectStore,
    frames: Vec<Frame>,
    warnings: Vec<PathWarning>,
    policy: DecodePolicy,
}

impl DocumentBuilder {
    fn handle(&mut self, event: Event) -> Result<Visit, ParseError> {
        let node = match event {
            Event::Enter(node) => node,
            Event::Exit(_) => {
                self.frames.pop();
                return Ok(Visit::Descend);
            }
        };

        let name = node.tag_name().name();
        match name {
            "svg" | "g" | "defs" => {
                let style = self.inherited().merged(&declarations(node), self.policy);
                let style = style.map_err(|source| style_error(name, source))?;
                let rendering = name != "defs" && self.rendering();
                self.frames.push(Frame { style, rendering });
                Ok(Visit::Descend)
            }
            "path" | "ellipse" | "circle" | "rect" => {
                let drawable = self.drawable(node)?;
                let render = self.rendering();
                self.store.insert(drawable, render)?;
                Ok(Visit::SkipChildren)
            }
            "use" => {
                let drawable = self.reference(node)?;
                let render = self.rendering();
                self.store.insert(drawable, render)?;
                Ok(Visit::SkipChildren)
            }
            other => {
                debug!("Skipping unsupported element <{other}>");
                Ok(Visit::SkipChildren)
            }
        }
    }

    fn inherited(&self) -> Style {
        self.frames
            .last()
            .map(|frame| frame.style.clone())
            .unwrap_or_default()
    }

    fn rendering(&self) -> bool {
        self.frames.last().is_none_or(|frame| frame.rendering)
    }

    fn style_for(&self, node: Node) -> Result<Style, ParseError> {
        self.inherited()
            .merged(&declarations(node), self.policy)
            .map_err(|source| style_error(node.tag_name().name(), source))
    }

    fn drawable(&mut self, node: Node) -> Result<Drawable, ParseError> {
        let style = self.style_for(node)?;
        let id = element_id(node);

        let drawable = match node.tag_name().name() {
            "ellipse" => Drawable::ellipse(
                id,
                style,
                Point::new(number(node, "cx")?, number(node, "cy")?),
                Point::new(number(node, "rx")?, number(node, "ry")?),
            ),
            "circle" => {
                let r = number(node, "r")?;
                Drawable::ellipse(
                    id,
                    style,
                    Point::new(number(node, "cx")?, number(node, "cy")?),
                    Point::new(r, r),
                )
            }
            "rect" => {
                let (x, y) = (number(node, "x")?, number(node, "y")?);
                let (w, h) = (number(node, "width")?, number(node, "height")?);
                let corners = [(x, y), (x + w, y), (x + w, y + h), (x, y + h), (x, y)];
                let subpath = corners.into_iter().map(Point::from).collect();
                Drawable::new(id, style, Shape::Path {
                    subpaths: vec![subpath],
                })
            }
            _ => {
                let mut builder = PathBuilder::new();
                match node.attribute("d") {
                    Some(data) => self.warnings.extend(path::interpret(data, &mut builder)),
                    None => warn!("<path> without path data"),
                }
                Drawable::new(id, style, builder.finish())
            }
        };

        Ok(drawable)
    }

    /// Clones the referenced object, restyled with this node's declarations.
    fn reference(&self, node: Node) -> Result<Drawable, ParseError> {
        let target = node
            .attributes()
            .find(|attr| attr.name() == "href")
            .map(|attr| attr.value().trim().trim_start_matches('#'))
            .filter(|target| !target.is_empty())
            .ok_or(ParseError::MissingReference)?;

        let source = self
            .store
            .get(target)
            .ok_or_else(|| ParseError::UnknownReference(target.to_string()))?;

        let style = source
            .style
            .merged(&declarations(node), self.policy)
            .map_err(|source| style_error("use", source))?;

        Ok(Drawable::new(element_id(node), style, source.shape.clone()))
    }
}

fn declarations(node: Node) -> Declarations {
    Declarations::from_attributes(node.attributes().map(|attr| (attr.name(), attr.value())))
}

fn element_id(node: Node) -> Option<String> {
    node.attribute("id")
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

fn style_error(element: &str, source: StyleError) -> ParseError {
    ParseError::Style {
        element: element.to_string(),
        source,
    }
}

/// Numeric attribute; absent attributes read as zero.
fn number(node: Node, attribute: &str) -> Result<f64, ParseError> {
    let Some(value) = node.attribute(attribute) else {
        return Ok(0.0);
    };
    path::parse_coords(value)
        .first()
        .copied()
        .ok_or_else(|| ParseError::InvalidAttribute {
            element: node.tag_name().name().to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLACK, RED, WHITE};

    fn parse(body: &str) -> Result<Document, ParseError> {
        let text = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" version="1.1" viewBox="0 0 100 50">{body}</svg>"#
        );
        parse_str(&text, &ParseOptions::default())
    }

    fn ids(store: &ObjectStore) -> Vec<Option<String>> {
        store.iter().map(|d| d.id.clone()).collect()
    }

    #[test]
    fn canvas_size_comes_from_view_box() {
        let doc = parse("").unwrap();
        assert_eq!(doc.store.canvas_size(), (100, 50));
        assert!(doc.store.is_empty());
    }

    #[test]
    fn malformed_roots_are_rejected() {
        let opts = ParseOptions::default();
        assert!(matches!(parse_str("<svg", &opts), Err(ParseError::Xml(_))));
        assert!(matches!(
            parse_str("<html/>", &opts),
            Err(ParseError::NotSvg(tag)) if tag == "html"
        ));
        assert!(matches!(
            parse_str("<svg/>", &opts),
            Err(ParseError::MissingCanvasSize)
        ));
        assert!(matches!(
            parse_str(r#"<svg viewBox="0 0 10"/>"#, &opts),
            Err(ParseError::InvalidCanvasSize(_))
        ));
        assert!(matches!(
            parse_str(r#"<svg viewBox="0 0 -4 10"/>"#, &opts),
            Err(ParseError::InvalidCanvasSize(_))
        ));
    }

    #[test]
    fn elements_register_in_document_order() {
        let doc = parse(
            r#"<path id="a" d="M0 0 L10 0 L10 10 Z"/>
               <g><ellipse id="b" cx="5" cy="5" rx="2" ry="3"/></g>
               <circle cx="1" cy="1" r="4"/>
               <rect id="c" x="1" y="2" width="3" height="4"/>"#,
        )
        .unwrap();
        assert_eq!(
            ids(&doc.store),
            vec![Some("a".into()), Some("b".into()), None, Some("c".into())]
        );

        let circle = doc.store.iter().nth(2).unwrap();
        assert_eq!(
            circle.shape,
            Shape::Ellipse {
                center: Point::new(1.0, 1.0),
                radius: Point::new(4.0, 4.0)
            }
        );

        let Shape::Path { subpaths } = &doc.store.get("c").unwrap().shape else {
            panic!("rect should be a path");
        };
        assert_eq!(subpaths[0].len(), 5);
        assert_eq!(subpaths[0][2], Point::new(4.0, 6.0));
    }

    #[test]
    fn styles_cascade_through_groups() {
        let doc = parse(
            r##"<g fill="#ff0000" stroke="white">
                 <g style="stroke:#000">
                   <path id="inner" d="M0 0 L1 1"/>
                 </g>
                 <path id="outer" fill="white" d="M0 0 L1 1"/>
               </g>
               <path id="plain" d="M0 0 L1 1"/>"##,
        )
        .unwrap();

        let inner = &doc.store.get("inner").unwrap().style;
        assert_eq!(inner.fill(), RED);
        assert_eq!(inner.stroke(), BLACK);

        let outer = &doc.store.get("outer").unwrap().style;
        assert_eq!(outer.fill(), WHITE);
        assert_eq!(outer.stroke(), WHITE);

        let plain = &doc.store.get("plain").unwrap().style;
        assert_eq!(plain.fill(), BLACK);
        assert!(plain.stroke().is_transparent());
    }

    #[test]
    fn defs_are_registered_but_not_rendered() {
        let doc = parse(
            r##"<defs><path id="shape" fill="red" d="M0 0 L5 0 L5 5 Z"/></defs>
                <use id="copy" xlink:href="#shape" stroke="white"/>
                <use href="#shape"/>"##,
        )
        .unwrap();

        assert_eq!(ids(&doc.store), vec![Some("copy".into()), None]);
        let copy = doc.store.get("copy").unwrap();
        let original = doc.store.get("shape").unwrap();
        assert_eq!(copy.shape, original.shape);
        assert_eq!(copy.style.fill(), RED);
        assert_eq!(copy.style.stroke(), WHITE);
        assert!(original.style.stroke().is_transparent());
    }

    #[test]
    fn unknown_reference_fails() {
        let err = parse(r##"<use xlink:href="#missing"/>"##).unwrap_err();
        assert!(matches!(err, ParseError::UnknownReference(id) if id == "missing"));

        let err = parse(r#"<use/>"#).unwrap_err();
        assert!(matches!(err, ParseError::MissingReference));
    }

    #[test]
    fn forward_references_are_unknown() {
        let err = parse(r##"<use href="#later"/><path id="later" d="M0 0 L1 1"/>"##).unwrap_err();
        assert!(matches!(err, ParseError::UnknownReference(_)));
    }

    #[test]
    fn duplicate_ids_fail() {
        let err = parse(r#"<path id="x" d="M0 0 L1 1"/><circle id="x" r="1"/>"#).unwrap_err();
        assert!(matches!(err, ParseError::Store(StoreError::DuplicateId(id)) if id == "x"));
    }

    #[test]
    fn unsupported_elements_and_their_children_are_skipped() {
        let doc = parse(
            r#"<text>hi<path id="hidden" d="M0 0 L1 1"/></text>
               <path id="shown" d="M0 0 L1 1"/>"#,
        )
        .unwrap();
        assert_eq!(ids(&doc.store), vec![Some("shown".into())]);
        assert!(doc.store.get("hidden").is_none());
    }

    #[test]
    fn path_warnings_are_collected() {
        let doc = parse(r#"<path d="M0 0 A 1 1 0 0 0 5 5 L 3 3"/>"#).unwrap();
        assert_eq!(doc.warnings, vec![PathWarning::UnsupportedCommand('A')]);
        assert_eq!(doc.store.len(), 1);
    }

    #[test]
    fn strict_policy_rejects_bad_colors() {
        let text = r#"<svg viewBox="0 0 10 10"><path fill="url(#g)" d="M0 0 L1 1"/></svg>"#;
        let strict = ParseOptions {
            policy: DecodePolicy::Strict,
        };
        assert!(matches!(
            parse_str(text, &strict),
            Err(ParseError::Style { element, .. }) if element == "path"
        ));

        let lenient = parse_str(text, &ParseOptions::default()).unwrap();
        assert!(lenient.store.iter().next().unwrap().style.fill().is_transparent());
    }

    #[test]
    fn invalid_numeric_attribute_fails() {
        let err = parse(r#"<circle r="big"/>"#).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidAttribute { attribute, .. } if attribute == "r"
        ));
    }
}
