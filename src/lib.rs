//! Library exports for svgicon.
//!
//! Parses a small subset of SVG into drawables, rasterizes them with Cairo
//! and optionally re-styles the art with a named palette. The binary is a
//! thin wrapper around [`icon::render_icon`].

pub mod config;
pub mod document;
pub mod draw;
pub mod geometry;
pub mod icon;
pub mod palette;

pub use config::Config;
pub use document::{Document, ParseError, ParseOptions, parse_file, parse_str};
pub use draw::{Color, ObjectStore, RenderSurface};
pub use icon::{IconError, RenderOptions, render_document, render_icon};
pub use palette::{ColorRemap, Palette, PaletteResolver, PaletteTable};
