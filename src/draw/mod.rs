//! Drawing model and Cairo-based rasterization.
//!
//! This module defines the core drawing types produced by document parsing:
//! - [`Color`]: RGBA color representation with predefined color constants
//! - [`Style`]: Inherited fill/stroke paint with cascading merges
//! - [`Shape`] and [`Drawable`]: Paths and ellipses with their styles
//! - [`ObjectStore`]: Everything parsed from one document, in render order
//! - [`RenderSurface`]: Pixel buffer the store is rasterized onto

pub mod color;
pub mod render;
pub mod shape;
pub mod store;
pub mod style;
pub mod surface;

// Re-export commonly used types at module level
pub use color::{Color, ColorDecodeError};
pub use render::{render_drawable, render_store};
pub use shape::{Drawable, PathBuilder, Shape};
pub use store::{ObjectStore, StoreError};
pub use style::{DecodePolicy, Declarations, FillRule, Paint, Style, StyleError};
pub use surface::{RenderError, RenderSurface};

