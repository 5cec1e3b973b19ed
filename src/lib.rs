//! # raster2d
//!
//! Precision-parameterized rasterizer for 2D computational-geometry scenes.
//!
//! raster2d renders vector scenes (triangles, polygons with holes, scalar
//! grids) into a raster image under a chosen numeric model: exact rational
//! arithmetic rounded at a configured order of magnitude, or `f64` with a
//! comparison tolerance. One generic pipeline serves both backends, so
//! geometry experiments render reproducibly under either.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use raster2d::prelude::*;
//!
//! let ctx = FloatPrecision::default();
//! let window = scenes::default_window(&ctx)?;
//! let mut store = EntityStore::new();
//! scenes::single_triangle(&mut store, &ctx)?;
//!
//! let renderer = Renderer::new(&store, &window, 150, 150, ctx)?;
//! let out = renderer.render();
//! PngEncoder::write_to_file(&out.framebuffer, "triangle.png")?;
//! ```
//!
//! ## Layers
//!
//! Draw order is data: an ordered list of [`render::Layer`] descriptors.
//! Later layers overwrite earlier paint at the same pixel; within a layer,
//! entities compose in insertion order.
//!
//! ## Shorelines
//!
//! [`shoreline`] reads GSHHG-layout binary ring streams and assembles
//! nested polygons (land containing lakes containing islands) from their
//! container references, surfacing recoverable problems as warning values.

#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/rasterization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types for the pixel buffer.
pub mod color;

/// Value-to-color mapping for scalar grids.
pub mod colormap;

/// Numeric precision backends.
pub mod precision;

/// Geometric primitives and predicates.
pub mod geom;

/// Scalar grids.
pub mod grid;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Pixel buffer.
pub mod framebuffer;

/// The viewing window and coordinate mapper.
pub mod window;

/// The entity store.
pub mod store;

/// The rasterizer.
pub mod render;

/// Output encoders (PNG).
pub mod output;

// ============================================================================
// Input Modules
// ============================================================================

/// Shoreline polygon loader.
pub mod shoreline;

/// Demonstration scene fixtures.
pub mod scenes;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for raster2d operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust,ignore
/// use raster2d::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::Rgba;
    pub use crate::colormap::{ColorMap, ValueRange};
    pub use crate::error::{Error, Result};
    pub use crate::framebuffer::Framebuffer;
    pub use crate::geom::{Aabb, Point, Polygon, Segment, SimplePolygon, Triangle, Vector};
    pub use crate::grid::ScalarGrid;
    pub use crate::output::PngEncoder;
    pub use crate::precision::{FloatPrecision, Precision, RationalPrecision, Rounding};
    pub use crate::render::{Layer, RenderOutput, RenderWarning, Renderer};
    pub use crate::scenes::{self, Scene};
    pub use crate::shoreline::{LoadWarning, RingFlags, ShorelineSet};
    pub use crate::store::{EntityId, EntityStore, PolygonColors, TriangleColors};
    pub use crate::window::{PixelMapper, Window};
}
