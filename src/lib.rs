//! # Gridwork
//!
//! Axis grids with "nice" steps and backend-agnostic primitive rendering for
//! zoomable data viewers such as genome browsers.
//!
//! - **Grid generation**: steps of 1, 2 or 5 times a power of ten, chosen so a
//!   grid cell stays within a pixel window at the current zoom
//! - **Display alignment**: ticks land on round *displayed* numbers for
//!   one-based and minus-one-based coordinate systems
//! - **Buffered rendering**: geometry batches with per-vertex attributes,
//!   submitted through a pane's data-to-pixel projection
//! - **Backends**: software raster (PNG) and SVG
//!
//! ## Quick Start
//!
//! ```rust
//! use gridwork::prelude::*;
//!
//! let pane = Pane::new(Viewport::new(0, 0, 500, 200), ModelRect::new(0.0, 0.0, 97.0, 40.0));
//! let mut grid = GridGenerator::new();
//! grid.set_cell_limits(20.0, 50.0);
//! grid.generate(&pane);
//! assert_eq!(grid.step(Axis::X), 5.0);
//!
//! let mut target = RasterTarget::new(500, 200)?;
//! target.clear(Rgba::WHITE);
//! let mut renderer = PrimitiveRenderer::new(target);
//! GridOverlay::default().draw(&mut renderer, &grid, &pane, &BitmapFont::new(1))?;
//! let png = renderer.target().to_png()?;
//! assert!(!png.is_empty());
//! # Ok::<(), gridwork::Error>(())
//! ```
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade: step
//! selection at `trace`, per-axis grid results and config loading at `debug`,
//! ignored input at `warn`. Install any logger to see them.

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// RGBA colors.
pub mod color;

/// Pixel and data-space rectangles.
pub mod geometry;

/// YAML configuration.
pub mod config;

// ============================================================================
// Grid Modules
// ============================================================================

pub mod grid;

/// Data-to-pixel projection.
pub mod pane;

/// Font metrics and text layout.
pub mod font;

// ============================================================================
// Rendering Modules
// ============================================================================

/// RGBA pixel surface.
pub mod framebuffer;

pub mod render;

/// Output encoders (PNG, SVG).
pub mod output;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for gridwork operations.
pub mod error;

pub use error::{Error, ProtocolError, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits.
///
/// ```rust
/// use gridwork::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::Rgba;
    pub use crate::config::GridConfig;
    pub use crate::error::{Error, ProtocolError, Result};
    pub use crate::font::{BitmapFont, FontMetrics, HAlign, TextBox, Truncation, VAlign};
    pub use crate::framebuffer::Framebuffer;
    pub use crate::geometry::{ModelRect, Point, Viewport};
    pub use crate::grid::{Alignment, Axis, GridGenerator, GridOverlay, StepSpec, TickSequence};
    pub use crate::pane::{Pane, Projection, RenderPane};
    pub use crate::render::{
        DrawMode, GeometryBuffer, PrimitiveRenderer, RasterTarget, RenderState, RenderTarget, SvgTarget,
    };
}

// ============================================================================
// Re-exports
// ============================================================================

/// Re-export trueno for direct access to SIMD vectors.
pub use trueno;
