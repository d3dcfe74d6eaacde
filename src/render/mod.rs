//! Buffered primitive rendering.
//!
//! Geometry is collected into a [`GeometryBuffer`] (or through the
//! immediate-mode calls on [`PrimitiveRenderer`]) and submitted to a
//! [`RenderTarget`]. Two targets are provided:
//!
//! - [`RasterTarget`]: software rasterizer over a framebuffer, PNG output
//! - [`SvgTarget`]: vector output for print; no clipping
//!
//! # Algorithms
//!
//! - Bresenham's line and Wu's anti-aliased line
//! - Edge-function triangle fill with Gouraud color interpolation
//! - Midpoint filled circle for points
//!
//! # References
//!
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
//! - Bresenham, J. E. (1965). "Algorithm for computer control of a digital plotter."

mod buffer;
mod primitives;
mod raster;
mod renderer;
mod svg;
mod target;

pub use buffer::{DrawMode, GeometryBuffer, MatrixMode, RenderState};
pub use primitives::{clip_segment, draw_glyph_run, draw_line, draw_line_aa, fill_circle, fill_triangle, PixelSink};
pub use raster::RasterTarget;
pub use renderer::{PrimitiveRenderer, TextScope};
pub use svg::SvgTarget;
pub use target::{segments, triangulate, RenderTarget, TextStyle};
