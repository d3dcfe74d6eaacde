//! Mapping between data space and pixel space.
//!
//! A pane pairs a pixel [`Viewport`] with the [`ModelRect`] of data visible
//! in it. The horizontal scale is `visible.width / viewport.width` data units
//! per pixel; vertical likewise. Renderers query a pane through the
//! [`RenderPane`] trait so alternative panes can be injected.

use trueno::Vector;

use crate::error::{ProtocolError, Result};
use crate::geometry::{ModelRect, Point, Viewport};

/// Coordinate space that buffer vertices are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Projection {
    /// Data coordinates, mapped through the visible rectangle.
    #[default]
    Model,
    /// Pixels relative to the viewport origin.
    Pixels,
}

/// Read access a renderer or grid generator needs from a pane.
pub trait RenderPane {
    /// Pixel rectangle the pane draws into.
    fn viewport(&self) -> Viewport;

    /// Data rectangle currently visible.
    fn visible_rect(&self) -> ModelRect;

    /// Active projection.
    fn projection(&self) -> Projection {
        Projection::Model
    }

    /// Data x shown at the viewport's left edge.
    fn offset_x(&self) -> f64 {
        self.visible_rect().left
    }

    /// Data y shown at the viewport's bottom edge.
    fn offset_y(&self) -> f64 {
        self.visible_rect().bottom
    }

    /// Horizontal data units per pixel. Non-finite for an empty viewport.
    fn scale_x(&self) -> f64 {
        self.visible_rect().width() / f64::from(self.viewport().width)
    }

    /// Vertical data units per pixel.
    fn scale_y(&self) -> f64 {
        self.visible_rect().height() / f64::from(self.viewport().height)
    }

    /// Data coordinates to absolute pixel coordinates.
    fn project(&self, x: f64, y: f64) -> (f64, f64) {
        let vp = self.viewport();
        (
            f64::from(vp.x) + (x - self.offset_x()) / self.scale_x(),
            f64::from(vp.y) + (y - self.offset_y()) / self.scale_y(),
        )
    }

    /// Project many x coordinates to absolute pixels.
    fn project_many_x(&self, xs: &[f64]) -> Vec<f32> {
        xs.iter().map(|&x| self.project(x, self.offset_y()).0 as f32).collect()
    }

    /// Project many y coordinates to absolute pixels.
    fn project_many_y(&self, ys: &[f64]) -> Vec<f32> {
        ys.iter().map(|&y| self.project(self.offset_x(), y).1 as f32).collect()
    }
}

/// Standard pane with a projection stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Pane {
    viewport: Viewport,
    visible: ModelRect,
    projections: Vec<Projection>,
}

impl Pane {
    /// Create a pane showing `visible` inside `viewport`.
    #[must_use]
    pub fn new(viewport: Viewport, visible: ModelRect) -> Self {
        Self { viewport, visible, projections: Vec::new() }
    }

    /// Replace the pixel rectangle.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Replace the visible data rectangle.
    pub fn set_visible_rect(&mut self, visible: ModelRect) {
        self.visible = visible;
    }

    /// Enter a projection. Nested entries are allowed.
    pub fn open(&mut self, projection: Projection) {
        self.projections.push(projection);
    }

    /// Leave the innermost projection.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::PaneNotOpen`] when nothing is open.
    pub fn close(&mut self) -> Result<()> {
        self.projections.pop().map(|_| ()).ok_or_else(|| ProtocolError::PaneNotOpen.into())
    }

    /// True while at least one projection is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.projections.is_empty()
    }

    /// Absolute pixel coordinates to data coordinates.
    #[must_use]
    pub fn unproject(&self, px: f64, py: f64) -> Point {
        Point::new(
            self.visible.left + (px - f64::from(self.viewport.x)) * self.scale_x(),
            self.visible.bottom + (py - f64::from(self.viewport.y)) * self.scale_y(),
        )
    }

    /// Pixel width to data width.
    #[must_use]
    pub fn unproject_width(&self, px: f64) -> f64 {
        px * self.scale_x()
    }

    /// Pixel height to data height.
    #[must_use]
    pub fn unproject_height(&self, px: f64) -> f64 {
        px * self.scale_y()
    }

    /// Zoom around a data point, which keeps its pixel position.
    ///
    /// `factor > 1` zooms in. Non-finite or non-positive factors are ignored.
    pub fn zoom_point(&mut self, x: f64, y: f64, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            log::warn!("zoom factor {factor} ignored");
            return;
        }
        let v = self.visible;
        self.visible = ModelRect::new(
            x - (x - v.left) / factor,
            y - (y - v.bottom) / factor,
            x + (v.right - x) / factor,
            y + (v.top - y) / factor,
        );
    }

    /// Move the visible rectangle by a data offset.
    pub fn scroll(&mut self, dx: f64, dy: f64) {
        self.visible.offset(dx, dy);
    }
}

impl RenderPane for Pane {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn visible_rect(&self) -> ModelRect {
        self.visible
    }

    fn projection(&self) -> Projection {
        self.projections.last().copied().unwrap_or_default()
    }

    fn project_many_x(&self, xs: &[f64]) -> Vec<f32> {
        project_batch(xs, self.visible.left, self.scale_x(), self.viewport.x)
    }

    fn project_many_y(&self, ys: &[f64]) -> Vec<f32> {
        project_batch(ys, self.visible.bottom, self.scale_y(), self.viewport.y)
    }
}

/// `origin + (v - offset) / scale` over a slice.
///
/// The subtraction stays in f64 so large genomic coordinates keep precision;
/// the scale and shift run through trueno's SIMD vectors.
fn project_batch(values: &[f64], offset: f64, scale: f64, origin: i32) -> Vec<f32> {
    let relative: Vec<f32> = values.iter().map(|&v| (v - offset) as f32).collect();
    let inv = (1.0 / scale) as f32;
    let origin = origin as f32;

    if relative.is_empty() {
        return relative;
    }
    let n = relative.len();
    let scaled = Vector::from_vec(relative.clone())
        .mul(&Vector::from_vec(vec![inv; n]))
        .and_then(|v| v.add(&Vector::from_vec(vec![origin; n])));

    match scaled {
        Ok(v) => v.as_slice().to_vec(),
        Err(_) => relative.iter().map(|r| r * inv + origin).collect(),
    }
}
