//! Immediate and retained drawing against a [`RenderTarget`].

use crate::color::Rgba;
use crate::error::{ProtocolError, Result};
use crate::font::{layout_text, FontMetrics, HAlign, TextBox, Truncation, VAlign};
use crate::geometry::Viewport;
use crate::pane::{Projection, RenderPane};

use super::buffer::{DrawMode, GeometryBuffer, RenderState};
use super::target::{RenderTarget, TextStyle};

/// Submits geometry and text to a backend.
///
/// Holds the current viewport, a stack of clipping rectangles, the state
/// applied to immediate-mode batches, and the immediate-mode buffer itself.
///
/// # Example
///
/// ```
/// use gridwork::color::Rgba;
/// use gridwork::render::{DrawMode, PrimitiveRenderer, RasterTarget};
///
/// let mut r = PrimitiveRenderer::new(RasterTarget::new(50, 50).unwrap());
/// r.set_viewport(0, 0, 50, 50);
/// r.set_color(Rgba::RED);
/// r.rect(10.0, 10.0, 20.0, 20.0).unwrap();
/// assert_eq!(r.target().pixel(15, 15), Some(Rgba::RED));
/// ```
#[derive(Debug)]
pub struct PrimitiveRenderer<T: RenderTarget> {
    target: T,
    viewport: Viewport,
    clips: Vec<Viewport>,
    state: RenderState,
    immediate: GeometryBuffer,
    projected: Vec<[f32; 3]>,
}

impl<T: RenderTarget> PrimitiveRenderer<T> {
    /// Renderer drawing into `target`.
    pub fn new(target: T) -> Self {
        Self {
            target,
            viewport: Viewport::default(),
            clips: Vec::new(),
            state: RenderState::default(),
            immediate: GeometryBuffer::new(),
            projected: Vec::new(),
        }
    }

    /// Backend.
    pub const fn target(&self) -> &T {
        &self.target
    }

    /// Mutable backend access.
    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Take the backend.
    pub fn into_target(self) -> T {
        self.target
    }

    /// Bind the pixel rectangle subsequent drawing goes to.
    pub fn set_viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.viewport = Viewport::new(x, y, width, height);
        self.target.set_viewport(self.viewport);
    }

    /// Current viewport.
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    // ------------------------------------------------------------------
    // Clipping
    // ------------------------------------------------------------------

    /// Restrict drawing to `rect` intersected with any enclosing clip.
    ///
    /// On backends without clipping the rectangle is tracked but has no
    /// visual effect.
    pub fn begin_clipping_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let rect = Viewport::new(x, y, width, height);
        let clip = match self.clips.last() {
            Some(outer) => outer.intersect(&rect),
            None => rect,
        };
        self.clips.push(clip);
        if self.target.supports_clipping() {
            self.target.set_scissor(Some(clip));
        } else {
            log::debug!("clip {clip:?} requested on a backend without clipping");
        }
    }

    /// Restore the enclosing clip.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::ClipUnderflow`] without a matching begin.
    pub fn end_clipping_rect(&mut self) -> Result<()> {
        self.clips.pop().ok_or(ProtocolError::ClipUnderflow)?;
        self.target.set_scissor(self.clips.last().copied());
        Ok(())
    }

    /// Innermost clip rectangle.
    pub fn clip_rect(&self) -> Option<Viewport> {
        self.clips.last().copied()
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    /// State applied to immediate-mode batches.
    pub const fn state(&self) -> &RenderState {
        &self.state
    }

    /// Replace the immediate-mode state.
    pub fn set_state(&mut self, state: RenderState) {
        self.state = state;
    }

    /// Set the immediate-mode color.
    pub fn set_color(&mut self, color: Rgba) {
        self.state.color = color;
    }

    /// Set the immediate-mode line width.
    pub fn set_line_width(&mut self, width: f32) {
        self.state.line_width = width;
    }

    /// Toggle blending for immediate-mode batches.
    pub fn enable_blend(&mut self, enabled: bool) {
        self.state.blend = enabled;
    }

    // ------------------------------------------------------------------
    // Retained buffers
    // ------------------------------------------------------------------

    /// Draw a finalized buffer, projecting through `pane`.
    ///
    /// Model-projected vertices map through the pane's visible rectangle;
    /// pixel-projected ones are offset by the pane's viewport origin.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::RenderOpenBuffer`] if `buffer` has not been ended.
    pub fn render<P: RenderPane + ?Sized>(&mut self, pane: &P, buffer: &GeometryBuffer) -> Result<()> {
        ensure_finalized(buffer)?;
        let vp = pane.viewport();
        self.projected.clear();
        match pane.projection() {
            Projection::Model => {
                self.projected.extend(buffer.vertices().iter().map(|v| {
                    let (x, y) = pane.project(v[0], v[1]);
                    [x as f32, y as f32, v[2] as f32]
                }));
            }
            Projection::Pixels => {
                let (ox, oy) = (f64::from(vp.x), f64::from(vp.y));
                self.projected
                    .extend(buffer.vertices().iter().map(|v| [(v[0] + ox) as f32, (v[1] + oy) as f32, v[2] as f32]));
            }
        }
        self.submit(buffer);
        Ok(())
    }

    /// Draw a finalized buffer whose vertices are pixels relative to the
    /// current viewport.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::RenderOpenBuffer`] if `buffer` has not been ended.
    pub fn render_pixels(&mut self, buffer: &GeometryBuffer) -> Result<()> {
        ensure_finalized(buffer)?;
        let (ox, oy) = (f64::from(self.viewport.x), f64::from(self.viewport.y));
        self.projected.clear();
        self.projected
            .extend(buffer.vertices().iter().map(|v| [(v[0] + ox) as f32, (v[1] + oy) as f32, v[2] as f32]));
        self.submit(buffer);
        Ok(())
    }

    fn submit(&mut self, buffer: &GeometryBuffer) {
        log::trace!("submit {:?}: {} vertices", buffer.mode(), self.projected.len());
        self.target.draw_primitive(
            buffer.mode(),
            &self.projected,
            buffer.colors(),
            buffer.tex_coords(),
            buffer.state(),
        );
    }

    // ------------------------------------------------------------------
    // Immediate mode
    // ------------------------------------------------------------------

    /// Start an immediate-mode batch in viewport pixels.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::NestedBegin`] if a batch is already open.
    pub fn begin(&mut self, mode: DrawMode) -> Result<()> {
        self.immediate.begin(mode)?;
        self.immediate.set_state(self.state);
        Ok(())
    }

    /// Add a vertex to the open batch.
    pub fn vertex(&mut self, x: f64, y: f64) {
        self.immediate.vertex2(x, y);
    }

    /// Add a per-vertex color to the open batch.
    pub fn color(&mut self, color: Rgba) {
        self.immediate.color(color);
    }

    /// Add a texture coordinate to the open batch.
    pub fn tex_coord(&mut self, u: f32, v: f32) {
        self.immediate.tex_coord(u, v);
    }

    /// Close and draw the open batch.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::EndWithoutBegin`] without an open batch, or an
    /// attribute mismatch in the batch.
    pub fn end(&mut self) -> Result<()> {
        self.immediate.end()?;
        let batch = std::mem::take(&mut self.immediate);
        let drawn = self.render_pixels(&batch);
        self.immediate = batch;
        self.immediate.reset();
        drawn
    }

    /// True while an immediate-mode batch is open.
    pub fn is_accumulating(&self) -> bool {
        self.immediate.is_accumulating()
    }

    /// Filled axis-aligned rectangle between two corners, in viewport pixels.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::NestedBegin`] if a batch is already open.
    pub fn rect(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()> {
        self.begin(DrawMode::Quads)?;
        self.vertex(x1, y1);
        self.vertex(x2, y1);
        self.vertex(x2, y2);
        self.vertex(x1, y2);
        self.end()
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Enter text mode with `font` and `color`.
    ///
    /// Blending is enabled on the backend until the returned scope is dropped,
    /// which restores the previous backend state.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::TextWhileAccumulating`] while a geometry batch is open.
    pub fn begin_text<'f, F: FontMetrics + ?Sized>(
        &mut self,
        font: &'f F,
        color: Rgba,
    ) -> Result<TextScope<'_, 'f, T, F>> {
        if self.is_accumulating() {
            return Err(ProtocolError::TextWhileAccumulating.into());
        }
        self.target.push_state();
        self.target.set_blend(true);
        Ok(TextScope { renderer: self, font, color })
    }
}

fn ensure_finalized(buffer: &GeometryBuffer) -> Result<()> {
    if buffer.is_finalized() {
        Ok(())
    } else {
        Err(ProtocolError::RenderOpenBuffer.into())
    }
}

/// Active text mode; leaving it restores the backend state.
///
/// Only one scope can exist per renderer at a time, and no geometry can be
/// submitted while it is alive.
#[derive(Debug)]
pub struct TextScope<'r, 'f, T: RenderTarget, F: FontMetrics + ?Sized> {
    renderer: &'r mut PrimitiveRenderer<T>,
    font: &'f F,
    color: Rgba,
}

impl<T: RenderTarget, F: FontMetrics + ?Sized> TextScope<'_, '_, T, F> {
    /// Change the text color.
    pub fn set_color(&mut self, color: Rgba) {
        self.color = color;
    }

    /// Font in use.
    pub fn font(&self) -> &F {
        self.font
    }

    /// Draw `text` with its baseline starting at viewport pixel `(x, y)`.
    pub fn write_text(&mut self, x: f64, y: f64, text: &str, rotation: f64) {
        let vp = self.renderer.viewport;
        let style = TextStyle {
            color: self.color,
            size_px: self.font.text_height() as f32,
            rotation_deg: rotation as f32,
        };
        self.renderer.target.draw_text(
            (x + f64::from(vp.x)) as f32,
            (y + f64::from(vp.y)) as f32,
            text,
            &style,
        );
    }

    /// Draw `text` aligned and optionally truncated inside a viewport-pixel box.
    pub fn write_text_in_rect(
        &mut self,
        bounds: &TextBox,
        text: &str,
        halign: HAlign,
        valign: VAlign,
        truncation: Truncation,
        rotation: f64,
    ) {
        let layout = layout_text(self.font, bounds, text, halign, valign, truncation, rotation);
        if !layout.text.is_empty() {
            self.write_text(layout.x, layout.y, &layout.text, layout.rotation);
        }
    }

    /// Leave text mode.
    pub fn finish(self) {}
}

impl<T: RenderTarget, F: FontMetrics + ?Sized> Drop for TextScope<'_, '_, T, F> {
    fn drop(&mut self) {
        self.renderer.target.pop_state();
    }
}
