//! Software backend drawing into a [`Framebuffer`].

use crate::color::Rgba;
use crate::error::Result;
use crate::font::scale_for_height;
use crate::framebuffer::Framebuffer;
use crate::geometry::Viewport;
use crate::output::PngEncoder;

use super::buffer::{DrawMode, RenderState};
use super::primitives::{
    clip_box, clip_segment, draw_glyph_run, draw_line, draw_line_aa, fill_circle, fill_triangle, PixelSink,
};
use super::target::{segments, triangulate, RenderTarget, TextStyle};

#[derive(Debug, Clone, Copy)]
struct SavedState {
    scissor: Option<Viewport>,
    blend: bool,
}

/// Rasterizing render target.
///
/// Bottom-left pixel coordinates are flipped onto the framebuffer's top-down
/// rows. Pixels outside the viewport or scissor rectangle are discarded.
///
/// # Example
///
/// ```
/// use gridwork::color::Rgba;
/// use gridwork::render::RasterTarget;
///
/// let mut target = RasterTarget::new(64, 64).unwrap();
/// target.clear(Rgba::WHITE);
/// assert_eq!(target.pixel(0, 0), Some(Rgba::WHITE));
/// ```
#[derive(Debug, Clone)]
pub struct RasterTarget {
    fb: Framebuffer,
    viewport: Viewport,
    scissor: Option<Viewport>,
    blend: bool,
    saved: Vec<SavedState>,
}

impl RasterTarget {
    /// Target over a new framebuffer; the viewport covers the whole surface.
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Self::from_framebuffer(Framebuffer::new(width, height)?))
    }

    /// Target drawing into an existing framebuffer.
    #[must_use]
    pub fn from_framebuffer(fb: Framebuffer) -> Self {
        let viewport = Viewport::new(0, 0, fb.width() as i32, fb.height() as i32);
        Self { fb, viewport, scissor: None, blend: false, saved: Vec::new() }
    }

    /// Fill the whole surface, ignoring viewport and scissor.
    pub fn clear(&mut self, color: Rgba) {
        self.fb.clear(color);
    }

    /// Pixel at bottom-left coordinates.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let row = self.fb.height().checked_sub(1)?.checked_sub(y)?;
        self.fb.get_pixel(x, row)
    }

    /// Underlying framebuffer.
    #[must_use]
    pub const fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    /// Take the framebuffer.
    #[must_use]
    pub fn into_framebuffer(self) -> Framebuffer {
        self.fb
    }

    /// Encode the surface as PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        PngEncoder::to_bytes(&self.fb)
    }

    fn sink(&mut self, blend: bool) -> Surface<'_> {
        let clip = match self.scissor {
            Some(s) => self.viewport.intersect(&s),
            None => self.viewport,
        };
        let clip = clip.intersect(&Viewport::new(0, 0, self.fb.width() as i32, self.fb.height() as i32));
        Surface { fb: &mut self.fb, clip, blend: blend || self.blend }
    }
}

/// Framebuffer view with clipping and y-flip applied.
struct Surface<'a> {
    fb: &'a mut Framebuffer,
    clip: Viewport,
    blend: bool,
}

impl PixelSink for Surface<'_> {
    fn put(&mut self, x: i32, y: i32, color: Rgba, coverage: f32) {
        if !self.clip.contains(x, y) || x < 0 || y < 0 {
            return;
        }
        let Some(row) = (self.fb.height() as i32 - 1).checked_sub(y).filter(|r| *r >= 0) else {
            return;
        };
        if self.blend || coverage < 1.0 {
            self.fb.blend_pixel(x as u32, row as u32, color, coverage);
        } else {
            self.fb.set_pixel(x as u32, row as u32, color);
        }
    }

    fn bounds(&self) -> Option<Viewport> {
        Some(self.clip)
    }
}

impl RenderTarget for RasterTarget {
    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn set_scissor(&mut self, rect: Option<Viewport>) {
        self.scissor = rect;
    }

    fn set_blend(&mut self, enabled: bool) {
        self.blend = enabled;
    }

    fn push_state(&mut self) {
        self.saved.push(SavedState { scissor: self.scissor, blend: self.blend });
    }

    fn pop_state(&mut self) {
        if let Some(s) = self.saved.pop() {
            self.scissor = s.scissor;
            self.blend = s.blend;
        }
    }

    fn draw_primitive(
        &mut self,
        mode: DrawMode,
        vertices: &[[f32; 3]],
        colors: &[Rgba],
        _tex_coords: &[[f32; 2]],
        state: &RenderState,
    ) {
        let color_of = |i: usize| colors.get(i).copied().unwrap_or(state.color);
        let width = state.line_width.round().max(1.0) as u32;
        let mut surface = self.sink(state.blend);

        match mode {
            DrawMode::Points => {
                let radius = (state.point_size / 2.0) as i32;
                for (i, v) in vertices.iter().enumerate() {
                    fill_circle(&mut surface, v[0].floor() as i32, v[1].floor() as i32, radius, color_of(i));
                }
            }
            DrawMode::Lines | DrawMode::LineStrip | DrawMode::LineLoop => {
                let (min, max) = clip_box(surface.clip, width.min(1024) as i32 + 1);
                for [a, b] in segments(mode, vertices.len()) {
                    let (p, q) = (vertices[a], vertices[b]);
                    let Some((p, q)) = clip_segment(
                        [f64::from(p[0]), f64::from(p[1])],
                        [f64::from(q[0]), f64::from(q[1])],
                        min,
                        max,
                    ) else {
                        continue;
                    };
                    if state.line_smooth && width == 1 {
                        draw_line_aa(&mut surface, p[0] as f32, p[1] as f32, q[0] as f32, q[1] as f32, color_of(a));
                    } else {
                        let (x0, y0) = (p[0].floor() as i32, p[1].floor() as i32);
                        let (x1, y1) = (q[0].floor() as i32, q[1].floor() as i32);
                        draw_line(&mut surface, x0, y0, x1, y1, color_of(a), width);
                    }
                }
            }
            DrawMode::Triangles | DrawMode::TriangleStrip | DrawMode::TriangleFan | DrawMode::Quads => {
                for [a, b, c] in triangulate(mode, vertices.len()) {
                    let p = [vertices[a], vertices[b], vertices[c]].map(|v| [v[0], v[1]]);
                    fill_triangle(&mut surface, p, [color_of(a), color_of(b), color_of(c)]);
                }
            }
        }
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str, style: &TextStyle) {
        let scale = scale_for_height(f64::from(style.size_px));
        let mut surface = self.sink(false);
        draw_glyph_run(&mut surface, x, y, text, scale, style.rotation_deg, style.color);
    }
}
