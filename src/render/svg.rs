//! Vector backend producing SVG, for print output.
//!
//! Clipping is not applied: [`RenderTarget::supports_clipping`] reports
//! `false` and scissor requests are ignored, so clipped content is emitted in
//! full.

use crate::color::Rgba;
use crate::geometry::Viewport;
use crate::output::{SvgElement, SvgEncoder};

use super::buffer::{DrawMode, RenderState};
use super::target::{segments, triangulate, RenderTarget, TextStyle};

/// Render target that records primitives as SVG elements.
#[derive(Debug, Clone)]
pub struct SvgTarget {
    encoder: SvgEncoder,
    height: f32,
    depth: usize,
}

impl SvgTarget {
    /// Target for a `width` x `height` document.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { encoder: SvgEncoder::new(width, height), height: height as f32, depth: 0 }
    }

    /// Set the document background, `None` for transparent.
    #[must_use]
    pub fn with_background(mut self, color: Option<Rgba>) -> Self {
        self.encoder = self.encoder.background(color);
        self
    }

    /// Recorded document.
    #[must_use]
    pub const fn encoder(&self) -> &SvgEncoder {
        &self.encoder
    }

    /// Take the recorded document.
    #[must_use]
    pub fn into_encoder(self) -> SvgEncoder {
        self.encoder
    }

    /// Render the SVG text.
    #[must_use]
    pub fn render(&self) -> String {
        self.encoder.render()
    }

    fn flip(&self, v: [f32; 3]) -> (f32, f32) {
        (v[0], self.height - v[1])
    }
}

impl RenderTarget for SvgTarget {
    fn set_viewport(&mut self, _viewport: Viewport) {}

    fn set_scissor(&mut self, rect: Option<Viewport>) {
        if rect.is_some() {
            log::trace!("svg target ignores scissor {rect:?}");
        }
    }

    fn supports_clipping(&self) -> bool {
        false
    }

    fn set_blend(&mut self, _enabled: bool) {}

    fn push_state(&mut self) {
        self.depth += 1;
    }

    fn pop_state(&mut self) {
        self.depth = self.depth.saturating_sub(1);
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
        let stroke_width = state.line_width.max(0.0);

        match mode {
            DrawMode::Points => {
                for (i, v) in vertices.iter().enumerate() {
                    let (cx, cy) = self.flip(*v);
                    let r = (state.point_size / 2.0).max(0.5);
                    self.encoder.add_element(SvgElement::Circle { cx, cy, r, fill: color_of(i) });
                }
            }
            DrawMode::Lines => {
                for [a, b] in segments(mode, vertices.len()) {
                    let ((x1, y1), (x2, y2)) = (self.flip(vertices[a]), self.flip(vertices[b]));
                    self.encoder.add_element(SvgElement::Line {
                        x1,
                        y1,
                        x2,
                        y2,
                        stroke: color_of(a),
                        stroke_width,
                    });
                }
            }
            DrawMode::LineStrip | DrawMode::LineLoop => {
                if mode.primitive_count(vertices.len()) == 0 {
                    return;
                }
                let points = vertices.iter().map(|v| self.flip(*v)).collect();
                self.encoder.add_element(SvgElement::Polyline {
                    points,
                    stroke: color_of(0),
                    stroke_width,
                    closed: mode == DrawMode::LineLoop,
                });
            }
            DrawMode::Triangles | DrawMode::TriangleStrip | DrawMode::TriangleFan | DrawMode::Quads => {
                for [a, b, c] in triangulate(mode, vertices.len()) {
                    let points = vec![self.flip(vertices[a]), self.flip(vertices[b]), self.flip(vertices[c])];
                    self.encoder.add_element(SvgElement::Polygon { points, fill: color_of(a) });
                }
            }
        }
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str, style: &TextStyle) {
        let (x, y) = self.flip([x, y, 0.0]);
        self.encoder.add_element(SvgElement::Text {
            x,
            y,
            text: text.to_owned(),
            font_size: style.size_px,
            fill: style.color,
            // SVG rotates clockwise in its y-down space
            rotation: -style.rotation_deg,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_flipped() {
        let mut t = SvgTarget::new(100, 50);
        t.draw_primitive(
            DrawMode::Lines,
            &[[0.0, 0.0, 0.0], [10.0, 40.0, 0.0]],
            &[],
            &[],
            &RenderState::default(),
        );
        assert_eq!(
            t.encoder().elements()[0],
            SvgElement::Line { x1: 0.0, y1: 50.0, x2: 10.0, y2: 10.0, stroke: Rgba::BLACK, stroke_width: 1.0 }
        );
    }

    #[test]
    fn test_quads_become_triangles() {
        let mut t = SvgTarget::new(10, 10);
        t.draw_primitive(
            DrawMode::Quads,
            &[[0.0, 0.0, 0.0], [5.0, 0.0, 0.0], [5.0, 5.0, 0.0], [0.0, 5.0, 0.0]],
            &[Rgba::RED; 4],
            &[],
            &RenderState::default(),
        );
        assert_eq!(t.encoder().elements().len(), 2);
        assert!(t.render().contains(r#"fill="rgb(255,0,0)""#));
    }

    #[test]
    fn test_line_loop_closed() {
        let mut t = SvgTarget::new(10, 10);
        let verts = [[0.0, 0.0, 0.0], [5.0, 0.0, 0.0], [5.0, 5.0, 0.0]];
        t.draw_primitive(DrawMode::LineLoop, &verts, &[], &[], &RenderState::default());
        t.draw_primitive(DrawMode::LineStrip, &verts[..1], &[], &[], &RenderState::default());
        assert_eq!(t.encoder().elements().len(), 1);
        assert!(matches!(t.encoder().elements()[0], SvgElement::Polyline { closed: true, .. }));
    }

    #[test]
    fn test_clipping_unsupported() {
        let mut t = SvgTarget::new(10, 10);
        assert!(!t.supports_clipping());
        t.set_scissor(Some(Viewport::new(0, 0, 1, 1)));
        t.draw_primitive(DrawMode::Points, &[[8.0, 8.0, 0.0]], &[], &[], &RenderState::default());
        assert_eq!(t.encoder().elements().len(), 1);
    }

    #[test]
    fn test_text_rotation_direction() {
        let mut t = SvgTarget::new(10, 100);
        let style = TextStyle { color: Rgba::BLACK, size_px: 12.0, rotation_deg: 90.0 };
        t.draw_text(5.0, 10.0, "1,000", &style);
        let svg = t.render();
        assert!(svg.contains(r#"<text x="5" y="90""#));
        assert!(svg.contains("rotate(-90 5 90)"));
    }
}
