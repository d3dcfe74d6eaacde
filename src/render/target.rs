//! Backend interface for submitted geometry and text.

use crate::color::Rgba;
use crate::geometry::Viewport;

use super::buffer::{DrawMode, RenderState};

/// Appearance of a text run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Fill color.
    pub color: Rgba,
    /// Cap height in pixels.
    pub size_px: f32,
    /// Rotation in degrees, counter-clockwise around the pen position.
    pub rotation_deg: f32,
}

/// Surface that primitives are drawn onto.
///
/// Coordinates are absolute pixels with a bottom-left origin. Implementations
/// flip or transform as their output format requires.
pub trait RenderTarget {
    /// Confine subsequent drawing to `viewport`.
    fn set_viewport(&mut self, viewport: Viewport);

    /// Restrict drawing to `rect`, or lift the restriction.
    fn set_scissor(&mut self, rect: Option<Viewport>);

    /// Whether [`set_scissor`](Self::set_scissor) has any effect.
    fn supports_clipping(&self) -> bool {
        true
    }

    /// Enable alpha blending for all subsequent drawing.
    fn set_blend(&mut self, enabled: bool);

    /// Save blend and scissor state.
    fn push_state(&mut self);

    /// Restore the last saved state. Unbalanced pops are ignored.
    fn pop_state(&mut self);

    /// Draw a batch of projected vertices.
    ///
    /// `colors` and `tex_coords` are either empty or hold one entry per vertex.
    fn draw_primitive(
        &mut self,
        mode: DrawMode,
        vertices: &[[f32; 3]],
        colors: &[Rgba],
        tex_coords: &[[f32; 2]],
        state: &RenderState,
    );

    /// Draw a text run with its baseline starting at `(x, y)`.
    fn draw_text(&mut self, x: f32, y: f32, text: &str, style: &TextStyle);
}

/// Triangles covering a filled batch, as vertex index triples.
///
/// Shared by backends that can only fill triangles or polygons.
#[must_use]
pub fn triangulate(mode: DrawMode, count: usize) -> Vec<[usize; 3]> {
    match mode {
        DrawMode::Triangles => (0..count / 3).map(|t| [3 * t, 3 * t + 1, 3 * t + 2]).collect(),
        DrawMode::TriangleStrip => (2..count).map(|i| [i - 2, i - 1, i]).collect(),
        DrawMode::TriangleFan => (2..count).map(|i| [0, i - 1, i]).collect(),
        DrawMode::Quads => (0..count / 4)
            .flat_map(|q| {
                let b = 4 * q;
                [[b, b + 1, b + 2], [b, b + 2, b + 3]]
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Segments of a line batch, as vertex index pairs.
#[must_use]
pub fn segments(mode: DrawMode, count: usize) -> Vec<[usize; 2]> {
    match mode {
        DrawMode::Lines => (0..count / 2).map(|s| [2 * s, 2 * s + 1]).collect(),
        DrawMode::LineStrip => (1..count).map(|i| [i - 1, i]).collect(),
        DrawMode::LineLoop => {
            let mut segs: Vec<[usize; 2]> = (1..count).map(|i| [i - 1, i]).collect();
            if count > 2 {
                segs.push([count - 1, 0]);
            }
            segs
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangulate_matches_primitive_count() {
        for mode in [DrawMode::Triangles, DrawMode::TriangleStrip, DrawMode::TriangleFan] {
            for n in 0..10 {
                assert_eq!(triangulate(mode, n).len(), mode.primitive_count(n), "{mode:?} {n}");
            }
        }
        assert_eq!(triangulate(DrawMode::Quads, 8).len(), 4);
        assert!(triangulate(DrawMode::Lines, 8).is_empty());
    }

    #[test]
    fn test_segments_match_primitive_count() {
        for mode in [DrawMode::Lines, DrawMode::LineStrip, DrawMode::LineLoop] {
            for n in 0..10 {
                assert_eq!(segments(mode, n).len(), mode.primitive_count(n), "{mode:?} {n}");
            }
        }
        assert_eq!(segments(DrawMode::LineLoop, 3).last(), Some(&[2, 0]));
    }

    #[test]
    fn test_fan_shares_first_vertex() {
        assert!(triangulate(DrawMode::TriangleFan, 6).iter().all(|t| t[0] == 0));
    }
}
