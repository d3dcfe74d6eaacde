//! Drawing a generated grid through a renderer.

use crate::color::Rgba;
use crate::error::Result;
use crate::font::FontMetrics;
use crate::pane::RenderPane;
use crate::render::{DrawMode, GeometryBuffer, PrimitiveRenderer, RenderState, RenderTarget};

use super::generator::{Axis, GridGenerator};
use super::labels::{separated_number, tick_label};
use super::step::MAX_GRID_TICKS;

/// Grid line and label appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridOverlay {
    /// Grid line color.
    pub line_color: Rgba,
    /// Grid line width in pixels.
    pub line_width: f32,
    /// Label color.
    pub label_color: Rgba,
    /// Draw tick labels.
    pub show_labels: bool,
    /// Gap between a line and its label, in pixels.
    pub label_padding: f64,
    /// Fold trailing thousands into K/M/G suffixes on whole-number axes.
    pub postfix: bool,
}

impl Default for GridOverlay {
    fn default() -> Self {
        Self {
            line_color: Rgba::GRID_GREY,
            line_width: 1.0,
            label_color: Rgba::BLACK,
            show_labels: true,
            label_padding: 2.0,
            postfix: false,
        }
    }
}

impl GridOverlay {
    /// Lines for one axis, in pixels relative to the pane viewport.
    ///
    /// Ticks that project outside the viewport are skipped.
    ///
    /// # Errors
    ///
    /// Propagates buffer protocol errors.
    pub fn line_buffer<P: RenderPane + ?Sized>(
        &self,
        grid: &GridGenerator,
        pane: &P,
        axis: Axis,
    ) -> Result<GeometryBuffer> {
        let vp = pane.viewport();
        let (width, height) = (f64::from(vp.width), f64::from(vp.height));

        let ticks = grid.begin(axis).len().min(MAX_GRID_TICKS as usize);
        let mut buf = GeometryBuffer::with_capacity(ticks.saturating_mul(2));
        buf.set_state(RenderState { color: self.line_color, line_width: self.line_width, ..RenderState::default() });
        buf.begin(DrawMode::Lines)?;
        for (_, offset) in tick_offsets(grid, pane, axis) {
            match axis {
                Axis::X => {
                    buf.vertex2(offset, 0.0);
                    buf.vertex2(offset, height - 1.0);
                }
                Axis::Y => {
                    buf.vertex2(0.0, offset);
                    buf.vertex2(width - 1.0, offset);
                }
            }
        }
        buf.end()?;
        Ok(buf)
    }

    /// Text for a tick at `position`.
    #[must_use]
    pub fn label(&self, grid: &GridGenerator, axis: Axis, position: f64) -> String {
        let value = grid.display_value(axis, position);
        let spec = grid.step_spec(axis);
        if self.postfix && spec.is_integral() && value.abs() < 9.0e15 {
            separated_number(value.round() as i64, true)
        } else {
            tick_label(value, spec)
        }
    }

    /// Draw lines for both axes, then labels, into the pane's viewport.
    ///
    /// # Errors
    ///
    /// Propagates renderer protocol errors, for example when a geometry
    /// batch is still open.
    pub fn draw<T, P, F>(
        &self,
        renderer: &mut PrimitiveRenderer<T>,
        grid: &GridGenerator,
        pane: &P,
        font: &F,
    ) -> Result<()>
    where
        T: RenderTarget,
        P: RenderPane + ?Sized,
        F: FontMetrics + ?Sized,
    {
        let vp = pane.viewport();
        renderer.set_viewport(vp.x, vp.y, vp.width, vp.height);

        for axis in Axis::ALL {
            let buf = self.line_buffer(grid, pane, axis)?;
            renderer.render_pixels(&buf)?;
        }
        if !self.show_labels {
            return Ok(());
        }

        let pad = self.label_padding;
        let mut text = renderer.begin_text(font, self.label_color)?;
        for axis in Axis::ALL {
            for (position, offset) in tick_offsets(grid, pane, axis) {
                let label = self.label(grid, axis, position);
                match axis {
                    Axis::X => text.write_text(offset + pad, pad, &label, 0.0),
                    Axis::Y => text.write_text(pad, offset + pad, &label, 0.0),
                }
            }
        }
        Ok(())
    }
}

/// `(position, pixel offset within the viewport)` for visible ticks.
fn tick_offsets<P: RenderPane + ?Sized>(grid: &GridGenerator, pane: &P, axis: Axis) -> Vec<(f64, f64)> {
    let vp = pane.viewport();
    let positions: Vec<f64> = grid.begin(axis).collect();
    let (pixels, origin, extent) = match axis {
        Axis::X => (pane.project_many_x(&positions), vp.x, vp.width),
        Axis::Y => (pane.project_many_y(&positions), vp.y, vp.height),
    };
    let limit = f64::from(extent);

    positions
        .into_iter()
        .zip(pixels)
        .map(|(pos, px)| (pos, f64::from(px) - f64::from(origin)))
        .filter(|(_, offset)| offset.is_finite() && *offset >= -0.5 && *offset < limit + 0.5)
        .map(|(pos, offset)| (pos, offset.clamp(0.0, (limit - 1.0).max(0.0))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BitmapFont;
    use crate::geometry::{ModelRect, Viewport};
    use crate::pane::Pane;
    use crate::render::{RasterTarget, SvgTarget};

    fn setup() -> (Pane, GridGenerator) {
        let pane = Pane::new(Viewport::new(0, 0, 500, 200), ModelRect::new(0.0, 0.0, 97.0, 40.0));
        let mut grid = GridGenerator::new();
        grid.set_cell_limits(20.0, 50.0);
        grid.generate(&pane);
        (pane, grid)
    }

    #[test]
    fn test_line_buffer_skips_offscreen_ticks() {
        let (pane, grid) = setup();
        let buf = GridOverlay::default().line_buffer(&grid, &pane, Axis::X).unwrap();
        // ticks 0..=95 are visible, 100 lies past the right edge
        assert_eq!(buf.primitive_count(), 20);
        assert!(buf.is_finalized());
        assert_eq!(buf.state().color, Rgba::GRID_GREY);
    }

    #[test]
    fn test_labels() {
        let (_, mut grid) = setup();
        let overlay = GridOverlay { postfix: true, ..GridOverlay::default() };
        assert_eq!(overlay.label(&grid, Axis::X, 5000.0), "5 K");
        grid.set_one_based(true, false);
        assert_eq!(overlay.label(&grid, Axis::X, 99.0), "100");
        assert_eq!(GridOverlay::default().label(&grid, Axis::X, 1999.0), "2,000");
    }

    #[test]
    fn test_draw_raster() {
        let (pane, grid) = setup();
        let mut target = RasterTarget::new(500, 200).unwrap();
        target.clear(Rgba::WHITE);
        let mut renderer = PrimitiveRenderer::new(target);
        let overlay = GridOverlay { label_color: Rgba::BLUE, ..GridOverlay::default() };
        overlay.draw(&mut renderer, &grid, &pane, &BitmapFont::new(1)).unwrap();

        let fb = renderer.target().framebuffer();
        assert!(fb.count_pixels(Rgba::GRID_GREY) > 0);
        assert!(fb.count_pixels(Rgba::BLUE) > 0);
        // tick 50 projects to x = 257.7
        assert_eq!(renderer.target().pixel(257, 100), Some(Rgba::GRID_GREY));
    }

    #[test]
    fn test_draw_svg_without_labels() {
        let (pane, grid) = setup();
        let mut renderer = PrimitiveRenderer::new(SvgTarget::new(500, 200));
        let overlay = GridOverlay { show_labels: false, ..GridOverlay::default() };
        overlay.draw(&mut renderer, &grid, &pane, &BitmapFont::new(1)).unwrap();
        let svg = renderer.target().render();
        assert!(svg.contains("<line"));
        assert!(!svg.contains("<text"));
    }

    #[test]
    fn test_draw_rejects_open_batch() {
        let (pane, grid) = setup();
        let mut renderer = PrimitiveRenderer::new(SvgTarget::new(500, 200));
        renderer.begin(DrawMode::Points).unwrap();
        assert!(GridOverlay::default().draw(&mut renderer, &grid, &pane, &BitmapFont::new(1)).is_err());
    }
}
