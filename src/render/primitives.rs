//! Rasterization of lines, triangles, points and bitmap glyphs.
//!
//! Algorithms write through a [`PixelSink`], which owns compositing and
//! reports the bounds every loop is clipped to.
//!
//! - Bresenham's line for hard edges, with a square brush for wide lines
//! - Wu's line for anti-aliased edges
//! - Edge-function triangle fill with per-vertex color interpolation
//! - Midpoint filled circle for points

use crate::color::Rgba;
use crate::font::{glyph, GLYPH_HEIGHT, GLYPH_WIDTH};
use crate::geometry::Viewport;

/// Destination for rasterized pixels.
pub trait PixelSink {
    /// Write one pixel; `coverage` in `[0, 1]` scales the color's alpha.
    fn put(&mut self, x: i32, y: i32, color: Rgba, coverage: f32);

    /// Pixels outside this rectangle are discarded; `None` accepts everything.
    ///
    /// Rasterizers clip their loops to it, so geometry far off-screen costs
    /// no more than geometry at the edge.
    fn bounds(&self) -> Option<Viewport> {
        None
    }
}

/// Inclusive `(min, max)` corners of `bounds` grown by `margin` pixels.
pub(crate) fn clip_box(bounds: Viewport, margin: i32) -> ([f64; 2], [f64; 2]) {
    let margin = f64::from(margin);
    (
        [f64::from(bounds.x) - margin, f64::from(bounds.y) - margin],
        [f64::from(bounds.right()) - 1.0 + margin, f64::from(bounds.top()) - 1.0 + margin],
    )
}

/// Clip the segment `a`-`b` to the box `min..=max` (Liang-Barsky).
///
/// Returns `None` when nothing of the segment is inside or an endpoint is
/// not finite.
#[must_use]
pub fn clip_segment(a: [f64; 2], b: [f64; 2], min: [f64; 2], max: [f64; 2]) -> Option<([f64; 2], [f64; 2])> {
    if !a.iter().chain(&b).all(|v| v.is_finite()) {
        return None;
    }
    let d = [b[0] - a[0], b[1] - a[1]];
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);

    for axis in 0..2 {
        for (p, q) in [(-d[axis], a[axis] - min[axis]), (d[axis], max[axis] - a[axis])] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
    }
    Some(([a[0] + t0 * d[0], a[1] + t0 * d[1]], [a[0] + t1 * d[0], a[1] + t1 * d[1]]))
}

fn put_wide<S: PixelSink + ?Sized>(sink: &mut S, x: i64, y: i64, color: Rgba, coverage: f32) {
    if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
        sink.put(x, y, color, coverage);
    }
}

// ============================================================================
// Lines
// ============================================================================

/// Bresenham line between integer endpoints, both inclusive.
///
/// Widths above one pixel stamp a square brush centered on the line. The
/// line is clipped to the sink bounds first.
pub fn draw_line<S: PixelSink + ?Sized>(sink: &mut S, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba, width: u32) {
    let width = i64::from(width.clamp(1, 1024));
    let lo = -(width - 1) / 2;
    let hi = lo + width;

    let (mut x0, mut y0, mut x1, mut y1) = (i64::from(x0), i64::from(y0), i64::from(x1), i64::from(y1));
    if let Some(bounds) = sink.bounds() {
        if bounds.is_empty() {
            return;
        }
        let (min, max) = clip_box(bounds, width as i32);
        let Some((p, q)) = clip_segment([x0 as f64, y0 as f64], [x1 as f64, y1 as f64], min, max) else {
            return;
        };
        (x0, y0, x1, y1) = (p[0].round() as i64, p[1].round() as i64, q[0].round() as i64, q[1].round() as i64);
    }

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        for by in lo..hi {
            for bx in lo..hi {
                put_wide(sink, x + bx, y + by, color, 1.0);
            }
        }
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Anti-aliased line (Xiaolin Wu, SIGGRAPH '91).
///
/// Two pixels are written per step along the major axis, weighted by the
/// distance of the ideal line from each.
pub fn draw_line_aa<S: PixelSink + ?Sized>(sink: &mut S, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
    let (x0, y0, x1, y1) = match sink.bounds() {
        Some(bounds) if bounds.is_empty() => return,
        Some(bounds) => {
            let (min, max) = clip_box(bounds, 2);
            let a = [f64::from(x0), f64::from(y0)];
            let b = [f64::from(x1), f64::from(y1)];
            let Some((p, q)) = clip_segment(a, b, min, max) else {
                return;
            };
            (p[0] as f32, p[1] as f32, q[0] as f32, q[1] as f32)
        }
        None => (x0, y0, x1, y1),
    };

    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    let (x0, y0, x1, y1) = if steep { (y0, x0, y1, x1) } else { (x0, y0, x1, y1) };
    let (x0, y0, x1, y1) = if x0 > x1 { (x1, y1, x0, y0) } else { (x0, y0, x1, y1) };

    let dx = x1 - x0;
    let gradient = if dx.abs() < f32::EPSILON { 1.0 } else { (y1 - y0) / dx };

    let mut plot = |major: i32, minor: i32, c: f32| {
        if steep {
            sink.put(minor, major, color, c);
        } else {
            sink.put(major, minor, color, c);
        }
    };

    let xend = x0.round();
    let yend = y0 + gradient * (xend - x0);
    let xgap = rfpart(x0 + 0.5);
    let start = xend as i32;
    plot(start, yend.floor() as i32, rfpart(yend) * xgap);
    plot(start, (yend.floor() as i32).saturating_add(1), fpart(yend) * xgap);
    let mut intery = yend + gradient;

    let xend = x1.round();
    let yend = y1 + gradient * (xend - x1);
    let xgap = fpart(x1 + 0.5);
    let stop = xend as i32;
    plot(stop, yend.floor() as i32, rfpart(yend) * xgap);
    plot(stop, (yend.floor() as i32).saturating_add(1), fpart(yend) * xgap);

    for major in start.saturating_add(1)..stop {
        let base = intery.floor() as i32;
        plot(major, base, rfpart(intery));
        plot(major, base.saturating_add(1), fpart(intery));
        intery += gradient;
    }
}

#[inline]
fn fpart(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
fn rfpart(x: f32) -> f32 {
    1.0 - fpart(x)
}

// ============================================================================
// Fills
// ============================================================================

/// Fill a triangle, interpolating vertex colors.
///
/// Pixel centers on a shared edge belong to both neighbors, so abutting
/// triangles leave no gaps. Degenerate triangles draw nothing.
pub fn fill_triangle<S: PixelSink + ?Sized>(sink: &mut S, p: [[f32; 2]; 3], c: [Rgba; 3]) {
    let wide = p.map(|v| [f64::from(v[0]), f64::from(v[1])]);
    let area = edge(wide[0], wide[1], wide[2]);
    if area.abs() < f64::from(f32::EPSILON) || !area.is_finite() {
        return;
    }

    let mut min_x = p.iter().map(|v| v[0]).fold(f32::INFINITY, f32::min).floor() as i32;
    let mut max_x = p.iter().map(|v| v[0]).fold(f32::NEG_INFINITY, f32::max).ceil() as i32;
    let mut min_y = p.iter().map(|v| v[1]).fold(f32::INFINITY, f32::min).floor() as i32;
    let mut max_y = p.iter().map(|v| v[1]).fold(f32::NEG_INFINITY, f32::max).ceil() as i32;
    if let Some(bounds) = sink.bounds() {
        min_x = min_x.max(bounds.x);
        max_x = max_x.min(bounds.right().saturating_sub(1));
        min_y = min_y.max(bounds.y);
        max_y = max_y.min(bounds.top().saturating_sub(1));
    }
    let flat = c[0] == c[1] && c[1] == c[2];

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let q = [f64::from(x) + 0.5, f64::from(y) + 0.5];
            let w0 = edge(wide[1], wide[2], q) / area;
            let w1 = edge(wide[2], wide[0], q) / area;
            let w2 = edge(wide[0], wide[1], q) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }
            let color = if flat { c[0] } else { mix3(c, [w0 as f32, w1 as f32, w2 as f32]) };
            sink.put(x, y, color, 1.0);
        }
    }
}

fn edge(a: [f64; 2], b: [f64; 2], q: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (q[1] - a[1]) - (b[1] - a[1]) * (q[0] - a[0])
}

fn mix3(c: [Rgba; 3], w: [f32; 3]) -> Rgba {
    let channel = |f: fn(Rgba) -> u8| -> u8 {
        let v = f32::from(f(c[0])) * w[0] + f32::from(f(c[1])) * w[1] + f32::from(f(c[2])) * w[2];
        v.round().clamp(0.0, 255.0) as u8
    };
    Rgba::new(channel(|c| c.r), channel(|c| c.g), channel(|c| c.b), channel(|c| c.a))
}

/// Filled circle (midpoint algorithm); radius 0 sets a single pixel.
pub fn fill_circle<S: PixelSink + ?Sized>(sink: &mut S, cx: i32, cy: i32, radius: i32, color: Rgba) {
    let bounds = sink.bounds();
    let (cx, cy, radius) = (i64::from(cx), i64::from(cy), i64::from(radius.max(0)));
    if let Some(b) = bounds {
        let outside = cx + radius < i64::from(b.x)
            || cx - radius >= i64::from(b.right())
            || cy + radius < i64::from(b.y)
            || cy - radius >= i64::from(b.top());
        if b.is_empty() || outside {
            return;
        }
    }

    let mut span = |x1: i64, x2: i64, y: i64| {
        let (x1, x2) = match bounds {
            Some(b) if y < i64::from(b.y) || y >= i64::from(b.top()) => return,
            Some(b) => (x1.max(i64::from(b.x)), x2.min(i64::from(b.right()) - 1)),
            None => (x1, x2),
        };
        for x in x1..=x2 {
            put_wide(sink, x, y, color, 1.0);
        }
    };

    if radius == 0 {
        span(cx, cx, cy);
        return;
    }
    let (mut x, mut y) = (radius, 0);
    let mut err = 1 - radius;
    while x >= y {
        span(cx - x, cx + x, cy + y);
        span(cx - x, cx + x, cy - y);
        span(cx - y, cx + y, cy + x);
        span(cx - y, cx + y, cy - x);
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

// ============================================================================
// Text
// ============================================================================

/// Draw `text` with the built-in 5x7 glyphs.
///
/// `(x, y)` is the left end of the baseline; each glyph unit is a
/// `scale`-pixel square. Rotation is counter-clockwise in degrees.
pub fn draw_glyph_run<S: PixelSink + ?Sized>(
    sink: &mut S,
    x: f32,
    y: f32,
    text: &str,
    scale: u32,
    rotation_deg: f32,
    color: Rgba,
) {
    let scale = scale.max(1) as i32;
    let (sin, cos) = rotation_deg.to_radians().sin_cos();
    let advance = (GLYPH_WIDTH as i32 + 1) * scale;

    for (i, c) in text.chars().enumerate() {
        let pen = i as i32 * advance;
        for (row, bits) in glyph(c).iter().enumerate() {
            // row 0 is the top; the bottom row sits on the baseline
            let cell_y = (GLYPH_HEIGHT as i32 - 1 - row as i32) * scale;
            for col in 0..GLYPH_WIDTH as i32 {
                if bits & (1 << (GLYPH_WIDTH as i32 - 1 - col)) == 0 {
                    continue;
                }
                let cell_x = pen + col * scale;
                for sy in 0..scale {
                    for sx in 0..scale {
                        let lx = (cell_x + sx) as f32 + 0.5;
                        let ly = (cell_y + sy) as f32 + 0.5;
                        let px = x + lx * cos - ly * sin;
                        let py = y + lx * sin + ly * cos;
                        sink.put(px.floor() as i32, py.floor() as i32, color, 1.0);
                    }
                }
            }
        }
    }
}
