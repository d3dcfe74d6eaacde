//! RGBA pixel surface for the raster backend.
//!
//! Rows are stored top-down with a stride padded to 64 bytes. The raster
//! backend flips its bottom-left coordinates into this layout.

use crate::color::Rgba;
use crate::error::{Error, Result};

/// Row alignment in bytes.
const ROW_ALIGNMENT: usize = 64;

/// Row-major RGBA pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    /// `[R, G, B, A]` per pixel, `stride` bytes per row.
    pixels: Vec<u8>,
    stride: usize,
}

impl Framebuffer {
    /// Create a transparent framebuffer.
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use gridwork::framebuffer::Framebuffer;
    ///
    /// let fb = Framebuffer::new(800, 600).unwrap();
    /// assert_eq!(fb.width(), 800);
    /// assert_eq!(fb.height(), 600);
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        let row_bytes = (width as usize) * 4;
        let stride = (row_bytes + ROW_ALIGNMENT - 1) & !(ROW_ALIGNMENT - 1);
        let pixels = vec![0; stride * (height as usize)];

        Ok(Self { width, height, pixels, stride })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row including padding.
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// One row of pixels without padding.
    #[must_use]
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = (y as usize) * self.stride;
        Some(&self.pixels[start..start + (self.width as usize) * 4])
    }

    /// Fill every pixel with `color`.
    pub fn clear(&mut self, color: Rgba) {
        let rgba = color.to_array();
        let row_bytes = (self.width as usize) * 4;
        for row in self.pixels.chunks_exact_mut(self.stride) {
            for px in row[..row_bytes].chunks_exact_mut(4) {
                px.copy_from_slice(&rgba);
            }
        }
    }

    /// Overwrite a rectangle, clamped to the surface.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba) {
        let x2 = x.saturating_add(w).min(self.width);
        let y2 = y.saturating_add(h).min(self.height);
        if x >= x2 || y >= y2 {
            return;
        }

        let rgba = color.to_array();
        for row_y in y..y2 {
            let start = (row_y as usize) * self.stride + (x as usize) * 4;
            let end = start + ((x2 - x) as usize) * 4;
            for px in self.pixels[start..end].chunks_exact_mut(4) {
                px.copy_from_slice(&rgba);
            }
        }
    }

    /// Color at a pixel, `None` out of bounds.
    #[must_use]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let idx = self.index(x, y)?;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(Rgba::from_array(rgba))
    }

    /// Overwrite a pixel. Out-of-bounds writes are dropped.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_array());
        }
    }

    /// Composite `color` over a pixel, scaling its alpha by `coverage`.
    ///
    /// Uses the "over" operator:
    /// `out = src * a_s + dst * a_d * (1 - a_s)`, normalized by the output alpha.
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba, coverage: f32) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        let src_a = f32::from(color.a) / 255.0 * coverage.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }
        let dst_a = f32::from(self.pixels[idx + 3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);

        let src = color.to_array();
        for c in 0..3 {
            let s = f32::from(src[c]);
            let d = f32::from(self.pixels[idx + c]);
            let out = (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
            self.pixels[idx + c] = out.round().clamp(0.0, 255.0) as u8;
        }
        self.pixels[idx + 3] = (out_a * 255.0).round() as u8;
    }

    /// Number of pixels exactly equal to `color`.
    #[must_use]
    pub fn count_pixels(&self, color: Rgba) -> usize {
        let rgba = color.to_array();
        (0..self.height)
            .filter_map(|y| self.row(y))
            .flat_map(|row| row.chunks_exact(4))
            .filter(|px| *px == rgba)
            .count()
    }

    /// Pixels without row padding, as PNG expects them.
    #[must_use]
    pub fn to_compact_pixels(&self) -> Vec<u8> {
        if self.stride == (self.width as usize) * 4 {
            return self.pixels.clone();
        }
        (0..self.height).filter_map(|y| self.row(y)).flatten().copied().collect()
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y as usize) * self.stride + (x as usize) * 4)
    }
}
