//! PNG encoding of framebuffers (pure Rust, no libpng).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::framebuffer::Framebuffer;

/// Encodes a [`Framebuffer`] as 8-bit RGBA PNG.
pub struct PngEncoder;

impl PngEncoder {
    /// Encode into any writer.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding or writing fails.
    pub fn encode<W: Write>(fb: &Framebuffer, writer: W) -> Result<()> {
        let mut encoder = png::Encoder::new(writer, fb.width(), fb.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut png = encoder.write_header()?;
        png.write_image_data(&fb.to_compact_pixels())?;
        png.finish()?;
        Ok(())
    }

    /// Encode to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or encoding fails.
    pub fn write_to_file<P: AsRef<Path>>(fb: &Framebuffer, path: P) -> Result<()> {
        let path = path.as_ref();
        Self::encode(fb, BufWriter::new(File::create(path)?))?;
        log::debug!("wrote {}x{} PNG to {}", fb.width(), fb.height(), path.display());
        Ok(())
    }

    /// Encode to an in-memory byte vector.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn to_bytes(fb: &Framebuffer) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        Self::encode(fb, &mut bytes)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    #[test]
    fn test_png_magic() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.clear(Rgba::RED);
        let bytes = PngEncoder::to_bytes(&fb).unwrap();
        assert_eq!(&bytes[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn test_png_round_trip_pixels() {
        let mut fb = Framebuffer::new(3, 2).unwrap();
        fb.clear(Rgba::WHITE);
        fb.set_pixel(1, 1, Rgba::BLUE);
        let bytes = PngEncoder::to_bytes(&fb).unwrap();

        let decoder = png::Decoder::new(bytes.as_slice());
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        assert_eq!((info.width, info.height), (3, 2));
        assert_eq!(&buf[(3 + 1) * 4..(3 + 1) * 4 + 4], &[0, 0, 255, 255]);
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let fb = Framebuffer::new(2, 2).unwrap();
        PngEncoder::write_to_file(&fb, &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 8);
    }
}
