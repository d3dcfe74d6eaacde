//! SVG document writer.
//!
//! Elements use SVG's top-left origin; callers flip y before adding them.

use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::color::Rgba;
use crate::error::Result;
use crate::framebuffer::Framebuffer;

/// One drawable SVG element.
///
/// Field names match the SVG attributes they produce.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Straight segment.
    Line { x1: f32, y1: f32, x2: f32, y2: f32, stroke: Rgba, stroke_width: f32 },
    /// Open or closed outline.
    Polyline { points: Vec<(f32, f32)>, stroke: Rgba, stroke_width: f32, closed: bool },
    /// Filled polygon without stroke.
    Polygon { points: Vec<(f32, f32)>, fill: Rgba },
    /// Filled circle.
    Circle { cx: f32, cy: f32, r: f32, fill: Rgba },
    /// Text run; `rotation` is clockwise degrees around `(x, y)`.
    Text { x: f32, y: f32, text: String, font_size: f32, fill: Rgba, rotation: f32 },
    /// Embedded raster image as a data URI.
    Image { x: f32, y: f32, width: f32, height: f32, data: String },
}

/// Accumulates elements and renders an SVG document.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgEncoder {
    width: u32,
    height: u32,
    background: Option<Rgba>,
    elements: Vec<SvgElement>,
}

impl SvgEncoder {
    /// Empty document with a white background.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, background: Some(Rgba::WHITE), elements: Vec::new() }
    }

    /// Document embedding a framebuffer as a PNG image.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn from_framebuffer(fb: &Framebuffer) -> Result<Self> {
        let png = super::PngEncoder::to_bytes(fb)?;
        let mut encoder = Self::new(fb.width(), fb.height()).background(None);
        encoder.add_element(SvgElement::Image {
            x: 0.0,
            y: 0.0,
            width: fb.width() as f32,
            height: fb.height() as f32,
            data: format!("data:image/png;base64,{}", STANDARD.encode(png)),
        });
        Ok(encoder)
    }

    /// Set the background color, `None` for transparent.
    #[must_use]
    pub fn background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    /// Append an element.
    pub fn add_element(&mut self, element: SvgElement) {
        self.elements.push(element);
    }

    /// Elements in drawing order.
    #[must_use]
    pub fn elements(&self) -> &[SvgElement] {
        &self.elements
    }

    /// Document height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Render the document.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(256 + self.elements.len() * 96);
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        if let Some(bg) = self.background {
            let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="{}"/>"#, bg.to_css());
        }
        for element in &self.elements {
            svg.push_str("  ");
            write_element(&mut svg, element);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    /// Write the rendered document to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }
}

fn points_attr(points: &[(f32, f32)]) -> String {
    points.iter().map(|(x, y)| format!("{x},{y}")).collect::<Vec<_>>().join(" ")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

fn write_element(out: &mut String, element: &SvgElement) {
    let _ = match element {
        SvgElement::Line { x1, y1, x2, y2, stroke, stroke_width } => write!(
            out,
            r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{}" stroke-width="{stroke_width}"/>"#,
            stroke.to_css()
        ),
        SvgElement::Polyline { points, stroke, stroke_width, closed } => write!(
            out,
            r#"<{tag} points="{}" fill="none" stroke="{}" stroke-width="{stroke_width}"/>"#,
            points_attr(points),
            stroke.to_css(),
            tag = if *closed { "polygon" } else { "polyline" }
        ),
        SvgElement::Polygon { points, fill } => {
            write!(out, r#"<polygon points="{}" fill="{}"/>"#, points_attr(points), fill.to_css())
        }
        SvgElement::Circle { cx, cy, r, fill } => {
            write!(out, r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{}"/>"#, fill.to_css())
        }
        SvgElement::Text { x, y, text, font_size, fill, rotation } => {
            let transform = if *rotation == 0.0 {
                String::new()
            } else {
                format!(r#" transform="rotate({rotation} {x} {y})""#)
            };
            write!(
                out,
                r#"<text x="{x}" y="{y}" font-size="{font_size}" fill="{}" font-family="monospace"{transform}>{}</text>"#,
                fill.to_css(),
                escape(text)
            )
        }
        SvgElement::Image { x, y, width, height, data } => write!(
            out,
            r#"<image x="{x}" y="{y}" width="{width}" height="{height}" xlink:href="{data}"/>"#
        ),
    };
}
