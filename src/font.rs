//! Font metrics, text truncation and box alignment.
//!
//! Renderers only need metrics; how glyphs reach the surface is up to the
//! backend. [`BitmapFont`] is a small built-in 5x7 face that covers the
//! characters tick labels use.

/// String appended by [`Truncation::Ellipsis`].
pub const ELLIPSIS: &str = "...";

/// Glyph cell width in font units.
pub const GLYPH_WIDTH: u32 = 5;

/// Glyph cell height in font units.
pub const GLYPH_HEIGHT: u32 = 7;

/// What to do with text wider than its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Truncation {
    /// Draw the full text and let it overflow.
    #[default]
    None,
    /// Cut the text at the last character that fits.
    Empty,
    /// Cut the text and append [`ELLIPSIS`].
    Ellipsis,
}

/// Horizontal placement along the text direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HAlign {
    /// Start of the box.
    #[default]
    Left,
    /// Centered.
    Center,
    /// End of the box.
    Right,
}

/// Vertical placement across the text direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VAlign {
    /// Baseline on the bottom edge.
    #[default]
    Bottom,
    /// Centered.
    Center,
    /// Cap line on the top edge.
    Top,
}

/// Measurements a renderer needs to lay out text.
pub trait FontMetrics {
    /// Advance width of one character in pixels.
    fn advance(&self, c: char) -> f64;

    /// Height of the cap line above the baseline in pixels.
    fn text_height(&self) -> f64;

    /// Clearance below the baseline in pixels.
    fn descender(&self) -> f64;

    /// Width of a whole string.
    fn text_width(&self, text: &str) -> f64 {
        text.chars().map(|c| self.advance(c)).sum()
    }

    /// Shorten `text` to `width` pixels according to `mode`.
    fn truncate(&self, text: &str, width: f64, mode: Truncation) -> String {
        match mode {
            Truncation::None => text.to_owned(),
            _ if self.text_width(text) <= width => text.to_owned(),
            Truncation::Empty => fit_prefix(self, text, width).to_owned(),
            Truncation::Ellipsis => {
                let ellipsis_width = self.text_width(ELLIPSIS);
                if ellipsis_width > width {
                    return fit_prefix(self, ELLIPSIS, width).to_owned();
                }
                let mut out = fit_prefix(self, text, width - ellipsis_width).to_owned();
                out.push_str(ELLIPSIS);
                out
            }
        }
    }
}

fn fit_prefix<'t, F: FontMetrics + ?Sized>(font: &F, text: &'t str, width: f64) -> &'t str {
    let mut used = 0.0;
    for (i, c) in text.char_indices() {
        used += font.advance(c);
        if used > width {
            return &text[..i];
        }
    }
    text
}

/// Rectangle text is laid out in, bottom-left origin, pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextBox {
    /// Left edge.
    pub x: f64,
    /// Bottom edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl TextBox {
    /// Create a box.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// Result of laying out a string in a box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    /// Possibly truncated text.
    pub text: String,
    /// Pen x (start of the baseline).
    pub x: f64,
    /// Pen y.
    pub y: f64,
    /// Rotation in degrees, counter-clockwise.
    pub rotation: f64,
}

/// Lay out `text` inside `bounds`.
///
/// Alignment is relative to the text direction. The rotation is snapped to the
/// nearest quarter turn for placement; truncation uses the box extent along
/// that direction.
pub fn layout_text<F: FontMetrics + ?Sized>(
    font: &F,
    bounds: &TextBox,
    text: &str,
    halign: HAlign,
    valign: VAlign,
    truncation: Truncation,
    rotation: f64,
) -> TextLayout {
    let quarter = quarter_turns(rotation);
    let along = if quarter % 2 == 0 { bounds.width } else { bounds.height };
    let text = font.truncate(text, along, truncation);
    let (x, y) = place_text(font, bounds, &text, halign, valign, rotation);
    TextLayout { text, x, y, rotation }
}

/// Pen position that aligns `text` in `bounds`.
pub fn place_text<F: FontMetrics + ?Sized>(
    font: &F,
    bounds: &TextBox,
    text: &str,
    halign: HAlign,
    valign: VAlign,
    rotation: f64,
) -> (f64, f64) {
    let tw = font.text_width(text);
    let th = font.text_height();
    let TextBox { x, y, width: w, height: h } = *bounds;

    // fraction of the free space placed before the text, along and across
    let along = match halign {
        HAlign::Left => 0.0,
        HAlign::Center => 0.5,
        HAlign::Right => 1.0,
    };
    let across = match valign {
        VAlign::Bottom => 0.0,
        VAlign::Center => 0.5,
        VAlign::Top => 1.0,
    };

    match quarter_turns(rotation) {
        // reading upward, glyph tops face -x
        1 => (x + w - (w - th) * across, y + (h - tw) * along),
        // upside down
        2 => (x + w - (w - tw) * along, y + h - (h - th) * across),
        // reading downward, glyph tops face +x
        3 => (x + (w - th) * across, y + h - (h - tw) * along),
        _ => (x + (w - tw) * along, y + (h - th) * across),
    }
}

fn quarter_turns(rotation: f64) -> i64 {
    if !rotation.is_finite() {
        return 0;
    }
    ((rotation / 90.0).round() as i64).rem_euclid(4)
}

/// Built-in 5x7 bitmap face.
///
/// Each font unit is drawn as a `scale`-pixel square, so a scale of 2 gives
/// 14-pixel caps. Characters without a glyph render as a hollow box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitmapFont {
    scale: u32,
}

impl Default for BitmapFont {
    fn default() -> Self {
        Self::new(1)
    }
}

impl BitmapFont {
    /// Face with the given pixel scale (at least 1).
    #[must_use]
    pub fn new(scale: u32) -> Self {
        Self { scale: scale.max(1) }
    }

    /// Face whose cap height is close to `px` pixels.
    #[must_use]
    pub fn with_height(px: f64) -> Self {
        Self::new(scale_for_height(px))
    }

    /// Pixels per font unit.
    #[must_use]
    pub const fn scale(&self) -> u32 {
        self.scale
    }
}

/// Glyph scale whose cap height best matches `px`.
#[must_use]
pub fn scale_for_height(px: f64) -> u32 {
    if !px.is_finite() || px <= 0.0 {
        return 1;
    }
    ((px / f64::from(GLYPH_HEIGHT)).round() as u32).max(1)
}

impl FontMetrics for BitmapFont {
    fn advance(&self, _c: char) -> f64 {
        f64::from((GLYPH_WIDTH + 1) * self.scale)
    }

    fn text_height(&self) -> f64 {
        f64::from(GLYPH_HEIGHT * self.scale)
    }

    fn descender(&self) -> f64 {
        f64::from(self.scale)
    }
}

/// Rows of a glyph, top first; bit 4 is the leftmost column.
#[must_use]
pub const fn glyph(c: char) -> [u8; 7] {
    match c {
        ' ' => [0; 7],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '-' => [0, 0, 0, 0b11111, 0, 0, 0],
        '+' => [0, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0],
        '.' => [0, 0, 0, 0, 0, 0b01100, 0b01100],
        ',' => [0, 0, 0, 0, 0b01100, 0b00100, 0b01000],
        'e' => [0, 0, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        _ => [0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111],
    }
}
