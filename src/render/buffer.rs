//! Retained geometry batches.
//!
//! A [`GeometryBuffer`] collects vertices between `begin` and `end`, together
//! with optional per-vertex colors and texture coordinates and a snapshot of
//! the render state. Once ended it can be submitted any number of times.

use crate::color::Rgba;
use crate::error::{Error, ProtocolError, Result};

/// How a vertex list is assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawMode {
    /// Each vertex is a point.
    Points,
    /// Vertex pairs are independent segments.
    #[default]
    Lines,
    /// Connected polyline.
    LineStrip,
    /// Closed polyline.
    LineLoop,
    /// Vertex triples are independent triangles.
    Triangles,
    /// Each vertex after the second adds a triangle with the previous two.
    TriangleStrip,
    /// Each vertex after the second adds a triangle with the first and previous.
    TriangleFan,
    /// Vertex quadruples are independent quads.
    Quads,
}

impl DrawMode {
    /// Number of complete primitives `vertices` vertices make up.
    ///
    /// Trailing vertices that do not complete a primitive are ignored.
    #[must_use]
    pub const fn primitive_count(self, vertices: usize) -> usize {
        match self {
            Self::Points => vertices,
            Self::Lines => vertices / 2,
            Self::LineStrip => vertices.saturating_sub(1),
            Self::LineLoop => match vertices {
                0 | 1 => 0,
                2 => 1,
                n => n,
            },
            Self::Triangles => vertices / 3,
            Self::TriangleStrip | Self::TriangleFan => vertices.saturating_sub(2),
            Self::Quads => vertices / 4,
        }
    }

    /// True for modes that produce filled area.
    #[must_use]
    pub const fn is_filled(self) -> bool {
        matches!(self, Self::Triangles | Self::TriangleStrip | Self::TriangleFan | Self::Quads)
    }
}

/// Matrix stack selected for subsequent transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatrixMode {
    /// Model-view stack.
    #[default]
    ModelView,
    /// Projection stack.
    Projection,
    /// Texture stack.
    Texture,
}

/// Drawing state captured with each buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    /// Color for vertices without a per-vertex color.
    pub color: Rgba,
    /// Line width in pixels.
    pub line_width: f32,
    /// Point diameter in pixels.
    pub point_size: f32,
    /// Active matrix mode.
    pub matrix_mode: MatrixMode,
    /// Alpha-blend onto the surface instead of overwriting.
    pub blend: bool,
    /// Anti-alias lines.
    pub line_smooth: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            color: Rgba::BLACK,
            line_width: 1.0,
            point_size: 1.0,
            matrix_mode: MatrixMode::ModelView,
            blend: false,
            line_smooth: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Empty,
    Accumulating,
    Finalized,
}

/// Vertex batch with optional per-vertex attributes.
///
/// Vertices are stored in `f64` so large data coordinates survive until
/// projection.
///
/// # Example
///
/// ```
/// use gridwork::render::{DrawMode, GeometryBuffer};
///
/// let mut buf = GeometryBuffer::new();
/// buf.begin(DrawMode::Lines).unwrap();
/// buf.vertex2(0.0, 0.0);
/// buf.vertex2(10.0, 10.0);
/// buf.end().unwrap();
/// assert_eq!(buf.primitive_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryBuffer {
    mode: DrawMode,
    vertices: Vec<[f64; 3]>,
    colors: Vec<Rgba>,
    tex_coords: Vec<[f32; 2]>,
    state: RenderState,
    phase: Phase,
}

impl GeometryBuffer {
    /// Empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty buffer with room for `vertices` vertices.
    #[must_use]
    pub fn with_capacity(vertices: usize) -> Self {
        Self { vertices: Vec::with_capacity(vertices), ..Self::default() }
    }

    /// Start a batch, discarding previous contents.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::NestedBegin`] if a batch is already open.
    pub fn begin(&mut self, mode: DrawMode) -> Result<()> {
        if self.phase == Phase::Accumulating {
            return Err(ProtocolError::NestedBegin.into());
        }
        self.mode = mode;
        self.vertices.clear();
        self.colors.clear();
        self.tex_coords.clear();
        self.phase = Phase::Accumulating;
        Ok(())
    }

    /// Close the batch.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::EndWithoutBegin`] if no batch is open, or
    /// [`Error::AttributeMismatch`] if a partially supplied attribute does not
    /// have one entry per vertex. A mismatched batch is rejected: the buffer
    /// is left unfinalized and cannot be rendered until the next `begin`.
    pub fn end(&mut self) -> Result<()> {
        if self.phase != Phase::Accumulating {
            return Err(ProtocolError::EndWithoutBegin.into());
        }
        let vertices = self.vertices.len();
        let checked = check_attribute("colors", self.colors.len(), vertices)
            .and_then(|()| check_attribute("tex_coords", self.tex_coords.len(), vertices));
        self.phase = if checked.is_ok() { Phase::Finalized } else { Phase::Empty };
        checked
    }

    /// Append a vertex.
    pub fn vertex3(&mut self, x: f64, y: f64, z: f64) {
        if self.accepting("vertex") {
            self.vertices.push([x, y, z]);
        }
    }

    /// Append a vertex at `z = 0`.
    pub fn vertex2(&mut self, x: f64, y: f64) {
        self.vertex3(x, y, 0.0);
    }

    /// Replace the contents with a single axis-aligned quad.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::NestedBegin`] if a batch is already open.
    pub fn rect(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()> {
        self.begin(DrawMode::Quads)?;
        for [x, y] in [[x1, y1], [x2, y1], [x2, y2], [x1, y2]] {
            self.vertex2(x, y);
        }
        self.end()
    }

    /// Append a per-vertex color.
    pub fn color(&mut self, color: Rgba) {
        if self.accepting("color") {
            self.colors.push(color);
        }
    }

    /// Append a texture coordinate.
    pub fn tex_coord(&mut self, u: f32, v: f32) {
        if self.accepting("tex_coord") {
            self.tex_coords.push([u, v]);
        }
    }

    /// Set the state snapshot used at render time.
    pub fn set_state(&mut self, state: RenderState) {
        self.state = state;
    }

    /// Mutable access to the state snapshot.
    pub fn state_mut(&mut self) -> &mut RenderState {
        &mut self.state
    }

    /// State snapshot.
    #[must_use]
    pub const fn state(&self) -> &RenderState {
        &self.state
    }

    /// Primitive assembly mode.
    #[must_use]
    pub const fn mode(&self) -> DrawMode {
        self.mode
    }

    /// Accumulated vertices.
    #[must_use]
    pub fn vertices(&self) -> &[[f64; 3]] {
        &self.vertices
    }

    /// Per-vertex colors; empty when the state color applies.
    #[must_use]
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Texture coordinates; empty when untextured.
    #[must_use]
    pub fn tex_coords(&self) -> &[[f32; 2]] {
        &self.tex_coords
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of per-vertex colors.
    #[must_use]
    pub fn color_count(&self) -> usize {
        self.colors.len()
    }

    /// Number of texture coordinates.
    #[must_use]
    pub fn tex_coord_count(&self) -> usize {
        self.tex_coords.len()
    }

    /// Complete primitives in the batch.
    #[must_use]
    pub const fn primitive_count(&self) -> usize {
        self.mode.primitive_count(self.vertices.len())
    }

    /// True between `begin` and `end`.
    #[must_use]
    pub fn is_accumulating(&self) -> bool {
        self.phase == Phase::Accumulating
    }

    /// True once `end` has completed.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.phase == Phase::Finalized
    }

    /// Drop contents and return to the empty state.
    pub fn reset(&mut self) {
        self.vertices.clear();
        self.colors.clear();
        self.tex_coords.clear();
        self.phase = Phase::Empty;
    }

    fn accepting(&self, what: &str) -> bool {
        let open = self.phase == Phase::Accumulating;
        debug_assert!(open, "{what} supplied outside begin/end");
        if !open {
            log::warn!("{what} ignored: buffer is not accumulating");
        }
        open
    }
}

fn check_attribute(attribute: &'static str, len: usize, vertices: usize) -> Result<()> {
    if len == 0 || len == vertices {
        Ok(())
    } else {
        Err(Error::AttributeMismatch { attribute, len, vertices })
    }
}
