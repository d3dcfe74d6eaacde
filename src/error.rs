//! Error types for gridwork operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gridwork operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// Invalid dimensions for a framebuffer or render surface.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// A begin/end bracket was used out of order.
    #[error("Protocol violation: {0}")]
    Protocol(#[from] ProtocolError),

    /// Attribute arrays of a geometry buffer are out of step with its vertices.
    #[error("Attribute mismatch: {attribute} has {len} entries, expected {vertices}")]
    AttributeMismatch {
        /// Attribute name ("colors" or "tex_coords").
        attribute: &'static str,
        /// Number of attribute entries.
        len: usize,
        /// Number of vertices.
        vertices: usize,
    },

    /// Configuration parsing error.
    #[error("Config parse error at line {line}: {message}")]
    ConfigParse {
        /// Line number (1-based, 0 if unknown).
        line: usize,
        /// Parser message.
        message: String,
    },
}

/// Misuse of a bracketed rendering protocol.
///
/// These are programming errors in the caller. They are reported instead of
/// producing corrupt geometry.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// `begin` while a bracket is already open.
    #[error("begin called inside an open begin/end bracket")]
    NestedBegin,

    /// `end` without a matching `begin`.
    #[error("end called without a matching begin")]
    EndWithoutBegin,

    /// Submitting a buffer that has not been finalized with `end`.
    #[error("buffer submitted before end")]
    RenderOpenBuffer,

    /// Starting text while geometry is being accumulated.
    #[error("text requested while a geometry bracket is open")]
    TextWhileAccumulating,

    /// Closing a pane that is not open.
    #[error("pane is not open")]
    PaneNotOpen,

    /// `end_clipping_rect` without a matching `begin_clipping_rect`.
    #[error("clipping rect ended without a matching begin")]
    ClipUnderflow,
}
