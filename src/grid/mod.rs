//! Axis grid generation.
//!
//! Picks "nice" grid steps (`1`, `2`, `5` times a power of ten) so that a grid
//! cell stays within a configured pixel size, snaps the visible range outward
//! to whole steps, and iterates tick positions.
//!
//! - [`step`]: step selection and range rounding
//! - [`GridGenerator`]: per-axis state driven by a pane
//! - [`TickSequence`]: tick iteration
//! - [`labels`]: label text
//! - [`GridOverlay`]: grid lines and labels through a renderer

mod generator;
pub mod labels;
mod overlay;
pub mod step;
mod ticks;

pub use generator::{Alignment, Axis, GridGenerator};
pub use overlay::GridOverlay;
pub use step::{round_range_to_step, select_base_step, select_screen_step, Mantissa, StepSpec};
pub use ticks::{TickSequence, SNAP_TO_ZERO_RATIO};
