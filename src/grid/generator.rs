//! Per-axis grid generation from a pane's visible rectangle.

use serde::{Deserialize, Serialize};

use super::step::{
    base_step_spec, normalize_cell_limits, round_range_to_step, select_screen_step, StepSpec,
    DEFAULT_MAX_CELL_PX, DEFAULT_MIN_CELL_PX, MAX_GRID_TICKS,
};
use super::ticks::TickSequence;
use crate::config::GridConfig;
use crate::pane::RenderPane;

/// Grid axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

impl Axis {
    /// Both axes in drawing order.
    pub const ALL: [Self; 2] = [Self::X, Self::Y];
}

/// Offset between stored positions and the numbers shown to the user.
///
/// Ticks are chosen so that the *displayed* value (`position + offset`) is a
/// round number. With one-based display, position 99 is labeled "100".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Displayed value equals the stored position.
    #[default]
    ZeroBased,
    /// Displayed value is position + 1.
    OneBased,
    /// Displayed value is position - 1.
    MinusOneBased,
}

impl Alignment {
    /// Offset added to a position to get its displayed value.
    #[must_use]
    pub const fn display_offset(self) -> f64 {
        match self {
            Self::ZeroBased => 0.0,
            Self::OneBased => 1.0,
            Self::MinusOneBased => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisGrid {
    integer: bool,
    alignment: Alignment,
    spec: StepSpec,
    requested: StepSpec,
    start: f64,
    finish: f64,
    generated: bool,
}

impl Default for AxisGrid {
    fn default() -> Self {
        Self {
            integer: false,
            alignment: Alignment::ZeroBased,
            spec: StepSpec::UNIT,
            requested: StepSpec::UNIT,
            start: 0.0,
            finish: 0.0,
            generated: false,
        }
    }
}

impl AxisGrid {
    fn compute(&mut self, lo: f64, hi: f64, units_per_pixel: f64, extent_px: i32, limits: (f64, f64), auto: bool) {
        let span = hi - lo;
        if !span.is_finite() {
            log::debug!("grid axis skipped: non-finite range [{lo}, {hi}]");
            self.generated = false;
            return;
        }
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let span = span.abs();

        let nominal = if span > 0.0 { span } else { 1.0 };
        let fitted = nominal / f64::from(extent_px.max(1));
        let upp = if units_per_pixel.is_finite() && units_per_pixel > 0.0 { units_per_pixel } else { fitted };
        let screen_step = |upp: f64| select_screen_step(base_step_spec(lo, hi).step, upp, limits.0, limits.1);

        self.spec = if auto { screen_step(upp) } else { self.requested };
        self.round_to_integer();
        if span / self.spec.step > MAX_GRID_TICKS {
            log::warn!(
                "grid step {} gives over {MAX_GRID_TICKS} ticks across [{lo}, {hi}], selecting a screen step",
                self.spec.step
            );
            self.spec = screen_step(fitted);
            self.round_to_integer();
        }

        if hi == lo {
            let v = if self.integer { lo.round() } else { lo };
            self.start = v;
            self.finish = v;
        } else {
            let offset = self.alignment.display_offset();
            let (s, f) = round_range_to_step(lo + offset, hi + offset, self.spec.step);
            self.start = s - offset;
            self.finish = f - offset;
        }
        self.generated = true;
    }

    fn round_to_integer(&mut self) {
        if self.integer && !self.spec.is_integral() {
            self.spec = StepSpec::from_step(self.spec.step.round().max(1.0));
        }
    }
}

/// Computes tick positions for both axes of a pane.
///
/// Call [`generate_grid`](Self::generate_grid) once per axis after the pane
/// changes, then walk the ticks with [`begin`](Self::begin).
///
/// # Example
///
/// ```
/// use gridwork::grid::{Axis, GridGenerator};
/// use gridwork::geometry::{ModelRect, Viewport};
/// use gridwork::pane::Pane;
///
/// let pane = Pane::new(Viewport::new(0, 0, 500, 300), ModelRect::new(0.0, 0.0, 97.0, 1.0));
/// let mut grid = GridGenerator::new();
/// grid.set_cell_limits(20.0, 50.0);
/// grid.generate_grid(&pane, Axis::X);
///
/// assert_eq!(grid.step(Axis::X), 5.0);
/// assert_eq!(grid.begin(Axis::X).count(), 21);
/// ```
#[derive(Debug, Clone)]
pub struct GridGenerator {
    x: AxisGrid,
    y: AxisGrid,
    min_cell_px: f64,
    max_cell_px: f64,
    auto_step: bool,
}

impl Default for GridGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl GridGenerator {
    /// Generator with default cell limits and automatic step selection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            x: AxisGrid::default(),
            y: AxisGrid::default(),
            min_cell_px: DEFAULT_MIN_CELL_PX,
            max_cell_px: DEFAULT_MAX_CELL_PX,
            auto_step: true,
        }
    }

    /// Generator configured from a [`GridConfig`].
    #[must_use]
    pub fn from_config(config: &GridConfig) -> Self {
        let mut generator = Self::new();
        generator.set_cell_limits(config.min_cell_px, config.max_cell_px);
        generator.set_integer_mode(config.integer_x, config.integer_y);
        generator.set_alignment(Axis::X, config.alignment_x);
        generator.set_alignment(Axis::Y, config.alignment_y);
        generator.set_auto_step_update(config.auto_step);
        generator
    }

    /// Set the pixel window a grid cell should occupy.
    ///
    /// Reversed limits are swapped; the minimum is raised to one pixel.
    pub fn set_cell_limits(&mut self, min_px: f64, max_px: f64) {
        let (lo, hi) = normalize_cell_limits(min_px, max_px);
        if (lo, hi) != (min_px, max_px) {
            log::warn!("cell limits ({min_px}, {max_px}) adjusted to ({lo}, {hi})");
        }
        let (min_px, max_px) = (lo, hi);
        self.min_cell_px = min_px;
        self.max_cell_px = max_px;
    }

    /// Current `(min, max)` cell size in pixels.
    #[must_use]
    pub const fn cell_limits(&self) -> (f64, f64) {
        (self.min_cell_px, self.max_cell_px)
    }

    /// Force integral steps (and tick positions) per axis.
    pub fn set_integer_mode(&mut self, int_x: bool, int_y: bool) {
        self.x.integer = int_x;
        self.y.integer = int_y;
    }

    /// Toggle one-based display per axis.
    ///
    /// Clearing the flag returns a one-based axis to zero-based; other
    /// alignments are left alone.
    pub fn set_one_based(&mut self, one_x: bool, one_y: bool) {
        toggle_alignment(&mut self.x, one_x, Alignment::OneBased);
        toggle_alignment(&mut self.y, one_y, Alignment::OneBased);
    }

    /// Toggle minus-one-based display per axis.
    pub fn set_minus_one_based(&mut self, minus_x: bool, minus_y: bool) {
        toggle_alignment(&mut self.x, minus_x, Alignment::MinusOneBased);
        toggle_alignment(&mut self.y, minus_y, Alignment::MinusOneBased);
    }

    /// Set the alignment of one axis.
    pub fn set_alignment(&mut self, axis: Axis, alignment: Alignment) {
        self.axis_mut(axis).alignment = alignment;
    }

    /// Alignment of one axis.
    #[must_use]
    pub fn alignment(&self, axis: Axis) -> Alignment {
        self.axis(axis).alignment
    }

    /// Enable or disable automatic step selection.
    ///
    /// When disabled, each axis keeps its current step, or the one given to
    /// [`set_step`](Self::set_step). Integer-mode axes still round that step
    /// to a whole number of at least 1, and a step that would give more than
    /// [`MAX_GRID_TICKS`] ticks is replaced by a screen step for that
    /// generation only.
    pub fn set_auto_step_update(&mut self, enabled: bool) {
        if self.auto_step && !enabled {
            for grid in [&mut self.x, &mut self.y] {
                grid.requested = grid.spec;
            }
        }
        self.auto_step = enabled;
    }

    /// True if steps are chosen automatically.
    #[must_use]
    pub const fn is_auto_step(&self) -> bool {
        self.auto_step
    }

    /// Supply a step for one axis, used while auto-step is disabled.
    ///
    /// Lets a second view share the step chosen by another one. Non-positive
    /// or non-finite steps are replaced by `1.0`.
    pub fn set_step(&mut self, axis: Axis, step: f64) {
        if !step.is_finite() || step <= 0.0 {
            log::warn!("grid {axis:?}: invalid step {step}, using 1");
        }
        let grid = self.axis_mut(axis);
        grid.requested = StepSpec::from_step(step);
        grid.spec = grid.requested;
    }

    /// Compute step and rounded range for one axis of `pane`.
    ///
    /// Uses the pane's visible rectangle and data-units-per-pixel scale. A
    /// zero-width range yields a single tick at that value.
    pub fn generate_grid<P: RenderPane + ?Sized>(&mut self, pane: &P, axis: Axis) {
        let rect = pane.visible_rect();
        let vp = pane.viewport();
        let (lo, hi, upp, extent) = match axis {
            Axis::X => (rect.left, rect.right, pane.scale_x().abs(), vp.width),
            Axis::Y => (rect.bottom, rect.top, pane.scale_y().abs(), vp.height),
        };
        let limits = (self.min_cell_px, self.max_cell_px);
        let auto = self.auto_step;
        let grid = self.axis_mut(axis);
        grid.compute(lo, hi, upp, extent, limits, auto);

        log::debug!(
            "grid {axis:?}: step {} over [{}, {}] ({:?})",
            grid.spec.step,
            grid.start,
            grid.finish,
            grid.alignment
        );
    }

    /// Generate both axes.
    pub fn generate<P: RenderPane + ?Sized>(&mut self, pane: &P) {
        for axis in Axis::ALL {
            self.generate_grid(pane, axis);
        }
    }

    /// Ticks of one axis. Empty until the axis has been generated.
    #[must_use]
    pub fn begin(&self, axis: Axis) -> TickSequence {
        let grid = self.axis(axis);
        if grid.generated {
            TickSequence::new(grid.start, grid.finish, grid.spec.step)
        } else {
            TickSequence::END
        }
    }

    /// The exhausted sequence, for comparison against a running one.
    #[must_use]
    pub const fn end(&self, _axis: Axis) -> TickSequence {
        TickSequence::END
    }

    /// Current step of one axis.
    #[must_use]
    pub fn step(&self, axis: Axis) -> f64 {
        self.axis(axis).spec.step
    }

    /// Step with its ladder position.
    #[must_use]
    pub fn step_spec(&self, axis: Axis) -> StepSpec {
        self.axis(axis).spec
    }

    /// First tick position of one axis.
    #[must_use]
    pub fn start(&self, axis: Axis) -> f64 {
        self.axis(axis).start
    }

    /// Last tick position of one axis.
    #[must_use]
    pub fn finish(&self, axis: Axis) -> f64 {
        self.axis(axis).finish
    }

    /// Rounded `(start, finish)` of one axis in stored positions.
    #[must_use]
    pub fn range(&self, axis: Axis) -> (f64, f64) {
        let grid = self.axis(axis);
        (grid.start, grid.finish)
    }

    /// Value shown to the user for a tick position.
    #[must_use]
    pub fn display_value(&self, axis: Axis, position: f64) -> f64 {
        position + self.axis(axis).alignment.display_offset()
    }

    fn axis(&self, axis: Axis) -> &AxisGrid {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut AxisGrid {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }
}

fn toggle_alignment(grid: &mut AxisGrid, enabled: bool, alignment: Alignment) {
    if enabled {
        grid.alignment = alignment;
    } else if grid.alignment == alignment {
        grid.alignment = Alignment::ZeroBased;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ModelRect, Viewport};
    use crate::pane::Pane;

    fn pane(left: f64, right: f64, width: i32) -> Pane {
        Pane::new(Viewport::new(0, 0, width, 200), ModelRect::new(left, 0.0, right, 10.0))
    }

    #[test]
    fn test_end_to_end_example() {
        let mut grid = GridGenerator::new();
        grid.set_cell_limits(20.0, 50.0);
        grid.generate_grid(&pane(0.0, 97.0, 500), Axis::X);

        assert_eq!(grid.step(Axis::X), 5.0);
        assert_eq!(grid.range(Axis::X), (0.0, 100.0));
        let ticks: Vec<f64> = grid.begin(Axis::X).collect();
        assert_eq!(ticks.len(), 21);
        assert_eq!(ticks.first(), Some(&0.0));
        assert_eq!(ticks.last(), Some(&100.0));
    }

    #[test]
    fn test_begin_before_generate_is_empty() {
        let grid = GridGenerator::new();
        assert_eq!(grid.begin(Axis::X), grid.end(Axis::X));
        assert_eq!(grid.begin(Axis::Y).count(), 0);
    }

    #[test]
    fn test_one_based_alignment() {
        let mut grid = GridGenerator::new();
        grid.set_cell_limits(20.0, 50.0);
        grid.set_one_based(true, false);
        grid.generate_grid(&pane(0.0, 97.0, 500), Axis::X);

        let ticks: Vec<f64> = grid.begin(Axis::X).collect();
        assert_eq!(ticks.first(), Some(&-1.0));
        assert!(ticks.contains(&4.0));
        assert!(ticks.contains(&99.0));
        assert_eq!(grid.display_value(Axis::X, 99.0), 100.0);
        for t in ticks {
            let shown = grid.display_value(Axis::X, t);
            assert_eq!(shown % 5.0, 0.0, "{t} displays as {shown}");
        }
    }

    #[test]
    fn test_minus_one_based_alignment() {
        let mut grid = GridGenerator::new();
        grid.set_cell_limits(20.0, 50.0);
        grid.set_minus_one_based(true, false);
        grid.generate_grid(&pane(0.0, 97.0, 500), Axis::X);

        assert!(grid.begin(Axis::X).all(|t| (t - 1.0) % 5.0 == 0.0));
        assert_eq!(grid.alignment(Axis::X), Alignment::MinusOneBased);
    }

    #[test]
    fn test_clearing_one_based_keeps_other_alignment() {
        let mut grid = GridGenerator::new();
        grid.set_minus_one_based(true, true);
        grid.set_one_based(false, false);
        assert_eq!(grid.alignment(Axis::X), Alignment::MinusOneBased);
        grid.set_one_based(true, false);
        grid.set_one_based(false, false);
        assert_eq!(grid.alignment(Axis::X), Alignment::ZeroBased);
    }

    #[test]
    fn test_integer_mode() {
        let mut grid = GridGenerator::new();
        grid.set_integer_mode(true, false);
        // 2 units over 1000 px would pick 0.05 without integer mode
        let p = pane(10.0, 12.0, 1000);
        grid.generate_grid(&p, Axis::X);
        assert_eq!(grid.step(Axis::X), 1.0);
        assert!(grid.begin(Axis::X).all(|t| t.fract() == 0.0));
    }

    #[test]
    fn test_degenerate_range_single_tick() {
        let mut grid = GridGenerator::new();
        grid.generate_grid(&pane(42.5, 42.5, 400), Axis::X);
        let ticks: Vec<f64> = grid.begin(Axis::X).collect();
        assert_eq!(ticks, vec![42.5]);
        assert!(grid.step(Axis::X) > 0.0);
    }

    #[test]
    fn test_reversed_range() {
        let mut grid = GridGenerator::new();
        grid.set_cell_limits(20.0, 50.0);
        grid.generate_grid(&pane(97.0, 0.0, 500), Axis::X);
        assert_eq!(grid.step(Axis::X), 5.0);
        assert_eq!(grid.range(Axis::X), (0.0, 100.0));
    }

    #[test]
    fn test_manual_step() {
        let mut grid = GridGenerator::new();
        grid.set_auto_step_update(false);
        grid.set_step(Axis::X, 25.0);
        grid.generate_grid(&pane(0.0, 97.0, 500), Axis::X);
        assert_eq!(grid.step(Axis::X), 25.0);
        assert_eq!(grid.range(Axis::X), (0.0, 100.0));
    }

    #[test]
    fn test_manual_step_rounded_in_integer_mode() {
        let mut grid = GridGenerator::new();
        grid.set_integer_mode(true, false);
        grid.set_auto_step_update(false);
        grid.set_step(Axis::X, 2.5);
        grid.generate_grid(&pane(0.0, 97.0, 500), Axis::X);
        assert_eq!(grid.step(Axis::X), 3.0);
        assert!(grid.begin(Axis::X).all(|t| t.fract() == 0.0));

        grid.set_step(Axis::X, 0.25);
        grid.generate_grid(&pane(0.0, 97.0, 500), Axis::X);
        assert_eq!(grid.step(Axis::X), 1.0);
    }

    #[test]
    fn test_disabling_auto_keeps_current_step() {
        let mut grid = GridGenerator::new();
        grid.set_cell_limits(20.0, 50.0);
        grid.generate_grid(&pane(0.0, 97.0, 500), Axis::X);
        grid.set_auto_step_update(false);
        grid.generate_grid(&pane(0.0, 9700.0, 500), Axis::X);
        assert_eq!(grid.step(Axis::X), 5.0);
    }

    #[test]
    fn test_overflowing_span_is_not_generated() {
        let mut grid = GridGenerator::new();
        grid.generate_grid(&pane(-1.0e308, 1.0e308, 500), Axis::X);
        assert_eq!(grid.begin(Axis::X), TickSequence::END);
        assert_eq!(grid.begin(Axis::X).count(), 0);
    }

    #[test]
    fn test_dense_manual_step_falls_back() {
        let mut grid = GridGenerator::new();
        grid.set_cell_limits(20.0, 50.0);
        grid.set_auto_step_update(false);
        grid.set_step(Axis::X, 1e-6);
        grid.generate_grid(&pane(0.0, 97.0, 500), Axis::X);
        assert_eq!(grid.step(Axis::X), 5.0);
        assert_eq!(grid.begin(Axis::X).count(), 21);

        // the requested step is kept for narrower ranges
        grid.generate_grid(&pane(0.0, 0.01, 500), Axis::X);
        assert!((grid.step(Axis::X) - 1e-6).abs() < 1e-15);
    }

    #[test]
    fn test_cell_limits_normalized() {
        let mut grid = GridGenerator::new();
        grid.set_cell_limits(80.0, 10.0);
        assert_eq!(grid.cell_limits(), (10.0, 80.0));
    }

    #[test]
    fn test_from_config() {
        let config = GridConfig {
            min_cell_px: 20.0,
            max_cell_px: 50.0,
            integer_x: true,
            alignment_y: Alignment::OneBased,
            ..GridConfig::default()
        };
        let grid = GridGenerator::from_config(&config);
        assert_eq!(grid.cell_limits(), (20.0, 50.0));
        assert_eq!(grid.alignment(Axis::Y), Alignment::OneBased);
        assert_eq!(grid.alignment(Axis::X), Alignment::ZeroBased);
    }
}
