//! Nice-number step selection.
//!
//! Steps live on the 1-2-5 ladder: `..., 0.1, 0.2, 0.5, 1, 2, 5, 10, 20, ...`.
//! Consecutive rungs differ by a factor of 2 or 2.5, so any pixel window
//! `[min_px, max_px]` with `max_px >= 2.5 * min_px` always contains a rung.

/// Per-decade step multipliers.
pub const STEP_MULTIPLIERS: [f64; 3] = [1.0, 2.0, 5.0];

/// Upper bound on the number of base steps across a range.
pub const MAX_BASE_TICKS: f64 = 10.0;

/// Most ticks one axis may produce; denser external steps are replaced by a
/// screen step.
pub const MAX_GRID_TICKS: f64 = 100_000.0;

/// Smallest accepted cell size in pixels.
pub const MIN_CELL_PX: f64 = 1.0;

/// Default minimum cell size in pixels.
pub const DEFAULT_MIN_CELL_PX: f64 = 20.0;

/// Default maximum cell size in pixels.
pub const DEFAULT_MAX_CELL_PX: f64 = 100.0;

/// Hard limit on ladder walking; f64 spans about 1850 rungs.
const MAX_LADDER_STEPS: usize = 4096;

/// Relative tolerance when recognizing a value as a ladder rung.
const RUNG_TOLERANCE: f64 = 1e-9;

/// Mantissa class of a nice step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mantissa {
    /// 1 × 10^e
    One,
    /// 2 × 10^e
    Two,
    /// 5 × 10^e
    Five,
}

impl Mantissa {
    /// Numeric multiplier.
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::One => STEP_MULTIPLIERS[0],
            Self::Two => STEP_MULTIPLIERS[1],
            Self::Five => STEP_MULTIPLIERS[2],
        }
    }
}

/// A chosen step together with its position on the 1-2-5 ladder.
///
/// For steps picked by the selector `step == mantissa * 10^exponent`.
/// Externally supplied steps keep their exact value; `mantissa` and
/// `exponent` then name the rung at or below it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSpec {
    /// Step in data units.
    pub step: f64,
    /// Mantissa class.
    pub mantissa: Mantissa,
    /// Decimal exponent.
    pub exponent: i32,
}

impl StepSpec {
    /// The unit step, used as fallback for every degenerate input.
    pub const UNIT: Self = Self { step: 1.0, mantissa: Mantissa::One, exponent: 0 };

    /// Ladder rung `mantissa * 10^exponent`.
    #[must_use]
    pub fn new(mantissa: Mantissa, exponent: i32) -> Self {
        Self { step: mantissa.value() * 10f64.powi(exponent), mantissa, exponent }
    }

    /// Describe an arbitrary step.
    ///
    /// Values that sit on the ladder (within rounding) are snapped to the exact
    /// rung. Non-finite or non-positive steps give [`StepSpec::UNIT`].
    #[must_use]
    pub fn from_step(step: f64) -> Self {
        if !step.is_finite() || step <= 0.0 {
            return Self::UNIT;
        }
        let mut exponent = step.log10().floor() as i32;
        let mut m = step / 10f64.powi(exponent);
        // log10 can land one decade off near exact powers of ten
        if m >= 10.0 * (1.0 - RUNG_TOLERANCE) {
            exponent += 1;
            m /= 10.0;
        } else if m < 1.0 - RUNG_TOLERANCE {
            exponent -= 1;
            m *= 10.0;
        }

        for mantissa in [Mantissa::One, Mantissa::Two, Mantissa::Five] {
            if (m - mantissa.value()).abs() <= mantissa.value() * RUNG_TOLERANCE {
                return Self::new(mantissa, exponent);
            }
        }
        if (m - 10.0).abs() <= 10.0 * RUNG_TOLERANCE {
            return Self::new(Mantissa::One, exponent + 1);
        }

        let mantissa = if m >= 5.0 {
            Mantissa::Five
        } else if m >= 2.0 {
            Mantissa::Two
        } else {
            Mantissa::One
        };
        Self { step, mantissa, exponent }
    }

    /// Next larger rung.
    #[must_use]
    pub fn up(self) -> Self {
        match self.mantissa {
            Mantissa::One => Self::new(Mantissa::Two, self.exponent),
            Mantissa::Two => Self::new(Mantissa::Five, self.exponent),
            Mantissa::Five => Self::new(Mantissa::One, self.exponent.saturating_add(1)),
        }
    }

    /// Next smaller rung.
    #[must_use]
    pub fn down(self) -> Self {
        match self.mantissa {
            Mantissa::One => Self::new(Mantissa::Five, self.exponent.saturating_sub(1)),
            Mantissa::Two => Self::new(Mantissa::One, self.exponent),
            Mantissa::Five => Self::new(Mantissa::Two, self.exponent),
        }
    }

    /// True if every multiple of the step is a whole number.
    #[must_use]
    pub fn is_integral(self) -> bool {
        self.step >= 1.0 && self.step.fract() == 0.0
    }

    /// Fractional digits needed to print multiples of this step exactly.
    #[must_use]
    pub fn decimals(self) -> usize {
        (0..=15)
            .find(|&d| {
                let scaled = self.step * 10f64.powi(d);
                (scaled - scaled.round()).abs() <= scaled.abs().max(1.0) * RUNG_TOLERANCE
            })
            .map_or(15, |d| d as usize)
    }
}

impl Default for StepSpec {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Select the base step for a data range.
///
/// Returns the smallest ladder rung that splits `|max - min|` into at most
/// [`MAX_BASE_TICKS`] steps. A zero or non-finite span is treated as `1.0`.
///
/// # Example
///
/// ```
/// use gridwork::grid::step::select_base_step;
///
/// assert_eq!(select_base_step(0.0, 97.0), 10.0);
/// assert_eq!(select_base_step(97.0, 0.0), 10.0);
/// ```
#[must_use]
pub fn select_base_step(min: f64, max: f64) -> f64 {
    base_step_spec(min, max).step
}

pub(crate) fn base_step_spec(min: f64, max: f64) -> StepSpec {
    let span = (max - min).abs();
    let span = if span == 0.0 || !span.is_finite() { 1.0 } else { span };

    // start one decade below the span so the first qualifying rung is the smallest
    let mut spec = StepSpec::new(Mantissa::One, span.log10().floor() as i32 - 1);
    let mut guard = 0;
    while span / spec.step > MAX_BASE_TICKS && guard < MAX_LADDER_STEPS {
        spec = spec.up();
        guard += 1;
    }
    spec
}

/// Normalize a pair of cell-size limits.
///
/// Reversed bounds are swapped, the minimum is raised to [`MIN_CELL_PX`] and
/// non-finite values fall back to the defaults.
#[must_use]
pub fn normalize_cell_limits(min_px: f64, max_px: f64) -> (f64, f64) {
    let min_px = if min_px.is_finite() { min_px } else { DEFAULT_MIN_CELL_PX };
    let max_px = if max_px.is_finite() { max_px } else { DEFAULT_MAX_CELL_PX };
    let (lo, hi) = if min_px <= max_px { (min_px, max_px) } else { (max_px, min_px) };
    let lo = lo.max(MIN_CELL_PX);
    (lo, hi.max(lo))
}

/// Adjust a base step so that one step spans `min_px..=max_px` pixels.
///
/// `units_per_pixel` is the data-to-pixel scale of the axis. The step first
/// climbs the ladder until it is at least `min_px` wide, then descends while it
/// is wider than `max_px` and the next rung down still honors `min_px`. When
/// the window is narrower than one rung the minimum wins.
///
/// Non-finite or non-positive scales give [`StepSpec::UNIT`].
///
/// # Example
///
/// ```
/// use gridwork::grid::step::select_screen_step;
///
/// // 97 units over 500 px, cells of 20..50 px
/// let spec = select_screen_step(10.0, 97.0 / 500.0, 20.0, 50.0);
/// assert_eq!(spec.step, 5.0);
/// ```
#[must_use]
pub fn select_screen_step(base_step: f64, units_per_pixel: f64, min_px: f64, max_px: f64) -> StepSpec {
    let (min_px, max_px) = normalize_cell_limits(min_px, max_px);
    if !units_per_pixel.is_finite() || units_per_pixel <= 0.0 {
        log::trace!("screen step: unusable scale {units_per_pixel}, using unit step");
        return StepSpec::UNIT;
    }

    let pixels = |spec: &StepSpec| spec.step / units_per_pixel;
    let mut spec = StepSpec::from_step(base_step);
    let mut guard = 0;

    while pixels(&spec) < min_px && guard < MAX_LADDER_STEPS {
        spec = spec.up();
        guard += 1;
    }
    while pixels(&spec) > max_px && guard < MAX_LADDER_STEPS {
        let smaller = spec.down();
        if pixels(&smaller) < min_px {
            break;
        }
        spec = smaller;
        guard += 1;
    }

    log::trace!(
        "screen step: base {base_step} -> {} ({:.1} px, window {min_px}..{max_px})",
        spec.step,
        pixels(&spec)
    );
    spec
}

/// Snap a range outward to multiples of `step`.
///
/// The returned `start` is the largest multiple `<=` the lower bound and
/// `finish` the smallest multiple `>=` the upper bound. Reversed input is
/// reordered; an invalid step is replaced by `1.0`.
#[must_use]
pub fn round_range_to_step(start: f64, finish: f64, step: f64) -> (f64, f64) {
    let step = if step.is_finite() && step > 0.0 { step } else { 1.0 };
    let (lo, hi) = if start <= finish { (start, finish) } else { (finish, start) };

    let mut s = (lo / step).floor() * step;
    if s > lo {
        s -= step;
    }
    let mut f = (hi / step).ceil() * step;
    if f < hi {
        f += step;
    }
    (s, f)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn is_multiple(value: f64, step: f64) -> bool {
        let k = value / step;
        (k - k.round()).abs() <= 1e-9 * k.abs().max(1.0)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// Pixel spacing lands inside the window whenever the window spans a rung.
        #[test]
        fn prop_screen_step_within_window(
            a in -1.0e6f64..1.0e6,
            width in 1.0e-3f64..1.0e6,
            viewport_px in 50.0f64..4000.0,
            min_px in 2.0f64..80.0,
            ratio in 3.0f64..10.0,
        ) {
            let b = a + width;
            let max_px = min_px * ratio;
            let units_per_pixel = (b - a) / viewport_px;
            let spec = select_screen_step(select_base_step(a, b), units_per_pixel, min_px, max_px);
            let px = spec.step / units_per_pixel;
            prop_assert!(px >= min_px * (1.0 - 1e-9), "{} px below {}", px, min_px);
            prop_assert!(px <= max_px * (1.0 + 1e-9), "{} px above {}", px, max_px);
        }

        /// Rounded bounds bracket the range and sit on step multiples.
        #[test]
        fn prop_round_range_brackets(
            a in -1.0e6f64..1.0e6,
            width in 0.0f64..1.0e5,
            exponent in -3i32..4,
            mantissa in 0usize..3,
        ) {
            let b = a + width;
            let step = STEP_MULTIPLIERS[mantissa] * 10f64.powi(exponent);
            let (s, f) = round_range_to_step(a, b, step);
            prop_assert!(s <= a);
            prop_assert!(f >= b);
            prop_assert!(is_multiple(s, step), "{} not a multiple of {}", s, step);
            prop_assert!(is_multiple(f, step), "{} not a multiple of {}", f, step);
        }

        /// Base step never exceeds the tick budget and is the smallest such rung.
        #[test]
        fn prop_base_step_smallest(a in -1.0e9f64..1.0e9, width in 1.0e-6f64..1.0e9) {
            let b = a + width;
            let span = (b - a).abs();
            let spec = base_step_spec(a, b);
            prop_assert!(span / spec.step <= MAX_BASE_TICKS * (1.0 + 1e-12));
            prop_assert!(span / spec.down().step > MAX_BASE_TICKS * (1.0 - 1e-12));
        }
    }
}
