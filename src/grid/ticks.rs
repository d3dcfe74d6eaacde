//! Forward iteration over tick positions.

/// Ticks closer to zero than this fraction of a step are emitted as exactly 0.
pub const SNAP_TO_ZERO_RATIO: f64 = 0.001;

/// Fraction of a step by which the last tick may overshoot `finish`.
const END_TOLERANCE: f64 = 1e-9;

/// Tick counts from here on are no longer exact in f64 and are estimated.
const EXACT_COUNT_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Sequence of tick positions `start, start + step, ...` up to `finish`.
///
/// Each value is computed from its index, so error does not accumulate over
/// long runs. All exhausted sequences compare equal to [`TickSequence::END`].
///
/// # Example
///
/// ```
/// use gridwork::grid::TickSequence;
///
/// let ticks: Vec<f64> = TickSequence::new(0.0, 20.0, 5.0).collect();
/// assert_eq!(ticks, vec![0.0, 5.0, 10.0, 15.0, 20.0]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TickSequence {
    start: f64,
    finish: f64,
    step: f64,
    index: u64,
    value: f64,
}

impl TickSequence {
    /// The exhausted sequence.
    pub const END: Self = Self { start: 0.0, finish: -1.0, step: 1.0, index: 0, value: 0.0 };

    /// Create a sequence over `[start, finish]`.
    ///
    /// A non-positive or non-finite step is replaced by `1.0`. Non-finite
    /// bounds give an empty sequence.
    #[must_use]
    pub fn new(start: f64, finish: f64, step: f64) -> Self {
        if !start.is_finite() || !finish.is_finite() {
            return Self::END;
        }
        let step = if step.is_finite() && step > 0.0 { step } else { 1.0 };
        let mut seq = Self { start, finish, step, index: 0, value: start };
        seq.value = seq.value_at(0);
        seq
    }

    /// Value of the `n`-th tick, ignoring the upper bound.
    #[must_use]
    pub fn value_at(&self, n: u64) -> f64 {
        let v = self.start + n as f64 * self.step;
        if (v / self.step).abs() < SNAP_TO_ZERO_RATIO {
            0.0
        } else {
            v
        }
    }

    /// Current tick, `None` once exhausted.
    #[must_use]
    pub fn current(&self) -> Option<f64> {
        (!self.is_end()).then_some(self.value)
    }

    /// Move to the next tick. No-op when exhausted.
    pub fn advance(&mut self) {
        if !self.is_end() {
            self.index += 1;
            self.value = self.value_at(self.index);
        }
    }

    /// True once the current value lies beyond `finish`.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.beyond(self.value)
    }

    /// Rewind to the first tick.
    pub fn restart(&mut self) {
        self.index = 0;
        self.value = self.value_at(0);
    }

    /// Step between ticks.
    #[must_use]
    pub const fn step(&self) -> f64 {
        self.step
    }

    /// First tick position.
    #[must_use]
    pub const fn start(&self) -> f64 {
        self.start
    }

    /// Upper bound.
    #[must_use]
    pub const fn finish(&self) -> f64 {
        self.finish
    }

    /// Total number of ticks from the first one, regardless of position.
    ///
    /// Saturates at `usize::MAX` when the span overflows f64 or the count
    /// does not fit.
    #[must_use]
    pub fn tick_count(&self) -> usize {
        if self.beyond(self.value_at(0)) {
            return 0;
        }
        let estimate = ((self.finish - self.start) / self.step).floor();
        if !estimate.is_finite() {
            return usize::MAX;
        }
        if estimate >= EXACT_COUNT_LIMIT {
            return usize::try_from((estimate as u64).saturating_add(1)).unwrap_or(usize::MAX);
        }
        let mut last = if estimate.is_finite() && estimate > 0.0 { estimate as u64 } else { 0 };
        while last > 0 && self.beyond(self.value_at(last)) {
            last -= 1;
        }
        while !self.beyond(self.value_at(last + 1)) {
            last += 1;
        }
        usize::try_from(last + 1).unwrap_or(usize::MAX)
    }

    fn beyond(&self, v: f64) -> bool {
        // negated so NaN counts as past the end
        !(v <= self.finish + self.step * END_TOLERANCE)
    }
}

impl Default for TickSequence {
    fn default() -> Self {
        Self::END
    }
}

impl PartialEq for TickSequence {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_end(), other.is_end()) {
            (true, true) => true,
            (false, false) => {
                self.start == other.start
                    && self.finish == other.finish
                    && self.step == other.step
                    && self.index == other.index
            }
            _ => false,
        }
    }
}

impl Iterator for TickSequence {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let v = self.current()?;
        self.advance();
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len();
        (n, Some(n))
    }
}

impl ExactSizeIterator for TickSequence {
    fn len(&self) -> usize {
        if self.is_end() {
            return 0;
        }
        let consumed = usize::try_from(self.index).unwrap_or(usize::MAX);
        self.tick_count().saturating_sub(consumed)
    }
}

impl std::iter::FusedIterator for TickSequence {}
