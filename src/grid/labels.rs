//! Tick label formatting.

use super::step::StepSpec;
use crate::font::FontMetrics;

/// Suffixes for thousands, millions and billions.
const POSTFIXES: [&str; 4] = ["", " K", " M", " G"];

/// Integer with comma thousands separators.
///
/// With `postfix`, trailing zero groups are folded into a unit suffix:
/// `5_000_000` becomes `"5 M"`, `1_500_000` stays `"1,500 K"`.
///
/// # Example
///
/// ```
/// use gridwork::grid::labels::separated_number;
///
/// assert_eq!(separated_number(1_234_567, false), "1,234,567");
/// assert_eq!(separated_number(-20_000, true), "-20 K");
/// ```
#[must_use]
pub fn separated_number(number: i64, postfix: bool) -> String {
    let negative = number < 0;
    let mut magnitude = number.unsigned_abs();
    let mut suffix = 0;

    if postfix && magnitude != 0 {
        while magnitude % 1000 == 0 && suffix < POSTFIXES.len() - 1 {
            magnitude /= 1000;
            suffix += 1;
        }
    }

    let digits = magnitude.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    if negative {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.push_str(POSTFIXES[suffix]);
    out
}

/// Label for a tick value printed with the precision its step needs.
///
/// Whole-number steps use thousands separators.
#[must_use]
pub fn tick_label(value: f64, step: StepSpec) -> String {
    let decimals = step.decimals();
    if decimals == 0 && value.abs() < 9.0e15 {
        return separated_number(value.round() as i64, false);
    }
    let text = format!("{value:.decimals$}");
    // "-0.0" after rounding a tiny negative value
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_owned()
    } else {
        text
    }
}

/// Widest label any integer up to `max_number` can produce.
///
/// Assumes every digit is as wide as the widest one.
#[must_use]
pub fn max_label_width<F: FontMetrics + ?Sized>(font: &F, max_number: i64) -> f64 {
    let digit_count = max_number.unsigned_abs().to_string().len();
    let widest_digit = ('0'..='9').map(|c| font.advance(c)).fold(0.0, f64::max);
    let separators = (digit_count - 1) / 3;
    let sign = if max_number < 0 { font.advance('-') } else { 0.0 };
    widest_digit * digit_count as f64 + font.advance(',') * separators as f64 + sign
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BitmapFont;
    use crate::grid::step::Mantissa;

    #[test]
    fn test_separated_number() {
        assert_eq!(separated_number(0, false), "0");
        assert_eq!(separated_number(999, false), "999");
        assert_eq!(separated_number(1000, false), "1,000");
        assert_eq!(separated_number(-1_234_567, false), "-1,234,567");
        assert_eq!(separated_number(i64::MIN, false), "-9,223,372,036,854,775,808");
    }

    #[test]
    fn test_postfix() {
        assert_eq!(separated_number(0, true), "0");
        assert_eq!(separated_number(5000, true), "5 K");
        assert_eq!(separated_number(5_000_000, true), "5 M");
        assert_eq!(separated_number(1_500_000, true), "1,500 K");
        assert_eq!(separated_number(7_000_000_000_000, true), "7,000 G");
        assert_eq!(separated_number(1234, true), "1,234");
    }

    #[test]
    fn test_tick_label() {
        assert_eq!(tick_label(25_000.0, StepSpec::new(Mantissa::Five, 3)), "25,000");
        assert_eq!(tick_label(0.30000000000000004, StepSpec::new(Mantissa::One, -1)), "0.3");
        assert_eq!(tick_label(-0.00001, StepSpec::new(Mantissa::Two, -2)), "0.00");
        assert_eq!(tick_label(1.5, StepSpec::from_step(0.25)), "1.50");
    }

    #[test]
    fn test_max_label_width() {
        let font = BitmapFont::new(1);
        assert!((max_label_width(&font, 0) - 6.0).abs() < 1e-12);
        // 7 digits, 2 commas
        assert!((max_label_width(&font, 1_000_000) - 54.0).abs() < 1e-12);
        assert!((max_label_width(&font, -999) - 24.0).abs() < 1e-12);
    }
}
