//! Textual pre-checks for the calculator.
//!
//! These look at the raw expression text before (or instead of) asking the
//! evaluator, mirroring what a user sees on the display.

use lazy_static::lazy_static;
use regex::Regex;

/// Substrings that mark display text as an error sentinel.
const ERROR_MARKERS: &[&str] = &["Error", "Invalid", "zero", "Format"];

lazy_static! {
    /// A `/` directly followed by a literal `0` that does not start a decimal.
    static ref DIVISION_BY_ZERO: Regex = Regex::new(r"/0(?:[^.]|$)").unwrap();

    /// Numeric prefix accepted by a lenient float parser.
    /// Allows: leading whitespace, a sign, digits with optional fraction, an
    /// exponent, or the word `Infinity` the display uses for overflow.
    static ref LEADING_NUMBER: Regex = Regex::new(
        r"^\s*[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)"
    ).unwrap();
}

/// Check if the expression divides by a literal zero.
///
/// This is a static textual check: `8/0` and `1+2/0*3` match, `10/0.5` does
/// not, and `6/(3-3)` is left to the evaluator.
pub fn is_division_by_literal_zero(expression: &str) -> bool {
    DIVISION_BY_ZERO.is_match(expression)
}

/// Parse the numeric prefix of `text`.
///
/// Returns `None` when the text does not start with a number, so `"2+3"`
/// yields `Some(2.0)` while `"π"`, `"(2)"` and `"NaN"` yield `None`.
pub fn leading_number(text: &str) -> Option<f64> {
    LEADING_NUMBER
        .find(text)
        .and_then(|m| m.as_str().trim().parse::<f64>().ok())
}

/// Check if display text reads as an error sentinel.
pub fn is_error_text(text: &str) -> bool {
    ERROR_MARKERS.iter().any(|marker| text.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_division_by_literal_zero_detected() {
        assert!(is_division_by_literal_zero("8/0"));
        assert!(is_division_by_literal_zero("1+2/0*3"));
        assert!(is_division_by_literal_zero("5/00"));
        assert!(is_division_by_literal_zero("10/05"));
    }

    #[test]
    fn test_division_by_decimal_allowed() {
        assert!(!is_division_by_literal_zero("10/0.5"));
        assert!(!is_division_by_literal_zero("10/5"));
        assert!(!is_division_by_literal_zero("10/20"));
        assert!(!is_division_by_literal_zero("6/(3-3)"));
        assert!(!is_division_by_literal_zero(""));
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("42"), Some(42.0));
        assert_eq!(leading_number("  -3.5"), Some(-3.5));
        assert_eq!(leading_number(".5"), Some(0.5));
        assert_eq!(leading_number("5."), Some(5.0));
        assert_eq!(leading_number("2+3"), Some(2.0));
        assert_eq!(leading_number("1e3"), Some(1000.0));
    }

    #[test]
    fn test_leading_number_rejects_non_numeric() {
        assert_eq!(leading_number(""), None);
        assert_eq!(leading_number("π"), None);
        assert_eq!(leading_number("(2)"), None);
        assert_eq!(leading_number("sin"), None);
        assert_eq!(leading_number("-"), None);
        assert_eq!(leading_number("."), None);
        assert_eq!(leading_number("NaN"), None);
    }

    #[test]
    fn test_leading_number_reads_infinity() {
        assert_eq!(leading_number("Infinity"), Some(f64::INFINITY));
        assert_eq!(leading_number("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(leading_number("Infinity+1"), Some(f64::INFINITY));
    }

    #[test]
    fn test_error_text() {
        assert!(is_error_text("Division by zero"));
        assert!(is_error_text("Invalid Format"));
        assert!(is_error_text("Invalid Input"));
        assert!(is_error_text("Factorial Error"));
        assert!(!is_error_text("42"));
        assert!(!is_error_text("No speech was detected. Please try again."));
    }
}
