//! Number formatting for the display and history.
//!
//! Results are rounded to 14 significant digits to hide binary floating
//! point noise (`0.1 + 0.2` shows as `0.3`), then printed in the shortest
//! form that reads back to the same number.

use super::evaluation::Value;

/// Significant digits kept when formatting a computed value.
pub const SIGNIFICANT_DIGITS: usize = 14;

/// Format an evaluator value for the display.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Number(n) => format_number(*n),
        Value::Text(text) => text.clone(),
    }
}

/// Round to [`SIGNIFICANT_DIGITS`] and render.
pub fn format_number(value: f64) -> String {
    render(round_significant(value, SIGNIFICANT_DIGITS))
}

/// Round to a fixed number of decimals and render without trailing zeros.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return render(value);
    }
    let fixed = format!("{:.*}", decimals, value);
    render(fixed.parse().unwrap_or(value))
}

fn round_significant(value: f64, digits: usize) -> f64 {
    if !value.is_finite() || value == 0.0 {
        return value;
    }
    let scientific = format!("{:.*e}", digits.saturating_sub(1), value);
    scientific.parse().unwrap_or(value)
}

/// Shortest round-trip rendering with exponent notation outside
/// `[1e-6, 1e21)`.
fn render(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }
    if value == 0.0 {
        // Covers negative zero too.
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{}", value);
    }

    let scientific = format!("{:e}", value);
    match scientific.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => scientific,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floating_point_noise_removed() {
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(1.0 / 3.0), "0.33333333333333");
        assert_eq!(format_number(2.0 / 3.0), "0.66666666666667");
        assert_eq!(format_number(1.1 * 3.0), "3.3");
    }

    #[test]
    fn test_integers() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(120.0), "120");
        assert_eq!(format_number(-7.0), "-7");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1e20), "100000000000000000000");
    }

    #[test]
    fn test_exponent_notation() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(2.5e-7), "2.5e-7");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(3628800.0 * 1e20), "3.6288e+26");
    }

    #[test]
    fn test_special_values() {
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_text_values_pass_through() {
        assert_eq!(format_value(&Value::Text("5 kg".to_string())), "5 kg");
        assert_eq!(format_value(&Value::Number(0.5)), "0.5");
    }

    #[test]
    fn test_fixed() {
        assert_eq!(format_fixed(3.280839895013123, 6), "3.28084");
        assert_eq!(format_fixed(1000.0, 6), "1000");
        assert_eq!(format_fixed(0.0000001, 6), "0");
    }
}
