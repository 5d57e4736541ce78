//! Static-formula tools: unit conversion, health and finance calculators.

pub mod finance;
pub mod health;
pub mod units;

pub use units::{Category, convert};

/// Parse user input the way a lenient numeric field does: the leading
/// number counts, trailing text is ignored.
pub(crate) fn parse_input(text: &str) -> Option<f64> {
    crate::calculator::leading_number(text).filter(|n| n.is_finite())
}
