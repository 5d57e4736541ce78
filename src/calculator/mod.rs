//! Calculator core.
//!
//! This module provides functionality to:
//! - Classify keypad labels into typed tokens
//! - Run the expression input state machine
//! - Evaluate expressions using fasteval (or fend)
//! - Format results for the display and history

mod detection;
mod evaluation;
mod format;
mod machine;
mod token;

pub use detection::{is_division_by_literal_zero, is_error_text, leading_number};
pub use evaluation::{
    Engine, EvalError, Evaluator, FastevalEvaluator, FendEvaluator, Value, factorial,
    substitute_glyphs,
};
pub use format::{SIGNIFICANT_DIGITS, format_fixed, format_number, format_value};
pub use machine::{CalcError, Calculator, DisplayResult, Mode, Transition};
pub use token::{
    BASIC_KEYPAD, Control, Function, Operator, SCIENTIFIC_KEYPAD, Symbol, Token,
};
