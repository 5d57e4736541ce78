//! Expression evaluation.
//!
//! The calculator only needs "text in, value out", so the engines sit
//! behind the [`Evaluator`] trait. Two engines ship: fasteval (the default)
//! and fend.

use std::f64::consts::{E, PI};
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest argument whose factorial fits in an `f64`.
const MAX_FACTORIAL: f64 = 170.0;

/// Value produced by an evaluator.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A plain number.
    Number(f64),
    /// Anything the engine could only express as text (units, fractions...).
    Text(String),
}

impl Value {
    /// Get the numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(t) => f.write_str(t),
        }
    }
}

/// The engine rejected the expression.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("cannot evaluate {expression:?}: {reason}")]
pub struct EvalError {
    pub expression: String,
    pub reason: String,
}

impl EvalError {
    pub fn new(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            reason: reason.into(),
        }
    }
}

/// Something that turns expression text into a value.
pub trait Evaluator: Send {
    /// Evaluate `expression`, which may still contain display glyphs
    /// (`√`, `π`) and postfix `!`.
    fn evaluate(&self, expression: &str) -> Result<Value, EvalError>;

    /// Short engine name for logs.
    fn name(&self) -> &'static str;
}

/// Available engines, as named in the config file and on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    #[default]
    Fasteval,
    Fend,
}

impl Engine {
    /// Build the evaluator for this engine.
    pub fn evaluator(self) -> Box<dyn Evaluator> {
        match self {
            Self::Fasteval => Box::new(FastevalEvaluator),
            Self::Fend => Box::new(FendEvaluator),
        }
    }
}

lazy_static! {
    /// A digit, closing paren, factorial, `π` or `e` directly before `π` or `√`.
    static ref IMPLICIT_PRODUCT: Regex = Regex::new(r"([\d)!πe])([π√])").unwrap();

    /// `√` applied to a bare number instead of a parenthesized group.
    static ref BARE_ROOT: Regex = Regex::new(r"√(\d+(?:\.\d+)?|\.\d+)").unwrap();

    /// A number or parenthesized group followed by postfix `!`.
    static ref POSTFIX_FACTORIAL: Regex = Regex::new(r"(\d+(?:\.\d+)?|\([^()]*\))!").unwrap();

    static ref NON_FINITE_WORD: Regex = Regex::new(r"\b(?:Infinity|NaN)\b").unwrap();
}

/// Spell out the multiplications the keypad implies: `2π`, `2e`, `πe`, `e√4`.
///
/// An `e` right after a digit stays an exponent when a (signed) digit
/// follows it, so `2e+1` is still twenty.
pub fn explicit_products(expression: &str) -> String {
    let mut prepared = IMPLICIT_PRODUCT
        .replace_all(expression, "$1*$2")
        .into_owned();
    // Two passes so chains like `2ππ` are fully expanded.
    prepared = IMPLICIT_PRODUCT.replace_all(&prepared, "$1*$2").into_owned();

    let chars: Vec<char> = prepared.chars().collect();
    let mut expanded = String::with_capacity(prepared.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && is_euler(&chars, i) {
            let before = chars[i - 1];
            let follows_value = before.is_ascii_digit()
                || matches!(before, ')' | '!' | 'π')
                || (before == 'e' && is_euler(&chars, i - 1));
            if follows_value && !is_exponent(&chars, i) {
                expanded.push('*');
            }
        }
        expanded.push(c);
    }
    expanded
}

/// The `e` at `i` stands alone rather than inside a word like `sec`.
fn is_euler(chars: &[char], i: usize) -> bool {
    let is_letter = |j: usize| chars.get(j).is_some_and(|c| c.is_ascii_alphabetic() && *c != 'e');
    chars[i] == 'e' && !(i > 0 && is_letter(i - 1)) && !is_letter(i + 1)
}

/// The `e` at `i` is the exponent marker of a number literal like `1e21`.
fn is_exponent(chars: &[char], i: usize) -> bool {
    let digit_at = |j: usize| chars.get(j).is_some_and(char::is_ascii_digit);
    let after_mantissa = i > 0 && (chars[i - 1].is_ascii_digit() || chars[i - 1] == '.');
    let signed = matches!(chars.get(i + 1), Some('+' | '-'));
    after_mantissa && (digit_at(i + 1) || (signed && digit_at(i + 2)))
}

/// Replace display glyphs with the function syntax engines understand.
///
/// `2π` becomes `2*pi()`, `√16` becomes `sqrt(16)`, `5!` becomes
/// `factorial(5)`.
pub fn substitute_glyphs(expression: &str) -> String {
    let mut prepared = explicit_products(expression);
    prepared = BARE_ROOT.replace_all(&prepared, "sqrt($1)").into_owned();
    prepared = prepared.replace('√', "sqrt").replace('π', "pi()");

    while POSTFIX_FACTORIAL.is_match(&prepared) {
        prepared = POSTFIX_FACTORIAL
            .replace_all(&prepared, "factorial($1)")
            .into_owned();
    }

    prepared
}

/// Factorial of a non-negative integer, overflowing to infinity.
pub fn factorial(n: f64) -> Option<f64> {
    if n < 0.0 || n.fract() != 0.0 || !n.is_finite() {
        return None;
    }
    if n > MAX_FACTORIAL {
        return Some(f64::INFINITY);
    }
    Some((1..=n as u64).fold(1.0, |acc, k| acc * k as f64))
}

/// Evaluator backed by fasteval.
///
/// fasteval provides the arithmetic, `log` (base 10) and the trigonometric
/// functions; the callback namespace adds `ln`, `sqrt`, `factorial`, the
/// bare constants `pi` and `e`, and the `Infinity` / `NaN` words the display
/// shows for non-finite results.
#[derive(Clone, Copy, Debug, Default)]
pub struct FastevalEvaluator;

impl Evaluator for FastevalEvaluator {
    fn evaluate(&self, expression: &str) -> Result<Value, EvalError> {
        let prepared = substitute_glyphs(expression.trim());

        let mut namespace = |name: &str, args: Vec<f64>| -> Option<f64> {
            match (name, args.as_slice()) {
                ("pi", []) => Some(PI),
                ("e", []) => Some(E),
                ("Infinity", []) => Some(f64::INFINITY),
                ("NaN", []) => Some(f64::NAN),
                ("ln", [x]) => Some(x.ln()),
                ("sqrt", [x]) => Some(x.sqrt()),
                ("factorial", [x]) => factorial(*x),
                _ => None,
            }
        };

        fasteval::ez_eval(&prepared, &mut namespace)
            .map(Value::Number)
            .map_err(|e| EvalError::new(expression, e.to_string()))
    }

    fn name(&self) -> &'static str {
        "fasteval"
    }
}

/// Evaluator backed by fend.
///
/// fend answers with text; numbers are parsed back (dropping the `approx. `
/// marker) and anything else is kept as [`Value::Text`]. fend has no
/// infinite values, so expressions built on a displayed `Infinity` or `NaN`
/// go to fasteval instead.
#[derive(Clone, Copy, Debug, Default)]
pub struct FendEvaluator;

impl Evaluator for FendEvaluator {
    fn evaluate(&self, expression: &str) -> Result<Value, EvalError> {
        if NON_FINITE_WORD.is_match(expression) {
            tracing::debug!(expression, "Non-finite operand, evaluating with fasteval");
            return FastevalEvaluator.evaluate(expression);
        }

        // fend reads `%` as a percentage; the keypad means modulo.
        let prepared = explicit_products(expression.trim())
            .replace('%', " mod ")
            .replace('√', "sqrt")
            .replace('π', "pi");

        let mut context = fend_core::Context::new();
        let result = fend_core::evaluate(&prepared, &mut context)
            .map_err(|reason| EvalError::new(expression, reason))?;

        let text = result.get_main_result().trim();
        if text.is_empty() {
            return Err(EvalError::new(expression, "empty result"));
        }

        let numeric = text.strip_prefix("approx. ").unwrap_or(text).replace(',', "");
        Ok(match numeric.parse::<f64>() {
            Ok(n) => Value::Number(n),
            Err(_) => Value::Text(text.to_string()),
        })
    }

    fn name(&self) -> &'static str {
        "fend"
    }
}
