//! The calculator input state machine.
//!
//! [`Calculator`] owns the expression being composed and the display
//! result. Each [`Token`] runs one transition to completion. Anything that
//! lives outside the machine (history, speech) is handed back to the caller
//! in a [`Transition`].

use std::f64::consts::PI;
use std::fmt;

use thiserror::Error;

use super::detection::{is_division_by_literal_zero, is_error_text, leading_number};
use super::evaluation::{Evaluator, FastevalEvaluator, Value, factorial};
use super::format::{format_number, format_value};
use super::token::{Control, Function, Token};
use crate::history::HistoryEntry;

/// Idle display text.
const IDLE: &str = "0";

/// Arithmetic error sentinels shown in place of a result.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcError {
    /// `/0` spotted in the expression text before evaluating.
    #[error("Division by zero")]
    DivisionByZero,

    /// The evaluator rejected the expression on `=`.
    #[error("Invalid Format")]
    InvalidFormat,

    /// A unary function or factorial had no usable argument.
    #[error("Invalid Input")]
    InvalidInput,

    /// Factorial of a negative or fractional number.
    #[error("Factorial Error")]
    FactorialError,
}

/// What the display shows under the expression.
#[derive(Clone, Debug, PartialEq)]
pub enum DisplayResult {
    /// Nothing computed yet, or composing: shows `0`.
    Idle,
    /// A formatted result.
    Value(String),
    /// An arithmetic error sentinel.
    Error(CalcError),
    /// A voice recognition message.
    Notice(String),
}

impl DisplayResult {
    /// Whether the display is in an error state.
    ///
    /// Notices count only when their text reads like an error sentinel.
    pub fn is_error(&self) -> bool {
        match self {
            Self::Error(_) => true,
            Self::Notice(text) => is_error_text(text),
            Self::Idle | Self::Value(_) => false,
        }
    }

    /// The settled value, if it is something other than `0`.
    fn settled_value(&self) -> Option<&str> {
        match self {
            Self::Value(value) if value != IDLE => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for DisplayResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str(IDLE),
            Self::Value(value) => f.write_str(value),
            Self::Error(err) => write!(f, "{}", err),
            Self::Notice(text) => f.write_str(text),
        }
    }
}

/// Keypad mode flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mode {
    /// Scientific keypad shown.
    pub scientific: bool,
    /// Trigonometric arguments are radians rather than degrees.
    pub radians: bool,
}

impl Default for Mode {
    fn default() -> Self {
        Self {
            scientific: false,
            radians: true,
        }
    }
}

/// Side effects produced by a transition.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transition {
    /// History record for a successful `=`.
    pub entry: Option<HistoryEntry>,
    /// Line to read out loud.
    pub speech: Option<String>,
}

/// Expression input state machine.
pub struct Calculator {
    expression: String,
    display: DisplayResult,
    mode: Mode,
    evaluator: Box<dyn Evaluator>,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(Box::new(FastevalEvaluator))
    }
}

impl fmt::Debug for Calculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Calculator")
            .field("expression", &self.expression)
            .field("display", &self.display)
            .field("mode", &self.mode)
            .field("evaluator", &self.evaluator.name())
            .finish()
    }
}

impl Calculator {
    pub fn new(evaluator: Box<dyn Evaluator>) -> Self {
        Self {
            expression: String::new(),
            display: DisplayResult::Idle,
            mode: Mode::default(),
            evaluator,
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn display(&self) -> &DisplayResult {
        &self.display
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_radians(&mut self, radians: bool) {
        self.mode.radians = radians;
    }

    pub fn set_scientific(&mut self, scientific: bool) {
        self.mode.scientific = scientific;
    }

    /// Evaluate text with the machine's engine, without touching state.
    pub fn evaluate_text(&self, text: &str) -> Option<String> {
        self.evaluator
            .evaluate(text)
            .ok()
            .map(|value| format_value(&value))
    }

    /// Replace the expression, leaving the display alone.
    pub fn set_expression(&mut self, expression: impl Into<String>) {
        self.expression = expression.into();
    }

    /// Show a message (voice recognition status) in the display.
    pub fn show_notice(&mut self, text: impl Into<String>) {
        self.display = DisplayResult::Notice(text.into());
    }

    /// Run one transition.
    pub fn handle(&mut self, token: Token) -> Transition {
        let transition = match token {
            Token::Evaluate => self.evaluate(),
            Token::Control(Control::Clear) => {
                self.expression.clear();
                self.display = DisplayResult::Idle;
                Transition::default()
            }
            Token::Control(Control::Backspace) => {
                self.expression.pop();
                Transition::default()
            }
            Token::Function(function) => {
                self.apply_function(function);
                Transition::default()
            }
            Token::Factorial => {
                self.apply_factorial();
                Transition::default()
            }
            Token::Digit(_) | Token::Operator(_) | Token::Symbol(_) => {
                self.compose(token);
                Transition::default()
            }
        };

        tracing::debug!(
            token = %token,
            expression = %self.expression,
            display = %self.display,
            "Calculator transition"
        );
        transition
    }

    fn evaluate(&mut self) -> Transition {
        if self.expression.trim().is_empty() {
            return Transition::default();
        }
        if is_division_by_literal_zero(&self.expression) {
            self.display = DisplayResult::Error(CalcError::DivisionByZero);
            return Transition::default();
        }

        match self.evaluator.evaluate(&self.expression) {
            Ok(value) => {
                let formatted = format_value(&value);
                let entry = HistoryEntry::new(self.expression.clone(), formatted.clone());
                self.expression = formatted.clone();
                self.display = DisplayResult::Value(formatted.clone());
                Transition {
                    entry: Some(entry),
                    speech: Some(format!("The result is {}", formatted)),
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "Evaluation failed");
                self.display = DisplayResult::Error(CalcError::InvalidFormat);
                Transition::default()
            }
        }
    }

    fn apply_function(&mut self, function: Function) {
        if self.expression.trim().is_empty() || leading_number(&self.expression).is_none() {
            self.display = DisplayResult::Error(CalcError::InvalidInput);
            return;
        }

        let Some(argument) = self.evaluate_number() else {
            self.display = DisplayResult::Error(CalcError::InvalidInput);
            return;
        };

        let argument = if function.is_trigonometric() && !self.mode.radians {
            argument * PI / 180.0
        } else {
            argument
        };

        self.settle(format_number(function.apply(argument)));
    }

    fn apply_factorial(&mut self) {
        if self.expression.trim().is_empty() {
            self.display = DisplayResult::Error(CalcError::InvalidInput);
            return;
        }

        let Some(argument) = self.evaluate_number() else {
            self.display = DisplayResult::Error(CalcError::InvalidInput);
            return;
        };

        match factorial(argument) {
            Some(value) => self.settle(format_number(value)),
            None => self.display = DisplayResult::Error(CalcError::FactorialError),
        }
    }

    fn compose(&mut self, token: Token) {
        let Some(text) = token.text() else {
            return;
        };

        if self.display.is_error() {
            self.expression = text;
        } else if let Some(settled) = self.display.settled_value()
            && self.expression == settled
        {
            if token.is_operator() {
                self.expression.push_str(&text);
            } else {
                self.expression = text;
            }
        } else {
            self.expression.push_str(&text);
        }

        self.display = DisplayResult::Idle;
    }

    fn evaluate_number(&self) -> Option<f64> {
        match self.evaluator.evaluate(&self.expression) {
            Ok(Value::Number(n)) => Some(n),
            Ok(Value::Text(_)) | Err(_) => None,
        }
    }

    fn settle(&mut self, formatted: String) {
        self.expression = formatted.clone();
        self.display = DisplayResult::Value(formatted);
    }
}
