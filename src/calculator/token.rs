//! Input tokens for the calculator keypad.
//!
//! Every keypad label, keyboard key and voice command is classified into a
//! [`Token`] before it reaches the state machine, so transitions can match on
//! the token class instead of comparing strings.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Basic keypad: a 4x5 grid, `0` spans two columns.
pub const BASIC_KEYPAD: &[&[&str]] = &[
    &["C", "⌫", "%", "/"],
    &["7", "8", "9", "*"],
    &["4", "5", "6", "-"],
    &["1", "2", "3", "+"],
    &["0", ".", "="],
];

/// Scientific keypad: a 5x7 grid, `=` takes the full last row.
pub const SCIENTIFIC_KEYPAD: &[&[&str]] = &[
    &["sin", "cos", "tan", "log", "ln"],
    &["(", ")", "^", "√", "π"],
    &["x!", "e", "C", "⌫", "%"],
    &["7", "8", "9", "/", "*"],
    &["4", "5", "6", "-", "+"],
    &["1", "2", "3", "0", "."],
    &["="],
];

/// Binary operators. These are the tokens that continue a chained
/// computation from a settled result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Modulo,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Power => "^",
            Self::Modulo => "%",
        }
    }
}

/// Non-operator symbols that are appended verbatim to the expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
    Point,
    OpenParen,
    CloseParen,
    Pi,
    Euler,
    Root,
    Bang,
}

impl Symbol {
    pub fn text(self) -> &'static str {
        match self {
            Self::Point => ".",
            Self::OpenParen => "(",
            Self::CloseParen => ")",
            Self::Pi => "π",
            Self::Euler => "e",
            Self::Root => "√",
            Self::Bang => "!",
        }
    }
}

/// Unary functions applied to the whole current expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Log,
    Ln,
}

impl Function {
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Log => "log",
            Self::Ln => "ln",
        }
    }

    /// Whether the argument is an angle subject to degree conversion.
    pub fn is_trigonometric(self) -> bool {
        matches!(self, Self::Sin | Self::Cos | Self::Tan)
    }

    /// Apply the function to an argument already converted to radians.
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Tan => x.tan(),
            Self::Log => x.log10(),
            Self::Ln => x.ln(),
        }
    }
}

/// Editing controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Clear,
    Backspace,
}

/// A classified calculator input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    /// A decimal digit `0..=9`.
    Digit(u8),
    Operator(Operator),
    Symbol(Symbol),
    Function(Function),
    /// The `x!` key: factorial of the whole expression.
    Factorial,
    /// The `=` key.
    Evaluate,
    Control(Control),
}

impl Token {
    /// Text appended to the expression for composing tokens.
    ///
    /// Returns `None` for tokens that trigger a transition of their own
    /// (evaluate, controls, unary functions and factorial).
    pub fn text(&self) -> Option<String> {
        match self {
            Self::Digit(d) => Some(d.to_string()),
            Self::Operator(op) => Some(op.symbol().to_string()),
            Self::Symbol(sym) => Some(sym.text().to_string()),
            Self::Function(_) | Self::Factorial | Self::Evaluate | Self::Control(_) => None,
        }
    }

    /// Keypad label for this token.
    pub fn label(&self) -> String {
        match self {
            Self::Digit(d) => d.to_string(),
            Self::Operator(op) => op.symbol().to_string(),
            Self::Symbol(sym) => sym.text().to_string(),
            Self::Function(f) => f.name().to_string(),
            Self::Factorial => "x!".to_string(),
            Self::Evaluate => "=".to_string(),
            Self::Control(Control::Clear) => "C".to_string(),
            Self::Control(Control::Backspace) => "⌫".to_string(),
        }
    }

    pub fn is_operator(&self) -> bool {
        matches!(self, Self::Operator(_))
    }
}

impl FromStr for Token {
    type Err = Error;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let token = match label {
            "=" => Self::Evaluate,
            "C" => Self::Control(Control::Clear),
            "⌫" => Self::Control(Control::Backspace),
            "sin" => Self::Function(Function::Sin),
            "cos" => Self::Function(Function::Cos),
            "tan" => Self::Function(Function::Tan),
            "log" => Self::Function(Function::Log),
            "ln" => Self::Function(Function::Ln),
            "x!" => Self::Factorial,
            "+" => Self::Operator(Operator::Add),
            "-" => Self::Operator(Operator::Subtract),
            "*" => Self::Operator(Operator::Multiply),
            "/" => Self::Operator(Operator::Divide),
            "^" => Self::Operator(Operator::Power),
            "%" => Self::Operator(Operator::Modulo),
            "." => Self::Symbol(Symbol::Point),
            "(" => Self::Symbol(Symbol::OpenParen),
            ")" => Self::Symbol(Symbol::CloseParen),
            "π" => Self::Symbol(Symbol::Pi),
            "e" => Self::Symbol(Symbol::Euler),
            "√" => Self::Symbol(Symbol::Root),
            "!" => Self::Symbol(Symbol::Bang),
            _ => {
                let mut chars = label.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_digit() => Self::Digit(c as u8 - b'0'),
                    _ => return Err(Error::UnknownToken(label.to_string())),
                }
            }
        };
        Ok(token)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
