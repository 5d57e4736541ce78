//! Physical keyboard mapping.

use crate::calculator::{Control, Operator, Symbol, Token};

/// Map a key name (as reported by the terminal or windowing layer) to a
/// calculator token. Keys without a meaning return `None`.
pub fn token_for_key(key: &str) -> Option<Token> {
    let token = match key {
        "Enter" | "=" => Token::Evaluate,
        "Backspace" => Token::Control(Control::Backspace),
        "Escape" => Token::Control(Control::Clear),
        "+" => Token::Operator(Operator::Add),
        "-" => Token::Operator(Operator::Subtract),
        "*" => Token::Operator(Operator::Multiply),
        "/" => Token::Operator(Operator::Divide),
        "%" => Token::Operator(Operator::Modulo),
        "." => Token::Symbol(Symbol::Point),
        "(" => Token::Symbol(Symbol::OpenParen),
        ")" => Token::Symbol(Symbol::CloseParen),
        _ => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_digit() => Token::Digit(c as u8 - b'0'),
                _ => return None,
            }
        }
    };
    Some(token)
}
