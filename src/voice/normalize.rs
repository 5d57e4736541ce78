//! Spoken transcript to expression text.
//!
//! Best-effort substitutions only: nothing here validates the result, a
//! malformed expression simply fails later at `=`.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Substitutions applied in order to the lower-cased transcript.
    static ref SUBSTITUTIONS: Vec<(Regex, &'static str)> = [
        (r"what is|calculate", ""),
        (r"plus", "+"),
        (r"minus", "-"),
        (r"times|x|multiply by", "*"),
        (r"divided by|divide", "/"),
        (r"point", "."),
        (r"power|to the power of", "^"),
        (r"\s+", ""),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect();

    static ref EQUALS: Regex = Regex::new(r"equals?").unwrap();
}

/// What a transcript asks the calculator to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoiceCommand {
    /// Set the expression, then press `=`.
    Evaluate(String),
    /// Press `C`.
    Clear,
    /// Set the expression and keep composing.
    Replace(String),
}

/// Normalize a raw transcript into a calculator command.
pub fn normalize(transcript: &str) -> VoiceCommand {
    let mut text = transcript.trim().to_lowercase();
    for (pattern, replacement) in SUBSTITUTIONS.iter() {
        text = pattern.replace_all(&text, *replacement).into_owned();
    }

    if text.contains("equal") {
        VoiceCommand::Evaluate(EQUALS.replace_all(&text, "").into_owned())
    } else if text.contains("clear") || text.contains("reset") {
        VoiceCommand::Clear
    } else {
        VoiceCommand::Replace(text)
    }
}
