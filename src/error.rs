//! Crate-wide error type.
//!
//! Arithmetic problems are not errors here: they end up as sentinel texts in
//! the calculator display (see [`crate::calculator::CalcError`]). This type
//! covers everything around the calculator: persistence, configuration,
//! history management and voice input.

use thiserror::Error;

/// Errors reported by the library.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error while reading or writing persisted state.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file is not valid TOML.
    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),

    /// A keypad label that is not part of the token alphabet.
    #[error("Unknown token: {0:?}")]
    UnknownToken(String),

    /// A theme or tab identifier that does not exist.
    #[error("Unknown preference value: {0:?}")]
    UnknownPreference(String),

    /// A converter unit or category that does not exist.
    #[error("Unknown unit: {0:?}")]
    UnknownUnit(String),

    /// No history entry carries the given id.
    #[error("History entry {0} not found")]
    EntryNotFound(String),

    /// The expression could not be evaluated.
    #[error("Invalid expression: {0:?}")]
    InvalidExpression(String),

    /// Export was requested for an empty history.
    #[error("History is empty. Nothing to export.")]
    EmptyHistory,

    /// No speech recognizer is attached to the session.
    #[error("Voice assistance is not available on this device.")]
    VoiceUnavailable,

    /// The recognizer failed to start.
    #[error("Voice recognition failed to start: {0}")]
    Recognizer(String),
}

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;
