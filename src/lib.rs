//! MintCalc: a keypad, keyboard and voice driven calculator.
//!
//! The core is [`calculator::Calculator`], a state machine fed with typed
//! tokens. [`session::Session`] wraps it with history, persisted
//! preferences, text-to-speech and voice input. The converters are
//! stand-alone formula tools.

pub mod calculator;
pub mod config;
pub mod converters;
pub mod error;
pub mod history;
pub mod keyboard;
pub mod logging;
pub mod preferences;
pub mod session;
pub mod speech;
pub mod storage;
pub mod voice;

pub use error::{Error, Result};
pub use session::Session;
