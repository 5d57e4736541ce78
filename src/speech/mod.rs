//! Text-to-speech side channel.
//!
//! Speaking is fire-and-forget: a [`Speaker`] never blocks the calculator
//! and never reports failure back to it.

mod exec;

pub use exec::CommandSpeaker;

/// Something that can read a line out loud.
pub trait Speaker: Send {
    fn speak(&self, text: &str);
}

/// Writes the line to the log instead of a speech engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSpeaker;

impl Speaker for LogSpeaker {
    fn speak(&self, text: &str) {
        tracing::info!(target: "mintcalc::speech", "{}", text);
    }
}

/// Says nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct Muted;

impl Speaker for Muted {
    fn speak(&self, _text: &str) {}
}
