//! Voice input: recognition sessions and transcript normalization.

mod normalize;
mod session;

pub use normalize::{VoiceCommand, normalize};
pub use session::{Recognizer, RecognitionError, ScriptedRecognizer, VoiceEvent, VoiceSession};
