//! Speech recognition sessions.
//!
//! A recognizer pushes [`VoiceEvent`]s into a flume channel; the session
//! owns the receiving end and hands events out one at a time, so every
//! event drives exactly one calculator transition. Only one recognition
//! can be active: [`VoiceSession::toggle`] either starts or stops it.

use flume::{Receiver, Sender, TryRecvError};

use crate::error::{Error, Result};

/// Recognition failures, each with a fixed user-facing message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecognitionError {
    NoSpeech,
    AudioCapture,
    NotAllowed,
    Network,
    Unknown,
}

impl RecognitionError {
    /// Map an engine error code (`no-speech`, `audio-capture`, ...).
    pub fn from_code(code: &str) -> Self {
        match code {
            "no-speech" => Self::NoSpeech,
            "audio-capture" => Self::AudioCapture,
            "not-allowed" => Self::NotAllowed,
            "network" => Self::Network,
            _ => Self::Unknown,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::NoSpeech => "No speech was detected. Please try again.",
            Self::AudioCapture => "Microphone problem. Please check your microphone.",
            Self::NotAllowed => {
                "Microphone access denied. Please allow access in your system settings."
            }
            Self::Network => "A network error occurred. Please check your connection.",
            Self::Unknown => "An unknown error occurred.",
        }
    }
}

/// Notifications from a recognizer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoiceEvent {
    /// Final transcript of the utterance.
    Transcript(String),
    /// Recognition failed.
    Error(RecognitionError),
    /// The recognizer stopped listening.
    Ended,
}

/// A speech-to-text engine.
pub trait Recognizer: Send {
    /// Begin listening, delivering events on `events`.
    fn start(&mut self, events: Sender<VoiceEvent>) -> Result<()>;

    /// Stop listening. Must be safe to call when not started.
    fn stop(&mut self);
}

/// Recognizer that replays a fixed list of events when started.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRecognizer {
    events: Vec<VoiceEvent>,
}

impl ScriptedRecognizer {
    pub fn new(events: Vec<VoiceEvent>) -> Self {
        Self { events }
    }

    /// A single utterance followed by the end of the session.
    pub fn utterance(transcript: impl Into<String>) -> Self {
        Self::new(vec![
            VoiceEvent::Transcript(transcript.into()),
            VoiceEvent::Ended,
        ])
    }
}

impl Recognizer for ScriptedRecognizer {
    fn start(&mut self, events: Sender<VoiceEvent>) -> Result<()> {
        for event in self.events.iter().cloned() {
            events
                .send(event)
                .map_err(|e| Error::Recognizer(e.to_string()))?;
        }
        Ok(())
    }

    fn stop(&mut self) {}
}

/// Single-slot recognition session.
pub struct VoiceSession {
    recognizer: Box<dyn Recognizer>,
    sender: Sender<VoiceEvent>,
    receiver: Receiver<VoiceEvent>,
    listening: bool,
}

impl VoiceSession {
    pub fn new(recognizer: Box<dyn Recognizer>) -> Self {
        let (sender, receiver) = flume::unbounded();
        Self {
            recognizer,
            sender,
            receiver,
            listening: false,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Start listening, or stop if already listening.
    ///
    /// Returns whether the session is listening afterwards.
    pub fn toggle(&mut self) -> Result<bool> {
        if self.listening {
            self.recognizer.stop();
            self.listening = false;
            tracing::debug!("Voice recognition stopped");
        } else {
            self.recognizer.start(self.sender.clone())?;
            self.listening = true;
            tracing::debug!("Voice recognition started");
        }
        Ok(self.listening)
    }

    /// Take the next pending event, if any.
    pub fn try_next(&mut self) -> Option<VoiceEvent> {
        match self.receiver.try_recv() {
            Ok(event) => {
                if event == VoiceEvent::Ended {
                    self.listening = false;
                }
                Some(event)
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

impl std::fmt::Debug for VoiceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceSession")
            .field("listening", &self.listening)
            .field("pending", &self.receiver.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Recognizer that records start/stop calls and keeps the sender.
    #[derive(Clone, Default)]
    struct Probe {
        calls: Arc<Mutex<Vec<&'static str>>>,
        sender: Arc<Mutex<Option<Sender<VoiceEvent>>>>,
    }

    impl Recognizer for Probe {
        fn start(&mut self, events: Sender<VoiceEvent>) -> Result<()> {
            self.calls.lock().unwrap().push("start");
            *self.sender.lock().unwrap() = Some(events);
            Ok(())
        }

        fn stop(&mut self) {
            self.calls.lock().unwrap().push("stop");
        }
    }

    #[test]
    fn test_toggle_starts_and_stops() {
        let probe = Probe::default();
        let mut session = VoiceSession::new(Box::new(probe.clone()));

        assert!(session.toggle().unwrap());
        assert!(session.is_listening());
        assert!(!session.toggle().unwrap());
        assert!(!session.is_listening());
        assert_eq!(*probe.calls.lock().unwrap(), ["start", "stop"]);
    }

    #[test]
    fn test_events_are_delivered_in_order() {
        let probe = Probe::default();
        let mut session = VoiceSession::new(Box::new(probe.clone()));
        session.toggle().unwrap();

        let sender = probe.sender.lock().unwrap().clone().unwrap();
        sender.send(VoiceEvent::Transcript("one".to_string())).unwrap();
        sender
            .send(VoiceEvent::Error(RecognitionError::from_code("network")))
            .unwrap();
        sender.send(VoiceEvent::Ended).unwrap();

        assert_eq!(session.try_next(), Some(VoiceEvent::Transcript("one".to_string())));
        assert!(session.is_listening());
        assert_eq!(
            session.try_next(),
            Some(VoiceEvent::Error(RecognitionError::Network))
        );
        assert_eq!(session.try_next(), Some(VoiceEvent::Ended));
        assert!(!session.is_listening());
        assert_eq!(session.try_next(), None);
    }

    #[test]
    fn test_scripted_utterance() {
        let mut session = VoiceSession::new(Box::new(ScriptedRecognizer::utterance("2 plus 2")));
        session.toggle().unwrap();
        assert_eq!(
            session.try_next(),
            Some(VoiceEvent::Transcript("2 plus 2".to_string()))
        );
        assert_eq!(session.try_next(), Some(VoiceEvent::Ended));
        assert!(!session.is_listening());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(RecognitionError::from_code("no-speech"), RecognitionError::NoSpeech);
        assert_eq!(
            RecognitionError::from_code("audio-capture"),
            RecognitionError::AudioCapture
        );
        assert_eq!(RecognitionError::from_code("not-allowed"), RecognitionError::NotAllowed);
        assert_eq!(RecognitionError::from_code("aborted"), RecognitionError::Unknown);
        assert_eq!(
            RecognitionError::NoSpeech.message(),
            "No speech was detected. Please try again."
        );
    }
}
