//! The calculator session.
//!
//! [`Session`] ties the state machine to everything around it: the history
//! list, the persisted preferences, text-to-speech and voice input. State is
//! loaded once from [`Storage`] and written back on every change. Write
//! failures are logged and ignored; in-memory state stays authoritative.

use std::fmt;

use crate::calculator::{Calculator, Control, DisplayResult, Token};
use crate::error::{Error, Result};
use crate::history::{ExportRow, History, HistoryEntry};
use crate::keyboard::token_for_key;
use crate::preferences::{ActiveTab, Theme};
use crate::speech::Speaker;
use crate::storage::{ACTIVE_TAB_KEY, HISTORY_KEY, Storage, THEME_KEY};
use crate::voice::{VoiceCommand, VoiceEvent, VoiceSession, normalize};

pub struct Session {
    calculator: Calculator,
    history: History,
    theme: Theme,
    tab: ActiveTab,
    storage: Box<dyn Storage>,
    speaker: Box<dyn Speaker>,
    voice: Option<VoiceSession>,
}

impl Session {
    /// Build a session, restoring theme, tab and history from `storage`.
    ///
    /// Missing or unreadable values fall back to their defaults.
    pub fn load(
        calculator: Calculator,
        storage: Box<dyn Storage>,
        speaker: Box<dyn Speaker>,
    ) -> Self {
        let theme = read_preference(storage.as_ref(), THEME_KEY);
        let tab = read_preference(storage.as_ref(), ACTIVE_TAB_KEY);
        let history = read_history(storage.as_ref());

        tracing::info!(
            theme = %theme,
            tab = %tab,
            entries = history.len(),
            "Session loaded"
        );

        Self {
            calculator,
            history,
            theme,
            tab,
            storage,
            speaker,
            voice: None,
        }
    }

    /// Attach a speech recognizer session.
    pub fn attach_voice(&mut self, voice: VoiceSession) {
        self.voice = Some(voice);
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    pub fn expression(&self) -> &str {
        self.calculator.expression()
    }

    pub fn display(&self) -> &DisplayResult {
        self.calculator.display()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn tab(&self) -> ActiveTab {
        self.tab
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn is_listening(&self) -> bool {
        self.voice.as_ref().is_some_and(VoiceSession::is_listening)
    }

    /// Feed one token through the calculator and apply its side effects.
    pub fn press(&mut self, token: Token) {
        let transition = self.calculator.handle(token);

        if let Some(entry) = transition.entry {
            self.history.push_front(entry);
            self.save_history();
        }
        if let Some(line) = transition.speech {
            self.speaker.speak(&line);
        }
    }

    /// Replace the expression being composed.
    pub fn set_expression(&mut self, expression: impl Into<String>) {
        self.calculator.set_expression(expression);
    }

    /// Press a keypad button by its label.
    pub fn press_label(&mut self, label: &str) -> Result<()> {
        let token = label.parse()?;
        self.press(token);
        Ok(())
    }

    /// Press a physical key. Returns whether the key meant anything.
    pub fn press_key(&mut self, key: &str) -> bool {
        match token_for_key(key) {
            Some(token) => {
                self.press(token);
                true
            }
            None => false,
        }
    }

    /// Apply a recognized transcript.
    pub fn apply_voice(&mut self, transcript: &str) {
        let command = normalize(transcript);
        tracing::debug!(transcript, ?command, "Voice command");

        match command {
            VoiceCommand::Evaluate(expression) => {
                self.set_expression(expression);
                self.press(Token::Evaluate);
            }
            VoiceCommand::Clear => self.press(Token::Control(Control::Clear)),
            VoiceCommand::Replace(expression) => self.set_expression(expression),
        }
    }

    /// Start or stop listening. Returns whether listening afterwards.
    pub fn toggle_voice(&mut self) -> Result<bool> {
        let Some(voice) = self.voice.as_mut() else {
            self.calculator.show_notice(Error::VoiceUnavailable.to_string());
            return Err(Error::VoiceUnavailable);
        };

        match voice.toggle() {
            Ok(listening) => Ok(listening),
            Err(e) => {
                tracing::warn!(error = %e, "Could not start voice recognition");
                self.calculator.show_notice(e.to_string());
                Err(e)
            }
        }
    }

    /// Handle every pending recognizer event, one transition each.
    ///
    /// Returns the number of events handled.
    pub fn pump_voice(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.voice.as_mut().and_then(VoiceSession::try_next) {
            match event {
                VoiceEvent::Transcript(text) => self.apply_voice(&text),
                VoiceEvent::Error(error) => {
                    tracing::debug!(?error, "Voice recognition error");
                    self.calculator.show_notice(error.message());
                }
                VoiceEvent::Ended => tracing::debug!("Voice recognition ended"),
            }
            handled += 1;
        }
        handled
    }

    /// Copy a history entry's expression back into the calculator.
    pub fn recall(&mut self, id: &str) -> Result<()> {
        let entry = self
            .history
            .get(id)
            .ok_or_else(|| Error::EntryNotFound(id.to_string()))?;
        self.calculator.set_expression(entry.expression.clone());
        Ok(())
    }

    /// Re-evaluate a history entry with a new expression.
    ///
    /// Returns the new result. The entry is untouched when the expression
    /// does not evaluate.
    pub fn edit_entry(&mut self, id: &str, expression: &str) -> Result<String> {
        if self.history.get(id).is_none() {
            return Err(Error::EntryNotFound(id.to_string()));
        }
        let result = self
            .calculator
            .evaluate_text(expression)
            .ok_or_else(|| Error::InvalidExpression(expression.to_string()))?;

        self.history
            .replace(id, expression.to_string(), result.clone())?;
        self.save_history();
        Ok(result)
    }

    pub fn delete_entry(&mut self, id: &str) -> Result<HistoryEntry> {
        let removed = self.history.remove(id)?;
        self.save_history();
        Ok(removed)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.save_history();
    }

    /// Rows for a history report. Fails when there is nothing to export.
    pub fn export_history(&self) -> Result<Vec<ExportRow>> {
        self.history.export_rows()
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.persist(THEME_KEY, theme.id());
    }

    pub fn set_tab(&mut self, tab: ActiveTab) {
        self.tab = tab;
        self.persist(ACTIVE_TAB_KEY, tab.id());
    }

    pub fn set_radians(&mut self, radians: bool) {
        self.calculator.set_radians(radians);
    }

    pub fn set_scientific(&mut self, scientific: bool) {
        self.calculator.set_scientific(scientific);
    }

    fn save_history(&mut self) {
        match serde_json::to_string(&self.history) {
            Ok(json) => self.persist(HISTORY_KEY, &json),
            Err(e) => tracing::warn!(error = %e, "Failed to serialize history"),
        }
    }

    fn persist(&mut self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            tracing::warn!(key, error = %e, "Failed to persist value");
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("calculator", &self.calculator)
            .field("history", &self.history.len())
            .field("theme", &self.theme)
            .field("tab", &self.tab)
            .field("voice", &self.voice)
            .finish()
    }
}

fn read_preference<T>(storage: &dyn Storage, key: &str) -> T
where
    T: std::str::FromStr + Default,
{
    match storage.get(key) {
        Ok(Some(value)) => value.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %value, "Ignoring unknown stored value");
            T::default()
        }),
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read stored value");
            T::default()
        }
    }
}

fn read_history(storage: &dyn Storage) -> History {
    let json = match storage.get(HISTORY_KEY) {
        Ok(Some(json)) => json,
        Ok(None) => return History::new(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read history");
            return History::new();
        }
    };

    match serde_json::from_str::<Vec<HistoryEntry>>(&json) {
        Ok(entries) => History::from_entries(entries),
        Err(e) => {
            tracing::warn!(error = %e, "Stored history is corrupt, starting empty");
            History::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::CalcError;
    use crate::storage::MemoryStorage;
    use crate::voice::{RecognitionError, ScriptedRecognizer};
    use std::sync::{Arc, Mutex};

    /// Speaker that records every line.
    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl Speaker for Recorder {
        fn speak(&self, text: &str) {
            self.0.lock().unwrap().push(text.to_string());
        }
    }

    /// Storage whose writes always fail.
    struct ReadOnly(MemoryStorage);

    impl Storage for ReadOnly {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Io(std::io::Error::other("read-only")))
        }
    }

    fn session_with(storage: MemoryStorage) -> (Session, Recorder) {
        let recorder = Recorder::default();
        let session = Session::load(
            Calculator::default(),
            Box::new(storage),
            Box::new(recorder.clone()),
        );
        (session, recorder)
    }

    fn press_all(session: &mut Session, labels: &str) {
        for label in labels.split_whitespace() {
            session.press_label(label).unwrap();
        }
    }

    #[test]
    fn test_load_defaults() {
        let (session, _) = session_with(MemoryStorage::new());
        assert_eq!(session.theme(), Theme::Lime);
        assert_eq!(session.tab(), ActiveTab::Calculator);
        assert!(session.history().is_empty());
        assert_eq!(session.display(), &DisplayResult::Idle);
    }

    #[test]
    fn test_load_restores_and_recovers() {
        let storage = MemoryStorage::new()
            .with(THEME_KEY, "dark")
            .with(ACTIVE_TAB_KEY, "Games")
            .with(HISTORY_KEY, "{not json");
        let (session, _) = session_with(storage);

        assert_eq!(session.theme(), Theme::Dark);
        assert_eq!(session.tab(), ActiveTab::Calculator);
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_stored_preferences_match_exactly() {
        let storage = MemoryStorage::new()
            .with(THEME_KEY, "Dark")
            .with(ACTIVE_TAB_KEY, "health tools");
        let (session, _) = session_with(storage);
        assert_eq!(session.theme(), Theme::default());
        assert_eq!(session.tab(), ActiveTab::Calculator);
    }

    #[test]
    fn test_load_history() {
        let json = r#"[{"id":"b","expression":"2+2","result":"4"},{"id":"a","expression":"1+1","result":"2"}]"#;
        let (session, _) = session_with(MemoryStorage::new().with(HISTORY_KEY, json));
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history().entries()[0].result, "4");
    }

    #[test]
    fn test_press_records_history_and_speaks() {
        let (mut session, recorder) = session_with(MemoryStorage::new());
        press_all(&mut session, "7 * 6 =");

        assert_eq!(session.display().to_string(), "42");
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().entries()[0].expression, "7*6");
        assert_eq!(*recorder.0.lock().unwrap(), ["The result is 42"]);

        let stored = session.storage().get(HISTORY_KEY).unwrap().unwrap();
        let entries: Vec<HistoryEntry> = serde_json::from_str(&stored).unwrap();
        assert_eq!(entries[0].result, "42");
    }

    #[test]
    fn test_errors_are_not_recorded() {
        let (mut session, recorder) = session_with(MemoryStorage::new());
        press_all(&mut session, "9 / 0 =");
        assert_eq!(session.display(), &DisplayResult::Error(CalcError::DivisionByZero));
        assert!(session.history().is_empty());
        assert!(recorder.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_label() {
        let (mut session, _) = session_with(MemoryStorage::new());
        assert!(matches!(session.press_label("?"), Err(Error::UnknownToken(_))));
    }

    #[test]
    fn test_press_key() {
        let (mut session, _) = session_with(MemoryStorage::new());
        for key in ["2", "+", "2", "Enter"] {
            assert!(session.press_key(key));
        }
        assert!(!session.press_key("F1"));
        assert_eq!(session.display().to_string(), "4");

        session.press_key("Escape");
        assert_eq!(session.expression(), "");
    }

    #[test]
    fn test_storage_failure_is_ignored() {
        let recorder = Recorder::default();
        let mut session = Session::load(
            Calculator::default(),
            Box::new(ReadOnly(MemoryStorage::new())),
            Box::new(recorder.clone()),
        );
        press_all(&mut session, "1 + 1 =");
        session.set_theme(Theme::Sky);

        assert_eq!(session.history().len(), 1);
        assert_eq!(session.theme(), Theme::Sky);
        assert_eq!(recorder.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_voice_evaluate() {
        let (mut session, _) = session_with(MemoryStorage::new());
        session.apply_voice("What is 2 plus 3 equals");
        assert_eq!(session.display().to_string(), "5");
        assert_eq!(session.history().entries()[0].expression, "2+3");
    }

    #[test]
    fn test_voice_replace_and_clear() {
        let (mut session, _) = session_with(MemoryStorage::new());
        session.apply_voice("7 times 6");
        assert_eq!(session.expression(), "7*6");
        assert_eq!(session.display(), &DisplayResult::Idle);
        assert!(session.history().is_empty());

        session.apply_voice("clear");
        assert_eq!(session.expression(), "");
    }

    #[test]
    fn test_toggle_voice_without_recognizer() {
        let (mut session, _) = session_with(MemoryStorage::new());
        assert!(matches!(session.toggle_voice(), Err(Error::VoiceUnavailable)));
        assert_eq!(
            session.display().to_string(),
            "Voice assistance is not available on this device."
        );
        assert!(!session.is_listening());
    }

    #[test]
    fn test_pump_voice() {
        let (mut session, _) = session_with(MemoryStorage::new());
        session.attach_voice(VoiceSession::new(Box::new(ScriptedRecognizer::utterance(
            "5 times 5 equals",
        ))));

        assert!(session.toggle_voice().unwrap());
        assert!(session.is_listening());
        assert_eq!(session.pump_voice(), 2);
        assert!(!session.is_listening());
        assert_eq!(session.display().to_string(), "25");
        assert_eq!(session.pump_voice(), 0);
    }

    #[test]
    fn test_pump_voice_error_keeps_expression() {
        let (mut session, _) = session_with(MemoryStorage::new());
        press_all(&mut session, "1 2");
        session.attach_voice(VoiceSession::new(Box::new(ScriptedRecognizer::new(vec![
            VoiceEvent::Error(RecognitionError::NoSpeech),
            VoiceEvent::Ended,
        ]))));

        session.toggle_voice().unwrap();
        session.pump_voice();
        assert_eq!(session.expression(), "12");
        assert_eq!(
            session.display().to_string(),
            "No speech was detected. Please try again."
        );
    }

    #[test]
    fn test_recall_edit_delete() {
        let (mut session, _) = session_with(MemoryStorage::new());
        press_all(&mut session, "2 + 2 =");
        let id = session.history().entries()[0].id.clone();

        press_all(&mut session, "C");
        session.recall(&id).unwrap();
        assert_eq!(session.expression(), "2+2");

        assert_eq!(session.edit_entry(&id, "3*3").unwrap(), "9");
        assert_eq!(session.history().get(&id).unwrap().expression, "3*3");

        assert!(matches!(
            session.edit_entry(&id, "3*"),
            Err(Error::InvalidExpression(_))
        ));
        assert_eq!(session.history().get(&id).unwrap().result, "9");

        session.delete_entry(&id).unwrap();
        assert!(session.history().is_empty());
        assert!(matches!(session.recall(&id), Err(Error::EntryNotFound(_))));
        assert!(matches!(session.edit_entry(&id, "1"), Err(Error::EntryNotFound(_))));
    }

    #[test]
    fn test_clear_and_export() {
        let (mut session, _) = session_with(MemoryStorage::new());
        assert!(matches!(session.export_history(), Err(Error::EmptyHistory)));

        press_all(&mut session, "1 + 1 =");
        press_all(&mut session, "+ 1 =");
        let rows = session.export_history().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].expression, "2+1");

        session.clear_history();
        assert!(session.history().is_empty());
        assert_eq!(
            session.storage().get(HISTORY_KEY).unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_preferences_persist_raw_ids() {
        let (mut session, _) = session_with(MemoryStorage::new());
        session.set_theme(Theme::Coffee);
        session.set_tab(ActiveTab::Finance);

        assert_eq!(
            session.storage().get(THEME_KEY).unwrap().as_deref(),
            Some("coffee")
        );
        assert_eq!(
            session.storage().get(ACTIVE_TAB_KEY).unwrap().as_deref(),
            Some("Finance Tools")
        );
    }

    #[test]
    fn test_mode_flags() {
        let (mut session, _) = session_with(MemoryStorage::new());
        session.set_radians(false);
        session.set_scientific(true);
        assert!(!session.calculator().mode().radians);
        assert!(session.calculator().mode().scientific);

        press_all(&mut session, "9 0 sin");
        assert_eq!(session.display().to_string(), "1");
    }
}
