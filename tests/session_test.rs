use std::sync::{Arc, Mutex};

use mintcalc::calculator::{Calculator, DisplayResult, Engine, Mode, Token};
use mintcalc::preferences::{ActiveTab, Theme};
use mintcalc::speech::{Muted, Speaker};
use mintcalc::storage::{FileStorage, HISTORY_KEY, MemoryStorage, Storage};
use mintcalc::voice::{ScriptedRecognizer, VoiceSession};
use mintcalc::{Error, Session};

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<String>>>);

impl Speaker for Recorder {
    fn speak(&self, text: &str) {
        self.0.lock().unwrap().push(text.to_string());
    }
}

fn open(path: &std::path::Path) -> Session {
    Session::load(
        Calculator::default(),
        Box::new(FileStorage::open(path).unwrap()),
        Box::new(Muted),
    )
}

#[test]
fn test_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let mut session = open(&path);
    for label in ["1", "2", "*", "3", "="] {
        session.press_label(label).unwrap();
    }
    session.apply_voice("10 divided by 4 equals");
    session.set_theme(Theme::Lavender);
    session.set_tab(ActiveTab::Health);
    drop(session);

    let session = open(&path);
    assert_eq!(session.theme(), Theme::Lavender);
    assert_eq!(session.tab(), ActiveTab::Health);

    let results: Vec<_> = session.history().iter().map(|e| e.result.as_str()).collect();
    assert_eq!(results, ["2.5", "36"]);
    assert_eq!(session.expression(), "");
}

#[test]
fn test_truncated_storage_file_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "{\"mintCalcTheme\": \"lav").unwrap();

    let mut session = open(&path);
    assert_eq!(session.theme(), Theme::default());
    assert!(session.history().is_empty());
    assert!(FileStorage::backup_path(&path).exists());

    session.set_theme(Theme::Lavender);
    drop(session);
    assert_eq!(open(&path).theme(), Theme::Lavender);
}

#[test]
fn test_corrupt_history_starts_empty() {
    let storage = MemoryStorage::new().with(HISTORY_KEY, "[{\"id\":1}]");
    let mut session = Session::load(Calculator::default(), Box::new(storage), Box::new(Muted));
    assert!(session.history().is_empty());

    session.press_label("4").unwrap();
    session.press(Token::Evaluate);
    assert_eq!(session.history().len(), 1);

    let stored = session.storage().get(HISTORY_KEY).unwrap().unwrap();
    assert!(stored.contains("\"result\":\"4\""));
}

#[test]
fn test_keypad_walkthrough() {
    let recorder = Recorder::default();
    let calculator = Calculator::default().with_mode(Mode {
        scientific: true,
        radians: false,
    });
    let mut session = Session::load(
        calculator,
        Box::new(MemoryStorage::new()),
        Box::new(recorder.clone()),
    );

    let mut press = |labels: &str| {
        for label in labels.split_whitespace() {
            session.press_label(label).unwrap();
        }
    };

    press("2 π =");
    press("+ 1 =");
    press("C 5 x!");
    press("+ 3 0 sin");

    assert_eq!(session.display(), &DisplayResult::Value("0.5".to_string()));
    let results: Vec<_> = session.history().iter().map(|e| e.result.as_str()).collect();
    assert_eq!(results, ["7.2831853071796", "6.2831853071796"]);
    assert_eq!(
        *recorder.0.lock().unwrap(),
        ["The result is 6.2831853071796", "The result is 7.2831853071796"]
    );
}

#[test]
fn test_voice_round_trip() {
    let mut session = Session::load(
        Calculator::new(Engine::Fasteval.evaluator()),
        Box::new(MemoryStorage::new()),
        Box::new(Muted),
    );
    assert!(matches!(session.toggle_voice(), Err(Error::VoiceUnavailable)));

    session.attach_voice(VoiceSession::new(Box::new(ScriptedRecognizer::utterance(
        "calculate 3 times 3 plus 1 equals",
    ))));
    assert!(session.toggle_voice().unwrap());
    session.pump_voice();

    assert_eq!(session.display().to_string(), "10");
    assert!(!session.is_listening());

    let id = session.history().entries()[0].id.clone();
    assert_eq!(session.edit_entry(&id, "2^10").unwrap(), "1024");
    let rows = session.export_history().unwrap();
    assert_eq!(rows[0].expression, "2^10");
    assert_eq!(rows[0].result, "1024");
}
