//! User configuration.
//!
//! Read from `<config dir>/mintcalc/config.toml`; a missing file means
//! defaults. Example:
//!
//! ```toml
//! engine = "fasteval"
//! radians = false
//! scientific = true
//!
//! [speech]
//! enabled = true
//! command = "espeak"
//! args = ["-s", "150"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::calculator::{Engine, Mode};
use crate::error::Result;
use crate::speech::{CommandSpeaker, LogSpeaker, Muted, Speaker};

/// Top-level configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Expression engine.
    pub engine: Engine,
    /// Trigonometric functions take radians.
    pub radians: bool,
    /// Start with the scientific keypad.
    pub scientific: bool,
    /// Storage file; defaults to the data directory.
    pub storage_path: Option<PathBuf>,
    pub speech: SpeechConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: Engine::default(),
            radians: true,
            scientific: false,
            storage_path: None,
            speech: SpeechConfig::default(),
        }
    }
}

/// Result read-out settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub enabled: bool,
    /// External program used to speak; results are logged when unset.
    pub command: Option<String>,
    pub args: Vec<String>,
}

impl SpeechConfig {
    /// Build the configured speaker.
    pub fn speaker(&self) -> Box<dyn Speaker> {
        match (self.enabled, &self.command) {
            (false, _) => Box::new(Muted),
            (true, Some(command)) => Box::new(CommandSpeaker::new(command, self.args.clone())),
            (true, None) => Box::new(LogSpeaker),
        }
    }
}

impl Config {
    /// Default location: `<config dir>/mintcalc/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mintcalc")
            .join("config.toml")
    }

    /// Load from `path`, falling back to defaults when the file is missing.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Keypad mode flags at startup.
    pub fn mode(&self) -> Mode {
        Mode {
            scientific: self.scientific,
            radians: self.radians,
        }
    }

    /// Storage file in effect.
    pub fn storage_path(&self) -> PathBuf {
        self.storage_path
            .clone()
            .unwrap_or_else(crate::storage::FileStorage::default_path)
    }
}
