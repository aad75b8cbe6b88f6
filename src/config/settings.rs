//! Settings record, defaults and TOML persistence.
//!
//! [`GreetingConfig`] is a flat record: every field carries a serde default,
//! so a file with missing keys still loads and unknown keys are ignored.
//! Whole-record saves go through a temporary sibling file and a rename, so a
//! failed save never leaves a half-written `settings.toml` behind.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::AppPaths;

/// Model identifier used when none is configured.
pub const DEFAULT_MODEL: &str = "gemma2-9b-it";

/// OpenAI-compatible chat-completions endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors from the strict load/save path.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading, writing or renaming the settings file failed.
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The file exists but is not a valid settings record.
    #[error("malformed settings file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The record could not be serialised.
    #[error("cannot serialise settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Language the greeting is requested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Russian,
}

impl Language {
    /// Every selectable language, in display order.
    pub const ALL: [Language; 2] = [Language::English, Language::Russian];

    /// Display label, identical to the persisted value.
    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Russian => "Russian",
        }
    }
}

// ---------------------------------------------------------------------------
// GreetingConfig
// ---------------------------------------------------------------------------

/// The persisted settings record, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use good_morning::config::GreetingConfig;
///
/// // Missing or malformed file yields the defaults.
/// let mut config = GreetingConfig::load();
/// config.name = "Alice".into();
/// config.save().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GreetingConfig {
    /// API token for the hosted text-generation endpoint.
    pub token: String,
    /// Name the greeting is addressed to.
    pub name: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Language of the default prompt template.
    pub language: Language,
    /// Custom prompt template. `None` selects the language default.
    pub prompt: Option<String>,
    /// Custom font file. Persisted for the settings flow; not applied by the widget.
    pub font_path: Option<PathBuf>,
    /// Chat-completions URL.
    pub endpoint: String,
    /// Seconds to wait for the whole streamed response.
    pub timeout_secs: u64,
}

impl Default for GreetingConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            name: String::new(),
            model: DEFAULT_MODEL.into(),
            language: Language::default(),
            prompt: None,
            font_path: None,
            endpoint: DEFAULT_ENDPOINT.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GreetingConfig {
    /// `true` once both a token and a name are present; generation must not
    /// be attempted before that.
    pub fn is_complete(&self) -> bool {
        !self.token.trim().is_empty() && !self.name.trim().is_empty()
    }

    /// Trim identifier fields and fold blank values back to their defaults.
    ///
    /// The prompt template is kept verbatim unless it is blank. Idempotent,
    /// and the identity on a record that is already normalised.
    pub fn normalized(mut self) -> Self {
        self.token = self.token.trim().to_string();
        self.name = self.name.trim().to_string();

        self.model = self.model.trim().to_string();
        if self.model.is_empty() {
            self.model = DEFAULT_MODEL.into();
        }

        self.endpoint = self.endpoint.trim().to_string();
        if self.endpoint.is_empty() {
            self.endpoint = DEFAULT_ENDPOINT.into();
        }

        if self.timeout_secs == 0 {
            self.timeout_secs = DEFAULT_TIMEOUT_SECS;
        }

        self.prompt = self.prompt.filter(|p| !p.trim().is_empty());
        self.font_path = self
            .font_path
            .filter(|p| !p.as_os_str().is_empty());
        self
    }

    /// Load from the platform `settings.toml`; never fails.
    pub fn load() -> Self {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from `path`, falling back to defaults when the file is missing or
    /// malformed.
    pub fn load_from(path: &Path) -> Self {
        match Self::try_load_from(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!(
                    "Ignoring unreadable settings at {} ({e}); using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Strict load: a missing file is still `Ok(default)`, but I/O and parse
    /// failures are reported.
    pub fn try_load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config.normalized())
    }

    /// Save to the platform `settings.toml`, creating parent directories.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Overwrite `path` with the whole record, in the normalised form that
    /// [`try_load_from`](Self::try_load_from) returns.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&self.clone().normalized())?;

        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, content)?;
        if let Err(e) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        log::debug!("Settings saved to {}", path.display());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
