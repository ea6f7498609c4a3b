//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::language::NO_TRANSLATION;
use crate::stt::ModelSize;

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Settings for the Whisper STT engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttConfig {
    /// Model size pre-selected in the UI on startup.
    pub default_model: ModelSize,
    /// Spoken language as an ISO-639-1 code, or `"auto"` for Whisper's
    /// built-in language detection.
    pub language: String,
    /// Attempt GPU-accelerated inference when available.
    pub use_gpu: bool,
    /// Overrides the platform models directory from [`AppPaths`].
    pub models_dir: Option<PathBuf>,
    /// Beam width for decoding; `0` selects greedy decoding.
    #[serde(default)]
    pub beam_size: i32,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            default_model: ModelSize::Base,
            language: "auto".into(),
            use_gpu: false,
            models_dir: None,
            beam_size: 0,
        }
    }
}

impl SttConfig {
    /// The directory GGML model files are read from.
    pub fn resolved_models_dir(&self, paths: &AppPaths) -> PathBuf {
        self.models_dir
            .clone()
            .unwrap_or_else(|| paths.models_dir.clone())
    }
}

// ---------------------------------------------------------------------------
// TranslateConfig
// ---------------------------------------------------------------------------

/// Settings for the machine-translation REST endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Base URL of the translation endpoint (no trailing slash).
    pub base_url: String,
    /// Source language sent with every request; `"auto"` lets the service
    /// detect it.
    pub source_language: String,
    /// Maximum seconds to wait for a translation response.
    pub timeout_secs: u64,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            base_url: "https://translate.googleapis.com".into(),
            source_language: "auto".into(),
            timeout_secs: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// TtsConfig
// ---------------------------------------------------------------------------

/// Settings for the speech-synthesis REST endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    /// Base URL of the synthesis endpoint (no trailing slash).
    pub base_url: String,
    /// Longest text (in characters) sent in a single synthesis request.
    pub max_chunk_chars: usize,
    /// Maximum seconds to wait for each synthesis response.
    pub timeout_secs: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://translate.google.com".into(),
            max_chunk_chars: 100,
            timeout_secs: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// StorageConfig
// ---------------------------------------------------------------------------

/// Where transcription runs and transient uploads are written.
///
/// Relative paths resolve against the process working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Parent of the per-run `<name>_<timestamp>` folders.
    pub results_dir: PathBuf,
    /// Scratch directory for uploaded audio while it is being transcribed.
    pub temp_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("Results"),
            temp_dir: PathBuf::from("TempUploads"),
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// egui window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Target language label selected on startup.
    pub default_target_language: String,
    /// Initial window inner size `(width, height)` in points.
    pub window_size: (f32, f32),
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_target_language: NO_TRANSLATION.into(),
            window_size: (720.0, 760.0),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use whisper_translate::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// STT engine settings.
    pub stt: SttConfig,
    /// Translation endpoint settings.
    pub translate: TranslateConfig,
    /// Speech-synthesis endpoint settings.
    pub tts: TtsConfig,
    /// Result and scratch directories.
    pub storage: StorageConfig,
    /// UI settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
