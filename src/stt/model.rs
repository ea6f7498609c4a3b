//! Model registry, metadata and path resolution.
//!
//! [`ModelSize`] is the accuracy/speed selector offered in the UI. Each size
//! maps to one standard multilingual Whisper GGML file in [`WHISPER_MODELS`];
//! [`ModelPaths`] resolves where that file lives on disk.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ModelSize
// ---------------------------------------------------------------------------

/// Capacity tier of a Whisper GGML model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSize {
    /// ~75 MB, fastest.
    Tiny,
    /// ~142 MB.
    #[default]
    Base,
    /// ~466 MB.
    Small,
    /// ~1.5 GB.
    Medium,
    /// ~3 GB, most accurate.
    Large,
}

impl ModelSize {
    /// Every size, in selector order.
    pub const ALL: [ModelSize; 5] = [
        ModelSize::Tiny,
        ModelSize::Base,
        ModelSize::Small,
        ModelSize::Medium,
        ModelSize::Large,
    ];

    /// Lowercase name shown in the UI and used in `settings.toml`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelSize::Tiny => "tiny",
            ModelSize::Base => "base",
            ModelSize::Small => "small",
            ModelSize::Medium => "medium",
            ModelSize::Large => "large",
        }
    }

    /// Registry entry for this size.
    pub fn info(&self) -> &'static ModelInfo {
        // WHISPER_MODELS holds exactly one entry per size, in ALL order.
        &WHISPER_MODELS[*self as usize]
    }
}

impl fmt::Display for ModelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelSize::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown model size {s:?}"))
    }
}

// ---------------------------------------------------------------------------
// ModelInfo
// ---------------------------------------------------------------------------

/// Static metadata for a single GGML model file.
#[derive(Debug)]
pub struct ModelInfo {
    /// Model capacity tier.
    pub size: ModelSize,
    /// Human-readable display name shown in the UI.
    pub display_name: &'static str,
    /// File name under the models directory.
    pub file_name: &'static str,
    /// Approximate file size in megabytes.
    pub file_size_mb: u64,
    /// Source URL for downloading the GGML file.
    pub source_url: &'static str,
}

/// Standard OpenAI Whisper models (multilingual), indexed by [`ModelSize`].
pub const WHISPER_MODELS: &[ModelInfo] = &[
    ModelInfo {
        size: ModelSize::Tiny,
        display_name: "Whisper Tiny",
        file_name: "ggml-tiny.bin",
        file_size_mb: 75,
        source_url: "https://huggingface.co/ggerganov/whisper.cpp",
    },
    ModelInfo {
        size: ModelSize::Base,
        display_name: "Whisper Base",
        file_name: "ggml-base.bin",
        file_size_mb: 142,
        source_url: "https://huggingface.co/ggerganov/whisper.cpp",
    },
    ModelInfo {
        size: ModelSize::Small,
        display_name: "Whisper Small",
        file_name: "ggml-small.bin",
        file_size_mb: 466,
        source_url: "https://huggingface.co/ggerganov/whisper.cpp",
    },
    ModelInfo {
        size: ModelSize::Medium,
        display_name: "Whisper Medium",
        file_name: "ggml-medium.bin",
        file_size_mb: 1_500,
        source_url: "https://huggingface.co/ggerganov/whisper.cpp",
    },
    ModelInfo {
        size: ModelSize::Large,
        display_name: "Whisper Large-v3",
        file_name: "ggml-large-v3.bin",
        file_size_mb: 3_100,
        source_url: "https://huggingface.co/ggerganov/whisper.cpp",
    },
];

// ---------------------------------------------------------------------------
// ModelPaths
// ---------------------------------------------------------------------------

/// Resolves the on-disk location of model files.
#[derive(Debug, Clone)]
pub struct ModelPaths {
    /// Directory that contains (or will contain) GGML `.bin` files.
    pub models_dir: PathBuf,
}

impl ModelPaths {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
        }
    }

    /// Full path to the GGML file for the given size.
    pub fn model_path(&self, size: ModelSize) -> PathBuf {
        self.models_dir.join(size.info().file_name)
    }

    /// Returns `true` if the model file exists on disk.
    pub fn is_available(&self, size: ModelSize) -> bool {
        self.model_path(size).exists()
    }

    /// Sizes whose model file is present on disk.
    pub fn list_local_models(&self) -> Vec<ModelSize> {
        ModelSize::ALL
            .iter()
            .copied()
            .filter(|m| self.is_available(*m))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
