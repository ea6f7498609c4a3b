//! STT (Speech-to-Text) engine module.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  SttEngine (trait)                   │
//! │                                                      │
//! │   ┌─────────────┐    ┌──────────────┐                │
//! │   │  ModelPaths │    │ WhisperEngine│                │
//! │   │ - resolve   │───▶│ - ctx cache  │                │
//! │   │ - exists?   │    │ - params     │                │
//! │   └─────────────┘    └──────┬───────┘                │
//! │                             │                        │
//! │                             ▼                        │
//! │            ┌────────────────────────────────┐        │
//! │            │ transcribe(model, audio path)  │        │
//! │            │ decode → 16 kHz mono → text    │        │
//! │            └────────────────────────────────┘        │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use whisper_translate::stt::{ModelPaths, ModelSize, SttEngine, TranscribeParams, WhisperEngine};
//!
//! let engine = WhisperEngine::new(ModelPaths::new("models"), TranscribeParams::default());
//! let text = engine.transcribe(ModelSize::Base, Path::new("meeting.mp3")).unwrap();
//! println!("{text}");
//! ```

pub mod engine;
pub mod model;
pub mod transcribe;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use engine::{SttEngine, SttError, WhisperEngine};
pub use model::{ModelInfo, ModelPaths, ModelSize, WHISPER_MODELS};
pub use transcribe::{SamplingStrategy, Segment, TranscribeParams, TranscriptionResult};

#[cfg(test)]
pub use engine::MockSttEngine;
