//! Core STT engine trait and implementations.
//!
//! # Overview
//!
//! [`SttEngine`] is the public interface used by the session.  It is
//! object-safe and `Send + Sync` so it can be held behind an `Arc<dyn SttEngine>`
//! and moved onto tokio's blocking pool.
//!
//! [`WhisperEngine`] is the production implementation: it decodes the audio
//! file, then runs `whisper_rs` with the GGML model for the requested
//! [`ModelSize`]. Loaded models are cached per size.
//!
//! [`MockSttEngine`] (available under `#[cfg(test)]`) returns a pre-configured
//! response and counts its calls.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use whisper_rs::{FullParams, WhisperContext, WhisperContextParameters};

use crate::audio::{decode_for_transcription, WHISPER_SAMPLE_RATE};
use crate::stt::model::{ModelPaths, ModelSize};
use crate::stt::transcribe::{SamplingStrategy, Segment, TranscribeParams, TranscriptionResult};

// ---------------------------------------------------------------------------
// SttError
// ---------------------------------------------------------------------------

/// All errors that can arise from the STT subsystem.
#[derive(Debug, Clone, Error)]
pub enum SttError {
    /// The GGML model file was not found at the given path.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// `whisper_rs` failed to initialise a `WhisperContext` or `WhisperState`.
    #[error("Whisper context initialisation failed: {0}")]
    ContextInit(String),

    /// The audio file could not be opened or decoded.
    #[error("Could not read audio: {0}")]
    Decode(String),

    /// The audio file decoded to zero samples.
    #[error("Audio file contains no samples")]
    EmptyAudio,

    /// An error occurred during the inference pass.
    #[error("Transcription error: {0}")]
    Transcription(String),
}

// ---------------------------------------------------------------------------
// SttEngine trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for speech-to-text engines.
///
/// # Contract
///
/// - `audio_path` points at an mp3/wav/m4a/mp4 file.
/// - `model` selects the accuracy/speed trade-off.
/// - The returned text is the engine's raw output; callers trim it.
pub trait SttEngine: Send + Sync {
    fn transcribe(&self, model: ModelSize, audio_path: &Path) -> Result<String, SttError>;
}

// Compile-time assertion: Box<dyn SttEngine> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SttEngine>) {}
};

// ---------------------------------------------------------------------------
// WhisperEngine
// ---------------------------------------------------------------------------

/// Production STT engine backed by `whisper_rs`.
///
/// Models are loaded lazily on first use of each [`ModelSize`] and kept for
/// the lifetime of the engine. A fresh `WhisperState` is created for every
/// call.
pub struct WhisperEngine {
    paths: ModelPaths,
    params: TranscribeParams,
    contexts: Mutex<HashMap<ModelSize, Arc<WhisperContext>>>,
}

impl std::fmt::Debug for WhisperEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperEngine")
            .field("paths", &self.paths)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

// SAFETY: WhisperContext is Send+Sync as declared by whisper-rs; the model
// weights are read-only after loading and the cache map is behind a Mutex.
unsafe impl Send for WhisperEngine {}
unsafe impl Sync for WhisperEngine {}

impl WhisperEngine {
    pub fn new(paths: ModelPaths, params: TranscribeParams) -> Self {
        Self {
            paths,
            params,
            contexts: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached context for `model`, loading it on first use.
    ///
    /// # Errors
    ///
    /// - [`SttError::ModelNotFound`]: the GGML file does not exist.
    /// - [`SttError::ContextInit`]: whisper-rs failed to load the file.
    fn context(&self, model: ModelSize) -> Result<Arc<WhisperContext>, SttError> {
        let mut cache = self
            .contexts
            .lock()
            .map_err(|_| SttError::ContextInit("model cache lock poisoned".into()))?;

        if let Some(ctx) = cache.get(&model) {
            return Ok(Arc::clone(ctx));
        }

        let path = self.paths.model_path(model);
        if !path.exists() {
            return Err(SttError::ModelNotFound(path.display().to_string()));
        }

        let path_str = path.to_str().ok_or_else(|| {
            SttError::ModelNotFound(format!(
                "model path contains non-UTF-8 characters: {}",
                path.display()
            ))
        })?;

        let mut ctx_params = WhisperContextParameters::default();
        ctx_params.use_gpu(self.params.use_gpu);

        let ctx = WhisperContext::new_with_params(path_str, ctx_params)
            .map_err(|e| SttError::ContextInit(e.to_string()))?;

        log::info!("Whisper model loaded: {}", path.display());
        let ctx = Arc::new(ctx);
        cache.insert(model, Arc::clone(&ctx));
        Ok(ctx)
    }

    /// Decode `audio_path`, run inference and return a
    /// [`TranscriptionResult`] with per-segment timing information.
    ///
    /// Prefer [`SttEngine::transcribe`] when only the text is needed.
    pub fn transcribe_full(
        &self,
        model: ModelSize,
        audio_path: &Path,
    ) -> Result<TranscriptionResult, SttError> {
        let ctx = self.context(model)?;

        let audio =
            decode_for_transcription(audio_path).map_err(|e| SttError::Decode(e.to_string()))?;
        if audio.is_empty() {
            return Err(SttError::EmptyAudio);
        }
        let audio_ms = audio.len() as u64 * 1_000 / WHISPER_SAMPLE_RATE as u64;

        // ── Build FullParams ──────────────────────────────────────────────
        use whisper_rs::SamplingStrategy as WS;
        let ws = match self.params.strategy {
            SamplingStrategy::Greedy { best_of } => WS::Greedy { best_of },
            SamplingStrategy::BeamSearch { beam_size, patience } => {
                WS::BeamSearch { beam_size, patience }
            }
        };

        let mut fp = FullParams::new(ws);

        let lang: Option<&str> = if self.params.language == "auto" {
            None
        } else {
            Some(self.params.language.as_str())
        };
        fp.set_language(lang);
        fp.set_n_threads(self.params.n_threads);

        if self.params.suppress_progress {
            fp.set_print_progress(false);
            fp.set_print_realtime(false);
        }

        // ── Create per-call state and run inference ───────────────────────
        let mut state = ctx
            .create_state()
            .map_err(|e| SttError::ContextInit(e.to_string()))?;

        let wall_start = std::time::Instant::now();

        state
            .full(fp, &audio)
            .map_err(|e| SttError::Transcription(e.to_string()))?;

        // ── Collect segments ──────────────────────────────────────────────
        let n_segments = state
            .full_n_segments()
            .map_err(|e| SttError::Transcription(e.to_string()))?;

        let mut text = String::new();
        let mut segments: Vec<Segment> = Vec::with_capacity(n_segments.max(0) as usize);

        for i in 0..n_segments {
            let seg_text = state
                .full_get_segment_text(i)
                .map_err(|e| SttError::Transcription(format!("segment {i}: {e}")))?;

            // Timestamps are in centiseconds.
            let t0 = state.full_get_segment_t0(i).unwrap_or(0).max(0) as u64 * 10;
            let t1 = state.full_get_segment_t1(i).unwrap_or(0).max(0) as u64 * 10;

            text.push_str(&seg_text);
            segments.push(Segment {
                text: seg_text,
                start_ms: t0,
                end_ms: t1,
            });
        }

        let duration_ms = wall_start.elapsed().as_millis();
        log::info!(
            "transcribed {} ({} ms audio) with {model} in {duration_ms} ms",
            audio_path.display(),
            audio_ms
        );

        Ok(TranscriptionResult {
            text: text.trim().to_string(),
            segments,
            audio_ms,
            duration_ms,
        })
    }
}

impl SttEngine for WhisperEngine {
    fn transcribe(&self, model: ModelSize, audio_path: &Path) -> Result<String, SttError> {
        self.transcribe_full(model, audio_path).map(|r| r.text)
    }
}

// ---------------------------------------------------------------------------
// MockSttEngine  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a pre-configured response without loading any
/// model file, and records how it was called.
#[cfg(test)]
pub struct MockSttEngine {
    response: Result<String, SttError>,
    calls: Mutex<Vec<(ModelSize, std::path::PathBuf, bool)>>,
}

#[cfg(test)]
impl MockSttEngine {
    /// Create a mock that always returns `Ok(text)`.
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that always returns `Err(error)`.
    pub fn err(error: SttError) -> Self {
        Self {
            response: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Number of `transcribe` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// `(model, path, file existed at call time)` for each call.
    pub fn calls(&self) -> Vec<(ModelSize, std::path::PathBuf, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl SttEngine for MockSttEngine {
    fn transcribe(&self, model: ModelSize, audio_path: &Path) -> Result<String, SttError> {
        self.calls
            .lock()
            .unwrap()
            .push((model, audio_path.to_path_buf(), audio_path.exists()));
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
