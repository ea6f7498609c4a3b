//! Transcription parameter types and result types.
//!
//! [`TranscribeParams`] carries all settings that control a single Whisper
//! inference run.  [`TranscriptionResult`] is returned by
//! [`WhisperEngine::transcribe_full`](crate::stt::WhisperEngine::transcribe_full).

use crate::config::SttConfig;

// ---------------------------------------------------------------------------
// SamplingStrategy
// ---------------------------------------------------------------------------

/// Mirrors `whisper_rs::SamplingStrategy` but is owned and `Clone`.
#[derive(Debug, Clone, PartialEq)]
pub enum SamplingStrategy {
    /// Greedy (single-pass) decoding.
    Greedy {
        /// Number of candidate tokens evaluated per step.  1 is fastest.
        best_of: i32,
    },
    /// Beam-search decoding.
    BeamSearch {
        /// Number of beams to maintain in parallel.
        beam_size: i32,
        /// Beam-search patience factor; `-1.0` keeps whisper.cpp's default.
        patience: f32,
    },
}

impl Default for SamplingStrategy {
    fn default() -> Self {
        Self::Greedy { best_of: 1 }
    }
}

// ---------------------------------------------------------------------------
// TranscribeParams
// ---------------------------------------------------------------------------

/// All parameters for a Whisper transcription run.
///
/// ```
/// use whisper_translate::stt::TranscribeParams;
///
/// let params = TranscribeParams {
///     language: "en".into(),
///     ..TranscribeParams::default()
/// };
/// assert!(params.n_threads >= 1);
/// ```
#[derive(Debug, Clone)]
pub struct TranscribeParams {
    /// ISO-639-1 language code, or `"auto"` to let Whisper detect it.
    pub language: String,

    /// Decoding strategy. Greedy is the fastest.
    pub strategy: SamplingStrategy,

    /// Number of CPU threads handed to Whisper, capped at 8.
    pub n_threads: i32,

    /// Ask whisper.cpp to use the GPU backend when compiled in.
    pub use_gpu: bool,

    /// Suppress Whisper's progress output to stderr.
    pub suppress_progress: bool,
}

impl Default for TranscribeParams {
    fn default() -> Self {
        Self {
            language: "auto".into(),
            strategy: SamplingStrategy::default(),
            n_threads: optimal_threads(),
            use_gpu: false,
            suppress_progress: true,
        }
    }
}

impl TranscribeParams {
    pub fn from_config(config: &SttConfig) -> Self {
        let strategy = if config.beam_size > 0 {
            SamplingStrategy::BeamSearch {
                beam_size: config.beam_size,
                patience: -1.0,
            }
        } else {
            SamplingStrategy::default()
        };
        Self {
            language: config.language.clone(),
            strategy,
            use_gpu: config.use_gpu,
            ..Self::default()
        }
    }
}

/// Returns the number of CPU threads to use for inference, capped at 8.
pub(crate) fn optimal_threads() -> i32 {
    std::thread::available_parallelism()
        .map(|n| n.get().min(8) as i32)
        .unwrap_or(4)
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// The output of a successful transcription.
#[derive(Debug, Clone)]
pub struct TranscriptionResult {
    /// Full concatenated transcript text, trimmed.
    pub text: String,

    /// Individual time-aligned segments produced by Whisper.
    pub segments: Vec<Segment>,

    /// Length of the decoded input audio, in milliseconds.
    pub audio_ms: u64,

    /// Wall-clock time the inference took, in milliseconds.
    pub duration_ms: u128,
}

/// A single time-aligned text chunk produced by Whisper.
#[derive(Debug, Clone)]
pub struct Segment {
    pub text: String,
    pub start_ms: u64,
    pub end_ms: u64,
}
