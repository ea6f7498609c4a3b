//! Text-to-speech module.
//!
//! * [`SpeechSynthesizer`]: async trait implemented by synthesis backends.
//! * [`GoogleTts`]: client for the public `translate_tts` endpoint.
//! * [`split_text`]: chunking of long text to the per-request limit.
//! * [`TtsError`]: error variants for synthesis requests.

pub mod chunk;
pub mod synthesizer;

pub use chunk::split_text;
pub use synthesizer::{GoogleTts, SpeechSynthesizer, TtsError};

#[cfg(test)]
pub use synthesizer::MockSynthesizer;
