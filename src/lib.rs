//! Whisper Translate: transcribe audio files with Whisper, translate the
//! text, and read either aloud.

pub mod app;
pub mod audio;
pub mod config;
pub mod language;
pub mod session;
pub mod storage;
pub mod stt;
pub mod translate;
pub mod tts;
