//! Audio plumbing: file decoding → 16 kHz mono for Whisper, and MP3 → speaker
//! playback for synthesized speech.
//!
//! # Pipeline
//!
//! ```text
//! uploaded file → symphonia decode → stereo_to_mono → rubato 16 kHz → Whisper
//! TTS MP3 bytes → symphonia decode → stereo_to_mono → rubato device rate → cpal
//! ```

pub mod decode;
pub mod playback;
pub mod resample;

pub use decode::{decode_bytes, decode_file, decode_for_transcription, DecodeError, DecodedAudio};
pub use playback::{AudioPlayer, PlaybackError, PlaybackHandle};
pub use resample::{resample, resample_to_16k, stereo_to_mono, ResampleError, WHISPER_SAMPLE_RATE};
