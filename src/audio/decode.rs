//! Format-agnostic audio decoding via `symphonia`.
//!
//! Two entry points:
//!
//! * [`decode_for_transcription`]: audio file on disk → 16 kHz mono `f32`,
//!   ready for Whisper.
//! * [`decode_bytes`]: in-memory encoded audio (the MP3 stream returned by
//!   the synthesis engine) → interleaved `f32` at the native rate.

use std::fs::File;
use std::io::Cursor;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

use super::resample::{resample_to_16k, stereo_to_mono, ResampleError};

// ---------------------------------------------------------------------------
// DecodeError
// ---------------------------------------------------------------------------

/// Errors raised while opening or decoding an audio stream.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cannot open audio file: {0}")]
    Open(#[from] std::io::Error),

    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("no decodable audio track found")]
    NoTrack,

    #[error("cannot determine sample rate")]
    UnknownSampleRate,

    #[error("decode error: {0}")]
    Decode(String),

    #[error(transparent)]
    Resample(#[from] ResampleError),
}

// ---------------------------------------------------------------------------
// DecodedAudio
// ---------------------------------------------------------------------------

/// Fully decoded PCM audio.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Interleaved samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Native sample rate in Hz.
    pub sample_rate: u32,
    /// Number of interleaved channels.
    pub channels: u16,
}

impl DecodedAudio {
    /// Duration in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / (self.sample_rate as f32 * self.channels as f32)
    }

    /// Downmix to mono, keeping the native rate.
    pub fn to_mono(&self) -> Vec<f32> {
        stereo_to_mono(&self.samples, self.channels)
    }
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Decode an audio file and convert it to 16 kHz mono for Whisper.
///
/// The file extension is used as a probe hint; mp3, wav, m4a and mp4
/// containers are supported.
pub fn decode_for_transcription(path: &Path) -> Result<Vec<f32>, DecodeError> {
    let decoded = decode_file(path)?;
    log::debug!(
        "decoded {}: {} Hz, {} ch, {:.1}s",
        path.display(),
        decoded.sample_rate,
        decoded.channels,
        decoded.duration_secs()
    );
    let mono = decoded.to_mono();
    Ok(resample_to_16k(&mono, decoded.sample_rate)?)
}

/// Decode an audio file at its native rate and channel layout.
pub fn decode_file(path: &Path) -> Result<DecodedAudio, DecodeError> {
    let file = File::open(path)?;

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    decode_source(Box::new(file), hint)
}

/// Decode in-memory encoded audio. `extension` is an optional probe hint
/// such as `"mp3"`.
pub fn decode_bytes(bytes: Vec<u8>, extension: Option<&str>) -> Result<DecodedAudio, DecodeError> {
    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    decode_source(Box::new(Cursor::new(bytes)), hint)
}

// ---------------------------------------------------------------------------
// Decode loop
// ---------------------------------------------------------------------------

fn decode_source(source: Box<dyn MediaSource>, hint: Hint) -> Result<DecodedAudio, DecodeError> {
    let mss = MediaSourceStream::new(source, Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| DecodeError::UnsupportedFormat(e.to_string()))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoTrack)?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut sample_rate = codec_params.sample_rate;
    let mut channels = codec_params.channels.map(|c| c.count() as u16);

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::UnsupportedFormat(e.to_string()))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(DecodeError::Decode(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // Corrupt frames are skipped rather than failing the whole file.
            Err(SymphoniaError::IoError(_)) | Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => return Err(DecodeError::Decode(e.to_string())),
        };

        let spec = *decoded.spec();
        sample_rate.get_or_insert(spec.rate);
        channels.get_or_insert(spec.channels.count() as u16);

        let num_frames = decoded.capacity();
        let sbuf =
            sample_buf.get_or_insert_with(|| SampleBuffer::<f32>::new(num_frames as u64, spec));
        if sbuf.capacity() < num_frames {
            *sbuf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        }

        sbuf.copy_interleaved_ref(decoded);
        samples.extend_from_slice(sbuf.samples());
    }

    Ok(DecodedAudio {
        samples,
        sample_rate: sample_rate.ok_or(DecodeError::UnknownSampleRate)?,
        channels: channels.unwrap_or(1),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Minimal 16-bit PCM WAV encoder for fixtures.
    fn wav_bytes(sample_rate: u32, channels: u16, samples: &[i16]) -> Vec<u8> {
        let data_len = (samples.len() * 2) as u32;
        let byte_rate = sample_rate * channels as u32 * 2;
        let mut out = Vec::with_capacity(44 + data_len as usize);
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&channels.to_le_bytes());
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&byte_rate.to_le_bytes());
        out.extend_from_slice(&(channels * 2).to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        for s in samples {
            out.extend_from_slice(&s.to_le_bytes());
        }
        out
    }

    #[test]
    fn missing_file_is_open_error() {
        let err = decode_file(Path::new("/nonexistent/clip.mp3")).unwrap_err();
        assert!(matches!(err, DecodeError::Open(_)));
    }

    #[test]
    fn garbage_bytes_are_unsupported() {
        let err = decode_bytes(vec![0x42; 512], Some("mp3")).unwrap_err();
        assert!(
            matches!(err, DecodeError::UnsupportedFormat(_) | DecodeError::NoTrack),
            "got {err:?}"
        );
    }

    #[test]
    fn decodes_in_memory_wav() {
        let bytes = wav_bytes(8_000, 1, &vec![0i16; 8_000]);
        let decoded = decode_bytes(bytes, Some("wav")).unwrap();
        assert_eq!(decoded.sample_rate, 8_000);
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.samples.len(), 8_000);
        assert!((decoded.duration_secs() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn stereo_wav_file_becomes_16k_mono() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone.wav");

        // 1 s of stereo 32 kHz audio.
        let samples: Vec<i16> = (0..32_000 * 2).map(|i| ((i % 50) * 100) as i16).collect();
        std::fs::write(&path, wav_bytes(32_000, 2, &samples)).unwrap();

        let pcm = decode_for_transcription(&path).unwrap();
        assert_eq!(pcm.len(), 16_000);
    }
}
