//! Audio resampling and channel mixing utilities.
//!
//! The Whisper STT engine requires **16 kHz mono `f32`** audio, and the
//! playback device usually runs at 44.1 or 48 kHz. This module provides the
//! two conversion steps:
//!
//! 1. [`stereo_to_mono`]: downmix any number of interleaved channels to mono.
//! 2. [`resample`]: band-limited sinc resampling (`rubato::SincFixedIn` with
//!    a `BlackmanHarris2` window) between arbitrary rates.

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use thiserror::Error;

/// Sample rate Whisper expects.
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Frames handed to rubato per `process` call.
const CHUNK_FRAMES: usize = 1024;

// ---------------------------------------------------------------------------
// ResampleError
// ---------------------------------------------------------------------------

/// Errors raised while building or running the resampler.
#[derive(Debug, Error)]
pub enum ResampleError {
    #[error("failed to construct resampler: {0}")]
    Construction(#[from] rubato::ResamplerConstructionError),

    #[error("resampling failed: {0}")]
    Process(#[from] rubato::ResampleError),
}

// ---------------------------------------------------------------------------
// stereo_to_mono
// ---------------------------------------------------------------------------

/// Mix interleaved multi-channel audio down to mono by averaging all channels.
///
/// The output length is `samples.len() / channels`.
///
/// * If `channels == 1` the input slice is returned as an owned `Vec`.
/// * If `channels == 0` an empty vector is returned.
///
/// # Example
///
/// ```rust
/// use whisper_translate::audio::stereo_to_mono;
///
/// let stereo = vec![0.5_f32, -0.5, 0.2, -0.2]; // L R L R
/// let mono = stereo_to_mono(&stereo, 2);
/// assert_eq!(mono.len(), 2);
/// assert!((mono[0] - 0.0).abs() < 1e-6);
/// ```
pub fn stereo_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = n as usize;
            samples
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}

// ---------------------------------------------------------------------------
// resample
// ---------------------------------------------------------------------------

/// Resample mono `samples` from `source_rate` Hz to `target_rate` Hz.
///
/// * Equal rates or empty input return a copy of the input.
/// * The output length is `round(samples.len() * target_rate / source_rate)`;
///   the filter delay is trimmed from the front.
pub fn resample(
    samples: &[f32],
    source_rate: u32,
    target_rate: u32,
) -> Result<Vec<f32>, ResampleError> {
    if source_rate == target_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = target_rate as f64 / source_rate as f64;
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, CHUNK_FRAMES, 1)?;

    let expected = (samples.len() as f64 * ratio).round() as usize;
    let delay = resampler.output_delay();
    let mut output = Vec::with_capacity(expected + delay);

    let mut chunks = samples.chunks_exact(CHUNK_FRAMES);
    for chunk in &mut chunks {
        let waves = resampler.process(&[chunk][..], None)?;
        output.extend_from_slice(&waves[0]);
    }

    let remainder = chunks.remainder();
    if !remainder.is_empty() {
        let waves = resampler.process_partial(Some(&[remainder][..]), None)?;
        output.extend_from_slice(&waves[0]);
    }

    // Push zeros through until the delayed tail has come out.
    while output.len() < expected + delay {
        let waves = resampler.process_partial(None::<&[&[f32]]>, None)?;
        if waves[0].is_empty() {
            break;
        }
        output.extend_from_slice(&waves[0]);
    }

    output.drain(..delay.min(output.len()));
    output.truncate(expected);
    Ok(output)
}

/// Convenience wrapper for the Whisper input rate.
pub fn resample_to_16k(samples: &[f32], source_rate: u32) -> Result<Vec<f32>, ResampleError> {
    resample(samples, source_rate, WHISPER_SAMPLE_RATE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
