//! Speaker output via `cpal`.
//!
//! [`AudioPlayer::play`] decodes an encoded clip (the MP3 stream returned by
//! the synthesis engine), converts it to the default output device's rate and
//! starts a stream. The returned [`PlaybackHandle`] is a RAII guard; dropping
//! it stops playback.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;

use super::decode::{decode_bytes, DecodeError};
use super::resample::{resample, ResampleError};

// ---------------------------------------------------------------------------
// PlaybackError
// ---------------------------------------------------------------------------

/// Errors that can occur while preparing or starting playback.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no output device found on the default audio host")]
    NoDevice,

    #[error("output device uses unsupported sample format {0:?}")]
    UnsupportedSampleFormat(cpal::SampleFormat),

    #[error("audio clip is empty")]
    EmptyClip,

    #[error("failed to query default output config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Resample(#[from] ResampleError),
}

// ---------------------------------------------------------------------------
// PlaybackHandle
// ---------------------------------------------------------------------------

/// Keeps the output stream alive and reports progress.
pub struct PlaybackHandle {
    _stream: cpal::Stream,
    position: Arc<AtomicUsize>,
    len: usize,
}

impl PlaybackHandle {
    /// `true` once every frame has been handed to the device.
    pub fn is_finished(&self) -> bool {
        self.position.load(Ordering::Relaxed) >= self.len
    }

    /// Playback progress in `[0.0, 1.0]`.
    pub fn progress(&self) -> f32 {
        if self.len == 0 {
            return 1.0;
        }
        (self.position.load(Ordering::Relaxed) as f32 / self.len as f32).min(1.0)
    }
}

// ---------------------------------------------------------------------------
// AudioPlayer
// ---------------------------------------------------------------------------

/// Default-output-device player.
#[derive(Debug, Default, Clone, Copy)]
pub struct AudioPlayer;

impl AudioPlayer {
    pub fn new() -> Self {
        Self
    }

    /// Decode `encoded` (an MP3 clip) and start playing it.
    pub fn play(&self, encoded: Vec<u8>) -> Result<PlaybackHandle, PlaybackError> {
        let decoded = decode_bytes(encoded, Some("mp3"))?;
        let mono = decoded.to_mono();
        if mono.is_empty() {
            return Err(PlaybackError::EmptyClip);
        }

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(PlaybackError::NoDevice)?;

        let supported = device.default_output_config()?;
        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(PlaybackError::UnsupportedSampleFormat(
                supported.sample_format(),
            ));
        }

        let config: cpal::StreamConfig = supported.into();
        let device_channels = config.channels as usize;
        let frames = Arc::new(resample(&mono, decoded.sample_rate, config.sample_rate.0)?);
        let len = frames.len();

        log::debug!(
            "playback: {:.1}s clip, {} Hz → {} Hz, {} ch",
            decoded.duration_secs(),
            decoded.sample_rate,
            config.sample_rate.0,
            device_channels
        );

        let position = Arc::new(AtomicUsize::new(0));
        let cb_frames = Arc::clone(&frames);
        let cb_position = Arc::clone(&position);

        let stream = device.build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let mut pos = cb_position.load(Ordering::Relaxed);
                for frame in data.chunks_mut(device_channels.max(1)) {
                    let sample = cb_frames.get(pos).copied().unwrap_or(0.0);
                    frame.fill(sample);
                    if pos < cb_frames.len() {
                        pos += 1;
                    }
                }
                cb_position.store(pos, Ordering::Relaxed);
            },
            |err| log::error!("playback stream error: {err}"),
            None,
        )?;

        stream.play()?;

        Ok(PlaybackHandle {
            _stream: stream,
            position,
            len,
        })
    }
}
