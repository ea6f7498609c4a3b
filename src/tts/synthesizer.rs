//! `SpeechSynthesizer` trait and the `GoogleTts` REST client.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::TtsConfig;
use crate::tts::chunk::split_text;

// ---------------------------------------------------------------------------
// TtsError
// ---------------------------------------------------------------------------

/// Errors that can occur during speech synthesis.
#[derive(Debug, Error)]
pub enum TtsError {
    /// HTTP transport or connection error.
    #[error("speech request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("speech request timed out")]
    Timeout,

    /// The service answered with a non-success HTTP status.
    #[error("speech service returned HTTP {0}")]
    Status(u16),

    /// The service returned a zero-length audio stream.
    #[error("speech service returned no audio")]
    EmptyAudio,

    /// Nothing to say after trimming.
    #[error("no text to synthesize")]
    EmptyText,
}

impl From<reqwest::Error> for TtsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TtsError::Timeout
        } else {
            TtsError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechSynthesizer trait
// ---------------------------------------------------------------------------

/// Async trait for text-to-speech backends.
///
/// `lang` is a synthesis code as produced by
/// [`to_synthesis_code`](crate::language::to_synthesis_code). The returned
/// bytes are an MP3 stream.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, TtsError>;
}

// ---------------------------------------------------------------------------
// GoogleTts
// ---------------------------------------------------------------------------

/// Calls `<base_url>/translate_tts?client=tw-ob` once per text chunk and
/// concatenates the MP3 responses.
pub struct GoogleTts {
    client: reqwest::Client,
    config: TtsConfig,
}

impl GoogleTts {
    /// Build a `GoogleTts` from application config.
    pub fn from_config(config: &TtsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/translate_tts",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn fetch_chunk(
        &self,
        url: &str,
        chunk: &str,
        lang: &str,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>, TtsError> {
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();

        let response = self
            .client
            .get(url)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", lang),
                ("q", chunk),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TtsError::Status(status.as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, TtsError> {
        let chunks = split_text(text, self.config.max_chunk_chars);
        if chunks.is_empty() {
            return Err(TtsError::EmptyText);
        }

        let url = self.endpoint();
        log::debug!("tts → {url} (tl={lang}, {} chunks)", chunks.len());

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let bytes = self
                .fetch_chunk(&url, chunk, lang, idx, chunks.len())
                .await?;
            audio.extend_from_slice(&bytes);
        }

        if audio.is_empty() {
            return Err(TtsError::EmptyAudio);
        }
        Ok(audio)
    }
}

// ---------------------------------------------------------------------------
// MockSynthesizer  (test-only)
// ---------------------------------------------------------------------------

/// A test double returning fixed audio bytes and recording `(text, lang)`
/// for every call.
#[cfg(test)]
pub struct MockSynthesizer {
    response: Result<Vec<u8>, String>,
    calls: std::sync::Mutex<Vec<(String, String)>>,
}

#[cfg(test)]
impl MockSynthesizer {
    pub fn ok(bytes: Vec<u8>) -> Self {
        Self {
            response: Ok(bytes),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Always fails with [`TtsError::Request`] carrying `message`.
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, TtsError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), lang.to_string()));
        self.response.clone().map_err(TtsError::Request)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
