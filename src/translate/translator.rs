//! `Translator` trait and the `GoogleTranslator` REST client.
//!
//! The endpoint is the keyless `translate_a/single` API used by browser
//! extensions. The base URL comes from [`TranslateConfig`] so tests and
//! self-hosted proxies can point it elsewhere.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::TranslateConfig;

// ---------------------------------------------------------------------------
// TranslateError
// ---------------------------------------------------------------------------

/// Errors that can occur while translating text.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// HTTP transport or connection error.
    #[error("translation request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("translation request timed out")]
    Timeout,

    /// The service answered with a non-success HTTP status.
    #[error("translation service returned HTTP {0}")]
    Status(u16),

    /// The response body was not the expected nested JSON array.
    #[error("failed to parse translation response: {0}")]
    Parse(String),

    /// The service returned no translated text.
    #[error("translation service returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for TranslateError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranslateError::Timeout
        } else {
            TranslateError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Translator trait
// ---------------------------------------------------------------------------

/// Async trait for text translation.
///
/// # Arguments
/// * `text` – Source text; the source language is detected by the backend.
/// * `dest` – Target code as listed in the language registry (`"es"`,
///   `"zh-cn"`, ...).
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, dest: &str) -> Result<String, TranslateError>;
}

// ---------------------------------------------------------------------------
// GoogleTranslator
// ---------------------------------------------------------------------------

/// Calls `<base_url>/translate_a/single?client=gtx&dt=t`.
pub struct GoogleTranslator {
    client: reqwest::Client,
    config: TranslateConfig,
}

impl GoogleTranslator {
    /// Build a `GoogleTranslator` from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`.
    pub fn from_config(config: &TranslateConfig) -> Self {
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
            "{}/translate_a/single",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, dest: &str) -> Result<String, TranslateError> {
        let url = self.endpoint();
        log::debug!("translate → {url} (tl={dest}, {} chars)", text.chars().count());

        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", self.config.source_language.as_str()),
                ("tl", dest),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::Status(status.as_u16()));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslateError::Parse(e.to_string()))?;

        parse_response(&json)
    }
}

/// Extract the translated text from a `translate_a/single` response.
///
/// The body looks like `[[["Hola ", "Hello ", ...], ["mundo", "world", ...]], null, "en"]`;
/// the first element of every inner segment is concatenated and trimmed.
pub fn parse_response(json: &serde_json::Value) -> Result<String, TranslateError> {
    let segments = json
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| TranslateError::Parse("missing segment list".into()))?;

    let mut out = String::new();
    for segment in segments {
        if let Some(piece) = segment.get(0).and_then(|v| v.as_str()) {
            out.push_str(piece);
        }
    }

    let out = out.trim();
    if out.is_empty() {
        return Err(TranslateError::EmptyResponse);
    }
    Ok(out.to_string())
}

// ---------------------------------------------------------------------------
// MockTranslator  (test-only)
// ---------------------------------------------------------------------------

/// A test double returning a fixed translation and recording `(text, dest)`
/// for every call.
#[cfg(test)]
pub struct MockTranslator {
    response: Result<String, String>,
    calls: std::sync::Mutex<Vec<(String, String)>>,
}

#[cfg(test)]
impl MockTranslator {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Always fails with [`TranslateError::Request`] carrying `message`.
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
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, dest: &str) -> Result<String, TranslateError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), dest.to_string()));
        self.response.clone().map_err(TranslateError::Request)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
