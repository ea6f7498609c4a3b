//! Machine-translation module.
//!
//! * [`Translator`]: async trait implemented by translation backends.
//! * [`GoogleTranslator`]: client for the public `translate_a/single` endpoint.
//! * [`TranslateError`]: error variants for translation requests.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use whisper_translate::config::TranslateConfig;
//! use whisper_translate::translate::{GoogleTranslator, Translator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let translator = GoogleTranslator::from_config(&TranslateConfig::default());
//!     let text = translator.translate("Hello world", "es").await.unwrap();
//!     println!("{text}");
//! }
//! ```

pub mod translator;

pub use translator::{parse_response, GoogleTranslator, TranslateError, Translator};

#[cfg(test)]
pub use translator::MockTranslator;
