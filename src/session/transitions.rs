//! Session transitions: transcribe, select a target language, speak.
//!
//! Each transition is triggered by exactly one UI command and runs to
//! completion before the next one starts. Engine failures come back as typed
//! errors; nothing unwinds past a transition.

use std::sync::Arc;

use chrono::Local;
use thiserror::Error;

use crate::config::StorageConfig;
use crate::language::{resolve, to_synthesis_code};
use crate::storage::{AudioUpload, RunFolder, StorageError, TempUpload};
use crate::stt::{ModelSize, SttEngine, SttError};
use crate::translate::{TranslateError, Translator};
use crate::tts::{SpeechSynthesizer, TtsError};

use super::state::{SessionState, SpeechSource};

// ---------------------------------------------------------------------------
// TransitionError
// ---------------------------------------------------------------------------

/// Failures reported to the user by a transition.
///
/// Translation failures are not in this list: they are recorded in
/// [`SessionState::translation_error`] instead.
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("Please choose an audio file first")]
    NoAudio,

    #[error("Unsupported audio file {0:?} (expected mp3, wav, m4a or mp4)")]
    UnsupportedFormat(String),

    #[error("Transcription failed: {0}")]
    Transcription(#[from] SttError),

    #[error("There is no text to read aloud")]
    NothingToSpeak,

    #[error("Speech synthesis failed: {0}")]
    Synthesis(#[from] TtsError),

    #[error("Could not save results: {0}")]
    Storage(#[from] StorageError),

    /// A blocking task panicked or was cancelled.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TransitionError {
    /// Warnings are shown in a softer style than errors.
    pub fn is_warning(&self) -> bool {
        matches!(self, TransitionError::NothingToSpeak)
    }
}

// ---------------------------------------------------------------------------
// TranslationOutcome
// ---------------------------------------------------------------------------

/// How a translation attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    /// There is no transcription to translate; translation fields cleared.
    NoTranscription,
    /// "No translation" was selected; translation fields cleared.
    Cleared,
    /// The translation was stored and persisted.
    Translated { label: String },
    /// The attempt failed; the message is also in `translation_error`.
    Failed(String),
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The three engines a session talks to.
#[derive(Clone)]
pub struct Engines {
    pub stt: Arc<dyn SttEngine>,
    pub translator: Arc<dyn Translator>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
}

/// One user session: its state plus the engines and directories the
/// transitions use.
pub struct Session {
    state: SessionState,
    engines: Engines,
    storage: StorageConfig,
}

impl Session {
    /// Start an empty session.
    pub fn new(engines: Engines, storage: StorageConfig) -> Self {
        Self::with_state(engines, storage, SessionState::default())
    }

    /// Resume a session from an existing state.
    pub fn with_state(engines: Engines, storage: StorageConfig, state: SessionState) -> Self {
        Self {
            state,
            engines,
            storage,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    // -----------------------------------------------------------------------
    // Transcription
    // -----------------------------------------------------------------------

    /// Transcribe `upload` with `model`, persist the text, and chain into
    /// [`select_language`](Self::select_language) when `selected_label`
    /// names a real target language.
    ///
    /// On error the state is left exactly as it was. The transient copy of
    /// the upload is removed on every path.
    pub async fn transcribe(
        &mut self,
        upload: Option<AudioUpload>,
        model: ModelSize,
        selected_label: &str,
    ) -> Result<Option<TranslationOutcome>, TransitionError> {
        self.transcribe_upload(upload, model).await?;
        if self.chains_translation(selected_label) {
            return Ok(Some(self.select_language(selected_label).await));
        }
        Ok(None)
    }

    /// The transcription half of [`transcribe`](Self::transcribe), without
    /// the chained translation.
    pub async fn transcribe_upload(
        &mut self,
        upload: Option<AudioUpload>,
        model: ModelSize,
    ) -> Result<(), TransitionError> {
        let upload = upload.ok_or(TransitionError::NoAudio)?;
        if !upload.has_supported_extension() {
            return Err(TransitionError::UnsupportedFormat(upload.file_name));
        }

        log::info!("transcribing {} with model {model}", upload.file_name);

        let temp = TempUpload::persist(&self.storage.temp_dir, &upload)?;
        let stt = Arc::clone(&self.engines.stt);
        let audio_path = temp.path().to_path_buf();
        let joined = tokio::task::spawn_blocking(move || stt.transcribe(model, &audio_path)).await;
        drop(temp);

        let text = match joined {
            Ok(Ok(text)) => text.trim().to_string(),
            Ok(Err(e)) => {
                log::error!("transcription failed: {e}");
                return Err(e.into());
            }
            Err(e) => return Err(TransitionError::Internal(e.to_string())),
        };

        let run = RunFolder::create_with_transcription(
            &self.storage.results_dir,
            &upload.file_name,
            Local::now(),
            &text,
        )?;

        self.state.transcription = text;
        self.state.has_result = true;
        self.state.output_folder = Some(run.path().to_path_buf());
        self.state.clear_translation();
        self.state.translation_error.clear();

        log::info!(
            "transcription saved to {} ({} chars)",
            run.path().display(),
            self.state.transcription.chars().count()
        );

        Ok(())
    }

    /// Whether a finished transcription is followed by a translation into
    /// `selected_label`.
    pub fn chains_translation(&self, selected_label: &str) -> bool {
        resolve(selected_label).is_some() && !self.state.transcription.is_empty()
    }

    // -----------------------------------------------------------------------
    // Translation
    // -----------------------------------------------------------------------

    /// Translate the current transcription into the language labelled
    /// `label`, replacing any previous translation.
    ///
    /// Never fails: problems are recorded in `translation_error`.
    pub async fn select_language(&mut self, label: &str) -> TranslationOutcome {
        if self.state.transcription.is_empty() {
            self.state.clear_translation();
            return TranslationOutcome::NoTranscription;
        }

        self.state.translation_error.clear();

        let Some(code) = resolve(label) else {
            log::info!("translation cleared");
            self.state.clear_translation();
            return TranslationOutcome::Cleared;
        };

        log::info!("translating to {label} ({code})");

        match self.translate_and_persist(label, code).await {
            Ok(translation) => {
                self.state.translation = translation;
                self.state.target_language_label = label.to_string();
                self.state.target_language_code = Some(code.to_string());
                TranslationOutcome::Translated {
                    label: label.to_string(),
                }
            }
            Err(message) => {
                log::warn!("translation to {label} failed: {message}");
                self.state.clear_translation();
                self.state.translation_error = message.clone();
                TranslationOutcome::Failed(message)
            }
        }
    }

    async fn translate_and_persist(&self, label: &str, code: &str) -> Result<String, String> {
        let translation = self
            .engines
            .translator
            .translate(&self.state.transcription, code)
            .await
            .map_err(|e| e.to_string())?
            .trim()
            .to_string();

        if translation.is_empty() {
            return Err(TranslateError::EmptyResponse.to_string());
        }

        match &self.state.output_folder {
            Some(dir) => {
                RunFolder::open(dir.clone())
                    .write_translation(label, &translation)
                    .map_err(|e| e.to_string())?;
            }
            None => log::warn!("no result folder for this run; translation not saved"),
        }

        Ok(translation)
    }

    // -----------------------------------------------------------------------
    // Synthesis
    // -----------------------------------------------------------------------

    /// Synthesize speech for the transcription or the translation.
    ///
    /// The transcription is read with the default voice; the translation with
    /// the voice for its target language. Never touches the state.
    pub async fn speak(&self, source: SpeechSource) -> Result<Vec<u8>, TransitionError> {
        match source {
            SpeechSource::Transcription => self.speak_text(&self.state.transcription, None).await,
            SpeechSource::Translation => {
                self.speak_text(
                    &self.state.translation,
                    self.state.target_language_code.as_deref(),
                )
                .await
            }
        }
    }

    /// Synthesize `text` in the voice for translation code `code`.
    pub async fn speak_text(
        &self,
        text: &str,
        code: Option<&str>,
    ) -> Result<Vec<u8>, TransitionError> {
        let text = text.trim();
        if text.is_empty() {
            log::warn!("read aloud requested with no text");
            return Err(TransitionError::NothingToSpeak);
        }

        let lang = to_synthesis_code(code);
        log::info!("synthesizing {} chars as {lang}", text.chars().count());

        let audio = self.engines.synthesizer.synthesize(text, &lang).await?;
        if audio.is_empty() {
            return Err(TtsError::EmptyAudio.into());
        }
        Ok(audio)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::stt::MockSttEngine;
    use crate::translate::MockTranslator;
    use crate::tts::MockSynthesizer;

    // -----------------------------------------------------------------------
    // Harness
    // -----------------------------------------------------------------------

    struct Harness {
        dir: tempfile::TempDir,
        stt: Arc<MockSttEngine>,
        translator: Arc<MockTranslator>,
        synth: Arc<MockSynthesizer>,
        session: Session,
    }

    impl Harness {
        fn new(stt: MockSttEngine, translator: MockTranslator, synth: MockSynthesizer) -> Self {
            Self::build(stt, translator, synth, SessionState::default(), |_| {})
        }

        fn build(
            stt: MockSttEngine,
            translator: MockTranslator,
            synth: MockSynthesizer,
            state: SessionState,
            configure: impl FnOnce(&mut StorageConfig),
        ) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let mut storage = StorageConfig {
                results_dir: dir.path().join("Results"),
                temp_dir: dir.path().join("TempUploads"),
            };
            configure(&mut storage);

            let stt = Arc::new(stt);
            let translator = Arc::new(translator);
            let synth = Arc::new(synth);
            let engines = Engines {
                stt: stt.clone(),
                translator: translator.clone(),
                synthesizer: synth.clone(),
            };

            Self {
                dir,
                stt,
                translator,
                synth,
                session: Session::with_state(engines, storage, state),
            }
        }

        fn standard() -> Self {
            Self::new(
                MockSttEngine::ok("  Hello world \n"),
                MockTranslator::ok(" Hola mundo "),
                MockSynthesizer::ok(vec![0xFF, 0xFB, 0x90, 0x00]),
            )
        }

        fn with_state(state: SessionState, translator: MockTranslator) -> Self {
            Self::build(
                MockSttEngine::ok("Hello world"),
                translator,
                MockSynthesizer::ok(vec![1, 2, 3]),
                state,
                |_| {},
            )
        }

        fn state(&self) -> &SessionState {
            self.session.state()
        }

        fn results_dir(&self) -> PathBuf {
            self.dir.path().join("Results")
        }
    }

    fn upload() -> Option<AudioUpload> {
        Some(AudioUpload::new("meeting.mp3", vec![1, 2, 3, 4]))
    }

    fn transcribed_state(dir: &Path) -> SessionState {
        fs::create_dir_all(dir).unwrap();
        SessionState {
            transcription: "Hello world".into(),
            has_result: true,
            output_folder: Some(dir.to_path_buf()),
            ..SessionState::default()
        }
    }

    fn read(path: impl AsRef<Path>) -> String {
        fs::read_to_string(path).unwrap()
    }

    // -----------------------------------------------------------------------
    // Transcription
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn no_audio_is_reported_without_engine_call() {
        let mut h = Harness::standard();

        let err = h
            .session
            .transcribe(None, ModelSize::Base, "Spanish")
            .await
            .unwrap_err();

        assert!(matches!(err, TransitionError::NoAudio));
        assert_eq!(h.stt.call_count(), 0);
        assert_eq!(h.translator.call_count(), 0);
        assert!(!h.state().has_result);
        assert_eq!(*h.state(), SessionState::default());
    }

    #[tokio::test]
    async fn unsupported_extension_is_rejected() {
        let mut h = Harness::standard();
        let upload = Some(AudioUpload::new("notes.txt", vec![1]));

        let err = h
            .session
            .transcribe(upload, ModelSize::Base, "None")
            .await
            .unwrap_err();

        assert!(matches!(err, TransitionError::UnsupportedFormat(ref n) if n == "notes.txt"));
        assert_eq!(h.stt.call_count(), 0);
    }

    #[tokio::test]
    async fn success_without_target_language() {
        let mut h = Harness::standard();

        let outcome = h
            .session
            .transcribe(upload(), ModelSize::Small, "None")
            .await
            .unwrap();

        assert_eq!(outcome, None);
        let st = h.state();
        assert!(st.has_result);
        assert_eq!(st.transcription, "Hello world");
        assert_eq!(st.translation, "");
        assert!(st.target_language_code.is_none());
        assert_eq!(h.translator.call_count(), 0);

        let folder = st.output_folder.clone().unwrap();
        assert!(folder.starts_with(h.results_dir()));
        let name = folder.file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with("meeting_"), "{name}");
        assert_eq!(read(folder.join("transcription.txt")), "Hello world");
    }

    #[tokio::test]
    async fn engine_gets_persisted_file_which_is_removed_afterwards() {
        let mut h = Harness::standard();

        h.session
            .transcribe(upload(), ModelSize::Medium, "None")
            .await
            .unwrap();

        let calls = h.stt.calls();
        assert_eq!(calls.len(), 1);
        let (model, path, existed) = &calls[0];
        assert_eq!(*model, ModelSize::Medium);
        assert!(*existed, "upload must be on disk while the engine runs");
        assert_eq!(path.file_name().unwrap(), "meeting.mp3");
        assert!(!path.exists(), "temp upload must be removed");
    }

    #[tokio::test]
    async fn hello_world_to_spanish_is_chained() {
        let mut h = Harness::standard();

        let outcome = h
            .session
            .transcribe(upload(), ModelSize::Base, "Spanish")
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Some(TranslationOutcome::Translated {
                label: "Spanish".into()
            })
        );
        let st = h.state();
        assert_eq!(st.transcription, "Hello world");
        assert_eq!(st.translation, "Hola mundo");
        assert_eq!(st.target_language_label, "Spanish");
        assert_eq!(st.target_language_code.as_deref(), Some("es"));
        assert_eq!(
            h.translator.calls(),
            vec![("Hello world".to_string(), "es".to_string())]
        );

        let file = st
            .output_folder
            .clone()
            .unwrap()
            .join("Translations")
            .join("Spanish_translation.txt");
        assert_eq!(read(file), "Hola mundo");
        let folder = st.output_folder.clone().unwrap();
        assert_eq!(
            st.translation_file(),
            Some(folder.join("Translations/Spanish_translation.txt"))
        );
    }

    #[tokio::test]
    async fn engine_failure_leaves_state_intact_and_cleans_up() {
        let prior = SessionState {
            transcription: "earlier".into(),
            translation: "antes".into(),
            target_language_label: "Spanish".into(),
            target_language_code: Some("es".into()),
            has_result: true,
            translation_error: String::new(),
            output_folder: Some(PathBuf::from("/earlier/run")),
        };
        let mut h = Harness::build(
            MockSttEngine::err(SttError::Transcription("bad audio".into())),
            MockTranslator::ok("x"),
            MockSynthesizer::ok(vec![1]),
            prior.clone(),
            |_| {},
        );

        let err = h
            .session
            .transcribe(upload(), ModelSize::Base, "Spanish")
            .await
            .unwrap_err();

        assert!(matches!(err, TransitionError::Transcription(_)));
        assert!(err.to_string().contains("bad audio"));
        assert_eq!(*h.state(), prior);
        assert_eq!(h.translator.call_count(), 0);
        assert!(!h.stt.calls()[0].1.exists());
        assert!(!h.results_dir().exists());
    }

    #[tokio::test]
    async fn storage_failure_leaves_state_intact() {
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let blocker_path = blocker.path().to_path_buf();
        let mut h = Harness::build(
            MockSttEngine::ok("Hello"),
            MockTranslator::ok("Hola"),
            MockSynthesizer::ok(vec![1]),
            SessionState::default(),
            move |s| s.results_dir = blocker_path.join("Results"),
        );

        let err = h
            .session
            .transcribe(upload(), ModelSize::Base, "Spanish")
            .await
            .unwrap_err();

        assert!(matches!(err, TransitionError::Storage(_)));
        assert_eq!(*h.state(), SessionState::default());
        assert!(!h.stt.calls()[0].1.exists());
        assert!(!blocker.path().join("Results").exists());
    }

    #[tokio::test]
    async fn new_transcription_resets_previous_translation() {
        let mut h = Harness::with_state(
            SessionState {
                transcription: "old".into(),
                translation: "viejo".into(),
                target_language_label: "Spanish".into(),
                target_language_code: Some("es".into()),
                has_result: true,
                translation_error: "earlier failure".into(),
                output_folder: None,
            },
            MockTranslator::ok("unused"),
        );

        h.session
            .transcribe(upload(), ModelSize::Base, "None")
            .await
            .unwrap();

        let st = h.state();
        assert_eq!(st.transcription, "Hello world");
        assert!(st.translation.is_empty());
        assert!(st.target_language_label.is_empty());
        assert!(st.target_language_code.is_none());
        assert!(st.translation_error.is_empty());
        assert!(st.output_folder.is_some());
    }

    #[tokio::test]
    async fn empty_recognition_skips_chained_translation() {
        let mut h = Harness::new(
            MockSttEngine::ok("   \n"),
            MockTranslator::ok("Hola"),
            MockSynthesizer::ok(vec![1]),
        );

        let outcome = h
            .session
            .transcribe(upload(), ModelSize::Tiny, "Spanish")
            .await
            .unwrap();

        assert_eq!(outcome, None);
        assert!(h.state().has_result);
        assert_eq!(h.state().transcription, "");
        assert_eq!(h.translator.call_count(), 0);
    }

    #[tokio::test]
    async fn repeated_uploads_get_distinct_folders() {
        let mut h = Harness::standard();

        h.session
            .transcribe(upload(), ModelSize::Base, "None")
            .await
            .unwrap();
        let first = h.state().output_folder.clone().unwrap();
        h.session
            .transcribe(upload(), ModelSize::Base, "None")
            .await
            .unwrap();
        let second = h.state().output_folder.clone().unwrap();

        assert_ne!(first, second);
        assert!(first.join("transcription.txt").exists());
        assert!(second.join("transcription.txt").exists());
    }

    // -----------------------------------------------------------------------
    // Translation
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn selecting_none_clears_translation() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = Harness::with_state(
            transcribed_state(dir.path()),
            MockTranslator::ok("Hola mundo"),
        );

        h.session.select_language("Spanish").await;
        assert_eq!(h.state().translation, "Hola mundo");

        let outcome = h.session.select_language("None").await;

        assert_eq!(outcome, TranslationOutcome::Cleared);
        let st = h.state();
        assert_eq!(st.translation, "");
        assert!(st.target_language_label.is_empty());
        assert!(st.target_language_code.is_none());
        assert_eq!(st.transcription, "Hello world");
        assert_eq!(h.translator.call_count(), 1);
    }

    #[tokio::test]
    async fn no_transcription_means_no_engine_call() {
        let mut h = Harness::with_state(
            SessionState {
                translation: "stale".into(),
                target_language_label: "French".into(),
                target_language_code: Some("fr".into()),
                ..SessionState::default()
            },
            MockTranslator::ok("Bonjour"),
        );

        let outcome = h.session.select_language("French").await;

        assert_eq!(outcome, TranslationOutcome::NoTranscription);
        assert_eq!(h.translator.call_count(), 0);
        assert!(h.state().translation.is_empty());
        assert!(h.state().target_language_code.is_none());
    }

    #[tokio::test]
    async fn engine_failure_is_captured_in_translation_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = transcribed_state(dir.path());
        state.translation = "Hola".into();
        state.target_language_label = "Spanish".into();
        state.target_language_code = Some("es".into());
        let mut h = Harness::with_state(state, MockTranslator::err("network down"));

        let outcome = h.session.select_language("German").await;

        assert!(matches!(outcome, TranslationOutcome::Failed(ref m) if m.contains("network down")));
        let st = h.state();
        assert_eq!(st.transcription, "Hello world");
        assert!(st.translation.is_empty());
        assert!(st.target_language_label.is_empty());
        assert!(st.target_language_code.is_none());
        assert!(st.translation_error.contains("network down"));
    }

    #[tokio::test]
    async fn new_attempt_clears_previous_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = transcribed_state(dir.path());
        state.translation_error = "network down".into();
        let mut h = Harness::with_state(state, MockTranslator::ok("Ciao mondo"));

        h.session.select_language("Italian").await;

        assert!(h.state().translation_error.is_empty());
        assert_eq!(h.state().translation, "Ciao mondo");
        assert_eq!(h.translator.calls()[0].1, "it");
    }

    #[tokio::test]
    async fn selecting_none_clears_previous_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = transcribed_state(dir.path());
        state.translation_error = "network down".into();
        let mut h = Harness::with_state(state, MockTranslator::ok("x"));

        h.session.select_language("None").await;

        assert!(h.state().translation_error.is_empty());
    }

    #[tokio::test]
    async fn retranslating_overwrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = Harness::with_state(
            transcribed_state(dir.path()),
            MockTranslator::ok("Hola mundo"),
        );

        h.session.select_language("Spanish").await;
        let path = dir.path().join("Translations/Spanish_translation.txt");
        let first_content = read(&path);
        let first_translation = h.state().translation.clone();

        h.session.select_language("Spanish").await;

        assert_eq!(read(&path), first_content);
        assert_eq!(read(&path), "Hola mundo");
        assert_eq!(h.state().translation, first_translation);
        assert_eq!(h.translator.call_count(), 2);
    }

    #[tokio::test]
    async fn each_language_gets_its_own_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = Harness::with_state(
            transcribed_state(dir.path()),
            MockTranslator::ok("translated"),
        );

        h.session.select_language("Spanish").await;
        h.session.select_language("Chinese (Traditional)").await;

        assert!(dir.path().join("Translations/Spanish_translation.txt").exists());
        assert!(dir
            .path()
            .join("Translations/Chinese (Traditional)_translation.txt")
            .exists());
        assert_eq!(h.state().target_language_code.as_deref(), Some("zh-tw"));
    }

    #[tokio::test]
    async fn blank_translation_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = Harness::with_state(
            transcribed_state(dir.path()),
            MockTranslator::ok("   "),
        );

        let outcome = h.session.select_language("Korean").await;

        assert!(matches!(outcome, TranslationOutcome::Failed(_)));
        assert!(!h.state().translation_error.is_empty());
        assert!(h.state().translation.is_empty());
        assert!(!dir.path().join("Translations").exists());
    }

    #[tokio::test]
    async fn unwritable_folder_is_captured_as_translation_error() {
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let state = SessionState {
            transcription: "Hello world".into(),
            has_result: true,
            output_folder: Some(blocker.path().to_path_buf()),
            ..SessionState::default()
        };
        let mut h = Harness::with_state(state, MockTranslator::ok("Hallo Welt"));

        let outcome = h.session.select_language("German").await;

        assert!(matches!(outcome, TranslationOutcome::Failed(_)));
        assert!(!h.state().translation_error.is_empty());
        assert!(h.state().translation.is_empty());
        assert_eq!(h.state().transcription, "Hello world");
    }

    // -----------------------------------------------------------------------
    // Synthesis
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn transcription_is_spoken_with_default_voice() {
        let dir = tempfile::tempdir().unwrap();
        let h = Harness::with_state(transcribed_state(dir.path()), MockTranslator::ok("x"));
        let before = h.state().clone();

        let audio = h.session.speak(SpeechSource::Transcription).await.unwrap();

        assert_eq!(audio, vec![1, 2, 3]);
        assert_eq!(
            h.synth.calls(),
            vec![("Hello world".to_string(), "en".to_string())]
        );
        assert_eq!(*h.state(), before);
    }

    #[tokio::test]
    async fn translation_is_spoken_with_normalised_code() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = Harness::with_state(
            transcribed_state(dir.path()),
            MockTranslator::ok("你好世界"),
        );
        h.session.select_language("Chinese (Simplified)").await;

        h.session.speak(SpeechSource::Translation).await.unwrap();

        assert_eq!(
            h.synth.calls(),
            vec![("你好世界".to_string(), "zh".to_string())]
        );
    }

    #[tokio::test]
    async fn empty_text_is_a_warning_without_engine_call() {
        let dir = tempfile::tempdir().unwrap();
        let h = Harness::with_state(transcribed_state(dir.path()), MockTranslator::ok("x"));

        let err = h.session.speak(SpeechSource::Translation).await.unwrap_err();

        assert!(matches!(err, TransitionError::NothingToSpeak));
        assert!(err.is_warning());
        assert_eq!(h.synth.call_count(), 0);
    }

    #[tokio::test]
    async fn whitespace_text_is_nothing_to_speak() {
        let h = Harness::standard();
        let err = h.session.speak_text("  \n ", Some("fr")).await.unwrap_err();
        assert!(matches!(err, TransitionError::NothingToSpeak));
        assert_eq!(h.synth.call_count(), 0);
    }

    #[tokio::test]
    async fn synthesis_failure_is_reported_without_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let state = transcribed_state(dir.path());
        let h = Harness::build(
            MockSttEngine::ok("x"),
            MockTranslator::ok("x"),
            MockSynthesizer::err("service unavailable"),
            state.clone(),
            |_| {},
        );

        let err = h.session.speak(SpeechSource::Transcription).await.unwrap_err();

        assert!(matches!(err, TransitionError::Synthesis(_)));
        assert!(!err.is_warning());
        assert_eq!(*h.state(), state);
    }

    #[tokio::test]
    async fn empty_audio_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let h = Harness::build(
            MockSttEngine::ok("x"),
            MockTranslator::ok("x"),
            MockSynthesizer::ok(Vec::new()),
            transcribed_state(dir.path()),
            |_| {},
        );

        let err = h.session.speak(SpeechSource::Transcription).await.unwrap_err();

        assert!(matches!(err, TransitionError::Synthesis(TtsError::EmptyAudio)));
    }

    #[tokio::test]
    async fn speak_text_trims_before_synthesis() {
        let h = Harness::standard();
        h.session.speak_text("  Bonjour  ", Some("fr")).await.unwrap();
        assert_eq!(
            h.synth.calls(),
            vec![("Bonjour".to_string(), "fr".to_string())]
        );
    }
}
