//! Session state and the snapshot shared with the UI.
//!
//! [`SessionState`] is the single source of truth for one user session. Only
//! the transitions in [`Session`](super::Session) mutate it.
//!
//! [`SharedSession`] is a type alias for `Arc<Mutex<SessionSnapshot>>`. The
//! orchestrator replaces the snapshot after every step; the egui update loop
//! clones it each frame.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::storage::RunFolder;

// ---------------------------------------------------------------------------
// SessionPhase
// ---------------------------------------------------------------------------

/// What the orchestrator is doing right now.
///
/// ```text
/// Idle ──Transcribe──▶ Transcribing ──(chained)──▶ Idle
///      ──SelectLanguage──▶ Translating ──▶ Idle
///      ──Speak──▶ Speaking ──▶ Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Transcribing,
    Translating,
    Speaking,
}

impl SessionPhase {
    /// Returns `true` while a transition is running.
    ///
    /// The UI disables its action buttons while busy.
    pub fn is_busy(&self) -> bool {
        !matches!(self, SessionPhase::Idle)
    }

    /// A short human-readable label for the status line.
    pub fn label(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "Ready",
            SessionPhase::Transcribing => "Transcribing…",
            SessionPhase::Translating => "Translating…",
            SessionPhase::Speaking => "Generating speech…",
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Durable data of one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Trimmed text of the last successful transcription.
    pub transcription: String,

    /// Translation of `transcription` into `target_language_code`.
    ///
    /// Empty when no target language is selected or the last attempt failed.
    pub translation: String,

    /// Registry label the current `translation` is for, or empty.
    pub target_language_label: String,

    /// Engine code for `target_language_label`.
    pub target_language_code: Option<String>,

    /// `true` once a transcription has succeeded.
    pub has_result: bool,

    /// Description of the last failed translation attempt, or empty.
    pub translation_error: String,

    /// Result folder of the current run.
    pub output_folder: Option<PathBuf>,
}

impl SessionState {
    /// Drop the current translation and its language.
    pub fn clear_translation(&mut self) {
        self.translation.clear();
        self.target_language_label.clear();
        self.target_language_code = None;
    }

    /// Returns `true` if a translation is available.
    pub fn is_translated(&self) -> bool {
        !self.translation.is_empty() && self.target_language_code.is_some()
    }

    /// Path of `transcription.txt` for the current run.
    pub fn transcription_file(&self) -> Option<PathBuf> {
        self.output_folder
            .as_ref()
            .map(|dir| RunFolder::open(dir.clone()).transcription_path())
    }

    /// Path of the persisted translation for the current label.
    pub fn translation_file(&self) -> Option<PathBuf> {
        if !self.is_translated() {
            return None;
        }
        self.output_folder
            .as_ref()
            .map(|dir| RunFolder::open(dir.clone()).translation_path(&self.target_language_label))
    }
}

// ---------------------------------------------------------------------------
// SpeechSource
// ---------------------------------------------------------------------------

/// Which text a read-aloud request refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechSource {
    Transcription,
    Translation,
}

// ---------------------------------------------------------------------------
// SharedSession
// ---------------------------------------------------------------------------

/// What the UI renders from: the current phase plus the last published state.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub state: SessionState,
}

/// Thread-safe handle to the [`SessionSnapshot`].
///
/// Lock for a short critical section; do **not** hold the lock across
/// `.await` points.
pub type SharedSession = Arc<Mutex<SessionSnapshot>>;

/// Construct a new [`SharedSession`] wrapping an empty snapshot.
pub fn new_shared_session() -> SharedSession {
    Arc::new(Mutex::new(SessionSnapshot::default()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn translated() -> SessionState {
        SessionState {
            transcription: "Hello world".into(),
            translation: "Hola mundo".into(),
            target_language_label: "Spanish".into(),
            target_language_code: Some("es".into()),
            has_result: true,
            translation_error: String::new(),
            output_folder: Some(PathBuf::from("/r/run")),
        }
    }

    #[test]
    fn default_state_is_empty() {
        let st = SessionState::default();
        assert!(!st.has_result);
        assert!(st.transcription.is_empty());
        assert!(st.output_folder.is_none());
        assert!(!st.is_translated());
    }

    #[test]
    fn clear_translation_keeps_transcription() {
        let mut st = translated();
        st.clear_translation();
        assert_eq!(st.transcription, "Hello world");
        assert!(st.translation.is_empty());
        assert!(st.target_language_label.is_empty());
        assert!(st.target_language_code.is_none());
        assert!(st.has_result);
    }

    #[test]
    fn file_paths_follow_run_layout() {
        let st = translated();
        assert_eq!(
            st.transcription_file(),
            Some(PathBuf::from("/r/run/transcription.txt"))
        );
        assert_eq!(
            st.translation_file(),
            Some(PathBuf::from("/r/run/Translations/Spanish_translation.txt"))
        );
    }

    #[test]
    fn no_translation_file_without_translation() {
        let mut st = translated();
        st.clear_translation();
        assert!(st.translation_file().is_none());
    }

    #[test]
    fn phase_busy_and_labels() {
        assert!(!SessionPhase::Idle.is_busy());
        assert!(SessionPhase::Transcribing.is_busy());
        assert!(SessionPhase::Translating.is_busy());
        assert!(SessionPhase::Speaking.is_busy());
        assert_eq!(SessionPhase::Idle.label(), "Ready");
        assert_eq!(SessionPhase::default(), SessionPhase::Idle);
    }

    #[test]
    fn shared_session_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedSession>();
    }

    #[test]
    fn shared_session_can_be_cloned_and_mutated() {
        let shared = new_shared_session();
        let other = Arc::clone(&shared);
        shared.lock().unwrap().phase = SessionPhase::Speaking;
        assert_eq!(other.lock().unwrap().phase, SessionPhase::Speaking);
    }
}
