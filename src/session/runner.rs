//! Session orchestrator: one command at a time, state published after each.
//!
//! [`SessionOrchestrator`] owns the [`Session`] and responds to
//! [`SessionCommand`]s received over a `tokio::sync::mpsc` channel.
//!
//! # Flow
//!
//! ```text
//! SessionCommand::Transcribe      ─▶ phase = Transcribing
//!   └─▶ Session::transcribe_upload (Whisper on spawn_blocking)
//!         └─▶ Transcribed
//!   [label resolves] ─▶ phase = Translating
//!   └─▶ Session::select_language ─▶ + Translated | TranslationFailed
//! SessionCommand::SelectLanguage  ─▶ phase = Translating
//!   └─▶ Session::select_language ─▶ Translated | TranslationCleared | TranslationFailed
//! SessionCommand::Speak           ─▶ phase = Speaking
//!   └─▶ Session::speak           ─▶ Audio | Warning | Error
//! ```
//!
//! After every command the new [`SessionState`] is copied into the
//! [`SharedSession`] with phase `Idle`. The lock is never held across an
//! `.await`.

use std::sync::PoisonError;

use tokio::sync::mpsc;

use crate::storage::AudioUpload;
use crate::stt::ModelSize;

use super::state::{SessionPhase, SessionSnapshot, SharedSession, SpeechSource};
use super::transitions::{Session, TransitionError, TranslationOutcome};

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Commands sent from the UI thread to the orchestrator.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// Transcribe an upload; translate afterwards if `target_language`
    /// names a real language.
    Transcribe {
        upload: Option<AudioUpload>,
        model: ModelSize,
        target_language: String,
    },
    /// The target-language selector changed.
    SelectLanguage { label: String },
    /// Read the transcription or the translation aloud.
    Speak(SpeechSource),
}

/// Outcomes delivered from the orchestrator to the UI.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A transcription finished and was saved.
    Transcribed,
    /// A translation finished and was saved.
    Translated { label: String },
    /// The translation was cleared ("None" selected or nothing to translate).
    TranslationCleared,
    /// The translation engine or the file write failed.
    TranslationFailed { message: String },
    /// Synthesized MP3 audio, ready for playback.
    Audio { source: SpeechSource, bytes: Vec<u8> },
    /// A no-op request, e.g. reading empty text aloud.
    Warning { message: String },
    /// A transition failed; the session is unchanged.
    Error { message: String },
}

impl From<TranslationOutcome> for SessionEvent {
    fn from(outcome: TranslationOutcome) -> Self {
        match outcome {
            TranslationOutcome::Translated { label } => SessionEvent::Translated { label },
            TranslationOutcome::Cleared | TranslationOutcome::NoTranscription => {
                SessionEvent::TranslationCleared
            }
            TranslationOutcome::Failed(message) => SessionEvent::TranslationFailed { message },
        }
    }
}

impl From<TransitionError> for SessionEvent {
    fn from(err: TransitionError) -> Self {
        if err.is_warning() {
            SessionEvent::Warning {
                message: err.to_string(),
            }
        } else {
            SessionEvent::Error {
                message: err.to_string(),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// SessionOrchestrator
// ---------------------------------------------------------------------------

/// Drives one [`Session`].
///
/// Create with [`SessionOrchestrator::new`], then spawn [`run`](Self::run)
/// as a tokio task.
pub struct SessionOrchestrator {
    session: Session,
    shared: SharedSession,
}

impl SessionOrchestrator {
    pub fn new(session: Session, shared: SharedSession) -> Self {
        let orchestrator = Self { session, shared };
        orchestrator.publish(SessionPhase::Idle);
        orchestrator
    }

    /// Run until `command_rx` is closed.
    pub async fn run(
        mut self,
        mut command_rx: mpsc::Receiver<SessionCommand>,
        event_tx: mpsc::Sender<SessionEvent>,
    ) {
        while let Some(command) = command_rx.recv().await {
            let events = self.handle(command).await;
            self.publish(SessionPhase::Idle);

            for event in events {
                if event_tx.send(event).await.is_err() {
                    log::debug!("session: event receiver dropped");
                }
            }
        }

        log::info!("session: command channel closed, orchestrator shutting down");
    }

    async fn handle(&mut self, command: SessionCommand) -> Vec<SessionEvent> {
        match command {
            SessionCommand::Transcribe {
                upload,
                model,
                target_language,
            } => {
                self.set_phase(SessionPhase::Transcribing);
                if let Err(e) = self.session.transcribe_upload(upload, model).await {
                    log::error!("session: transcribe failed: {e}");
                    return vec![e.into()];
                }
                if !self.session.chains_translation(&target_language) {
                    return vec![SessionEvent::Transcribed];
                }

                // The transcription is shown while the translation runs.
                self.publish(SessionPhase::Translating);
                let outcome = self.session.select_language(&target_language).await;
                vec![SessionEvent::Transcribed, outcome.into()]
            }

            SessionCommand::SelectLanguage { label } => {
                self.set_phase(SessionPhase::Translating);
                vec![self.session.select_language(&label).await.into()]
            }

            SessionCommand::Speak(source) => {
                self.set_phase(SessionPhase::Speaking);
                match self.session.speak(source).await {
                    Ok(bytes) => vec![SessionEvent::Audio { source, bytes }],
                    Err(e) => {
                        log::warn!("session: speak failed: {e}");
                        vec![e.into()]
                    }
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn set_phase(&self, phase: SessionPhase) {
        let mut snapshot = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        snapshot.phase = phase;
    }

    fn publish(&self, phase: SessionPhase) {
        let state = self.session.state().clone();
        let mut snapshot = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        *snapshot = SessionSnapshot { phase, state };
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
