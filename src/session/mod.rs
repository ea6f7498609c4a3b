//! Session module: state, transitions and the orchestrator task.
//!
//! # Architecture
//!
//! ```text
//! SessionCommand (mpsc)
//!        │
//!        ▼
//! SessionOrchestrator::run()  ← async tokio task
//!        │
//!        ├─ Transcribe      → Session::transcribe   (→ select_language)
//!        ├─ SelectLanguage  → Session::select_language
//!        └─ Speak           → Session::speak
//!        │
//!        ├─▶ SessionEvent (mpsc) ──▶ UI
//!        └─▶ SharedSession (Arc<Mutex<SessionSnapshot>>) ←── read by egui update()
//! ```

pub mod runner;
pub mod state;
pub mod transitions;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{SessionCommand, SessionEvent, SessionOrchestrator};
pub use state::{
    new_shared_session, SessionPhase, SessionSnapshot, SessionState, SharedSession, SpeechSource,
};
pub use transitions::{Engines, Session, TransitionError, TranslationOutcome};
