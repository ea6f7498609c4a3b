//! Application entry point for Whisper Translate.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk; on first run, write the defaults out.
//! 3. Create the [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the Whisper, translation and speech engines from config.
//! 5. Create the session channels (`command`, `event`).
//! 6. Spawn the session orchestrator on the tokio runtime.
//! 7. Run [`eframe::run_native`], which blocks the main thread until the
//!    window is closed.

use std::sync::Arc;

use eframe::egui;
use tokio::sync::mpsc;
use whisper_translate::{
    app::WhisperTranslateApp,
    config::{AppConfig, AppPaths},
    session::{
        new_shared_session, Engines, Session, SessionCommand, SessionEvent, SessionOrchestrator,
    },
    stt::{ModelPaths, TranscribeParams, WhisperEngine},
    translate::GoogleTranslator,
    tts::GoogleTts,
};

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (width, height) = config.ui.window_size;
    let vp = egui::ViewportBuilder::default()
        .with_title("Whisper Translate")
        .with_inner_size([width, height])
        .with_min_inner_size([480.0, 360.0])
        .with_drag_and_drop(true);

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Whisper Translate starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    let paths = AppPaths::new();
    if !paths.settings_file.exists() {
        match config.save() {
            Ok(()) => log::info!("Wrote default settings to {}", paths.settings_file.display()),
            Err(e) => log::warn!("Could not write default settings: {e}"),
        }
    }

    // 3. Tokio runtime (2 worker threads; Whisper runs on the blocking pool)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    // 4. Engines
    let models = ModelPaths::new(config.stt.resolved_models_dir(&paths));
    let available = models.list_local_models();
    if available.is_empty() {
        log::warn!(
            "No Whisper models found in {}; transcription will fail until one is downloaded",
            models.models_dir.display()
        );
    } else {
        log::info!("Whisper models available: {available:?}");
    }

    let engines = Engines {
        stt: Arc::new(WhisperEngine::new(
            models.clone(),
            TranscribeParams::from_config(&config.stt),
        )),
        translator: Arc::new(GoogleTranslator::from_config(&config.translate)),
        synthesizer: Arc::new(GoogleTts::from_config(&config.tts)),
    };

    // 5. Channel setup
    let (command_tx, command_rx) = mpsc::channel::<SessionCommand>(16);
    let (event_tx, event_rx) = mpsc::channel::<SessionEvent>(32);

    // 6. Session orchestrator
    let shared = new_shared_session();
    let orchestrator = SessionOrchestrator::new(
        Session::new(engines, config.storage.clone()),
        Arc::clone(&shared),
    );
    rt.spawn(orchestrator.run(command_rx, event_tx));

    // 7. UI (blocks until the window is closed)
    let app = WhisperTranslateApp::new(command_tx, event_rx, shared, models, &config);
    let options = native_options(&config);

    eframe::run_native(
        "Whisper Translate",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {e}"))?;

    log::info!("Whisper Translate shut down");
    Ok(())
}
