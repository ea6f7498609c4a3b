//! Whisper Translate window, an egui/eframe application.
//!
//! # Architecture
//!
//! [`WhisperTranslateApp`] is the top-level [`eframe::App`]. It never mutates
//! session state itself; it holds:
//!
//! * `command_tx`: sends [`SessionCommand`] to the session orchestrator.
//! * `event_rx`: receives [`SessionEvent`] outcomes.
//! * `shared`: the [`SharedSession`] snapshot rendered every frame.
//!
//! Synthesized speech arriving as [`SessionEvent::Audio`] is played on the
//! UI thread through [`AudioPlayer`].

use std::path::{Path, PathBuf};
use std::sync::PoisonError;
use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::audio::{AudioPlayer, PlaybackHandle};
use crate::config::AppConfig;
use crate::language::{is_known, labels, NO_TRANSLATION};
use crate::session::{SessionCommand, SessionEvent, SessionSnapshot, SharedSession, SpeechSource};
use crate::storage::{is_supported_audio, AudioUpload};
use crate::stt::{ModelPaths, ModelSize};

const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 136, 68);
const WARNING_COLOR: egui::Color32 = egui::Color32::from_rgb(230, 200, 90);
const OK_COLOR: egui::Color32 = egui::Color32::from_rgb(80, 200, 120);
const DIM_COLOR: egui::Color32 = egui::Color32::from_rgb(140, 140, 140);

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Status {
    kind: StatusKind,
    text: String,
}

impl Status {
    fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Warning,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }

    fn color(&self) -> egui::Color32 {
        match self.kind {
            StatusKind::Info => OK_COLOR,
            StatusKind::Warning => WARNING_COLOR,
            StatusKind::Error => ERROR_COLOR,
        }
    }
}

/// One result panel: the transcription or the translation.
struct TextBlock<'a> {
    heading: &'a str,
    text: &'a str,
    source: SpeechSource,
    file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// WhisperTranslateApp
// ---------------------------------------------------------------------------

/// eframe application: file picker, selectors, results and read-aloud.
pub struct WhisperTranslateApp {
    // ── Inputs ───────────────────────────────────────────────────────────
    /// Path typed into (or dropped onto) the file field.
    file_path: String,
    /// Model size used for the next transcription.
    model: ModelSize,
    /// Target-language label shown in the selector.
    selected_language: String,

    // ── Feedback ─────────────────────────────────────────────────────────
    status: Option<Status>,
    /// A command was sent and no event has come back yet.
    awaiting: bool,

    // ── Playback ─────────────────────────────────────────────────────────
    player: AudioPlayer,
    playback: Option<(SpeechSource, PlaybackHandle)>,

    // ── Channels ─────────────────────────────────────────────────────────
    command_tx: mpsc::Sender<SessionCommand>,
    event_rx: mpsc::Receiver<SessionEvent>,
    shared: SharedSession,

    models: ModelPaths,
}

impl WhisperTranslateApp {
    /// Create the app.
    ///
    /// * `command_tx`: sender end of the session command channel.
    /// * `event_rx`: receiver end of the session event channel.
    /// * `shared`: snapshot published by the orchestrator.
    /// * `models`: where GGML files are looked up, for the selector.
    pub fn new(
        command_tx: mpsc::Sender<SessionCommand>,
        event_rx: mpsc::Receiver<SessionEvent>,
        shared: SharedSession,
        models: ModelPaths,
        config: &AppConfig,
    ) -> Self {
        let selected_language = if is_known(&config.ui.default_target_language) {
            config.ui.default_target_language.clone()
        } else {
            log::warn!(
                "unknown default target language {:?}; using {NO_TRANSLATION}",
                config.ui.default_target_language
            );
            NO_TRANSLATION.to_string()
        };

        Self {
            file_path: String::new(),
            model: config.stt.default_model,
            selected_language,
            status: None,
            awaiting: false,
            player: AudioPlayer::new(),
            playback: None,
            command_tx,
            event_rx,
            shared,
            models,
        }
    }

    // ── Channel handling ─────────────────────────────────────────────────

    fn send(&mut self, command: SessionCommand) {
        match self.command_tx.try_send(command) {
            Ok(()) => self.awaiting = true,
            Err(e) => {
                log::error!("could not reach the session task: {e}");
                self.status = Some(Status::error("The session is busy or has stopped."));
            }
        }
    }

    /// Drain all pending session events (non-blocking).
    fn poll_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.awaiting = false;
            match event {
                SessionEvent::Transcribed => {
                    self.status = Some(Status::info("Transcription complete."));
                }
                SessionEvent::Translated { label } => {
                    self.status = Some(Status::info(format!("Translated to {label}.")));
                }
                SessionEvent::TranslationCleared => {}
                SessionEvent::TranslationFailed { message } => {
                    self.status = Some(Status::error(format!("Translation failed: {message}")));
                }
                SessionEvent::Audio { source, bytes } => self.start_playback(source, bytes),
                SessionEvent::Warning { message } => {
                    self.status = Some(Status::warning(message));
                }
                SessionEvent::Error { message } => {
                    self.status = Some(Status::error(message));
                }
            }
        }
    }

    fn start_playback(&mut self, source: SpeechSource, bytes: Vec<u8>) {
        match self.player.play(bytes) {
            Ok(handle) => self.playback = Some((source, handle)),
            Err(e) => {
                log::warn!("playback failed: {e}");
                self.status = Some(Status::error(format!("Could not play audio: {e}")));
            }
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        self.shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // ── Actions ──────────────────────────────────────────────────────────

    fn request_transcription(&mut self) {
        let path = self.file_path.trim();
        let upload = if path.is_empty() {
            None
        } else {
            let path = PathBuf::from(path);
            if !is_supported_audio(&path) {
                self.status = Some(Status::error(
                    "Please choose an mp3, wav, m4a or mp4 file.",
                ));
                return;
            }
            match AudioUpload::from_path(&path) {
                Ok(upload) => Some(upload),
                Err(e) => {
                    self.status = Some(Status::error(e.to_string()));
                    return;
                }
            }
        };

        self.status = None;
        self.send(SessionCommand::Transcribe {
            upload,
            model: self.model,
            target_language: self.selected_language.clone(),
        });
    }

    fn open_path(&mut self, path: &Path) {
        if let Err(e) = open::that(path) {
            log::warn!("could not open {}: {e}", path.display());
            self.status = Some(Status::error(format!("Could not open {}: {e}", path.display())));
        }
    }

    // ── Panels ───────────────────────────────────────────────────────────

    fn draw_inputs(&mut self, ui: &mut egui::Ui, busy: bool) {
        ui.horizontal(|ui| {
            ui.label("Audio file:");
            ui.add(
                egui::TextEdit::singleline(&mut self.file_path)
                    .hint_text("Drop an mp3, wav, m4a or mp4 file here")
                    .desired_width(f32::INFINITY),
            );
        });

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label("Model:");
            egui::ComboBox::from_id_salt("model_size")
                .selected_text(self.model.as_str())
                .show_ui(ui, |ui| {
                    for size in ModelSize::ALL {
                        let text = if self.models.is_available(size) {
                            size.as_str().to_string()
                        } else {
                            format!("{size} (not downloaded)")
                        };
                        ui.selectable_value(&mut self.model, size, text);
                    }
                });

            ui.add_space(12.0);
            ui.label("Translate to:");
            let before = self.selected_language.clone();
            egui::ComboBox::from_id_salt("target_language")
                .selected_text(self.selected_language.as_str())
                .show_ui(ui, |ui| {
                    for label in labels() {
                        ui.selectable_value(&mut self.selected_language, label.to_string(), label);
                    }
                });
            if self.selected_language != before {
                self.send(SessionCommand::SelectLanguage {
                    label: self.selected_language.clone(),
                });
            }
        });

        ui.add_space(6.0);
        ui.add_enabled_ui(!busy, |ui| {
            if ui.button("Transcribe").clicked() {
                self.request_transcription();
            }
        });
    }

    fn draw_text_block(
        &mut self,
        ui: &mut egui::Ui,
        ctx: &egui::Context,
        block: TextBlock<'_>,
        busy: bool,
    ) {
        ui.heading(block.heading);
        let mut view = block.text;
        ui.add(
            egui::TextEdit::multiline(&mut view)
                .desired_rows(6)
                .desired_width(f32::INFINITY),
        );

        ui.horizontal(|ui| {
            if ui.button("Copy").clicked() {
                ctx.copy_text(block.text.to_string());
                self.status = Some(Status::info(format!("{} copied.", block.heading)));
            }

            let progress = self
                .playback
                .as_ref()
                .filter(|(s, h)| *s == block.source && !h.is_finished())
                .map(|(_, h)| h.progress());
            if let Some(progress) = progress {
                if ui.button("Stop").clicked() {
                    self.playback = None;
                }
                ui.add(egui::ProgressBar::new(progress).desired_width(120.0));
            } else if ui.add_enabled(!busy, egui::Button::new("Read aloud")).clicked() {
                self.send(SessionCommand::Speak(block.source));
            }

            if let Some(path) = &block.file {
                if ui.button("Open saved file").clicked() {
                    self.open_path(path);
                }
            }
        });
    }

    fn draw_results(
        &mut self,
        ui: &mut egui::Ui,
        ctx: &egui::Context,
        snap: &SessionSnapshot,
        busy: bool,
    ) {
        let state = &snap.state;
        if !state.has_result {
            return;
        }

        ui.separator();
        let transcription = TextBlock {
            heading: "Transcription",
            text: &state.transcription,
            source: SpeechSource::Transcription,
            file: state.transcription_file(),
        };
        self.draw_text_block(ui, ctx, transcription, busy);

        if state.is_translated() {
            ui.add_space(8.0);
            let heading = format!("Translation ({})", state.target_language_label);
            let translation = TextBlock {
                heading: &heading,
                text: &state.translation,
                source: SpeechSource::Translation,
                file: state.translation_file(),
            };
            self.draw_text_block(ui, ctx, translation, busy);
        }

        if !state.translation_error.is_empty() {
            ui.add_space(4.0);
            ui.label(
                egui::RichText::new(format!("Translation error: {}", state.translation_error))
                    .color(ERROR_COLOR),
            );
        }

        if let Some(folder) = state.output_folder.clone() {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(folder.display().to_string()).color(DIM_COLOR));
                if ui.button("Open results folder").clicked() {
                    self.open_path(&folder);
                }
            });
        }
    }

    fn draw_status(&self, ui: &mut egui::Ui, snap: &SessionSnapshot, busy: bool) {
        ui.horizontal(|ui| {
            if busy {
                ui.spinner();
                ui.label(snap.phase.label());
            } else if let Some(status) = &self.status {
                ui.label(egui::RichText::new(&status.text).color(status.color()));
            } else {
                ui.label(egui::RichText::new(snap.phase.label()).color(DIM_COLOR));
            }
        });
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for WhisperTranslateApp {
    /// Called every frame by eframe. Polls the event channel, picks up dropped
    /// files, then renders from the latest session snapshot.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events();

        if let Some(path) = ctx.input(|i| i.raw.dropped_files.iter().find_map(|f| f.path.clone())) {
            self.file_path = path.display().to_string();
        }

        if matches!(&self.playback, Some((_, h)) if h.is_finished()) {
            self.playback = None;
        }

        let snap = self.snapshot();
        let busy = self.awaiting || snap.phase.is_busy();

        if busy || self.playback.is_some() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.add_space(2.0);
            self.draw_status(ui, &snap, busy);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Whisper Translate");
                ui.add_space(6.0);
                self.draw_inputs(ui, busy);
                self.draw_results(ui, ctx, &snap, busy);
            });
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("Whisper Translate closing");
    }
}
