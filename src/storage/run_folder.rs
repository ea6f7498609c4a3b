//! Per-run result folder.
//!
//! ```text
//! Results/<stem>_<YYYYMMDD_HHMMSS>/
//!   transcription.txt
//!   Translations/<Label>_translation.txt
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use super::StorageError;

pub const TRANSCRIPTION_FILE: &str = "transcription.txt";
pub const TRANSLATIONS_DIR: &str = "Translations";

/// Upper bound on `_<n>` suffixes tried when a folder name is taken.
const MAX_SUFFIX: u32 = 1_000;

/// A created result folder for one transcription run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFolder {
    path: PathBuf,
}

impl RunFolder {
    /// Create a fresh folder under `results_dir` named after the stem of
    /// `file_name` and `now`.
    ///
    /// If two runs of the same file land in the same second, `_1`, `_2`, ...
    /// is appended so an earlier run is never overwritten.
    pub fn create(
        results_dir: &Path,
        file_name: &str,
        now: DateTime<Local>,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(results_dir).map_err(|e| StorageError::CreateDirectory {
            path: results_dir.to_path_buf(),
            source: e,
        })?;

        let stem = Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("audio");
        let base = format!("{stem}_{}", now.format("%Y%m%d_%H%M%S"));

        let mut last_err = None;
        for n in 0..=MAX_SUFFIX {
            let name = if n == 0 {
                base.clone()
            } else {
                format!("{base}_{n}")
            };
            let candidate = results_dir.join(name);
            match fs::create_dir(&candidate) {
                Ok(()) => {
                    log::info!("created result folder {}", candidate.display());
                    return Ok(Self { path: candidate });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => last_err = Some(e),
                Err(e) => {
                    return Err(StorageError::CreateDirectory {
                        path: candidate,
                        source: e,
                    })
                }
            }
        }

        Err(StorageError::CreateDirectory {
            path: results_dir.join(base),
            source: last_err.unwrap_or_else(|| ErrorKind::AlreadyExists.into()),
        })
    }

    /// Create a run folder and write `transcription.txt` into it.
    ///
    /// If the file cannot be written the new folder is removed again, so a
    /// failed run leaves nothing behind under `results_dir`.
    pub fn create_with_transcription(
        results_dir: &Path,
        file_name: &str,
        now: DateTime<Local>,
        text: &str,
    ) -> Result<Self, StorageError> {
        Self::create_with(results_dir, file_name, now, |path| write_file(path, text))
    }

    fn create_with(
        results_dir: &Path,
        file_name: &str,
        now: DateTime<Local>,
        write: impl FnOnce(&Path) -> Result<(), StorageError>,
    ) -> Result<Self, StorageError> {
        let run = Self::create(results_dir, file_name, now)?;
        if let Err(e) = write(&run.transcription_path()) {
            if let Err(cleanup) = fs::remove_dir_all(&run.path) {
                log::warn!("could not remove {}: {cleanup}", run.path.display());
            }
            return Err(e);
        }
        Ok(run)
    }

    /// Wrap an existing folder, e.g. the one recorded in the session state.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn transcription_path(&self) -> PathBuf {
        self.path.join(TRANSCRIPTION_FILE)
    }

    pub fn translation_path(&self, label: &str) -> PathBuf {
        self.path
            .join(TRANSLATIONS_DIR)
            .join(format!("{label}_translation.txt"))
    }

    /// Write `Translations/<label>_translation.txt`, replacing any previous
    /// content for the same label.
    pub fn write_translation(&self, label: &str, text: &str) -> Result<PathBuf, StorageError> {
        let dir = self.path.join(TRANSLATIONS_DIR);
        fs::create_dir_all(&dir).map_err(|e| StorageError::CreateDirectory {
            path: dir.clone(),
            source: e,
        })?;

        let path = self.translation_path(label);
        write_file(&path, text)?;
        Ok(path)
    }
}

fn write_file(path: &Path, text: &str) -> Result<(), StorageError> {
    fs::write(path, text).map_err(|e| StorageError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    log::debug!("wrote {}", path.display());
    Ok(())
}
