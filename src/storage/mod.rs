//! On-disk storage for transcription runs.
//!
//! * [`RunFolder`]: the per-run `Results/<stem>_<timestamp>/` directory.
//! * [`AudioUpload`] / [`TempUpload`]: the uploaded file and its transient
//!   copy on disk, removed when the guard drops.

pub mod run_folder;
pub mod upload;

use std::path::PathBuf;

pub use run_folder::{RunFolder, TRANSCRIPTION_FILE, TRANSLATIONS_DIR};
pub use upload::{is_supported_audio, AudioUpload, TempUpload, SUPPORTED_EXTENSIONS};

/// Storage errors with contextual information.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to file {}: {source}", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid file name {0:?}")]
    InvalidFileName(String),
}
