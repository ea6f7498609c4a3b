//! Uploaded audio and its transient on-disk copy.
//!
//! The transcription engine needs a filesystem path, so the uploaded bytes
//! are written to `<temp_dir>/<file name>` for the duration of one
//! transcription. [`TempUpload`] removes the file when dropped.

use std::fs;
use std::path::{Path, PathBuf};

use super::StorageError;

/// Extensions accepted by the file picker, lowercase.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "mp4"];

/// Returns `true` if `path` has one of [`SUPPORTED_EXTENSIONS`]
/// (case-insensitive).
pub fn is_supported_audio(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// AudioUpload
// ---------------------------------------------------------------------------

/// An uploaded audio file: original file name plus raw bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct AudioUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for AudioUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioUpload")
            .field("file_name", &self.file_name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl AudioUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read a file chosen by the user.
    pub fn from_path(path: &Path) -> Result<Self, StorageError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StorageError::InvalidFileName(path.display().to_string()))?
            .to_string();

        let bytes = fs::read(path).map_err(|e| StorageError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(Self { file_name, bytes })
    }

    pub fn has_supported_extension(&self) -> bool {
        is_supported_audio(Path::new(&self.file_name))
    }
}

// ---------------------------------------------------------------------------
// TempUpload
// ---------------------------------------------------------------------------

/// Guard owning the transient copy of an upload.
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    /// Write `upload` to `<temp_dir>/<file name>`, overwriting any leftover
    /// file of the same name.
    ///
    /// Only the final path component of the upload's name is used.
    pub fn persist(temp_dir: &Path, upload: &AudioUpload) -> Result<Self, StorageError> {
        let name = Path::new(&upload.file_name)
            .file_name()
            .ok_or_else(|| StorageError::InvalidFileName(upload.file_name.clone()))?;

        fs::create_dir_all(temp_dir).map_err(|e| StorageError::CreateDirectory {
            path: temp_dir.to_path_buf(),
            source: e,
        })?;

        Self::write_with(temp_dir.join(name), &upload.bytes, |path, bytes| {
            fs::write(path, bytes)
        })
    }

    /// Take ownership of `path` before `write` runs, so a partially written
    /// file is removed when the write fails.
    fn write_with(
        path: PathBuf,
        bytes: &[u8],
        write: impl FnOnce(&Path, &[u8]) -> std::io::Result<()>,
    ) -> Result<Self, StorageError> {
        let guard = Self { path };
        write(&guard.path, bytes).map_err(|e| StorageError::WriteFile {
            path: guard.path.clone(),
            source: e,
        })?;

        log::debug!("persisted upload to {}", guard.path.display());
        Ok(guard)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("could not remove {}: {e}", self.path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_extensions_are_case_insensitive() {
        assert!(is_supported_audio(Path::new("a.mp3")));
        assert!(is_supported_audio(Path::new("a.WAV")));
        assert!(is_supported_audio(Path::new("dir/a.M4a")));
        assert!(is_supported_audio(Path::new("a.mp4")));
        assert!(!is_supported_audio(Path::new("a.flac")));
        assert!(!is_supported_audio(Path::new("mp3")));
    }

    #[test]
    fn from_path_reads_name_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        fs::write(&path, b"RIFF").unwrap();

        let upload = AudioUpload::from_path(&path).unwrap();
        assert_eq!(upload.file_name, "clip.wav");
        assert_eq!(upload.bytes, b"RIFF");
        assert!(upload.has_supported_extension());
    }

    #[test]
    fn from_missing_path_is_read_error() {
        let err = AudioUpload::from_path(Path::new("/nonexistent/clip.wav")).unwrap_err();
        assert!(matches!(err, StorageError::ReadFile { .. }));
    }

    #[test]
    fn temp_upload_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let upload = AudioUpload::new("talk.mp3", vec![1, 2, 3]);

        let temp = TempUpload::persist(dir.path(), &upload).unwrap();
        let path = temp.path().to_path_buf();
        assert_eq!(path, dir.path().join("talk.mp3"));
        assert_eq!(fs::read(&path).unwrap(), vec![1, 2, 3]);

        drop(temp);
        assert!(!path.exists());
    }

    #[test]
    fn failed_write_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.wav");

        let err = TempUpload::write_with(path.clone(), &[7; 64], |p, bytes| {
            fs::write(p, &bytes[..16])?;
            Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "No space left on device",
            ))
        })
        .unwrap_err();

        assert!(matches!(
            err,
            StorageError::WriteFile { path: ref failed, .. } if failed.ends_with("big.wav")
        ));
        assert!(!path.exists());
    }

    #[test]
    fn persist_strips_directory_components() {
        let dir = tempfile::tempdir().unwrap();
        let upload = AudioUpload::new("../../escape.wav", vec![0]);
        let temp = TempUpload::persist(dir.path(), &upload).unwrap();
        assert_eq!(temp.path(), dir.path().join("escape.wav"));
    }

    #[test]
    fn persist_rejects_empty_name() {
        let dir = tempfile::tempdir().unwrap();
        let upload = AudioUpload::new("..", vec![0]);
        let err = TempUpload::persist(dir.path(), &upload).unwrap_err();
        assert!(matches!(err, StorageError::InvalidFileName(_)));
    }

    #[test]
    fn drop_tolerates_already_removed_file() {
        let dir = tempfile::tempdir().unwrap();
        let temp = TempUpload::persist(dir.path(), &AudioUpload::new("a.wav", vec![0])).unwrap();
        fs::remove_file(temp.path()).unwrap();
        drop(temp);
    }
}
