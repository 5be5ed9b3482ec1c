//! Save step for finished documents.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use sha2::{Digest, Sha256};

use crate::DocumentError;

/// Suffixes tried before a save gives up on finding a free name.
const MAX_NAME_ATTEMPTS: u32 = 1_000;

/// Summary of one persisted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDocument {
    /// Generated file name.
    pub file_name: String,
    /// Final location, when the sink writes to the filesystem.
    pub path: Option<PathBuf>,
    /// Document size in bytes.
    pub byte_len: usize,
    /// Lowercase hex SHA-256 of the document bytes.
    pub sha256: String,
}

impl SavedDocument {
    fn describe(file_name: &str, path: Option<PathBuf>, bytes: &[u8]) -> Self {
        Self {
            file_name: file_name.to_string(),
            path,
            byte_len: bytes.len(),
            sha256: sha256_hex(bytes),
        }
    }
}

/// Trait implemented by document save targets.
pub trait DocumentSink {
    /// Persists `bytes` under `file_name`, or under a numbered variant when
    /// that name is taken; the returned summary carries the name used.
    ///
    /// # Errors
    /// Returns [`DocumentError`] when the document could not be stored; no
    /// partial document may remain afterwards.
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<SavedDocument, DocumentError>;
}

/// Writes documents into a directory, atomically per file and never over an
/// existing file.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Creates a sink targeting `dir` (created on first save).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DirectorySink {
    /// Claims the first free name among `file_name`, `stem-1.ext`,
    /// `stem-2.ext`, ... by creating an empty placeholder.
    fn reserve(&self, file_name: &str) -> Result<(String, PathBuf), DocumentError> {
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let candidate = numbered_file_name(file_name, attempt);
            let path = self.dir.join(&candidate);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => return Ok((candidate, path)),
                Err(error) if error.kind() == ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(DocumentError::Io { path, source }),
            }
        }

        Err(DocumentError::Io {
            path: self.dir.join(file_name),
            source: std::io::Error::new(ErrorKind::AlreadyExists, "no free output file name"),
        })
    }
}

impl DocumentSink for DirectorySink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<SavedDocument, DocumentError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| DocumentError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let (file_name, final_path) = self.reserve(file_name)?;
        let staging_path = self.dir.join(format!(".{file_name}.partial"));

        let written = std::fs::write(&staging_path, bytes)
            .and_then(|()| std::fs::rename(&staging_path, &final_path));
        if let Err(source) = written {
            let _ = std::fs::remove_file(&staging_path);
            let _ = std::fs::remove_file(&final_path);
            return Err(DocumentError::Io {
                path: final_path,
                source,
            });
        }

        tracing::debug!(path = %final_path.display(), bytes = bytes.len(), "document written");
        Ok(SavedDocument::describe(&file_name, Some(final_path), bytes))
    }
}

/// Inserts `-{attempt}` before the extension; attempt 0 keeps the name.
fn numbered_file_name(file_name: &str, attempt: u32) -> String {
    if attempt == 0 {
        return file_name.to_string();
    }
    match file_name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => format!("{stem}-{attempt}.{extension}"),
        _ => format!("{file_name}-{attempt}"),
    }
}

/// Keeps saved documents in memory; used by tests and embedders.
#[derive(Debug, Default)]
pub struct MemorySink {
    saved: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `(file_name, bytes)` for every saved document, oldest first.
    pub fn documents(&self) -> Vec<(String, Vec<u8>)> {
        self.saved
            .lock()
            .map(|saved| saved.clone())
            .unwrap_or_default()
    }
}

impl DocumentSink for MemorySink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<SavedDocument, DocumentError> {
        let mut saved = self
            .saved
            .lock()
            .map_err(|_| DocumentError::Sink("memory sink lock poisoned".to_string()))?;
        saved.push((file_name.to_string(), bytes.to_vec()));
        Ok(SavedDocument::describe(file_name, None, bytes))
    }
}

/// Lowercase hex SHA-256 digest of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
