//! Attachment Store
//!
//! Files picked by the user are copied into one directory under the app data
//! dir and referenced from records by path. Records may carry plain paths or
//! percent-encoded `file://` URIs; both resolve to the same file.
//!
//! Deletion never reaches outside the attachments directory.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use log::{debug, info, warn};
use percent_encoding::percent_decode_str;
use thiserror::Error;

use crate::domain::{new_id, DomainError, FileAttachment};

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Source file not found: {0}")]
    SourceMissing(PathBuf),
    #[error("Path outside attachment directory: {0}")]
    OutsideRoot(String),
}

pub type AttachmentResult<T> = Result<T, AttachmentError>;

impl From<AttachmentError> for DomainError {
    fn from(err: AttachmentError) -> Self {
        match err {
            AttachmentError::SourceMissing(_) => DomainError::InvalidInput(err.to_string()),
            other => DomainError::Storage(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AttachmentStore {
    root: PathBuf,
}

impl AttachmentStore {
    /// Open the directory, creating it if needed
    pub fn new(root: impl Into<PathBuf>) -> AttachmentResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Copy `source` in as `<uuid>.<ext>`
    ///
    /// `mime` wins over a type guessed from `original_name`.
    pub fn persist(
        &self,
        source: &Path,
        original_name: &str,
        mime: Option<&str>,
    ) -> AttachmentResult<FileAttachment> {
        if !source.is_file() {
            return Err(AttachmentError::SourceMissing(source.to_path_buf()));
        }

        let id = new_id();
        let extension = Path::new(original_name)
            .extension()
            .or_else(|| source.extension())
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let file_name = match &extension {
            Some(ext) => format!("{}.{}", id, ext),
            None => id.clone(),
        };

        let dest = self.root.join(&file_name);
        let size = fs::copy(source, &dest)?;

        let mime_type = match mime {
            Some(mime) if !mime.is_empty() => mime.to_string(),
            _ => mime_guess::from_path(original_name)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        };

        debug!("Persisted attachment {} ({} bytes) as {}", original_name, size, file_name);

        Ok(FileAttachment {
            id,
            name: original_name.to_string(),
            mime_type,
            uri: dest.to_string_lossy().to_string(),
            size,
        })
    }

    /// Map a stored path or `file://` URI to a file inside the directory
    pub fn resolve(&self, uri: &str) -> Option<PathBuf> {
        let raw = match uri.strip_prefix("file://") {
            Some(rest) => {
                let decoded = percent_decode_str(rest).decode_utf8_lossy().to_string();
                // file:///C:/... on Windows
                if decoded.starts_with('/') && decoded.chars().nth(2) == Some(':') {
                    decoded[1..].to_string()
                } else {
                    decoded
                }
            }
            None => uri.to_string(),
        };

        let path = PathBuf::from(raw);
        let escapes = path
            .components()
            .any(|c| matches!(c, Component::ParentDir));
        if escapes || !path.starts_with(&self.root) || path == self.root {
            return None;
        }
        Some(path)
    }

    /// Remove one file; false if it was already gone
    pub fn delete_file(&self, uri: &str) -> AttachmentResult<bool> {
        let path = self
            .resolve(uri)
            .ok_or_else(|| AttachmentError::OutsideRoot(uri.to_string()))?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Deleted attachment file {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub fn delete(&self, attachment: &FileAttachment) -> AttachmentResult<bool> {
        self.delete_file(&attachment.uri)
    }

    /// Cascade for a removed owner
    ///
    /// Files still referenced by another record are kept. Failures are logged
    /// and skipped; returns the number of files removed.
    pub fn delete_owned<'a>(
        &self,
        uris: impl IntoIterator<Item = &'a str>,
        still_referenced: &HashSet<String>,
    ) -> usize {
        let mut removed = 0;
        for uri in uris {
            if still_referenced.contains(uri) {
                continue;
            }
            match self.delete_file(uri) {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => warn!("Skipping attachment {}: {}", uri, e),
            }
        }
        removed
    }

    /// Remove files in the directory that no record references
    pub fn cleanup_orphans(&self, referenced: &HashSet<String>) -> AttachmentResult<usize> {
        let keep: HashSet<PathBuf> = referenced
            .iter()
            .filter_map(|uri| self.resolve(uri))
            .collect();

        let mut removed = 0;
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() || keep.contains(&path) {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => warn!("Failed to remove orphan {}: {}", path.display(), e),
            }
        }

        if removed > 0 {
            info!("Removed {} orphaned attachment files", removed);
        }
        Ok(removed)
    }

    /// Bytes used by all files in the directory
    pub fn total_size(&self) -> AttachmentResult<u64> {
        let mut total = 0;
        for entry in fs::read_dir(&self.root)? {
            let metadata = entry?.metadata()?;
            if metadata.is_file() {
                total += metadata.len();
            }
        }
        Ok(total)
    }
}
