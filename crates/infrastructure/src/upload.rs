//! Builds upload parts from files on disk.

use std::path::Path;

use thiserror::Error;
use tokio::fs;

use resumatch_domain::FilePart;

/// Errors raised while reading an upload from disk.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// File that failed
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// The path has no file name component.
    #[error("Not a file path: {0}")]
    NoFileName(String),
}

/// Reads `path` into a [`FilePart`] with a MIME type guessed from its
/// extension.
///
/// # Errors
///
/// Returns an [`UploadError`] if the path has no file name or cannot be
/// read.
pub async fn file_part_from_path(path: impl AsRef<Path>) -> Result<FilePart, UploadError> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| UploadError::NoFileName(path.display().to_string()))?
        .to_string();

    let bytes = fs::read(path).await.map_err(|source| UploadError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let mime_type = mime_guess::from_path(path).first_or_octet_stream();

    Ok(FilePart::new(file_name, bytes).with_content_type(mime_type.essence_str()))
}
