//! Input resolution: validate a user-supplied path and read it as UTF-8 HTML.
//!
//! Every failure here is per-file and non-fatal: the caller logs the
//! [`FileError`] and moves on to the next input.

use crate::error::FileError;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Read an HTML export into memory.
///
/// The file is opened read-only and closed before this returns.
pub async fn read_html(path: &Path) -> Result<String, FileError> {
    let html = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => FileError::NotFound {
                path: path.to_path_buf(),
            },
            ErrorKind::PermissionDenied => FileError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => FileError::ReadFailed {
                path: path.to_path_buf(),
                detail: e.to_string(),
            },
        })?;

    debug!("Read {} bytes from {}", html.len(), path.display());
    Ok(html)
}
