//! Error types for the html2ipynb library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Html2NbError`] is **fatal**: no notebook can be produced or persisted
//!   (every input unusable, destination unwritable). Returned as
//!   `Err(Html2NbError)` from the top-level `convert*` functions.
//!
//! * [`FileError`] is **non-fatal**: a single input file could not be used
//!   (missing, unreadable, not UTF-8) but the remaining inputs are fine.
//!   Stored inside [`crate::output::FileResult`] and the file is skipped.
//!
//! Cells that lack an expected sub-element or extract to empty text are not
//! errors at all: they are dropped during extraction and logged at `debug`.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the html2ipynb library.
///
/// Per-file failures use [`FileError`] and are stored in
/// [`crate::output::FileResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Html2NbError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// No input paths were supplied at all.
    #[error("No input HTML files given")]
    NoInputs,

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output notebook file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The assembled notebook could not be serialised to JSON.
    #[error("Failed to serialise notebook: {0}")]
    Serialization(#[from] serde_json::Error),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single input file.
///
/// The file contributes no cells; conversion continues with the next input.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum FileError {
    /// Input file was not found at the given path.
    #[error("HTML file not found: '{}'", path.display())]
    NotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{}'", path.display())]
    PermissionDenied { path: PathBuf },

    /// The file exists but could not be read as UTF-8 text.
    #[error("Failed to read '{}': {detail}", path.display())]
    ReadFailed { path: PathBuf, detail: String },

    /// The extraction worker for this file did not complete.
    #[error("Cell extraction failed for '{}': {detail}", path.display())]
    ExtractionFailed { path: PathBuf, detail: String },
}

impl FileError {
    /// The input path this error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            FileError::NotFound { path }
            | FileError::PermissionDenied { path }
            | FileError::ReadFailed { path, .. }
            | FileError::ExtractionFailed { path, .. } => path,
        }
    }
}
