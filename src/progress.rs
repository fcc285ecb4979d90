//! Progress-callback trait for per-file conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline reads and extracts each input file.
//!
//! # Example
//!
//! ```rust
//! use html2ipynb::{ConversionProgressCallback, ConversionConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CellCounter {
//!     cells: Arc<AtomicUsize>,
//! }
//!
//! impl ConversionProgressCallback for CellCounter {
//!     fn on_file_complete(&self, file_num: usize, total_files: usize, cell_count: usize) {
//!         self.cells.fetch_add(cell_count, Ordering::SeqCst);
//!         eprintln!("File {}/{}: {} cells", file_num, total_files, cell_count);
//!     }
//! }
//!
//! let counter = Arc::new(CellCounter {
//!     cells: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the conversion pipeline as it processes each input file.
///
/// Implementations must be `Send + Sync`: with `concurrency > 1` several
/// files are in flight at once and events may interleave. All methods have
/// default no-op implementations so callers only override what they need.
///
/// File numbers are 1-indexed positions in the input list.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before any file is read.
    fn on_conversion_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called just before a file is read.
    fn on_file_start(&self, file_num: usize, total_files: usize, path: &Path) {
        let _ = (file_num, total_files, path);
    }

    /// Called when a file has been read and its cells extracted.
    fn on_file_complete(&self, file_num: usize, total_files: usize, cell_count: usize) {
        let _ = (file_num, total_files, cell_count);
    }

    /// Called when a file is skipped because it could not be used.
    fn on_file_error(&self, file_num: usize, total_files: usize, error: &str) {
        let _ = (file_num, total_files, error);
    }

    /// Called once after every file has been attempted.
    fn on_conversion_complete(&self, total_files: usize, success_count: usize) {
        let _ = (total_files, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
