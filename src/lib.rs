//! # html2ipynb
//!
//! Recover Jupyter notebooks (`.ipynb`) from their JupyterLab HTML exports.
//!
//! ## Why this crate?
//!
//! An exported notebook is often the only copy that survives: shared by
//! email, attached to a ticket, or archived from a course site. The HTML
//! still carries everything needed to rebuild the notebook. Code cells keep
//! their source verbatim inside the syntax-highlighted `<pre>`, execution
//! counts sit in the `In [n]:` prompts, and markdown cells are rendered HTML
//! that maps back cleanly to markdown source.
//!
//! ## Pipeline Overview
//!
//! ```text
//! HTML export(s)
//!  │
//!  ├─ 1. Input     read each file as UTF-8 (missing files are skipped)
//!  ├─ 2. Extract   find `.jp-Cell.jp-Notebook-cell` containers, classify
//!  ├─ 3. Markdown  rendered HTML → markdown source via a tag table
//!  ├─ 4. Code      highlighted `<pre>` text, anchor glyphs removed
//!  ├─ 5. Lines     nbformat per-line source strings
//!  └─ 6. Assemble  nbformat 4 document with fixed Python 3 metadata
//! ```
//!
//! Outputs are not recovered: every code cell comes back with `outputs: []`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use html2ipynb::{convert_to_file, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert_to_file(&["part1.html", "part2.html"], "recovered.ipynb", &config).await?;
//!     eprintln!(
//!         "{} cells ({} markdown, {} code) from {}/{} files",
//!         output.stats.total_cells,
//!         output.stats.markdown_cells,
//!         output.stats.code_cells,
//!         output.stats.processed_files,
//!         output.stats.total_files,
//!     );
//!     Ok(())
//! }
//! ```
//!
//! For HTML already in memory, [`convert_str`] skips the runtime entirely:
//!
//! ```rust
//! use html2ipynb::{convert_str, ConversionConfig};
//!
//! let html = r#"<div class="jp-Cell jp-CodeCell jp-Notebook-cell">
//!   <div class="jp-InputPrompt">In [3]:</div>
//!   <div class="jp-CodeMirrorEditor">
//!     <div class="highlight"><pre>x = 1</pre></div>
//!   </div>
//! </div>"#;
//! let notebook = convert_str(html, &ConversionConfig::default());
//! assert_eq!(notebook.cells[0].execution_count, Some(3));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `html2ipynb` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! html2ipynb = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod notebook;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_str, convert_sync, convert_to_file, write_notebook};
pub use error::{FileError, Html2NbError};
pub use notebook::{CellKind, CellRecord, DocumentRecord, NotebookMetadata};
pub use output::{ConversionOutput, ConversionStats, FileResult};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
