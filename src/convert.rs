//! Conversion entry points.
//!
//! Each input file is read and extracted independently. Up to
//! `config.concurrency` files are in flight at once, but results go through
//! an *ordered* buffer, so the notebook's cells are always the concatenation
//! of each file's cells in input order, each file in document order.
//!
//! The complete notebook is assembled in memory before anything is written,
//! and file output goes through a temp file in the destination directory, so
//! a failed write never leaves a partial notebook behind.

use crate::config::ConversionConfig;
use crate::error::{FileError, Html2NbError};
use crate::notebook::{CellKind, CellRecord, DocumentRecord};
use crate::output::{ConversionOutput, ConversionStats, FileResult};
use crate::pipeline::assemble::DocumentAssembler;
use crate::pipeline::{extract, input};
use futures::stream::{self, StreamExt};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert one or more HTML exports into a single notebook.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(ConversionOutput)` even if some or all inputs were skipped (check
/// `output.stats.failed_files`). Skipped inputs and inputs without cells
/// simply contribute nothing, so the notebook may be empty.
///
/// # Errors
/// - [`Html2NbError::NoInputs`] when `inputs` is empty
pub async fn convert<P: AsRef<Path>>(
    inputs: &[P],
    config: &ConversionConfig,
) -> Result<ConversionOutput, Html2NbError> {
    let total_start = Instant::now();
    if inputs.is_empty() {
        return Err(Html2NbError::NoInputs);
    }

    let total_files = inputs.len();
    info!("Starting conversion of {} HTML files", total_files);
    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(total_files);
    }

    // ── Read + extract, bounded concurrency, input order preserved ───────
    let results: Vec<(FileResult, Vec<CellRecord>)> =
        stream::iter(
            inputs
                .iter()
                .enumerate()
                .map(|(idx, path)| {
                    let path = path.as_ref().to_path_buf();
                    process_file(idx + 1, total_files, path, config)
                })
                .collect::<Vec<_>>(),
        )
        .buffered(config.concurrency.max(1))
        .collect()
        .await;

    let (files, per_file_cells): (Vec<FileResult>, Vec<Vec<CellRecord>>) =
        results.into_iter().unzip();

    let processed = files.iter().filter(|f| f.error.is_none()).count();
    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(total_files, processed);
    }

    if processed == 0 {
        warn!("None of the {} input files could be read", total_files);
    }

    // ── Assemble ─────────────────────────────────────────────────────────
    let cells: Vec<CellRecord> = per_file_cells.into_iter().flatten().collect();
    let notebook = DocumentAssembler::new(config.metadata.clone()).assemble(cells);

    let stats = ConversionStats {
        total_files,
        processed_files: processed,
        failed_files: total_files - processed,
        total_cells: notebook.cells.len(),
        markdown_cells: notebook.cell_count(CellKind::Markdown),
        code_cells: notebook.cell_count(CellKind::Code),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Total: {} cells from {}/{} files in {}ms",
        stats.total_cells, processed, total_files, stats.total_duration_ms
    );

    Ok(ConversionOutput {
        notebook,
        files,
        stats,
    })
}

/// Convert and write the notebook to `output_path`.
///
/// Parent directories are created as needed. The notebook is written to a
/// temp file next to the destination and then renamed over it.
pub async fn convert_to_file<P: AsRef<Path>>(
    inputs: &[P],
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Html2NbError> {
    let output = convert(inputs, config).await?;
    let json = output.notebook.to_json()?;
    let path = output_path.as_ref().to_path_buf();

    tokio::task::spawn_blocking(move || write_atomic(&path, &json))
        .await
        .map_err(|e| Html2NbError::Internal(format!("Write task panicked: {}", e)))??;

    Ok(output)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync<P: AsRef<Path>>(
    inputs: &[P],
    config: &ConversionConfig,
) -> Result<ConversionOutput, Html2NbError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Html2NbError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(inputs, config))
}

/// Convert an in-memory HTML export into a notebook.
///
/// No I/O and no runtime; useful when the HTML comes from a database or a
/// network response rather than a file.
pub fn convert_str(html: &str, config: &ConversionConfig) -> DocumentRecord {
    let cells = extract::extract_cells_from_str(html);
    DocumentAssembler::new(config.metadata.clone()).assemble(cells)
}

/// Serialise `notebook` and write it atomically to `path`.
pub fn write_notebook(notebook: &DocumentRecord, path: &Path) -> Result<(), Html2NbError> {
    let json = notebook.to_json()?;
    write_atomic(path, &json)
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Read and extract a single file. Failures are logged and recorded, never propagated.
async fn process_file(
    file_num: usize,
    total_files: usize,
    path: PathBuf,
    config: &ConversionConfig,
) -> (FileResult, Vec<CellRecord>) {
    if let Some(ref cb) = config.progress_callback {
        cb.on_file_start(file_num, total_files, &path);
    }

    let result = match input::read_html(&path).await {
        Ok(html) => extract_blocking(&path, html).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(cells) => {
            let file = FileResult::success(file_num, path, &cells);
            debug!(
                "Extracted {} cells from {} ({} markdown, {} code)",
                file.cell_count(),
                file.path.display(),
                file.markdown_cells,
                file.code_cells
            );
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_complete(file_num, total_files, cells.len());
            }
            (file, cells)
        }
        Err(e) => {
            warn!(path = %e.path().display(), "{}; skipping", e);
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_error(file_num, total_files, &e.to_string());
            }
            (FileResult::failed(file_num, path, e), Vec::new())
        }
    }
}

/// Parse and extract on the blocking pool; the parsed DOM never leaves it.
async fn extract_blocking(path: &Path, html: String) -> Result<Vec<CellRecord>, FileError> {
    tokio::task::spawn_blocking(move || extract::extract_cells_from_str(&html))
        .await
        .map_err(|e| FileError::ExtractionFailed {
            path: path.to_path_buf(),
            detail: format!("extraction task panicked: {}", e),
        })
}

fn write_atomic(path: &Path, contents: &str) -> Result<(), Html2NbError> {
    let write_failed = |source: std::io::Error| Html2NbError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_failed)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_failed)?;
    tmp.write_all(contents.as_bytes()).map_err(write_failed)?;
    tmp.flush().map_err(write_failed)?;
    tmp.persist(path).map_err(|e| write_failed(e.error))?;

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<html><body>
<div class="jp-Cell jp-MarkdownCell jp-Notebook-cell">
  <div class="jp-RenderedMarkdown"><h1>Demo¶</h1><p>Text</p></div>
</div>
<div class="jp-Cell jp-CodeCell jp-Notebook-cell">
  <div class="jp-InputPrompt">In [1]:</div>
  <div class="jp-CodeMirrorEditor"><div class="highlight"><pre>print(1)</pre></div></div>
</div>
</body></html>"#;

    #[test]
    fn convert_str_assembles_cells() {
        let doc = convert_str(SAMPLE, &ConversionConfig::default());
        assert_eq!(doc.cells.len(), 2);
        assert_eq!(doc.cells[0].kind, CellKind::Markdown);
        assert_eq!(doc.cells[0].source, vec!["# Demo\n", "Text"]);
        assert_eq!(doc.cells[1].source, vec!["print(1)\n"]);
        assert_eq!(doc.cells[1].execution_count, Some(1));
    }

    #[test]
    fn convert_str_is_idempotent() {
        let config = ConversionConfig::default();
        let a = convert_str(SAMPLE, &config).to_json().unwrap();
        let b = convert_str(SAMPLE, &config).to_json().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn write_notebook_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.ipynb");
        let doc = convert_str(SAMPLE, &ConversionConfig::default());
        write_notebook(&doc, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, doc.to_json().unwrap());
    }

    #[test]
    fn write_over_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        // A directory at the destination path cannot be replaced by a file.
        let target = dir.path().join("occupied");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("child"), "x").unwrap();
        let doc = convert_str(SAMPLE, &ConversionConfig::default());
        let err = write_notebook(&doc, &target).unwrap_err();
        assert!(matches!(err, Html2NbError::OutputWriteFailed { .. }));
        // No stray temp files left behind.
        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[tokio::test]
    async fn empty_input_list_is_an_error() {
        let inputs: [&str; 0] = [];
        let err = convert(&inputs, &ConversionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Html2NbError::NoInputs));
    }
}
