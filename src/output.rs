//! Conversion results: the assembled notebook plus per-file outcomes and stats.

use crate::error::FileError;
use crate::notebook::{CellKind, CellRecord, DocumentRecord};
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of reading and extracting one input file.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    /// 1-indexed position in the input list.
    pub file_num: usize,
    pub path: PathBuf,
    pub markdown_cells: usize,
    pub code_cells: usize,
    /// Set when the file was skipped; it then contributed no cells.
    pub error: Option<FileError>,
}

impl FileResult {
    pub(crate) fn success(file_num: usize, path: PathBuf, cells: &[CellRecord]) -> Self {
        let code_cells = cells.iter().filter(|c| c.kind == CellKind::Code).count();
        Self {
            file_num,
            path,
            markdown_cells: cells.len() - code_cells,
            code_cells,
            error: None,
        }
    }

    pub(crate) fn failed(file_num: usize, path: PathBuf, error: FileError) -> Self {
        Self {
            file_num,
            path,
            markdown_cells: 0,
            code_cells: 0,
            error: Some(error),
        }
    }

    pub fn cell_count(&self) -> usize {
        self.markdown_cells + self.code_cells
    }
}

/// Aggregate counters for a conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub total_files: usize,
    pub processed_files: usize,
    pub failed_files: usize,
    pub total_cells: usize,
    pub markdown_cells: usize,
    pub code_cells: usize,
    pub total_duration_ms: u64,
}

/// Everything a conversion produced.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutput {
    /// The notebook, ready for [`DocumentRecord::to_json`].
    pub notebook: DocumentRecord,
    /// One entry per input, in input order.
    pub files: Vec<FileResult>,
    pub stats: ConversionStats,
}
