//! Document assembly: wrap the ordered cell list in the notebook envelope.

use crate::notebook::{CellRecord, DocumentRecord, NotebookMetadata, NBFORMAT, NBFORMAT_MINOR};

/// Builds a [`DocumentRecord`] from cells and injected fixed metadata.
///
/// The cell list is taken as-is: no validation, deduplication or reordering.
#[derive(Debug, Clone, Default)]
pub struct DocumentAssembler {
    metadata: NotebookMetadata,
}

impl DocumentAssembler {
    pub fn new(metadata: NotebookMetadata) -> Self {
        Self { metadata }
    }

    pub fn assemble(&self, cells: Vec<CellRecord>) -> DocumentRecord {
        DocumentRecord {
            cells,
            metadata: self.metadata.clone(),
            nbformat: NBFORMAT,
            nbformat_minor: NBFORMAT_MINOR,
        }
    }
}
