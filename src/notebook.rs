//! Notebook data model: extracted cells and the nbformat v4 document envelope.
//!
//! The types here serialise to exactly the JSON layout `nbformat.write`
//! produces for a v4 notebook: one-space indentation, keys in sorted order,
//! non-ASCII characters kept verbatim and a trailing newline. Struct fields
//! are declared in alphabetical order so serde emits them sorted.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// nbformat major version written into every document.
pub const NBFORMAT: u32 = 4;

/// nbformat minor version. 4.5 would require a random `id` per cell, which
/// would make repeated conversions of the same input differ.
pub const NBFORMAT_MINOR: u32 = 4;

/// Kind of an extracted cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    /// Narrative text reconstructed from rendered markdown.
    Markdown,
    /// Executable source taken from the code editor block.
    Code,
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Markdown => "markdown",
            Self::Code => "code",
        };
        write!(f, "{s}")
    }
}

/// One recovered notebook cell.
///
/// Only ever built for cells whose extracted text is non-empty; see
/// [`crate::pipeline::extract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRecord {
    pub kind: CellKind,
    /// nbformat line array: every entry except possibly the last ends in `\n`.
    pub source: Vec<String>,
    /// Value of the `In [n]:` prompt. Always `None` for markdown cells.
    pub execution_count: Option<u32>,
    /// Reserved; always empty.
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl CellRecord {
    pub fn markdown(source: Vec<String>) -> Self {
        Self {
            kind: CellKind::Markdown,
            source,
            execution_count: None,
            metadata: serde_json::Map::new(),
        }
    }

    pub fn code(source: Vec<String>, execution_count: Option<u32>) -> Self {
        Self {
            kind: CellKind::Code,
            source,
            execution_count,
            metadata: serde_json::Map::new(),
        }
    }
}

impl Serialize for CellRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.kind {
            CellKind::Markdown => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("cell_type", &self.kind)?;
                map.serialize_entry("metadata", &self.metadata)?;
                map.serialize_entry("source", &self.source)?;
                map.end()
            }
            CellKind::Code => {
                // Outputs are never reconstructed; re-execution regenerates them.
                let outputs: [serde_json::Value; 0] = [];
                let mut map = serializer.serialize_map(Some(5))?;
                map.serialize_entry("cell_type", &self.kind)?;
                map.serialize_entry("execution_count", &self.execution_count)?;
                map.serialize_entry("metadata", &self.metadata)?;
                map.serialize_entry("outputs", &outputs)?;
                map.serialize_entry("source", &self.source)?;
                map.end()
            }
        }
    }
}

/// `metadata.kernelspec` of the notebook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelSpec {
    pub display_name: String,
    pub language: String,
    pub name: String,
}

/// `metadata.language_info.codemirror_mode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodemirrorMode {
    pub name: String,
    pub version: u32,
}

/// `metadata.language_info` of the notebook, used by syntax highlighters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub codemirror_mode: CodemirrorMode,
    pub file_extension: String,
    pub mimetype: String,
    pub name: String,
    pub nbconvert_exporter: String,
    pub pygments_lexer: String,
    pub version: String,
}

/// Fixed notebook-level metadata injected into the
/// [`crate::pipeline::assemble::DocumentAssembler`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookMetadata {
    pub kernelspec: KernelSpec,
    pub language_info: LanguageInfo,
}

impl NotebookMetadata {
    /// The IPython 3 kernel descriptor JupyterLab exports are produced with.
    pub fn python3() -> Self {
        Self {
            kernelspec: KernelSpec {
                display_name: "Python 3".into(),
                language: "python".into(),
                name: "python3".into(),
            },
            language_info: LanguageInfo {
                codemirror_mode: CodemirrorMode {
                    name: "ipython".into(),
                    version: 3,
                },
                file_extension: ".py".into(),
                mimetype: "text/x-python".into(),
                name: "python".into(),
                nbconvert_exporter: "python".into(),
                pygments_lexer: "ipython3".into(),
                version: "3.8.0".into(),
            },
        }
    }
}

impl Default for NotebookMetadata {
    fn default() -> Self {
        Self::python3()
    }
}

/// The whole-notebook envelope handed to the writer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentRecord {
    pub cells: Vec<CellRecord>,
    pub metadata: NotebookMetadata,
    pub nbformat: u32,
    pub nbformat_minor: u32,
}

impl DocumentRecord {
    /// Render the notebook in nbformat's on-disk JSON layout.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::with_capacity(4096);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        buf.push(b'\n');
        // serde_json only ever emits valid UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn cell_count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|c| c.kind == kind).count()
    }
}
