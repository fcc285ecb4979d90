//! Pipeline stages for HTML-to-notebook conversion.
//!
//! Each submodule implements exactly one transformation step, so each is
//! independently testable.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ markdown ──▶ postprocess ──▶ lines ──▶ assemble
//! (read)    (cells)     (HTML→md)    (cleanup)       (nbformat) (envelope)
//! ```
//!
//! 1. [`input`]: validate a path and read it as UTF-8
//! 2. [`extract`]: locate cell containers and classify them; code cells
//!    are read straight from the highlighted `<pre>`
//! 3. [`markdown`]: tag-table walk turning rendered markdown back into source
//! 4. [`postprocess`]: entity decoding and whitespace collapsing
//! 5. [`lines`]: nbformat per-line-string convention for both cell kinds
//! 6. [`assemble`]: wrap the concatenated cells with fixed notebook metadata

pub mod assemble;
pub mod extract;
pub mod input;
pub mod lines;
pub mod markdown;
pub mod postprocess;
