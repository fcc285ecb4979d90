//! Source-line normalisation: turn a block of text into nbformat's line array.
//!
//! nbformat stores cell sources as a list of strings where every line except
//! possibly the last carries its own `\n`. Markdown and code cells follow two
//! different conventions for the final line, and both are reproduced exactly:
//!
//! | policy     | last line non-empty | last line empty                           |
//! |------------|---------------------|-------------------------------------------|
//! | `Code`     | appended with `\n`  | dropped                                   |
//! | `Markdown` | appended bare       | previous entry forced to end in `\n`      |

/// The anchor glyph JupyterLab appends to rendered headings.
pub const ANCHOR_GLYPH: char = '¶';

/// Which final-line convention to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePolicy {
    Markdown,
    Code,
}

/// Split `text` on `\n` and re-attach terminators according to `policy`.
pub fn to_source_lines(text: &str, policy: LinePolicy) -> Vec<String> {
    let lines: Vec<&str> = text.split('\n').collect();
    let last = lines.len() - 1;
    let mut out: Vec<String> = Vec::with_capacity(lines.len());

    for (i, line) in lines.iter().enumerate() {
        if i < last {
            out.push(format!("{line}\n"));
            continue;
        }
        match policy {
            LinePolicy::Code => {
                if !line.is_empty() {
                    out.push(format!("{line}\n"));
                }
            }
            LinePolicy::Markdown => {
                if !line.is_empty() {
                    out.push((*line).to_string());
                } else if let Some(prev) = out.last_mut() {
                    if !prev.ends_with('\n') {
                        prev.push('\n');
                    }
                }
            }
        }
    }

    out
}

/// Remove every anchor glyph and the trailing whitespace it leaves behind,
/// line by line.
pub fn strip_anchor_glyphs(text: &str) -> String {
    text.replace(ANCHOR_GLYPH, "")
        .split('\n')
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}
