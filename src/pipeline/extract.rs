//! Cell extraction: find JupyterLab cell containers and rebuild their sources.
//!
//! ## Locating cells
//!
//! Cells are elements carrying both the `jp-Cell` and `jp-Notebook-cell`
//! class tokens. Older exports spell the class string differently, so when
//! the exact-token query finds nothing we retry with a substring match on the
//! raw `class` attribute. Both tiers stay in place as an explicit fallback
//! chain; collapsing them would silently drop cells from older exports.
//!
//! ## Failure policy
//!
//! A cell missing any expected sub-element, or whose text is empty once the
//! anchor glyphs are stripped, yields `None` and is dropped. Extraction never
//! fails as a whole.

use crate::notebook::{CellKind, CellRecord};
use crate::pipeline::lines::{strip_anchor_glyphs, to_source_lines, LinePolicy, ANCHOR_GLYPH};
use crate::pipeline::markdown::html_to_markdown;
use crate::pipeline::postprocess::decode_entities;
use ego_tree::NodeId;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use tracing::debug;

const CELL_MARKER: &str = "jp-Cell";
const NOTEBOOK_CELL_MARKER: &str = "jp-Notebook-cell";
const MARKDOWN_CELL_MARKER: &str = "jp-MarkdownCell";
const CODE_CELL_MARKER: &str = "jp-CodeCell";
/// Class prefix of JupyterLab-injected decoration nodes.
const JP_CLASS_PREFIX: &str = "jp-";

static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".jp-Cell.jp-Notebook-cell").unwrap());
static CLASSED_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("[class]").unwrap());
static RENDERED_MARKDOWN: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.jp-RenderedMarkdown").unwrap());
static EDITOR_CURRENT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.jp-CodeMirrorEditor").unwrap());
static EDITOR_LEGACY: Lazy<Selector> = Lazy::new(|| Selector::parse("div.CodeMirror").unwrap());
static HIGHLIGHT: Lazy<Selector> = Lazy::new(|| Selector::parse("div.highlight").unwrap());
static PRE: Lazy<Selector> = Lazy::new(|| Selector::parse("pre").unwrap());
static INPUT_PROMPT: Lazy<Selector> = Lazy::new(|| Selector::parse("div.jp-InputPrompt").unwrap());

static RE_INPUT_PROMPT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^In\s*\[(\d+)\]:").unwrap());

/// Parse an HTML export and extract its cells.
pub fn extract_cells_from_str(html: &str) -> Vec<CellRecord> {
    let document = Html::parse_document(html);
    extract_cells(&document)
}

/// Extract every markdown and code cell from a parsed export, in document order.
pub fn extract_cells(document: &Html) -> Vec<CellRecord> {
    let nodes = find_cell_nodes(document);
    debug!("Found {} cell containers", nodes.len());

    let mut cells = Vec::with_capacity(nodes.len());
    for (i, node) in nodes.into_iter().enumerate() {
        let classes = node.value().attr("class").unwrap_or("");
        debug!(
            "Cell {}: classes = {}...",
            i,
            classes.chars().take(50).collect::<String>()
        );

        let cell = match classify(classes) {
            Some(CellKind::Markdown) => extract_markdown_cell(node),
            Some(CellKind::Code) => extract_code_cell(node),
            None => continue,
        };

        if let Some(cell) = cell {
            debug!("  Extracted {} cell", cell.kind);
            cells.push(cell);
        }
    }
    cells
}

/// Two-tier cell lookup: exact class tokens first, substring match second.
pub fn find_cell_nodes(document: &Html) -> Vec<ElementRef<'_>> {
    let exact: Vec<ElementRef<'_>> = document.select(&CELL_SELECTOR).collect();
    if !exact.is_empty() {
        return exact;
    }

    document
        .select(&CLASSED_SELECTOR)
        .filter(|el| {
            el.value()
                .attr("class")
                .is_some_and(|c| c.contains(CELL_MARKER) && c.contains(NOTEBOOK_CELL_MARKER))
        })
        .collect()
}

/// Decide the cell kind from the container's raw class string.
pub fn classify(classes: &str) -> Option<CellKind> {
    if classes.contains(MARKDOWN_CELL_MARKER) {
        Some(CellKind::Markdown)
    } else if classes.contains(CODE_CELL_MARKER) {
        Some(CellKind::Code)
    } else {
        None
    }
}

/// Rebuild a markdown cell from its `jp-RenderedMarkdown` region.
pub fn extract_markdown_cell(cell: ElementRef<'_>) -> Option<CellRecord> {
    let Some(rendered) = find_descendant(cell, &RENDERED_MARKDOWN) else {
        debug!("  No jp-RenderedMarkdown div found");
        return None;
    };

    let text = strip_anchor_glyphs(&html_to_markdown(rendered));
    if text.trim().is_empty() {
        return None;
    }

    Some(CellRecord::markdown(to_source_lines(
        &text,
        LinePolicy::Markdown,
    )))
}

/// Rebuild a code cell from its highlighted editor block and input prompt.
pub fn extract_code_cell(cell: ElementRef<'_>) -> Option<CellRecord> {
    let Some(editor) =
        find_descendant(cell, &EDITOR_CURRENT).or_else(|| find_descendant(cell, &EDITOR_LEGACY))
    else {
        debug!("  No code container (jp-CodeMirrorEditor or CodeMirror) found");
        return None;
    };

    let Some(highlight) = find_descendant(editor, &HIGHLIGHT) else {
        debug!("  No highlight div found");
        return None;
    };

    let Some(pre) = find_descendant(highlight, &PRE) else {
        debug!("  No pre tag found");
        return None;
    };

    let text = strip_anchor_glyphs(&code_text(pre));
    if text.trim().is_empty() {
        return None;
    }

    Some(CellRecord::code(
        to_source_lines(&text, LinePolicy::Code),
        execution_count(cell),
    ))
}

/// Parse `In [n]:` from the cell's input prompt, if there is one.
pub fn execution_count(cell: ElementRef<'_>) -> Option<u32> {
    let prompt = find_descendant(cell, &INPUT_PROMPT)?;
    let text: String = prompt.text().collect();
    RE_INPUT_PROMPT
        .captures(text.trim())
        .and_then(|caps| caps[1].parse().ok())
}

/// Plain text of a highlighted `<pre>`, without anchor-glyph decorations.
///
/// Lines are right-trimmed and blank lines at either end are dropped.
fn code_text(pre: ElementRef<'_>) -> String {
    let glyph_nodes: HashSet<NodeId> = pre
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.id() != pre.id() && is_anchor_glyph_node(*el))
        .map(|el| el.id())
        .collect();

    let mut raw = String::new();
    collect_text_excluding(pre, &glyph_nodes, &mut raw);

    let decoded = decode_entities(&raw);
    let lines: Vec<&str> = decoded.split('\n').map(str::trim_end).collect();
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}

/// A JupyterLab decoration node whose only content is the anchor glyph.
fn is_anchor_glyph_node(el: ElementRef<'_>) -> bool {
    el.value()
        .classes()
        .any(|class| class.starts_with(JP_CLASS_PREFIX))
        && el.text().collect::<String>() == ANCHOR_GLYPH.to_string()
}

fn collect_text_excluding(element: ElementRef<'_>, skip: &HashSet<NodeId>, out: &mut String) {
    for child in element.children() {
        if skip.contains(&child.id()) {
            continue;
        }
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child) {
                    collect_text_excluding(el, skip, out);
                }
            }
            _ => {}
        }
    }
}

/// First element strictly below `scope` matching `selector`.
fn find_descendant<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).find(|el| el.id() != scope.id())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markdown_cell(inner: &str) -> String {
        format!(
            r#"<div class="jp-Cell jp-MarkdownCell jp-Notebook-cell">
<div class="jp-Cell-inputWrapper"><div class="jp-InputArea jp-Cell-inputArea">
<div class="jp-InputPrompt jp-InputArea-prompt"></div>
<div class="jp-RenderedHTMLCommon jp-RenderedMarkdown jp-MarkdownOutput" data-mime-type="text/markdown">
{inner}
</div></div></div></div>"#
        )
    }

    fn code_cell(prompt: &str, code: &str) -> String {
        format!(
            r#"<div class="jp-Cell jp-CodeCell jp-Notebook-cell">
<div class="jp-Cell-inputWrapper"><div class="jp-InputArea jp-Cell-inputArea">
<div class="jp-InputPrompt jp-InputArea-prompt">{prompt}</div>
<div class="jp-CodeMirrorEditor jp-Editor jp-InputArea-editor" data-type="inline">
<div class="cm-editor cm-s-jupyter">
<div class="highlight hl-ipython3"><pre><span></span>{code}
</pre></div>
</div></div></div></div>
<div class="jp-Cell-outputWrapper"><div class="jp-OutputArea"><pre>ignored output</pre></div></div>
</div>"#
        )
    }

    fn page(cells: &[String]) -> String {
        format!(
            "<!DOCTYPE html><html><body><main>{}</main></body></html>",
            cells.join("\n")
        )
    }

    #[test]
    fn extracts_markdown_and_code_in_order() {
        let html = page(&[
            markdown_cell("<h2 id=\"Intro\">Intro<a class=\"anchor-link\" href=\"#Intro\">¶</a></h2>"),
            code_cell("In&nbsp;[7]:", "<span class=\"n\">x</span> <span class=\"o\">=</span> <span class=\"mi\">1</span>\ny = 2"),
        ]);
        let cells = extract_cells_from_str(&html);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].kind, CellKind::Markdown);
        assert_eq!(cells[0].source, vec!["## Intro"]);
        assert_eq!(cells[1].kind, CellKind::Code);
        assert_eq!(cells[1].source, vec!["x = 1\n", "y = 2\n"]);
        assert_eq!(cells[1].execution_count, Some(7));
    }

    #[test]
    fn prompt_without_number_gives_no_count() {
        let cells = extract_cells_from_str(&page(&[code_cell("In&nbsp;[&nbsp;]:", "pass")]));
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].execution_count, None);

        let cells = extract_cells_from_str(&page(&[code_cell("", "pass")]));
        assert_eq!(cells[0].execution_count, None);

        let cells = extract_cells_from_str(&page(&[code_cell("In [abc]:", "pass")]));
        assert_eq!(cells[0].execution_count, None);
    }

    #[test]
    fn overflowing_prompt_gives_no_count() {
        let cells = extract_cells_from_str(&page(&[code_cell("In [99999999999]:", "pass")]));
        assert_eq!(cells[0].execution_count, None);
    }

    #[test]
    fn missing_rendered_markdown_yields_nothing() {
        let html = page(&[r#"<div class="jp-Cell jp-MarkdownCell jp-Notebook-cell"><div class="jp-InputArea"><p>x</p></div></div>"#.to_string()]);
        assert!(extract_cells_from_str(&html).is_empty());
    }

    #[test]
    fn missing_code_sub_elements_yield_nothing() {
        let no_editor = r#"<div class="jp-Cell jp-CodeCell jp-Notebook-cell"><div class="highlight"><pre>x</pre></div></div>"#;
        let no_highlight = r#"<div class="jp-Cell jp-CodeCell jp-Notebook-cell"><div class="jp-CodeMirrorEditor"><pre>x</pre></div></div>"#;
        let no_pre = r#"<div class="jp-Cell jp-CodeCell jp-Notebook-cell"><div class="jp-CodeMirrorEditor"><div class="highlight">x</div></div></div>"#;
        for html in [no_editor, no_highlight, no_pre] {
            assert!(extract_cells_from_str(&page(&[html.to_string()])).is_empty());
        }
    }

    #[test]
    fn whitespace_and_glyph_only_cells_are_dropped() {
        let html = page(&[
            markdown_cell("<p> ¶ </p>"),
            markdown_cell(""),
            code_cell("In [1]:", "   \n\n  "),
        ]);
        assert!(extract_cells_from_str(&html).is_empty());
    }

    #[test]
    fn legacy_codemirror_container() {
        let html = page(&[r#"<div class="jp-Cell jp-CodeCell jp-Notebook-cell">
<div class="jp-InputPrompt">In [2]:</div>
<div class="CodeMirror cm-s-jupyter"><div class="highlight"><pre>print(&quot;hi&quot;)</pre></div></div>
</div>"#
            .to_string()]);
        let cells = extract_cells_from_str(&html);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].source, vec!["print(\"hi\")\n"]);
        assert_eq!(cells[0].execution_count, Some(2));
    }

    #[test]
    fn substring_fallback_for_older_class_spelling() {
        let html = page(&[r#"<div class="jp-Cell-legacy jp-CodeCell jp-Notebook-cell-x">
<div class="jp-CodeMirrorEditor"><div class="highlight"><pre>a = 1</pre></div></div>
</div>"#
            .to_string()]);
        let cells = extract_cells_from_str(&html);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].source, vec!["a = 1\n"]);
    }

    #[test]
    fn other_cell_types_are_skipped() {
        let html = page(&[
            r#"<div class="jp-Cell jp-RawCell jp-Notebook-cell"><pre>raw</pre></div>"#.to_string(),
            markdown_cell("<p>kept</p>"),
        ]);
        let cells = extract_cells_from_str(&html);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].source, vec!["kept"]);
    }

    #[test]
    fn anchor_glyph_nodes_removed_from_code() {
        let html = page(&[code_cell(
            "In [3]:",
            "<span class=\"c1\"># comment</span><a class=\"jp-InternalAnchorLink\">¶</a>\nz = 3",
        )]);
        let cells = extract_cells_from_str(&html);
        assert_eq!(cells[0].source, vec!["# comment\n", "z = 3\n"]);
    }

    #[test]
    fn code_blank_edges_trimmed_inner_blank_kept() {
        let html = page(&[code_cell("In [4]:", "\n\ndef f():   \n\n    return 1\n\n")]);
        let cells = extract_cells_from_str(&html);
        assert_eq!(
            cells[0].source,
            vec!["def f():\n", "\n", "    return 1\n"]
        );
    }

    #[test]
    fn markdown_list_and_paragraphs() {
        let html = page(&[markdown_cell(
            "<p>para one</p>\n<ul>\n<li>a</li>\n<li>b</li>\n</ul>",
        )]);
        let cells = extract_cells_from_str(&html);
        assert_eq!(cells[0].source, vec!["para one\n", "- a\n", "- b"]);
    }

    #[test]
    fn classify_markers() {
        assert_eq!(
            classify("jp-Cell jp-MarkdownCell jp-Notebook-cell"),
            Some(CellKind::Markdown)
        );
        assert_eq!(classify("jp-Cell jp-CodeCell jp-Notebook-cell"), Some(CellKind::Code));
        assert_eq!(classify("jp-Cell jp-RawCell jp-Notebook-cell"), None);
    }

    #[test]
    fn document_without_cells() {
        assert!(extract_cells_from_str("<html><body><p>nothing</p></body></html>").is_empty());
    }

    #[test]
    fn extraction_is_deterministic() {
        let html = page(&[markdown_cell("<h1>T¶</h1>"), code_cell("In [1]:", "x")]);
        assert_eq!(extract_cells_from_str(&html), extract_cells_from_str(&html));
    }
}
