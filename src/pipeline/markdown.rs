//! HTML → markdown: the inverse of the notebook's markdown renderer.
//!
//! The walk is depth-first and order preserving. Text nodes contribute their
//! trimmed text; elements are dispatched through a fixed tag table
//! ([`TagRule`]), and any tag without a rule collapses to its flattened text.
//! The raw concatenation is then cleaned up by
//! [`crate::pipeline::postprocess::finish_markdown`].
//!
//! Headings need special care: JupyterLab injects a clickable `¶` anchor
//! after each heading's text, which must not survive into the source.

use crate::pipeline::lines::ANCHOR_GLYPH;
use crate::pipeline::postprocess;
use scraper::{ElementRef, Node};

/// Convert the children of a rendered-markdown root into markdown source.
pub fn html_to_markdown(element: ElementRef<'_>) -> String {
    postprocess::finish_markdown(&walk_children(element))
}

/// Conversion rule for a single tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagRule {
    /// `h1`..`h6`, carrying the level.
    Heading(usize),
    Strong,
    Emphasis,
    InlineCode,
    Preformatted,
    Paragraph,
    LineBreak,
    Link,
    UnorderedList,
    OrderedList,
    Blockquote,
    /// `div` / `span`: re-walk the children with this same table.
    Container,
    /// Anything else: the element's flattened text, unchanged.
    Flatten,
}

impl TagRule {
    /// Look up the rule for a (case-insensitive) tag name.
    pub fn for_tag(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "h1" => Self::Heading(1),
            "h2" => Self::Heading(2),
            "h3" => Self::Heading(3),
            "h4" => Self::Heading(4),
            "h5" => Self::Heading(5),
            "h6" => Self::Heading(6),
            "strong" | "b" => Self::Strong,
            "em" | "i" => Self::Emphasis,
            "code" => Self::InlineCode,
            "pre" => Self::Preformatted,
            "p" => Self::Paragraph,
            "br" => Self::LineBreak,
            "a" => Self::Link,
            "ul" => Self::UnorderedList,
            "ol" => Self::OrderedList,
            "blockquote" => Self::Blockquote,
            "div" | "span" => Self::Container,
            _ => Self::Flatten,
        }
    }

    /// Produce the markdown fragment for `element`.
    pub fn apply(self, element: ElementRef<'_>) -> String {
        match self {
            Self::Heading(level) => {
                let title = flat_text(element).replace(ANCHOR_GLYPH, "");
                format!("{} {}\n", "#".repeat(level), title.trim())
            }
            Self::Strong => format!("**{}**", flat_text(element)),
            Self::Emphasis => format!("*{}*", flat_text(element)),
            Self::InlineCode => format!("`{}`", flat_text(element)),
            Self::Preformatted => format!("```\n{}\n```\n", flat_text(element)),
            Self::Paragraph => format!("{}\n", flat_text(element)),
            Self::LineBreak => "\n".to_string(),
            Self::Link => {
                let text = flat_text(element);
                match element.value().attr("href") {
                    Some(href) if !href.is_empty() => format!("[{text}]({href})"),
                    _ => text,
                }
            }
            Self::UnorderedList => render_list(element, |_| "-".to_string()),
            Self::OrderedList => render_list(element, |n| format!("{n}.")),
            Self::Blockquote => {
                let quoted: Vec<String> = flat_text(element)
                    .split('\n')
                    .filter(|line| !line.trim().is_empty())
                    .map(|line| format!("> {line}"))
                    .collect();
                format!("{}\n", quoted.join("\n"))
            }
            Self::Container => walk_children(element),
            Self::Flatten => flat_text(element),
        }
    }
}

/// Concatenate the fragments of every child node, in document order.
fn walk_children(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text.trim()),
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child) {
                    out.push_str(&TagRule::for_tag(el.value().name()).apply(el));
                }
            }
            _ => {}
        }
    }
    out
}

/// All descendant text of `element`, concatenated without separators.
fn flat_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// One line per direct `li` child, `marker(n)` + space + trimmed item text.
fn render_list(element: ElementRef<'_>, marker: impl Fn(usize) -> String) -> String {
    let items: Vec<String> = element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name().eq_ignore_ascii_case("li"))
        .enumerate()
        .map(|(i, li)| format!("{} {}", marker(i + 1), flat_text(li).trim()))
        .collect();
    format!("{}\n", items.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    /// Convert the first `div.root` in an HTML fragment.
    fn convert(body: &str) -> String {
        let doc = Html::parse_fragment(&format!("<div class=\"root\">{body}</div>"));
        let sel = Selector::parse("div.root").unwrap();
        html_to_markdown(doc.select(&sel).next().unwrap())
    }

    /// Apply a single rule to the first element in a fragment, without post-processing.
    fn rule_output(html: &str, tag: &str) -> String {
        let doc = Html::parse_fragment(html);
        let sel = Selector::parse(tag).unwrap();
        let el = doc.select(&sel).next().unwrap();
        TagRule::for_tag(tag).apply(el)
    }

    #[test]
    fn heading_strips_anchor_glyph() {
        assert_eq!(rule_output("<h2>Intro¶</h2>", "h2"), "## Intro\n");
    }

    #[test]
    fn heading_with_anchor_link() {
        let html = r##"<h1 id="Title">Title<a class="anchor-link" href="#Title">¶</a></h1>"##;
        assert_eq!(convert(html), "# Title");
    }

    #[test]
    fn unordered_list() {
        assert_eq!(rule_output("<ul><li>a</li><li>b</li></ul>", "ul"), "- a\n- b\n");
    }

    #[test]
    fn ordered_list_numbers_from_one() {
        assert_eq!(
            rule_output("<ol><li> first </li><li>second</li></ol>", "ol"),
            "1. first\n2. second\n"
        );
    }

    #[test]
    fn nested_list_items_only_direct_children() {
        let out = rule_output("<ul><li>outer<ul><li>inner</li></ul></li></ul>", "ul");
        assert_eq!(out, "- outerinner\n");
    }

    #[test]
    fn inline_formatting() {
        assert_eq!(
            convert("<p>Some <strong>bold</strong> and <em>it</em> and <code>x</code></p>"),
            "Some bold and it and x"
        );
        assert_eq!(convert("<strong>bold</strong>"), "**bold**");
        assert_eq!(convert("<b>b</b><i>i</i>"), "**b***i*");
        assert_eq!(convert("<code>len(x)</code>"), "`len(x)`");
    }

    #[test]
    fn link_with_and_without_href() {
        assert_eq!(
            convert(r#"<a href="https://jupyter.org">Jupyter</a>"#),
            "[Jupyter](https://jupyter.org)"
        );
        assert_eq!(convert(r#"<a href="">bare</a>"#), "bare");
        assert_eq!(convert("<a>bare</a>"), "bare");
    }

    #[test]
    fn preformatted_block_is_fenced() {
        assert_eq!(rule_output("<pre>x = 1</pre>", "pre"), "```\nx = 1\n```\n");
    }

    #[test]
    fn blockquote_prefixes_non_blank_lines() {
        assert_eq!(
            rule_output("<blockquote>\n<p>one</p>\n\n<p>two</p>\n</blockquote>", "blockquote"),
            "> one\n> two\n"
        );
    }

    #[test]
    fn line_break() {
        assert_eq!(convert("first<br>second"), "first\nsecond");
    }

    #[test]
    fn container_rewalks_children() {
        assert_eq!(
            convert("<div><h3>Head</h3><span><strong>x</strong></span></div>"),
            "### Head\n**x**"
        );
    }

    #[test]
    fn unknown_tag_flattens() {
        assert_eq!(convert("<table><tr><td>a</td><td>b</td></tr></table>"), "ab");
    }

    #[test]
    fn paragraphs_and_headers_collapse_blank_runs() {
        let out = convert("<h1>Title¶</h1>\n\n<p>para   one</p>\n\n\n<p>para two</p>");
        assert_eq!(out, "# Title\npara one\npara two");
    }

    #[test]
    fn entities_are_decoded() {
        assert_eq!(convert("<p>a &lt; b &amp; c</p>"), "a < b & c");
    }

    #[test]
    fn tag_table_lookup() {
        assert_eq!(TagRule::for_tag("H4"), TagRule::Heading(4));
        assert_eq!(TagRule::for_tag("span"), TagRule::Container);
        assert_eq!(TagRule::for_tag("table"), TagRule::Flatten);
    }
}
