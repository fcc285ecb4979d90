//! Post-processing: deterministic cleanup of reconstructed markdown.
//!
//! The tag walk in [`crate::pipeline::markdown`] concatenates fragments
//! without regard for spacing. These rules turn the raw concatenation into
//! text that reads like hand-authored source. Each rule is a pure
//! `&str → String` function and is independently testable.
//!
//! ## Rule Order
//!
//! Entities are decoded first so that encoded newlines and spaces take part
//! in the collapsing passes. Trimming runs last.

use html_escape::decode_html_entities;
use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all post-processing rules to the concatenated tag-walk output.
///
/// Rules (applied in order):
/// 1. Decode HTML character references
/// 2. Collapse three or more newlines (with interleaved whitespace) to two
/// 3. Collapse runs of spaces to a single space
/// 4. Trim leading and trailing whitespace
pub fn finish_markdown(input: &str) -> String {
    let s = decode_entities(input);
    let s = collapse_blank_lines(&s);
    let s = collapse_spaces(&s);
    s.trim().to_string()
}

// ── Rule 1: Decode character references ──────────────────────────────────────

pub(crate) fn decode_entities(input: &str) -> String {
    decode_html_entities(input).into_owned()
}

// ── Rule 2: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n\s*\n+").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").to_string()
}

// ── Rule 3: Collapse runs of spaces ──────────────────────────────────────────

static RE_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r" +").unwrap());

fn collapse_spaces(input: &str) -> String {
    RE_SPACES.replace_all(input, " ").to_string()
}

// ── Tests ────────────────────────────────────────────────────────────────────
