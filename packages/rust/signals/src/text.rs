//! Plain-text rendering of page markup.
//!
//! Produces the text the keyword and profile heuristics run over: visible
//! text only, block elements separated by blank lines, list items and line
//! breaks on their own lines.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Elements whose content is never visible page text.
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "nav", "footer", "header", "svg", "head",
];

/// Elements rendered as a paragraph-level block (surrounded by blank lines).
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "main", "aside", "h1", "h2", "h3", "h4", "h5", "h6",
    "ul", "ol", "dl", "table", "blockquote", "pre", "address", "figure", "form",
];

/// Elements that start a new line but not a new block.
const LINE_TAGS: &[&str] = &["li", "br", "tr", "dt", "dd"];

/// Descriptions longer than this are truncated (in characters).
pub const MAX_DESCRIPTION_CHARS: usize = 1000;

/// Paragraphs shorter than this are never used as a description.
const MIN_DESCRIPTION_CHARS: usize = 60;

/// Convert HTML markup into plain text.
///
/// Malformed markup is handled by the parser's error recovery; this never
/// fails.
pub fn html_to_text(markup: &str) -> String {
    if markup.trim().is_empty() {
        return String::new();
    }

    let doc = Html::parse_document(markup);
    let mut out = String::with_capacity(markup.len() / 2);
    walk(doc.root_element(), &mut out);
    normalize_whitespace(&out)
}

fn walk(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            push_text(out, text);
            continue;
        }

        let Some(child_el) = ElementRef::wrap(child) else {
            continue;
        };
        let tag = child_el.value().name();

        if SKIPPED_TAGS.contains(&tag) {
            continue;
        }

        if BLOCK_TAGS.contains(&tag) {
            break_lines(out, 2);
            walk(child_el, out);
            break_lines(out, 2);
        } else if LINE_TAGS.contains(&tag) {
            break_lines(out, 1);
            walk(child_el, out);
            break_lines(out, 1);
        } else {
            walk(child_el, out);
        }
    }
}

/// Source whitespace (including newlines) inside text nodes is just spacing.
fn push_text(out: &mut String, text: &str) {
    out.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
}

/// End `out` with at least `n` newlines, dropping trailing spaces first.
/// Nothing is emitted at the very start of the output.
fn break_lines(out: &mut String, n: usize) {
    let kept = out.trim_end_matches([' ', '\t']).len();
    out.truncate(kept);
    if out.is_empty() {
        return;
    }
    let have = out.len() - out.trim_end_matches('\n').len();
    for _ in have..n {
        out.push('\n');
    }
}

/// Runs of spaces become one space, lines are trimmed, and more than one
/// blank line collapses to exactly one.
fn normalize_whitespace(text: &str) -> String {
    static SPACES_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[ \t\u{a0}\r\f\v]+").expect("spaces regex"));
    static BLANK_RUN_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank run regex"));

    let collapsed = SPACES_RE.replace_all(text, " ");
    let trimmed_lines = collapsed
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");

    BLANK_RUN_RE
        .replace_all(&trimmed_lines, "\n\n")
        .trim()
        .to_string()
}

// ---------------------------------------------------------------------------
// Research description
// ---------------------------------------------------------------------------

/// Pick the page's research description: the first `<p>` with at least 60
/// characters of text that mentions research.
pub fn extract_research_description(markup: &str) -> Option<String> {
    static P_SEL: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("p").expect("paragraph selector"));
    static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("ws regex"));

    if markup.trim().is_empty() {
        return None;
    }

    let doc = Html::parse_document(markup);
    doc.select(&P_SEL)
        .map(|p| {
            let raw = p.text().collect::<String>();
            WS_RE.replace_all(raw.trim(), " ").into_owned()
        })
        .find(|text| {
            text.chars().count() >= MIN_DESCRIPTION_CHARS
                && text.to_lowercase().contains("research")
        })
        .map(|text| truncate_chars(&text, MAX_DESCRIPTION_CHARS))
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].trim_end().to_string(),
        None => text.to_string(),
    }
}
