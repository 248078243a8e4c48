//! Research keyword extraction from labeled sections of page text.
//!
//! Looks for `Research Interests:`, `Interests:`, `Keywords:` and `Areas:`
//! labels, takes the free text after the colon up to the next blank line,
//! sentence terminator, or end of text, and splits it into keywords.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Maximum number of keywords returned per page.
pub const MAX_KEYWORDS: usize = 20;

/// Fragments this short (in characters) are discarded.
const MIN_FRAGMENT_CHARS: usize = 3;

/// Header patterns, each capturing the text following the label.
///
/// `(?s)` lets the lazy capture cross single line breaks; it stops at the
/// first blank line, `.` or end of input.
static SECTION_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?is)\bresearch\s+interests?\s*:\s*(.+?)(?:\n[ \t]*\n|\.|$)",
        r"(?is)\binterests?\s*:\s*(.+?)(?:\n[ \t]*\n|\.|$)",
        r"(?is)\bkeywords?\s*:\s*(.+?)(?:\n[ \t]*\n|\.|$)",
        r"(?is)\bareas?\s*:\s*(.+?)(?:\n[ \t]*\n|\.|$)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("keyword section regex"))
    .collect()
});

/// Delimiters between keywords inside a captured section.
static DELIMITER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;•·▪\r\n]").expect("delimiter regex"));

/// Extract up to [`MAX_KEYWORDS`] research keywords from page text.
///
/// Captures from every header are concatenated in header order, then
/// deduplicated case-insensitively (first casing wins).
pub fn extract_keywords(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut fragments = Vec::new();
    for re in SECTION_RES.iter() {
        for caps in re.captures_iter(text) {
            let Some(section) = caps.get(1) else { continue };
            fragments.extend(
                DELIMITER_RE
                    .split(section.as_str())
                    .map(str::trim)
                    .filter(|f| f.chars().count() >= MIN_FRAGMENT_CHARS)
                    .map(String::from),
            );
        }
    }

    let mut keywords = dedupe_keywords(&fragments);
    keywords.truncate(MAX_KEYWORDS);
    keywords
}

/// Case-insensitive, order-preserving deduplication. The first spelling seen
/// is kept.
pub fn dedupe_keywords<S: AsRef<str>>(keywords: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    keywords
        .iter()
        .map(AsRef::as_ref)
        .filter(|kw| seen.insert(kw.to_lowercase()))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedupe_keeps_first_casing() {
        let result = dedupe_keywords(&["Robotics", "robotics", "AI"]);
        assert_eq!(result, vec!["Robotics", "AI"]);
    }

    #[test]
    fn extracts_comma_separated_interests() {
        let text = "Research Interests: machine learning, medical imaging; robotics\n\nOther text";
        assert_eq!(
            extract_keywords(text),
            vec!["machine learning", "medical imaging", "robotics"]
        );
    }

    #[test]
    fn stops_at_sentence_terminator() {
        let text = "Keywords: tissue engineering, biomaterials. She teaches thermodynamics, statics";
        assert_eq!(extract_keywords(text), vec!["tissue engineering", "biomaterials"]);
    }

    #[test]
    fn splits_bullets_and_lines() {
        let text = "Areas:\n• Soft robotics\n• Haptics\n· Human-robot interaction\n\nContact";
        assert_eq!(
            extract_keywords(text),
            vec!["Soft robotics", "Haptics", "Human-robot interaction"]
        );
    }

    #[test]
    fn discards_short_fragments() {
        let text = "Interests: AI, ML, computer vision";
        assert_eq!(extract_keywords(text), vec!["computer vision"]);
    }

    #[test]
    fn overlapping_headers_deduplicate() {
        // "Research interests:" also matches the bare "interests:" header.
        let text = "Research interests: Robotics, robotics, control theory";
        assert_eq!(extract_keywords(text), vec!["Robotics", "control theory"]);
    }

    #[test]
    fn headers_concatenate_in_header_order() {
        let text = "Keywords: sensors, wearables\n\nResearch areas: power systems";
        // the "interests" headers match nothing; keywords come before areas
        assert_eq!(
            extract_keywords(text),
            vec!["sensors", "wearables", "power systems"]
        );
    }

    #[test]
    fn requires_colon() {
        let text = "Her research interests include robotics and vision";
        assert!(extract_keywords(text).is_empty());
    }

    #[test]
    fn requires_word_boundary() {
        assert!(extract_keywords("Subareas: alpha, beta").is_empty());
    }

    #[test]
    fn caps_at_twenty() {
        let list: Vec<String> = (0..50).map(|i| format!("topic number {i}")).collect();
        let text = format!("Keywords: {}", list.join(", "));
        let result = extract_keywords(&text);
        assert_eq!(result.len(), MAX_KEYWORDS);
        assert_eq!(result[0], "topic number 0");
        assert_eq!(result[19], "topic number 19");
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("   \n\n ").is_empty());
        assert!(extract_keywords("No labeled sections here").is_empty());
    }
}
