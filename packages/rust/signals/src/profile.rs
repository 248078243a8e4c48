//! Profile details mentioned in page text: lab or group name, funding
//! agencies, and course identifiers.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Maximum number of course codes returned per page.
pub const MAX_COURSES: usize = 20;

// ---------------------------------------------------------------------------
// Lab name
// ---------------------------------------------------------------------------

/// A run of capitalised words (optionally joined by `and`/`of`/`for`/`&`)
/// ending in Lab, Laboratory, Group, Center or Centre, on a single line.
/// A leading "The" is matched but not captured.
static LAB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:The[ \t]+)?([A-Z][\w'&-]*(?:[ \t]+(?:(?:and|of|for|on|in|&)[ \t]+)?[A-Z][\w'&-]*){0,6}[ \t]+(?:Lab|Laboratory|Group|Center|Centre))\b",
    )
    .expect("lab name regex")
});

/// First lab, group or center named in the text.
pub fn extract_lab_name(text: &str) -> Option<String> {
    LAB_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

// ---------------------------------------------------------------------------
// Funding agencies
// ---------------------------------------------------------------------------

/// Agencies recognised by acronym (case-sensitive) or full name.
const AGENCIES: &[(&str, &str)] = &[
    ("NSF", r"national\s+science\s+foundation"),
    ("NIH", r"national\s+institutes?\s+of\s+health"),
    ("DOE", r"department\s+of\s+energy"),
    ("DARPA", r"defense\s+advanced\s+research\s+projects\s+agency"),
    ("DoD", r"department\s+of\s+defen[cs]e"),
    ("NASA", r"national\s+aeronautics\s+and\s+space\s+administration"),
    ("ONR", r"office\s+of\s+naval\s+research"),
    ("AFOSR", r"air\s+force\s+office\s+of\s+scientific\s+research"),
    ("ARO", r"army\s+research\s+office"),
];

static AGENCY_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    AGENCIES
        .iter()
        .map(|(acronym, full)| {
            let pattern = format!(r"\b{acronym}\b|(?i:\b{full}\b)");
            (*acronym, Regex::new(&pattern).expect("funding agency regex"))
        })
        .collect()
});

/// Funding agencies mentioned in the text, as acronyms in a fixed order.
pub fn extract_funding_sources(text: &str) -> Vec<String> {
    AGENCY_RES
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(acronym, _)| acronym.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Course codes
// ---------------------------------------------------------------------------

/// Subject prefix of 2-4 capitals and a 3-4 digit number, e.g. `BME 3100`,
/// `ECE-2020`, `CS101`.
static COURSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z]{2,4})[ \t-]?(\d{3,4}[A-Z]?)\b").expect("course code regex")
});

/// Course identifiers in first-seen order, normalised to `SUBJ 1234`.
pub fn extract_course_codes(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    COURSE_RE
        .captures_iter(text)
        // "NSF 2023" and friends are grant citations, not courses
        .filter(|caps| !AGENCIES.iter().any(|(acronym, _)| caps[1].eq_ignore_ascii_case(acronym)))
        .map(|caps| format!("{} {}", &caps[1], &caps[2]))
        .filter(|code| seen.insert(code.clone()))
        .take(MAX_COURSES)
        .collect()
}
