//! CV / résumé document link detection in raw markup.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use url::Url;

/// `href` values naming a CV document, tried in order; first match wins.
static CV_HREF_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"(?i)href\s*=\s*"([^"]*(?:cv|resume|vitae)[^"]*\.(?:pdf|docx?))""#,
        r#"(?i)href\s*=\s*'([^']*(?:cv|resume|vitae)[^']*\.(?:pdf|docx?))'"#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("cv link regex"))
    .collect()
});

/// Find the first CV/résumé document link in `markup`.
///
/// Relative links are resolved against `base_url`. Returns `None` when no
/// link matches or a relative link cannot be resolved.
pub fn extract_cv_link(markup: &str, base_url: &str) -> Option<String> {
    let href = CV_HREF_RES
        .iter()
        .find_map(|re| re.captures(markup))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())?;

    if is_absolute_http(href) {
        return Some(href.to_string());
    }

    match Url::parse(base_url).and_then(|base| base.join(href)) {
        Ok(resolved) => Some(resolved.to_string()),
        Err(e) => {
            debug!(href, base_url, error = %e, "could not resolve CV link");
            None
        }
    }
}

fn is_absolute_http(href: &str) -> bool {
    Url::parse(href).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_link_against_base() {
        let html = r#"<a href="docs/cv.pdf">Curriculum Vitae</a>"#;
        assert_eq!(
            extract_cv_link(html, "https://example.edu/people/jdoe/").as_deref(),
            Some("https://example.edu/people/jdoe/docs/cv.pdf")
        );
    }

    #[test]
    fn keeps_absolute_link() {
        let html = r#"<a href="https://cdn.example.edu/files/Doe_Resume.PDF">Resume</a>"#;
        assert_eq!(
            extract_cv_link(html, "https://example.edu/").as_deref(),
            Some("https://cdn.example.edu/files/Doe_Resume.PDF")
        );
    }

    #[test]
    fn root_relative_and_single_quoted() {
        let html = "<a href='/~jdoe/vitae.docx'>Vitae</a>";
        assert_eq!(
            extract_cv_link(html, "https://example.edu/people/jdoe/").as_deref(),
            Some("https://example.edu/~jdoe/vitae.docx")
        );
    }

    #[test]
    fn first_match_wins() {
        let html = r#"
            <a href="papers/paper1.pdf">Paper</a>
            <a href="files/CV-2024.pdf">CV</a>
            <a href="files/resume-old.pdf">Old resume</a>
        "#;
        assert_eq!(
            extract_cv_link(html, "https://example.edu/").as_deref(),
            Some("https://example.edu/files/CV-2024.pdf")
        );
    }

    #[test]
    fn ignores_non_document_links() {
        let html = r#"<a href="/cv.html">CV page</a><a href="/publications.pdf">Pubs</a>"#;
        assert!(extract_cv_link(html, "https://example.edu/").is_none());
    }

    #[test]
    fn unresolvable_relative_link() {
        let html = r#"<a href="cv.pdf">CV</a>"#;
        assert!(extract_cv_link(html, "not a base url").is_none());
    }

    #[test]
    fn empty_and_malformed_markup() {
        assert!(extract_cv_link("", "https://example.edu/").is_none());
        assert!(extract_cv_link("<a href=\"cv.pdf", "https://example.edu/").is_none());
    }
}
