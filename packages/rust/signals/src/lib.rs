//! Text signal extraction for faculty web pages.
//!
//! Every function here is pure: no I/O, no shared state, safe to call in any
//! order or from many threads. Empty or missing input yields empty results and
//! malformed markup never fails.
//!
//! - [`extract_keywords`] / [`dedupe_keywords`]: labeled research keywords
//! - [`categorize`]: coarse [`ResearchArea`] labels from keywords
//! - [`extract_cv_link`]: first CV/résumé document link
//! - [`html_to_text`]: visible page text
//! - [`extract_signals`]: all of the above (plus profile details) for one page

pub mod categories;
pub mod cv_link;
pub mod keywords;
pub mod profile;
pub mod text;

use chrono::{DateTime, Utc};
use tracing::debug;

use facultydir_shared::{ResearchArea, WebsiteData};

pub use categories::categorize;
pub use cv_link::extract_cv_link;
pub use keywords::{MAX_KEYWORDS, dedupe_keywords, extract_keywords};
pub use profile::{extract_course_codes, extract_funding_sources, extract_lab_name};
pub use text::{extract_research_description, html_to_text};

/// Everything extracted from one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSignals {
    pub research_description: Option<String>,
    pub research_keywords: Vec<String>,
    pub research_areas: Vec<ResearchArea>,
    pub lab_name: Option<String>,
    pub cv_url: Option<String>,
    pub funding_sources: Vec<String>,
    pub courses_taught: Vec<String>,
}

impl PageSignals {
    /// True when nothing at all was found.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Package the signals as a successful [`WebsiteData`] record.
    pub fn into_website_data(
        self,
        website_url: String,
        method: &str,
        extracted_at: DateTime<Utc>,
    ) -> WebsiteData {
        WebsiteData {
            extraction_success: true,
            website_url: Some(website_url),
            research_description: self.research_description,
            research_keywords: self.research_keywords,
            research_areas: self.research_areas,
            lab_name: self.lab_name,
            cv_url: self.cv_url,
            funding_sources: self.funding_sources,
            courses_taught: self.courses_taught,
            extraction_method: Some(method.to_string()),
            extraction_date: Some(extracted_at),
            reason: None,
        }
    }
}

/// Run every extractor over one page.
///
/// `base_url` is the page's own URL, used to resolve relative CV links.
pub fn extract_signals(markup: &str, base_url: &str) -> PageSignals {
    let text = html_to_text(markup);
    let research_keywords = extract_keywords(&text);
    let research_areas = categorize(&research_keywords);

    let signals = PageSignals {
        research_description: extract_research_description(markup),
        research_areas,
        research_keywords,
        lab_name: extract_lab_name(&text),
        cv_url: extract_cv_link(markup, base_url),
        funding_sources: extract_funding_sources(&text),
        courses_taught: extract_course_codes(&text),
    };

    debug!(
        base_url,
        keywords = signals.research_keywords.len(),
        areas = signals.research_areas.len(),
        cv = signals.cv_url.is_some(),
        "extracted page signals"
    );
    signals
}
