//! Field-level merging and provenance stamping.
//!
//! Precedence: a field present in the scraped record replaces the
//! authoritative value, even when it is present but empty. Absent fields
//! keep the authoritative value.

use std::collections::BTreeSet;

use facultydir_shared::{FacultyRecord, SourcesConfig, WebsiteData};

/// Source identifiers written into `data_sources`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceIds {
    pub hr: String,
    pub web: String,
    pub website: String,
}

impl From<&SourcesConfig> for SourceIds {
    fn from(config: &SourcesConfig) -> Self {
        Self {
            hr: config.hr_source_id.clone(),
            web: config.web_source_id.clone(),
            website: config.website_source_id.clone(),
        }
    }
}

impl Default for SourceIds {
    fn default() -> Self {
        Self::from(&SourcesConfig::default())
    }
}

fn sources(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Pass 1: listings
// ---------------------------------------------------------------------------

/// Overlay every `Some` field of `$src` onto `$dst`.
macro_rules! overlay {
    ($dst:ident, $src:ident; $($field:ident),+ $(,)?) => {
        $(
            if $src.$field.is_some() {
                $dst.$field = $src.$field.clone();
            }
        )+
    };
}

/// Merge a matched pair. The result carries exactly `{hr, web}` as its
/// sources, so merging the same pair twice gives the same record.
pub fn merge_pair(
    authoritative: &FacultyRecord,
    scraped: &FacultyRecord,
    ids: &SourceIds,
) -> FacultyRecord {
    let mut merged = authoritative.clone();
    merged.name = scraped.name.clone();

    overlay!(merged, scraped;
        title, department_code, email, phone, office,
        website, profile_url, photo_url, source_url,
        research_interests, research_keywords, research_areas,
        lab_name, cv_url, publications_listed, courses_taught, funding_sources,
        category, website_data,
    );

    for (key, value) in &scraped.extra {
        merged.extra.insert(key.clone(), value.clone());
    }

    // known to be in both sources now
    merged.fis_match = None;
    merged.web_match = None;
    merged.data_sources = sources(&[ids.hr.as_str(), ids.web.as_str()]);
    merged
}

/// A scraped record with no authoritative counterpart.
pub fn stamp_web_only(scraped: &FacultyRecord, ids: &SourceIds) -> FacultyRecord {
    let mut record = scraped.clone();
    record.fis_match = Some(false);
    record.data_sources = sources(&[ids.web.as_str()]);
    record
}

/// An authoritative record never seen on a department page.
pub fn stamp_authoritative_only(authoritative: &FacultyRecord, ids: &SourceIds) -> FacultyRecord {
    let mut record = authoritative.clone();
    record.web_match = Some(false);
    record.data_sources = sources(&[ids.hr.as_str()]);
    record
}

// ---------------------------------------------------------------------------
// Blank-field guard
// ---------------------------------------------------------------------------

/// Names of fields that are present but blank (empty or whitespace-only
/// strings, empty lists, JSON `null` or `""` extras).
pub fn blank_fields(record: &FacultyRecord) -> Vec<String> {
    let mut blank = Vec::new();

    let strings = [
        ("title", &record.title),
        ("department_code", &record.department_code),
        ("email", &record.email),
        ("phone", &record.phone),
        ("office", &record.office),
        ("website", &record.website),
        ("profile_url", &record.profile_url),
        ("photo_url", &record.photo_url),
        ("source_url", &record.source_url),
        ("lab_name", &record.lab_name),
        ("cv_url", &record.cv_url),
        ("category", &record.category),
    ];
    blank.extend(
        strings
            .iter()
            .filter(|&&(_, v)| v.as_deref().is_some_and(|s| s.trim().is_empty()))
            .map(|&(k, _)| k.to_string()),
    );

    let lists = [
        ("research_interests", &record.research_interests),
        ("research_keywords", &record.research_keywords),
        ("research_areas", &record.research_areas),
        ("publications_listed", &record.publications_listed),
        ("courses_taught", &record.courses_taught),
        ("funding_sources", &record.funding_sources),
    ];
    blank.extend(
        lists
            .iter()
            .filter(|&&(_, v)| v.as_ref().is_some_and(Vec::is_empty))
            .map(|&(k, _)| k.to_string()),
    );

    blank.extend(
        record
            .extra
            .iter()
            .filter(|(_, v)| v.is_null() || v.as_str().is_some_and(|s| s.trim().is_empty()))
            .map(|(k, _)| k.clone()),
    );

    blank
}

/// Reset present-but-blank fields to absent. Returns how many were cleared.
pub fn clear_blank_fields(record: &mut FacultyRecord) -> usize {
    let blank = blank_fields(record);
    for field in &blank {
        match field.as_str() {
            "title" => record.title = None,
            "department_code" => record.department_code = None,
            "email" => record.email = None,
            "phone" => record.phone = None,
            "office" => record.office = None,
            "website" => record.website = None,
            "profile_url" => record.profile_url = None,
            "photo_url" => record.photo_url = None,
            "source_url" => record.source_url = None,
            "lab_name" => record.lab_name = None,
            "cv_url" => record.cv_url = None,
            "category" => record.category = None,
            "research_interests" => record.research_interests = None,
            "research_keywords" => record.research_keywords = None,
            "research_areas" => record.research_areas = None,
            "publications_listed" => record.publications_listed = None,
            "courses_taught" => record.courses_taught = None,
            "funding_sources" => record.funding_sources = None,
            other => {
                record.extra.remove(other);
            }
        }
    }
    blank.len()
}

// ---------------------------------------------------------------------------
// Pass 2: website enrichment
// ---------------------------------------------------------------------------

/// Fold a website extraction result into `record`.
///
/// On success, non-empty signals overwrite the record's research fields and
/// `website_id` joins `data_sources`; empty signals never erase what is
/// already there. The `website_data` block is attached either way.
pub fn apply_website_data(record: &mut FacultyRecord, data: WebsiteData, website_id: &str) {
    if data.extraction_success {
        if !data.research_keywords.is_empty() {
            record.research_keywords = Some(data.research_keywords.clone());
        }
        if !data.research_areas.is_empty() {
            record.research_areas = Some(
                data.research_areas
                    .iter()
                    .map(|area| area.as_str().to_string())
                    .collect(),
            );
        }
        if let Some(lab) = data.lab_name.as_ref().filter(|s| !s.trim().is_empty()) {
            record.lab_name = Some(lab.clone());
        }
        if let Some(cv) = data.cv_url.as_ref().filter(|s| !s.trim().is_empty()) {
            record.cv_url = Some(cv.clone());
        }
        if !data.funding_sources.is_empty() {
            record.funding_sources = Some(data.funding_sources.clone());
        }
        if !data.courses_taught.is_empty() {
            record.courses_taught = Some(data.courses_taught.clone());
        }
        record.data_sources.insert(website_id.to_string());
    }

    record.website_data = Some(data);
}
