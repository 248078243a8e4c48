//! Core domain types for the faculty directory.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ExtractionFailure;

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one pipeline run (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// ResearchArea
// ---------------------------------------------------------------------------

/// Broad research category assigned from keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchArea {
    MachineLearning,
    Biomedical,
    Robotics,
    Materials,
    Energy,
    Computing,
    Imaging,
    Control,
}

impl ResearchArea {
    /// Every label, in reporting order.
    pub const ALL: [ResearchArea; 8] = [
        Self::MachineLearning,
        Self::Biomedical,
        Self::Robotics,
        Self::Materials,
        Self::Energy,
        Self::Computing,
        Self::Imaging,
        Self::Control,
    ];

    /// Serialized label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MachineLearning => "machine_learning",
            Self::Biomedical => "biomedical",
            Self::Robotics => "robotics",
            Self::Materials => "materials",
            Self::Energy => "energy",
            Self::Computing => "computing",
            Self::Imaging => "imaging",
            Self::Control => "control",
        }
    }
}

impl std::fmt::Display for ResearchArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FacultyRecord
// ---------------------------------------------------------------------------

/// One person, as seen by one or more sources.
///
/// Every optional field distinguishes "absent" (`None`) from "present"
/// (`Some`, possibly empty); the merge precedence rule depends on it.
/// Keys not modelled here are kept in [`extra`](Self::extra).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacultyRecord {
    /// Identity key across sources (exact, case-sensitive).
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Department code. Scraped batches spell it `department`, which stays
    /// in [`extra`](Self::extra) and is copied here by the batch loader.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub office: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// Listing page the record was scraped from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research_interests: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research_keywords: Option<Vec<String>>,
    /// Category labels. Usually [`ResearchArea`] labels, but labels from
    /// other sources are kept as they are.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research_areas: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lab_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cv_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publications_listed: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courses_taught: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_sources: Option<Vec<String>>,

    /// Appointment type (e.g. "Tenure / Tenure Track").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Sources that contributed at least one field.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub data_sources: BTreeSet<String>,

    /// `Some(false)` when the record is missing from the authoritative set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fis_match: Option<bool>,
    /// `Some(false)` when the record never appeared on a department page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_match: Option<bool>,

    /// Result of the website enrichment pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_data: Option<WebsiteData>,

    /// Any other keys carried by the source.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl FacultyRecord {
    /// Create a record carrying only its identity key.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The website URL, if present and not blank.
    pub fn website_url(&self) -> Option<&str> {
        self.website.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

// ---------------------------------------------------------------------------
// WebsiteData
// ---------------------------------------------------------------------------

/// Per-faculty outcome of the website enrichment pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebsiteData {
    pub extraction_success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research_description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub research_keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub research_areas: Vec<ResearchArea>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lab_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cv_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub funding_sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub courses_taught: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_date: Option<DateTime<Utc>>,
    /// Failure reason (`no_website_url` or the underlying error text).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl WebsiteData {
    /// Record a per-faculty failure.
    pub fn failed(failure: &ExtractionFailure, website_url: Option<String>) -> Self {
        Self {
            extraction_success: false,
            website_url,
            extraction_date: Some(Utc::now()),
            reason: Some(failure.reason()),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// `metadata` block of the authoritative extract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthoritativeMetadata {
    #[serde(default)]
    pub total_faculty: usize,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// The trusted personnel extract, the baseline identity list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthoritativeSet {
    #[serde(default)]
    pub metadata: AuthoritativeMetadata,
    pub faculty: Vec<FacultyRecord>,
}

/// One department from the department inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    /// Short code (e.g. `bme`); also the scraped batch file stem.
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faculty_list_url: Option<String>,
}

/// The department inventory file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepartmentInventory {
    pub departments: Vec<Department>,
}

/// On-disk shape of one scraped department batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScrapedBatchFile {
    /// A bare array of records.
    Records(Vec<FacultyRecord>),
    /// Records wrapped with their department code.
    Wrapped {
        #[serde(default)]
        department: Option<String>,
        faculty: Vec<FacultyRecord>,
    },
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// Batch-level metadata persisted with every roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterMetadata {
    pub created_date: DateTime<Utc>,
    pub run_id: RunId,
    /// Source identifiers that contributed to this roster.
    pub data_sources: Vec<String>,
    pub total_faculty: usize,
    /// Passes that produced this file (`listings`, `websites`).
    #[serde(default)]
    pub passes: Vec<String>,
}

/// A persisted, flat, ordered list of merged faculty records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub metadata: RosterMetadata,
    pub faculty: Vec<FacultyRecord>,
}

impl Roster {
    /// Wrap records with fresh metadata.
    pub fn new(faculty: Vec<FacultyRecord>, data_sources: Vec<String>, passes: Vec<String>) -> Self {
        Self {
            metadata: RosterMetadata {
                created_date: Utc::now(),
                run_id: RunId::new(),
                data_sources,
                total_faculty: faculty.len(),
                passes,
            },
            faculty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_id_roundtrip() {
        let id = RunId::new();
        let parsed: RunId = id.to_string().parse().expect("parse RunId");
        assert_eq!(id, parsed);
    }

    #[test]
    fn department_name_and_code_both_load() {
        let json = r#"{"name":"Jane Doe","department_code":"bme","department":"Biomedical Engineering"}"#;
        let record: FacultyRecord = serde_json::from_str(json).expect("deserialize");
        assert_eq!(record.department_code.as_deref(), Some("bme"));
        assert_eq!(record.extra["department"], "Biomedical Engineering");

        let out = serde_json::to_value(&record).expect("serialize");
        assert_eq!(out["department_code"], "bme");
        assert_eq!(out["department"], "Biomedical Engineering");
    }

    #[test]
    fn unrecognised_research_areas_are_kept() {
        let json = r#"{"name":"Ada Lovelace","research_areas":["robotics","optics"]}"#;
        let record: FacultyRecord = serde_json::from_str(json).expect("deserialize");
        assert_eq!(
            record.research_areas,
            Some(vec!["robotics".to_string(), "optics".to_string()])
        );
    }

    #[test]
    fn unknown_keys_are_preserved() {
        let json = r#"{"name":"Grace Hopper","rank":"Professor","hire_year":1952}"#;
        let record: FacultyRecord = serde_json::from_str(json).expect("deserialize");
        assert_eq!(record.extra["rank"], "Professor");

        let out = serde_json::to_value(&record).expect("serialize");
        assert_eq!(out["hire_year"], 1952);
        // absent options are not emitted
        assert!(out.get("email").is_none());
    }

    #[test]
    fn empty_string_is_present_not_absent() {
        let record: FacultyRecord =
            serde_json::from_str(r#"{"name":"X","email":""}"#).expect("deserialize");
        assert_eq!(record.email.as_deref(), Some(""));
    }

    #[test]
    fn research_area_labels() {
        let json = serde_json::to_string(&ResearchArea::MachineLearning).unwrap();
        assert_eq!(json, r#""machine_learning""#);
        for area in ResearchArea::ALL {
            let label = serde_json::to_value(area).unwrap();
            assert_eq!(label, area.as_str());
        }
    }

    #[test]
    fn website_url_ignores_blank() {
        let mut record = FacultyRecord::named("A");
        assert!(record.website_url().is_none());
        record.website = Some("   ".into());
        assert!(record.website_url().is_none());
        record.website = Some(" https://a.example.edu ".into());
        assert_eq!(record.website_url(), Some("https://a.example.edu"));
    }

    #[test]
    fn failed_website_data_carries_reason() {
        let data = WebsiteData::failed(&ExtractionFailure::NoWebsiteUrl, None);
        assert!(!data.extraction_success);
        assert_eq!(data.reason.as_deref(), Some("no_website_url"));
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["extraction_success"], false);
        assert!(json.get("research_keywords").is_none());
    }

    #[test]
    fn scraped_batch_shapes() {
        let bare: ScrapedBatchFile = serde_json::from_str(r#"[{"name":"A"}]"#).unwrap();
        assert!(matches!(bare, ScrapedBatchFile::Records(ref r) if r.len() == 1));

        let wrapped: ScrapedBatchFile =
            serde_json::from_str(r#"{"department":"bme","faculty":[{"name":"B"}]}"#).unwrap();
        match wrapped {
            ScrapedBatchFile::Wrapped { department, faculty } => {
                assert_eq!(department.as_deref(), Some("bme"));
                assert_eq!(faculty[0].name, "B");
            }
            _ => panic!("expected Wrapped"),
        }
    }

    #[test]
    fn roster_fixture_validates() {
        let fixture = std::fs::read_to_string("../../../fixtures/json/roster.fixture.json")
            .expect("read fixture");
        let roster: Roster = serde_json::from_str(&fixture).expect("deserialize fixture roster");
        assert_eq!(roster.metadata.total_faculty, roster.faculty.len());
        assert_eq!(roster.faculty[0].name, "Ada Lovelace");
        assert!(roster.faculty[0].data_sources.contains("web_scraping"));
    }
}
